//! Tabular financial statement data.
//!
//! A [`FinancialTable`] is the shape providers hand statements over in: one
//! row per line item, one column per reporting period, most recent period
//! first. The same container carries analyst estimate tables, where rows are
//! horizons (`"0y"`, `"+1y"`) and columns are estimate types (`"avg"`).

use crate::{Date, Result, TasadorError};
use polars::prelude::*;

/// Name of the string column holding the line-item label of each row.
pub const LINE_ITEM_COLUMN: &str = "line_item";

/// Date format used for period column names.
const PERIOD_FORMAT: &str = "%Y-%m-%d";

/// Line items by reporting period, backed by a Polars DataFrame.
///
/// # Expected Schema
///
/// - `line_item`: row label (e.g. `"Operating Cash Flow"`)
/// - one `Float64` column per period, ordered most-recent-first; statement
///   tables name these columns by fiscal period end (`YYYY-MM-DD`)
///
/// Period alignment is positional: column 0 of every row refers to the same
/// period. Missing cells are nulls; NaN cells are read back as missing too.
///
/// # Example
///
/// ```no_run
/// use tasador_traits::FinancialTable;
///
/// let table = FinancialTable::from_rows(
///     &["2024-09-30", "2024-06-30"],
///     vec![("Operating Cash Flow", vec![Some(100.0), Some(90.0)])],
/// )
/// .unwrap();
///
/// assert_eq!(table.value_at("Operating Cash Flow", 0), Some(100.0));
/// ```
#[derive(Debug, Clone)]
pub struct FinancialTable {
    data: DataFrame,
}

impl FinancialTable {
    /// Wraps a DataFrame, casting every period column to `Float64`.
    ///
    /// # Errors
    ///
    /// Returns [`TasadorError::MissingColumn`] when there is no `line_item`
    /// column, [`TasadorError::InvalidData`] when it is not a string column,
    /// and a Polars error when a period column cannot be cast to floats.
    pub fn new(data: DataFrame) -> Result<Self> {
        let labels = data
            .column(LINE_ITEM_COLUMN)
            .map_err(|_| TasadorError::MissingColumn(LINE_ITEM_COLUMN.to_string()))?;
        if labels.dtype() != &DataType::String {
            return Err(TasadorError::InvalidData(format!(
                "{LINE_ITEM_COLUMN} must be a string column, found {}",
                labels.dtype()
            )));
        }

        let columns = data
            .get_columns()
            .iter()
            .map(|column| {
                if column.name().as_str() == LINE_ITEM_COLUMN
                    || column.dtype() == &DataType::Float64
                {
                    Ok(column.clone())
                } else {
                    column.cast(&DataType::Float64)
                }
            })
            .collect::<PolarsResult<Vec<Column>>>()?;

        Ok(Self {
            data: DataFrame::new(columns)?,
        })
    }

    /// Builds a table from labelled rows.
    ///
    /// Rows shorter than `columns` are padded with missing values.
    ///
    /// # Errors
    ///
    /// Returns [`TasadorError::InvalidData`] if a row has more values than
    /// there are columns, or a Polars error on duplicate column names.
    pub fn from_rows<L, P>(columns: &[P], rows: Vec<(L, Vec<Option<f64>>)>) -> Result<Self>
    where
        L: Into<String>,
        P: AsRef<str>,
    {
        let width = columns.len();
        let mut labels = Vec::with_capacity(rows.len());
        let mut cells: Vec<Vec<Option<f64>>> = vec![Vec::with_capacity(rows.len()); width];

        for (label, mut values) in rows {
            let label = label.into();
            if values.len() > width {
                return Err(TasadorError::InvalidData(format!(
                    "row '{label}' has {} values for {width} columns",
                    values.len()
                )));
            }
            values.resize(width, None);
            for (column, value) in cells.iter_mut().zip(values) {
                column.push(value);
            }
            labels.push(label);
        }

        let mut frame = Vec::with_capacity(width + 1);
        frame.push(Column::from(Series::new(LINE_ITEM_COLUMN.into(), labels)));
        for (name, values) in columns.iter().zip(cells) {
            frame.push(Column::from(Series::new(name.as_ref().into(), values)));
        }

        Ok(Self {
            data: DataFrame::new(frame)?,
        })
    }

    /// A table with no rows and no periods.
    #[must_use]
    pub fn empty() -> Self {
        let labels = Series::new_empty(LINE_ITEM_COLUMN.into(), &DataType::String);
        Self {
            data: DataFrame::new(vec![Column::from(labels)]).unwrap_or_default(),
        }
    }

    /// Returns a reference to the underlying DataFrame.
    pub const fn data(&self) -> &DataFrame {
        &self.data
    }

    /// Number of line items.
    pub fn len(&self) -> usize {
        self.data.height()
    }

    /// Whether the table holds no line items.
    pub fn is_empty(&self) -> bool {
        self.data.height() == 0
    }

    /// Period (or estimate) column names, most recent first.
    pub fn periods(&self) -> Vec<String> {
        self.value_columns()
            .map(|column| column.name().to_string())
            .collect()
    }

    /// Fiscal period end of the column at `index`, if its name is a date.
    pub fn period_end(&self, index: usize) -> Option<Date> {
        let column = self.value_columns().nth(index)?;
        Date::parse_from_str(column.name().as_str(), PERIOD_FORMAT).ok()
    }

    /// Line-item labels in row order.
    pub fn labels(&self) -> Vec<String> {
        self.label_chunks()
            .map(|labels| labels.into_iter().flatten().map(str::to_string).collect())
            .unwrap_or_default()
    }

    /// Whether a row with this label exists.
    pub fn has_row(&self, label: &str) -> bool {
        self.row_index(label).is_some()
    }

    /// All values of a row, most recent period first.
    ///
    /// Returns `None` when no row carries the label. Null and NaN cells come
    /// back as `None` entries.
    pub fn row(&self, label: &str) -> Option<Vec<Option<f64>>> {
        let index = self.row_index(label)?;
        Some(
            self.value_columns()
                .map(|column| Self::cell(column, index))
                .collect(),
        )
    }

    /// Value of a row at a positional period index.
    pub fn value_at(&self, label: &str, period_index: usize) -> Option<f64> {
        let index = self.row_index(label)?;
        let column = self.value_columns().nth(period_index)?;
        Self::cell(column, index)
    }

    /// Value of a row in a named column.
    pub fn value(&self, label: &str, column: &str) -> Option<f64> {
        if column == LINE_ITEM_COLUMN {
            return None;
        }
        let index = self.row_index(label)?;
        let column = self.data.column(column).ok()?;
        Self::cell(column, index)
    }

    fn label_chunks(&self) -> Option<&StringChunked> {
        self.data
            .column(LINE_ITEM_COLUMN)
            .ok()?
            .as_materialized_series()
            .str()
            .ok()
    }

    fn row_index(&self, label: &str) -> Option<usize> {
        self.label_chunks()?
            .into_iter()
            .position(|candidate| candidate == Some(label))
    }

    fn value_columns(&self) -> impl Iterator<Item = &Column> {
        self.data
            .get_columns()
            .iter()
            .filter(|column| column.name().as_str() != LINE_ITEM_COLUMN)
    }

    fn cell(column: &Column, row: usize) -> Option<f64> {
        if row >= column.len() {
            return None;
        }
        column
            .as_materialized_series()
            .f64()
            .ok()?
            .get(row)
            .filter(|value| !value.is_nan())
    }
}

impl TryFrom<DataFrame> for FinancialTable {
    type Error = TasadorError;

    fn try_from(data: DataFrame) -> Result<Self> {
        Self::new(data)
    }
}

impl Default for FinancialTable {
    fn default() -> Self {
        Self::empty()
    }
}
