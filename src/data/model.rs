use std::collections::BTreeMap;

use crate::error::AnalysisError;

// ---------------------------------------------------------------------------
// Series – one named numeric column
// ---------------------------------------------------------------------------

/// A named numeric sequence. The position of a sample is its implicit x value
/// when no explicit index column exists. Gaps are stored as NaN.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: String,
    pub values: Vec<f64>,
}

impl Series {
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Iterator over the samples that are not gaps.
    pub fn finite_values(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().copied().filter(|v| v.is_finite())
    }

    /// `(position, value)` pairs, skipping gaps.
    pub fn indexed_points(&self) -> Vec<[f64; 2]> {
        self.values
            .iter()
            .enumerate()
            .filter(|(_, v)| v.is_finite())
            .map(|(i, &v)| [i as f64, v])
            .collect()
    }
}

// ---------------------------------------------------------------------------
// FilterMask – which samples survived outlier rejection
// ---------------------------------------------------------------------------

/// One flag per sample: `true` where the sample is kept.
pub type FilterMask = Vec<bool>;

// ---------------------------------------------------------------------------
// Table – the loaded file
// ---------------------------------------------------------------------------

/// Column-oriented table. All columns share the same length (rows align by
/// index) and `column_names` keeps the file order.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub column_names: Vec<String>,
    columns: BTreeMap<String, Series>,
    n_rows: usize,
}

impl Table {
    /// Build a table, checking that every column has the same length and that
    /// no name is repeated.
    pub fn from_columns(columns: Vec<(String, Vec<f64>)>) -> Result<Self, AnalysisError> {
        let n_rows = columns.first().map(|(_, v)| v.len()).unwrap_or(0);
        let mut column_names = Vec::with_capacity(columns.len());
        let mut by_name = BTreeMap::new();

        for (name, values) in columns {
            if values.len() != n_rows {
                return Err(AnalysisError::InvalidInput(format!(
                    "column '{name}' has {} rows, expected {n_rows}",
                    values.len()
                )));
            }
            if by_name.contains_key(&name) {
                return Err(AnalysisError::InvalidInput(format!(
                    "duplicate column '{name}'"
                )));
            }
            column_names.push(name.clone());
            by_name.insert(name.clone(), Series::new(name, values));
        }

        Ok(Table {
            column_names,
            columns: by_name,
            n_rows,
        })
    }

    pub fn column(&self, name: &str) -> Option<&Series> {
        self.columns.get(name)
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.n_rows
    }
}
