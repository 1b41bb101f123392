use super::model::{Series, Table};

// ---------------------------------------------------------------------------
// Series selection
// ---------------------------------------------------------------------------

/// Pick the candidate columns present in `table`, in the order of
/// `candidates`. Absent candidates are skipped without error so legend order
/// never depends on the file's column order.
pub fn select(table: &Table, candidates: &[&str]) -> Vec<(String, Series)> {
    candidates
        .iter()
        .filter_map(|&name| {
            let series = table.column(name)?;
            Some((name.to_string(), series.clone()))
        })
        .collect()
}

/// Every column except `index_column`, in file order. Used when the series
/// are per-run trial columns whose names are not known up front.
pub fn select_raw(table: &Table, index_column: &str) -> Vec<(String, Series)> {
    table
        .column_names
        .iter()
        .filter(|name| name.as_str() != index_column)
        .filter_map(|name| {
            let series = table.column(name)?;
            Some((name.clone(), series.clone()))
        })
        .collect()
}
