use crate::data::model::Series;
use crate::error::AnalysisError;

/// Values shifted down by a common baseline, with their untouched error bars.
#[derive(Debug, Clone, PartialEq)]
pub struct BaselineAdjustedSeries {
    pub name: String,
    pub baseline: f64,
    pub adjusted: Vec<f64>,
    pub errors: Vec<f64>,
}

/// Subtract `factor · min(values)` from every value.
///
/// With the usual factor of 0.8 the smallest bar stays visible just above
/// zero. Errors are symmetric around the adjusted point and pass through
/// unchanged. Gaps are ignored when taking the minimum.
pub fn normalize(
    values: &Series,
    errors: &Series,
    factor: f64,
) -> Result<BaselineAdjustedSeries, AnalysisError> {
    if values.len() != errors.len() {
        return Err(AnalysisError::InvalidInput(format!(
            "'{}' has {} values but '{}' has {} errors",
            values.name,
            values.len(),
            errors.name,
            errors.len()
        )));
    }

    let min = values.finite_values().fold(f64::INFINITY, f64::min);
    if !min.is_finite() {
        return Err(AnalysisError::InvalidInput(format!(
            "'{}' has no values to take a baseline from",
            values.name
        )));
    }

    let baseline = factor * min;
    log::debug!("{}: baseline {:.2} ({} x min {})", values.name, baseline, factor, min);

    Ok(BaselineAdjustedSeries {
        name: values.name.clone(),
        baseline,
        adjusted: values.values.iter().map(|v| v - baseline).collect(),
        errors: errors.values.clone(),
    })
}
