/// Descriptive statistics of a series, ignoring gaps (non-finite samples).
///
/// Variance is the population variance (divide by n), matching what the
/// measurement programs report next to their timings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub count: usize,
    pub average: f64,
    pub variance: f64,
    pub std_deviation: f64,
    pub std_error: f64,
    pub min: f64,
    pub max: f64,
}

impl Summary {
    /// `None` when there is no finite sample.
    pub fn compute(values: &[f64]) -> Option<Self> {
        let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if finite.is_empty() {
            return None;
        }

        let count = finite.len();
        let n = count as f64;
        let average = finite.iter().sum::<f64>() / n;
        let variance = finite.iter().map(|v| (v - average).powi(2)).sum::<f64>() / n;
        let std_deviation = variance.sqrt();
        let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
        let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Some(Summary {
            count,
            average,
            variance,
            std_deviation,
            std_error: std_deviation / n.sqrt(),
            min,
            max,
        })
    }
}
