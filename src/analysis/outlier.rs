use crate::data::model::{FilterMask, Series};

// ---------------------------------------------------------------------------
// Z-score outlier rejection
// ---------------------------------------------------------------------------

/// Mask every sample whose distance from the series mean exceeds
/// `z_threshold` sample standard deviations (n - 1 in the denominator).
///
/// The returned series has the same length as the input; masked samples are
/// replaced by NaN so they stay gaps at their original positions. Samples that
/// were already gaps are reported as not kept. A constant series (or a single
/// sample) has no spread and keeps every sample.
pub fn filter(series: &Series, z_threshold: f64) -> (Series, FilterMask) {
    let samples: Vec<f64> = series.finite_values().collect();
    let min = samples.iter().copied().fold(f64::INFINITY, f64::min);
    let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    // Constant input is detected on the values; rounding in the mean can leave
    // a tiny non-zero σ.
    let spread = if samples.len() < 2 || min == max {
        None
    } else {
        let n = samples.len() as f64;
        let mean = samples.iter().sum::<f64>() / n;
        let sigma = (samples.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0)).sqrt();
        Some((mean, sigma))
    };

    let mask: FilterMask = series
        .values
        .iter()
        .map(|&x| match spread {
            _ if !x.is_finite() => false,
            None => true,
            Some((mean, sigma)) => (x - mean).abs() / sigma <= z_threshold,
        })
        .collect();

    let values = series
        .values
        .iter()
        .zip(&mask)
        .map(|(&x, &keep)| if keep { x } else { f64::NAN })
        .collect();

    log::debug!(
        "{}: masked {} of {} samples (mean/std {:?}, z > {})",
        series.name,
        mask.iter().filter(|keep| !**keep).count(),
        mask.len(),
        spread,
        z_threshold
    );

    (Series::new(series.name.clone(), values), mask)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(values: &[f64]) -> Series {
        Series::new("run", values.to_vec())
    }

    /// Mean and sample standard deviation.
    fn mean_std(values: &[f64]) -> (f64, f64) {
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
        (mean, var.sqrt())
    }

    #[test]
    fn masks_the_spike() {
        // z of the spike is about 2.85.
        let mut values = vec![1.0; 9];
        values.push(100.0);
        let (filtered, mask) = filter(&series(&values), 2.0);

        let mut expected = vec![true; 9];
        expected.push(false);
        assert_eq!(mask, expected);
        assert_eq!(filtered.len(), 10);
        assert_eq!(&filtered.values[..9], &[1.0; 9]);
        assert!(filtered.values[9].is_nan());
    }

    #[test]
    fn five_sample_spike_is_below_two_sigma() {
        // With n - 1 the spike scores about 1.79.
        let s = series(&[1.0, 1.0, 1.0, 1.0, 100.0]);

        let (_, mask) = filter(&s, 2.0);
        assert_eq!(mask, [true; 5]);

        let (filtered, mask) = filter(&s, 1.5);
        assert_eq!(mask, [true, true, true, true, false]);
        assert_eq!(filtered.finite_values().collect::<Vec<_>>(), [1.0; 4]);
    }

    #[test]
    fn constant_series_keeps_everything() {
        for t in [0.0, 0.5, 2.0, 10.0] {
            let (filtered, mask) = filter(&series(&[5.0, 5.0, 5.0, 5.0]), t);
            assert_eq!(mask, [true; 4]);
            assert_eq!(filtered.values, [5.0; 4]);
        }
    }

    #[test]
    fn constant_series_with_inexact_floats() {
        for value in [0.1, 0.7, 1.1, 123.456] {
            for len in [3, 5, 10] {
                let values = vec![value; len];
                for t in [0.0, 0.5] {
                    let (filtered, mask) = filter(&series(&values), t);
                    assert_eq!(mask, vec![true; len], "{value} x {len} at {t}");
                    assert_eq!(filtered.values, values);
                }
            }
        }
    }

    #[test]
    fn single_sample_is_kept() {
        let (_, mask) = filter(&series(&[42.0]), 0.0);
        assert_eq!(mask, [true]);
    }

    #[test]
    fn empty_series() {
        let (filtered, mask) = filter(&series(&[]), 2.0);
        assert!(filtered.values.is_empty());
        assert!(mask.is_empty());
    }

    #[test]
    fn mask_matches_z_scores() {
        let values = [120.0, 118.0, 125.0, 119.0, 300.0, 121.0, 117.0, 40.0, 122.0, 120.0];
        let s = series(&values);
        let (mean, sigma) = mean_std(&values);

        for t in [0.5, 1.0, 1.5, 2.0, 3.0] {
            let (filtered, mask) = filter(&s, t);
            assert_eq!(filtered.len(), values.len());
            for (i, &x) in values.iter().enumerate() {
                let z = (x - mean).abs() / sigma;
                assert_eq!(mask[i], z <= t, "sample {i} at threshold {t}");
            }
        }
    }

    #[test]
    fn existing_gaps_stay_gaps() {
        let (filtered, mask) = filter(&series(&[3.0, f64::NAN, 3.0]), 2.0);
        assert_eq!(mask, [true, false, true]);
        assert!(filtered.values[1].is_nan());
    }
}
