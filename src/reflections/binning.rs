use crate::errors::{ErrorInfo, ReflectionError};
use crate::Result;

/// Percentile bins over `data`.
///
/// Returns, per value, the bin it falls into (`None` for NaN) and one label
/// `"{upper} - {lower}"` per bin. With `ascending == false` bin 0 holds the
/// largest values, which for d-spacings means the lowest resolution.
pub fn bin_by_percentile(
    data: &[f64],
    bins: usize,
    ascending: bool,
) -> Result<(Vec<Option<usize>>, Vec<String>)> {
    let mut sorted: Vec<f64> = data.iter().copied().filter(|v| v.is_finite()).collect();
    if bins == 0 || sorted.is_empty() {
        return Err(ReflectionError::validation(
            ErrorInfo::new("binning needs at least one bin and one finite value")
                .with_context("bins", bins)
                .with_context("finite_values", sorted.len()),
        ));
    }
    sorted.sort_by(|a, b| a.total_cmp(b));

    let mut edges: Vec<f64> = (0..=bins)
        .map(|j| percentile(&sorted, j as f64 / bins as f64))
        .collect();
    if !ascending {
        edges.reverse();
    }

    let assignments = data
        .iter()
        .map(|&value| {
            if value.is_nan() {
                return None;
            }
            let bin = edges[1..]
                .iter()
                .position(|&edge| if ascending { value < edge } else { value > edge })
                .unwrap_or(bins - 1);
            Some(bin.min(bins - 1))
        })
        .collect();

    let labels = edges
        .windows(2)
        .map(|pair| format!("{:.2} - {:.2}", pair[0], pair[1]))
        .collect();

    Ok((assignments, labels))
}

// Linear interpolation between closest ranks; `fraction` in [0, 1]
fn percentile(sorted: &[f64], fraction: f64) -> f64 {
    let position = fraction * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let weight = position - lower as f64;
    sorted[lower] * (1.0 - weight) + sorted[upper] * weight
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descending_bins_are_balanced() {
        let data: Vec<f64> = (1..=100).map(f64::from).collect();
        let (assignments, labels) = bin_by_percentile(&data, 4, false).unwrap();
        assert_eq!(labels.len(), 4);
        assert_eq!(labels[0], "100.00 - 75.25");

        for bin in 0..4 {
            let count = assignments.iter().filter(|a| **a == Some(bin)).count();
            assert_eq!(count, 25);
        }
        assert_eq!(assignments[99], Some(0));
        assert_eq!(assignments[0], Some(3));
    }

    #[test]
    fn test_ascending_and_nan() {
        let (assignments, _) = bin_by_percentile(&[1.0, 2.0, f64::NAN, 3.0, 4.0], 2, true).unwrap();
        assert_eq!(assignments, vec![Some(0), Some(0), None, Some(1), Some(1)]);
    }

    #[test]
    fn test_zero_bins_is_an_error() {
        assert!(bin_by_percentile(&[1.0], 0, true).is_err());
    }
}
