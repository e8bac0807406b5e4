// Statistics calculator - reduces a series to descriptive statistics
use serde::Serialize;
use statrs::statistics::{Data, Median, Statistics as StatrsStatistics};

/// Summary of one series, every figure rounded to two decimals
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Statistics {
    pub mean: f64,
    pub max: f64,
    pub min: f64,
    pub median: f64,
    /// Sample standard deviation, undefined below two values
    pub stddev: Option<f64>,
    pub count: usize,
}

/// Summarize the non-missing values of a series.
///
/// Missing and non-finite values are discarded first. Returns `None` when
/// nothing is left, never a zeroed record.
pub fn summarize<I>(values: I) -> Option<Statistics>
where
    I: IntoIterator<Item = Option<f64>>,
{
    let values: Vec<f64> = values
        .into_iter()
        .flatten()
        .filter(|v| v.is_finite())
        .collect();

    if values.is_empty() {
        return None;
    }

    let count = values.len();
    let max = StatrsStatistics::max(&values);
    let min = StatrsStatistics::min(&values);
    let mut mean = StatrsStatistics::mean(&values);
    if !mean.is_finite() {
        // running mean overflowed near f64::MAX; scale each value first
        mean = values
            .iter()
            .map(|v| v / count as f64)
            .sum::<f64>()
            .clamp(min, max);
    }
    let stddev = (count > 1)
        .then(|| StatrsStatistics::std_dev(&values))
        .filter(|sd| sd.is_finite())
        .map(round2);
    let median = Data::new(values).median().clamp(min, max);

    Some(Statistics {
        mean: round2(mean),
        max: round2(max),
        min: round2(min),
        median: round2(median),
        stddev,
        count,
    })
}

/// Round to two decimals, ties to even. Values too large to scale are
/// returned unchanged.
pub fn round2(value: f64) -> f64 {
    let scaled = value * 100.0;
    if scaled.is_finite() {
        scaled.round_ties_even() / 100.0
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn some(values: &[f64]) -> Vec<Option<f64>> {
        values.iter().copied().map(Some).collect()
    }

    #[test]
    fn test_empty_series_has_no_statistics() {
        assert_eq!(summarize(Vec::new()), None);
        assert_eq!(summarize(vec![None, None]), None);
    }

    #[test]
    fn test_basic_summary() {
        let stats = summarize(some(&[18.0, 20.0, 22.0, 24.0])).unwrap();
        assert_eq!(stats.mean, 21.0);
        assert_eq!(stats.min, 18.0);
        assert_eq!(stats.max, 24.0);
        assert_eq!(stats.median, 21.0);
        // sqrt(20 / 3)
        assert_eq!(stats.stddev, Some(2.58));
        assert_eq!(stats.count, 4);
    }

    #[test]
    fn test_missing_values_are_skipped() {
        let stats = summarize(vec![Some(10.0), None, Some(30.0), Some(f64::NAN)]).unwrap();
        assert_eq!(stats.count, 2);
        assert_eq!(stats.mean, 20.0);
        assert_eq!(stats.median, 20.0);
    }

    #[test]
    fn test_single_value_has_no_stddev() {
        let stats = summarize(some(&[7.25])).unwrap();
        assert_eq!(stats.mean, 7.25);
        assert_eq!(stats.median, 7.25);
        assert_eq!(stats.stddev, None);
    }

    #[test]
    fn test_odd_count_median_is_middle_value() {
        let stats = summarize(some(&[9.0, 1.0, 5.0])).unwrap();
        assert_eq!(stats.median, 5.0);
    }

    #[test]
    fn test_rounding_is_half_to_even() {
        assert_eq!(round2(0.125), 0.12);
        assert_eq!(round2(0.375), 0.38);
        assert_eq!(round2(21.456), 21.46);
        assert_eq!(round2(-3.333), -3.33);
    }

    #[test]
    fn test_ordering_holds_for_varied_inputs() {
        let inputs: [&[f64]; 5] = [
            &[1.0],
            &[3.0, 3.0, 3.0],
            &[-5.5, 0.0, 12.25, 99.9],
            &[55.1, 54.9, 56.3, 53.0, 57.7, 55.0],
            &[0.01, 1000.0, 0.02],
        ];
        for values in inputs {
            let stats = summarize(some(values)).unwrap();
            assert!(
                stats.min <= stats.median && stats.median <= stats.max,
                "{values:?}"
            );
            assert!(
                stats.min <= stats.mean && stats.mean <= stats.max,
                "{values:?}"
            );
        }
    }

    #[test]
    fn test_summary_is_deterministic() {
        let values = some(&[22.4, 23.1, 21.9, 22.8]);
        assert_eq!(summarize(values.clone()), summarize(values));
    }

    #[test]
    fn test_huge_values_stay_finite() {
        let stats = summarize(some(&[1e307, 1e307])).unwrap();
        assert_eq!(stats.mean, 1e307);
        assert_eq!(stats.max, 1e307);
        assert_eq!(stats.stddev, Some(0.0));

        let stats = summarize(some(&[f64::MAX, -f64::MAX])).unwrap();
        assert!(stats.mean.is_finite());
        assert!(stats.min <= stats.mean && stats.mean <= stats.max);
        assert_eq!(stats.stddev, None);
    }
}
