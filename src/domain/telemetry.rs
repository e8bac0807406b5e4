// Telemetry data domain models
use crate::domain::sensor::SensorKind;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Sample {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

impl Sample {
    pub fn new(timestamp: DateTime<Utc>, value: f64) -> Self {
        Self { timestamp, value }
    }
}

/// Samples of one sensor field, ascending by timestamp
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Series {
    samples: Vec<Sample>,
}

impl Series {
    pub fn new(mut samples: Vec<Sample>) -> Self {
        samples.sort_by_key(|s| s.timestamp);
        Self { samples }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn values(&self) -> impl Iterator<Item = Option<f64>> + '_ {
        self.samples.iter().map(|s| Some(s.value))
    }

    /// Most recent `limit` samples, still ascending
    pub fn tail(&self, limit: usize) -> Series {
        let start = self.samples.len().saturating_sub(limit);
        Series {
            samples: self.samples[start..].to_vec(),
        }
    }
}

/// One timestamp of the UV sensor with both fields aligned
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct UvReading {
    pub timestamp: DateTime<Utc>,
    pub uv_index: Option<f64>,
    pub uv_raw: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct UvSeries {
    rows: Vec<UvReading>,
}

impl UvSeries {
    pub fn new(mut rows: Vec<UvReading>) -> Self {
        rows.sort_by_key(|r| r.timestamp);
        Self { rows }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> &[UvReading] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// `uv_index` when any row carries it, `uv_raw` otherwise
    pub fn preferred_field(&self) -> SensorKind {
        if self.rows.iter().any(|r| r.uv_index.is_some()) {
            SensorKind::UvIndex
        } else {
            SensorKind::UvRaw
        }
    }

    pub fn values(&self, field: SensorKind) -> Vec<Option<f64>> {
        self.rows
            .iter()
            .map(|r| match field {
                SensorKind::UvIndex => r.uv_index,
                SensorKind::UvRaw => r.uv_raw,
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, minute, 0).unwrap()
    }

    #[test]
    fn test_series_is_sorted_on_construction() {
        let series = Series::new(vec![
            Sample::new(at(5), 2.0),
            Sample::new(at(1), 1.0),
            Sample::new(at(9), 3.0),
        ]);
        let times: Vec<_> = series.samples().iter().map(|s| s.timestamp).collect();
        assert_eq!(times, vec![at(1), at(5), at(9)]);
    }

    #[test]
    fn test_tail_keeps_most_recent() {
        let series = Series::new((0..10).map(|m| Sample::new(at(m), m as f64)).collect());
        let tail = series.tail(3);
        assert_eq!(tail.len(), 3);
        assert_eq!(tail.samples()[0].value, 7.0);
        assert_eq!(series.tail(50).len(), 10);
    }

    #[test]
    fn test_preferred_field_falls_back_to_raw() {
        let raw_only = UvSeries::new(vec![UvReading {
            timestamp: at(0),
            uv_index: None,
            uv_raw: Some(120.0),
        }]);
        assert_eq!(raw_only.preferred_field(), SensorKind::UvRaw);

        let mixed = UvSeries::new(vec![
            UvReading {
                timestamp: at(0),
                uv_index: None,
                uv_raw: Some(120.0),
            },
            UvReading {
                timestamp: at(1),
                uv_index: Some(4.5),
                uv_raw: Some(130.0),
            },
        ]);
        assert_eq!(mixed.preferred_field(), SensorKind::UvIndex);
        assert_eq!(mixed.values(SensorKind::UvIndex), vec![None, Some(4.5)]);
    }
}
