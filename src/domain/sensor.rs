// Sensor catalogue - static metadata per sensor kind
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorKind {
    Temperature,
    Humidity,
    UvIndex,
    UvRaw,
    HeatIndex,
}

/// Where a sensor kind lives in the store and how it is displayed
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SensorInfo {
    pub kind: SensorKind,
    pub measurement: &'static str,
    pub field: &'static str,
    pub unit: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
}

impl SensorKind {
    pub const ALL: [SensorKind; 5] = [
        SensorKind::Temperature,
        SensorKind::Humidity,
        SensorKind::HeatIndex,
        SensorKind::UvIndex,
        SensorKind::UvRaw,
    ];

    pub fn info(self) -> SensorInfo {
        match self {
            SensorKind::Temperature => SensorInfo {
                kind: self,
                measurement: "airSensor",
                field: "temperature",
                unit: "°C",
                icon: "🌡️",
                color: "#FF6B6B",
            },
            SensorKind::Humidity => SensorInfo {
                kind: self,
                measurement: "airSensor",
                field: "humidity",
                unit: "%",
                icon: "💧",
                color: "#4ECDC4",
            },
            SensorKind::HeatIndex => SensorInfo {
                kind: self,
                measurement: "airSensor",
                field: "heat_index",
                unit: "",
                icon: "🔥",
                color: "#FF8A65",
            },
            SensorKind::UvIndex => SensorInfo {
                kind: self,
                measurement: "uv_sensor",
                field: "uv_index",
                unit: "",
                icon: "☀️",
                color: "#FFE66D",
            },
            SensorKind::UvRaw => SensorInfo {
                kind: self,
                measurement: "uv_sensor",
                field: "uv_raw",
                unit: "",
                icon: "📡",
                color: "#FFA726",
            },
        }
    }

    pub fn as_str(self) -> &'static str {
        self.info().field
    }
}

impl fmt::Display for SensorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sensor kind: {0}")]
pub struct UnknownSensorKind(pub String);

impl FromStr for SensorKind {
    type Err = UnknownSensorKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SensorKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownSensorKind(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trips_through_name() {
        for kind in SensorKind::ALL {
            assert_eq!(kind.to_string().parse::<SensorKind>(), Ok(kind));
        }
        assert!("pressure".parse::<SensorKind>().is_err());
    }

    #[test]
    fn test_uv_fields_share_measurement() {
        assert_eq!(SensorKind::UvIndex.info().measurement, "uv_sensor");
        assert_eq!(SensorKind::UvRaw.info().measurement, "uv_sensor");
    }

    #[test]
    fn test_serde_name_matches_field() {
        let json = serde_json::to_string(&SensorKind::HeatIndex).unwrap();
        assert_eq!(json, "\"heat_index\"");
    }
}
