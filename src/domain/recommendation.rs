// Recommendation engine - maps statistics and thresholds to alerts and advice
use crate::domain::sensor::SensorKind;
use crate::domain::statistics::Statistics;
use crate::domain::thresholds::{RangeThresholds, ThresholdSet, UvThresholds};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alert {
    pub severity: Severity,
    pub kind: SensorKind,
    pub message: String,
}

/// Advisory outcomes, one per evaluated sensor kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Advice {
    WarmUp,
    CoolDown,
    TemperatureOptimal,
    IncreaseWatering,
    ImproveVentilation,
    HumidityOptimal,
    ProvideShade,
    SupplementalLight,
    UvOptimal,
}

impl Advice {
    pub fn message(self) -> &'static str {
        match self {
            Advice::WarmUp => {
                "Action required: warm up. Move the plants somewhere warmer or add heating."
            }
            Advice::CoolDown => {
                "Action required: cool down. Ventilate or shade the plants to lower the temperature."
            }
            Advice::TemperatureOptimal => "Optimal: temperature is within the ideal range.",
            Advice::IncreaseWatering => {
                "Action required: increase watering or humidify the air."
            }
            Advice::ImproveVentilation => {
                "Action required: improve ventilation to lower the humidity."
            }
            Advice::HumidityOptimal => "Optimal: humidity is within the ideal range.",
            Advice::ProvideShade => "Action required: provide shade or UV protection.",
            Advice::SupplementalLight => {
                "Attention: low UV radiation, consider supplemental light."
            }
            Advice::UvOptimal => "Optimal: UV levels are right for growth.",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub kind: SensorKind,
    pub advice: Advice,
    pub message: &'static str,
}

impl Recommendation {
    pub fn new(kind: SensorKind, advice: Advice) -> Self {
        Self {
            kind,
            advice,
            message: advice.message(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Evaluation {
    pub recommendations: Vec<Recommendation>,
    pub alerts: Vec<Alert>,
}

impl Evaluation {
    pub fn status(&self) -> SystemStatus {
        SystemStatus::from_alert_count(self.alerts.len())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemStatus {
    Optimal,
    Attention,
    Critical,
}

impl SystemStatus {
    /// Overall status from the number of alerts, regardless of their severity
    pub fn from_alert_count(count: usize) -> Self {
        match count {
            0 => SystemStatus::Optimal,
            1 => SystemStatus::Attention,
            _ => SystemStatus::Critical,
        }
    }
}

/// Comparison a rule applies to the evaluated statistic
#[derive(Debug, Clone, Copy)]
enum Condition {
    Below(f64),
    Above(f64),
    Always,
}

impl Condition {
    fn matches(self, value: f64) -> bool {
        match self {
            Condition::Below(bound) => value < bound,
            Condition::Above(bound) => value > bound,
            Condition::Always => true,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Rule {
    condition: Condition,
    alert: Option<(Severity, &'static str)>,
    advice: Advice,
}

/// Which figure of the statistics a table is evaluated against
#[derive(Debug, Clone, Copy)]
enum Measure {
    Mean,
    Max,
}

impl Measure {
    fn pick(self, stats: &Statistics) -> f64 {
        match self {
            Measure::Mean => stats.mean,
            Measure::Max => stats.max,
        }
    }
}

/// Ordered rules for one sensor kind, first match wins
struct DecisionTable {
    kind: SensorKind,
    measure: Measure,
    rules: [Rule; 3],
}

impl DecisionTable {
    fn temperature(t: &RangeThresholds) -> Self {
        Self {
            kind: SensorKind::Temperature,
            measure: Measure::Mean,
            rules: [
                Rule {
                    condition: Condition::Below(t.min),
                    alert: Some((Severity::Warning, "temperature too low")),
                    advice: Advice::WarmUp,
                },
                Rule {
                    condition: Condition::Above(t.max),
                    alert: Some((Severity::Warning, "temperature too high")),
                    advice: Advice::CoolDown,
                },
                Rule {
                    condition: Condition::Always,
                    alert: None,
                    advice: Advice::TemperatureOptimal,
                },
            ],
        }
    }

    fn humidity(h: &RangeThresholds) -> Self {
        Self {
            kind: SensorKind::Humidity,
            measure: Measure::Mean,
            rules: [
                Rule {
                    condition: Condition::Below(h.min),
                    alert: Some((Severity::Warning, "humidity too low")),
                    advice: Advice::IncreaseWatering,
                },
                Rule {
                    condition: Condition::Above(h.max),
                    alert: Some((Severity::Warning, "humidity too high")),
                    advice: Advice::ImproveVentilation,
                },
                Rule {
                    condition: Condition::Always,
                    alert: None,
                    advice: Advice::HumidityOptimal,
                },
            ],
        }
    }

    fn uv(uv: &UvThresholds) -> Self {
        Self {
            kind: SensorKind::UvIndex,
            measure: Measure::Max,
            rules: [
                Rule {
                    condition: Condition::Above(uv.high),
                    alert: Some((Severity::Warning, "UV too high")),
                    advice: Advice::ProvideShade,
                },
                Rule {
                    condition: Condition::Below(uv.low),
                    alert: None,
                    advice: Advice::SupplementalLight,
                },
                Rule {
                    condition: Condition::Always,
                    alert: None,
                    advice: Advice::UvOptimal,
                },
            ],
        }
    }

    fn apply(&self, stats: Option<&Statistics>, out: &mut Evaluation) {
        let Some(stats) = stats else {
            return;
        };
        let value = self.measure.pick(stats);
        let Some(rule) = self.rules.iter().find(|r| r.condition.matches(value)) else {
            return;
        };

        if let Some((severity, message)) = rule.alert {
            out.alerts.push(Alert {
                severity,
                kind: self.kind,
                message: message.to_string(),
            });
        }
        out.recommendations.push(Recommendation::new(self.kind, rule.advice));
    }
}

/// Evaluate temperature, humidity and UV statistics in that fixed order.
///
/// Each kind contributes at most one alert and one recommendation; kinds
/// without statistics contribute nothing.
pub fn evaluate(
    temperature: Option<&Statistics>,
    humidity: Option<&Statistics>,
    uv: Option<&Statistics>,
    thresholds: &ThresholdSet,
) -> Evaluation {
    let mut evaluation = Evaluation::default();
    DecisionTable::temperature(&thresholds.temperature).apply(temperature, &mut evaluation);
    DecisionTable::humidity(&thresholds.humidity).apply(humidity, &mut evaluation);
    DecisionTable::uv(&thresholds.uv).apply(uv, &mut evaluation);
    evaluation
}
