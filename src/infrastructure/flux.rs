// Flux query construction for the sensor bucket
use crate::domain::sensor::SensorKind;
use crate::domain::window::Window;

/// Range, filter and sort on a single field of one measurement
pub fn field_query(bucket: &str, kind: SensorKind, window: Window) -> String {
    let info = kind.info();
    format!(
        r#"from(bucket: "{bucket}")
  |> range(start: -{minutes}m)
  |> filter(fn: (r) => r["_measurement"] == "{measurement}" and r["_field"] == "{field}")
  |> sort(columns: ["_time"])"#,
        bucket = escape(bucket),
        minutes = window.as_minutes(),
        measurement = info.measurement,
        field = info.field,
    )
}

/// Both UV fields pivoted into one row per timestamp
pub fn uv_query(bucket: &str, window: Window) -> String {
    let index = SensorKind::UvIndex.info();
    let raw = SensorKind::UvRaw.info();
    format!(
        r#"from(bucket: "{bucket}")
  |> range(start: -{minutes}m)
  |> filter(fn: (r) => r["_measurement"] == "{measurement}" and (r["_field"] == "{index}" or r["_field"] == "{raw}"))
  |> pivot(rowKey: ["_time"], columnKey: ["_field"], valueColumn: "_value")
  |> sort(columns: ["_time"])"#,
        bucket = escape(bucket),
        minutes = window.as_minutes(),
        measurement = index.measurement,
        index = index.field,
        raw = raw.field,
    )
}

/// Escape a value for use inside a Flux string literal
fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
