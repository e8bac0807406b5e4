// InfluxDB v2 repository implementation
use crate::application::sample_repository::{FetchError, SampleRepository};
use crate::domain::sensor::SensorKind;
use crate::domain::telemetry::{Sample, Series, UvReading, UvSeries};
use crate::domain::window::Window;
use crate::infrastructure::config::InfluxSettings;
use crate::infrastructure::flux;
use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

/// Decoded row of a Flux CSV response, keyed by column name
type FluxRow = HashMap<String, String>;

#[derive(Debug, Clone)]
pub struct InfluxRepository {
    client: reqwest::Client,
    url: String,
    token: String,
    org: String,
    bucket: String,
}

#[derive(Debug, Serialize)]
struct FluxRequest<'a> {
    query: &'a str,
    #[serde(rename = "type")]
    kind: &'static str,
    dialect: Dialect,
}

#[derive(Debug, Serialize)]
struct Dialect {
    header: bool,
    annotations: Vec<String>,
    delimiter: &'static str,
}

impl InfluxRepository {
    pub fn new(settings: &InfluxSettings) -> anyhow::Result<Self> {
        // one pooled client for every query this process makes
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .context("Failed to build InfluxDB HTTP client")?;

        Ok(Self {
            client,
            url: settings.url.trim_end_matches('/').to_string(),
            token: settings.token.clone(),
            org: settings.org.clone(),
            bucket: settings.bucket.clone(),
        })
    }

    fn build_query_url(&self) -> String {
        format!(
            "{}/api/v2/query?org={}",
            self.url,
            urlencoding::encode(&self.org)
        )
    }

    async fn execute_query(&self, query: &str) -> Result<Vec<FluxRow>, FetchError> {
        let body = FluxRequest {
            query,
            kind: "flux",
            dialect: Dialect {
                header: true,
                annotations: Vec::new(),
                delimiter: ",",
            },
        };

        tracing::debug!(query, "executing flux query");
        let response = self
            .client
            .post(self.build_query_url())
            .header("Authorization", format!("Token {}", self.token))
            .header("Accept", "application/csv")
            .json(&body)
            .send()
            .await
            .map_err(|e| FetchError::Connectivity(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status { status, body });
        }

        let text = response
            .text()
            .await
            .map_err(|e| FetchError::Connectivity(e.to_string()))?;

        parse_flux_csv(&text)
    }
}

#[async_trait]
impl SampleRepository for InfluxRepository {
    async fn fetch(&self, kind: SensorKind, window: Window) -> Result<Series, FetchError> {
        let query = flux::field_query(&self.bucket, kind, window);
        let rows = self.execute_query(&query).await?;
        Ok(rows_to_series(&rows))
    }

    async fn fetch_uv(&self, window: Window) -> Result<UvSeries, FetchError> {
        let query = flux::uv_query(&self.bucket, window);
        let rows = self.execute_query(&query).await?;
        Ok(rows_to_uv(&rows))
    }
}

/// Decode a Flux CSV body. Every table starts with its own header row, and a
/// query that fails after streaming began reports an `error` table instead.
fn parse_flux_csv(body: &str) -> Result<Vec<FluxRow>, FetchError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(body.as_bytes());

    let mut header: Option<Vec<String>> = None;
    let mut rows = Vec::new();

    for record in reader.records() {
        let record = record.map_err(|e| FetchError::Decode(e.to_string()))?;

        if record.iter().all(|field| field.trim().is_empty()) {
            header = None;
            continue;
        }

        let is_header = record.get(1) == Some("result") || record.get(0) == Some("error");
        if is_header {
            header = Some(record.iter().map(str::to_string).collect());
            continue;
        }

        let Some(columns) = header.as_ref() else {
            return Err(FetchError::Decode("data row before header".to_string()));
        };

        let row: FluxRow = columns
            .iter()
            .cloned()
            .zip(record.iter().map(str::to_string))
            .collect();

        if let Some(error) = row.get("error") {
            return Err(FetchError::Decode(format!("query error: {}", error)));
        }
        rows.push(row);
    }

    Ok(rows)
}

fn row_time(row: &FluxRow) -> Option<DateTime<Utc>> {
    let raw = row.get("_time")?;
    match DateTime::parse_from_rfc3339(raw) {
        Ok(time) => Some(time.with_timezone(&Utc)),
        Err(e) => {
            tracing::debug!(time = %raw, error = %e, "skipping row with unparseable time");
            None
        }
    }
}

fn row_value(row: &FluxRow, column: &str) -> Option<f64> {
    row.get(column)
        .filter(|v| !v.is_empty())
        .and_then(|v| v.parse::<f64>().ok())
}

fn rows_to_series(rows: &[FluxRow]) -> Series {
    let samples = rows
        .iter()
        .filter_map(|row| Some(Sample::new(row_time(row)?, row_value(row, "_value")?)))
        .collect();
    Series::new(samples)
}

/// Outer-join UV rows on timestamp. Accepts pivoted rows (one column per
/// field) as well as plain `_field`/`_value` rows.
fn rows_to_uv(rows: &[FluxRow]) -> UvSeries {
    let index_field = SensorKind::UvIndex.info().field;
    let raw_field = SensorKind::UvRaw.info().field;
    let mut joined: BTreeMap<DateTime<Utc>, UvReading> = BTreeMap::new();

    for row in rows {
        let Some(timestamp) = row_time(row) else {
            continue;
        };

        let (uv_index, uv_raw) = match row.get("_field").map(String::as_str) {
            Some(field) if field == index_field => (row_value(row, "_value"), None),
            Some(field) if field == raw_field => (None, row_value(row, "_value")),
            _ => (row_value(row, index_field), row_value(row, raw_field)),
        };

        let reading = joined.entry(timestamp).or_insert(UvReading {
            timestamp,
            uv_index: None,
            uv_raw: None,
        });
        reading.uv_index = uv_index.or(reading.uv_index);
        reading.uv_raw = uv_raw.or(reading.uv_raw);
    }

    UvSeries::new(joined.into_values().collect())
}
