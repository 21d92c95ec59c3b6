use crate::record::tag_key;

use dicom_dictionary_std::tags;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("catalog returned status {status} for {url}")]
    Status { status: u16, url: String },

    #[error("malformed catalog response from {url}: {detail}")]
    MalformedBody { url: String, detail: String },
}

/// Summary fields of one series, enough to pick the series of interest.
#[derive(Debug, Clone)]
pub struct SeriesSummary {
    pub series_uid: String,
    pub modality: Option<String>,
    pub series_number: Option<i64>,
    pub description: Option<String>,
}

/// Client for the remote DICOM catalog (QIDO-RS query endpoints).
///
/// All operations are read-only, idempotent network calls. Any failure
/// aborts the current resolution attempt; retries for image bytes belong
/// to the transport layer, not here.
pub struct CatalogClient {
    http: reqwest::Client,
    base_url: String,
}

impl CatalogClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, CatalogError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// List the series belonging to a study.
    pub async fn list_series(&self, study: &str) -> Result<Vec<SeriesSummary>, CatalogError> {
        let url = format!("{}/studies/{study}/series", self.base_url);
        let body = self.get_json(&url).await?;
        parse_series_list(&body, &url)
    }

    /// List the instance identifiers of a series.
    pub async fn list_instances(
        &self,
        study: &str,
        series: &str,
    ) -> Result<Vec<String>, CatalogError> {
        let url = format!(
            "{}/studies/{study}/series/{series}/instances",
            self.base_url
        );
        let body = self.get_json(&url).await?;
        parse_instance_list(&body, &url)
    }

    /// Fetch the full per-attribute metadata document of one instance.
    pub async fn instance_metadata(
        &self,
        study: &str,
        series: &str,
        instance: &str,
    ) -> Result<Value, CatalogError> {
        let url = format!(
            "{}/studies/{study}/series/{series}/instances/{instance}/metadata",
            self.base_url
        );
        let body = self.get_json(&url).await?;
        // The metadata resource is an array holding one document per part.
        match body {
            Value::Array(mut parts) if !parts.is_empty() => Ok(parts.swap_remove(0)),
            Value::Object(_) => Ok(body),
            _ => Err(CatalogError::MalformedBody {
                url,
                detail: "expected a metadata document".into(),
            }),
        }
    }

    async fn get_json(&self, url: &str) -> Result<Value, CatalogError> {
        log::debug!("catalog GET {url}");
        let response = self
            .http
            .get(url)
            .header("Accept", "application/dicom+json")
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(CatalogError::Status {
                status: response.status().as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response.json().await?)
    }
}

fn parse_series_list(body: &Value, url: &str) -> Result<Vec<SeriesSummary>, CatalogError> {
    let entries = body.as_array().ok_or_else(|| CatalogError::MalformedBody {
        url: url.to_string(),
        detail: "expected a JSON array of series".into(),
    })?;

    entries
        .iter()
        .map(|entry| {
            let series_uid = first_string(entry, &tag_key(tags::SERIES_INSTANCE_UID))
                .ok_or_else(|| CatalogError::MalformedBody {
                    url: url.to_string(),
                    detail: "series entry without SeriesInstanceUID".into(),
                })?;
            Ok(SeriesSummary {
                series_uid,
                modality: first_string(entry, &tag_key(tags::MODALITY)),
                series_number: first_int(entry, &tag_key(tags::SERIES_NUMBER)),
                description: first_string(entry, &tag_key(tags::SERIES_DESCRIPTION)),
            })
        })
        .collect()
}

fn parse_instance_list(body: &Value, url: &str) -> Result<Vec<String>, CatalogError> {
    let entries = body.as_array().ok_or_else(|| CatalogError::MalformedBody {
        url: url.to_string(),
        detail: "expected a JSON array of instances".into(),
    })?;

    entries
        .iter()
        .map(|entry| {
            first_string(entry, &tag_key(tags::SOP_INSTANCE_UID)).ok_or_else(|| {
                CatalogError::MalformedBody {
                    url: url.to_string(),
                    detail: "instance entry without SOPInstanceUID".into(),
                }
            })
        })
        .collect()
}

fn first_value<'a>(entry: &'a Value, key: &str) -> Option<&'a Value> {
    entry.get(key)?.get("Value")?.get(0)
}

fn first_string(entry: &Value, key: &str) -> Option<String> {
    first_value(entry, key)?.as_str().map(str::to_string)
}

fn first_int(entry: &Value, key: &str) -> Option<i64> {
    let value = first_value(entry, key)?;
    value
        .as_i64()
        .or_else(|| value.as_str()?.trim().parse().ok())
}
