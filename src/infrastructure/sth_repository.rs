// STH Comet repository implementation
use crate::application::environment_repository::EnvironmentRepository;
use crate::domain::environment::{Attribute, Reading};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

const VALUES_POINTER: &str = "/contextResponses/0/contextElement/attributes/0/values";

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawValue {
    attr_value: Value,
    recv_time: String,
}

impl RawValue {
    /// STH reports attrValue either as a JSON number or as a numeric string
    fn numeric(&self) -> Option<f64> {
        match &self.attr_value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SthRepository {
    client: reqwest::Client,
    base_url: String,
    entity_type: String,
    entity_id: String,
    service: String,
    service_path: String,
}

impl SthRepository {
    pub fn new(
        base_url: String,
        entity_type: String,
        entity_id: String,
        service: String,
        service_path: String,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            entity_type,
            entity_id,
            service,
            service_path,
        })
    }

    fn build_url(&self, attribute: Attribute) -> String {
        format!(
            "{}/STH/v1/contextEntities/type/{}/id/{}/attributes/{}",
            self.base_url,
            self.entity_type,
            self.entity_id,
            attribute.path()
        )
    }

    async fn try_fetch(&self, attribute: Attribute, last_n: u32) -> Result<Vec<Reading>, SourceError> {
        let url = self.build_url(attribute);

        let response = self
            .client
            .get(&url)
            .query(&[("lastN", last_n)])
            .header("fiware-service", &self.service)
            .header("fiware-servicepath", &self.service_path)
            .send()
            .await
            .map_err(|e| SourceError::SourceUnavailable(format!("request to {url} failed: {e}")))?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(SourceError::SourceUnavailable(format!(
                "{url} answered {status}"
            )));
        }

        let body = response
            .json::<Value>()
            .await
            .map_err(|e| SourceError::MalformedResponse(format!("body is not JSON: {e}")))?;

        extract_readings(&body)
    }
}

/// Pull the flat `{attrValue, recvTime}` list out of the STH envelope
pub fn extract_readings(body: &Value) -> Result<Vec<Reading>, SourceError> {
    let values = body
        .pointer(VALUES_POINTER)
        .ok_or_else(|| SourceError::MalformedResponse(format!("missing {VALUES_POINTER}")))?;

    let raw: Vec<RawValue> = serde_json::from_value(values.clone())
        .map_err(|e| SourceError::MalformedResponse(format!("unexpected values shape: {e}")))?;

    raw.into_iter()
        .map(|v| -> Result<Reading, SourceError> {
            let value = v.numeric().ok_or_else(|| {
                SourceError::MalformedResponse(format!("non-numeric attrValue {}", v.attr_value))
            })?;
            Ok(Reading::new(v.recv_time, value))
        })
        .collect()
}

#[async_trait]
impl EnvironmentRepository for SthRepository {
    async fn fetch(&self, attribute: Attribute, last_n: u32) -> Vec<Reading> {
        match self.try_fetch(attribute, last_n).await {
            Ok(readings) => {
                tracing::debug!(%attribute, count = readings.len(), "Fetched readings");
                readings
            }
            Err(e) => {
                tracing::warn!(%attribute, error = %e, "Fetch failed, treating as empty");
                Vec::new()
            }
        }
    }
}
