use crate::app_config::OfficeConfig;
use crate::office::registry::OfficeRegistry;
use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::fmt::Debug;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, instrument};

/// Placeholder shown when no office name is known.
pub const UNKNOWN_OFFICE: &str = "-";

pub const DEFAULT_REMOTE_TIMEOUT: Duration = Duration::from_secs(10);

/// The office a pair of coordinates belongs to, together with the coordinates it was resolved for.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OfficeName {
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[async_trait]
pub trait OfficeLookup: Debug + Send + Sync {
    async fn office_name(&self, latitude: f64, longitude: f64) -> Result<OfficeName, OfficeLookupError>;
}

#[derive(Error, Debug)]
pub enum OfficeLookupError {
    #[error("request error: {0}")]
    RequestError(#[from] reqwest::Error),
    #[error("office lookup is not configured: {0}")]
    NotConfigured(String),
}

#[async_trait]
impl OfficeLookup for OfficeRegistry {
    async fn office_name(&self, latitude: f64, longitude: f64) -> Result<OfficeName, OfficeLookupError> {
        Ok(OfficeRegistry::office_name(self, latitude, longitude))
    }
}

/// Asks the attendance server which office the coordinates belong to.
#[derive(Debug)]
pub struct RemoteOfficeLookup {
    client: Client,
    url: String,
}

impl RemoteOfficeLookup {
    pub fn new(config: &OfficeConfig) -> Result<Self, OfficeLookupError> {
        let base_url = config
            .remote_url()
            .ok_or_else(|| OfficeLookupError::NotConfigured("office.remote_url is missing".to_string()))?;
        let client = Client::builder().timeout(config.remote_timeout()).build()?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        RemoteOfficeLookup {
            client,
            url: format!("{}/attendance_ctrl/get_name", base_url.trim_end_matches('/')),
        }
    }
}

#[async_trait]
impl OfficeLookup for RemoteOfficeLookup {
    #[instrument(skip(self))]
    async fn office_name(&self, latitude: f64, longitude: f64) -> Result<OfficeName, OfficeLookupError> {
        let payload = json!({
            "jsonrpc": "2.0",
            "method": "call",
            "params": { "latitude": latitude, "longitude": longitude },
            "id": Utc::now().timestamp_millis(),
        });

        debug!("🏢 Looking up office...");
        let reply = self
            .client
            .post(&self.url)
            .json(&payload)
            .send()
            .await?
            .error_for_status()?
            .json::<Value>()
            .await?;

        let name = parse_reply(reply, latitude, longitude);
        debug!(office = name.location, "🏢 Looking up office... OK");
        Ok(name)
    }
}

/// Reads the office from either a JSON-RPC envelope or a bare result object. Missing fields fall
/// back to the placeholder name and the requested coordinates.
fn parse_reply(reply: Value, latitude: f64, longitude: f64) -> OfficeName {
    let result = match reply {
        Value::Object(mut envelope) if envelope.get("result").is_some_and(|result| !result.is_null()) => envelope.remove("result").unwrap_or_default(),
        other => other,
    };

    OfficeName {
        location: result.get("location").and_then(Value::as_str).unwrap_or(UNKNOWN_OFFICE).to_string(),
        latitude: result.get("latitude").and_then(Value::as_f64).unwrap_or(latitude),
        longitude: result.get("longitude").and_then(Value::as_f64).unwrap_or(longitude),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_config::AppConfigBuilder;
    use mockito::Matcher;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[tokio::test]
    async fn posts_a_json_rpc_call_and_reads_the_result() -> Result<(), OfficeLookupError> {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock("POST", "/attendance_ctrl/get_name")
            .match_header("content-type", "application/json")
            .match_body(Matcher::PartialJson(json!({
                "jsonrpc": "2.0",
                "method": "call",
                "params": { "latitude": -6.2, "longitude": 106.816666 }
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"jsonrpc": "2.0", "id": 1, "result": {"location": "Head Office", "latitude": -6.2, "longitude": 106.816666}}"#)
            .create_async()
            .await;

        let config = AppConfigBuilder::new().remote_url(server.url()).build();
        let lookup = RemoteOfficeLookup::new(config.office())?;

        let name = lookup.office_name(-6.2, 106.816666).await?;

        mock.assert();
        assert_eq!(
            name,
            OfficeName {
                location: "Head Office".to_string(),
                latitude: -6.2,
                longitude: 106.816666,
            }
        );

        Ok(())
    }

    #[tokio::test]
    async fn fails_on_an_error_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server.mock("POST", "/attendance_ctrl/get_name").with_status(500).create_async().await;

        let lookup = RemoteOfficeLookup::with_client(Client::new(), &format!("{}/", server.url()));
        let result = lookup.office_name(1.0, 2.0).await;

        assert!(matches!(result, Err(OfficeLookupError::RequestError(_))));
    }

    #[test]
    fn requires_a_remote_url() {
        let config = AppConfigBuilder::new().build();
        let result = RemoteOfficeLookup::new(config.office());
        assert!(matches!(result, Err(OfficeLookupError::NotConfigured(_))));
    }

    #[rstest]
    #[case::bare_result(json!({"location": "Annex", "latitude": 1.5, "longitude": 2.5}), "Annex", 1.5, 2.5)]
    #[case::missing_coordinates(json!({"result": {"location": "Annex"}}), "Annex", 1.0, 2.0)]
    #[case::error_reply(json!({"jsonrpc": "2.0", "error": {"code": 200}}), UNKNOWN_OFFICE, 1.0, 2.0)]
    #[case::null_result(json!({"result": null}), UNKNOWN_OFFICE, 1.0, 2.0)]
    #[case::not_an_object(json!("Head Office"), UNKNOWN_OFFICE, 1.0, 2.0)]
    fn parses_replies(#[case] reply: Value, #[case] location: &str, #[case] latitude: f64, #[case] longitude: f64) {
        let name = parse_reply(reply, 1.0, 2.0);
        assert_eq!(
            name,
            OfficeName {
                location: location.to_string(),
                latitude,
                longitude,
            }
        );
    }

    #[tokio::test]
    async fn the_registry_answers_locally() -> Result<(), OfficeLookupError> {
        let registry = OfficeRegistry::new(vec![], 5.0);
        let name = OfficeLookup::office_name(&registry, 1.0, 2.0).await?;
        assert_eq!(name.location, "Outside Office");
        Ok(())
    }
}
