use super::command::{Payload, Verb};
use super::constants::{self, headers};
use super::error::ApiError;
use super::fields::FieldCache;
use super::response::ApiResponse;
use super::xml;
use crate::config::{Config, Representation};
use log::debug;
use serde_json::Value;
use std::sync::Mutex;
use std::time::Duration;

/// Capsule CRM v2 API client with connection pooling.
///
/// One instance per CRM account session; created once and reused for
/// all calls. All domain operations funnel through [`CapsuleClient::send`].
pub struct CapsuleClient {
    host: String,
    token: String,
    debug: bool,
    representation: Representation,
    http_client: reqwest::Client,
    last_error: Mutex<Option<String>>,
    field_cache: FieldCache,
}

impl CapsuleClient {
    pub fn new(config: Config) -> Self {
        let http_client = reqwest::Client::builder()
            .pool_max_idle_per_host(10)           // Max idle connections per host
            .pool_idle_timeout(Duration::from_secs(90))  // Keep connections alive for 90s
            .timeout(Duration::from_secs(30))     // Request timeout
            .connect_timeout(Duration::from_secs(10))    // Connection timeout
            .user_agent("capsule-client/1.0")     // Custom user agent
            .build()
            .expect("Failed to build HTTP client");

        Self {
            host: config.host,
            token: config.token,
            debug: config.debug,
            representation: config.representation,
            http_client,
            last_error: Mutex::new(None),
            field_cache: FieldCache::new(),
        }
    }

    /// Create a new client with custom HTTP client configuration
    pub fn with_custom_client(config: Config, http_client: reqwest::Client) -> Self {
        Self {
            host: config.host,
            token: config.token,
            debug: config.debug,
            representation: config.representation,
            http_client,
            last_error: Mutex::new(None),
            field_cache: FieldCache::new(),
        }
    }

    /// Create a client from `CAPSULE_*` environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self::new(Config::from_env()?))
    }

    /// Status line of the most recent failed call, if any.
    ///
    /// Derived from the dispatcher's error returns; overwritten by every
    /// failing call and never cleared on success.
    pub fn last_error(&self) -> Option<String> {
        self.last_error.lock().unwrap().clone()
    }

    pub(crate) fn representation(&self) -> Representation {
        self.representation
    }

    pub(crate) fn field_cache(&self) -> &FieldCache {
        &self.field_cache
    }

    /// Dispatch one command against the API.
    ///
    /// Builds `https://{host}/api/v2/{command}`, applies the verb- and
    /// payload-specific encoding and headers, sends the request, and
    /// interprets the response. The await covers the full response; no
    /// retries, no pipelining.
    pub async fn send(
        &self,
        command: &str,
        verb: Verb,
        payload: Option<Payload>,
    ) -> Result<ApiResponse, ApiError> {
        let url = constants::command_endpoint(&self.host, command);
        let mut xml_requested = false;

        let request = match verb {
            Verb::Get => {
                let mut request = self.http_client.get(&url);
                // GET content only ever shapes the query string
                if let Some(Payload::Json(value)) = &payload {
                    let params = query_params(value);
                    if self.debug {
                        debug!("GET {} query: {:?}", url, params);
                    }
                    request = request.query(&params);
                }
                request
            }
            Verb::Put => {
                let body = match &payload {
                    Some(Payload::Json(value)) => serde_json::to_string(value)?,
                    Some(Payload::Xml { value, .. }) => serde_json::to_string(value)?,
                    None => String::new(),
                };
                if self.debug {
                    debug!("PUT {} body: {}", url, body);
                }
                // No Accept header on PUT
                self.http_client
                    .put(&url)
                    .header("Content-Type", headers::CONTENT_TYPE_JSON)
                    .body(body)
            }
            Verb::Post => match &payload {
                Some(Payload::Xml { root, value }) => {
                    xml_requested = true;
                    let body = xml::to_xml(root, value)?;
                    if self.debug {
                        debug!("POST {} body: {}", url, body);
                    }
                    self.http_client
                        .post(&url)
                        .header("Accept", headers::CONTENT_TYPE_XML)
                        .header("Content-Type", headers::CONTENT_TYPE_XML)
                        .body(body)
                }
                Some(Payload::Json(value)) => {
                    let body = serde_json::to_string(value)?;
                    if self.debug {
                        debug!("POST {} body: {}", url, body);
                    }
                    self.http_client
                        .post(&url)
                        .header("Accept", headers::CONTENT_TYPE_JSON)
                        .header("Content-Type", headers::CONTENT_TYPE_JSON)
                        .body(body)
                }
                None => {
                    if self.debug {
                        debug!("POST {} (empty body)", url);
                    }
                    self.http_client
                        .post(&url)
                        .header("Accept", headers::CONTENT_TYPE_JSON)
                        .header("Content-Type", headers::CONTENT_TYPE_JSON)
                }
            },
        };

        let response = request
            .header("Host", headers::HOST)
            .bearer_auth(&self.token)
            .send()
            .await?;

        self.interpret(response, xml_requested).await
    }

    /// Interpret a response into an [`ApiResponse`] or an [`ApiError`].
    async fn interpret(
        &self,
        response: reqwest::Response,
        xml_requested: bool,
    ) -> Result<ApiResponse, ApiError> {
        let status = response.status();

        if !status.is_success() {
            let status_line = format!(
                "{} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("")
            )
            .trim_end()
            .to_string();
            if self.debug {
                debug!("request failed: {}", status_line);
            }
            *self.last_error.lock().unwrap() = Some(status_line.clone());
            // Body of a failed response is never decoded
            return Err(ApiError::Http {
                status: status_line,
            });
        }

        if status == reqwest::StatusCode::CREATED {
            let created_id = response
                .headers()
                .get(reqwest::header::LOCATION)
                .and_then(|value| value.to_str().ok())
                .and_then(location_tail);
            // The body of a 201 is ignored; a 201 without a Location
            // header falls through to plain body interpretation
            if let Some(id) = created_id {
                if self.debug {
                    debug!("created resource {}", id);
                }
                return Ok(ApiResponse::Created(id));
            }
        }

        let body = response.text().await?;
        if self.debug {
            debug!("response {}: {}", status, body);
        }

        if body.trim().is_empty() {
            return Ok(ApiResponse::NoContent);
        }

        if xml_requested {
            let (_, value) = xml::from_xml(&body)?;
            Ok(ApiResponse::Xml(value))
        } else {
            Ok(ApiResponse::Json(serde_json::from_str(&body)?))
        }
    }
}

/// Flatten a JSON object into query parameters.
///
/// Strings go through verbatim; other scalars use their JSON rendering.
pub(crate) fn query_params(value: &Value) -> Vec<(String, String)> {
    match value.as_object() {
        Some(map) => map
            .iter()
            .map(|(key, value)| {
                let rendered = match value {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                (key.clone(), rendered)
            })
            .collect(),
        None => Vec::new(),
    }
}

/// Trailing path segment of a Location header value.
pub(crate) fn location_tail(location: &str) -> Option<String> {
    location
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn location_tail_takes_the_last_segment() {
        assert_eq!(
            location_tail("https://api2.capsulecrm.com/api/v2/person/12345"),
            Some("12345".to_string())
        );
        assert_eq!(
            location_tail("https://api2.capsulecrm.com/api/v2/person/12345/"),
            Some("12345".to_string())
        );
        assert_eq!(location_tail(""), None);
    }

    #[test]
    fn query_params_render_scalars_without_json_quoting() {
        let params = query_params(&json!({"q": "Acme"}));
        assert_eq!(params, vec![("q".to_string(), "Acme".to_string())]);

        let params = query_params(&json!({"email": "c@example.com", "start": 0}));
        assert!(params.contains(&("email".to_string(), "c@example.com".to_string())));
        assert!(params.contains(&("start".to_string(), "0".to_string())));
    }

    #[test]
    fn query_params_ignore_non_objects() {
        assert!(query_params(&json!("Acme")).is_empty());
    }
}
