//! API Constants and Configuration for the Capsule CRM v2 API

/// Capsule CRM API version
pub const API_VERSION: &str = "v2";

/// Base API path for Capsule CRM
pub const API_BASE_PATH: &str = "/api";

/// Default API host for Capsule CRM accounts
pub const DEFAULT_HOST: &str = "api2.capsulecrm.com";

/// Full API path with version
pub fn api_path() -> String {
    format!("{}/{}", API_BASE_PATH, API_VERSION)
}

/// Standard headers for Capsule CRM requests
pub mod headers {
    /// Fixed Host header sent on every request
    pub const HOST: &str = "api.capsulecrm.com";

    /// Content type for JSON requests
    pub const CONTENT_TYPE_JSON: &str = "application/json";

    /// Content type for legacy XML requests
    pub const CONTENT_TYPE_XML: &str = "text/xml";
}

/// Build the full URL for a command
pub fn command_endpoint(host: &str, command: &str) -> String {
    format!("https://{}{}/{}", host, api_path(), command)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_endpoint_includes_versioned_path() {
        assert_eq!(
            command_endpoint(DEFAULT_HOST, "parties/search"),
            "https://api2.capsulecrm.com/api/v2/parties/search"
        );
    }
}
