//! Client library for the Capsule CRM v2 HTTP API.
//!
//! Authenticates with a bearer token, issues GET/POST/PUT requests
//! against the versioned REST endpoint, negotiates JSON (primary) or
//! XML (legacy) encoding, and exposes party search/lookup/creation,
//! tagging and custom-field-definition retrieval with caching.
//!
//! ```no_run
//! use capsule_client::{CapsuleClient, Config};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let client = CapsuleClient::new(Config::new("my-api-token"));
//!
//! let matches = client.search_parties("Acme").await?;
//! println!("{} parties matched", matches.len());
//!
//! if let Some(id) = client.find_party_by_email("eric@thecrow.com").await? {
//!     client.add_tag(&id, &["customer"]).await?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;

pub use api::{ApiError, ApiResponse, CapsuleClient, Payload, Verb};
pub use config::{Config, Representation};
