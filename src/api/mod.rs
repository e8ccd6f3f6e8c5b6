//! Capsule CRM v2 Web API Module
//!
//! This module provides the client for the Capsule CRM v2 HTTP API:
//! a single request dispatcher handling URL construction, encoding
//! negotiation (JSON primary, XML legacy) and response interpretation,
//! plus the thin domain operations built on top of it.

pub mod client;
pub mod command;
pub mod constants;
pub mod error;
pub mod fields;
pub mod parties;
pub mod response;
pub mod xml;

pub use client::CapsuleClient;
pub use command::{Payload, Verb};
pub use error::ApiError;
pub use fields::FieldCache;
pub use response::ApiResponse;
