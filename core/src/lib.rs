//! Client core for the PRH Registered Notices open-data API.
//!
//! # Overview
//! Validates business IDs and code-list values locally, builds JSON HTTP
//! requests against a base URL, and turns responses into typed results or
//! structured errors.
//!
//! # Design
//! - `HttpClient` holds only a base URL, default headers and a `Transport`;
//!   it carries no mutable state between calls.
//! - Each call is split into `build_request` (pure), `Transport::execute`
//!   (I/O) and `parse_response` (pure), so tests can replace the network.
//! - `RegisteredNotices` embeds an `HttpClient` rather than extending it.
//! - Validators are free functions with no dependencies on the client.

pub mod client;
pub mod codes;
pub mod error;
pub mod http;
pub mod notices;
pub mod types;
pub mod validation;

pub use client::{parse_response, HttpClient, RequestOptions};
pub use codes::{Enumeration, CODE_LIST, LANGUAGE};
pub use error::{ApiError, ValidationError};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport, UreqTransport};
pub use notices::{RegisteredNotices, SearchQuery, DEFAULT_BASE_URL};
pub use types::{Company, NoticeSearchResult, PublicNotice, RegisteredId};
pub use validation::{
    business_id_check_digit, validate_business_id, validate_enumeration, validate_enumeration_value,
};
