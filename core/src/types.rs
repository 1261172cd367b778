//! Response DTOs for the registered notices API.
//!
//! # Design
//! Only the fields the client relies on are typed. Everything else the API
//! returns is kept in a flattened `extra` map, so a response can be printed
//! or compared without losing data when the upstream schema grows.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One page of `GET /` search results.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NoticeSearchResult {
    pub total_results: u64,
    #[serde(default)]
    pub companies: Vec<Company>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A company together with the notices registered for it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub business_id: RegisteredId,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub public_notices: Vec<PublicNotice>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The `businessId` object: the ID itself plus registration metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RegisteredId {
    pub value: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A single public notice, addressed by `"{year}/{number}"`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PublicNotice {
    pub record_number: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PublicNotice {
    /// Split `record_number` into the year and number used by
    /// `RegisteredNotices::get_public_notice`.
    pub fn record_key(&self) -> Option<(i32, &str)> {
        let (year, number) = self.record_number.split_once('/')?;
        Some((year.parse().ok()?, number))
    }
}
