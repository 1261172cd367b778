//! Endpoint wrapper for the PRH Registered Notices open-data API.
//!
//! Data is provided by the Finnish Patent and Registration Office under
//! CC BY 4.0. Every operation validates its input locally, then performs a
//! single GET through the embedded `HttpClient`.

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::form_urlencoded;

use crate::client::{HttpClient, RequestOptions};
use crate::codes::{Enumeration, CODE_LIST, LANGUAGE};
use crate::error::{ApiError, ValidationError};
use crate::http::{Transport, UreqTransport};
use crate::types::{Company, NoticeSearchResult, PublicNotice};
use crate::validation::{validate_business_id, validate_enumeration};

/// Bytes escaped inside a single path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

pub const DEFAULT_BASE_URL: &str = "https://avoindata.prh.fi/opendata-registerednotices-api/v3";

/// Filters for `RegisteredNotices::search`. Unset fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    pub page: Option<u32>,
    pub name: Option<String>,
    pub business_id: Option<String>,
}

impl SearchQuery {
    fn to_query_string(&self) -> String {
        let mut query = form_urlencoded::Serializer::new(String::new());
        if let Some(page) = self.page {
            query.append_pair("page", &page.to_string());
        }
        if let Some(name) = &self.name {
            query.append_pair("name", name);
        }
        if let Some(business_id) = &self.business_id {
            query.append_pair("businessId", business_id);
        }
        query.finish()
    }
}

/// Client for the registered notices endpoints.
#[derive(Debug, Clone)]
pub struct RegisteredNotices<T = UreqTransport> {
    http: HttpClient<T>,
    options: RequestOptions,
}

impl RegisteredNotices<UreqTransport> {
    pub fn new() -> Self {
        Self::with_client(HttpClient::new(DEFAULT_BASE_URL))
    }
}

impl Default for RegisteredNotices<UreqTransport> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Transport> RegisteredNotices<T> {
    pub fn with_client(http: HttpClient<T>) -> Self {
        Self {
            http,
            options: RequestOptions::default(),
        }
    }

    /// Options applied to every request, e.g. a timeout.
    pub fn with_options(mut self, options: RequestOptions) -> Self {
        self.options = options;
        self
    }

    pub fn http(&self) -> &HttpClient<T> {
        &self.http
    }

    pub fn search(&self, query: &SearchQuery) -> Result<NoticeSearchResult, ApiError> {
        if let Some(business_id) = &query.business_id {
            check_business_id(business_id)?;
        }
        let query_string = query.to_query_string();
        let path = if query_string.is_empty() {
            "/".to_string()
        } else {
            format!("/?{query_string}")
        };
        self.fetch(&path)
    }

    pub fn get_company(&self, business_id: &str) -> Result<Company, ApiError> {
        check_business_id(business_id)?;
        self.fetch(&format!("/{business_id}"))
    }

    pub fn get_public_notice(&self, record_year: i32, record_number: &str) -> Result<PublicNotice, ApiError> {
        if record_number.is_empty() {
            return Err(ValidationError::EmptyRecordNumber.into());
        }
        let number = utf8_percent_encode(record_number, PATH_SEGMENT);
        self.fetch(&format!("/publicnotices/{record_year}/{number}"))
    }

    /// Descriptions of every code in `code` (a `CODE_LIST` code) in
    /// `language` (a `LANGUAGE` code).
    pub fn get_code_descriptions(&self, code: &str, language: &str) -> Result<Value, ApiError> {
        check_code(&CODE_LIST, code)?;
        check_code(&LANGUAGE, language)?;
        let query: String = form_urlencoded::Serializer::new(String::new())
            .append_pair("code", code)
            .append_pair("lang", language)
            .finish();
        self.fetch(&format!("/description?{query}"))
    }

    fn fetch<R: DeserializeOwned>(&self, path: &str) -> Result<R, ApiError> {
        self.http
            .get(path, &self.options)?
            .ok_or_else(|| ApiError::Deserialization(format!("empty response from {path}")))
    }
}

fn check_business_id(business_id: &str) -> Result<(), ValidationError> {
    if validate_business_id(business_id) {
        Ok(())
    } else {
        Err(ValidationError::InvalidBusinessId(business_id.to_string()))
    }
}

fn check_code(enumeration: &Enumeration, value: &str) -> Result<(), ValidationError> {
    if validate_enumeration(enumeration, value) {
        Ok(())
    } else {
        Err(ValidationError::InvalidCode {
            enumeration: enumeration.name(),
            value: value.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use serde_json::json;

    use super::*;
    use crate::http::{HttpRequest, HttpResponse};

    #[derive(Default)]
    struct Recorder {
        body: String,
        urls: Mutex<Vec<String>>,
    }

    impl Transport for Recorder {
        fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
            self.urls.lock().unwrap().push(request.url.clone());
            Ok(HttpResponse {
                status: 200,
                headers: Vec::new(),
                body: self.body.clone(),
            })
        }
    }

    fn notices(body: serde_json::Value) -> RegisteredNotices<Recorder> {
        let recorder = Recorder {
            body: body.to_string(),
            ..Recorder::default()
        };
        RegisteredNotices::with_client(HttpClient::with_transport("https://prh.test/v3", Vec::new(), recorder))
    }

    fn urls(n: &RegisteredNotices<Recorder>) -> Vec<String> {
        n.http().transport().urls.lock().unwrap().clone()
    }

    #[test]
    fn search_without_filters_hits_root() {
        let n = notices(json!({ "totalResults": 0, "companies": [] }));
        let result = n.search(&SearchQuery::default()).unwrap();
        assert_eq!(result.total_results, 0);
        assert_eq!(urls(&n), ["https://prh.test/v3/"]);
    }

    #[test]
    fn search_encodes_filters() {
        let n = notices(json!({ "totalResults": 0, "companies": [] }));
        let query = SearchQuery {
            page: Some(2),
            name: Some("Oy Ä & B".to_string()),
            business_id: None,
        };
        n.search(&query).unwrap();
        assert_eq!(urls(&n), ["https://prh.test/v3/?page=2&name=Oy+%C3%84+%26+B"]);
    }

    #[test]
    fn search_rejects_bad_business_id_filter() {
        let n = notices(json!({}));
        let query = SearchQuery {
            business_id: Some("1234567-8".to_string()),
            ..SearchQuery::default()
        };
        let err = n.search(&query).unwrap_err();
        assert!(matches!(err, ApiError::Validation(ValidationError::InvalidBusinessId(_))));
        assert!(urls(&n).is_empty());
    }

    #[test]
    fn get_company_validates_before_sending() {
        let n = notices(json!({ "businessId": { "value": "1234567-1" } }));
        let err = n.get_company("invalid-id").unwrap_err();
        assert!(matches!(err, ApiError::Validation(ValidationError::InvalidBusinessId(ref id)) if id == "invalid-id"));
        assert!(urls(&n).is_empty());

        let company = n.get_company("1234567-1").unwrap();
        assert_eq!(company.business_id.value, "1234567-1");
        assert_eq!(urls(&n), ["https://prh.test/v3/1234567-1"]);
    }

    #[test]
    fn get_public_notice_builds_path() {
        let n = notices(json!({ "recordNumber": "2024/000123" }));
        let notice = n.get_public_notice(2024, "000123").unwrap();
        assert_eq!(notice.record_number, "2024/000123");
        assert_eq!(urls(&n), ["https://prh.test/v3/publicnotices/2024/000123"]);
    }

    #[test]
    fn record_number_is_escaped_as_one_path_segment() {
        let n = notices(json!({ "recordNumber": "2024/12 3" }));
        n.get_public_notice(2024, "12 3/4+5").unwrap();
        assert_eq!(urls(&n), ["https://prh.test/v3/publicnotices/2024/12%203%2F4+5"]);
    }

    #[test]
    fn get_public_notice_rejects_empty_number() {
        let n = notices(json!({}));
        let err = n.get_public_notice(2024, "").unwrap_err();
        assert!(matches!(err, ApiError::Validation(ValidationError::EmptyRecordNumber)));
        assert!(urls(&n).is_empty());
    }

    #[test]
    fn code_descriptions_validate_both_codes() {
        let n = notices(json!([{ "code": "OY", "description": "Osakeyhtiö" }]));

        let err = n.get_code_descriptions("INVALID_CODE", "FI").unwrap_err();
        assert_eq!(err.to_string(), "invalid code list: INVALID_CODE");
        let err = n.get_code_descriptions("CF", "INVALID_LANGUAGE").unwrap_err();
        assert_eq!(err.to_string(), "invalid language: INVALID_LANGUAGE");
        assert!(urls(&n).is_empty());

        let value = n.get_code_descriptions("CF", "FI").unwrap();
        assert_eq!(value[0]["code"], "OY");
        assert_eq!(urls(&n), ["https://prh.test/v3/description?code=CF&lang=FI"]);
    }

    #[test]
    fn empty_document_is_an_error() {
        let recorder = Recorder::default();
        let n = RegisteredNotices::with_client(HttpClient::with_transport("https://prh.test/v3", Vec::new(), recorder));
        let err = n.get_company("1234567-1").unwrap_err();
        assert!(matches!(err, ApiError::Deserialization(_)));
    }
}
