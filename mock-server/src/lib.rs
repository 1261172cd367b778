use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::net::TcpListener;

pub const PAGE_SIZE: usize = 50;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub business_id: BusinessId,
    pub names: Vec<CompanyName>,
    pub public_notices: Vec<Notice>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessId {
    pub value: String,
    pub registration_date: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CompanyName {
    pub name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    pub record_number: String,
    pub registration_date: String,
    pub type_of_registration: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPage {
    pub total_results: usize,
    pub companies: Vec<Company>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    pub page: Option<usize>,
    pub name: Option<String>,
    pub business_id: Option<String>,
}

#[derive(Deserialize)]
pub struct DescriptionParams {
    pub code: String,
    pub lang: String,
}

/// Read-only register keyed by business ID.
pub type Db = Arc<BTreeMap<String, Company>>;

pub fn app() -> Router {
    app_with(seed())
}

pub fn app_with(companies: Vec<Company>) -> Router {
    let db: Db = Arc::new(
        companies
            .into_iter()
            .map(|c| (c.business_id.value.clone(), c))
            .collect(),
    );
    Router::new()
        .route("/", get(search))
        .route("/description", get(descriptions))
        .route("/publicnotices/{year}/{number}", get(get_notice))
        .route("/{business_id}", get(get_company))
        .route("/echo", get(echo).post(echo).put(echo).delete(no_content))
        .route("/status/{code}", get(status))
        .route("/empty", get(empty))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// A small fixed register with valid business IDs.
pub fn seed() -> Vec<Company> {
    vec![
        company("0112038-9", "Nokia Oyj", &[("2024/100001", "muutos")]),
        company("1234567-1", "Esimerkki Oy", &[]),
        company("0737546-2", "Testi Ab", &[("2023/000042", "perustaminen"), ("2024/000777", "muutos")]),
    ]
}

fn company(id: &str, name: &str, notices: &[(&str, &str)]) -> Company {
    Company {
        business_id: BusinessId {
            value: id.to_string(),
            registration_date: "2001-01-01".to_string(),
        },
        names: vec![CompanyName { name: name.to_string() }],
        public_notices: notices
            .iter()
            .map(|(record, kind)| Notice {
                record_number: record.to_string(),
                registration_date: format!("{}-06-30", &record[..4]),
                type_of_registration: kind.to_string(),
            })
            .collect(),
    }
}

async fn search(State(db): State<Db>, Query(params): Query<SearchParams>) -> Json<SearchPage> {
    let matching: Vec<&Company> = db
        .values()
        .filter(|c| {
            params
                .business_id
                .as_ref()
                .map_or(true, |id| &c.business_id.value == id)
        })
        .filter(|c| {
            params.name.as_ref().map_or(true, |name| {
                let needle = name.to_lowercase();
                c.names.iter().any(|n| n.name.to_lowercase().contains(&needle))
            })
        })
        .collect();
    let page = params.page.unwrap_or(1).max(1);
    let companies = matching
        .iter()
        .skip((page - 1) * PAGE_SIZE)
        .take(PAGE_SIZE)
        .map(|c| (*c).clone())
        .collect();
    Json(SearchPage {
        total_results: matching.len(),
        companies,
    })
}

async fn get_company(
    State(db): State<Db>,
    Path(business_id): Path<String>,
) -> Result<Json<Company>, (StatusCode, String)> {
    db.get(&business_id)
        .cloned()
        .map(Json)
        .ok_or((StatusCode::NOT_FOUND, format!("company {business_id} not found")))
}

async fn get_notice(
    State(db): State<Db>,
    Path((year, number)): Path<(i32, String)>,
) -> Result<Json<Notice>, (StatusCode, String)> {
    let record = format!("{year}/{number}");
    db.values()
        .flat_map(|c| c.public_notices.iter())
        .find(|n| n.record_number == record)
        .cloned()
        .map(Json)
        .ok_or((StatusCode::NOT_FOUND, format!("notice {record} not found")))
}

async fn descriptions(Query(params): Query<DescriptionParams>) -> Result<Json<Value>, (StatusCode, String)> {
    let entries = match (params.code.as_str(), params.lang.as_str()) {
        ("CF", "FI") => json!([{ "code": "OY", "description": "Osakeyhtiö" }]),
        ("CF", "SV") => json!([{ "code": "OY", "description": "Aktiebolag" }]),
        ("CF", "EN") => json!([{ "code": "OY", "description": "Limited company" }]),
        ("EC" | "NRT", "FI" | "SV" | "EN") => json!([]),
        _ => return Err((StatusCode::BAD_REQUEST, "unknown code or language".to_string())),
    };
    Ok(Json(entries))
}

/// Reflects the request back so clients can check what they sent.
async fn echo(method: Method, headers: HeaderMap, body: String) -> Json<Value> {
    let headers: BTreeMap<String, String> = headers
        .iter()
        .map(|(k, v)| (k.as_str().to_string(), v.to_str().unwrap_or_default().to_string()))
        .collect();
    let body = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_str(&body).unwrap_or(Value::String(body))
    };
    Json(json!({ "method": method.as_str(), "headers": headers, "body": body }))
}

async fn no_content() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn status(Path(code): Path<u16>) -> Response {
    let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    if status == StatusCode::NO_CONTENT {
        return status.into_response();
    }
    (status, format!("status {code}")).into_response()
}

async fn empty() -> StatusCode {
    StatusCode::OK
}
