use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use super::AdminState;
use crate::refresh::{RefreshEvent, RefreshSource, RefreshState, SignalDisposition};
use crate::routing::{ResolvedRoute, RouteEntry};
use crate::store::RouteRecord;

#[derive(Serialize)]
pub struct SystemStatus {
    pub version: &'static str,
    pub state: RefreshState,
    pub generation: u64,
    pub routes: usize,
    pub records: usize,
    pub degraded: bool,
    /// Seconds since the unix epoch.
    pub built_at: u64,
}

#[derive(Serialize)]
pub struct RouteView {
    pub key: String,
    #[serde(flatten)]
    pub entry: RouteEntry,
}

#[derive(Serialize)]
pub struct RefreshAccepted {
    pub disposition: SignalDisposition,
}

#[derive(Deserialize)]
pub struct ResolveQuery {
    pub path: String,
}

pub async fn get_status(State(state): State<AdminState>) -> Json<SystemStatus> {
    let table = state.controller.current_table();
    let built_at = table
        .built_at()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        state: state.controller.state(),
        generation: table.generation(),
        routes: table.len(),
        records: table.records().len(),
        degraded: table.is_degraded(),
        built_at,
    })
}

pub async fn get_routes(State(state): State<AdminState>) -> Json<Vec<RouteView>> {
    let table = state.controller.current_table();
    Json(
        table
            .routes()
            .map(|(key, entry)| RouteView {
                key: key.to_string(),
                entry: entry.clone(),
            })
            .collect(),
    )
}

pub async fn get_records(State(state): State<AdminState>) -> Json<Vec<RouteRecord>> {
    Json(state.controller.current_table().records().to_vec())
}

pub async fn post_refresh(State(state): State<AdminState>) -> (StatusCode, Json<RefreshAccepted>) {
    let disposition = state.refresh.request(RefreshEvent::new(RefreshSource::Admin));
    let status = match disposition {
        SignalDisposition::Closed => StatusCode::SERVICE_UNAVAILABLE,
        SignalDisposition::Queued | SignalDisposition::Coalesced => StatusCode::ACCEPTED,
    };
    (status, Json(RefreshAccepted { disposition }))
}

pub async fn get_resolve(
    State(state): State<AdminState>,
    Query(query): Query<ResolveQuery>,
) -> Result<Json<ResolvedRoute>, StatusCode> {
    state
        .resolver
        .resolve(&query.path)
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}
