///! HTTP service - read-only query API over the cached snapshot
///!
///! `GET /api/listings` filters, sorts, and paginates the latest snapshot.
///! Bad `since`/`sort` values degrade to a disabled filter, never a 4xx;
///! the only "no data" shape is an empty result with a null last_updated.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::module::pf::query::{
    self, ListingQuery, DEFAULT_LIMIT, DEFAULT_SORT, MAX_LIMIT,
};
use crate::module::pf::{Listing, SnapshotStore};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<SnapshotStore>,
}

/// Raw query-string parameters for `GET /api/listings`
#[derive(Debug, Default, Deserialize)]
pub struct ListingsParams {
    q: Option<String>,
    data_centre: Option<String>,
    pf_category: Option<String>,
    min_parties: Option<i64>,
    max_parties: Option<i64>,
    joinable_role: Option<String>,
    since: Option<String>,
    sort: Option<String>,
    order: Option<String>,
    limit: Option<usize>,
    offset: Option<usize>,
}

impl ListingsParams {
    /// Normalize raw parameters into a query descriptor: comma lists become
    /// lowercased sets, limit is clamped to 1..=1000, defaults fill the rest.
    fn into_query(self) -> ListingQuery {
        ListingQuery {
            search: self
                .q
                .map(|s| s.to_lowercase())
                .filter(|s| !s.is_empty()),
            data_centres: query::parse_list_param(self.data_centre.as_deref()),
            categories: query::parse_list_param(self.pf_category.as_deref()),
            min_parties: self.min_parties,
            max_parties: self.max_parties,
            joinable_roles: query::parse_list_param(self.joinable_role.as_deref()),
            since: query::parse_since(self.since.as_deref()),
            sort: self.sort.unwrap_or_else(|| DEFAULT_SORT.to_string()),
            descending: self
                .order
                .as_deref()
                .is_some_and(|o| o.eq_ignore_ascii_case("desc")),
            offset: self.offset.unwrap_or(0),
            limit: self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ListingsResponse {
    pub last_updated: Option<DateTime<Utc>>,
    pub total: usize,
    pub returned: usize,
    pub items: Vec<Listing>,
}

impl ListingsResponse {
    fn empty() -> Self {
        Self {
            last_updated: None,
            total: 0,
            returned: 0,
            items: Vec::new(),
        }
    }
}

async fn get_listings(
    State(state): State<AppState>,
    Query(params): Query<ListingsParams>,
) -> Json<ListingsResponse> {
    let Some(snapshot) = state.store.current().await else {
        return Json(ListingsResponse::empty());
    };

    let query = params.into_query();
    let result = query::run_query(snapshot.listings, &query);

    Json(ListingsResponse {
        last_updated: Some(snapshot.updated_at),
        total: result.total,
        returned: result.items.len(),
        items: result.items,
    })
}

async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// Build the application router. Static files (the web UI) are served as
/// the fallback so API routes always win.
pub fn router(state: AppState, static_dir: &str) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/listings", get(get_listings))
        .fallback_service(ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
