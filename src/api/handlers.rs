use axum::{Json, extract::State, http::StatusCode};
use std::sync::Arc;
use std::time::Instant;

use crate::error::SearchError;
use crate::session::SearchSession;

use super::models::{HitResult, SearchRequest, SearchResponse};

pub async fn search_handler(
    State(session): State<Arc<SearchSession>>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, (StatusCode, String)> {
    let start = Instant::now();

    if request.query.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Query cannot be empty".to_string()));
    }

    let result = session.search(&request.query).await.map_err(|e| {
        log::error!("search failed for {:?}: {}", request.query, e);
        match e {
            SearchError::Superseded => (StatusCode::CONFLICT, e.to_string()),
            _ => (StatusCode::BAD_GATEWAY, format!("Search error: {}", e)),
        }
    })?;

    let results: Vec<HitResult> = result
        .hits()
        .map(|hit| HitResult {
            title: hit.title.to_string(),
            first_paragraph: hit.first_paragraph.to_string(),
            url: hit.url.to_string(),
        })
        .collect();

    let total_results = results.len();
    let processing_time_ms = start.elapsed().as_millis();

    Ok(Json(SearchResponse {
        query: result.query,
        results,
        total_results,
        processing_time_ms,
    }))
}
