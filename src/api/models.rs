use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub query: String,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub results: Vec<HitResult>,
    pub total_results: usize,
    pub processing_time_ms: u128,
}

#[derive(Debug, Serialize)]
pub struct HitResult {
    pub title: String,
    pub first_paragraph: String,
    pub url: String,
}
