use std::path::Path;

use axum::extract::State;
use axum::{Json, http::StatusCode, response::IntoResponse};
use tokio::time::{Duration, timeout};

use crate::collector::walk::walk_dump;
use crate::models::WalkRequest;
use crate::state::AppState;

const WALK_TIMEOUT_SECS: u64 = 60;

/// Диагностический обход по требованию: полный walk одной цели с записью
/// текстового лога в каталог данных
pub async fn handle_walk(
    State(state): State<AppState>,
    Json(params): Json<WalkRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let start_oid = params
        .start_oid
        .unwrap_or_else(|| "1.3.6.1.2.1".to_string());
    let community = state.config.get_community();
    let data_dir = state.config.get_data_dir();

    let work = walk_dump(&params.target, &start_oid, &community, Path::new(&data_dir));

    match timeout(Duration::from_secs(WALK_TIMEOUT_SECS), work).await {
        Ok(Ok(summary)) => Ok(Json(serde_json::json!({
            "output_file": summary.output_file.display().to_string(),
            "total": summary.total,
        }))),
        Ok(Err(e)) => Err((StatusCode::INTERNAL_SERVER_ERROR, format!("{e:#}"))),
        Err(_) => Err((
            StatusCode::GATEWAY_TIMEOUT,
            "SNMP walk timeout".to_string(),
        )),
    }
}
