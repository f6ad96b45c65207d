use axum::{extract::State, http::StatusCode, Json};
use opc_core::schedule::Schedule;

use crate::state::AppState;

/// Answer with the whole schedule document.
pub async fn handler(State(state): State<AppState>) -> Result<Json<Schedule>, (StatusCode, String)> {
    let schedule = Schedule::load(&state.schedule_path)
        .map_err(|err| (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()))?;
    Ok(Json(schedule))
}
