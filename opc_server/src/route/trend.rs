use axum::{extract::State, http::StatusCode, Json};
use opc_core::{
    schedule::Schedule,
    trend::{Amount, Trend},
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::state::AppState;

/// A trend set by hand for one adjustment date.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateTrend {
    date: String,
    trend: Trend,
    #[serde(default)]
    amount: Option<Amount>,
}

#[derive(Debug, Serialize)]
pub struct Updated {
    success: bool,
}

/// Record a manual trend, it takes precedence over the scraped one for that date.
pub async fn handler(
    State(state): State<AppState>,
    Json(update): Json<UpdateTrend>,
) -> Result<Json<Updated>, (StatusCode, String)> {
    let _guard = state.schedule_lock.lock().await;
    let mut schedule = Schedule::load(&state.schedule_path)
        .map_err(|err| (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()))?;
    if !schedule.set_manual_trend(&update.date, update.trend, update.amount) {
        return Err((
            StatusCode::NOT_FOUND,
            format!("adjustment date {} not found", update.date),
        ));
    }
    schedule
        .save(&state.schedule_path)
        .map_err(|err| (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()))?;
    info!(date = %update.date, trend = %update.trend, "manual trend updated");
    Ok(Json(Updated { success: true }))
}
