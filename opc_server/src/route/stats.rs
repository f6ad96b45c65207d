use axum::{extract::State, http::StatusCode, Json};
use opc_core::{
    adjustment::AdjustmentDate,
    schedule::Schedule,
    trend::{Amount, Trend},
};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    subscriber_count: usize,
    dates: Vec<AdjustmentDate>,
    last_update: Option<String>,
    last_trend: Option<Trend>,
    last_amount: Option<Amount>,
    last_types: Vec<String>,
    last_source: Option<String>,
    last_news: Option<String>,
    last_news_url: Option<String>,
}

pub async fn handler(State(state): State<AppState>) -> Result<Json<Stats>, (StatusCode, String)> {
    let schedule = Schedule::load(&state.schedule_path)
        .map_err(|err| (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()))?;
    Ok(Json(Stats {
        subscriber_count: state.subscribers.count(),
        dates: schedule.adjustment_dates,
        last_update: schedule.last_update,
        last_trend: schedule.trend_info.last_trend,
        last_amount: schedule.trend_info.last_amount,
        last_types: schedule.last_types,
        last_source: schedule.last_source,
        last_news: schedule.last_news,
        last_news_url: schedule.trend_info.last_news_url,
    }))
}
