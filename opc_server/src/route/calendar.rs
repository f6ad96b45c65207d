use axum::{
    extract::{Path, State},
    http::{
        header::{CONTENT_DISPOSITION, CONTENT_TYPE},
        StatusCode,
    },
    response::{IntoResponse, Response},
};
use chrono::Utc;
use opc_core::{
    calendar::{self, FILE_NAME},
    ical::generator::Emitter,
    schedule::Schedule,
};
use tracing::warn;

use crate::state::AppState;

/// Handle calendar requests of a subscriber.
///
/// The subscription must have been issued before, unknown ids are answered with 404.
pub async fn handler(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Response, (StatusCode, String)> {
    if state.subscribers.get(&user_id).is_none() {
        return Err((StatusCode::NOT_FOUND, String::from("subscription not found")));
    }
    let schedule = Schedule::load(&state.schedule_path)
        .map_err(|err| (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()))?;
    let (ical_calendar, rejected) = calendar::get(&schedule, &state.synthesizer, Utc::now());
    for entry in rejected {
        warn!(index = entry.index, date = %entry.raw, err = %entry.error, "adjustment date left out of the calendar");
    }
    let response = (
        [
            (CONTENT_TYPE, calendar::CONTENT_TYPE.to_string()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{FILE_NAME}\""),
            ),
        ],
        ical_calendar.generate(),
    )
        .into_response();
    Ok(response)
}
