use axum::{extract::State, Json};
use tracing::info;

use crate::{state::AppState, subscriber::Subscription};

pub async fn handler(State(state): State<AppState>) -> Json<Subscription> {
    let subscription = state.subscribers.create();
    info!(user_id = %subscription.user_id, "new subscription");
    Json(subscription)
}
