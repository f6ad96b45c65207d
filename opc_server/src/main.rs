use std::net::SocketAddr;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::{config::Arguments, state::AppState};

mod config;
mod route;
mod state;
mod subscriber;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let args = Arguments::parse();
    let state = AppState::new(&args);
    let app = route::router(state, &args.public_dir);
    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));
    info!(%addr, schedule = %args.schedule.display(), "serving fuel price calendar");
    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await?;
    Ok(())
}
