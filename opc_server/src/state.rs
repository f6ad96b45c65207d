use std::{path::PathBuf, sync::Arc};

use opc_core::synthesizer::{DetailPolicy, Synthesizer};
use tokio::sync::Mutex;

use crate::{
    config::Arguments,
    subscriber::{InMemorySubscriberStore, SubscriberStore},
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// The schedule is read on every request to pick up changes of the crawler.
    pub schedule_path: Arc<PathBuf>,
    /// Held while the schedule is rewritten.
    pub schedule_lock: Arc<Mutex<()>>,
    pub subscribers: Arc<dyn SubscriberStore>,
    pub synthesizer: Synthesizer,
}

impl AppState {
    pub fn new(args: &Arguments) -> Self {
        Self::with_store(
            args.schedule.clone(),
            Synthesizer::new(DetailPolicy::leading(args.detailed_events)),
            Arc::new(InMemorySubscriberStore::default()),
        )
    }

    pub fn with_store(
        schedule_path: PathBuf,
        synthesizer: Synthesizer,
        subscribers: Arc<dyn SubscriberStore>,
    ) -> Self {
        Self {
            schedule_path: Arc::new(schedule_path),
            schedule_lock: Arc::new(Mutex::new(())),
            subscribers,
            synthesizer,
        }
    }
}
