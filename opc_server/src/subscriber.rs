//! The subscriptions handed out to calendar subscribers.

use std::{collections::HashMap, sync::RwLock};

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub user_id: String,
    pub calendar_url: String,
    #[serde(skip)]
    pub created_at: DateTime<Utc>,
}

/// Where subscriptions are kept between subscribing and downloading the calendar.
pub trait SubscriberStore: Send + Sync {
    /// Issue a new subscription.
    fn create(&self) -> Subscription;
    fn get(&self, user_id: &str) -> Option<Subscription>;
    fn count(&self) -> usize;
}

/// Subscriptions held in memory, they are lost on restart.
#[derive(Debug, Default)]
pub struct InMemorySubscriberStore {
    subscriptions: RwLock<HashMap<String, Subscription>>,
}

impl SubscriberStore for InMemorySubscriberStore {
    fn create(&self) -> Subscription {
        let user_id = Uuid::new_v4().simple().to_string();
        let subscription = Subscription {
            calendar_url: format!("/api/calendar/{user_id}"),
            user_id: user_id.clone(),
            created_at: Utc::now(),
        };
        self.subscriptions
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(user_id, subscription.clone());
        subscription
    }

    fn get(&self, user_id: &str) -> Option<Subscription> {
        self.subscriptions
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(user_id)
            .cloned()
    }

    fn count(&self) -> usize {
        self.subscriptions
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_get() {
        let store = InMemorySubscriberStore::default();
        assert_eq!(store.count(), 0);
        let first = store.create();
        let second = store.create();
        assert_ne!(first.user_id, second.user_id);
        assert_eq!(first.calendar_url, format!("/api/calendar/{}", first.user_id));
        assert_eq!(store.get(&first.user_id), Some(first));
        assert_eq!(store.get("unknown"), None);
        assert_eq!(store.count(), 2);
    }
}
