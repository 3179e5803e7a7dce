use roots_core::NotifierConfig;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub notifier: Arc<NotifierConfig>,
}

impl AppState {
    pub fn new(notifier: NotifierConfig) -> Self {
        Self {
            notifier: Arc::new(notifier),
        }
    }
}
