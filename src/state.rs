use crate::{config::Config, store::HrStore};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn HrStore>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(store: Arc<dyn HrStore>, config: Config) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }
}
