use std::sync::Arc;

use crate::config::AppConfig;
use crate::services::assistant::ChatEngine;

pub struct AppState {
    pub config: AppConfig,
    pub engine: Arc<ChatEngine>,
}
