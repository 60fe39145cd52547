use std::sync::Arc;

use crate::config::AppConfig;
use crate::ws::WsHub;

/// Общее состояние HTTP хэндлеров
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub hub: Arc<WsHub>,
}
