use std::sync::Arc;

use crate::config::AppConfig;
use crate::services::ScoringService;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub scoring: ScoringService,
}
