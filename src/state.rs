use crate::config::AppConfig;
use crate::services::dialogue::DialogueEngine;

pub struct AppState {
    pub config: AppConfig,
    pub engine: Box<dyn DialogueEngine>,
}
