// Application state for HTTP handlers
use crate::application::chart_service::ChartService;
use std::time::Duration;

#[derive(Clone)]
pub struct AppState {
    pub chart_service: ChartService,
    pub refresh_interval: Duration,
}
