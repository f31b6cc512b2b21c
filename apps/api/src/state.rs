use std::sync::Arc;

use crate::config::Config;
use crate::resume::pipeline::ResumeParser;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub parser: Arc<ResumeParser>,
}
