use std::sync::Arc;
use std::time::Instant;

use crate::clients::{AnalyzerClient, BuilderClient};
use crate::config::Config;
use crate::observability::Metrics;
use crate::workflow::IdSource;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub analyzer: Arc<AnalyzerClient>,
    pub builder: Arc<BuilderClient>,
    pub metrics: Arc<Metrics>,
    pub ids: Arc<dyn IdSource>,
    /// Captured once at process start; uptime in health reports is
    /// measured against it
    pub started_at: Instant,
}

impl AppState {
    pub fn new(
        config: Config,
        analyzer: AnalyzerClient,
        builder: BuilderClient,
        ids: Arc<dyn IdSource>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            analyzer: Arc::new(analyzer),
            builder: Arc::new(builder),
            metrics: Arc::new(Metrics::new()),
            ids,
            started_at: Instant::now(),
        }
    }
}
