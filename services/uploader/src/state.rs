//! Application state shared across handlers

use std::{sync::Arc, time::Instant};

use common::config::AppConfig;

use crate::platform::VideoPlatform;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub platform: Arc<dyn VideoPlatform>,
    pub started_at: Instant,
}

impl AppState {
    /// Create the state for a freshly started process
    pub fn new(config: AppConfig, platform: Arc<dyn VideoPlatform>) -> Self {
        Self {
            config: Arc::new(config),
            platform,
            started_at: Instant::now(),
        }
    }

    /// Seconds since the state was created
    pub fn uptime_seconds(&self) -> f64 {
        self.started_at.elapsed().as_secs_f64()
    }
}
