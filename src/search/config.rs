//! Search configuration

use serde::{Deserialize, Serialize};

/// Search service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Maximum hits returned per query (0 = unlimited)
    pub max_results: usize,

    /// Render related records (submitter, assignee, organization) with each hit
    pub include_related: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_results: 0,
            include_related: true,
        }
    }
}

/// Builder for SearchConfig
pub struct SearchConfigBuilder {
    config: SearchConfig,
}

impl SearchConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: SearchConfig::default(),
        }
    }

    pub fn max_results(mut self, max: usize) -> Self {
        self.config.max_results = max;
        self
    }

    pub fn include_related(mut self, enabled: bool) -> Self {
        self.config.include_related = enabled;
        self
    }

    pub fn build(self) -> SearchConfig {
        self.config
    }
}

impl Default for SearchConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
