use serde::{Deserialize, Serialize};

use crate::http::DEFAULT_MAX_ATTEMPTS;

/// Settings for a [`RequestExecutor`](crate::http::RequestExecutor).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutorConfig {
    /// Attempts made by the retrying operations before giving up.
    pub max_attempts: usize,
    pub user_agent: String,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            user_agent: format!("apifetch/{}", env!("APIFETCH_VERSION")),
        }
    }
}
