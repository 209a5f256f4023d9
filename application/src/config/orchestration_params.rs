//! Orchestration parameters: loop control for
//! [`OrchestrateUseCase`](crate::use_cases::orchestrate::OrchestrateUseCase).
//!
//! These are application-layer concerns, not domain policy. The domain caps
//! cycles at [`MAX_CYCLES`]; this type can only lower that cap.

use router_domain::MAX_CYCLES;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Execute → Evaluate loop control parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrchestrationParams {
    /// Maximum cycles per session (always within `1..=MAX_CYCLES`).
    pub max_cycles: u32,
    /// Pause before retrying a transient failure.
    pub retry_backoff: Duration,
    /// Deadline for a single executor call.
    pub invocation_timeout: Duration,
}

impl Default for OrchestrationParams {
    fn default() -> Self {
        Self {
            max_cycles: MAX_CYCLES,
            retry_backoff: Duration::from_millis(500),
            invocation_timeout: Duration::from_secs(300),
        }
    }
}

impl OrchestrationParams {
    // ==================== Builder Methods ====================

    pub fn with_max_cycles(mut self, max: u32) -> Self {
        self.max_cycles = max.clamp(1, MAX_CYCLES);
        self
    }

    pub fn with_retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff = backoff;
        self
    }

    pub fn with_invocation_timeout(mut self, timeout: Duration) -> Self {
        self.invocation_timeout = timeout;
        self
    }
}
