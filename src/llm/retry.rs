//! Fixed-interval retry around a single model call

use std::time::Duration;

use tracing::{debug, warn};

use crate::core::Result;
use crate::llm::traits::{GenerateRequest, ModelClient, ModelResponse};

/// Retry behavior for model calls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub max_attempts: usize,
    /// Pause between attempts
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: usize, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    /// A single attempt, no retries
    pub fn none() -> Self {
        Self::new(1, Duration::ZERO)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            delay: Duration::from_secs(1),
        }
    }
}

/// Call the model, retrying transient failures.
///
/// Non-transient errors return immediately. Once the attempt ceiling is hit
/// the last error is returned.
pub async fn call_with_retry(
    client: &dyn ModelClient,
    request: &GenerateRequest<'_>,
    policy: RetryPolicy,
) -> Result<ModelResponse> {
    let mut attempt = 1;
    loop {
        debug!("Sending request to {} (attempt {})", client.name(), attempt);
        match client.generate(request).await {
            Ok(response) => return Ok(response),
            Err(e) if e.is_transient() && attempt < policy.max_attempts => {
                warn!(
                    "Model call failed (attempt {}/{}), retrying in {:?}: {}",
                    attempt, policy.max_attempts, policy.delay, e
                );
                tokio::time::sleep(policy.delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
