/*!
 * Mock translator for testing.
 *
 * - `MockTranslator::working()` - Always succeeds with tagged text
 * - `MockTranslator::intermittent(n)` - Fails every n-th request
 * - `MockTranslator::failing()` - Always fails with an error
 */

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::errors::ProviderError;
use crate::providers::{TranslationRequest, Translator};

/// Behavior mode for the mock translator
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Returns `[<target>] <text>`
    Working,
    /// Fails on every `fail_every`-th request (1-based)
    Intermittent { fail_every: usize },
    /// Always fails
    Failing,
    /// Returns an empty string
    Empty,
    /// Wraps the translation in quotes and a list number, like chatty models do
    Chatty,
    /// Answers after a delay that shrinks with the segment index
    Slow { delay_ms: u64 },
}

/// Mock translator for testing pipeline behavior
#[derive(Debug)]
pub struct MockTranslator {
    behavior: MockBehavior,
    request_count: Arc<AtomicUsize>,
}

impl MockTranslator {
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    pub fn intermittent(fail_every: usize) -> Self {
        Self::new(MockBehavior::Intermittent { fail_every })
    }

    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    pub fn empty() -> Self {
        Self::new(MockBehavior::Empty)
    }

    pub fn chatty() -> Self {
        Self::new(MockBehavior::Chatty)
    }

    pub fn slow(delay_ms: u64) -> Self {
        Self::new(MockBehavior::Slow { delay_ms })
    }

    /// Number of translate calls seen so far
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    fn tagged(request: &TranslationRequest) -> String {
        format!("[{}] {}", request.target_language, request.text)
    }
}

#[async_trait]
impl Translator for MockTranslator {
    async fn translate(&self, request: &TranslationRequest) -> Result<String, ProviderError> {
        let count = self.request_count.fetch_add(1, Ordering::SeqCst) + 1;

        match self.behavior {
            MockBehavior::Working => Ok(Self::tagged(request)),
            MockBehavior::Intermittent { fail_every } => {
                if fail_every > 0 && count % fail_every == 0 {
                    Err(ProviderError::RequestFailed(format!("Simulated failure on request {}", count)))
                } else {
                    Ok(Self::tagged(request))
                }
            }
            MockBehavior::Failing => Err(ProviderError::RequestFailed("Simulated outage".to_string())),
            MockBehavior::Empty => Ok(String::new()),
            MockBehavior::Chatty => Ok(format!("1. \"{}\"", Self::tagged(request))),
            MockBehavior::Slow { delay_ms } => {
                // Earlier segments finish last, so completion order is reversed
                let factor = 10u64.saturating_sub(request.index as u64).max(1);
                tokio::time::sleep(Duration::from_millis(delay_ms * factor)).await;
                Ok(Self::tagged(request))
            }
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}
