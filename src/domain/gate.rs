//! Domain Gate - admission filter for the remote assistant.
//!
//! Every user message passes through the gate before anything else happens.
//! Off-topic chatter is answered locally with a canned refusal, so no remote
//! call (and no backend cost) is ever spent on it.

use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::config::GateConfig;
use crate::ports::TextClassifier;

/// Label the binary domain classifier emits for in-scope messages.
pub const IN_DOMAIN_LABEL: &str = "game";

/// Refusal shown when a message falls outside the supported domain.
pub const REFUSAL_REPLY: &str = "I can only help with video games: discovering new titles, \
game info, and getting past tricky spots. Ask me anything game-related!";

/// Outcome of gate evaluation. Produced fresh per message, never stored.
#[derive(Debug, Clone, PartialEq)]
pub enum GateDecision {
    /// Message may proceed to the remote assistant.
    Allow,
    /// Message is refused locally.
    Block {
        /// Why the gate refused (for logs, not for display).
        reason: BlockReason,
        /// Canned reply to surface to the user.
        reply_text: String,
        /// Pause before the reply appears, so the refusal doesn't read as
        /// instant.
        delay: Duration,
    },
}

impl GateDecision {
    /// Whether the message was admitted.
    pub fn is_allowed(&self) -> bool {
        matches!(self, GateDecision::Allow)
    }
}

/// Why the gate refused a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockReason {
    /// Classifier labeled the message out-of-domain.
    OutOfDomain,
    /// In-domain label but confidence below the threshold.
    LowConfidence,
    /// Classifier produced no prediction at all.
    NoPrediction,
}

/// Binary admission filter over the domain classifier.
pub struct DomainGate {
    classifier: Arc<dyn TextClassifier>,
    config: GateConfig,
}

impl DomainGate {
    /// Creates a gate over the given classifier.
    pub fn new(classifier: Arc<dyn TextClassifier>, config: GateConfig) -> Self {
        Self { classifier, config }
    }

    /// Evaluates a message. Pure over (text, classifier state); the only
    /// nondeterminism is the sampled block delay.
    pub fn evaluate(&self, text: &str) -> GateDecision {
        let trimmed = text.trim();

        let reason = match self.classifier.predict(trimmed) {
            Some(prediction) => {
                debug!(
                    label = %prediction.label,
                    confidence = prediction.confidence,
                    "domain gate prediction"
                );
                if prediction.label != IN_DOMAIN_LABEL {
                    Some(BlockReason::OutOfDomain)
                } else if prediction.confidence < self.config.confidence_threshold {
                    Some(BlockReason::LowConfidence)
                } else {
                    None
                }
            }
            None => {
                debug!("domain classifier returned no prediction");
                Some(BlockReason::NoPrediction)
            }
        };

        match reason {
            None => GateDecision::Allow,
            Some(reason) => GateDecision::Block {
                reason,
                reply_text: REFUSAL_REPLY.to_string(),
                delay: self.sample_delay(),
            },
        }
    }

    /// Samples the simulated-consideration delay uniformly from the
    /// configured range.
    fn sample_delay(&self) -> Duration {
        let min = self.config.block_delay_min_ms;
        let max = self.config.block_delay_max_ms;
        let ms = if min >= max {
            min
        } else {
            rand::thread_rng().gen_range(min..=max)
        };
        Duration::from_millis(ms)
    }
}
