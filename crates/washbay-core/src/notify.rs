//! Notification dispatcher seam.
//!
//! Delivery (WhatsApp, SMS, ...) lives outside this system; the engine
//! only renders a message and hands it to a dispatcher. Failures are
//! reported back but are never fatal to the operation that triggered the
//! message.

use async_trait::async_trait;

use crate::Result;

/// Which message template a dispatch belongs to. Providers that register
/// templates upstream key on this.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateRef {
    JobReceived,
    StatusChanged,
}

/// Outcome of a dispatch attempt.
#[derive(Debug, Clone)]
pub struct DispatchOutcome {
    pub success: bool,
    pub error: Option<String>,
}

impl DispatchOutcome {
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
        }
    }
}

/// Trait for outbound message delivery.
#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    /// Deliver a rendered message to a recipient handle (phone number).
    async fn send(
        &self,
        recipient: &str,
        message: &str,
        template: TemplateRef,
    ) -> Result<DispatchOutcome>;
}
