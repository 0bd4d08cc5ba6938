//! # Dispatch Gateway
//!
//! Outbound notification seam. The engine only depends on the trait; the
//! concrete transport (a chat client, a push service) lives outside this
//! crate and is responsible for bounding its own latency.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.3.0
//! - **Toggleable**: false

use async_trait::async_trait;
use log::info;
use thiserror::Error;

/// Notification transport failure. Transient by assumption; the scheduler
/// logs it and moves on to the next reminder.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("could not deliver notification to user {user_id}: {reason}")]
pub struct DispatchError {
    pub user_id: i64,
    pub reason: String,
}

/// Sends a rendered notification to a user.
#[async_trait]
pub trait DispatchGateway: Send + Sync {
    async fn send(&self, user_id: i64, text: &str) -> Result<(), DispatchError>;
}

/// Gateway that writes notifications to the log instead of a real
/// transport. Used by the daemon binary when no transport is wired in.
pub struct LogGateway;

#[async_trait]
impl DispatchGateway for LogGateway {
    async fn send(&self, user_id: i64, text: &str) -> Result<(), DispatchError> {
        info!("Notification for user {user_id}: {text}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // The scheduler holds the gateway as a trait object
    fn _assert_object_safe(_: &dyn DispatchGateway) {}

    #[tokio::test]
    async fn test_log_gateway_always_delivers() {
        let gateway = LogGateway;
        assert!(gateway.send(42, "hello").await.is_ok());
    }
}
