//! Customer notifications
//!
//! Delivery is best effort: the move executor spawns the send and only logs
//! failures.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::Result;
use crate::schemas::Ticket;

/// Message sent to a customer contact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Ticket's human-readable code
    pub code: String,
    pub model_name: String,
    pub message: String,
}

impl Notification {
    /// Pickup notice for a ticket that reached the pickup area
    pub fn ready_for_pickup(ticket: &Ticket) -> Self {
        let model = if ticket.model_name.is_empty() {
            "device"
        } else {
            ticket.model_name.as_str()
        };
        Notification {
            code: ticket.human_code.clone(),
            model_name: ticket.model_name.clone(),
            message: format!(
                "Your {} (ticket {}) is ready for pickup.",
                model, ticket.human_code
            ),
        }
    }
}

#[async_trait]
pub trait Notifier: Send + Sync + 'static {
    async fn notify(&self, contact: &str, notification: &Notification) -> Result<()>;
}

/// Writes notifications to the log instead of delivering them
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, contact: &str, notification: &Notification) -> Result<()> {
        info!(
            contact,
            code = %notification.code,
            model = %notification.model_name,
            "{}",
            notification.message
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pickup_message() {
        let ticket = Ticket::new("t1", "A-042").with_model("ThinkPad X1");
        let n = Notification::ready_for_pickup(&ticket);
        assert_eq!(n.code, "A-042");
        assert_eq!(n.model_name, "ThinkPad X1");
        assert!(n.message.contains("ThinkPad X1"));
        assert!(n.message.contains("A-042"));
    }

    #[test]
    fn test_pickup_message_without_model() {
        let n = Notification::ready_for_pickup(&Ticket::new("t1", "A-042"));
        assert!(n.message.starts_with("Your device"));
    }

    #[tokio::test]
    async fn test_log_notifier_succeeds() {
        let n = Notification::ready_for_pickup(&Ticket::new("t1", "A-042"));
        assert!(LogNotifier.notify("555-0100", &n).await.is_ok());
    }
}
