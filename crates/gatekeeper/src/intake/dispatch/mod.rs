//! Packaging a rendered document into an email and handing it to the provider.

mod mailjet;

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{info, warn};

use super::document::RenderedDocument;
use crate::config::Mailbox;

pub use mailjet::MailjetClient;

/// Subject line for the notification about `facility_name`.
pub fn subject_line(facility_name: &str) -> String {
    format!("{facility_name} has submitted an audit request!")
}

/// Single message handed to a [`Mailer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundEmail {
    pub from: Mailbox,
    pub to: Mailbox,
    pub subject: String,
    pub html_body: String,
}

/// Provider acknowledgement for an accepted message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeliveryReceipt {
    pub provider_status: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub message_ids: Vec<String>,
}

/// Delivery failure reported by, or while talking to, the provider.
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("mail provider rejected the message ({status}): {detail}")]
    Rejected { status: u16, detail: String },
    #[error("mail provider unreachable: {0}")]
    Transport(String),
    #[error("unreadable mail provider response: {0}")]
    Response(String),
}

/// Outbound mail capability. Implemented by the provider client and by test fakes.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: OutboundEmail) -> Result<DeliveryReceipt, DeliveryError>;
}

/// Addresses the notification and delegates delivery. Never retries.
pub struct AuditDispatcher<M: ?Sized> {
    mailer: Arc<M>,
    sender: Mailbox,
    recipient: Mailbox,
}

impl<M> AuditDispatcher<M>
where
    M: Mailer + ?Sized,
{
    pub fn new(mailer: Arc<M>, sender: Mailbox, recipient: Mailbox) -> Self {
        Self {
            mailer,
            sender,
            recipient,
        }
    }

    pub fn sender(&self) -> &Mailbox {
        &self.sender
    }

    pub fn recipient(&self) -> &Mailbox {
        &self.recipient
    }

    pub async fn dispatch(
        &self,
        document: RenderedDocument,
        facility_name: &str,
    ) -> Result<DeliveryReceipt, DeliveryError> {
        let email = OutboundEmail {
            from: self.sender.clone(),
            to: self.recipient.clone(),
            subject: subject_line(facility_name),
            html_body: document.into_string(),
        };
        let subject = email.subject.clone();

        match self.mailer.send(email).await {
            Ok(receipt) => {
                info!(
                    %subject,
                    recipient = %self.recipient.email,
                    provider_status = %receipt.provider_status,
                    message_ids = ?receipt.message_ids,
                    "mail provider accepted audit notification"
                );
                Ok(receipt)
            }
            Err(err) => {
                warn!(
                    %subject,
                    recipient = %self.recipient.email,
                    error = %err,
                    "mail provider rejected audit notification"
                );
                Err(err)
            }
        }
    }
}
