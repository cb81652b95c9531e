use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{DeliveryError, DeliveryReceipt, Mailer, OutboundEmail};
use crate::config::{MailConfig, Mailbox};

const SEND_PATH: &str = "/v3.1/send";
const SUCCESS_STATUS: &str = "success";

/// Mailjet v3.1 send API client.
#[derive(Clone)]
pub struct MailjetClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    secret_key: String,
}

impl MailjetClient {
    pub fn new(api_url: &str, api_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: format!("{}{SEND_PATH}", api_url.trim_end_matches('/')),
            api_key: api_key.into(),
            secret_key: secret_key.into(),
        }
    }

    pub fn from_config(config: &MailConfig) -> Self {
        Self::new(&config.api_url, &config.api_key, &config.secret_key)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl std::fmt::Debug for MailjetClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailjetClient")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Mailer for MailjetClient {
    async fn send(&self, email: OutboundEmail) -> Result<DeliveryReceipt, DeliveryError> {
        let payload = SendRequest::from(&email);

        let response = self
            .client
            .post(&self.endpoint)
            .basic_auth(&self.api_key, Some(&self.secret_key))
            .json(&payload)
            .send()
            .await
            .map_err(|err| DeliveryError::Transport(err.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| DeliveryError::Transport(err.to_string()))?;
        debug!(status = status.as_u16(), %body, "mailjet response");

        interpret_response(status.as_u16(), &body)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct SendRequest<'a> {
    messages: [MessagePayload<'a>; 1],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct MessagePayload<'a> {
    from: Address<'a>,
    to: [Address<'a>; 1],
    subject: &'a str,
    #[serde(rename = "HTMLPart")]
    html_part: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct Address<'a> {
    email: &'a str,
    name: &'a str,
}

impl<'a> From<&'a Mailbox> for Address<'a> {
    fn from(mailbox: &'a Mailbox) -> Self {
        Self {
            email: &mailbox.email,
            name: &mailbox.name,
        }
    }
}

impl<'a> From<&'a OutboundEmail> for SendRequest<'a> {
    fn from(email: &'a OutboundEmail) -> Self {
        Self {
            messages: [MessagePayload {
                from: Address::from(&email.from),
                to: [Address::from(&email.to)],
                subject: &email.subject,
                html_part: &email.html_body,
            }],
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct SendResponse {
    #[serde(default)]
    messages: Vec<MessageResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct MessageResult {
    status: String,
    #[serde(default)]
    to: Vec<RecipientResult>,
    #[serde(default)]
    errors: Vec<ProviderError>,
}

#[derive(Debug, Deserialize)]
struct RecipientResult {
    #[serde(rename = "MessageUUID")]
    message_uuid: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    #[serde(rename = "ErrorMessage", default)]
    message: String,
}

/// Maps a Mailjet HTTP status and body onto a receipt or a delivery error.
fn interpret_response(status: u16, body: &str) -> Result<DeliveryReceipt, DeliveryError> {
    if !(200..300).contains(&status) {
        return Err(DeliveryError::Rejected {
            status,
            detail: rejection_detail(body),
        });
    }

    let parsed: SendResponse =
        serde_json::from_str(body).map_err(|err| DeliveryError::Response(err.to_string()))?;
    let message = parsed
        .messages
        .into_iter()
        .next()
        .ok_or_else(|| DeliveryError::Response("response contained no messages".to_string()))?;

    if !message.status.eq_ignore_ascii_case(SUCCESS_STATUS) {
        let detail = if message.errors.is_empty() {
            format!("message status '{}'", message.status)
        } else {
            join_errors(&message.errors)
        };
        return Err(DeliveryError::Rejected { status, detail });
    }

    Ok(DeliveryReceipt {
        provider_status: message.status,
        message_ids: message
            .to
            .into_iter()
            .filter_map(|recipient| recipient.message_uuid)
            .collect(),
    })
}

fn rejection_detail(body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        #[serde(rename = "ErrorMessage")]
        error_message: Option<String>,
    }

    if let Ok(parsed) = serde_json::from_str::<SendResponse>(body) {
        let errors: Vec<ProviderError> = parsed
            .messages
            .into_iter()
            .flat_map(|message| message.errors)
            .collect();
        if !errors.is_empty() {
            return join_errors(&errors);
        }
    }

    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody {
            error_message: Some(message),
        }) => message,
        _ if body.trim().is_empty() => "empty response body".to_string(),
        _ => {
            warn!(body = body.trim(), "unrecognized mailjet error body");
            format!("unrecognized provider response ({} bytes)", body.len())
        }
    }
}

fn join_errors(errors: &[ProviderError]) -> String {
    errors
        .iter()
        .map(|error| error.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}
