//! Email delivery over SMTP.

use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{info, warn};

use super::{Event, EventData, EventType, NotificationError, Notifier, format_event};
use crate::config::EmailConfig;

/// Port used for the implicit-TLS fallback submission.
const SMTPS_FALLBACK_PORT: u16 = 465;

/// EmailNotifier delivers events as plain-text email over SMTP.
///
/// Submission first goes through STARTTLS on the configured port; when
/// that fails the message is retried over implicit TLS on port 465, the
/// way older providers expect it.
#[derive(Debug)]
pub struct EmailNotifier {
    config: EmailConfig,
}

impl EmailNotifier {
    /// Creates a new EmailNotifier.
    ///
    /// A disabled config is accepted and makes every send a logged no-op.
    /// An enabled config must carry server and credentials.
    pub fn new(config: EmailConfig) -> Result<Self, NotificationError> {
        if config.enabled {
            if config.smtp_server.is_empty() {
                return Err(NotificationError::new("smtp_server is required"));
            }
            if config.username.is_empty() || config.password.is_empty() {
                return Err(NotificationError::new(
                    "SMTP credentials are required (set SMTP_USERNAME and SMTP_PASSWORD)",
                ));
            }
        }

        Ok(Self { config })
    }

    fn from_address(&self) -> &str {
        if self.config.from_address.is_empty() {
            &self.config.username
        } else {
            &self.config.from_address
        }
    }

    fn to_address(&self) -> &str {
        if self.config.to_address.is_empty() {
            &self.config.username
        } else {
            &self.config.to_address
        }
    }

    fn subject(&self, event: &Event) -> String {
        match &event.data {
            EventData::Availability(data) if !data.pairs.is_empty() => {
                self.config.consecutive_subject.clone()
            }
            EventData::Availability(_) => self.config.single_day_subject.clone(),
            EventData::Error(_) => "Availability watcher error".to_string(),
            _ => format!("Availability watcher {}", event.event_type),
        }
    }

    async fn build_message(&self, event: &Event) -> Result<Message, NotificationError> {
        let from: Mailbox = self
            .from_address()
            .parse()
            .map_err(|e| NotificationError::new(format!("invalid from address: {}", e)))?;
        let to: Mailbox = self
            .to_address()
            .parse()
            .map_err(|e| NotificationError::new(format!("invalid to address: {}", e)))?;

        let builder = Message::builder()
            .from(from)
            .to(to)
            .subject(self.subject(event));
        let body = format_event(event);

        let screenshot = match &event.data {
            EventData::Availability(data) => data.screenshot.clone(),
            _ => None,
        };

        let message = match screenshot {
            Some(path) => {
                let bytes = tokio::fs::read(&path).await.map_err(|e| {
                    NotificationError::new(format!(
                        "failed to read screenshot {}: {}",
                        path.display(),
                        e
                    ))
                })?;
                let filename = path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or("screenshot.png")
                    .to_string();
                let content_type = ContentType::parse("image/png")
                    .map_err(|e| NotificationError::new(e.to_string()))?;

                builder.multipart(
                    MultiPart::mixed()
                        .singlepart(SinglePart::plain(body))
                        .singlepart(Attachment::new(filename).body(bytes, content_type)),
                )
            }
            None => builder.body(body),
        }
        .map_err(|e| NotificationError::new(format!("failed to build message: {}", e)))?;

        Ok(message)
    }

    fn starttls_transport(
        &self,
    ) -> Result<AsyncSmtpTransport<Tokio1Executor>, NotificationError> {
        let transport =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.smtp_server)
                .map_err(|e| NotificationError::new(format!("smtp transport error: {}", e)))?
                .port(self.config.smtp_port)
                .credentials(Credentials::new(
                    self.config.username.clone(),
                    self.config.password.clone(),
                ))
                .build();
        Ok(transport)
    }

    fn smtps_transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>, NotificationError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&self.config.smtp_server)
            .map_err(|e| NotificationError::new(format!("smtp transport error: {}", e)))?
            .port(SMTPS_FALLBACK_PORT)
            .credentials(Credentials::new(
                self.config.username.clone(),
                self.config.password.clone(),
            ))
            .build();
        Ok(transport)
    }

    async fn submit(&self, event: &Event) -> Result<(), NotificationError> {
        let message = self.build_message(event).await?;

        match self.starttls_transport()?.send(message).await {
            Ok(_) => {
                info!(to = %self.to_address(), "email sent");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "STARTTLS submission failed, retrying over implicit TLS");
                let message = self.build_message(event).await?;
                self.smtps_transport()?
                    .send(message)
                    .await
                    .map(|_| info!(to = %self.to_address(), "email sent via implicit TLS"))
                    .map_err(|e| {
                        NotificationError::new(format!("smtp submission failed: {}", e))
                    })
            }
        }
    }
}

#[async_trait::async_trait]
impl Notifier for EmailNotifier {
    async fn send(&self, event: &Event) -> Result<(), NotificationError> {
        if !self.config.enabled {
            info!(event_type = %event.event_type, "email disabled, logging notification only");
            return Ok(());
        }
        if !self.is_enabled(event.event_type) {
            return Ok(());
        }

        self.submit(event).await
    }

    fn is_enabled(&self, event_type: EventType) -> bool {
        match event_type {
            EventType::Availability => true,
            EventType::Error => self.config.notify_errors,
            EventType::Startup | EventType::Shutdown => false,
        }
    }

    async fn close(&self) -> Result<(), NotificationError> {
        Ok(())
    }
}
