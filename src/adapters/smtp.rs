use crate::config::toml_config::SmtpConfig;
use crate::core::Notifier;
use crate::utils::error::Result;
use lettre::message::{header::ContentType, Mailbox};
use lettre::transport::smtp::authentication::{Credentials, Mechanism};
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::path::Path;

pub const SUBJECT: &str = "YouTube Mashup Information";

pub fn notification_body(output_file: &Path) -> String {
    format!(
        "Your mashup is ready! You can download it from the following link: {}",
        output_file.display()
    )
}

/// 組出通知信；只附上檔名，不附檔案
pub fn build_message(from: &Mailbox, recipient: &str, output_file: &Path) -> Result<Message> {
    let message = Message::builder()
        .from(from.clone())
        .to(recipient.parse::<Mailbox>()?)
        .subject(SUBJECT)
        .header(ContentType::TEXT_PLAIN)
        .body(notification_body(output_file))?;
    Ok(message)
}

pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpNotifier {
    /// STARTTLS + 明文帳密登入
    pub fn from_config(config: &SmtpConfig) -> Result<Self> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?
            .port(config.port())
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .authentication(vec![Mechanism::Plain, Mechanism::Login])
            .build();

        Ok(Self {
            transport,
            from: config.from.parse::<Mailbox>()?,
        })
    }
}

#[async_trait::async_trait]
impl Notifier for SmtpNotifier {
    async fn notify(&self, recipient: &str, output_file: &Path) -> Result<()> {
        let message = build_message(&self.from, recipient, output_file)?;
        let response = self.transport.send(message).await?;
        tracing::debug!("SMTP response code: {}", response.code());
        Ok(())
    }
}
