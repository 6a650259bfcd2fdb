use anyhow::{Context, Result, bail};
use asione_core::SmtpConfig;
use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::{Credentials, Mechanism};
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use log::{debug, info};

use crate::commands::EmailArgs;

/// Port on which the server expects TLS from the first byte.
const IMPLICIT_TLS_PORT: u16 = 465;

pub const MISSING_SMTP_CONFIG: &str = "Configuration SMTP incomplète. Veuillez configurer les variables d'environnement: SMTP_HOST, SMTP_USERNAME, SMTP_PASSWORD";

pub fn build_message(config: &SmtpConfig, email: &EmailArgs) -> Result<Message> {
    let from: Mailbox = config
        .from
        .parse()
        .with_context(|| format!("Adresse d'expéditeur invalide: {}", config.from))?;
    let to: Mailbox = email
        .to
        .parse()
        .with_context(|| format!("Adresse de destinataire invalide: {}", email.to))?;

    Message::builder()
        .from(from)
        .to(to)
        .subject(email.subject.as_str())
        .header(ContentType::TEXT_PLAIN)
        .body(email.body.clone())
        .context("Impossible de construire le message")
}

/// Sends a single plain-text message through the configured SMTP relay.
pub async fn send_email(config: &SmtpConfig, email: &EmailArgs) -> Result<()> {
    if !config.is_complete() {
        bail!(MISSING_SMTP_CONFIG);
    }

    let message = build_message(config, email)?;

    let relay = if config.port == IMPLICIT_TLS_PORT {
        AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
    } else {
        AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
    }
    .with_context(|| format!("Serveur SMTP invalide: {}", config.host))?;

    let mailer = relay
        .port(config.port)
        .credentials(Credentials::new(
            config.username.clone(),
            config.password.clone(),
        ))
        .authentication(vec![Mechanism::Plain])
        .build();

    debug!("Sending mail via {}:{}", config.host, config.port);
    let response = mailer
        .send(message)
        .await
        .context("Échec de l'envoi de l'email")?;
    info!("Mail to {} accepted: {:?}", email.to, response.code());

    Ok(())
}
