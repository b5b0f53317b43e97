// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Async SMTP client.
//!
//! Thin wrapper over [`lettre`] sending multipart (HTML + plain text)
//! messages. Passwords travel as [`SecretString`] so they never reach logs.

use lettre::{
	message::{header::ContentType, Mailbox, MultiPart, SinglePart},
	transport::smtp::authentication::Credentials,
	AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use keep_common_secret::SecretString;
use serde::{Deserialize, Serialize};

use crate::error::SmtpError;

/// Configuration for the SMTP client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmtpConfig {
	/// SMTP server hostname (e.g., "smtp.example.com").
	pub host: String,

	/// SMTP server port. Common values: 25 (unencrypted), 465 (TLS), 587 (STARTTLS).
	pub port: u16,

	/// Optional username for SMTP authentication.
	pub username: Option<String>,

	/// Optional password for SMTP authentication.
	pub password: Option<SecretString>,

	/// Email address to send from (e.g., "noreply@keep.example.com").
	pub from_address: String,

	/// Display name for the sender (e.g., "Keep").
	pub from_name: String,

	/// Whether to use STARTTLS for the connection.
	pub use_tls: bool,
}

/// Async SMTP client for sending emails.
///
/// Built once at startup; [`lettre`] pools connections internally.
pub struct SmtpClient {
	transport: AsyncSmtpTransport<Tokio1Executor>,
	from_mailbox: Mailbox,
}

impl SmtpClient {
	/// Create a new SMTP client from the given configuration.
	///
	/// Validates the from address and builds the transport; the actual
	/// connection is made lazily on first send.
	///
	/// # Errors
	/// Returns [`SmtpError::Address`] if the from address is invalid and
	/// [`SmtpError::Connection`] if the transport cannot be built.
	#[tracing::instrument(
		name = "smtp_client_new",
		skip(config),
		fields(host = %config.host, port = %config.port, use_tls = %config.use_tls)
	)]
	pub fn new(config: SmtpConfig) -> Result<Self, SmtpError> {
		let from_mailbox: Mailbox = format!("{} <{}>", config.from_name, config.from_address)
			.parse()
			.map_err(|e| SmtpError::Address(format!("{e}")))?;

		let builder = if config.use_tls {
			AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
				.map_err(|e| SmtpError::Connection(format!("{e}")))?
		} else {
			AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
		};

		let mut builder = builder.port(config.port);

		if let (Some(username), Some(password)) = (config.username, config.password) {
			let credentials = Credentials::new(username, password.into_inner());
			builder = builder.credentials(credentials);
		}

		let transport = builder.build();

		tracing::debug!("SMTP client initialized");

		Ok(Self {
			transport,
			from_mailbox,
		})
	}

	/// Check if the SMTP server is reachable and responding.
	///
	/// # Errors
	/// Returns [`SmtpError::Connection`] if the server is unreachable.
	#[tracing::instrument(name = "smtp_check_health", skip(self))]
	pub async fn check_health(&self) -> Result<(), SmtpError> {
		self
			.transport
			.test_connection()
			.await
			.map_err(|e| SmtpError::Connection(format!("{e}")))?;
		tracing::debug!("SMTP server is healthy");
		Ok(())
	}

	/// Send a multipart email with HTML and plain text bodies.
	///
	/// # Errors
	/// Returns [`SmtpError::Address`] for an invalid recipient and
	/// [`SmtpError::Send`] when the server rejects the message.
	#[tracing::instrument(
		name = "smtp_send_email",
		skip(self, body_html, body_text),
		fields(to = %to, subject = %subject)
	)]
	pub async fn send_email(
		&self,
		to: &str,
		subject: &str,
		body_html: &str,
		body_text: &str,
	) -> Result<(), SmtpError> {
		let to_mailbox: Mailbox = to.parse().map_err(|e| SmtpError::Address(format!("{e}")))?;

		let message = Message::builder()
			.from(self.from_mailbox.clone())
			.to(to_mailbox)
			.subject(subject)
			.multipart(
				MultiPart::alternative()
					.singlepart(
						SinglePart::builder()
							.header(ContentType::TEXT_PLAIN)
							.body(body_text.to_string()),
					)
					.singlepart(
						SinglePart::builder()
							.header(ContentType::TEXT_HTML)
							.body(body_html.to_string()),
					),
			)
			.map_err(|e| SmtpError::Send(format!("failed to build message: {e}")))?;

		self
			.transport
			.send(message)
			.await
			.map_err(|e| SmtpError::Send(format!("{e}")))?;

		tracing::info!("email sent successfully");

		Ok(())
	}
}

/// Validate an email address format.
///
/// Uses [`lettre`]'s [`Mailbox`] parser; this checks syntax, not whether the
/// address exists.
pub fn is_valid_email(email: &str) -> bool {
	email.parse::<Mailbox>().is_ok()
}
