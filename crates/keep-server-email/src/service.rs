// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Mail service abstraction.
//!
//! Commands depend on [`MailService`] rather than the SMTP client so tests
//! can assert on dispatched mail and deployments without SMTP still boot.

use async_trait::async_trait;

use crate::error::MailError;
use crate::smtp::SmtpClient;
use crate::templates;

#[async_trait]
pub trait MailService: Send + Sync {
	/// Send the Families-for-Enterprise sponsorship offer.
	async fn send_sponsorship_offer_email(
		&self,
		to_email: &str,
		sponsoring_org_name: &str,
		friendly_name: Option<&str>,
	) -> Result<(), MailError>;
}

/// Mail service backed by the SMTP client.
pub struct SmtpMailService {
	client: SmtpClient,
}

impl SmtpMailService {
	pub fn new(client: SmtpClient) -> Self {
		Self { client }
	}
}

#[async_trait]
impl MailService for SmtpMailService {
	#[tracing::instrument(skip(self), fields(to = %to_email))]
	async fn send_sponsorship_offer_email(
		&self,
		to_email: &str,
		sponsoring_org_name: &str,
		friendly_name: Option<&str>,
	) -> Result<(), MailError> {
		let (subject, html, text) = templates::sponsorship_offer(sponsoring_org_name, friendly_name);
		self
			.client
			.send_email(to_email, &subject, &html, &text)
			.await?;
		Ok(())
	}
}

/// Mail service for deployments without SMTP. Every send fails with
/// [`MailError::NotConfigured`] so callers surface a clear error instead of
/// silently dropping mail.
pub struct NoopMailService;

#[async_trait]
impl MailService for NoopMailService {
	async fn send_sponsorship_offer_email(
		&self,
		to_email: &str,
		_sponsoring_org_name: &str,
		_friendly_name: Option<&str>,
	) -> Result<(), MailError> {
		tracing::warn!(to = %to_email, "mail requested but SMTP is not configured");
		Err(MailError::NotConfigured)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn noop_service_reports_not_configured() {
		let result = NoopMailService
			.send_sponsorship_offer_email("user@example.com", "Acme", None)
			.await;
		assert!(matches!(result, Err(MailError::NotConfigured)));
	}
}
