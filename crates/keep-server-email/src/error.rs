// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

/// Errors that can occur during SMTP operations.
#[derive(Debug, thiserror::Error)]
pub enum SmtpError {
	/// Failed to connect to the SMTP server.
	#[error("connection failed: {0}")]
	Connection(String),

	/// Authentication with the SMTP server failed.
	#[error("authentication failed: {0}")]
	Auth(String),

	/// Failed to send an email message.
	#[error("send failed: {0}")]
	Send(String),

	/// Invalid email address format.
	#[error("invalid email address: {0}")]
	Address(String),
}

/// Errors surfaced by the mail service.
#[derive(Debug, thiserror::Error)]
pub enum MailError {
	#[error(transparent)]
	Smtp(#[from] SmtpError),

	/// The server has no SMTP section configured.
	#[error("mail dispatch is not configured")]
	NotConfigured,
}
