// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Email dispatch for the Keep server.
//!
//! [`SmtpClient`] is the transport; [`MailService`] is the seam commands
//! depend on. Templates live in [`templates`].

pub mod error;
pub mod service;
pub mod smtp;
pub mod templates;

pub use error::{MailError, SmtpError};
pub use service::{MailService, NoopMailService, SmtpMailService};
pub use smtp::{is_valid_email, SmtpClient, SmtpConfig};
