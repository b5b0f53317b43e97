// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

mod billing;
mod database;
mod http;
mod logging;
mod scim;
mod smtp;

pub use billing::{BillingConfig, BillingConfigLayer};
pub use database::{DatabaseConfig, DatabaseConfigLayer};
pub use http::{HttpConfig, HttpConfigLayer};
pub use logging::{LoggingConfig, LoggingConfigLayer};
pub use scim::{ScimConfig, ScimConfigLayer};
pub use smtp::{SmtpConfig, SmtpConfigLayer};
