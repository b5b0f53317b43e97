// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use keep_server_db::DbError;
use keep_server_email::MailError;

/// Domain errors of the billing commands.
///
/// `BadRequest` carries the human-readable policy reason; the HTTP layer maps
/// it to 400 and `NotFound` to 404.
#[derive(Debug, thiserror::Error)]
pub enum BillingError {
	#[error("{0}")]
	BadRequest(String),

	#[error("{0}")]
	NotFound(String),

	#[error(transparent)]
	Db(#[from] DbError),

	#[error(transparent)]
	Mail(#[from] MailError),
}
