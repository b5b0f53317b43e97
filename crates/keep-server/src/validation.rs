// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Path-parameter validation shared by the route handlers.

use keep_server_db::{OrgId, OrgUserId};
use uuid::Uuid;

/// A failed id parse, ready to render as a 400 body.
#[derive(Debug)]
pub struct IdParseError {
	pub error: String,
	pub message: String,
}

fn invalid_id(message: &str) -> IdParseError {
	IdParseError {
		error: "invalid_id".to_string(),
		message: message.to_string(),
	}
}

/// Parse an organization id from a path segment.
pub fn parse_org_id(raw: &str) -> Result<OrgId, IdParseError> {
	Uuid::parse_str(raw)
		.map(OrgId::new)
		.map_err(|_| invalid_id("Invalid organization ID."))
}

/// Parse an organization-user id from a path segment.
pub fn parse_org_user_id(raw: &str) -> Result<OrgUserId, IdParseError> {
	Uuid::parse_str(raw)
		.map(OrgUserId::new)
		.map_err(|_| invalid_id("Invalid organization user ID."))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn valid_uuids_parse() {
		let id = OrgId::generate();
		assert_eq!(parse_org_id(&id.to_string()).unwrap(), id);
	}

	#[test]
	fn garbage_is_rejected() {
		assert!(parse_org_id("not-a-uuid").is_err());
		assert!(parse_org_user_id("").is_err());
	}
}
