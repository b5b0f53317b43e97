// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use serde::{Deserialize, Serialize};

/// Protocol-level SCIM errors.
///
/// These map onto the `scimType` values of RFC 7644 section 3.12; the HTTP
/// status mapping happens in the server crate.
#[derive(Debug, thiserror::Error)]
pub enum ScimError {
	#[error("invalid filter: {0}")]
	InvalidFilter(String),

	#[error("invalid syntax: {0}")]
	InvalidSyntax(String),

	#[error("invalid path: {0}")]
	InvalidPath(String),

	#[error("invalid value: {0}")]
	InvalidValue(String),

	#[error("not found: {0}")]
	NotFound(String),

	#[error("uniqueness violation: {0}")]
	Uniqueness(String),

	#[error("too many operations")]
	TooMany,
}

/// The `scimType` discriminator carried in SCIM error bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScimErrorType {
	InvalidFilter,
	InvalidSyntax,
	InvalidPath,
	InvalidValue,
	NoTarget,
	Uniqueness,
	TooMany,
	Mutability,
}

/// SCIM error response body (RFC 7644 section 3.12).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScimErrorResponse {
	pub schemas: Vec<String>,
	/// HTTP status, serialized as a string per the RFC.
	pub status: String,
	#[serde(rename = "scimType", skip_serializing_if = "Option::is_none")]
	pub scim_type: Option<ScimErrorType>,
	pub detail: String,
}

impl ScimErrorResponse {
	pub fn new(status: u16, scim_type: Option<ScimErrorType>, detail: impl Into<String>) -> Self {
		Self {
			schemas: vec![crate::SCHEMA_ERROR.to_string()],
			status: status.to_string(),
			scim_type,
			detail: detail.into(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn error_response_wire_shape() {
		let body = ScimErrorResponse::new(404, Some(ScimErrorType::NoTarget), "Group not found.");
		let json = serde_json::to_value(&body).unwrap();
		assert_eq!(json["schemas"][0], crate::SCHEMA_ERROR);
		assert_eq!(json["status"], "404");
		assert_eq!(json["scimType"], "noTarget");
		assert_eq!(json["detail"], "Group not found.");
	}

	#[test]
	fn error_response_omits_scim_type_when_absent() {
		let body = ScimErrorResponse::new(500, None, "boom");
		let json = serde_json::to_value(&body).unwrap();
		assert!(json.get("scimType").is_none());
	}
}
