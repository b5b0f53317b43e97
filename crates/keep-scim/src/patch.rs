// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! SCIM PATCH request model and the value-extraction helpers the group
//! handlers need.

use crate::error::ScimError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatchOp {
	Add,
	Remove,
	Replace,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchOperation {
	pub op: PatchOp,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub path: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub value: Option<serde_json::Value>,
}

impl PatchOperation {
	/// Member ids carried in this operation's `value`.
	///
	/// Identity providers send either an array of `{value}` objects, a single
	/// `{value}` object, or a bare string. Entries without a usable id are
	/// skipped.
	pub fn member_values(&self) -> Vec<String> {
		fn entry_value(entry: &serde_json::Value) -> Option<String> {
			match entry {
				serde_json::Value::String(s) => Some(s.clone()),
				serde_json::Value::Object(map) => {
					map.get("value").and_then(|v| v.as_str()).map(String::from)
				}
				_ => None,
			}
		}

		match &self.value {
			Some(serde_json::Value::Array(entries)) => {
				entries.iter().filter_map(entry_value).collect()
			}
			Some(other) => entry_value(other).into_iter().collect(),
			None => Vec::new(),
		}
	}

	/// The `displayName` carried in a no-path or `displayName`-path replace.
	pub fn display_name(&self) -> Option<String> {
		match &self.value {
			Some(serde_json::Value::String(s)) => Some(s.clone()),
			Some(serde_json::Value::Object(map)) => map
				.get("displayName")
				.and_then(|v| v.as_str())
				.map(String::from),
			_ => None,
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchRequest {
	pub schemas: Vec<String>,
	#[serde(rename = "Operations")]
	pub operations: Vec<PatchOperation>,
}

impl PatchRequest {
	pub fn validate(&self) -> Result<(), ScimError> {
		if !self
			.schemas
			.iter()
			.any(|s| s == crate::SCHEMA_PATCH_OP)
		{
			return Err(ScimError::InvalidSyntax(
				"Missing PatchOp schema".to_string(),
			));
		}
		for op in &self.operations {
			if op.op == PatchOp::Remove && op.path.is_none() {
				return Err(ScimError::InvalidPath("Remove requires path".to_string()));
			}
		}
		Ok(())
	}
}

/// Extract the member id from a value-filtered removal path, e.g.
/// `members[value eq "2aab..."]`.
///
/// Returns `None` for any other path shape; the caller falls back to the
/// operation's `value` payload.
pub fn member_removal_target(path: &str) -> Option<String> {
	let inner = path
		.trim()
		.strip_prefix("members[")?
		.strip_suffix(']')?
		.trim();
	let (attr, rest) = inner.split_once(char::is_whitespace)?;
	if !attr.eq_ignore_ascii_case("value") {
		return None;
	}
	let (op, rest) = rest.trim_start().split_once(char::is_whitespace)?;
	if !op.eq_ignore_ascii_case("eq") {
		return None;
	}
	let unquoted = rest.trim().strip_prefix('"')?.strip_suffix('"')?;
	if unquoted.is_empty() {
		None
	} else {
		Some(unquoted.to_string())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn patch(ops: serde_json::Value) -> PatchRequest {
		serde_json::from_value(serde_json::json!({
			"schemas": [crate::SCHEMA_PATCH_OP],
			"Operations": ops,
		}))
		.unwrap()
	}

	#[test]
	fn validate_requires_patch_op_schema() {
		let request = PatchRequest {
			schemas: vec!["urn:something:else".to_string()],
			operations: vec![],
		};
		assert!(matches!(
			request.validate(),
			Err(ScimError::InvalidSyntax(_))
		));
	}

	#[test]
	fn validate_requires_path_on_remove() {
		let request = patch(serde_json::json!([{"op": "remove"}]));
		assert!(matches!(request.validate(), Err(ScimError::InvalidPath(_))));
	}

	#[test]
	fn member_values_from_object_array() {
		let request = patch(serde_json::json!([
			{"op": "add", "path": "members", "value": [{"value": "u-1"}, {"value": "u-2"}]}
		]));
		assert_eq!(request.operations[0].member_values(), vec!["u-1", "u-2"]);
	}

	#[test]
	fn member_values_from_single_object() {
		let request = patch(serde_json::json!([
			{"op": "add", "path": "members", "value": {"value": "u-1"}}
		]));
		assert_eq!(request.operations[0].member_values(), vec!["u-1"]);
	}

	#[test]
	fn member_values_skips_malformed_entries() {
		let request = patch(serde_json::json!([
			{"op": "add", "path": "members", "value": [{"value": "u-1"}, {"display": "no id"}, 7]}
		]));
		assert_eq!(request.operations[0].member_values(), vec!["u-1"]);
	}

	#[test]
	fn display_name_from_replace_object() {
		let request = patch(serde_json::json!([
			{"op": "replace", "value": {"displayName": "Platform"}}
		]));
		assert_eq!(
			request.operations[0].display_name(),
			Some("Platform".to_string())
		);
	}

	#[test]
	fn display_name_from_bare_string() {
		let request = patch(serde_json::json!([
			{"op": "replace", "path": "displayName", "value": "Platform"}
		]));
		assert_eq!(
			request.operations[0].display_name(),
			Some("Platform".to_string())
		);
	}

	#[test]
	fn removal_target_parses_value_filter() {
		let id = member_removal_target(r#"members[value eq "2aab4e32"]"#);
		assert_eq!(id.as_deref(), Some("2aab4e32"));
	}

	#[test]
	fn removal_target_rejects_other_attributes() {
		assert!(member_removal_target(r#"members[display eq "x"]"#).is_none());
	}

	#[test]
	fn removal_target_rejects_plain_members_path() {
		assert!(member_removal_target("members").is_none());
	}
}
