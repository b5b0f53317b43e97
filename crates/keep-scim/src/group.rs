// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! SCIM Group resource and list response shapes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A member entry inside a SCIM Group resource.
///
/// `value` is the provisioned organization-user id; `display` is advisory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupMember {
	pub value: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub display: Option<String>,
}

/// Resource metadata block (`meta`) on SCIM resources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceMeta {
	pub resource_type: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub created: Option<DateTime<Utc>>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub last_modified: Option<DateTime<Utc>>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub location: Option<String>,
}

impl ResourceMeta {
	pub fn group(created: DateTime<Utc>, last_modified: DateTime<Utc>) -> Self {
		Self {
			resource_type: "Group".to_string(),
			created: Some(created),
			last_modified: Some(last_modified),
			location: None,
		}
	}
}

/// SCIM Group resource. Used both as the response body and (with `id` and
/// `meta` absent) as the create/replace request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScimGroup {
	#[serde(default = "group_schemas")]
	pub schemas: Vec<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub id: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub external_id: Option<String>,
	pub display_name: String,
	/// `None` on a request means "leave memberships alone"; an empty list
	/// means "remove all members".
	#[serde(skip_serializing_if = "Option::is_none")]
	pub members: Option<Vec<GroupMember>>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub meta: Option<ResourceMeta>,
}

fn group_schemas() -> Vec<String> {
	vec![crate::SCHEMA_GROUP.to_string()]
}

/// SCIM list response envelope (RFC 7644 section 3.4.2).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResponse<T> {
	pub schemas: Vec<String>,
	#[serde(rename = "totalResults")]
	pub total_results: i64,
	#[serde(rename = "itemsPerPage")]
	pub items_per_page: i64,
	#[serde(rename = "startIndex")]
	pub start_index: i64,
	#[serde(rename = "Resources")]
	pub resources: Vec<T>,
}

impl<T> ListResponse<T> {
	pub fn new(resources: Vec<T>, total_results: i64, start_index: i64, items_per_page: i64) -> Self {
		Self {
			schemas: vec![crate::SCHEMA_LIST_RESPONSE.to_string()],
			total_results,
			items_per_page,
			start_index,
			resources,
		}
	}
}
