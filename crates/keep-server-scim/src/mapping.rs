// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Domain ↔ SCIM wire-shape mapping.

use keep_scim::{GroupMember, ResourceMeta, ScimGroup, SCHEMA_GROUP};
use keep_server_db::{Group, OrgUserId};

/// Render a group and its membership as a SCIM resource.
pub fn group_to_scim(group: &Group, member_ids: &[OrgUserId]) -> ScimGroup {
	ScimGroup {
		schemas: vec![SCHEMA_GROUP.to_string()],
		id: Some(group.id.to_string()),
		external_id: group.external_id.clone(),
		display_name: group.name.clone(),
		members: Some(
			member_ids
				.iter()
				.map(|id| GroupMember {
					value: id.to_string(),
					display: None,
				})
				.collect(),
		),
		meta: Some(ResourceMeta::group(group.created_at, group.updated_at)),
	}
}

/// Attribute lookup for filter evaluation over a group.
pub fn group_attr(group: &Group, attr: &str) -> Option<String> {
	match attr.to_lowercase().as_str() {
		"displayname" => Some(group.name.clone()),
		"externalid" => group.external_id.clone(),
		"id" => Some(group.id.to_string()),
		_ => None,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use keep_server_db::OrgId;

	fn group() -> Group {
		Group::new(OrgId::generate(), "Engineering", Some("eng-01".to_string()))
	}

	#[test]
	fn scim_resource_carries_members_and_meta() {
		let group = group();
		let members = [OrgUserId::generate(), OrgUserId::generate()];
		let scim = group_to_scim(&group, &members);

		assert_eq!(scim.id.as_deref(), Some(group.id.to_string().as_str()));
		assert_eq!(scim.display_name, "Engineering");
		assert_eq!(scim.members.as_ref().unwrap().len(), 2);
		assert_eq!(
			scim.meta.as_ref().unwrap().resource_type,
			"Group".to_string()
		);
	}

	#[test]
	fn attribute_lookup_is_case_insensitive() {
		let group = group();
		assert_eq!(group_attr(&group, "displayName"), Some("Engineering".to_string()));
		assert_eq!(group_attr(&group, "DISPLAYNAME"), Some("Engineering".to_string()));
		assert_eq!(group_attr(&group, "externalId"), Some("eng-01".to_string()));
		assert_eq!(group_attr(&group, "id"), Some(group.id.to_string()));
		assert_eq!(group_attr(&group, "members"), None);
	}
}
