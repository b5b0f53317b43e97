// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Group provisioning commands and queries.
//!
//! This service owns the SCIM group semantics; the handlers only translate
//! HTTP. Every operation re-checks that the addressed group belongs to the
//! route organization, so a token holder can never reach across tenants by
//! guessing ids.

use std::sync::Arc;

use keep_scim::{member_removal_target, Filter, PatchOp, PatchRequest, ScimGroup};
use keep_server_db::{
	Group, GroupId, GroupStore, OrganizationUserStore, OrgId, OrgStore,
};
use keep_server_events::{EventActor, EventEntry, EventService, EventType, SystemUser};
use serde_json::json;
use tracing::debug;

use crate::error::ScimApiError;
use crate::mapping::group_attr;

/// A group with its membership, as most operations return it.
pub type GroupWithMembers = (Group, Vec<keep_server_db::OrgUserId>);

pub struct GroupProvisioningService {
	org_store: Arc<dyn OrgStore>,
	group_store: Arc<dyn GroupStore>,
	org_user_store: Arc<dyn OrganizationUserStore>,
	events: Arc<EventService>,
}

impl GroupProvisioningService {
	pub fn new(
		org_store: Arc<dyn OrgStore>,
		group_store: Arc<dyn GroupStore>,
		org_user_store: Arc<dyn OrganizationUserStore>,
		events: Arc<EventService>,
	) -> Self {
		Self {
			org_store,
			group_store,
			org_user_store,
			events,
		}
	}

	/// Load a group, enforcing organization ownership.
	///
	/// A group that exists under another organization is reported as not
	/// found, exactly like a missing one.
	async fn load_owned_group(
		&self,
		org_id: &OrgId,
		group_id: &GroupId,
	) -> Result<Group, ScimApiError> {
		let group = self.group_store.get_group_by_id(group_id).await?;
		match group {
			Some(group) if group.organization_id == *org_id => Ok(group),
			_ => Err(ScimApiError::NotFound("Group not found.".to_string())),
		}
	}

	/// Member ids of a SCIM payload that are actual seats of the
	/// organization. Malformed and foreign ids are dropped.
	async fn resolve_members(
		&self,
		org_id: &OrgId,
		raw_values: impl IntoIterator<Item = String>,
	) -> Result<Vec<keep_server_db::OrgUserId>, ScimApiError> {
		let candidates: Vec<_> = raw_values
			.into_iter()
			.filter_map(|value| value.parse().ok())
			.collect();
		Ok(self.org_user_store.filter_in_org(org_id, &candidates).await?)
	}

	/// Fetch one group with its membership.
	#[tracing::instrument(skip(self), fields(org_id = %org_id, group_id = %group_id))]
	pub async fn get_group(
		&self,
		org_id: &OrgId,
		group_id: &GroupId,
	) -> Result<GroupWithMembers, ScimApiError> {
		let group = self.load_owned_group(org_id, group_id).await?;
		let members = self.group_store.list_group_member_ids(group_id).await?;
		Ok((group, members))
	}

	/// List the organization's groups with optional filter and pagination.
	///
	/// Returns the page plus the filtered total (before pagination), which
	/// the list envelope reports as `totalResults`.
	#[tracing::instrument(skip(self, filter), fields(org_id = %org_id, start_index, count))]
	pub async fn list_groups(
		&self,
		org_id: &OrgId,
		filter: Option<&Filter>,
		start_index: i64,
		count: i64,
	) -> Result<(Vec<GroupWithMembers>, i64), ScimApiError> {
		let all_groups = self.group_store.list_groups_for_org(org_id).await?;

		let filtered: Vec<Group> = match filter {
			Some(filter) => all_groups
				.into_iter()
				.filter(|group| filter.evaluate(&|attr| group_attr(group, attr)))
				.collect(),
			None => all_groups,
		};

		let total = filtered.len() as i64;
		let offset = (start_index - 1).max(0) as usize;
		let page: Vec<Group> = filtered
			.into_iter()
			.skip(offset)
			.take(count.max(0) as usize)
			.collect();

		let mut result = Vec::with_capacity(page.len());
		for group in page {
			let members = self.group_store.list_group_member_ids(&group.id).await?;
			result.push((group, members));
		}

		Ok((result, total))
	}

	/// Create a group from a SCIM payload.
	#[tracing::instrument(skip(self, request), fields(org_id = %org_id))]
	pub async fn create_group(
		&self,
		org_id: &OrgId,
		request: &ScimGroup,
	) -> Result<GroupWithMembers, ScimApiError> {
		if request.display_name.trim().is_empty() {
			return Err(ScimApiError::BadRequest(
				"displayName is required.".to_string(),
			));
		}

		let organization = self
			.org_store
			.get_org_by_id(org_id)
			.await?
			.ok_or_else(|| ScimApiError::NotFound("Organization not found.".to_string()))?;

		if !organization.use_groups {
			return Err(ScimApiError::BadRequest(
				"This organization cannot use groups.".to_string(),
			));
		}

		let group = Group::new(
			organization.id,
			request.display_name.trim(),
			request.external_id.clone(),
		);
		self.group_store.create_group(&group).await?;

		let members = match &request.members {
			Some(entries) => {
				let resolved = self
					.resolve_members(org_id, entries.iter().map(|m| m.value.clone()))
					.await?;
				self.group_store.set_group_members(&group.id, &resolved).await?;
				resolved
			}
			None => Vec::new(),
		};

		self.events.log(
			EventEntry::builder(EventType::GroupCreated, EventActor::System(SystemUser::Scim))
				.organization(organization.id)
				.group(group.id)
				.details(json!({"name": group.name, "members": members.len()}))
				.build(),
		);

		tracing::info!(group_id = %group.id, org_id = %org_id, "SCIM: group provisioned");
		Ok((group, members))
	}

	/// Replace a group's attributes (and membership, when present).
	#[tracing::instrument(skip(self, request), fields(org_id = %org_id, group_id = %group_id))]
	pub async fn replace_group(
		&self,
		org_id: &OrgId,
		group_id: &GroupId,
		request: &ScimGroup,
	) -> Result<GroupWithMembers, ScimApiError> {
		let mut group = self.load_owned_group(org_id, group_id).await?;

		if request.display_name.trim().is_empty() {
			return Err(ScimApiError::BadRequest(
				"displayName is required.".to_string(),
			));
		}

		group.name = request.display_name.trim().to_string();
		group.external_id = request.external_id.clone();
		self.group_store.update_group(&group).await?;

		if let Some(entries) = &request.members {
			let resolved = self
				.resolve_members(org_id, entries.iter().map(|m| m.value.clone()))
				.await?;
			self.group_store.set_group_members(group_id, &resolved).await?;
		}

		let members = self.group_store.list_group_member_ids(group_id).await?;

		self.events.log(
			EventEntry::builder(EventType::GroupUpdated, EventActor::System(SystemUser::Scim))
				.organization(*org_id)
				.group(*group_id)
				.details(json!({"name": group.name}))
				.build(),
		);

		Ok((group, members))
	}

	/// Apply a SCIM patch to a group.
	#[tracing::instrument(skip(self, patch), fields(org_id = %org_id, group_id = %group_id, operations = patch.operations.len()))]
	pub async fn patch_group(
		&self,
		org_id: &OrgId,
		group_id: &GroupId,
		patch: &PatchRequest,
	) -> Result<(), ScimApiError> {
		patch.validate()?;
		let mut group = self.load_owned_group(org_id, group_id).await?;

		for op in &patch.operations {
			let path = op.path.as_deref().map(str::to_lowercase);
			match (op.op, path.as_deref()) {
				(PatchOp::Replace, Some("members")) => {
					let resolved = self
						.resolve_members(org_id, op.member_values())
						.await?;
					self.group_store.set_group_members(group_id, &resolved).await?;
				}
				(PatchOp::Replace, None) | (PatchOp::Replace, Some("displayname")) => {
					if let Some(name) = op.display_name() {
						if !name.trim().is_empty() {
							group.name = name.trim().to_string();
							self.group_store.update_group(&group).await?;
						}
					}
				}
				(PatchOp::Add, Some("members")) => {
					let resolved = self
						.resolve_members(org_id, op.member_values())
						.await?;
					self.group_store.add_group_members(group_id, &resolved).await?;
				}
				(PatchOp::Remove, Some("members")) => {
					let resolved = self
						.resolve_members(org_id, op.member_values())
						.await?;
					for member_id in resolved {
						self.group_store.remove_group_member(group_id, &member_id).await?;
					}
				}
				(PatchOp::Remove, Some(path)) => {
					if let Some(target) = member_removal_target(path) {
						if let Ok(member_id) = target.parse() {
							self.group_store.remove_group_member(group_id, &member_id).await?;
						}
					} else {
						debug!(path, "unsupported SCIM remove path, skipping");
					}
				}
				(op_kind, path) => {
					debug!(?op_kind, ?path, "unsupported SCIM patch operation, skipping");
				}
			}
		}

		self.events.log(
			EventEntry::builder(EventType::GroupUpdated, EventActor::System(SystemUser::Scim))
				.organization(*org_id)
				.group(*group_id)
				.details(json!({"operations": patch.operations.len()}))
				.build(),
		);

		Ok(())
	}

	/// Delete a group.
	#[tracing::instrument(skip(self), fields(org_id = %org_id, group_id = %group_id))]
	pub async fn delete_group(
		&self,
		org_id: &OrgId,
		group_id: &GroupId,
	) -> Result<(), ScimApiError> {
		let group = self.load_owned_group(org_id, group_id).await?;

		self.group_store.delete_group(group_id).await?;

		self.events.log(
			EventEntry::builder(EventType::GroupDeleted, EventActor::System(SystemUser::Scim))
				.organization(*org_id)
				.group(*group_id)
				.details(json!({"name": group.name}))
				.build(),
		);

		tracing::info!(group_id = %group_id, org_id = %org_id, "SCIM: group deleted");
		Ok(())
	}
}
