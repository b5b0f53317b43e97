// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core event types for the organization event log.
//!
//! - [`EventType`]: Enumeration of recorded events
//! - [`EventActor`]: Who performed the action (a user or a system integration)
//! - [`EventEntry`]: Complete event record
//! - [`EventBuilder`]: Fluent API for constructing entries

use chrono::{DateTime, Utc};
use keep_server_db::{GroupId, OrgId, OrgUserId, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Types of events recorded in the organization event log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
	// Group events
	GroupCreated,
	GroupUpdated,
	GroupDeleted,

	// Organization user events
	OrganizationUserInvited,
	OrganizationUserRevoked,

	// Billing events
	OrganizationSubscriptionUpdated,
	SponsorshipOfferSent,
}

impl fmt::Display for EventType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let s = match self {
			EventType::GroupCreated => "group_created",
			EventType::GroupUpdated => "group_updated",
			EventType::GroupDeleted => "group_deleted",
			EventType::OrganizationUserInvited => "organization_user_invited",
			EventType::OrganizationUserRevoked => "organization_user_revoked",
			EventType::OrganizationSubscriptionUpdated => "organization_subscription_updated",
			EventType::SponsorshipOfferSent => "sponsorship_offer_sent",
		};
		write!(f, "{s}")
	}
}

/// Non-interactive principals that can act on an organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemUser {
	/// An identity provider acting through the SCIM endpoint.
	Scim,
	/// The billing subsystem (autoscaling, gateway webhooks).
	Billing,
	/// The management API, when the platform proxy carries no actor.
	Api,
}

/// Who performed the recorded action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventActor {
	System(SystemUser),
	User(UserId),
}

impl fmt::Display for EventActor {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			EventActor::System(SystemUser::Scim) => write!(f, "system:scim"),
			EventActor::System(SystemUser::Billing) => write!(f, "system:billing"),
			EventActor::System(SystemUser::Api) => write!(f, "system:api"),
			EventActor::User(id) => write!(f, "user:{id}"),
		}
	}
}

impl EventActor {
	/// Parse the storage form produced by [`fmt::Display`].
	pub fn parse(s: &str) -> Option<Self> {
		match s {
			"system:scim" => Some(EventActor::System(SystemUser::Scim)),
			"system:billing" => Some(EventActor::System(SystemUser::Billing)),
			"system:api" => Some(EventActor::System(SystemUser::Api)),
			other => other
				.strip_prefix("user:")
				.and_then(|id| id.parse().ok())
				.map(|id: Uuid| EventActor::User(UserId::new(id))),
		}
	}
}

/// A complete event record.
#[derive(Debug, Clone)]
pub struct EventEntry {
	pub id: Uuid,
	pub event_type: EventType,
	pub actor: EventActor,
	pub organization_id: Option<OrgId>,
	pub group_id: Option<GroupId>,
	pub organization_user_id: Option<OrgUserId>,
	pub details: serde_json::Value,
	pub occurred_at: DateTime<Utc>,
}

impl EventEntry {
	/// Start building an entry for the given event type and actor.
	pub fn builder(event_type: EventType, actor: EventActor) -> EventBuilder {
		EventBuilder {
			event_type,
			actor,
			organization_id: None,
			group_id: None,
			organization_user_id: None,
			details: serde_json::Value::Null,
		}
	}
}

/// Fluent builder for [`EventEntry`].
pub struct EventBuilder {
	event_type: EventType,
	actor: EventActor,
	organization_id: Option<OrgId>,
	group_id: Option<GroupId>,
	organization_user_id: Option<OrgUserId>,
	details: serde_json::Value,
}

impl EventBuilder {
	pub fn organization(mut self, id: OrgId) -> Self {
		self.organization_id = Some(id);
		self
	}

	pub fn group(mut self, id: GroupId) -> Self {
		self.group_id = Some(id);
		self
	}

	pub fn organization_user(mut self, id: OrgUserId) -> Self {
		self.organization_user_id = Some(id);
		self
	}

	pub fn details(mut self, details: serde_json::Value) -> Self {
		self.details = details;
		self
	}

	pub fn build(self) -> EventEntry {
		EventEntry {
			id: Uuid::new_v4(),
			event_type: self.event_type,
			actor: self.actor,
			organization_id: self.organization_id,
			group_id: self.group_id,
			organization_user_id: self.organization_user_id,
			details: self.details,
			occurred_at: Utc::now(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn actor_display_round_trips() {
		let scim = EventActor::System(SystemUser::Scim);
		assert_eq!(EventActor::parse(&scim.to_string()), Some(scim));

		let user = EventActor::User(UserId::generate());
		assert_eq!(EventActor::parse(&user.to_string()), Some(user));

		assert_eq!(EventActor::parse("gremlin"), None);
	}

	#[test]
	fn builder_populates_entry() {
		let org_id = OrgId::generate();
		let group_id = GroupId::generate();
		let entry = EventEntry::builder(EventType::GroupCreated, EventActor::System(SystemUser::Scim))
			.organization(org_id)
			.group(group_id)
			.details(json!({"name": "Engineering"}))
			.build();

		assert_eq!(entry.event_type, EventType::GroupCreated);
		assert_eq!(entry.organization_id, Some(org_id));
		assert_eq!(entry.group_id, Some(group_id));
		assert_eq!(entry.details["name"], "Engineering");
		assert!(entry.organization_user_id.is_none());
	}

	#[test]
	fn event_type_storage_names() {
		assert_eq!(EventType::GroupDeleted.to_string(), "group_deleted");
		assert_eq!(
			EventType::OrganizationSubscriptionUpdated.to_string(),
			"organization_subscription_updated"
		);
	}
}
