// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Group repository for database operations.
//!
//! Groups are organization-scoped; membership rows join groups to
//! organization users. SCIM provisioning is the main writer.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqlitePool, Row};

use crate::error::DbError;
use crate::org::parse_timestamp;
use crate::types::{GroupId, OrgId, OrgUserId};

/// A group within an organization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
	pub id: GroupId,
	pub organization_id: OrgId,
	pub name: String,
	/// Identity-provider correlation handle (SCIM `externalId`).
	pub external_id: Option<String>,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

impl Group {
	pub fn new(organization_id: OrgId, name: impl Into<String>, external_id: Option<String>) -> Self {
		let now = Utc::now();
		Self {
			id: GroupId::generate(),
			organization_id,
			name: name.into(),
			external_id,
			created_at: now,
			updated_at: now,
		}
	}
}

#[async_trait]
pub trait GroupStore: Send + Sync {
	async fn create_group(&self, group: &Group) -> Result<(), DbError>;
	async fn get_group_by_id(&self, id: &GroupId) -> Result<Option<Group>, DbError>;
	async fn list_groups_for_org(&self, org_id: &OrgId) -> Result<Vec<Group>, DbError>;
	async fn update_group(&self, group: &Group) -> Result<(), DbError>;
	async fn delete_group(&self, id: &GroupId) -> Result<bool, DbError>;
	async fn set_group_members(
		&self,
		group_id: &GroupId,
		member_ids: &[OrgUserId],
	) -> Result<(), DbError>;
	async fn add_group_members(
		&self,
		group_id: &GroupId,
		member_ids: &[OrgUserId],
	) -> Result<(), DbError>;
	async fn remove_group_member(
		&self,
		group_id: &GroupId,
		member_id: &OrgUserId,
	) -> Result<bool, DbError>;
	async fn list_group_member_ids(&self, group_id: &GroupId) -> Result<Vec<OrgUserId>, DbError>;
}

/// Repository for group database operations.
#[derive(Clone)]
pub struct GroupRepository {
	pool: SqlitePool,
}

impl GroupRepository {
	/// Create a new repository with the given pool.
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	/// Create a new group.
	#[tracing::instrument(skip(self, group), fields(group_id = %group.id, org_id = %group.organization_id))]
	pub async fn create_group(&self, group: &Group) -> Result<(), DbError> {
		sqlx::query(
			r#"
			INSERT INTO groups (id, organization_id, name, external_id, created_at, updated_at)
			VALUES (?, ?, ?, ?, ?, ?)
			"#,
		)
		.bind(group.id.to_string())
		.bind(group.organization_id.to_string())
		.bind(&group.name)
		.bind(&group.external_id)
		.bind(group.created_at.to_rfc3339())
		.bind(group.updated_at.to_rfc3339())
		.execute(&self.pool)
		.await?;

		tracing::debug!(group_id = %group.id, "group created");
		Ok(())
	}

	/// Get a group by ID.
	///
	/// # Returns
	/// `None` if no group exists with this ID. Callers enforce organization
	/// ownership; this lookup is id-only.
	#[tracing::instrument(skip(self), fields(group_id = %id))]
	pub async fn get_group_by_id(&self, id: &GroupId) -> Result<Option<Group>, DbError> {
		let row = sqlx::query(
			r#"
			SELECT id, organization_id, name, external_id, created_at, updated_at
			FROM groups
			WHERE id = ?
			"#,
		)
		.bind(id.to_string())
		.fetch_optional(&self.pool)
		.await?;

		row.map(|r| row_to_group(&r)).transpose()
	}

	/// List all groups in an organization, ordered by name.
	#[tracing::instrument(skip(self), fields(org_id = %org_id))]
	pub async fn list_groups_for_org(&self, org_id: &OrgId) -> Result<Vec<Group>, DbError> {
		let rows = sqlx::query(
			r#"
			SELECT id, organization_id, name, external_id, created_at, updated_at
			FROM groups
			WHERE organization_id = ?
			ORDER BY name ASC
			"#,
		)
		.bind(org_id.to_string())
		.fetch_all(&self.pool)
		.await?;

		let groups: Result<Vec<_>, _> = rows.iter().map(row_to_group).collect();
		let groups = groups?;
		tracing::debug!(org_id = %org_id, count = groups.len(), "listed groups for organization");
		Ok(groups)
	}

	/// Update a group's name and external id.
	#[tracing::instrument(skip(self, group), fields(group_id = %group.id))]
	pub async fn update_group(&self, group: &Group) -> Result<(), DbError> {
		let now = Utc::now().to_rfc3339();
		sqlx::query(
			r#"
			UPDATE groups
			SET name = ?, external_id = ?, updated_at = ?
			WHERE id = ?
			"#,
		)
		.bind(&group.name)
		.bind(&group.external_id)
		.bind(now)
		.bind(group.id.to_string())
		.execute(&self.pool)
		.await?;

		tracing::debug!(group_id = %group.id, "group updated");
		Ok(())
	}

	/// Delete a group. Membership rows cascade.
	///
	/// # Returns
	/// `true` if a group was deleted, `false` if not found.
	#[tracing::instrument(skip(self), fields(group_id = %id))]
	pub async fn delete_group(&self, id: &GroupId) -> Result<bool, DbError> {
		let result = sqlx::query(
			r#"
			DELETE FROM groups
			WHERE id = ?
			"#,
		)
		.bind(id.to_string())
		.execute(&self.pool)
		.await?;

		let deleted = result.rows_affected() > 0;
		if deleted {
			tracing::debug!(group_id = %id, "group deleted");
		}
		Ok(deleted)
	}

	/// Replace the group's membership with exactly `member_ids`.
	#[tracing::instrument(skip(self, member_ids), fields(group_id = %group_id, count = member_ids.len()))]
	pub async fn set_group_members(
		&self,
		group_id: &GroupId,
		member_ids: &[OrgUserId],
	) -> Result<(), DbError> {
		let mut tx = self.pool.begin().await?;

		sqlx::query("DELETE FROM group_users WHERE group_id = ?")
			.bind(group_id.to_string())
			.execute(&mut *tx)
			.await?;

		for member_id in member_ids {
			sqlx::query(
				r#"
				INSERT OR IGNORE INTO group_users (group_id, organization_user_id)
				VALUES (?, ?)
				"#,
			)
			.bind(group_id.to_string())
			.bind(member_id.to_string())
			.execute(&mut *tx)
			.await?;
		}

		tx.commit().await?;

		tracing::debug!(group_id = %group_id, count = member_ids.len(), "group membership replaced");
		Ok(())
	}

	/// Add members to the group. Existing memberships are left untouched.
	#[tracing::instrument(skip(self, member_ids), fields(group_id = %group_id, count = member_ids.len()))]
	pub async fn add_group_members(
		&self,
		group_id: &GroupId,
		member_ids: &[OrgUserId],
	) -> Result<(), DbError> {
		for member_id in member_ids {
			sqlx::query(
				r#"
				INSERT OR IGNORE INTO group_users (group_id, organization_user_id)
				VALUES (?, ?)
				"#,
			)
			.bind(group_id.to_string())
			.bind(member_id.to_string())
			.execute(&self.pool)
			.await?;
		}

		tracing::debug!(group_id = %group_id, count = member_ids.len(), "group members added");
		Ok(())
	}

	/// Remove one member from the group.
	///
	/// # Returns
	/// `true` if a membership row was removed.
	#[tracing::instrument(skip(self), fields(group_id = %group_id, member_id = %member_id))]
	pub async fn remove_group_member(
		&self,
		group_id: &GroupId,
		member_id: &OrgUserId,
	) -> Result<bool, DbError> {
		let result = sqlx::query(
			r#"
			DELETE FROM group_users
			WHERE group_id = ? AND organization_user_id = ?
			"#,
		)
		.bind(group_id.to_string())
		.bind(member_id.to_string())
		.execute(&self.pool)
		.await?;

		Ok(result.rows_affected() > 0)
	}

	/// Member ids of a group, in insertion-independent (sorted) order.
	#[tracing::instrument(skip(self), fields(group_id = %group_id))]
	pub async fn list_group_member_ids(
		&self,
		group_id: &GroupId,
	) -> Result<Vec<OrgUserId>, DbError> {
		let rows = sqlx::query(
			r#"
			SELECT organization_user_id
			FROM group_users
			WHERE group_id = ?
			ORDER BY organization_user_id ASC
			"#,
		)
		.bind(group_id.to_string())
		.fetch_all(&self.pool)
		.await?;

		rows
			.iter()
			.map(|r| {
				let id: String = r.get("organization_user_id");
				id.parse()
					.map_err(|e| DbError::Internal(format!("Invalid organization_user_id: {e}")))
			})
			.collect()
	}
}

fn row_to_group(row: &sqlx::sqlite::SqliteRow) -> Result<Group, DbError> {
	let id_str: String = row.get("id");
	let org_id_str: String = row.get("organization_id");
	let created_at: String = row.get("created_at");
	let updated_at: String = row.get("updated_at");

	Ok(Group {
		id: id_str
			.parse()
			.map_err(|e| DbError::Internal(format!("Invalid group ID: {e}")))?,
		organization_id: org_id_str
			.parse()
			.map_err(|e| DbError::Internal(format!("Invalid organization_id: {e}")))?,
		name: row.get("name"),
		external_id: row.get("external_id"),
		created_at: parse_timestamp(&created_at, "created_at")?,
		updated_at: parse_timestamp(&updated_at, "updated_at")?,
	})
}

#[async_trait]
impl GroupStore for GroupRepository {
	async fn create_group(&self, group: &Group) -> Result<(), DbError> {
		self.create_group(group).await
	}

	async fn get_group_by_id(&self, id: &GroupId) -> Result<Option<Group>, DbError> {
		self.get_group_by_id(id).await
	}

	async fn list_groups_for_org(&self, org_id: &OrgId) -> Result<Vec<Group>, DbError> {
		self.list_groups_for_org(org_id).await
	}

	async fn update_group(&self, group: &Group) -> Result<(), DbError> {
		self.update_group(group).await
	}

	async fn delete_group(&self, id: &GroupId) -> Result<bool, DbError> {
		self.delete_group(id).await
	}

	async fn set_group_members(
		&self,
		group_id: &GroupId,
		member_ids: &[OrgUserId],
	) -> Result<(), DbError> {
		self.set_group_members(group_id, member_ids).await
	}

	async fn add_group_members(
		&self,
		group_id: &GroupId,
		member_ids: &[OrgUserId],
	) -> Result<(), DbError> {
		self.add_group_members(group_id, member_ids).await
	}

	async fn remove_group_member(
		&self,
		group_id: &GroupId,
		member_id: &OrgUserId,
	) -> Result<bool, DbError> {
		self.remove_group_member(group_id, member_id).await
	}

	async fn list_group_member_ids(&self, group_id: &GroupId) -> Result<Vec<OrgUserId>, DbError> {
		self.list_group_member_ids(group_id).await
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::org::{OrgRepository, Organization, PlanType};
	use crate::org_user::{
		OrganizationUser, OrganizationUserRepository, OrganizationUserStatus, OrganizationUserType,
	};
	use crate::testing::create_migrated_test_pool;

	async fn seed_org(pool: &SqlitePool) -> OrgId {
		let org = Organization::new("Acme", "billing@acme.test", PlanType::TeamsAnnually);
		OrgRepository::new(pool.clone()).create_org(&org).await.unwrap();
		org.id
	}

	async fn seed_org_user(pool: &SqlitePool, org_id: &OrgId) -> OrgUserId {
		let org_user = OrganizationUser::invite(*org_id, "user@acme.test", OrganizationUserType::User);
		let id = org_user.id;
		OrganizationUserRepository::new(pool.clone())
			.create_org_user(&org_user)
			.await
			.unwrap();
		id
	}

	#[tokio::test]
	async fn test_create_and_get_group() {
		let pool = create_migrated_test_pool().await;
		let org_id = seed_org(&pool).await;
		let repo = GroupRepository::new(pool);

		let group = Group::new(org_id, "Engineering", Some("eng-01".to_string()));
		repo.create_group(&group).await.unwrap();

		let fetched = repo.get_group_by_id(&group.id).await.unwrap().unwrap();
		assert_eq!(fetched.name, "Engineering");
		assert_eq!(fetched.external_id.as_deref(), Some("eng-01"));
		assert_eq!(fetched.organization_id, org_id);
	}

	#[tokio::test]
	async fn test_list_groups_is_name_ordered_and_org_scoped() {
		let pool = create_migrated_test_pool().await;
		let org_a = seed_org(&pool).await;
		let org_b = seed_org(&pool).await;
		let repo = GroupRepository::new(pool);

		repo.create_group(&Group::new(org_a, "Zulu", None)).await.unwrap();
		repo.create_group(&Group::new(org_a, "Alpha", None)).await.unwrap();
		repo.create_group(&Group::new(org_b, "Other", None)).await.unwrap();

		let groups = repo.list_groups_for_org(&org_a).await.unwrap();
		let names: Vec<_> = groups.iter().map(|g| g.name.as_str()).collect();
		assert_eq!(names, vec!["Alpha", "Zulu"]);
	}

	#[tokio::test]
	async fn test_delete_group_reports_existence() {
		let pool = create_migrated_test_pool().await;
		let org_id = seed_org(&pool).await;
		let repo = GroupRepository::new(pool);

		let group = Group::new(org_id, "Temp", None);
		repo.create_group(&group).await.unwrap();

		assert!(repo.delete_group(&group.id).await.unwrap());
		assert!(!repo.delete_group(&group.id).await.unwrap());
		assert!(repo.get_group_by_id(&group.id).await.unwrap().is_none());
	}

	#[tokio::test]
	async fn test_membership_set_add_remove() {
		let pool = create_migrated_test_pool().await;
		let org_id = seed_org(&pool).await;
		let u1 = seed_org_user(&pool, &org_id).await;
		let u2 = seed_org_user(&pool, &org_id).await;
		let u3 = seed_org_user(&pool, &org_id).await;
		let repo = GroupRepository::new(pool);

		let group = Group::new(org_id, "Engineering", None);
		repo.create_group(&group).await.unwrap();

		repo.set_group_members(&group.id, &[u1, u2]).await.unwrap();
		assert_eq!(repo.list_group_member_ids(&group.id).await.unwrap().len(), 2);

		// Replacing drops members not in the new list.
		repo.set_group_members(&group.id, &[u2]).await.unwrap();
		assert_eq!(
			repo.list_group_member_ids(&group.id).await.unwrap(),
			vec![u2]
		);

		// Adding is idempotent.
		repo.add_group_members(&group.id, &[u2, u3]).await.unwrap();
		assert_eq!(repo.list_group_member_ids(&group.id).await.unwrap().len(), 2);

		assert!(repo.remove_group_member(&group.id, &u3).await.unwrap());
		assert!(!repo.remove_group_member(&group.id, &u3).await.unwrap());
	}
}
