// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Organization-user (seat) repository.
//!
//! An `OrganizationUser` row is a seat in an organization. A row starts as
//! `Invited` (email only), becomes `Accepted` once the invitee registers and
//! `Confirmed` once an admin releases the org key to them. `Revoked` rows
//! keep history but free their seat.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqlitePool, Row};
use std::fmt;

use crate::error::DbError;
use crate::org::parse_timestamp;
use crate::types::{OrgId, OrgUserId, UserId};

/// Lifecycle status of an organization user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrganizationUserStatus {
	Invited,
	Accepted,
	Confirmed,
	Revoked,
}

impl fmt::Display for OrganizationUserStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let s = match self {
			OrganizationUserStatus::Invited => "invited",
			OrganizationUserStatus::Accepted => "accepted",
			OrganizationUserStatus::Confirmed => "confirmed",
			OrganizationUserStatus::Revoked => "revoked",
		};
		write!(f, "{s}")
	}
}

impl OrganizationUserStatus {
	pub fn parse(s: &str) -> Option<Self> {
		match s {
			"invited" => Some(OrganizationUserStatus::Invited),
			"accepted" => Some(OrganizationUserStatus::Accepted),
			"confirmed" => Some(OrganizationUserStatus::Confirmed),
			"revoked" => Some(OrganizationUserStatus::Revoked),
			_ => None,
		}
	}
}

/// Role of an organization user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrganizationUserType {
	Owner,
	Admin,
	User,
}

impl fmt::Display for OrganizationUserType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let s = match self {
			OrganizationUserType::Owner => "owner",
			OrganizationUserType::Admin => "admin",
			OrganizationUserType::User => "user",
		};
		write!(f, "{s}")
	}
}

impl OrganizationUserType {
	pub fn parse(s: &str) -> Option<Self> {
		match s {
			"owner" => Some(OrganizationUserType::Owner),
			"admin" => Some(OrganizationUserType::Admin),
			"user" => Some(OrganizationUserType::User),
			_ => None,
		}
	}
}

/// A seat in an organization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizationUser {
	pub id: OrgUserId,
	pub organization_id: OrgId,
	/// Set once the invitee has an account.
	pub user_id: Option<UserId>,
	/// Invitation email; kept after acceptance for audit trails.
	pub email: Option<String>,
	pub status: OrganizationUserStatus,
	pub role: OrganizationUserType,
	/// Identity-provider correlation handle (SCIM `externalId`).
	pub external_id: Option<String>,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

impl OrganizationUser {
	/// A freshly invited seat.
	pub fn invite(
		organization_id: OrgId,
		email: impl Into<String>,
		role: OrganizationUserType,
	) -> Self {
		let now = Utc::now();
		Self {
			id: OrgUserId::generate(),
			organization_id,
			user_id: None,
			email: Some(email.into()),
			status: OrganizationUserStatus::Invited,
			role,
			external_id: None,
			created_at: now,
			updated_at: now,
		}
	}
}

#[async_trait]
pub trait OrganizationUserStore: Send + Sync {
	async fn create_org_user(&self, org_user: &OrganizationUser) -> Result<(), DbError>;
	async fn get_org_user(&self, id: &OrgUserId) -> Result<Option<OrganizationUser>, DbError>;
	async fn list_org_users(&self, org_id: &OrgId) -> Result<Vec<OrganizationUser>, DbError>;
	async fn count_seats_taken(&self, org_id: &OrgId) -> Result<i64, DbError>;
	async fn set_status(
		&self,
		id: &OrgUserId,
		status: OrganizationUserStatus,
	) -> Result<(), DbError>;
	async fn filter_in_org(
		&self,
		org_id: &OrgId,
		ids: &[OrgUserId],
	) -> Result<Vec<OrgUserId>, DbError>;
}

/// Repository for organization-user database operations.
#[derive(Clone)]
pub struct OrganizationUserRepository {
	pool: SqlitePool,
}

impl OrganizationUserRepository {
	/// Create a new repository with the given pool.
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	/// Insert a new organization user.
	#[tracing::instrument(skip(self, org_user), fields(org_user_id = %org_user.id, org_id = %org_user.organization_id))]
	pub async fn create_org_user(&self, org_user: &OrganizationUser) -> Result<(), DbError> {
		sqlx::query(
			r#"
			INSERT INTO organization_users (
				id, organization_id, user_id, email, status, role, external_id,
				created_at, updated_at
			)
			VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
			"#,
		)
		.bind(org_user.id.to_string())
		.bind(org_user.organization_id.to_string())
		.bind(org_user.user_id.map(|id| id.to_string()))
		.bind(&org_user.email)
		.bind(org_user.status.to_string())
		.bind(org_user.role.to_string())
		.bind(&org_user.external_id)
		.bind(org_user.created_at.to_rfc3339())
		.bind(org_user.updated_at.to_rfc3339())
		.execute(&self.pool)
		.await?;

		tracing::debug!(org_user_id = %org_user.id, "organization user created");
		Ok(())
	}

	/// Get an organization user by ID.
	#[tracing::instrument(skip(self), fields(org_user_id = %id))]
	pub async fn get_org_user(&self, id: &OrgUserId) -> Result<Option<OrganizationUser>, DbError> {
		let row = sqlx::query(
			r#"
			SELECT id, organization_id, user_id, email, status, role, external_id,
			       created_at, updated_at
			FROM organization_users
			WHERE id = ?
			"#,
		)
		.bind(id.to_string())
		.fetch_optional(&self.pool)
		.await?;

		row.map(|r| row_to_org_user(&r)).transpose()
	}

	/// List all organization users, newest last.
	#[tracing::instrument(skip(self), fields(org_id = %org_id))]
	pub async fn list_org_users(&self, org_id: &OrgId) -> Result<Vec<OrganizationUser>, DbError> {
		let rows = sqlx::query(
			r#"
			SELECT id, organization_id, user_id, email, status, role, external_id,
			       created_at, updated_at
			FROM organization_users
			WHERE organization_id = ?
			ORDER BY created_at ASC
			"#,
		)
		.bind(org_id.to_string())
		.fetch_all(&self.pool)
		.await?;

		rows.iter().map(row_to_org_user).collect()
	}

	/// Number of occupied seats: every non-revoked organization user.
	#[tracing::instrument(skip(self), fields(org_id = %org_id))]
	pub async fn count_seats_taken(&self, org_id: &OrgId) -> Result<i64, DbError> {
		let row: (i64,) = sqlx::query_as(
			r#"
			SELECT COUNT(*) FROM organization_users
			WHERE organization_id = ? AND status != 'revoked'
			"#,
		)
		.bind(org_id.to_string())
		.fetch_one(&self.pool)
		.await?;

		Ok(row.0)
	}

	/// Move an organization user to a new lifecycle status.
	#[tracing::instrument(skip(self), fields(org_user_id = %id, status = %status))]
	pub async fn set_status(
		&self,
		id: &OrgUserId,
		status: OrganizationUserStatus,
	) -> Result<(), DbError> {
		let now = Utc::now().to_rfc3339();
		let result = sqlx::query(
			r#"
			UPDATE organization_users
			SET status = ?, updated_at = ?
			WHERE id = ?
			"#,
		)
		.bind(status.to_string())
		.bind(now)
		.bind(id.to_string())
		.execute(&self.pool)
		.await?;

		if result.rows_affected() == 0 {
			return Err(DbError::NotFound(format!("organization user {id}")));
		}
		Ok(())
	}

	/// Keep only the ids that are seats of the given organization.
	///
	/// SCIM membership payloads may reference users that were deprovisioned
	/// mid-sync; unknown ids are silently dropped.
	#[tracing::instrument(skip(self, ids), fields(org_id = %org_id, candidates = ids.len()))]
	pub async fn filter_in_org(
		&self,
		org_id: &OrgId,
		ids: &[OrgUserId],
	) -> Result<Vec<OrgUserId>, DbError> {
		let mut known = Vec::with_capacity(ids.len());
		for id in ids {
			let row: (i64,) = sqlx::query_as(
				r#"
				SELECT COUNT(*) FROM organization_users
				WHERE id = ? AND organization_id = ?
				"#,
			)
			.bind(id.to_string())
			.bind(org_id.to_string())
			.fetch_one(&self.pool)
			.await?;

			if row.0 > 0 {
				known.push(*id);
			}
		}

		if known.len() != ids.len() {
			tracing::debug!(
				org_id = %org_id,
				dropped = ids.len() - known.len(),
				"dropped member ids not in organization"
			);
		}
		Ok(known)
	}
}

fn row_to_org_user(row: &sqlx::sqlite::SqliteRow) -> Result<OrganizationUser, DbError> {
	let id_str: String = row.get("id");
	let org_id_str: String = row.get("organization_id");
	let user_id_str: Option<String> = row.get("user_id");
	let status_str: String = row.get("status");
	let role_str: String = row.get("role");
	let created_at: String = row.get("created_at");
	let updated_at: String = row.get("updated_at");

	let status = OrganizationUserStatus::parse(&status_str)
		.ok_or_else(|| DbError::Internal(format!("Unknown org user status: {status_str}")))?;
	let role = OrganizationUserType::parse(&role_str)
		.ok_or_else(|| DbError::Internal(format!("Unknown org user role: {role_str}")))?;

	Ok(OrganizationUser {
		id: id_str
			.parse()
			.map_err(|e| DbError::Internal(format!("Invalid org user ID: {e}")))?,
		organization_id: org_id_str
			.parse()
			.map_err(|e| DbError::Internal(format!("Invalid organization_id: {e}")))?,
		user_id: user_id_str
			.map(|s| {
				s.parse()
					.map_err(|e| DbError::Internal(format!("Invalid user_id: {e}")))
			})
			.transpose()?,
		email: row.get("email"),
		status,
		role,
		external_id: row.get("external_id"),
		created_at: parse_timestamp(&created_at, "created_at")?,
		updated_at: parse_timestamp(&updated_at, "updated_at")?,
	})
}

#[async_trait]
impl OrganizationUserStore for OrganizationUserRepository {
	async fn create_org_user(&self, org_user: &OrganizationUser) -> Result<(), DbError> {
		self.create_org_user(org_user).await
	}

	async fn get_org_user(&self, id: &OrgUserId) -> Result<Option<OrganizationUser>, DbError> {
		self.get_org_user(id).await
	}

	async fn list_org_users(&self, org_id: &OrgId) -> Result<Vec<OrganizationUser>, DbError> {
		self.list_org_users(org_id).await
	}

	async fn count_seats_taken(&self, org_id: &OrgId) -> Result<i64, DbError> {
		self.count_seats_taken(org_id).await
	}

	async fn set_status(
		&self,
		id: &OrgUserId,
		status: OrganizationUserStatus,
	) -> Result<(), DbError> {
		self.set_status(id, status).await
	}

	async fn filter_in_org(
		&self,
		org_id: &OrgId,
		ids: &[OrgUserId],
	) -> Result<Vec<OrgUserId>, DbError> {
		self.filter_in_org(org_id, ids).await
	}
}
