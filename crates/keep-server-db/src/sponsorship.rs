// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Organization sponsorship repository.
//!
//! Enterprise seats can sponsor a Families subscription for one of their
//! members. A sponsorship row tracks the outstanding offer until it is
//! redeemed or removed.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqlitePool, Row};

use crate::error::DbError;
use crate::org::parse_timestamp;
use crate::types::{OrgId, OrgUserId, SponsorshipId};

/// A Families-for-Enterprise sponsorship offer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizationSponsorship {
	pub id: SponsorshipId,
	pub sponsoring_organization_id: OrgId,
	pub sponsoring_organization_user_id: OrgUserId,
	/// Where the offer email goes. `None` once redeemed.
	pub offered_to_email: Option<String>,
	pub friendly_name: Option<String>,
	pub to_delete: bool,
	pub valid_until: Option<DateTime<Utc>>,
	pub created_at: DateTime<Utc>,
}

impl OrganizationSponsorship {
	/// A fresh offer from the given seat to the given address.
	pub fn offer(
		sponsoring_organization_id: OrgId,
		sponsoring_organization_user_id: OrgUserId,
		offered_to_email: impl Into<String>,
		friendly_name: Option<String>,
	) -> Self {
		Self {
			id: SponsorshipId::generate(),
			sponsoring_organization_id,
			sponsoring_organization_user_id,
			offered_to_email: Some(offered_to_email.into()),
			friendly_name,
			to_delete: false,
			valid_until: None,
			created_at: Utc::now(),
		}
	}
}

#[async_trait]
pub trait SponsorshipStore: Send + Sync {
	async fn create_sponsorship(
		&self,
		sponsorship: &OrganizationSponsorship,
	) -> Result<(), DbError>;
	async fn get_sponsorship(
		&self,
		id: &SponsorshipId,
	) -> Result<Option<OrganizationSponsorship>, DbError>;
	async fn get_by_sponsoring_org_user(
		&self,
		org_user_id: &OrgUserId,
	) -> Result<Option<OrganizationSponsorship>, DbError>;
}

/// Repository for sponsorship database operations.
#[derive(Clone)]
pub struct SponsorshipRepository {
	pool: SqlitePool,
}

impl SponsorshipRepository {
	/// Create a new repository with the given pool.
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	/// Insert a new sponsorship offer.
	#[tracing::instrument(
		skip(self, sponsorship),
		fields(sponsorship_id = %sponsorship.id, org_id = %sponsorship.sponsoring_organization_id)
	)]
	pub async fn create_sponsorship(
		&self,
		sponsorship: &OrganizationSponsorship,
	) -> Result<(), DbError> {
		sqlx::query(
			r#"
			INSERT INTO organization_sponsorships (
				id, sponsoring_organization_id, sponsoring_organization_user_id,
				offered_to_email, friendly_name, to_delete, valid_until, created_at
			)
			VALUES (?, ?, ?, ?, ?, ?, ?, ?)
			"#,
		)
		.bind(sponsorship.id.to_string())
		.bind(sponsorship.sponsoring_organization_id.to_string())
		.bind(sponsorship.sponsoring_organization_user_id.to_string())
		.bind(&sponsorship.offered_to_email)
		.bind(&sponsorship.friendly_name)
		.bind(sponsorship.to_delete as i32)
		.bind(sponsorship.valid_until.map(|d| d.to_rfc3339()))
		.bind(sponsorship.created_at.to_rfc3339())
		.execute(&self.pool)
		.await?;

		tracing::debug!(sponsorship_id = %sponsorship.id, "sponsorship created");
		Ok(())
	}

	/// Get a sponsorship by ID.
	#[tracing::instrument(skip(self), fields(sponsorship_id = %id))]
	pub async fn get_sponsorship(
		&self,
		id: &SponsorshipId,
	) -> Result<Option<OrganizationSponsorship>, DbError> {
		let row = sqlx::query(
			r#"
			SELECT id, sponsoring_organization_id, sponsoring_organization_user_id,
			       offered_to_email, friendly_name, to_delete, valid_until, created_at
			FROM organization_sponsorships
			WHERE id = ?
			"#,
		)
		.bind(id.to_string())
		.fetch_optional(&self.pool)
		.await?;

		row.map(|r| row_to_sponsorship(&r)).transpose()
	}

	/// The outstanding sponsorship created by a given organization user.
	#[tracing::instrument(skip(self), fields(org_user_id = %org_user_id))]
	pub async fn get_by_sponsoring_org_user(
		&self,
		org_user_id: &OrgUserId,
	) -> Result<Option<OrganizationSponsorship>, DbError> {
		let row = sqlx::query(
			r#"
			SELECT id, sponsoring_organization_id, sponsoring_organization_user_id,
			       offered_to_email, friendly_name, to_delete, valid_until, created_at
			FROM organization_sponsorships
			WHERE sponsoring_organization_user_id = ? AND to_delete = 0
			ORDER BY created_at DESC
			LIMIT 1
			"#,
		)
		.bind(org_user_id.to_string())
		.fetch_optional(&self.pool)
		.await?;

		row.map(|r| row_to_sponsorship(&r)).transpose()
	}
}

fn row_to_sponsorship(row: &sqlx::sqlite::SqliteRow) -> Result<OrganizationSponsorship, DbError> {
	let id_str: String = row.get("id");
	let org_id_str: String = row.get("sponsoring_organization_id");
	let org_user_id_str: String = row.get("sponsoring_organization_user_id");
	let to_delete: i32 = row.get("to_delete");
	let valid_until: Option<String> = row.get("valid_until");
	let created_at: String = row.get("created_at");

	Ok(OrganizationSponsorship {
		id: id_str
			.parse()
			.map_err(|e| DbError::Internal(format!("Invalid sponsorship ID: {e}")))?,
		sponsoring_organization_id: org_id_str
			.parse()
			.map_err(|e| DbError::Internal(format!("Invalid sponsoring_organization_id: {e}")))?,
		sponsoring_organization_user_id: org_user_id_str
			.parse()
			.map_err(|e| DbError::Internal(format!("Invalid sponsoring_organization_user_id: {e}")))?,
		offered_to_email: row.get("offered_to_email"),
		friendly_name: row.get("friendly_name"),
		to_delete: to_delete != 0,
		valid_until: valid_until
			.map(|v| parse_timestamp(&v, "valid_until"))
			.transpose()?,
		created_at: parse_timestamp(&created_at, "created_at")?,
	})
}

#[async_trait]
impl SponsorshipStore for SponsorshipRepository {
	async fn create_sponsorship(
		&self,
		sponsorship: &OrganizationSponsorship,
	) -> Result<(), DbError> {
		self.create_sponsorship(sponsorship).await
	}

	async fn get_sponsorship(
		&self,
		id: &SponsorshipId,
	) -> Result<Option<OrganizationSponsorship>, DbError> {
		self.get_sponsorship(id).await
	}

	async fn get_by_sponsoring_org_user(
		&self,
		org_user_id: &OrgUserId,
	) -> Result<Option<OrganizationSponsorship>, DbError> {
		self.get_by_sponsoring_org_user(org_user_id).await
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::org::{OrgRepository, Organization, PlanType};
	use crate::org_user::{OrganizationUser, OrganizationUserRepository, OrganizationUserType};
	use crate::testing::create_migrated_test_pool;

	async fn seed(pool: &SqlitePool) -> (OrgId, OrgUserId) {
		let org = Organization::new("Acme", "billing@acme.test", PlanType::EnterpriseAnnually);
		OrgRepository::new(pool.clone()).create_org(&org).await.unwrap();
		let org_user = OrganizationUser::invite(org.id, "user@acme.test", OrganizationUserType::User);
		OrganizationUserRepository::new(pool.clone())
			.create_org_user(&org_user)
			.await
			.unwrap();
		(org.id, org_user.id)
	}

	#[tokio::test]
	async fn test_offer_round_trip() {
		let pool = create_migrated_test_pool().await;
		let (org_id, org_user_id) = seed(&pool).await;
		let repo = SponsorshipRepository::new(pool);

		let offer = OrganizationSponsorship::offer(
			org_id,
			org_user_id,
			"family@home.test",
			Some("Home vault".to_string()),
		);
		repo.create_sponsorship(&offer).await.unwrap();

		let fetched = repo.get_sponsorship(&offer.id).await.unwrap().unwrap();
		assert_eq!(fetched.offered_to_email.as_deref(), Some("family@home.test"));
		assert_eq!(fetched.friendly_name.as_deref(), Some("Home vault"));
		assert!(!fetched.to_delete);

		let by_user = repo
			.get_by_sponsoring_org_user(&org_user_id)
			.await
			.unwrap()
			.unwrap();
		assert_eq!(by_user.id, offer.id);
	}

	#[tokio::test]
	async fn test_no_outstanding_offer() {
		let pool = create_migrated_test_pool().await;
		let (_, org_user_id) = seed(&pool).await;
		let repo = SponsorshipRepository::new(pool);
		assert!(repo
			.get_by_sponsoring_org_user(&org_user_id)
			.await
			.unwrap()
			.is_none());
	}
}
