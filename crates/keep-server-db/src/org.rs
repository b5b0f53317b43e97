// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Organization repository for database operations.
//!
//! Organizations carry the subscription state the billing policies operate
//! on: the seat cap, the autoscale ceiling and the payment-gateway handles.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqlitePool, Row};
use std::fmt;

use crate::error::DbError;
use crate::types::OrgId;

/// Subscription plan tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanType {
	Free,
	FamiliesAnnually,
	TeamsMonthly,
	TeamsAnnually,
	EnterpriseMonthly,
	EnterpriseAnnually,
}

impl fmt::Display for PlanType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let s = match self {
			PlanType::Free => "free",
			PlanType::FamiliesAnnually => "families_annually",
			PlanType::TeamsMonthly => "teams_monthly",
			PlanType::TeamsAnnually => "teams_annually",
			PlanType::EnterpriseMonthly => "enterprise_monthly",
			PlanType::EnterpriseAnnually => "enterprise_annually",
		};
		write!(f, "{s}")
	}
}

impl PlanType {
	pub fn parse(s: &str) -> Option<Self> {
		match s {
			"free" => Some(PlanType::Free),
			"families_annually" => Some(PlanType::FamiliesAnnually),
			"teams_monthly" => Some(PlanType::TeamsMonthly),
			"teams_annually" => Some(PlanType::TeamsAnnually),
			"enterprise_monthly" => Some(PlanType::EnterpriseMonthly),
			"enterprise_annually" => Some(PlanType::EnterpriseAnnually),
			_ => None,
		}
	}
}

/// An organization and its subscription state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Organization {
	pub id: OrgId,
	pub name: String,
	pub billing_email: String,
	pub plan_type: PlanType,
	/// Licensed seat count. `None` means the plan has no seat cap.
	pub seats: Option<i64>,
	/// Ceiling the subscription may autoscale to. `None` disables the cap
	/// check (autoscaling is still gated by the plan).
	pub max_autoscale_seats: Option<i64>,
	pub use_groups: bool,
	pub gateway_customer_id: Option<String>,
	pub gateway_subscription_id: Option<String>,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

impl Organization {
	/// A new organization on the given plan, without gateway handles.
	pub fn new(name: impl Into<String>, billing_email: impl Into<String>, plan_type: PlanType) -> Self {
		let now = Utc::now();
		Self {
			id: OrgId::generate(),
			name: name.into(),
			billing_email: billing_email.into(),
			plan_type,
			seats: None,
			max_autoscale_seats: None,
			use_groups: false,
			gateway_customer_id: None,
			gateway_subscription_id: None,
			created_at: now,
			updated_at: now,
		}
	}
}

#[async_trait]
pub trait OrgStore: Send + Sync {
	async fn create_org(&self, org: &Organization) -> Result<(), DbError>;
	async fn get_org_by_id(&self, id: &OrgId) -> Result<Option<Organization>, DbError>;
	async fn update_org(&self, org: &Organization) -> Result<(), DbError>;
	async fn update_subscription(
		&self,
		id: &OrgId,
		seats: Option<i64>,
		max_autoscale_seats: Option<i64>,
	) -> Result<(), DbError>;
}

/// Repository for organization database operations.
///
/// All IDs are UUIDs stored as strings in SQLite.
#[derive(Clone)]
pub struct OrgRepository {
	pool: SqlitePool,
}

impl OrgRepository {
	/// Create a new repository with the given pool.
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	/// Create a new organization.
	///
	/// # Errors
	/// Returns `DbError::Sqlx` if insert fails (e.g., duplicate id).
	#[tracing::instrument(skip(self, org), fields(org_id = %org.id, plan = %org.plan_type))]
	pub async fn create_org(&self, org: &Organization) -> Result<(), DbError> {
		sqlx::query(
			r#"
			INSERT INTO organizations (
				id, name, billing_email, plan_type, seats, max_autoscale_seats,
				use_groups, gateway_customer_id, gateway_subscription_id,
				created_at, updated_at
			)
			VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
			"#,
		)
		.bind(org.id.to_string())
		.bind(&org.name)
		.bind(&org.billing_email)
		.bind(org.plan_type.to_string())
		.bind(org.seats)
		.bind(org.max_autoscale_seats)
		.bind(org.use_groups as i32)
		.bind(&org.gateway_customer_id)
		.bind(&org.gateway_subscription_id)
		.bind(org.created_at.to_rfc3339())
		.bind(org.updated_at.to_rfc3339())
		.execute(&self.pool)
		.await?;

		tracing::debug!(org_id = %org.id, "organization created");
		Ok(())
	}

	/// Get an organization by ID.
	///
	/// # Returns
	/// `None` if no organization exists with this ID.
	#[tracing::instrument(skip(self), fields(org_id = %id))]
	pub async fn get_org_by_id(&self, id: &OrgId) -> Result<Option<Organization>, DbError> {
		let row = sqlx::query(
			r#"
			SELECT id, name, billing_email, plan_type, seats, max_autoscale_seats,
			       use_groups, gateway_customer_id, gateway_subscription_id,
			       created_at, updated_at
			FROM organizations
			WHERE id = ?
			"#,
		)
		.bind(id.to_string())
		.fetch_optional(&self.pool)
		.await?;

		row.map(|r| row_to_org(&r)).transpose()
	}

	/// Update an organization's mutable fields.
	#[tracing::instrument(skip(self, org), fields(org_id = %org.id))]
	pub async fn update_org(&self, org: &Organization) -> Result<(), DbError> {
		let now = Utc::now().to_rfc3339();
		sqlx::query(
			r#"
			UPDATE organizations
			SET name = ?, billing_email = ?, plan_type = ?, seats = ?,
			    max_autoscale_seats = ?, use_groups = ?, gateway_customer_id = ?,
			    gateway_subscription_id = ?, updated_at = ?
			WHERE id = ?
			"#,
		)
		.bind(&org.name)
		.bind(&org.billing_email)
		.bind(org.plan_type.to_string())
		.bind(org.seats)
		.bind(org.max_autoscale_seats)
		.bind(org.use_groups as i32)
		.bind(&org.gateway_customer_id)
		.bind(&org.gateway_subscription_id)
		.bind(now)
		.bind(org.id.to_string())
		.execute(&self.pool)
		.await?;

		tracing::debug!(org_id = %org.id, "organization updated");
		Ok(())
	}

	/// Persist the outcome of a subscription change.
	///
	/// Only the seat fields move here; everything else on the row is left
	/// untouched so the command layer cannot clobber concurrent renames.
	#[tracing::instrument(skip(self), fields(org_id = %id, ?seats, ?max_autoscale_seats))]
	pub async fn update_subscription(
		&self,
		id: &OrgId,
		seats: Option<i64>,
		max_autoscale_seats: Option<i64>,
	) -> Result<(), DbError> {
		let now = Utc::now().to_rfc3339();
		let result = sqlx::query(
			r#"
			UPDATE organizations
			SET seats = ?, max_autoscale_seats = ?, updated_at = ?
			WHERE id = ?
			"#,
		)
		.bind(seats)
		.bind(max_autoscale_seats)
		.bind(now)
		.bind(id.to_string())
		.execute(&self.pool)
		.await?;

		if result.rows_affected() == 0 {
			return Err(DbError::NotFound(format!("organization {id}")));
		}

		tracing::debug!(org_id = %id, "subscription updated");
		Ok(())
	}
}

fn row_to_org(row: &sqlx::sqlite::SqliteRow) -> Result<Organization, DbError> {
	let id_str: String = row.get("id");
	let plan_str: String = row.get("plan_type");
	let use_groups: i32 = row.get("use_groups");
	let created_at: String = row.get("created_at");
	let updated_at: String = row.get("updated_at");

	let id = id_str
		.parse()
		.map_err(|e| DbError::Internal(format!("Invalid org ID: {e}")))?;
	let plan_type = PlanType::parse(&plan_str)
		.ok_or_else(|| DbError::Internal(format!("Unknown plan type: {plan_str}")))?;

	Ok(Organization {
		id,
		name: row.get("name"),
		billing_email: row.get("billing_email"),
		plan_type,
		seats: row.get("seats"),
		max_autoscale_seats: row.get("max_autoscale_seats"),
		use_groups: use_groups != 0,
		gateway_customer_id: row.get("gateway_customer_id"),
		gateway_subscription_id: row.get("gateway_subscription_id"),
		created_at: parse_timestamp(&created_at, "created_at")?,
		updated_at: parse_timestamp(&updated_at, "updated_at")?,
	})
}

pub(crate) fn parse_timestamp(value: &str, column: &str) -> Result<DateTime<Utc>, DbError> {
	DateTime::parse_from_rfc3339(value)
		.map(|dt| dt.with_timezone(&Utc))
		.map_err(|e| DbError::Internal(format!("Invalid {column}: {e}")))
}

#[async_trait]
impl OrgStore for OrgRepository {
	async fn create_org(&self, org: &Organization) -> Result<(), DbError> {
		self.create_org(org).await
	}

	async fn get_org_by_id(&self, id: &OrgId) -> Result<Option<Organization>, DbError> {
		self.get_org_by_id(id).await
	}

	async fn update_org(&self, org: &Organization) -> Result<(), DbError> {
		self.update_org(org).await
	}

	async fn update_subscription(
		&self,
		id: &OrgId,
		seats: Option<i64>,
		max_autoscale_seats: Option<i64>,
	) -> Result<(), DbError> {
		self.update_subscription(id, seats, max_autoscale_seats).await
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testing::create_migrated_test_pool;

	fn make_test_org(plan_type: PlanType) -> Organization {
		let mut org = Organization::new("Acme", "billing@acme.test", plan_type);
		org.seats = Some(10);
		org.gateway_customer_id = Some("cus_123".to_string());
		org.gateway_subscription_id = Some("sub_123".to_string());
		org
	}

	#[tokio::test]
	async fn test_create_and_get_org() {
		let repo = OrgRepository::new(create_migrated_test_pool().await);
		let org = make_test_org(PlanType::TeamsAnnually);

		repo.create_org(&org).await.unwrap();

		let fetched = repo.get_org_by_id(&org.id).await.unwrap().unwrap();
		assert_eq!(fetched.id, org.id);
		assert_eq!(fetched.name, "Acme");
		assert_eq!(fetched.plan_type, PlanType::TeamsAnnually);
		assert_eq!(fetched.seats, Some(10));
		assert_eq!(fetched.gateway_customer_id.as_deref(), Some("cus_123"));
	}

	#[tokio::test]
	async fn test_get_org_not_found() {
		let repo = OrgRepository::new(create_migrated_test_pool().await);
		assert!(repo
			.get_org_by_id(&OrgId::generate())
			.await
			.unwrap()
			.is_none());
	}

	#[tokio::test]
	async fn test_update_subscription_moves_only_seat_fields() {
		let repo = OrgRepository::new(create_migrated_test_pool().await);
		let org = make_test_org(PlanType::EnterpriseAnnually);
		repo.create_org(&org).await.unwrap();

		repo
			.update_subscription(&org.id, Some(25), Some(50))
			.await
			.unwrap();

		let fetched = repo.get_org_by_id(&org.id).await.unwrap().unwrap();
		assert_eq!(fetched.seats, Some(25));
		assert_eq!(fetched.max_autoscale_seats, Some(50));
		assert_eq!(fetched.name, "Acme");
	}

	#[tokio::test]
	async fn test_update_subscription_unknown_org_is_not_found() {
		let repo = OrgRepository::new(create_migrated_test_pool().await);
		let result = repo
			.update_subscription(&OrgId::generate(), Some(5), None)
			.await;
		assert!(matches!(result, Err(DbError::NotFound(_))));
	}

	#[test]
	fn test_plan_type_round_trip() {
		for plan in [
			PlanType::Free,
			PlanType::FamiliesAnnually,
			PlanType::TeamsMonthly,
			PlanType::TeamsAnnually,
			PlanType::EnterpriseMonthly,
			PlanType::EnterpriseAnnually,
		] {
			assert_eq!(PlanType::parse(&plan.to_string()), Some(plan));
		}
		assert_eq!(PlanType::parse("platinum"), None);
	}
}
