// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Startup schema migrations.
//!
//! The DDL is idempotent (`CREATE TABLE IF NOT EXISTS`) and runs on every
//! boot before the first request is served.

use sqlx::SqlitePool;

use crate::error::DbError;

const SCHEMA: &[&str] = &[
	r#"
	CREATE TABLE IF NOT EXISTS organizations (
		id TEXT PRIMARY KEY,
		name TEXT NOT NULL,
		billing_email TEXT NOT NULL,
		plan_type TEXT NOT NULL,
		seats INTEGER,
		max_autoscale_seats INTEGER,
		use_groups INTEGER NOT NULL DEFAULT 0,
		gateway_customer_id TEXT,
		gateway_subscription_id TEXT,
		created_at TEXT NOT NULL,
		updated_at TEXT NOT NULL
	)
	"#,
	r#"
	CREATE TABLE IF NOT EXISTS organization_users (
		id TEXT PRIMARY KEY,
		organization_id TEXT NOT NULL REFERENCES organizations(id) ON DELETE CASCADE,
		user_id TEXT,
		email TEXT,
		status TEXT NOT NULL,
		role TEXT NOT NULL,
		external_id TEXT,
		created_at TEXT NOT NULL,
		updated_at TEXT NOT NULL
	)
	"#,
	r#"
	CREATE INDEX IF NOT EXISTS idx_organization_users_org
		ON organization_users(organization_id)
	"#,
	r#"
	CREATE TABLE IF NOT EXISTS groups (
		id TEXT PRIMARY KEY,
		organization_id TEXT NOT NULL REFERENCES organizations(id) ON DELETE CASCADE,
		name TEXT NOT NULL,
		external_id TEXT,
		created_at TEXT NOT NULL,
		updated_at TEXT NOT NULL
	)
	"#,
	r#"
	CREATE INDEX IF NOT EXISTS idx_groups_org ON groups(organization_id)
	"#,
	r#"
	CREATE TABLE IF NOT EXISTS group_users (
		group_id TEXT NOT NULL REFERENCES groups(id) ON DELETE CASCADE,
		organization_user_id TEXT NOT NULL REFERENCES organization_users(id) ON DELETE CASCADE,
		PRIMARY KEY (group_id, organization_user_id)
	)
	"#,
	r#"
	CREATE TABLE IF NOT EXISTS organization_sponsorships (
		id TEXT PRIMARY KEY,
		sponsoring_organization_id TEXT NOT NULL REFERENCES organizations(id) ON DELETE CASCADE,
		sponsoring_organization_user_id TEXT NOT NULL,
		offered_to_email TEXT,
		friendly_name TEXT,
		to_delete INTEGER NOT NULL DEFAULT 0,
		valid_until TEXT,
		created_at TEXT NOT NULL
	)
	"#,
	r#"
	CREATE TABLE IF NOT EXISTS events (
		id TEXT PRIMARY KEY,
		event_type TEXT NOT NULL,
		actor TEXT NOT NULL,
		organization_id TEXT,
		group_id TEXT,
		organization_user_id TEXT,
		details TEXT,
		occurred_at TEXT NOT NULL
	)
	"#,
	r#"
	CREATE INDEX IF NOT EXISTS idx_events_org ON events(organization_id, occurred_at)
	"#,
];

/// Apply the schema to the given pool.
#[tracing::instrument(skip(pool))]
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), DbError> {
	for statement in SCHEMA {
		sqlx::query(statement).execute(pool).await?;
	}
	tracing::debug!(statements = SCHEMA.len(), "database schema applied");
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testing::create_test_pool;

	#[tokio::test]
	async fn migrations_are_idempotent() {
		let pool = create_test_pool().await;
		run_migrations(&pool).await.unwrap();
		run_migrations(&pool).await.unwrap();
	}
}
