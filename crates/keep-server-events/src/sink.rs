// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Event sinks.
//!
//! Sinks receive fully-built entries from the service's background task.
//! Publishing must not block request handling; slow sinks only delay other
//! sinks, never the caller.

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::error::EventSinkError;
use crate::event::EventEntry;

#[async_trait]
pub trait EventSink: Send + Sync {
	fn name(&self) -> &str;
	async fn publish(&self, entry: Arc<EventEntry>) -> Result<(), EventSinkError>;
}

/// Sink that persists entries to the `events` table.
pub struct SqliteEventSink {
	pool: SqlitePool,
}

impl SqliteEventSink {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}
}

#[async_trait]
impl EventSink for SqliteEventSink {
	fn name(&self) -> &str {
		"sqlite"
	}

	async fn publish(&self, entry: Arc<EventEntry>) -> Result<(), EventSinkError> {
		let details = if entry.details.is_null() {
			None
		} else {
			Some(serde_json::to_string(&entry.details)?)
		};

		sqlx::query(
			r#"
			INSERT INTO events (
				id, event_type, actor, organization_id, group_id,
				organization_user_id, details, occurred_at
			)
			VALUES (?, ?, ?, ?, ?, ?, ?, ?)
			"#,
		)
		.bind(entry.id.to_string())
		.bind(entry.event_type.to_string())
		.bind(entry.actor.to_string())
		.bind(entry.organization_id.map(|id| id.to_string()))
		.bind(entry.group_id.map(|id| id.to_string()))
		.bind(entry.organization_user_id.map(|id| id.to_string()))
		.bind(details)
		.bind(entry.occurred_at.to_rfc3339())
		.execute(&self.pool)
		.await?;

		Ok(())
	}
}

/// Sink that emits entries as structured tracing events. Useful in
/// development and as a last-resort audit trail.
pub struct TracingEventSink;

#[async_trait]
impl EventSink for TracingEventSink {
	fn name(&self) -> &str {
		"tracing"
	}

	async fn publish(&self, entry: Arc<EventEntry>) -> Result<(), EventSinkError> {
		tracing::info!(
			event_type = %entry.event_type,
			actor = %entry.actor,
			organization_id = entry.organization_id.map(|id| id.to_string()),
			group_id = entry.group_id.map(|id| id.to_string()),
			"organization event"
		);
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::event::{EventActor, EventType, SystemUser};
	use keep_server_db::{testing::create_migrated_test_pool, OrgId};
	use sqlx::Row;

	#[tokio::test]
	async fn sqlite_sink_persists_entry() {
		let pool = create_migrated_test_pool().await;
		let sink = SqliteEventSink::new(pool.clone());

		let org_id = OrgId::generate();
		let entry = EventEntry::builder(
			EventType::GroupCreated,
			EventActor::System(SystemUser::Scim),
		)
		.organization(org_id)
		.details(serde_json::json!({"name": "Engineering"}))
		.build();

		sink.publish(Arc::new(entry)).await.unwrap();

		let row = sqlx::query("SELECT event_type, actor, organization_id, details FROM events")
			.fetch_one(&pool)
			.await
			.unwrap();
		let event_type: String = row.get("event_type");
		let actor: String = row.get("actor");
		let organization_id: Option<String> = row.get("organization_id");
		assert_eq!(event_type, "group_created");
		assert_eq!(actor, "system:scim");
		assert_eq!(organization_id.as_deref(), Some(org_id.to_string().as_str()));
	}

	#[tokio::test]
	async fn sqlite_sink_stores_null_details_as_null() {
		let pool = create_migrated_test_pool().await;
		let sink = SqliteEventSink::new(pool.clone());

		let entry = EventEntry::builder(
			EventType::GroupDeleted,
			EventActor::System(SystemUser::Scim),
		)
		.build();
		sink.publish(Arc::new(entry)).await.unwrap();

		let row = sqlx::query("SELECT details FROM events")
			.fetch_one(&pool)
			.await
			.unwrap();
		let details: Option<String> = row.get("details");
		assert!(details.is_none());
	}
}
