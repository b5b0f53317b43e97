// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Database layer for the Keep server.
//!
//! Repositories are thin wrappers over a shared [`sqlx::SqlitePool`]. Each
//! repository pairs a concrete type with a `*Store` trait so commands and
//! handlers can be tested against in-memory implementations or an in-memory
//! SQLite pool.

pub mod error;
pub mod group;
pub mod migrate;
pub mod org;
pub mod org_user;
pub mod pool;
pub mod sponsorship;
pub mod testing;
pub mod types;

pub use error::DbError;
pub use group::{Group, GroupRepository, GroupStore};
pub use migrate::run_migrations;
pub use org::{Organization, OrgRepository, OrgStore, PlanType};
pub use org_user::{
	OrganizationUser, OrganizationUserRepository, OrganizationUserStatus, OrganizationUserStore,
	OrganizationUserType,
};
pub use pool::create_pool;
pub use sponsorship::{OrganizationSponsorship, SponsorshipRepository, SponsorshipStore};
pub use types::{GroupId, OrgId, OrgUserId, SponsorshipId, UserId};
