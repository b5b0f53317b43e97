// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! SCIM 2.0 HTTP surface for Keep group provisioning.
//!
//! The router is mounted by the server under `/scim/v2/{organization_id}`;
//! every handler re-checks that the addressed group belongs to the route
//! organization before acting.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod mapping;
pub mod provisioning;
pub mod routes;

pub use error::ScimApiError;
pub use provisioning::GroupProvisioningService;
pub use routes::scim_routes;
