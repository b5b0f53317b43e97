// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! SCIM 2.0 protocol types for Keep group provisioning.
//!
//! This crate is transport-agnostic: it defines the wire shapes (group
//! resource, list responses, patch requests, error bodies) and the filter
//! grammar from RFC 7644. The HTTP surface lives in `keep-server-scim`.

pub mod error;
pub mod filter;
pub mod group;
pub mod patch;

pub use error::{ScimError, ScimErrorResponse, ScimErrorType};
pub use filter::{CompareOp, Filter, FilterParser, LogicalOp};
pub use group::{GroupMember, ListResponse, ResourceMeta, ScimGroup};
pub use patch::{member_removal_target, PatchOp, PatchOperation, PatchRequest};

/// Schema URN for the SCIM core Group resource.
pub const SCHEMA_GROUP: &str = "urn:ietf:params:scim:schemas:core:2.0:Group";
/// Schema URN for SCIM list responses.
pub const SCHEMA_LIST_RESPONSE: &str = "urn:ietf:params:scim:api:messages:2.0:ListResponse";
/// Schema URN for SCIM patch requests.
pub const SCHEMA_PATCH_OP: &str = "urn:ietf:params:scim:api:messages:2.0:PatchOp";
/// Schema URN for SCIM error bodies.
pub const SCHEMA_ERROR: &str = "urn:ietf:params:scim:api:messages:2.0:Error";
