// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Keep provisioning and billing server library.

pub mod api;
pub mod api_response;
pub mod routes;
pub mod validation;

pub use api::{create_app_state, create_router, AppState};
