// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Organization event log for the Keep server.
//!
//! Every provisioning and billing mutation records an [`EventEntry`] through
//! the [`EventService`]; sinks persist entries for the organization's audit
//! trail.

pub mod error;
pub mod event;
pub mod service;
pub mod sink;

pub use error::EventSinkError;
pub use event::{EventActor, EventBuilder, EventEntry, EventType, SystemUser};
pub use service::EventService;
pub use sink::{EventSink, SqliteEventSink, TracingEventSink};
