// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! SCIM filter expressions (RFC 7644 section 3.4.2.2).
//!
//! The grammar supported here covers what identity providers actually send
//! for group provisioning: attribute comparisons (`displayName eq "Sales"`),
//! presence checks (`externalId pr`), `and`/`or`/`not` and parenthesized
//! groups. Ordering comparisons parse but evaluate to false, since group
//! attributes are strings.

mod ast;
mod parser;

pub use ast::{CompareOp, Filter, LogicalOp};
pub use parser::FilterParser;
