// Dweve RCS Stream - Streaming parser for RCS history files
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Shared test fixtures and utilities for RCS Stream crates.
//!
//! This crate provides canonical RCS files, a builder that renders a file
//! together with the events a parser must deliver for it, invalid inputs,
//! and observers with scripted behavior.
//!
//! # Features
//!
//! - **Pre-built Fixtures**: Complete files covering trunk, branches and extension phrases
//! - **Builder Pattern**: Fluent API that yields both RCS text and expected events
//! - **Error Fixtures**: Invalid files for testing error handling
//! - **Observers**: Scripted failure and slow observers
//!
//! # Quick Start
//!
//! ```rust
//! use rcs_test::fixtures;
//! use rcs_test::fixtures::builders::{Delta, RcsBuilder};
//!
//! // Use pre-built fixtures
//! let text = fixtures::linear_history();
//! assert!(text.starts_with("head"));
//!
//! // Build custom fixtures
//! let builder = RcsBuilder::new()
//!     .head("1.1")
//!     .delta(Delta::new("1.1", 1_700_000_000, "alice"))
//!     .deltatext("1.1", "Initial revision", "hello\n");
//! let text = builder.build();
//! let expected = builder.expected_events();
//! # let _ = (text, expected);
//!
//! // Test error handling
//! for (name, invalid) in fixtures::errors::invalid_rcs_samples() {
//!     // Test parser with invalid input
//! #   let _ = (name, invalid);
//! }
//! ```

pub mod fixtures;
pub mod observers;

pub use observers::{DelayObserver, FailingObserver};

/// Type alias for a list of fixture functions (name, generator).
pub type FixtureList = Vec<(&'static str, fn() -> String)>;
