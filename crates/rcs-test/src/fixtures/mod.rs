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

//! Canonical RCS fixtures.
//!
//! - **documents**: Complete files covering trunk, branches and extensions
//! - **errors**: Invalid files for error handling tests
//! - **builders**: Builder that renders a file together with its expected events

pub mod builders;
mod documents;
pub mod errors;

pub use documents::*;

use crate::FixtureList;

/// Returns all document fixtures for iteration.
///
/// Useful for running the same test across all fixtures.
pub fn all() -> FixtureList {
    vec![
        ("minimal", minimal),
        ("no_revisions", no_revisions),
        ("linear_history", linear_history),
        ("branched", branched),
        ("with_newphrases", with_newphrases),
        ("comprehensive", comprehensive),
    ]
}
