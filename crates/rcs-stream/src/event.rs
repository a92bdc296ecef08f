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

//! Event payloads delivered to an [`Observer`](crate::Observer).
//!
//! # Event Flow
//!
//! A well-formed RCS file produces events in this order:
//!
//! 1. Admin: `set_head_revision`, optional `set_principal_branch`,
//!    `define_tag` per symbol, `set_comment`, optional `set_expansion`
//! 2. Tree: `define_revision` per delta, then `tree_completed`
//! 3. Description: `set_description`
//! 4. Deltatext: `set_revision_info` per revision, then `parse_completed`
//!
//! # Example Event Sequence
//!
//! For this RCS file:
//!
//! ```text
//! head 1.2;
//! symbols REL1:1.1;
//! comment @# @;
//!
//! 1.2 date 2024.01.02.00.00.00; author bob; state Exp; branches; next 1.1;
//! 1.1 date 2024.01.01.00.00.00; author alice; state Exp; branches; next ;
//!
//! desc @@
//!
//! 1.2 log @second@ text @...@
//! 1.1 log @first@ text @...@
//! ```
//!
//! The parser delivers:
//!
//! ```text
//! HeadRevision("1.2")
//! Tag { name: "REL1", revision: "1.1" }
//! Comment("# ")
//! Revision(RevisionRecord { revision: "1.2", next: Some("1.1"), .. })
//! Revision(RevisionRecord { revision: "1.1", next: None, .. })
//! TreeCompleted
//! Description("")
//! RevisionInfo { revision: "1.2", .. }
//! RevisionInfo { revision: "1.1", .. }
//! ParseCompleted
//! ```

use std::fmt;

/// Ordered names of the branches that start at a revision.
///
/// An owned sequence that moves as a whole into [`RevisionRecord`] and from
/// there into the observer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct BranchList(Vec<String>);

impl BranchList {
    /// Create an empty branch list.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Append a branch, keeping file order.
    pub fn push(&mut self, branch: impl Into<String>) {
        self.0.push(branch.into());
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    #[inline]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Take the names out of the list.
    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

impl From<Vec<String>> for BranchList {
    fn from(branches: Vec<String>) -> Self {
        Self(branches)
    }
}

impl<S: Into<String>> FromIterator<S> for BranchList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl IntoIterator for BranchList {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a BranchList {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Metadata of one delta from the tree section.
///
/// Every revision defined here later receives exactly one matching
/// `set_revision_info` event from the deltatext section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevisionRecord {
    /// Dotted-numeric revision identifier, e.g. `1.4`.
    pub revision: String,
    /// Commit time in seconds since the Unix epoch (UTC).
    pub timestamp: i64,
    pub author: String,
    /// Free-text state label, usually `Exp`, `Stab`, `Rel` or `dead`.
    pub state: String,
    pub branches: BranchList,
    /// Next revision in the delta chain; `None` at the end of the chain.
    pub next: Option<String>,
}

impl RevisionRecord {
    /// Whether any branch starts at this revision.
    #[inline]
    pub fn has_branches(&self) -> bool {
        !self.branches.is_empty()
    }

    /// Whether the revision is on a branch rather than the trunk.
    ///
    /// Trunk revisions have exactly two numeric components (`1.4`).
    pub fn is_branch_revision(&self) -> bool {
        self.revision.split('.').count() > 2
    }
}

/// A symbolic name bound to a revision.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tag {
    pub name: String,
    pub revision: String,
}

/// Log message and stored body of one revision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevisionInfo {
    pub revision: String,
    pub log: String,
    /// Full text for the head revision, an edit script for all others.
    pub text: String,
}

/// Payload-free discriminant of [`Event`], one per observer method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    HeadRevision,
    PrincipalBranch,
    Tag,
    Comment,
    Expansion,
    Revision,
    TreeCompleted,
    Description,
    RevisionInfo,
    ParseCompleted,
}

impl EventKind {
    /// Every kind, in the order a complete file delivers them.
    pub const ALL: [EventKind; 10] = [
        EventKind::HeadRevision,
        EventKind::PrincipalBranch,
        EventKind::Tag,
        EventKind::Comment,
        EventKind::Expansion,
        EventKind::Revision,
        EventKind::TreeCompleted,
        EventKind::Description,
        EventKind::RevisionInfo,
        EventKind::ParseCompleted,
    ];

    /// Name of the observer method that receives this event.
    pub const fn name(self) -> &'static str {
        match self {
            EventKind::HeadRevision => "set_head_revision",
            EventKind::PrincipalBranch => "set_principal_branch",
            EventKind::Tag => "define_tag",
            EventKind::Comment => "set_comment",
            EventKind::Expansion => "set_expansion",
            EventKind::Revision => "define_revision",
            EventKind::TreeCompleted => "tree_completed",
            EventKind::Description => "set_description",
            EventKind::RevisionInfo => "set_revision_info",
            EventKind::ParseCompleted => "parse_completed",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An owned event, as recorded by [`EventLog`](crate::EventLog).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    HeadRevision(String),
    PrincipalBranch(String),
    Tag(Tag),
    Comment(String),
    Expansion(String),
    Revision(RevisionRecord),
    TreeCompleted,
    Description(String),
    RevisionInfo(RevisionInfo),
    ParseCompleted,
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::HeadRevision(_) => EventKind::HeadRevision,
            Event::PrincipalBranch(_) => EventKind::PrincipalBranch,
            Event::Tag(_) => EventKind::Tag,
            Event::Comment(_) => EventKind::Comment,
            Event::Expansion(_) => EventKind::Expansion,
            Event::Revision(_) => EventKind::Revision,
            Event::TreeCompleted => EventKind::TreeCompleted,
            Event::Description(_) => EventKind::Description,
            Event::RevisionInfo(_) => EventKind::RevisionInfo,
            Event::ParseCompleted => EventKind::ParseCompleted,
        }
    }

    #[inline]
    pub fn is_revision(&self) -> bool {
        matches!(self, Event::Revision(_))
    }

    #[inline]
    pub fn as_revision(&self) -> Option<&RevisionRecord> {
        match self {
            Event::Revision(record) => Some(record),
            _ => None,
        }
    }

    #[inline]
    pub fn as_revision_info(&self) -> Option<&RevisionInfo> {
        match self {
            Event::RevisionInfo(info) => Some(info),
            _ => None,
        }
    }

    #[inline]
    pub fn as_tag(&self) -> Option<&Tag> {
        match self {
            Event::Tag(tag) => Some(tag),
            _ => None,
        }
    }
}
