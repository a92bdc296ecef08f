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

//! The observer contract and the observers shipped with the crate.
//!
//! The walker depends only on the [`Observer`] trait. Three implementations
//! are supplied:
//!
//! - [`NullObserver`]: accepts and drops every event
//! - [`TraceObserver`]: logs every event through `tracing`
//! - [`EventLog`]: records every event as an owned [`Event`]
//!
//! # Ownership
//!
//! Every payload is moved into the observer method. The walker never touches
//! a value again once the call returns, so an observer is free to store it,
//! forward it, or drop it.
//!
//! # Aborting a Parse
//!
//! Returning `Err` from any method stops the walk immediately. No further
//! input is read and no further events are delivered; the error reaches the
//! caller as [`StreamError::Aborted`](crate::StreamError::Aborted).
//!
//! ```rust
//! use rcs_stream::{parse, EventKind, Observer, ObserverError, ObserverResult,
//!                  RevisionRecord, StreamError};
//! use std::io::Cursor;
//!
//! /// Counts revisions and refuses files with more than `limit` of them.
//! struct RevisionBudget { seen: usize, limit: usize }
//!
//! impl Observer for RevisionBudget {
//!     fn set_head_revision(&mut self, _: String) -> ObserverResult { Ok(()) }
//!     fn set_principal_branch(&mut self, _: String) -> ObserverResult { Ok(()) }
//!     fn define_tag(&mut self, _: String, _: String) -> ObserverResult { Ok(()) }
//!     fn set_comment(&mut self, _: String) -> ObserverResult { Ok(()) }
//!     fn define_revision(&mut self, _: RevisionRecord) -> ObserverResult {
//!         self.seen += 1;
//!         if self.seen > self.limit {
//!             return Err(ObserverError::new("too many revisions"));
//!         }
//!         Ok(())
//!     }
//!     fn tree_completed(&mut self) -> ObserverResult { Ok(()) }
//!     fn set_description(&mut self, _: String) -> ObserverResult { Ok(()) }
//!     fn set_revision_info(&mut self, _: String, _: String, _: String) -> ObserverResult { Ok(()) }
//!     fn parse_completed(&mut self) -> ObserverResult { Ok(()) }
//! }
//!
//! let input = "head 1.2; comment @@;\n\
//!              1.2 date 2024.01.02.00.00.00; author a; state Exp; branches; next 1.1;\n\
//!              1.1 date 2024.01.01.00.00.00; author a; state Exp; branches; next ;\n\
//!              desc @@\n";
//!
//! let mut budget = RevisionBudget { seen: 0, limit: 1 };
//! let err = parse(Cursor::new(input), &mut budget).unwrap_err();
//! assert!(matches!(err, StreamError::Aborted { event: EventKind::Revision, .. }));
//! ```

use crate::event::{Event, EventKind, RevisionInfo, RevisionRecord, Tag};
use thiserror::Error;
use tracing::{debug, info};

/// Failure reported by an observer method.
#[derive(Error, Debug)]
#[error("{message}")]
pub struct ObserverError {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

impl ObserverError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Wrap a downstream error, e.g. a failed storage write.
    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<std::io::Error> for ObserverError {
    fn from(err: std::io::Error) -> Self {
        Self::with_source("I/O failure in observer", err)
    }
}

/// Outcome of one observer method.
pub type ObserverResult = Result<(), ObserverError>;

/// Receiver of parse events.
///
/// Methods are called in file order, phase by phase; see the
/// [`event`](crate::event) module for the complete sequence.
pub trait Observer {
    /// Admin phase: the `head` revision.
    fn set_head_revision(&mut self, revision: String) -> ObserverResult;

    /// Admin phase: the default `branch`. Not called when the file has none.
    fn set_principal_branch(&mut self, branch: String) -> ObserverResult;

    /// Admin phase: one `symbols` entry.
    fn define_tag(&mut self, name: String, revision: String) -> ObserverResult;

    /// Admin phase: the `comment` leader string.
    fn set_comment(&mut self, comment: String) -> ObserverResult;

    /// Admin phase: the keyword substitution mode from `expand`.
    ///
    /// Most observers have no use for it, so the default ignores it.
    fn set_expansion(&mut self, mode: String) -> ObserverResult {
        let _ = mode;
        Ok(())
    }

    /// Tree phase: one delta.
    fn define_revision(&mut self, record: RevisionRecord) -> ObserverResult;

    /// Checkpoint after the last delta, before any bulk text arrives.
    fn tree_completed(&mut self) -> ObserverResult;

    /// Description phase: the `desc` string.
    fn set_description(&mut self, description: String) -> ObserverResult;

    /// Deltatext phase: log message and text body of one revision.
    fn set_revision_info(&mut self, revision: String, log: String, text: String) -> ObserverResult;

    /// Final event of a successful parse.
    fn parse_completed(&mut self) -> ObserverResult;
}

impl<O: Observer + ?Sized> Observer for &mut O {
    fn set_head_revision(&mut self, revision: String) -> ObserverResult {
        (**self).set_head_revision(revision)
    }

    fn set_principal_branch(&mut self, branch: String) -> ObserverResult {
        (**self).set_principal_branch(branch)
    }

    fn define_tag(&mut self, name: String, revision: String) -> ObserverResult {
        (**self).define_tag(name, revision)
    }

    fn set_comment(&mut self, comment: String) -> ObserverResult {
        (**self).set_comment(comment)
    }

    fn set_expansion(&mut self, mode: String) -> ObserverResult {
        (**self).set_expansion(mode)
    }

    fn define_revision(&mut self, record: RevisionRecord) -> ObserverResult {
        (**self).define_revision(record)
    }

    fn tree_completed(&mut self) -> ObserverResult {
        (**self).tree_completed()
    }

    fn set_description(&mut self, description: String) -> ObserverResult {
        (**self).set_description(description)
    }

    fn set_revision_info(&mut self, revision: String, log: String, text: String) -> ObserverResult {
        (**self).set_revision_info(revision, log, text)
    }

    fn parse_completed(&mut self) -> ObserverResult {
        (**self).parse_completed()
    }
}

impl<O: Observer + ?Sized> Observer for Box<O> {
    fn set_head_revision(&mut self, revision: String) -> ObserverResult {
        (**self).set_head_revision(revision)
    }

    fn set_principal_branch(&mut self, branch: String) -> ObserverResult {
        (**self).set_principal_branch(branch)
    }

    fn define_tag(&mut self, name: String, revision: String) -> ObserverResult {
        (**self).define_tag(name, revision)
    }

    fn set_comment(&mut self, comment: String) -> ObserverResult {
        (**self).set_comment(comment)
    }

    fn set_expansion(&mut self, mode: String) -> ObserverResult {
        (**self).set_expansion(mode)
    }

    fn define_revision(&mut self, record: RevisionRecord) -> ObserverResult {
        (**self).define_revision(record)
    }

    fn tree_completed(&mut self) -> ObserverResult {
        (**self).tree_completed()
    }

    fn set_description(&mut self, description: String) -> ObserverResult {
        (**self).set_description(description)
    }

    fn set_revision_info(&mut self, revision: String, log: String, text: String) -> ObserverResult {
        (**self).set_revision_info(revision, log, text)
    }

    fn parse_completed(&mut self) -> ObserverResult {
        (**self).parse_completed()
    }
}

/// Observer that accepts and drops every event.
///
/// Useful to validate that a file parses, or as a base to wrap.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl Observer for NullObserver {
    fn set_head_revision(&mut self, _revision: String) -> ObserverResult {
        Ok(())
    }

    fn set_principal_branch(&mut self, _branch: String) -> ObserverResult {
        Ok(())
    }

    fn define_tag(&mut self, _name: String, _revision: String) -> ObserverResult {
        Ok(())
    }

    fn set_comment(&mut self, _comment: String) -> ObserverResult {
        Ok(())
    }

    fn define_revision(&mut self, _record: RevisionRecord) -> ObserverResult {
        Ok(())
    }

    fn tree_completed(&mut self) -> ObserverResult {
        Ok(())
    }

    fn set_description(&mut self, _description: String) -> ObserverResult {
        Ok(())
    }

    fn set_revision_info(&mut self, _revision: String, _log: String, _text: String) -> ObserverResult {
        Ok(())
    }

    fn parse_completed(&mut self) -> ObserverResult {
        Ok(())
    }
}

/// Observer that logs every event through `tracing`.
///
/// Structural events go to `info`, bulk payloads to `debug` with their
/// sizes only. Install a subscriber to see the output:
///
/// ```rust,no_run
/// use rcs_stream::{parse, TraceObserver};
/// use std::fs::File;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// tracing_subscriber::fmt().with_env_filter("rcs_stream=debug").init();
/// parse(File::open("main.c,v")?, &mut TraceObserver)?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct TraceObserver;

impl Observer for TraceObserver {
    fn set_head_revision(&mut self, revision: String) -> ObserverResult {
        info!(%revision, "head revision");
        Ok(())
    }

    fn set_principal_branch(&mut self, branch: String) -> ObserverResult {
        info!(%branch, "principal branch");
        Ok(())
    }

    fn define_tag(&mut self, name: String, revision: String) -> ObserverResult {
        info!(%name, %revision, "tag");
        Ok(())
    }

    fn set_comment(&mut self, comment: String) -> ObserverResult {
        debug!(comment = ?comment, "comment");
        Ok(())
    }

    fn set_expansion(&mut self, mode: String) -> ObserverResult {
        debug!(%mode, "keyword expansion");
        Ok(())
    }

    fn define_revision(&mut self, record: RevisionRecord) -> ObserverResult {
        info!(
            revision = %record.revision,
            timestamp = record.timestamp,
            author = %record.author,
            state = %record.state,
            branches = ?record.branches.as_slice(),
            next = ?record.next,
            "define revision"
        );
        Ok(())
    }

    fn tree_completed(&mut self) -> ObserverResult {
        info!("tree completed");
        Ok(())
    }

    fn set_description(&mut self, description: String) -> ObserverResult {
        debug!(bytes = description.len(), "description");
        Ok(())
    }

    fn set_revision_info(&mut self, revision: String, log: String, text: String) -> ObserverResult {
        debug!(%revision, log_bytes = log.len(), text_bytes = text.len(), "revision info");
        Ok(())
    }

    fn parse_completed(&mut self) -> ObserverResult {
        info!("parse completed");
        Ok(())
    }
}

/// Observer that records every event in delivery order.
///
/// # Examples
///
/// ```rust
/// use rcs_stream::{parse, Event, EventLog};
/// use std::io::Cursor;
///
/// let input = "head 1.1;\ncomment @# @;\n\
///              1.1 date 2024.01.01.00.00.00; author alice; state Exp; branches; next ;\n\
///              desc @Example@\n\
///              1.1 log @Initial revision@ text @hello@\n";
///
/// let mut log = EventLog::new();
/// parse(Cursor::new(input), &mut log).unwrap();
///
/// assert_eq!(log.events()[0], Event::HeadRevision("1.1".to_string()));
/// assert_eq!(log.revisions().count(), 1);
/// assert!(log.is_complete());
/// ```
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn into_events(self) -> Vec<Event> {
        self.events
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Kinds of all recorded events, in order.
    pub fn kinds(&self) -> Vec<EventKind> {
        self.events.iter().map(Event::kind).collect()
    }

    pub fn revisions(&self) -> impl Iterator<Item = &RevisionRecord> {
        self.events.iter().filter_map(Event::as_revision)
    }

    pub fn revision_infos(&self) -> impl Iterator<Item = &RevisionInfo> {
        self.events.iter().filter_map(Event::as_revision_info)
    }

    pub fn tags(&self) -> impl Iterator<Item = &Tag> {
        self.events.iter().filter_map(Event::as_tag)
    }

    /// Whether `parse_completed` was delivered.
    pub fn is_complete(&self) -> bool {
        matches!(self.events.last(), Some(Event::ParseCompleted))
    }

    /// Record an event directly.
    pub fn record(&mut self, event: Event) -> ObserverResult {
        self.events.push(event);
        Ok(())
    }
}

impl Observer for EventLog {
    fn set_head_revision(&mut self, revision: String) -> ObserverResult {
        self.record(Event::HeadRevision(revision))
    }

    fn set_principal_branch(&mut self, branch: String) -> ObserverResult {
        self.record(Event::PrincipalBranch(branch))
    }

    fn define_tag(&mut self, name: String, revision: String) -> ObserverResult {
        self.record(Event::Tag(Tag { name, revision }))
    }

    fn set_comment(&mut self, comment: String) -> ObserverResult {
        self.record(Event::Comment(comment))
    }

    fn set_expansion(&mut self, mode: String) -> ObserverResult {
        self.record(Event::Expansion(mode))
    }

    fn define_revision(&mut self, record: RevisionRecord) -> ObserverResult {
        self.record(Event::Revision(record))
    }

    fn tree_completed(&mut self) -> ObserverResult {
        self.record(Event::TreeCompleted)
    }

    fn set_description(&mut self, description: String) -> ObserverResult {
        self.record(Event::Description(description))
    }

    fn set_revision_info(&mut self, revision: String, log: String, text: String) -> ObserverResult {
        self.record(Event::RevisionInfo(RevisionInfo { revision, log, text }))
    }

    fn parse_completed(&mut self) -> ObserverResult {
        self.record(Event::ParseCompleted)
    }
}
