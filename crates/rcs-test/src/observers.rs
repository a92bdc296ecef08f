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

//! Observers with scripted behavior for parser tests.
//!
//! Both observers record what they receive in an [`EventLog`], so tests can
//! check exactly which events reached them before the parse stopped.

use rcs_stream::{
    Event, EventKind, EventLog, Observer, ObserverError, ObserverResult, RevisionInfo,
    RevisionRecord, Tag,
};
use std::thread;
use std::time::Duration;

/// Observer that records events and fails on the nth event of one kind.
///
/// The failing event is not recorded.
///
/// # Examples
///
/// ```
/// use rcs_stream::{parse, EventKind, StreamError};
/// use rcs_test::{fixtures, FailingObserver};
/// use std::io::Cursor;
///
/// let mut observer = FailingObserver::new(EventKind::Revision, 2);
/// let err = parse(Cursor::new(fixtures::linear_history()), &mut observer).unwrap_err();
///
/// assert!(matches!(err, StreamError::Aborted { event: EventKind::Revision, .. }));
/// assert_eq!(observer.log().revisions().count(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct FailingObserver {
    kind: EventKind,
    nth: usize,
    seen: usize,
    log: EventLog,
}

impl FailingObserver {
    /// Fail on the `nth` (1-based) event of `kind`.
    pub fn new(kind: EventKind, nth: usize) -> Self {
        Self {
            kind,
            nth: nth.max(1),
            seen: 0,
            log: EventLog::new(),
        }
    }

    pub fn log(&self) -> &EventLog {
        &self.log
    }

    pub fn into_log(self) -> EventLog {
        self.log
    }

    /// Whether the scripted failure was triggered.
    pub fn triggered(&self) -> bool {
        self.seen >= self.nth
    }

    fn handle(&mut self, event: Event) -> ObserverResult {
        if event.kind() == self.kind {
            self.seen += 1;
            if self.seen == self.nth {
                return Err(ObserverError::new(format!(
                    "scripted failure on {} #{}",
                    self.kind, self.nth
                )));
            }
        }
        self.log.record(event)
    }
}

/// Observer that records events and sleeps before accepting each one.
#[derive(Debug, Clone)]
pub struct DelayObserver {
    delay: Duration,
    log: EventLog,
}

impl DelayObserver {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            log: EventLog::new(),
        }
    }

    pub fn log(&self) -> &EventLog {
        &self.log
    }

    fn handle(&mut self, event: Event) -> ObserverResult {
        thread::sleep(self.delay);
        self.log.record(event)
    }
}

macro_rules! forward_to_handle {
    ($ty:ty) => {
        impl Observer for $ty {
            fn set_head_revision(&mut self, revision: String) -> ObserverResult {
                self.handle(Event::HeadRevision(revision))
            }

            fn set_principal_branch(&mut self, branch: String) -> ObserverResult {
                self.handle(Event::PrincipalBranch(branch))
            }

            fn define_tag(&mut self, name: String, revision: String) -> ObserverResult {
                self.handle(Event::Tag(Tag { name, revision }))
            }

            fn set_comment(&mut self, comment: String) -> ObserverResult {
                self.handle(Event::Comment(comment))
            }

            fn set_expansion(&mut self, mode: String) -> ObserverResult {
                self.handle(Event::Expansion(mode))
            }

            fn define_revision(&mut self, record: RevisionRecord) -> ObserverResult {
                self.handle(Event::Revision(record))
            }

            fn tree_completed(&mut self) -> ObserverResult {
                self.handle(Event::TreeCompleted)
            }

            fn set_description(&mut self, description: String) -> ObserverResult {
                self.handle(Event::Description(description))
            }

            fn set_revision_info(
                &mut self,
                revision: String,
                log: String,
                text: String,
            ) -> ObserverResult {
                self.handle(Event::RevisionInfo(RevisionInfo { revision, log, text }))
            }

            fn parse_completed(&mut self) -> ObserverResult {
                self.handle(Event::ParseCompleted)
            }
        }
    };
}

forward_to_handle!(FailingObserver);
forward_to_handle!(DelayObserver);
