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

//! Streaming RCS Parser
//!
//! This crate parses RCS history files (the `,v` files written by RCS and
//! CVS) in a single front-to-back pass. Instead of building a document, it
//! delivers one event per recognized construct to an [`Observer`] supplied
//! by the caller: the head revision, tags, every delta of the revision tree,
//! the description, and the log and text of every revision.
//!
//! # Features
//!
//! - **Memory Efficient**: Only the current token is held; text bodies go straight to the observer
//! - **Event-driven**: SAX-like callbacks through the [`Observer`] trait
//! - **Early Abort**: Any observer method can stop the parse by returning an error
//! - **Distinct Errors**: Empty files, syntax errors and observer failures are separate variants
//! - **Timeout Protection**: Optional wall-clock limit for untrusted input
//!
//! # Example
//!
//! ```rust
//! use rcs_stream::{parse, Event, EventLog, StreamError};
//! use std::io::Cursor;
//!
//! let input = "head 1.2;\n\
//!              symbols REL1:1.1;\n\
//!              comment @# @;\n\
//!              1.2 date 2024.01.02.00.00.00; author bob; state Exp; branches; next 1.1;\n\
//!              1.1 date 2024.01.01.00.00.00; author alice; state Exp; branches; next ;\n\
//!              desc @@\n\
//!              1.2 log @Fix typo@ text @hello\n@\n\
//!              1.1 log @Initial revision@ text @d1 1\na1 1\nhallo\n@\n";
//!
//! let mut log = EventLog::new();
//! parse(Cursor::new(input), &mut log)?;
//!
//! for record in log.revisions() {
//!     println!("{} by {} at {}", record.revision, record.author, record.timestamp);
//! }
//! assert_eq!(log.events().last(), Some(&Event::ParseCompleted));
//! # Ok::<(), StreamError>(())
//! ```
//!
//! # Writing an Observer
//!
//! Implement [`Observer`] to receive events. [`NullObserver`],
//! [`TraceObserver`] and [`EventLog`] are ready-made implementations; see the
//! [`observer`] module for a custom one.

mod date;
mod error;
pub mod event;
pub mod observer;
mod parser;
mod token;
mod tokenizer;

pub use date::{parse_rcs_date, DateError};
pub use error::{StreamError, StreamResult};
pub use event::{BranchList, Event, EventKind, RevisionInfo, RevisionRecord, Tag};
pub use observer::{EventLog, NullObserver, Observer, ObserverError, ObserverResult, TraceObserver};
pub use parser::{parse, parse_with_config, ParserConfig};
pub use token::{Token, TokenKind};
pub use tokenizer::{Tokenizer, DEFAULT_BUFFER_SIZE};
