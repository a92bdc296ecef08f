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

//! Error types for the streaming RCS parser.
//!
//! Every failure is terminal for the parse in progress. Events already
//! delivered to the observer are not rolled back.
//!
//! # Error Categories
//!
//! - **Empty Input**: The source yielded no bytes at all
//! - **Syntax Errors**: An expected keyword or terminator is missing
//! - **Observer Failures**: An observer method returned an error
//! - **I/O and Encoding Errors**: Reading or decoding the input failed
//! - **Resource Limits**: Oversized tokens or an exceeded time limit
//!
//! # Example
//!
//! ```rust
//! use rcs_stream::{parse, NullObserver, StreamError};
//! use std::io::Cursor;
//!
//! let result = parse(Cursor::new(""), &mut NullObserver);
//! match result {
//!     Err(StreamError::EmptyInput) => { /* skip empty files */ }
//!     Err(e) if e.is_syntax() => eprintln!("corrupt file: {}", e),
//!     Err(e) => eprintln!("error: {}", e),
//!     Ok(()) => {}
//! }
//! ```

use crate::event::EventKind;
use crate::observer::ObserverError;
use thiserror::Error;

/// Errors that can occur during streaming parsing.
#[derive(Error, Debug)]
pub enum StreamError {
    /// I/O error while reading the input.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The source yielded no bytes before the first token.
    #[error("Empty input: an RCS file needs at least an admin section")]
    EmptyInput,

    /// Expected token missing or malformed.
    #[error("Syntax error at byte {offset}: {message}")]
    Syntax { offset: u64, message: String },

    /// Token payload is not valid UTF-8.
    #[error("Invalid UTF-8 at byte {offset}: {message}")]
    Utf8 { offset: u64, message: String },

    /// A single token grew beyond the configured limit.
    #[error("Token at byte {offset} exceeds the maximum length of {limit} bytes")]
    TokenTooLong { offset: u64, limit: usize },

    /// An observer method reported failure; the walk stopped right after it.
    #[error("Observer aborted the parse in {event}: {source}")]
    Aborted {
        event: EventKind,
        #[source]
        source: ObserverError,
    },

    /// Parsing exceeded the configured wall-clock limit.
    #[error("Parsing timeout: elapsed {elapsed:?} exceeded limit {limit:?}")]
    Timeout {
        elapsed: std::time::Duration,
        limit: std::time::Duration,
    },
}

impl StreamError {
    /// Create a syntax error.
    #[inline]
    pub fn syntax(offset: u64, message: impl Into<String>) -> Self {
        Self::Syntax {
            offset,
            message: message.into(),
        }
    }

    /// Byte offset in the input the error refers to, if any.
    #[inline]
    pub fn offset(&self) -> Option<u64> {
        match self {
            Self::Syntax { offset, .. }
            | Self::Utf8 { offset, .. }
            | Self::TokenTooLong { offset, .. } => Some(*offset),
            _ => None,
        }
    }

    #[inline]
    pub fn is_empty_input(&self) -> bool {
        matches!(self, Self::EmptyInput)
    }

    #[inline]
    pub fn is_syntax(&self) -> bool {
        matches!(self, Self::Syntax { .. })
    }

    #[inline]
    pub fn is_aborted(&self) -> bool {
        matches!(self, Self::Aborted { .. })
    }
}

/// Result type for streaming operations.
pub type StreamResult<T> = Result<T, StreamError>;
