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

//! Tokens produced by the [`Tokenizer`](crate::Tokenizer).

use crate::error::{StreamError, StreamResult};
use std::fmt;
use std::ops::Range;

/// Lexical class of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// A run of non-delimiter bytes: keywords, numbers, identifiers.
    Word,
    /// An `@`-quoted string with `@@` already decoded to `@`.
    String,
    /// The `;` terminator.
    Semicolon,
    /// The `:` separator used by `symbols` and `locks`.
    Colon,
}

/// One token together with its byte span in the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    kind: TokenKind,
    bytes: Vec<u8>,
    start: u64,
    end: u64,
}

impl Token {
    pub(crate) fn new(kind: TokenKind, bytes: Vec<u8>, start: u64, end: u64) -> Self {
        Self {
            kind,
            bytes,
            start,
            end,
        }
    }

    #[inline]
    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    /// Decoded content. For strings this excludes the surrounding `@`.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Absolute offset of the first byte of the token in the input.
    #[inline]
    pub fn start(&self) -> u64 {
        self.start
    }

    /// Byte range covered in the input, delimiters of strings included.
    #[inline]
    pub fn span(&self) -> Range<u64> {
        self.start..self.end
    }

    #[inline]
    pub fn is_semicolon(&self) -> bool {
        self.kind == TokenKind::Semicolon
    }

    #[inline]
    pub fn is_colon(&self) -> bool {
        self.kind == TokenKind::Colon
    }

    /// Whether this is the bare word `keyword` (strings never match).
    #[inline]
    pub fn is_keyword(&self, keyword: &str) -> bool {
        self.kind == TokenKind::Word && self.bytes == keyword.as_bytes()
    }

    /// Whether this word looks like a revision number (`1.4`, `1.4.2.1`).
    pub fn is_revision_number(&self) -> bool {
        self.kind == TokenKind::Word
            && self.bytes.first().is_some_and(u8::is_ascii_digit)
            && self.bytes.iter().all(|b| b.is_ascii_digit() || *b == b'.')
    }

    /// Whether this token starts a tree-section delta, i.e. begins with a digit.
    #[inline]
    pub(crate) fn starts_with_digit(&self) -> bool {
        self.kind == TokenKind::Word && self.bytes.first().is_some_and(u8::is_ascii_digit)
    }

    /// Consume the token into a `String`, failing on invalid UTF-8.
    ///
    /// The error offset points at the offending byte in the raw input.
    pub fn into_string(self) -> StreamResult<String> {
        let start = self.start;
        let kind = self.kind;
        String::from_utf8(self.bytes).map_err(|e| {
            let valid = e.utf8_error().valid_up_to();
            StreamError::Utf8 {
                offset: start + raw_length(kind, &e.as_bytes()[..valid]),
                message: e.to_string(),
            }
        })
    }

    /// Consume the token into a `String`, replacing invalid sequences with U+FFFD.
    pub fn into_string_lossy(self) -> String {
        match String::from_utf8(self.bytes) {
            Ok(s) => s,
            Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
        }
    }
}

/// Input bytes taken by the decoded prefix `decoded` of a token.
///
/// A string starts after its opening `@`, and every `@` in it was written `@@`.
fn raw_length(kind: TokenKind, decoded: &[u8]) -> u64 {
    match kind {
        TokenKind::String => {
            let escapes = memchr::memchr_iter(b'@', decoded).count();
            (1 + decoded.len() + escapes) as u64
        }
        _ => decoded.len() as u64,
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const PREVIEW: usize = 32;
        let text = String::from_utf8_lossy(&self.bytes);
        let shown: String = text.chars().take(PREVIEW).collect();
        let ellipsis = if text.chars().count() > PREVIEW { "..." } else { "" };
        match self.kind {
            TokenKind::String => write!(f, "@{}{}@", shown, ellipsis),
            _ => write!(f, "{}{}", shown, ellipsis),
        }
    }
}

/// RCS whitespace: space, backspace, tab, newline, vertical tab, form feed, carriage return.
#[inline]
pub(crate) fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\x08' | b'\t' | b'\n' | b'\x0b' | b'\x0c' | b'\r')
}

/// Bytes that end a word token.
#[inline]
pub(crate) fn is_word_terminator(b: u8) -> bool {
    is_whitespace(b) || b == b';' || b == b':'
}
