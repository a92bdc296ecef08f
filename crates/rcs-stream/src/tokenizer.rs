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

//! Chunked tokenizer for RCS files.
//!
//! Reads the input through a fixed-size buffer, refilling it whenever it is
//! exhausted, and hands out whitespace-delimited tokens with one token of
//! pushback. `;` and `:` are always tokens of their own; `@`-quoted strings
//! may span any number of refills.
//!
//! This module is primarily an internal implementation detail of the walker,
//! but is exposed for advanced use cases.

use crate::error::{StreamError, StreamResult};
use crate::token::{is_whitespace, is_word_terminator, Token, TokenKind};
use memchr::memchr;
use std::io::{ErrorKind, Read};
use tracing::trace;

/// Default size of the read buffer in bytes.
pub const DEFAULT_BUFFER_SIZE: usize = 30_000;

/// Buffered tokenizer with one-token pushback.
///
/// # Examples
///
/// ```rust
/// use rcs_stream::{TokenKind, Tokenizer};
/// use std::io::Cursor;
///
/// let mut tokens = Tokenizer::new(Cursor::new("head 1.2;\ncomment @a@@b@;")).unwrap();
///
/// tokens.match_literal("head").unwrap();
/// let rev = tokens.get().unwrap().unwrap();
/// assert_eq!(rev.as_bytes(), b"1.2");
/// tokens.match_semicolon().unwrap();
///
/// tokens.match_literal("comment").unwrap();
/// let comment = tokens.get().unwrap().unwrap();
/// assert_eq!(comment.kind(), TokenKind::String);
/// assert_eq!(comment.as_bytes(), b"a@b");
///
/// // Push back and read again
/// tokens.unget(comment);
/// assert_eq!(tokens.get().unwrap().unwrap().as_bytes(), b"a@b");
/// ```
pub struct Tokenizer<R: Read> {
    reader: R,
    buf: Box<[u8]>,
    pos: usize,
    len: usize,
    /// Absolute offset of `buf[0]` in the input.
    base: u64,
    exhausted: bool,
    pushed_back: Option<Token>,
    max_token_length: usize,
}

impl<R: Read> Tokenizer<R> {
    /// Create a tokenizer with the default 30 000 byte buffer.
    ///
    /// # Errors
    ///
    /// - `StreamError::EmptyInput`: the first read yielded zero bytes
    /// - `StreamError::Io`: the first read failed
    pub fn new(reader: R) -> StreamResult<Self> {
        Self::with_capacity(reader, DEFAULT_BUFFER_SIZE)
    }

    /// Create a tokenizer with a specific buffer size (at least one byte).
    ///
    /// Small buffers are handy in tests to force many refills.
    pub fn with_capacity(reader: R, buffer_size: usize) -> StreamResult<Self> {
        let mut tokenizer = Self {
            reader,
            buf: vec![0; buffer_size.max(1)].into_boxed_slice(),
            pos: 0,
            len: 0,
            base: 0,
            exhausted: false,
            pushed_back: None,
            max_token_length: usize::MAX,
        };

        if !tokenizer.fill()? {
            return Err(StreamError::EmptyInput);
        }

        Ok(tokenizer)
    }

    /// Limit the decoded length of any single token.
    pub fn set_max_token_length(&mut self, limit: usize) {
        self.max_token_length = limit;
    }

    /// Absolute byte offset of the read cursor.
    #[inline]
    pub fn offset(&self) -> u64 {
        self.base + self.pos as u64
    }

    /// Whether the source is drained, the buffer consumed and nothing is pushed back.
    #[inline]
    pub fn eof(&self) -> bool {
        self.pushed_back.is_none() && self.exhausted && self.pos == self.len
    }

    /// Return the next token, or `None` at end of input.
    pub fn get(&mut self) -> StreamResult<Option<Token>> {
        if let Some(token) = self.pushed_back.take() {
            return Ok(Some(token));
        }

        if !self.skip_whitespace()? {
            return Ok(None);
        }

        let start = self.offset();
        match self.buf[self.pos] {
            b';' => {
                self.pos += 1;
                Ok(Some(Token::new(TokenKind::Semicolon, vec![b';'], start, start + 1)))
            }
            b':' => {
                self.pos += 1;
                Ok(Some(Token::new(TokenKind::Colon, vec![b':'], start, start + 1)))
            }
            b'@' => {
                self.pos += 1;
                self.read_string(start).map(Some)
            }
            _ => self.read_word(start).map(Some),
        }
    }

    /// Push one token back so the next [`get`](Self::get) returns it again.
    ///
    /// # Panics
    ///
    /// Panics if a token is already pushed back. Only one token of lookahead
    /// exists; a second `unget` is a bug in the caller, not a parse error.
    pub fn unget(&mut self, token: Token) {
        assert!(
            self.pushed_back.is_none(),
            "Tokenizer::unget called twice without an intervening get"
        );
        self.pushed_back = Some(token);
    }

    /// Read the next token and require it to be the bare word `literal`.
    pub fn match_literal(&mut self, literal: &str) -> StreamResult<()> {
        match self.get()? {
            Some(token) if token.is_keyword(literal) => Ok(()),
            found => Err(self.expected(&format!("`{}`", literal), found.as_ref())),
        }
    }

    /// Read the next token and require it to be `;`.
    pub fn match_semicolon(&mut self) -> StreamResult<()> {
        match self.get()? {
            Some(token) if token.is_semicolon() => Ok(()),
            found => Err(self.expected("`;`", found.as_ref())),
        }
    }

    /// Build the syntax error for an unexpected token (or end of input).
    pub fn expected(&self, what: &str, found: Option<&Token>) -> StreamError {
        match found {
            Some(token) => StreamError::syntax(
                token.start(),
                format!("expected {}, found `{}`", what, token),
            ),
            None => StreamError::syntax(
                self.offset(),
                format!("expected {}, found end of input", what),
            ),
        }
    }

    /// Refill the buffer. Returns `false` once the source yields zero bytes.
    fn fill(&mut self) -> StreamResult<bool> {
        if self.exhausted {
            return Ok(false);
        }

        self.base += self.len as u64;
        self.pos = 0;
        self.len = 0;

        loop {
            match self.reader.read(&mut self.buf) {
                Ok(0) => {
                    self.exhausted = true;
                    trace!(offset = self.base, "input drained");
                    return Ok(false);
                }
                Ok(n) => {
                    self.len = n;
                    trace!(offset = self.base, bytes = n, "refilled token buffer");
                    return Ok(true);
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(StreamError::Io(e)),
            }
        }
    }

    /// Ensure at least one unread byte is buffered.
    #[inline]
    fn ensure_byte(&mut self) -> StreamResult<bool> {
        if self.pos < self.len {
            return Ok(true);
        }
        self.fill()
    }

    /// Advance past whitespace. Returns `false` at end of input.
    fn skip_whitespace(&mut self) -> StreamResult<bool> {
        loop {
            if !self.ensure_byte()? {
                return Ok(false);
            }
            match self.buf[self.pos..self.len].iter().position(|b| !is_whitespace(*b)) {
                Some(i) => {
                    self.pos += i;
                    return Ok(true);
                }
                None => self.pos = self.len,
            }
        }
    }

    fn read_word(&mut self, start: u64) -> StreamResult<Token> {
        let mut bytes = Vec::new();

        loop {
            if !self.ensure_byte()? {
                break;
            }
            let available = &self.buf[self.pos..self.len];
            match available.iter().position(|b| is_word_terminator(*b)) {
                Some(i) => {
                    bytes.extend_from_slice(&available[..i]);
                    self.pos += i;
                    self.check_length(start, bytes.len())?;
                    break;
                }
                None => {
                    bytes.extend_from_slice(available);
                    self.pos = self.len;
                    self.check_length(start, bytes.len())?;
                }
            }
        }

        Ok(Token::new(TokenKind::Word, bytes, start, self.offset()))
    }

    /// Read an `@`-quoted string; the opening `@` is already consumed.
    fn read_string(&mut self, start: u64) -> StreamResult<Token> {
        let mut bytes = Vec::new();

        loop {
            if !self.ensure_byte()? {
                return Err(StreamError::syntax(start, "unterminated string: missing closing `@`"));
            }
            let available = &self.buf[self.pos..self.len];
            match memchr(b'@', available) {
                Some(i) => {
                    bytes.extend_from_slice(&available[..i]);
                    self.pos += i + 1;
                    // `@@` is an escaped `@`, anything else closes the string
                    if self.ensure_byte()? && self.buf[self.pos] == b'@' {
                        bytes.push(b'@');
                        self.pos += 1;
                        self.check_length(start, bytes.len())?;
                    } else {
                        self.check_length(start, bytes.len())?;
                        break;
                    }
                }
                None => {
                    bytes.extend_from_slice(available);
                    self.pos = self.len;
                    self.check_length(start, bytes.len())?;
                }
            }
        }

        Ok(Token::new(TokenKind::String, bytes, start, self.offset()))
    }

    #[inline]
    fn check_length(&self, start: u64, length: usize) -> StreamResult<()> {
        if length > self.max_token_length {
            return Err(StreamError::TokenTooLong {
                offset: start,
                limit: self.max_token_length,
            });
        }
        Ok(())
    }
}
