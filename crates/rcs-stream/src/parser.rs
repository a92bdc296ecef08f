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

//! The four-phase grammar walker.
//!
//! An RCS file is read in a single pass through four sections, always in
//! this order:
//!
//! 1. **Admin**: `head`, `branch`, `access`, `symbols`, `locks`, `strict`,
//!    `comment`, `expand` and unknown newphrases
//! 2. **Tree**: one delta per revision, up to the `desc` keyword
//! 3. **Description**: the `desc` string
//! 4. **Deltatext**: log message and text body per revision, up to end of input
//!
//! Each recognized construct is delivered to the [`Observer`] as soon as it
//! has been read completely. There are no backward transitions and no way to
//! resume a parse that stopped.
//!
//! # Basic Usage
//!
//! ```rust
//! use rcs_stream::{parse, EventLog, EventKind};
//! use std::io::Cursor;
//!
//! let input = r#"head	1.2;
//! access;
//! symbols
//! 	REL1:1.1;
//! locks; strict;
//! comment	@# @;
//!
//!
//! 1.2
//! date	2024.03.01.10.00.00;	author bob;	state Exp;
//! branches;
//! next	1.1;
//!
//! 1.1
//! date	2024.02.01.09.30.00;	author alice;	state Exp;
//! branches;
//! next	;
//!
//!
//! desc
//! @Sample file
//! @
//!
//!
//! 1.2
//! log
//! @Second revision
//! @
//! text
//! @hello
//! world
//! @
//!
//!
//! 1.1
//! log
//! @Initial revision
//! @
//! text
//! @d2 1
//! @
//! "#;
//!
//! let mut log = EventLog::new();
//! parse(Cursor::new(input), &mut log).unwrap();
//!
//! assert_eq!(log.kinds().first(), Some(&EventKind::HeadRevision));
//! assert_eq!(log.revisions().count(), 2);
//! assert_eq!(log.revision_infos().count(), 2);
//! assert!(log.is_complete());
//! ```

use crate::date::parse_rcs_date;
use crate::error::{StreamError, StreamResult};
use crate::event::{BranchList, EventKind, RevisionRecord};
use crate::observer::{Observer, ObserverResult};
use crate::token::{Token, TokenKind};
use crate::tokenizer::{Tokenizer, DEFAULT_BUFFER_SIZE};
use std::io::Read;
use std::time::{Duration, Instant};
use tracing::debug;

/// Number of tokens between two timeout checks.
const TIMEOUT_CHECK_INTERVAL: usize = 100;

/// Configuration options for the parser.
///
/// # Examples
///
/// ## Default Configuration
///
/// ```rust
/// use rcs_stream::ParserConfig;
///
/// let config = ParserConfig::default();
/// assert_eq!(config.buffer_size, 30_000);
/// assert_eq!(config.max_token_length, 256 * 1024 * 1024);
/// assert_eq!(config.timeout, None);
/// assert!(!config.lossy_utf8);
/// ```
///
/// ## Configuration for Untrusted Input
///
/// ```rust
/// use rcs_stream::ParserConfig;
/// use std::time::Duration;
///
/// let config = ParserConfig {
///     max_token_length: 16 * 1024 * 1024,     // 16MB per log or text body
///     timeout: Some(Duration::from_secs(10)),
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Size of the tokenizer's read buffer in bytes.
    ///
    /// Default: 30,000 bytes
    pub buffer_size: usize,

    /// Maximum decoded length of a single token in bytes.
    ///
    /// Text bodies are tokens too, so this bounds the largest revision the
    /// parser will hold in memory.
    ///
    /// Default: 256MB
    pub max_token_length: usize,

    /// Wall-clock limit for the whole parse.
    ///
    /// Checked every 100 tokens, so the actual time may slightly exceed it.
    ///
    /// Default: None (no timeout)
    pub timeout: Option<Duration>,

    /// Replace invalid UTF-8 with U+FFFD instead of failing.
    ///
    /// Many RCS files predate UTF-8 and carry Latin-1 logs and bodies.
    ///
    /// Default: false
    pub lossy_utf8: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
            max_token_length: 256 * 1024 * 1024,
            timeout: None,
            lossy_utf8: false,
        }
    }
}

/// Parse an RCS file, delivering every event to `observer`.
///
/// Runs all four phases to completion. Returns `Ok(())` only after
/// `parse_completed` was delivered and accepted.
///
/// # Errors
///
/// - `StreamError::EmptyInput`: the source yielded no bytes; no event was delivered
/// - `StreamError::Syntax`: a keyword or terminator is missing or malformed
/// - `StreamError::Aborted`: an observer method failed; nothing after it was read
/// - `StreamError::Io`, `StreamError::Utf8`: reading or decoding failed
///
/// # Examples
///
/// ```rust,no_run
/// use rcs_stream::{parse, TraceObserver};
/// use std::fs::File;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// parse(File::open("src/main.c,v")?, &mut TraceObserver)?;
/// # Ok(())
/// # }
/// ```
pub fn parse<R: Read, O: Observer + ?Sized>(reader: R, observer: &mut O) -> StreamResult<()> {
    parse_with_config(reader, observer, ParserConfig::default())
}

/// Parse an RCS file with custom configuration.
///
/// ```rust
/// use rcs_stream::{parse_with_config, EventLog, ParserConfig};
/// use std::io::Cursor;
///
/// let config = ParserConfig { buffer_size: 8, ..Default::default() };
/// let input = "head ; comment @@; desc @@";
///
/// let mut log = EventLog::new();
/// parse_with_config(Cursor::new(input), &mut log, config).unwrap();
/// assert!(log.is_complete());
/// ```
pub fn parse_with_config<R: Read, O: Observer + ?Sized>(
    reader: R,
    observer: &mut O,
    config: ParserConfig,
) -> StreamResult<()> {
    let mut tokens = Tokenizer::with_capacity(reader, config.buffer_size)?;
    tokens.set_max_token_length(config.max_token_length);

    Walker {
        tokens,
        observer,
        config,
        start_time: Instant::now(),
        tokens_read: 0,
    }
    .run()
}

/// Drives the tokenizer through the four sections.
struct Walker<'o, R: Read, O: Observer + ?Sized> {
    tokens: Tokenizer<R>,
    observer: &'o mut O,
    config: ParserConfig,
    start_time: Instant,
    tokens_read: usize,
}

impl<R: Read, O: Observer + ?Sized> Walker<'_, R, O> {
    fn run(mut self) -> StreamResult<()> {
        debug!("parsing admin section");
        self.parse_admin()?;

        debug!("parsing delta tree");
        self.parse_tree()?;

        // Observers may prepare storage before the bulk text arrives
        let status = self.observer.tree_completed();
        self.emit(EventKind::TreeCompleted, status)?;

        debug!("parsing description");
        self.parse_description()?;

        debug!("parsing deltatext");
        self.parse_deltatext()?;

        let status = self.observer.parse_completed();
        self.emit(EventKind::ParseCompleted, status)?;

        debug!(bytes = self.tokens.offset(), "parse completed");
        Ok(())
    }

    // ==================== Phase 1: admin ====================

    fn parse_admin(&mut self) -> StreamResult<()> {
        loop {
            let token = self.expect_token("admin keyword, revision or `desc`")?;

            // The tree starts with the first revision number, or directly
            // with `desc` in a file that has no revisions at all
            if token.starts_with_digit() || token.is_keyword("desc") {
                self.tokens.unget(token);
                return Ok(());
            }

            // Keywords are bare words, never quoted strings or delimiters
            if token.kind() != TokenKind::Word {
                return Err(self
                    .tokens
                    .expected("admin keyword, revision or `desc`", Some(&token)));
            }
            let keyword = self.text(token)?;
            match keyword.as_str() {
                "head" => {
                    if let Some(revision) = self.optional_value()? {
                        let status = self.observer.set_head_revision(revision);
                        self.emit(EventKind::HeadRevision, status)?;
                    }
                }
                "branch" => {
                    if let Some(branch) = self.optional_value()? {
                        let status = self.observer.set_principal_branch(branch);
                        self.emit(EventKind::PrincipalBranch, status)?;
                    }
                }
                "symbols" => self.parse_symbols()?,
                "comment" => {
                    // An absent comment leader is delivered as an empty one
                    let comment = self.optional_value()?.unwrap_or_default();
                    let status = self.observer.set_comment(comment);
                    self.emit(EventKind::Comment, status)?;
                }
                "expand" => {
                    if let Some(mode) = self.optional_value()? {
                        let status = self.observer.set_expansion(mode);
                        self.emit(EventKind::Expansion, status)?;
                    }
                }
                "access" | "locks" | "strict" => {
                    self.skip_phrase()?;
                }
                _ => {
                    debug!(%keyword, "skipping unknown admin phrase");
                    self.skip_phrase()?;
                }
            }
        }
    }

    /// `symbols {sym : num}* ;`
    fn parse_symbols(&mut self) -> StreamResult<()> {
        loop {
            let token = self.expect_token("symbol name or `;`")?;
            if token.is_semicolon() {
                return Ok(());
            }

            let name = self.text(token)?;
            let colon = self.next_token()?;
            if !colon.as_ref().is_some_and(Token::is_colon) {
                return Err(self.tokens.expected("`:`", colon.as_ref()));
            }
            let revision = self.expect_value("revision number")?;

            let status = self.observer.define_tag(name, revision);
            self.emit(EventKind::Tag, status)?;
        }
    }

    // ==================== Phase 2: tree ====================

    fn parse_tree(&mut self) -> StreamResult<()> {
        loop {
            let token = self.expect_token("revision number or `desc`")?;
            if token.is_keyword("desc") {
                self.tokens.unget(token);
                return Ok(());
            }
            if !token.is_revision_number() {
                return Err(self.tokens.expected("revision number or `desc`", Some(&token)));
            }

            let record = self.parse_delta(token)?;
            let status = self.observer.define_revision(record);
            self.emit(EventKind::Revision, status)?;
        }
    }

    /// `num date num; author id; state {id}; branches {num}*; next {num}; {newphrase}*`
    fn parse_delta(&mut self, revision: Token) -> StreamResult<RevisionRecord> {
        let revision = self.text(revision)?;

        self.expect_literal("date")?;
        let date = self.expect_token("date")?;
        let date_offset = date.start();
        let date = self.text(date)?;
        let timestamp = parse_rcs_date(&date).map_err(|e| {
            StreamError::syntax(date_offset, format!("invalid date in revision {}: {}", revision, e))
        })?;
        self.expect_semicolon()?;

        // Several words are joined; CVSNT writes authors with spaces
        self.expect_literal("author")?;
        let author = self.read_until_semicolon()?.join(" ");

        self.expect_literal("state")?;
        let state = self.read_until_semicolon()?.join(" ");

        self.expect_literal("branches")?;
        let branches = BranchList::from(self.read_until_semicolon()?);

        self.expect_literal("next")?;
        let next = self.optional_value()?;

        // Newphrases such as `commitid`, `owner` or `permissions`
        loop {
            let token = self.expect_token("revision number, newphrase or `desc`")?;
            if token.starts_with_digit() || token.is_keyword("desc") {
                self.tokens.unget(token);
                break;
            }
            debug!(%revision, keyword = %token, "skipping delta newphrase");
            self.skip_phrase()?;
        }

        Ok(RevisionRecord {
            revision,
            timestamp,
            author,
            state,
            branches,
            next,
        })
    }

    // ==================== Phase 3: description ====================

    fn parse_description(&mut self) -> StreamResult<()> {
        self.expect_literal("desc")?;
        let description = self.expect_value("description string")?;
        let status = self.observer.set_description(description);
        self.emit(EventKind::Description, status)
    }

    // ==================== Phase 4: deltatext ====================

    fn parse_deltatext(&mut self) -> StreamResult<()> {
        while let Some(token) = self.next_token()? {
            if !token.is_revision_number() {
                return Err(self.tokens.expected("revision number", Some(&token)));
            }
            let revision = self.text(token)?;

            self.expect_literal("log")?;
            let log = self.expect_value("log string")?;

            // Newphrases may sit between the log and the text
            loop {
                let token = self.expect_token("`text`")?;
                if token.is_keyword("text") {
                    break;
                }
                debug!(%revision, keyword = %token, "skipping deltatext newphrase");
                self.skip_phrase()?;
            }
            let text = self.expect_value("text string")?;

            let status = self.observer.set_revision_info(revision, log, text);
            self.emit(EventKind::RevisionInfo, status)?;
        }
        Ok(())
    }

    // ==================== Token helpers ====================

    /// Next token, with the periodic timeout check.
    fn next_token(&mut self) -> StreamResult<Option<Token>> {
        self.tick()?;
        self.tokens.get()
    }

    /// Next token; end of input is a syntax error naming `what`.
    fn expect_token(&mut self, what: &str) -> StreamResult<Token> {
        match self.next_token()? {
            Some(token) => Ok(token),
            None => Err(self.tokens.expected(what, None)),
        }
    }

    /// Next token as text; `;` and end of input are syntax errors.
    fn expect_value(&mut self, what: &str) -> StreamResult<String> {
        let token = self.expect_token(what)?;
        if token.is_semicolon() {
            return Err(self.tokens.expected(what, Some(&token)));
        }
        self.text(token)
    }

    fn expect_literal(&mut self, literal: &str) -> StreamResult<()> {
        self.tick()?;
        self.tokens.match_literal(literal)
    }

    fn expect_semicolon(&mut self) -> StreamResult<()> {
        self.tick()?;
        self.tokens.match_semicolon()
    }

    /// `{value} ;` where the value may be absent.
    fn optional_value(&mut self) -> StreamResult<Option<String>> {
        let token = self.expect_token("value or `;`")?;
        if token.is_semicolon() {
            return Ok(None);
        }
        let value = self.text(token)?;
        self.expect_semicolon()?;
        Ok(Some(value))
    }

    /// All tokens up to the next `;`, which is consumed.
    fn read_until_semicolon(&mut self) -> StreamResult<Vec<String>> {
        let mut values = Vec::new();
        loop {
            let token = self.expect_token("`;`")?;
            if token.is_semicolon() {
                return Ok(values);
            }
            values.push(self.text(token)?);
        }
    }

    /// Discard everything up to and including the next `;`.
    fn skip_phrase(&mut self) -> StreamResult<()> {
        loop {
            if self.expect_token("`;`")?.is_semicolon() {
                return Ok(());
            }
        }
    }

    fn text(&self, token: Token) -> StreamResult<String> {
        if self.config.lossy_utf8 {
            Ok(token.into_string_lossy())
        } else {
            token.into_string()
        }
    }

    // ==================== Control ====================

    /// Turn an observer status into the walk's outcome.
    #[inline]
    fn emit(&self, event: EventKind, status: ObserverResult) -> StreamResult<()> {
        status.map_err(|source| {
            debug!(%event, error = %source, "observer aborted parse");
            StreamError::Aborted { event, source }
        })
    }

    /// Count one token and check the timeout every few of them.
    #[inline]
    fn tick(&mut self) -> StreamResult<()> {
        self.tokens_read += 1;
        if self.tokens_read % TIMEOUT_CHECK_INTERVAL == 0 {
            self.check_timeout()?;
        }
        Ok(())
    }

    #[inline]
    fn check_timeout(&self) -> StreamResult<()> {
        if let Some(timeout) = self.config.timeout {
            let elapsed = self.start_time.elapsed();
            if elapsed > timeout {
                return Err(StreamError::Timeout {
                    elapsed,
                    limit: timeout,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{Event, Tag};
    use crate::observer::{EventLog, ObserverError};
    use std::io::Cursor;

    const ADMIN: &str = "head 1.2;\ncomment @# @;\n";

    fn delta(rev: &str, next: &str) -> String {
        format!(
            "{} date 2024.01.01.00.00.00; author alice; state Exp; branches; next {};\n",
            rev, next
        )
    }

    fn parse_str(input: &str) -> StreamResult<EventLog> {
        let mut log = EventLog::new();
        parse(Cursor::new(input), &mut log)?;
        Ok(log)
    }

    fn parse_partial(input: &str) -> (EventLog, StreamError) {
        let mut log = EventLog::new();
        let err = parse(Cursor::new(input), &mut log).unwrap_err();
        (log, err)
    }

    // ==================== Admin tests ====================

    #[test]
    fn test_admin_events_in_order() {
        let input = "head 1.3;\nsymbols REL1:1.1;\ncomment @test\n@;\ndesc @@";
        let log = parse_str(input).unwrap();
        assert_eq!(
            &log.events()[..3],
            &[
                Event::HeadRevision("1.3".to_string()),
                Event::Tag(Tag {
                    name: "REL1".to_string(),
                    revision: "1.1".to_string()
                }),
                Event::Comment("test\n".to_string()),
            ]
        );
    }

    #[test]
    fn test_principal_branch() {
        let log = parse_str("head 1.1; branch 1.1.1; comment @@; desc @@").unwrap();
        assert_eq!(log.events()[1], Event::PrincipalBranch("1.1.1".to_string()));
    }

    #[test]
    fn test_empty_principal_branch_is_omitted() {
        let log = parse_str("head 1.1; branch; comment @@; desc @@").unwrap();
        assert!(!log.kinds().contains(&EventKind::PrincipalBranch));
    }

    #[test]
    fn test_empty_head_is_omitted() {
        let log = parse_str("head ; comment @@; desc @@").unwrap();
        assert!(!log.kinds().contains(&EventKind::HeadRevision));
        assert!(log.is_complete());
    }

    #[test]
    fn test_symbols_with_spacing_variants() {
        let log = parse_str("head 1.2; symbols A:1.1 B : 1.2\n\tC:1.1.2.1; comment @@; desc @@").unwrap();
        let tags: Vec<(&str, &str)> = log
            .tags()
            .map(|t| (t.name.as_str(), t.revision.as_str()))
            .collect();
        assert_eq!(tags, vec![("A", "1.1"), ("B", "1.2"), ("C", "1.1.2.1")]);
    }

    #[test]
    fn test_symbol_missing_colon() {
        let (log, err) = parse_partial("head 1.2; symbols A 1.1; comment @@; desc @@");
        assert!(err.is_syntax());
        assert!(err.to_string().contains("expected `:`"));
        assert_eq!(log.tags().count(), 0);
    }

    #[test]
    fn test_access_locks_strict_are_skipped() {
        let input = "head 1.1; access alice bob; symbols; locks alice:1.1; strict; comment @c@; desc @@";
        let log = parse_str(input).unwrap();
        assert_eq!(
            log.kinds(),
            vec![
                EventKind::HeadRevision,
                EventKind::Comment,
                EventKind::TreeCompleted,
                EventKind::Description,
                EventKind::ParseCompleted,
            ]
        );
    }

    #[test]
    fn test_expand_emits_expansion() {
        let log = parse_str("head 1.1; comment @@; expand @kv@; desc @@").unwrap();
        assert!(log.events().contains(&Event::Expansion("kv".to_string())));
    }

    #[test]
    fn test_unknown_admin_newphrase_is_skipped() {
        let log = parse_str("head 1.1; mergepoint 1.1 x @y@; comment @@; desc @@").unwrap();
        assert!(log.is_complete());
    }

    #[test]
    fn test_quoted_admin_keyword_is_rejected() {
        let (log, err) = parse_partial("@head@ 1.1; comment @@; desc @@");
        assert!(err.is_syntax());
        assert_eq!(err.offset(), Some(0));
        assert!(log.is_empty());

        let (_, err) = parse_partial("head 1.1;; comment @@; desc @@");
        assert_eq!(err.offset(), Some(9));
    }

    #[test]
    fn test_admin_missing_terminator() {
        let (log, err) = parse_partial("head 1.1 comment @@; desc @@");
        assert!(err.is_syntax());
        assert!(err.to_string().contains("expected `;`"));
        assert!(log.is_empty());
    }

    #[test]
    fn test_admin_truncated() {
        let (_, err) = parse_partial("head 1.1; comment");
        assert!(err.to_string().contains("end of input"));
    }

    // ==================== Tree tests ====================

    #[test]
    fn test_two_revisions_in_file_order() {
        let input = format!("{}{}{}desc @@\n", ADMIN, delta("1.1", ""), delta("1.2", "1.1"));
        let log = parse_str(&input).unwrap();
        let revs: Vec<&RevisionRecord> = log.revisions().collect();
        assert_eq!(revs.len(), 2);
        assert_eq!(revs[0].revision, "1.1");
        assert_eq!(revs[0].next, None);
        assert_eq!(revs[1].revision, "1.2");
        assert_eq!(revs[1].next.as_deref(), Some("1.1"));
        assert!(revs.iter().all(|r| r.branches.is_empty()));
    }

    #[test]
    fn test_delta_fields() {
        let input = format!(
            "{}1.2 date 99.12.31.23.59.59; author john doe; state Rel; branches 1.2.2.1 1.2.4.1; next 1.1;\n{}desc @@",
            ADMIN,
            delta("1.1", "")
        );
        let log = parse_str(&input).unwrap();
        let rec = log.revisions().next().unwrap();
        assert_eq!(rec.timestamp, 946_684_799);
        assert_eq!(rec.author, "john doe");
        assert_eq!(rec.state, "Rel");
        assert_eq!(rec.branches.as_slice(), &["1.2.2.1", "1.2.4.1"]);
    }

    #[test]
    fn test_empty_state() {
        let input = format!(
            "{}1.1 date 2024.01.01.00.00.00; author a; state; branches; next;\ndesc @@",
            ADMIN
        );
        let log = parse_str(&input).unwrap();
        assert_eq!(log.revisions().next().unwrap().state, "");
    }

    #[test]
    fn test_delta_newphrases_are_skipped() {
        let input = format!(
            "{}1.2 date 2024.01.02.00.00.00; author a; state Exp; branches; next 1.1;\n\
             commitid 10065f1a2b3c4d5;\nowner 640;\npermissions 644;\nhardlinks @configure.in@;\n\
             {}desc @@",
            ADMIN,
            delta("1.1", "")
        );
        let log = parse_str(&input).unwrap();
        assert_eq!(log.revisions().count(), 2);
    }

    #[test]
    fn test_delta_missing_semicolon_emits_nothing_for_block() {
        let input = format!(
            "{}{}1.1 date 2024.01.01.00.00.00; author alice state Exp; branches; next ;\ndesc @@",
            ADMIN,
            delta("1.2", "1.1")
        );
        let (log, err) = parse_partial(&input);
        assert!(err.is_syntax());
        let revs: Vec<&str> = log.revisions().map(|r| r.revision.as_str()).collect();
        assert_eq!(revs, vec!["1.2"]);
        assert!(!log.kinds().contains(&EventKind::TreeCompleted));
    }

    #[test]
    fn test_delta_missing_next_terminator() {
        let input = format!(
            "{}1.1 date 2024.01.01.00.00.00; author a; state Exp; branches; next 1.0\ndesc @@",
            ADMIN
        );
        let (log, err) = parse_partial(&input);
        assert!(err.is_syntax());
        assert_eq!(log.revisions().count(), 0);
    }

    #[test]
    fn test_invalid_date() {
        let input = format!(
            "{}1.1 date 2024.13.01.00.00.00; author a; state Exp; branches; next ;\ndesc @@",
            ADMIN
        );
        let (_, err) = parse_partial(&input);
        assert!(err.is_syntax());
        assert!(err.to_string().contains("invalid date in revision 1.1"));
    }

    #[test]
    fn test_oversized_year_is_syntax_error() {
        let input = format!(
            "{}1.1 date 1000000000000000.01.01.00.00.00; author a; state Exp; branches; next ;\ndesc @@",
            ADMIN
        );
        let (log, err) = parse_partial(&input);
        assert!(err.is_syntax());
        assert_eq!(log.revisions().count(), 0);
    }

    #[test]
    fn test_date_before_epoch() {
        let input = format!(
            "{}1.1 date 69.07.20.20.17.40; author nasa; state Exp; branches; next ;\ndesc @@",
            ADMIN
        );
        let log = parse_str(&input).unwrap();
        assert_eq!(log.revisions().next().map(|r| r.timestamp), Some(-14_182_940));
    }

    #[test]
    fn test_garbage_at_revision_position() {
        let input = format!("{}{}@oops@ desc @@", ADMIN, delta("1.1", ""));
        let (_, err) = parse_partial(&input);
        assert!(err.is_syntax());
    }

    #[test]
    fn test_tree_completed_follows_last_revision() {
        let input = format!("{}{}desc @@", ADMIN, delta("1.1", ""));
        let kinds = parse_str(&input).unwrap().kinds();
        let rev = kinds.iter().position(|k| *k == EventKind::Revision).unwrap();
        assert_eq!(kinds[rev + 1], EventKind::TreeCompleted);
    }

    // ==================== Description and deltatext tests ====================

    #[test]
    fn test_description_is_string() {
        let log = parse_str("head ; comment @@; desc @multi\nline @@ desc\n@").unwrap();
        assert!(log
            .events()
            .contains(&Event::Description("multi\nline @ desc\n".to_string())));
    }

    #[test]
    fn test_missing_desc() {
        let input = format!("{}{}", ADMIN, delta("1.1", ""));
        let (log, err) = parse_partial(&input);
        assert!(err.is_syntax());
        assert!(err.to_string().contains("found end of input"));
        // A delta only ends at the next revision or `desc`
        assert_eq!(log.revisions().count(), 0);
        assert!(!log.kinds().contains(&EventKind::TreeCompleted));
    }

    #[test]
    fn test_deltatext_order_is_file_order() {
        let input = format!(
            "{}{}{}desc @@\n1.1 log @first@ text @a@\n1.2 log @second@ text @b@\n",
            ADMIN,
            delta("1.2", "1.1"),
            delta("1.1", "")
        );
        let log = parse_str(&input).unwrap();
        let revs: Vec<&str> = log.revision_infos().map(|i| i.revision.as_str()).collect();
        assert_eq!(revs, vec!["1.1", "1.2"]);
    }

    #[test]
    fn test_deltatext_newphrase_before_text() {
        let input = format!(
            "{}{}desc @@\n1.1 log @l@ mergepoint1 1.0; text @t@\n",
            ADMIN,
            delta("1.1", "")
        );
        let log = parse_str(&input).unwrap();
        let info = log.revision_infos().next().unwrap();
        assert_eq!(info.log, "l");
        assert_eq!(info.text, "t");
    }

    #[test]
    fn test_deltatext_missing_log() {
        let input = format!("{}{}desc @@\n1.1 text @t@\n", ADMIN, delta("1.1", ""));
        let (log, err) = parse_partial(&input);
        assert!(err.to_string().contains("expected `log`"));
        assert_eq!(log.revision_infos().count(), 0);
        assert!(!log.is_complete());
    }

    #[test]
    fn test_deltatext_truncated_text() {
        let input = format!("{}{}desc @@\n1.1 log @l@ text", ADMIN, delta("1.1", ""));
        let (log, err) = parse_partial(&input);
        assert!(err.is_syntax());
        assert!(!log.is_complete());
    }

    // ==================== Config tests ====================

    #[test]
    fn test_strict_utf8_rejects_latin1() {
        let mut input = b"head 1.1; comment @caf".to_vec();
        input.push(0xe9);
        input.extend_from_slice(b"@; desc @@");
        let mut log = EventLog::new();
        let err = parse(Cursor::new(input), &mut log).unwrap_err();
        assert!(matches!(err, StreamError::Utf8 { offset: 22, .. }), "{:?}", err);
    }

    #[test]
    fn test_utf8_error_offset_counts_escapes() {
        let mut input = b"head 1.1; comment @a@@b@@".to_vec();
        input.push(0xe9);
        input.extend_from_slice(b"@; desc @@");
        let bad = input.iter().position(|b| *b == 0xe9).unwrap() as u64;

        let mut log = EventLog::new();
        let err = parse(Cursor::new(input), &mut log).unwrap_err();
        assert_eq!(err.offset(), Some(bad));
    }

    #[test]
    fn test_lossy_utf8_replaces_latin1() {
        let mut input = b"head 1.1; comment @caf".to_vec();
        input.push(0xe9);
        input.extend_from_slice(b"@; desc @@");
        let config = ParserConfig {
            lossy_utf8: true,
            ..Default::default()
        };
        let mut log = EventLog::new();
        parse_with_config(Cursor::new(input), &mut log, config).unwrap();
        assert!(log.events().contains(&Event::Comment("caf\u{fffd}".to_string())));
    }

    #[test]
    fn test_max_token_length_applies_to_text() {
        let input = format!("{}{}desc @@\n1.1 log @l@ text @{}@", ADMIN, delta("1.1", ""), "x".repeat(64));
        let config = ParserConfig {
            max_token_length: 32,
            ..Default::default()
        };
        let mut log = EventLog::new();
        let err = parse_with_config(Cursor::new(input), &mut log, config).unwrap_err();
        assert!(matches!(err, StreamError::TokenTooLong { limit: 32, .. }));
    }

    // ==================== Observer failure tests ====================

    struct FailOn {
        kind: EventKind,
        log: EventLog,
    }

    impl FailOn {
        fn check(&mut self, kind: EventKind) -> ObserverResult {
            if kind == self.kind {
                Err(ObserverError::new("refused"))
            } else {
                Ok(())
            }
        }
    }

    impl Observer for FailOn {
        fn set_head_revision(&mut self, revision: String) -> ObserverResult {
            self.check(EventKind::HeadRevision)?;
            self.log.set_head_revision(revision)
        }
        fn set_principal_branch(&mut self, branch: String) -> ObserverResult {
            self.check(EventKind::PrincipalBranch)?;
            self.log.set_principal_branch(branch)
        }
        fn define_tag(&mut self, name: String, revision: String) -> ObserverResult {
            self.check(EventKind::Tag)?;
            self.log.define_tag(name, revision)
        }
        fn set_comment(&mut self, comment: String) -> ObserverResult {
            self.check(EventKind::Comment)?;
            self.log.set_comment(comment)
        }
        fn define_revision(&mut self, record: RevisionRecord) -> ObserverResult {
            self.check(EventKind::Revision)?;
            self.log.define_revision(record)
        }
        fn tree_completed(&mut self) -> ObserverResult {
            self.check(EventKind::TreeCompleted)?;
            self.log.tree_completed()
        }
        fn set_description(&mut self, description: String) -> ObserverResult {
            self.check(EventKind::Description)?;
            self.log.set_description(description)
        }
        fn set_revision_info(&mut self, revision: String, log: String, text: String) -> ObserverResult {
            self.check(EventKind::RevisionInfo)?;
            self.log.set_revision_info(revision, log, text)
        }
        fn parse_completed(&mut self) -> ObserverResult {
            self.check(EventKind::ParseCompleted)?;
            self.log.parse_completed()
        }
    }

    #[test]
    fn test_tree_completed_failure_stops_before_description() {
        let input = format!("{}{}desc @d@\n1.1 log @l@ text @t@\n", ADMIN, delta("1.1", ""));
        let mut observer = FailOn {
            kind: EventKind::TreeCompleted,
            log: EventLog::new(),
        };
        let err = parse(Cursor::new(input), &mut observer).unwrap_err();
        assert!(matches!(
            err,
            StreamError::Aborted {
                event: EventKind::TreeCompleted,
                ..
            }
        ));
        let kinds = observer.log.kinds();
        assert!(!kinds.contains(&EventKind::Description));
        assert!(!kinds.contains(&EventKind::RevisionInfo));
        assert!(!kinds.contains(&EventKind::ParseCompleted));
    }

    #[test]
    fn test_failure_stops_reading_input() {
        // Everything after the head clause is garbage and must never be read
        let input = "head 1.1; @@@ this is not rcs";
        let mut observer = FailOn {
            kind: EventKind::HeadRevision,
            log: EventLog::new(),
        };
        let err = parse(Cursor::new(input), &mut observer).unwrap_err();
        assert!(err.is_aborted());
        assert!(observer.log.is_empty());
    }
}
