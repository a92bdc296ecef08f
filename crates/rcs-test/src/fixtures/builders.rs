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

//! Builder pattern for creating RCS file fixtures.
//!
//! [`RcsBuilder`] renders RCS text and, at the same time, the exact event
//! sequence a conforming parser must deliver for it.

use rcs_stream::{BranchList, Event, RevisionInfo, RevisionRecord, Tag};

/// One delta of the revision tree.
#[derive(Debug, Clone)]
pub struct Delta {
    revision: String,
    timestamp: i64,
    author: String,
    state: String,
    branches: Vec<String>,
    next: Option<String>,
    newphrases: Vec<String>,
}

impl Delta {
    /// A trunk delta by `author` with state `Exp`, no branches and no successor.
    pub fn new(revision: &str, timestamp: i64, author: &str) -> Self {
        Self {
            revision: revision.to_string(),
            timestamp,
            author: author.to_string(),
            state: "Exp".to_string(),
            branches: Vec::new(),
            next: None,
            newphrases: Vec::new(),
        }
    }

    pub fn state(mut self, state: &str) -> Self {
        self.state = state.to_string();
        self
    }

    pub fn branch(mut self, branch: &str) -> Self {
        self.branches.push(branch.to_string());
        self
    }

    pub fn next(mut self, next: &str) -> Self {
        self.next = Some(next.to_string());
        self
    }

    /// Add an extension phrase such as `commitid abc;`, written verbatim.
    pub fn newphrase(mut self, phrase: &str) -> Self {
        self.newphrases.push(phrase.to_string());
        self
    }

    fn render(&self, out: &mut String) {
        out.push_str(&format!(
            "{}\ndate\t{};\tauthor {};\tstate {};\nbranches",
            self.revision,
            format_rcs_date(self.timestamp),
            self.author,
            self.state
        ));
        for branch in &self.branches {
            out.push_str("\n\t");
            out.push_str(branch);
        }
        out.push_str(";\nnext\t");
        if let Some(next) = &self.next {
            out.push_str(next);
        }
        out.push_str(";\n");
        for phrase in &self.newphrases {
            out.push_str(phrase);
            out.push('\n');
        }
        out.push('\n');
    }

    fn to_record(&self) -> RevisionRecord {
        RevisionRecord {
            revision: self.revision.clone(),
            timestamp: self.timestamp,
            author: self.author.clone(),
            state: self.state.clone(),
            branches: self.branches.iter().cloned().collect::<BranchList>(),
            next: self.next.clone(),
        }
    }
}

/// Builder for RCS file text.
///
/// # Examples
///
/// ```
/// use rcs_test::fixtures::builders::{Delta, RcsBuilder};
///
/// let builder = RcsBuilder::new()
///     .head("1.2")
///     .symbol("REL1", "1.1")
///     .comment("# ")
///     .delta(Delta::new("1.2", 1_700_000_000, "bob").next("1.1"))
///     .delta(Delta::new("1.1", 1_600_000_000, "alice"))
///     .description("Sample")
///     .deltatext("1.2", "Second", "hello\n")
///     .deltatext("1.1", "Initial revision", "d1 1\n");
///
/// let text = builder.build();
/// assert!(text.starts_with("head\t1.2;"));
/// assert_eq!(builder.expected_events().len(), 10);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RcsBuilder {
    head: Option<String>,
    branch: Option<String>,
    access: Vec<String>,
    symbols: Vec<(String, String)>,
    locks: Vec<(String, String)>,
    strict: bool,
    comment: Option<String>,
    expand: Option<String>,
    deltas: Vec<Delta>,
    description: String,
    deltatexts: Vec<(String, String, String)>,
}

impl RcsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn head(mut self, revision: &str) -> Self {
        self.head = Some(revision.to_string());
        self
    }

    pub fn principal_branch(mut self, branch: &str) -> Self {
        self.branch = Some(branch.to_string());
        self
    }

    pub fn access(mut self, user: &str) -> Self {
        self.access.push(user.to_string());
        self
    }

    pub fn symbol(mut self, name: &str, revision: &str) -> Self {
        self.symbols.push((name.to_string(), revision.to_string()));
        self
    }

    pub fn lock(mut self, user: &str, revision: &str) -> Self {
        self.locks.push((user.to_string(), revision.to_string()));
        self
    }

    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    pub fn comment(mut self, comment: &str) -> Self {
        self.comment = Some(comment.to_string());
        self
    }

    pub fn expand(mut self, mode: &str) -> Self {
        self.expand = Some(mode.to_string());
        self
    }

    pub fn delta(mut self, delta: Delta) -> Self {
        self.deltas.push(delta);
        self
    }

    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn deltatext(mut self, revision: &str, log: &str, text: &str) -> Self {
        self.deltatexts
            .push((revision.to_string(), log.to_string(), text.to_string()));
        self
    }

    /// Render the RCS file.
    pub fn build(&self) -> String {
        let mut out = String::new();

        out.push_str("head\t");
        if let Some(head) = &self.head {
            out.push_str(head);
        }
        out.push_str(";\n");

        if let Some(branch) = &self.branch {
            out.push_str(&format!("branch\t{};\n", branch));
        }

        out.push_str("access");
        for user in &self.access {
            out.push(' ');
            out.push_str(user);
        }
        out.push_str(";\n");

        out.push_str("symbols");
        for (name, revision) in &self.symbols {
            out.push_str(&format!("\n\t{}:{}", name, revision));
        }
        out.push_str(";\n");

        out.push_str("locks");
        for (user, revision) in &self.locks {
            out.push_str(&format!(" {}:{}", user, revision));
        }
        out.push(';');
        if self.strict {
            out.push_str(" strict;");
        }
        out.push('\n');

        if let Some(comment) = &self.comment {
            out.push_str(&format!("comment\t{};\n", quote(comment)));
        }
        if let Some(mode) = &self.expand {
            out.push_str(&format!("expand\t{};\n", quote(mode)));
        }
        out.push_str("\n\n");

        for delta in &self.deltas {
            delta.render(&mut out);
        }

        out.push_str(&format!("\ndesc\n{}\n", quote(&self.description)));

        for (revision, log, text) in &self.deltatexts {
            out.push_str(&format!(
                "\n\n{}\nlog\n{}\ntext\n{}\n",
                revision,
                quote(log),
                quote(text)
            ));
        }

        out
    }

    /// The event sequence a parser must deliver for [`build`](Self::build).
    pub fn expected_events(&self) -> Vec<Event> {
        let mut events = Vec::new();

        if let Some(head) = &self.head {
            events.push(Event::HeadRevision(head.clone()));
        }
        if let Some(branch) = &self.branch {
            events.push(Event::PrincipalBranch(branch.clone()));
        }
        for (name, revision) in &self.symbols {
            events.push(Event::Tag(Tag {
                name: name.clone(),
                revision: revision.clone(),
            }));
        }
        if let Some(comment) = &self.comment {
            events.push(Event::Comment(comment.clone()));
        }
        if let Some(mode) = &self.expand {
            events.push(Event::Expansion(mode.clone()));
        }
        for delta in &self.deltas {
            events.push(Event::Revision(delta.to_record()));
        }
        events.push(Event::TreeCompleted);
        events.push(Event::Description(self.description.clone()));
        for (revision, log, text) in &self.deltatexts {
            events.push(Event::RevisionInfo(RevisionInfo {
                revision: revision.clone(),
                log: log.clone(),
                text: text.clone(),
            }));
        }
        events.push(Event::ParseCompleted);

        events
    }
}

/// Quote `text` as an RCS string, doubling every `@`.
pub fn quote(text: &str) -> String {
    format!("@{}@", text.replace('@', "@@"))
}

/// Render a Unix timestamp as an RCS date (`YYYY.MM.DD.hh.mm.ss`, UTC).
pub fn format_rcs_date(timestamp: i64) -> String {
    let days = timestamp.div_euclid(86_400);
    let secs = timestamp.rem_euclid(86_400);
    let (year, month, day) = civil_from_days(days);
    format!(
        "{:04}.{:02}.{:02}.{:02}.{:02}.{:02}",
        year,
        month,
        day,
        secs / 3600,
        (secs % 3600) / 60,
        secs % 60
    )
}

fn civil_from_days(days: i64) -> (i64, i64, i64) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = doy - (153 * mp + 2) / 5 + 1;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = yoe + era * 400 + i64::from(month <= 2);
    (year, month, day)
}
