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

//! Print the revision history of an RCS file, similar to `rlog`.
//!
//! Run with: cargo run --example rlog -- path/to/file.c,v
//!
//! Set `RUST_LOG=rcs_stream=debug` to see the parser's phases.

use rcs_stream::{parse, Observer, ObserverResult, RevisionRecord};
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;

/// Collects the tree and logs, skips text bodies.
#[derive(Default)]
struct History {
    head: Option<String>,
    tags: Vec<(String, String)>,
    revisions: Vec<RevisionRecord>,
    logs: HashMap<String, String>,
    description: String,
}

impl Observer for History {
    fn set_head_revision(&mut self, revision: String) -> ObserverResult {
        self.head = Some(revision);
        Ok(())
    }

    fn set_principal_branch(&mut self, _branch: String) -> ObserverResult {
        Ok(())
    }

    fn define_tag(&mut self, name: String, revision: String) -> ObserverResult {
        self.tags.push((name, revision));
        Ok(())
    }

    fn set_comment(&mut self, _comment: String) -> ObserverResult {
        Ok(())
    }

    fn define_revision(&mut self, record: RevisionRecord) -> ObserverResult {
        self.revisions.push(record);
        Ok(())
    }

    fn tree_completed(&mut self) -> ObserverResult {
        self.logs.reserve(self.revisions.len());
        Ok(())
    }

    fn set_description(&mut self, description: String) -> ObserverResult {
        self.description = description;
        Ok(())
    }

    fn set_revision_info(&mut self, revision: String, log: String, _text: String) -> ObserverResult {
        self.logs.insert(revision, log);
        Ok(())
    }

    fn parse_completed(&mut self) -> ObserverResult {
        Ok(())
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let path = std::env::args()
        .nth(1)
        .ok_or("usage: rlog <file,v>")?;

    let mut history = History::default();
    parse(BufReader::new(File::open(&path)?), &mut history)?;

    println!("RCS file: {}", path);
    println!("head: {}", history.head.as_deref().unwrap_or(""));
    println!("symbolic names:");
    for (name, revision) in &history.tags {
        println!("\t{}: {}", name, revision);
    }
    println!("total revisions: {}", history.revisions.len());
    println!("description:\n{}", history.description);

    for record in &history.revisions {
        println!("----------------------------");
        println!("revision {}", record.revision);
        println!(
            "date: {};  author: {};  state: {};",
            record.timestamp, record.author, record.state
        );
        if record.has_branches() {
            let branches: Vec<_> = record.branches.iter().map(String::as_str).collect();
            println!("branches:  {};", branches.join(";  "));
        }
        if let Some(log) = history.logs.get(&record.revision) {
            print!("{}", log);
        }
    }
    println!("=============================================================================");

    Ok(())
}
