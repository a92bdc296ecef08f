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

#![no_main]

use libfuzzer_sys::fuzz_target;
use rcs_stream::{parse_with_config, EventLog, ParserConfig};
use std::io::Cursor;

/// Fuzz target for the RCS grammar walker.
///
/// Feeds arbitrary bytes through the full four-phase walk with a small
/// buffer, so string and word boundaries land on refills often.
///
/// # Running the Fuzzer
///
/// ```bash
/// cargo install cargo-fuzz
/// cd crates/rcs-stream
/// cargo fuzz run fuzz_rcs_parser -- -max_len=65536
/// ```
///
/// # Expected Behavior
///
/// - The walker never panics; malformed input is an `Err`
/// - A successful parse always ends with `parse_completed`
/// - Token sizes stay within `max_token_length`
fuzz_target!(|data: &[u8]| {
    let buffer_size = data.first().map_or(1, |b| usize::from(*b % 64) + 1);
    let config = ParserConfig {
        buffer_size,
        max_token_length: 1024 * 1024,
        lossy_utf8: data.len() % 2 == 0,
        ..Default::default()
    };

    let mut log = EventLog::new();
    if parse_with_config(Cursor::new(data), &mut log, config).is_ok() {
        assert!(log.is_complete());
    }
});
