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
use rcs_stream::Tokenizer;
use std::io::Cursor;

// Tokens and errors must not depend on where the buffer refills fall.
fuzz_target!(|data: &[u8]| {
    let collect = |buffer_size: usize| {
        let mut tokenizer = Tokenizer::with_capacity(Cursor::new(data), buffer_size)
            .map_err(|e| e.to_string())?;
        let mut tokens = Vec::new();
        while let Some(token) = tokenizer.get().map_err(|e| e.to_string())? {
            tokens.push(token);
        }
        Ok::<_, String>(tokens)
    };

    assert_eq!(collect(1), collect(4096));
});
