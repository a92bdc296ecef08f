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

//! Invalid RCS inputs for parser error testing.

/// Inputs that a parser must reject with a syntax error.
///
/// Each tuple contains (name, rcs_text).
pub fn invalid_rcs_samples() -> Vec<(&'static str, &'static str)> {
    vec![
        ("head_missing_semicolon", "head 1.1 comment @@; desc @@"),
        ("branch_missing_semicolon", "head 1.1; branch 1.1.1 comment @@; desc @@"),
        ("symbol_missing_colon", "head 1.1; symbols REL 1.1; desc @@"),
        ("symbol_missing_revision", "head 1.1; symbols REL:; desc @@"),
        ("comment_unterminated_string", "head 1.1; comment @never closed"),
        ("truncated_admin", "head 1.1; comment"),
        ("quoted_admin_keyword", "@head@ 1.1; comment @@; desc @@"),
        (
            "delta_year_too_wide",
            "head 1.1; comment @@;\n1.1 date 1000000000000000.01.01.00.00.00; author a; state Exp; branches; next ;\ndesc @@",
        ),
        (
            "delta_missing_date",
            "head 1.1; comment @@;\n1.1 author a; state Exp; branches; next ;\ndesc @@",
        ),
        (
            "delta_bad_date",
            "head 1.1; comment @@;\n1.1 date yesterday; author a; state Exp; branches; next ;\ndesc @@",
        ),
        (
            "delta_missing_author_terminator",
            "head 1.1; comment @@;\n1.1 date 2024.01.01.00.00.00; author a state Exp; branches; next ;\ndesc @@",
        ),
        (
            "delta_missing_next",
            "head 1.1; comment @@;\n1.1 date 2024.01.01.00.00.00; author a; state Exp; branches;\ndesc @@",
        ),
        (
            "delta_malformed_revision",
            "head 1.1; comment @@;\n1.1a date 2024.01.01.00.00.00; author a; state Exp; branches; next ;\ndesc @@",
        ),
        (
            "missing_desc",
            "head 1.1; comment @@;\n1.1 date 2024.01.01.00.00.00; author a; state Exp; branches; next ;\n",
        ),
        ("desc_without_string", "head ; comment @@; desc"),
        ("deltatext_missing_log", "head ; comment @@; desc @@ 1.1 text @t@"),
        ("deltatext_missing_text", "head ; comment @@; desc @@ 1.1 log @l@"),
        ("deltatext_bad_revision", "head ; comment @@; desc @@ trunk log @l@ text @t@"),
        ("deltatext_unterminated_text", "head ; comment @@; desc @@ 1.1 log @l@ text @t"),
    ]
}

/// Inputs that contain no bytes at all.
pub fn empty_samples() -> Vec<&'static [u8]> {
    vec![b""]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_sample_names_unique() {
        let samples = invalid_rcs_samples();
        let names: HashSet<_> = samples.iter().map(|(name, _)| *name).collect();
        assert_eq!(names.len(), samples.len());
    }
}
