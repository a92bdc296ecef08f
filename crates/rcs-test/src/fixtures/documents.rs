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

//! Complete RCS files as written by RCS and CVS.

/// A single revision, as written by `ci` for a new file.
pub fn minimal() -> String {
    r#"head	1.1;
access;
symbols;
locks; strict;
comment	@# @;


1.1
date	2024.01.15.09.30.00;	author alice;	state Exp;
branches;
next	;


desc
@@


1.1
log
@Initial revision
@
text
@hello
@
"#
    .to_string()
}

/// An RCS file for which `rcs -i` created no revision yet.
pub fn no_revisions() -> String {
    "head\t;\naccess;\nsymbols;\nlocks; strict;\ncomment\t@# @;\n\n\ndesc\n@Placeholder@\n".to_string()
}

/// Three trunk revisions with tags.
pub fn linear_history() -> String {
    r#"head	1.3;
access;
symbols
	REL_1_1:1.3
	REL_1_0:1.1;
locks; strict;
comment	@# @;


1.3
date	2024.03.01.12.00.00;	author carol;	state Exp;
branches;
next	1.2;

1.2
date	2024.02.01.12.00.00;	author bob;	state Exp;
branches;
next	1.1;

1.1
date	2024.01.01.12.00.00;	author alice;	state Exp;
branches;
next	;


desc
@Linear history fixture
@


1.3
log
@Third
@
text
@line one
line two
line three
@


1.2
log
@Second
@
text
@d3 1
@


1.1
log
@First
@
text
@d2 1
@
"#
    .to_string()
}

/// A CVS-style file with a vendor branch, a principal branch and keyword expansion.
pub fn branched() -> String {
    r#"head	1.2;
branch	1.1.1;
access;
symbols
	FEATURE:1.2.0.2
	vendor_1_0:1.1.1.1
	vendor:1.1.1;
locks; strict;
comment	@# @;
expand	@kv@;


1.2
date	2024.05.02.08.00.00;	author dev;	state Exp;
branches
	1.2.2.1;
next	1.1;

1.1
date	2024.05.01.08.00.00;	author importer;	state Exp;
branches
	1.1.1.1;
next	;

1.1.1.1
date	2024.05.01.08.00.00;	author importer;	state Exp;
branches;
next	;

1.2.2.1
date	2024.05.03.08.00.00;	author dev;	state Exp;
branches;
next	;


desc
@@


1.2
log
@Local change
@
text
@vendor code
local change
@


1.2.2.1
log
@Work on feature branch
@
text
@a2 1
feature work
@


1.1
log
@Initial revision
@
text
@d2 1
@


1.1.1.1
log
@Import
@
text
@@
"#
    .to_string()
}

/// Deltas carrying CVS and CVSNT extension phrases, and a multi-word author.
pub fn with_newphrases() -> String {
    r#"head	1.2;
access;
symbols;
locks; strict;
comment	@# @;


1.2
date	2024.06.02.10.00.00;	author John Doe;	state Exp;
branches;
next	1.1;
commitid	10066f1a2b3c4d5e6f7;
kopt	kv;
deltatype	text;
permissions	644;

1.1
date	2024.06.01.10.00.00;	author jdoe;	state dead;
branches;
next	;
commitid	10065f1a2b3c4d5e6f7;
hardlinks	@configure.in@;


desc
@@


1.2
log
@Address @@jdoe review
@
text
@mail: jdoe@@example.com
@


1.1
log
@Initial revision
@
text
@d1 1
@
"#
    .to_string()
}

/// Every admin clause, two-digit years and text with embedded delimiters.
pub fn comprehensive() -> String {
    r#"head	1.3;
branch	1.3.1;
access	alice bob;
symbols
	release-2:1.3
	release-1:1.2
	start:1.1;
locks
	alice:1.3; strict;
comment	@ * @;
expand	@o@;
mergepoint	1.2;


1.3
date	2001.09.11.14.15.16;	author alice;	state Stab;
branches;
next	1.2;

1.2
date	99.12.31.23.59.59;	author bob;	state Rel;
branches
	1.2.2.1
	1.2.4.1;
next	1.1;

1.1
date	98.01.01.00.00.00;	author bob;	state Exp;
branches;
next	;

1.2.2.1
date	2000.01.01.00.00.00;	author carol;	state Exp;
branches;
next	;

1.2.4.1
date	2000.02.01.00.00.00;	author dave;	state Exp;
branches;
next	;


desc
@Description with ; and : and @@ inside.
@


1.3
log
@Release two; finally.
@
text
@/*
 * main.c
 */
int main(void) { return 0; }
@


1.2
log
@Y2K fix
@
text
@d4 1
a4 1
int main(void) { return 1; }
@


1.1
log
@Initial revision
@
text
@d1 3
@


1.2.2.1
log
@Branch one
@
text
@a4 1
/* branch one */
@


1.2.4.1
log
@Branch two
@
text
@a4 1
/* branch two */
@
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_documents_are_non_empty() {
        for doc in [
            minimal(),
            no_revisions(),
            linear_history(),
            branched(),
            with_newphrases(),
            comprehensive(),
        ] {
            assert!(doc.starts_with("head"));
        }
    }
}
