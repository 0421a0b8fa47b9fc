//
// Copyright (c) 2025 Jeff Garzik
//
// This file is part of the difftools-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

//! Unified diff format parser.

use super::types::PatchError;
use crate::diff::{DiffKind, Difference};
use regex::Regex;
use std::sync::LazyLock;

/// Pre-compiled regex for hunk headers to avoid recompilation on each parse.
static HUNK_HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^@@ -(\d+)(?:,(\d+))? \+(\d+)(?:,(\d+))? @@").expect("invalid regex")
});

/// Parse every unified hunk of one segment, starting at the `@@` header
/// in `lines[start]`. Returns the differences and the position parsing
/// stopped at.
pub fn parse_unified(
    lines: &[&str],
    start: usize,
    end: usize,
) -> Result<(Vec<Difference>, usize), PatchError> {
    let mut diffs: Vec<Difference> = Vec::new();
    let mut pos = start;

    while pos < end {
        let Some(caps) = HUNK_HEADER_RE.captures(lines[pos]) else {
            break;
        };
        let old_start: usize = caps[1].parse().unwrap_or(1);
        let old_count: usize = caps.get(2).map_or(1, |m| m.as_str().parse().unwrap_or(1));
        let new_start: usize = caps[3].parse().unwrap_or(1);
        let new_count: usize = caps.get(4).map_or(1, |m| m.as_str().parse().unwrap_or(1));
        pos += 1;

        // A zero count positions an empty range after the named line.
        let old_limit = old_start + old_count.max(1);
        let mut old_cursor = if old_count == 0 { old_start + 1 } else { old_start };
        let new_limit = new_start + new_count.max(1);
        let mut new_cursor = if new_count == 0 { new_start + 1 } else { new_start };

        while pos < end && (old_cursor < old_limit || new_cursor < new_limit) {
            let line = lines[pos];

            if let Some(rest) = line.strip_prefix('+') {
                let run_start = new_cursor;
                let mut text = String::new();
                text.push_str(rest);
                text.push('\n');
                new_cursor += 1;
                pos += 1;
                while pos < end && new_cursor < new_limit {
                    let Some(rest) = lines[pos].strip_prefix('+') else {
                        break;
                    };
                    text.push_str(rest);
                    text.push('\n');
                    new_cursor += 1;
                    pos += 1;
                }
                // a removal ending right above merges into one Change
                match diffs.last_mut() {
                    Some(prev)
                        if prev.kind == DiffKind::Delete && prev.first_end + 1 == old_cursor =>
                    {
                        prev.kind = DiffKind::Change;
                        prev.second_start = run_start;
                        prev.second_end = new_cursor - 1;
                        prev.second_text = text;
                    }
                    _ => diffs.push(Difference::add(
                        old_cursor.saturating_sub(1),
                        run_start,
                        new_cursor - 1,
                        text,
                    )),
                }
            } else if let Some(rest) = line.strip_prefix('-') {
                let run_start = old_cursor;
                let mut text = String::new();
                text.push_str(rest);
                text.push('\n');
                old_cursor += 1;
                pos += 1;
                while pos < end && old_cursor < old_limit {
                    let Some(rest) = lines[pos].strip_prefix('-') else {
                        break;
                    };
                    text.push_str(rest);
                    text.push('\n');
                    old_cursor += 1;
                    pos += 1;
                }
                // an insertion ending right above merges into one Change
                match diffs.last_mut() {
                    Some(prev)
                        if prev.kind == DiffKind::Add && prev.second_end + 1 == new_cursor =>
                    {
                        prev.kind = DiffKind::Change;
                        prev.first_start = run_start;
                        prev.first_end = old_cursor - 1;
                        prev.first_text = text;
                    }
                    _ => diffs.push(Difference::delete(
                        run_start,
                        old_cursor - 1,
                        new_cursor.saturating_sub(1),
                        text,
                    )),
                }
            } else if line.starts_with('\\') {
                // "\ No newline at end of file"
                pos += 1;
            } else {
                // unchanged context
                old_cursor += 1;
                new_cursor += 1;
                pos += 1;
            }
        }
    }

    Ok((diffs, pos))
}
