//
// Copyright (c) 2025 Jeff Garzik
//
// This file is part of the difftools-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

//! Normal diff format parser.

use super::types::PatchError;
use crate::diff::Difference;
use regex::Regex;
use std::sync::LazyLock;

/// Pre-compiled regex for change commands: `NaM`, `NdM`, `NcM` with
/// optional `,end` on either side.
static CMD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+)(?:,(\d+))?([acd])(\d+)(?:,(\d+))?$").expect("invalid regex")
});

/// Parse every normal-diff command of one segment, starting at the
/// command line in `lines[start]`. Returns the differences and the
/// position parsing stopped at.
pub fn parse_normal(
    lines: &[&str],
    start: usize,
    end: usize,
) -> Result<(Vec<Difference>, usize), PatchError> {
    let mut diffs = Vec::new();
    let mut pos = start;

    while pos < end {
        let Some(caps) = CMD_RE.captures(lines[pos]) else {
            break;
        };
        let first_start: usize = caps[1].parse().unwrap_or(1);
        let first_end: usize = caps
            .get(2)
            .map_or(first_start, |m| m.as_str().parse().unwrap_or(first_start));
        let second_start: usize = caps[4].parse().unwrap_or(1);
        let second_end: usize = caps
            .get(5)
            .map_or(second_start, |m| m.as_str().parse().unwrap_or(second_start));
        let cmd = caps.get(3).map(|m| m.as_str()).unwrap_or("");
        pos += 1;

        // accumulate the `<` and `>` bodies until the next command
        let mut first_text = String::new();
        let mut second_text = String::new();
        while pos < end {
            let line = lines[pos];
            if let Some(rest) = line.strip_prefix("< ") {
                first_text.push_str(rest);
                first_text.push('\n');
            } else if line == "<" {
                first_text.push('\n');
            } else if let Some(rest) = line.strip_prefix("> ") {
                second_text.push_str(rest);
                second_text.push('\n');
            } else if line == ">" {
                second_text.push('\n');
            } else if line == "---" || line.starts_with('\\') {
                // change separator / "\ No newline at end of file"
            } else {
                break;
            }
            pos += 1;
        }

        match cmd {
            "a" => diffs.push(Difference::add(
                first_start,
                second_start,
                second_end,
                second_text,
            )),
            "d" => diffs.push(Difference::delete(
                first_start,
                first_end,
                second_start,
                first_text,
            )),
            "c" => diffs.push(Difference::change(
                first_start,
                first_end,
                second_start,
                second_end,
                first_text,
                second_text,
            )),
            _ => {
                return Err(PatchError::Parse {
                    line: pos,
                    message: format!("unknown change command: {}", cmd),
                })
            }
        }
    }

    Ok((diffs, pos))
}
