//
// Copyright (c) 2025 Jeff Garzik
//
// This file is part of the difftools-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

//! Patch format detection and multi-file patch splitting.

use super::{
    context::parse_context,
    normal::parse_normal,
    types::{FileDifferences, PatchError, PatchFormat},
    unified::parse_unified,
};
use regex::Regex;
use std::sync::LazyLock;

/// Pre-compiled regex for normal-diff change commands such as `5c5` or
/// `2,4d1`.
static NORMAL_CMD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+(?:,\d+)?[acd]\d+(?:,\d+)?$").expect("invalid regex"));

const CONTEXT_HUNK_DELIMITER: &str = "***************";

/// Split a patch stream into per-file patches and parse each one.
///
/// Everything ahead of the first hunk marker that is not an `Index: `
/// or file header line is treated as banner text and discarded. File
/// names stay `None` when no such lines precede a hunk.
pub fn parse_patch(content: &str) -> Result<Vec<FileDifferences>, PatchError> {
    parse_patch_forced(content, None)
}

/// Like [`parse_patch`], but when `forced` is given only hunks of that
/// dialect are recognized, mirroring the `-c`/`-n`/`-u` options of the
/// patch utility.
pub fn parse_patch_forced(
    content: &str,
    forced: Option<PatchFormat>,
) -> Result<Vec<FileDifferences>, PatchError> {
    let lines: Vec<&str> = content.lines().collect();

    let mut patches = Vec::new();
    let mut pos = 0;
    let mut index_name: Option<String> = None;
    let mut file_name: Option<String> = None;
    let mut context_name_seen = false;

    while pos < lines.len() {
        let line = lines[pos];

        if let Some(rest) = line.strip_prefix("Index: ") {
            index_name = Some(rest.trim().to_string());
            file_name = None;
            context_name_seen = false;
            pos += 1;
            continue;
        }

        if let Some(format) = hunk_start(line, forced) {
            let bound = segment_bound(&lines, pos + 1);
            let (differences, next) = match format {
                PatchFormat::Context => parse_context(&lines, pos, bound)?,
                PatchFormat::Unified => parse_unified(&lines, pos, bound)?,
                PatchFormat::Normal => parse_normal(&lines, pos, bound)?,
            };
            patches.push(FileDifferences {
                file_name: file_name.take(),
                index_name: index_name.take(),
                format,
                differences,
            });
            context_name_seen = false;
            pos = next.max(pos + 1);
            continue;
        }

        // Header lines ahead of the hunk marker name the original file.
        // In a context diff the `*** ` line wins; `--- ` only counts
        // when no context-style name was seen (the unified case).
        if let Some(rest) = line.strip_prefix("*** ") {
            file_name = Some(strip_timestamp(rest));
            context_name_seen = true;
        } else if let Some(rest) = line.strip_prefix("--- ") {
            if !context_name_seen {
                file_name = Some(strip_timestamp(rest));
            }
        }
        pos += 1;
    }

    Ok(patches)
}

/// Decide whether `line` opens a hunk and in which dialect.
fn hunk_start(line: &str, forced: Option<PatchFormat>) -> Option<PatchFormat> {
    let detected = if line.starts_with(CONTEXT_HUNK_DELIMITER) {
        Some(PatchFormat::Context)
    } else if line.len() > 4 && line.starts_with("@@") && line.ends_with("@@") {
        Some(PatchFormat::Unified)
    } else if NORMAL_CMD_RE.is_match(line) {
        Some(PatchFormat::Normal)
    } else {
        None
    };

    match (forced, detected) {
        (None, detected) => detected,
        (Some(want), Some(found)) if want == found => Some(found),
        _ => None,
    }
}

/// A segment runs up to (but not including) the next `Index: ` line.
fn segment_bound(lines: &[&str], start: usize) -> usize {
    lines[start..]
        .iter()
        .position(|l| l.starts_with("Index: "))
        .map(|off| start + off)
        .unwrap_or(lines.len())
}

/// Header lines carry `name<TAB>timestamp`; keep only the name. Some
/// diffs separate with a double space instead.
fn strip_timestamp(rest: &str) -> String {
    let rest = rest.trim();
    if let Some(tab) = rest.find('\t') {
        rest[..tab].to_string()
    } else if let Some(spaces) = rest.find("  ") {
        rest[..spaces].to_string()
    } else {
        rest.to_string()
    }
}
