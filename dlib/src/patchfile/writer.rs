//
// Copyright (c) 2025 Jeff Garzik
//
// This file is part of the difftools-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

//! Rendering difference sequences back into diff text.
//!
//! Normal output is rebuilt from the recorded texts alone; unified and
//! context output also need the first file's lines to supply the
//! surrounding context. All output uses `\n` newlines.

use crate::diff::{DiffKind, Difference};
use std::io::{self, Write};

/// `start,end` with the single-number form when the range is one line.
fn range(start: usize, end: usize) -> String {
    if start == end {
        format!("{}", start)
    } else {
        format!("{},{}", start, end)
    }
}

/// Unified `start,count` ranges: `,1` is elided, an empty range is
/// anchored on the line before it.
fn unified_range(lo: usize, count: usize) -> String {
    match count {
        0 => format!("{},0", lo.saturating_sub(1)),
        1 => format!("{}", lo),
        _ => format!("{},{}", lo, count),
    }
}

/// Write `NaM`/`NdM`/`NcM` commands with `<`/`>`/`---` bodies.
pub fn write_normal<W: Write>(out: &mut W, differences: &[Difference]) -> io::Result<()> {
    for d in differences {
        match d.kind {
            DiffKind::Add => {
                writeln!(
                    out,
                    "{}a{}",
                    d.first_start,
                    range(d.second_start, d.second_end)
                )?;
                for line in d.second_text.lines() {
                    writeln!(out, "> {}", line)?;
                }
            }
            DiffKind::Delete => {
                writeln!(
                    out,
                    "{}d{}",
                    range(d.first_start, d.first_end),
                    d.second_start
                )?;
                for line in d.first_text.lines() {
                    writeln!(out, "< {}", line)?;
                }
            }
            DiffKind::Change => {
                writeln!(
                    out,
                    "{}c{}",
                    range(d.first_start, d.first_end),
                    range(d.second_start, d.second_end)
                )?;
                for line in d.first_text.lines() {
                    writeln!(out, "< {}", line)?;
                }
                writeln!(out, "---")?;
                for line in d.second_text.lines() {
                    writeln!(out, "> {}", line)?;
                }
            }
        }
    }
    Ok(())
}

/// The first-file span a difference occupies, for hunk grouping. An Add
/// occupies the empty span after its anchor, encoded as `(a + 1, a)`.
fn old_span(d: &Difference) -> (usize, usize) {
    match d.kind {
        DiffKind::Add => (d.first_start + 1, d.first_start),
        _ => (d.first_start, d.first_end),
    }
}

/// Split `differences` into groups whose `context`-line windows in the
/// first file overlap or adjoin; each group renders as one hunk.
fn group_hunks<'a>(
    differences: &'a [Difference],
    context: usize,
) -> Vec<(&'a [Difference], usize)> {
    let mut groups = Vec::new();
    let mut idx = 0;
    while idx < differences.len() {
        let mut group_end = idx + 1;
        let mut last_end = old_span(&differences[idx]).1;
        while group_end < differences.len() {
            let (next_start, next_end) = old_span(&differences[group_end]);
            if next_start.saturating_sub(context) <= last_end + context + 1 {
                last_end = next_end.max(last_end);
                group_end += 1;
            } else {
                break;
            }
        }
        groups.push((&differences[idx..group_end], last_end));
        idx = group_end;
    }
    groups
}

/// Write `@@ -a,b +c,d @@` hunks with `context` lines of surrounding
/// context taken from `first_lines`.
pub fn write_unified<W: Write>(
    out: &mut W,
    differences: &[Difference],
    first_lines: &[String],
    context: usize,
) -> io::Result<()> {
    let mut shift: i64 = 0;

    for (group, last_end) in group_hunks(differences, context) {
        let first_lo = old_span(&group[0]).0.saturating_sub(context).max(1);
        let first_hi = (last_end + context).min(first_lines.len());
        let old_count = if first_hi >= first_lo {
            first_hi - first_lo + 1
        } else {
            0
        };

        let removed: usize = group.iter().map(Difference::first_count).sum();
        let added: usize = group.iter().map(Difference::second_count).sum();
        let new_count = (old_count + added).saturating_sub(removed);
        let second_lo = if old_count == 0 {
            group[0].second_start
        } else {
            (first_lo as i64 + shift) as usize
        };

        writeln!(
            out,
            "@@ -{} +{} @@",
            unified_range(first_lo, old_count),
            unified_range(second_lo, new_count)
        )?;

        let mut line = first_lo;
        for d in group {
            match d.kind {
                DiffKind::Add => {
                    while line <= d.first_start {
                        writeln!(out, " {}", first_lines[line - 1])?;
                        line += 1;
                    }
                    for l in d.second_text.lines() {
                        writeln!(out, "+{}", l)?;
                    }
                }
                DiffKind::Delete | DiffKind::Change => {
                    while line < d.first_start {
                        writeln!(out, " {}", first_lines[line - 1])?;
                        line += 1;
                    }
                    for l in d.first_text.lines() {
                        writeln!(out, "-{}", l)?;
                    }
                    line = d.first_end + 1;
                    if d.kind == DiffKind::Change {
                        for l in d.second_text.lines() {
                            writeln!(out, "+{}", l)?;
                        }
                    }
                }
            }
        }
        while line <= first_hi {
            writeln!(out, " {}", first_lines[line - 1])?;
            line += 1;
        }

        for d in group {
            shift += d.second_count() as i64 - d.first_count() as i64;
        }
    }
    Ok(())
}

/// Write `*** a,b ****` / `--- c,d ----` hunks with `context` lines of
/// surrounding context taken from `first_lines`. A side without changes
/// omits its body.
pub fn write_context<W: Write>(
    out: &mut W,
    differences: &[Difference],
    first_lines: &[String],
    context: usize,
) -> io::Result<()> {
    let mut shift: i64 = 0;

    for (group, last_end) in group_hunks(differences, context) {
        let first_lo = old_span(&group[0]).0.saturating_sub(context).max(1);
        let first_hi = (last_end + context).min(first_lines.len());
        let old_count = if first_hi >= first_lo {
            first_hi - first_lo + 1
        } else {
            0
        };

        let removed: usize = group.iter().map(Difference::first_count).sum();
        let added: usize = group.iter().map(Difference::second_count).sum();
        let new_count = (old_count + added).saturating_sub(removed);
        let second_lo = if old_count == 0 {
            group[0].second_start
        } else {
            (first_lo as i64 + shift) as usize
        };

        writeln!(out, "***************")?;
        if old_count == 0 {
            writeln!(out, "*** {} ****", first_lo.saturating_sub(1))?;
        } else {
            writeln!(out, "*** {} ****", range(first_lo, first_hi))?;
        }

        if group
            .iter()
            .any(|d| matches!(d.kind, DiffKind::Delete | DiffKind::Change))
        {
            let mut line = first_lo;
            for d in group {
                match d.kind {
                    DiffKind::Add => {}
                    DiffKind::Delete | DiffKind::Change => {
                        while line < d.first_start {
                            writeln!(out, "  {}", first_lines[line - 1])?;
                            line += 1;
                        }
                        let mark = if d.kind == DiffKind::Delete { '-' } else { '!' };
                        for l in d.first_text.lines() {
                            writeln!(out, "{} {}", mark, l)?;
                        }
                        line = d.first_end + 1;
                    }
                }
            }
            while line <= first_hi {
                writeln!(out, "  {}", first_lines[line - 1])?;
                line += 1;
            }
        }

        if new_count == 0 {
            writeln!(out, "--- {} ----", second_lo.saturating_sub(1))?;
        } else {
            writeln!(
                out,
                "--- {} ----",
                range(second_lo, second_lo + new_count - 1)
            )?;
        }

        if group
            .iter()
            .any(|d| matches!(d.kind, DiffKind::Add | DiffKind::Change))
        {
            let mut line = first_lo;
            for d in group {
                match d.kind {
                    DiffKind::Add => {
                        while line <= d.first_start {
                            writeln!(out, "  {}", first_lines[line - 1])?;
                            line += 1;
                        }
                        for l in d.second_text.lines() {
                            writeln!(out, "+ {}", l)?;
                        }
                    }
                    DiffKind::Delete | DiffKind::Change => {
                        while line < d.first_start {
                            writeln!(out, "  {}", first_lines[line - 1])?;
                            line += 1;
                        }
                        if d.kind == DiffKind::Change {
                            for l in d.second_text.lines() {
                                writeln!(out, "! {}", l)?;
                            }
                        }
                        line = d.first_end + 1;
                    }
                }
            }
            while line <= first_hi {
                writeln!(out, "  {}", first_lines[line - 1])?;
                line += 1;
            }
        }

        for d in group {
            shift += d.second_count() as i64 - d.first_count() as i64;
        }
    }
    Ok(())
}
