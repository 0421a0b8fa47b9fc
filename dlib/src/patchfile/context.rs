//
// Copyright (c) 2025 Jeff Garzik
//
// This file is part of the difftools-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

//! Context diff format parser.

use super::types::PatchError;
use crate::diff::Difference;
use regex::Regex;
use std::sync::LazyLock;

/// Pre-compiled regex for old range headers to avoid recompilation on each parse.
static OLD_RANGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\*\*\* (\d+)(?:,(\d+))? \*\*\*\*$").expect("invalid regex"));

/// Pre-compiled regex for new range headers to avoid recompilation on each parse.
static NEW_RANGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^--- (\d+)(?:,(\d+))? ----$").expect("invalid regex"));

const HUNK_DELIMITER: &str = "***************";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunKind {
    Add,
    Delete,
    Change,
}

/// One consecutive block of changed lines on one side of a hunk.
struct Run {
    kind: RunKind,
    start: usize,
    end: usize,
    text: String,
}

/// Parse every context hunk of one segment, starting at the
/// `***************` delimiter in `lines[start]`. Returns the merged
/// differences and the position parsing stopped at.
pub fn parse_context(
    lines: &[&str],
    start: usize,
    end: usize,
) -> Result<(Vec<Difference>, usize), PatchError> {
    let mut diffs = Vec::new();
    let mut pos = start;

    while pos < end {
        let line = lines[pos];

        if !line.starts_with(HUNK_DELIMITER) {
            if line.starts_with("*** ") || line.starts_with("--- ") {
                // next file's header lines, hand control back
                break;
            }
            pos += 1;
            continue;
        }

        pos += 1;
        if pos >= end {
            break;
        }

        // *** start,end **** for the old side
        let caps = OLD_RANGE_RE.captures(lines[pos]).ok_or_else(|| PatchError::Parse {
            line: pos + 1,
            message: format!("malformed hunk interval: {}", lines[pos]),
        })?;
        let old_start: usize = caps[1].parse().unwrap_or(1);
        pos += 1;

        let (old_runs, stop) = collect_runs(lines, pos, end, old_start, |l| {
            NEW_RANGE_RE.is_match(l) || l.starts_with(HUNK_DELIMITER)
        });
        pos = stop;
        if pos >= end {
            return Err(PatchError::Parse {
                line: pos,
                message: "missing new-file interval in context hunk".to_string(),
            });
        }

        // --- start,end ---- for the new side
        let caps = NEW_RANGE_RE.captures(lines[pos]).ok_or_else(|| PatchError::Parse {
            line: pos + 1,
            message: format!("malformed hunk interval: {}", lines[pos]),
        })?;
        let new_start: usize = caps[1].parse().unwrap_or(1);
        pos += 1;

        let (new_runs, stop) = collect_runs(lines, pos, end, new_start, |l| {
            l.starts_with(HUNK_DELIMITER) || l.starts_with("*** ") || l.starts_with("--- ")
        });
        pos = stop;

        let old_changes = old_runs.iter().filter(|r| r.kind == RunKind::Change).count();
        let new_changes = new_runs.iter().filter(|r| r.kind == RunKind::Change).count();
        if old_changes != new_changes {
            return Err(PatchError::Parse {
                line: pos,
                message: "number of new and old file changes in one hunk must be same"
                    .to_string(),
            });
        }

        merge_runs(&mut diffs, old_runs, new_runs, old_start, new_start);
    }

    Ok((diffs, pos))
}

/// Collect the `+ `/`- `/`! ` change runs of one hunk side, walking
/// that side's line counter from `line_no`. Every other line is an
/// unchanged context line and only advances the counter; `stop` marks
/// the end of the side.
fn collect_runs(
    lines: &[&str],
    mut pos: usize,
    end: usize,
    mut line_no: usize,
    stop: impl Fn(&str) -> bool,
) -> (Vec<Run>, usize) {
    let mut runs: Vec<Run> = Vec::new();

    while pos < end {
        let line = lines[pos];
        if stop(line) {
            break;
        }
        if line.starts_with('\\') {
            // "\ No newline at end of file"
            pos += 1;
            continue;
        }

        let marked = match line.as_bytes().first() {
            Some(b'+') => Some(RunKind::Add),
            Some(b'-') => Some(RunKind::Delete),
            Some(b'!') => Some(RunKind::Change),
            _ => None,
        };

        match marked {
            Some(kind) => {
                let text = line.get(2..).unwrap_or("");
                match runs.last_mut() {
                    Some(run) if run.kind == kind && run.end + 1 == line_no => {
                        run.end = line_no;
                        run.text.push_str(text);
                        run.text.push('\n');
                    }
                    _ => {
                        let mut t = String::with_capacity(text.len() + 1);
                        t.push_str(text);
                        t.push('\n');
                        runs.push(Run {
                            kind,
                            start: line_no,
                            end: line_no,
                            text: t,
                        });
                    }
                }
            }
            None => {}
        }

        line_no += 1;
        pos += 1;
    }

    (runs, pos)
}

/// Interleave the old-side and new-side runs of one hunk into a single
/// chronological difference sequence.
///
/// `shift` maps first-file line numbers into the second file as runs
/// are consumed. Runs whose mapped position precedes the other side's
/// next run are drained first; the remaining `!` runs pair up, in
/// order, as Change differences. This keeps the output in
/// non-decreasing line order on both sides.
fn merge_runs(
    diffs: &mut Vec<Difference>,
    old_runs: Vec<Run>,
    new_runs: Vec<Run>,
    old_start: usize,
    new_start: usize,
) {
    enum Take {
        Old,
        New,
        Pair,
    }

    let mut shift = new_start as i64 - old_start as i64;
    let mut old_iter = old_runs.into_iter().peekable();
    let mut new_iter = new_runs.into_iter().peekable();

    loop {
        let take = match (old_iter.peek(), new_iter.peek()) {
            (None, None) => break,
            (Some(_), None) => Take::Old,
            (None, Some(_)) => Take::New,
            (Some(o), Some(n)) => {
                let opos = o.start as i64 + shift;
                let npos = n.start as i64;
                if o.kind != RunKind::Change && (opos <= npos || n.kind == RunKind::Change) {
                    Take::Old
                } else if n.kind != RunKind::Change && (npos <= opos || o.kind == RunKind::Change)
                {
                    Take::New
                } else {
                    Take::Pair
                }
            }
        };

        match take {
            Take::Old => {
                let run = old_iter.next().unwrap();
                let len = (run.end - run.start + 1) as i64;
                let anchor = (run.start as i64 - 1 + shift).max(0) as usize;
                diffs.push(Difference::delete(run.start, run.end, anchor, run.text));
                shift -= len;
            }
            Take::New => {
                let run = new_iter.next().unwrap();
                let len = (run.end - run.start + 1) as i64;
                let anchor = (run.start as i64 - 1 - shift).max(0) as usize;
                diffs.push(Difference::add(anchor, run.start, run.end, run.text));
                shift += len;
            }
            Take::Pair => {
                let o = old_iter.next().unwrap();
                let n = new_iter.next().unwrap();
                shift += (n.end - n.start) as i64 - (o.end - o.start) as i64;
                diffs.push(Difference::change(
                    o.start, o.end, n.start, n.end, o.text, n.text,
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::DiffKind;

    fn parse(text: &str) -> Vec<Difference> {
        let lines: Vec<&str> = text.lines().collect();
        let end = lines.len();
        let (diffs, _) = parse_context(&lines, 0, end).expect("parse");
        diffs
    }

    #[test]
    fn test_change_hunk() {
        let diffs = parse(
            "***************\n\
             *** 1,3 ****\n  a\n! b\n  c\n\
             --- 1,3 ----\n  a\n! B\n  c\n",
        );
        assert_eq!(
            diffs,
            vec![Difference::change(2, 2, 2, 2, "b\n".into(), "B\n".into())]
        );
    }

    #[test]
    fn test_interleaved_delete_and_add_stay_ordered() {
        // old lines 2-3 removed, one line inserted after old line 5
        let diffs = parse(
            "***************\n\
             *** 1,6 ****\n  a\n- b\n- c\n  d\n  e\n  f\n\
             --- 1,5 ----\n  a\n  d\n  e\n+ X\n  f\n",
        );
        assert_eq!(diffs.len(), 2);
        assert_eq!(
            diffs[0],
            Difference::delete(2, 3, 1, "b\nc\n".into())
        );
        assert_eq!(diffs[1], Difference::add(5, 4, 4, "X\n".into()));
    }

    #[test]
    fn test_change_pair_with_unequal_sizes() {
        let diffs = parse(
            "***************\n\
             *** 1,4 ****\n  a\n! x\n! y\n  d\n\
             --- 1,5 ----\n  a\n! 1\n! 2\n! 3\n  d\n",
        );
        assert_eq!(
            diffs,
            vec![Difference::change(
                2,
                3,
                2,
                4,
                "x\ny\n".into(),
                "1\n2\n3\n".into()
            )]
        );
    }

    #[test]
    fn test_two_hunks_accumulate() {
        let diffs = parse(
            "***************\n\
             *** 1,2 ****\n! a\n  b\n\
             --- 1,2 ----\n! A\n  b\n\
             ***************\n\
             *** 9,10 ****\n  x\n- y\n\
             --- 9 ----\n  x\n",
        );
        assert_eq!(diffs.len(), 2);
        assert_eq!(diffs[0].kind, DiffKind::Change);
        assert_eq!(diffs[1].kind, DiffKind::Delete);
        assert_eq!((diffs[1].first_start, diffs[1].first_end), (10, 10));
        assert_eq!(diffs[1].second_start, 9);
    }

    #[test]
    fn test_mismatched_change_counts_rejected() {
        let lines: Vec<&str> = "***************\n\
             *** 1,2 ****\n! a\n  b\n\
             --- 1,2 ----\n  A\n  b\n"
            .lines()
            .collect();
        let end = lines.len();
        let err = parse_context(&lines, 0, end).unwrap_err();
        match err {
            PatchError::Parse { message, .. } => {
                assert!(message.contains("changes in one hunk"))
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_missing_new_interval_rejected() {
        let lines: Vec<&str> = "***************\n*** 1,2 ****\n  a\n  b\n".lines().collect();
        let end = lines.len();
        assert!(parse_context(&lines, 0, end).is_err());
    }
}
