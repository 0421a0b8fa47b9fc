//
// Copyright (c) 2025 Jeff Garzik
//
// This file is part of the difftools-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

//! Streaming patch application.
//!
//! [`PatchReader`] reconstructs the second version of a file from a
//! base reader and an ordered difference sequence, as a pull-based byte
//! stream implementing [`Read`]. The base source is only read as far as
//! the current comparison or output request requires, and the
//! line-ending style discovered on the first base line break is applied
//! to every spliced-in line.

use super::types::PatchError;
use crate::diff::{DiffKind, Difference};
use std::io::{self, BufRead, Read};

pub struct PatchReader<R: BufRead> {
    source: R,
    differences: Vec<Difference>,
    /// Index of the next unapplied difference
    current: usize,
    /// Number of the next line to be read from the base source (1-based)
    line: usize,
    /// Output produced but not yet handed to the caller
    buffer: Vec<u8>,
    /// Bytes of `buffer` already handed out
    consumed: usize,
    /// Line-ending style discovered from the first base line break
    newline: Option<String>,
    /// Whether the last buffered content ended with a line break
    last_had_eol: bool,
    source_done: bool,
}

enum Pending {
    Insert(String),
    Remove,
    Copy,
}

impl<R: BufRead> PatchReader<R> {
    /// Wrap `source`, to be transformed by `differences` (which must be
    /// ascending and non-overlapping).
    pub fn new(source: R, differences: Vec<Difference>) -> Self {
        Self {
            source,
            differences,
            current: 0,
            line: 1,
            buffer: Vec::new(),
            consumed: 0,
            newline: None,
            last_had_eol: true,
            source_done: false,
        }
    }

    /// Check that every difference was applied, consuming the reader.
    ///
    /// Call this after reading the transformed stream to end of file;
    /// it fails with the number of pending hunks otherwise.
    pub fn finish(self) -> Result<(), PatchError> {
        let left = self.differences.len() - self.current;
        if left > 0 {
            Err(PatchError::Unapplied(left))
        } else {
            Ok(())
        }
    }

    /// Produce more output into the internal buffer. Returns false once
    /// the base source is exhausted and no difference applies anymore.
    fn pump(&mut self) -> Result<bool, PatchError> {
        // A pending difference may act at the current position before
        // the next base line is copied: an Add splices after line
        // `first_start`, a Delete or Change consumes from `first_start`.
        let pending = match self.differences.get(self.current) {
            Some(d) if d.kind == DiffKind::Add && self.line == d.first_start + 1 => {
                Pending::Insert(d.second_text.clone())
            }
            Some(d) if d.kind != DiffKind::Add && self.line == d.first_start => Pending::Remove,
            _ => Pending::Copy,
        };

        match pending {
            Pending::Insert(text) => {
                self.splice(&text);
                self.current += 1;
                Ok(true)
            }
            Pending::Remove => self.apply_removal(),
            Pending::Copy => match self.next_source_line()? {
                Some((content, eol)) => {
                    self.buffer.extend_from_slice(content.as_bytes());
                    self.buffer.extend_from_slice(eol.as_bytes());
                    self.last_had_eol = !eol.is_empty();
                    self.line += 1;
                    Ok(true)
                }
                None => Ok(false),
            },
        }
    }

    /// Consume the lines a Delete or Change records, verify they match
    /// the recorded original text, and splice the replacement text for
    /// a Change.
    fn apply_removal(&mut self) -> Result<bool, PatchError> {
        let d = self.differences[self.current].clone();
        let count = d.first_end.saturating_sub(d.first_start) + 1;

        let mut removed = String::new();
        for _ in 0..count {
            match self.next_source_line()? {
                Some((content, _eol)) => {
                    removed.push_str(&content);
                    removed.push('\n');
                    self.line += 1;
                }
                None => return Err(PatchError::NotApplicable),
            }
        }
        if removed != normalize_newlines(&d.first_text) {
            return Err(PatchError::NotApplicable);
        }

        if d.kind == DiffKind::Change {
            self.splice(&d.second_text);
        }
        self.current += 1;
        Ok(true)
    }

    /// Append `text` to the output, translating its line breaks into
    /// the discovered line-ending style. When the preceding output did
    /// not end in a line break (a base file without a trailing
    /// newline), one is inserted first.
    fn splice(&mut self, text: &str) {
        let style = self.newline.clone().unwrap_or_else(|| String::from("\n"));
        let normalized = normalize_newlines(text);
        if normalized.is_empty() {
            return;
        }
        if !self.last_had_eol {
            self.buffer.extend_from_slice(style.as_bytes());
        }
        let converted = if style == "\n" {
            normalized
        } else {
            normalized.replace('\n', &style)
        };
        self.buffer.extend_from_slice(converted.as_bytes());
        self.last_had_eol = converted.ends_with(style.as_str());
    }

    /// Read one line from the base source, returning its content and
    /// the line break that ended it (empty at end of file). The first
    /// line break seen fixes the output's newline style.
    fn next_source_line(&mut self) -> Result<Option<(String, String)>, PatchError> {
        if self.source_done {
            return Ok(None);
        }

        let mut bytes: Vec<u8> = Vec::new();
        let mut eol = String::new();

        loop {
            let (advance, brk) = {
                let available = self.source.fill_buf()?;
                if available.is_empty() {
                    (0, None)
                } else {
                    match available.iter().position(|&b| b == b'\n' || b == b'\r') {
                        Some(i) => {
                            bytes.extend_from_slice(&available[..i]);
                            (i + 1, Some(available[i]))
                        }
                        None => {
                            bytes.extend_from_slice(available);
                            (available.len(), None)
                        }
                    }
                }
            };

            if advance == 0 {
                self.source_done = true;
                if bytes.is_empty() {
                    return Ok(None);
                }
                break;
            }
            self.source.consume(advance);

            match brk {
                Some(b'\n') => {
                    eol.push('\n');
                    break;
                }
                Some(_) => {
                    // a carriage return, possibly the start of \r\n
                    eol.push('\r');
                    let followed_by_lf = {
                        let available = self.source.fill_buf()?;
                        available.first() == Some(&b'\n')
                    };
                    if followed_by_lf {
                        self.source.consume(1);
                        eol.push('\n');
                    }
                    break;
                }
                None => continue,
            }
        }

        let content = String::from_utf8(bytes)
            .map_err(|e| PatchError::Io(io::Error::new(io::ErrorKind::InvalidData, e)))?;
        if self.newline.is_none() && !eol.is_empty() {
            self.newline = Some(eol.clone());
        }
        Ok(Some((content, eol)))
    }
}

impl<R: BufRead> Read for PatchReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        while self.consumed == self.buffer.len() {
            self.buffer.clear();
            self.consumed = 0;
            match self.pump() {
                Ok(true) => {}
                Ok(false) => return Ok(0),
                Err(e) => return Err(e.into()),
            }
        }
        let n = (self.buffer.len() - self.consumed).min(buf.len());
        buf[..n].copy_from_slice(&self.buffer[self.consumed..self.consumed + n]);
        self.consumed += n;
        Ok(n)
    }
}

/// Apply `differences` to everything `base` yields and return the
/// reconstructed text, verifying that every hunk was consumed.
pub fn apply_to_string<R: BufRead>(
    base: R,
    differences: &[Difference],
) -> Result<String, PatchError> {
    let mut reader = PatchReader::new(base, differences.to_vec());
    while reader.pump()? {}
    let out = String::from_utf8(std::mem::take(&mut reader.buffer))
        .map_err(|e| PatchError::Io(io::Error::new(io::ErrorKind::InvalidData, e)))?;
    reader.finish()?;
    Ok(out)
}

/// Collapse `\r\n` and lone `\r` line breaks into `\n`.
fn normalize_newlines(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\r' {
            if chars.peek() == Some(&'\n') {
                chars.next();
            }
            out.push('\n');
        } else {
            out.push(c);
        }
    }
    out
}
