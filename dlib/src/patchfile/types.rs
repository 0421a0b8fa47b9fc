//
// Copyright (c) 2025 Jeff Garzik
//
// This file is part of the difftools-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

//! Core data types for the patch file format module.

use crate::diff::Difference;
use std::io;
use thiserror::Error;

/// The diff dialect a patch segment was written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchFormat {
    Context,
    Unified,
    Normal,
}

impl std::fmt::Display for PatchFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PatchFormat::Context => write!(f, "context"),
            PatchFormat::Unified => write!(f, "unified"),
            PatchFormat::Normal => write!(f, "normal"),
        }
    }
}

/// All differences recorded for one file of a multi-file patch.
#[derive(Debug, Clone)]
pub struct FileDifferences {
    /// Original-file name from the `*** ` or `--- ` header line, if any
    pub file_name: Option<String>,
    /// Name from the `Index: ` line, if any
    pub index_name: Option<String>,
    /// Dialect the segment was parsed as
    pub format: PatchFormat,
    /// Ordered, ascending changes
    pub differences: Vec<Difference>,
}

impl FileDifferences {
    /// Reverse every difference in place, turning the patch into its
    /// inverse.
    pub fn reverse(&mut self) {
        for d in &mut self.differences {
            d.reverse();
        }
    }

    /// Whether this patch builds the file from nothing: the recorded
    /// original is `/dev/null` or every difference inserts at the top
    /// of an empty file.
    pub fn creates_file(&self) -> bool {
        if self.file_name.as_deref() == Some("/dev/null") {
            return true;
        }
        !self.differences.is_empty()
            && self
                .differences
                .iter()
                .all(|d| d.first_end == 0 && d.first_start == 0)
    }
}

/// Errors from parsing or applying patch files.
#[derive(Error, Debug)]
pub enum PatchError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    /// The base text does not match the recorded original text.
    #[error("Patch not applicable")]
    NotApplicable,

    /// The patched stream was closed with differences still pending.
    #[error("{0} hunk(s) of the patch were not applied")]
    Unapplied(usize),
}

impl From<PatchError> for io::Error {
    fn from(e: PatchError) -> io::Error {
        match e {
            PatchError::Io(e) => e,
            other => io::Error::new(io::ErrorKind::InvalidData, other),
        }
    }
}
