//
// Copyright (c) 2025 Jeff Garzik
//
// This file is part of the difftools-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

use std::{fs, io, path::PathBuf, time::SystemTime};

use super::constants::COULD_NOT_UNWRAP_FILENAME;

/// One comparison input, loaded into lines with line endings
/// normalized away.
#[derive(Debug)]
pub struct FileData {
    path: PathBuf,
    lines: Vec<String>,
    modified: SystemTime,
}

impl FileData {
    pub fn get_file(path: PathBuf) -> io::Result<Self> {
        let modified = fs::metadata(&path)?.modified()?;
        let content = fs::read_to_string(&path)?;

        let mut lines: Vec<String> = content
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
            .collect();
        if content.ends_with('\n') {
            // split leaves one empty element behind the final newline
            lines.pop();
        }

        Ok(Self {
            path,
            lines,
            modified,
        })
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn modified(&self) -> SystemTime {
        self.modified
    }

    pub fn path(&self) -> &str {
        self.path.to_str().unwrap_or(COULD_NOT_UNWRAP_FILENAME)
    }
}
