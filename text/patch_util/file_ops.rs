//
// Copyright (c) 2025 Jeff Garzik
//
// This file is part of the difftools-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

//! File operations for the patch utility.

use dlib::patchfile::types::FileDifferences;
use gettextrs::gettext;
use std::{
    fs::{self, File},
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use super::config::PatchConfig;

/// Determine the target file for a patch.
///
/// The file operand wins; otherwise the header name and then the
/// `Index:` name are tried (existing files only), per the POSIX
/// ordering. A patch that creates its file resolves to the stripped
/// name even though nothing exists there yet.
pub fn determine_target_file(
    patch: &FileDifferences,
    config: &PatchConfig,
) -> Result<PathBuf, String> {
    if let Some(ref target) = config.target_file {
        return Ok(target.clone());
    }

    let strip = config.strip_count;
    let candidates = [&patch.file_name, &patch.index_name];

    for candidate in candidates.iter().filter_map(|c| c.as_ref()) {
        if candidate == "/dev/null" {
            continue;
        }

        let path = PathBuf::from(strip_path(candidate, strip));
        if path.exists() {
            return Ok(path);
        }
    }

    if patch.creates_file() {
        for candidate in [&patch.index_name, &patch.file_name]
            .iter()
            .filter_map(|c| c.as_ref())
        {
            if candidate != "/dev/null" {
                return Ok(PathBuf::from(strip_path(candidate, strip)));
            }
        }
    }

    Err(gettext("could not determine target file for patch"))
}

/// Strip leading path components from a path. Without `-p` only the
/// basename is used; `-p0` keeps the full name.
fn strip_path(path: &str, strip_count: Option<usize>) -> String {
    match strip_count {
        None => Path::new(path)
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string()),
        Some(0) => path.to_string(),
        Some(n) => {
            let components: Vec<&str> = path.split('/').collect();
            if n >= components.len() {
                components.last().unwrap_or(&path).to_string()
            } else {
                components[n..].join("/")
            }
        }
    }
}

/// Write the patched content, handling `-b` backups and `-o`
/// redirection. The content carries its own line endings.
pub fn write_output(content: &str, target: &Path, config: &PatchConfig) -> io::Result<()> {
    let output_path = config.output_file.as_deref().unwrap_or(target);

    if config.backup {
        let backed_up = if config.output_file.is_some() {
            output_path
        } else {
            target
        };
        if backed_up.exists() {
            let backup_path = format!("{}.orig", backed_up.display());
            fs::copy(backed_up, &backup_path)?;
        }
    }

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    let file = File::create(output_path)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(content.as_bytes())?;
    writer.flush()?;

    Ok(())
}
