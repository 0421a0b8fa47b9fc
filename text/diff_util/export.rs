//
// Copyright (c) 2025 Jeff Garzik
//
// This file is part of the difftools-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

//! Multi-file patch artifact writing.
//!
//! The artifact starts with a four-line identification banner, then
//! carries one `Index: <name>` section per changed file. Everything is
//! UTF-8 with `\n` newlines, so the result applies on any platform.

use std::{
    ffi::OsString,
    fs::File,
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use dlib::diff::Difference;
use dlib::patchfile::writer::{write_context, write_normal, write_unified};

use super::{common::OutputFormat, file_data::FileData};

pub struct PatchExport {
    writer: BufWriter<File>,
    format: OutputFormat,
}

impl PatchExport {
    /// Create the artifact at `path` (given a `.patch` extension unless
    /// it already ends in `.patch` or `.diff`) and write the banner.
    /// The default output format exports as unified with three lines of
    /// context.
    pub fn create(path: &Path, output_format: OutputFormat) -> io::Result<Self> {
        let path = enforce_patch_extension(path);
        let format = match output_format {
            OutputFormat::Default => OutputFormat::Unified(3),
            other => other,
        };

        let file = File::create(&path)?;
        let mut writer = BufWriter::new(file);
        writeln!(
            writer,
            "# This patch file was generated by {} diff",
            dlib::PROJECT_NAME
        )?;
        writeln!(
            writer,
            "# Following Index: paths are relative to the compared roots."
        )?;
        writeln!(
            writer,
            "# Apply it with the patch utility from the same toolkit."
        )?;
        writeln!(
            writer,
            "# It uses platform neutral UTF-8 encoding and \\n newlines."
        )?;

        Ok(Self { writer, format })
    }

    /// Append one changed file's section.
    pub fn add_file(
        &mut self,
        index_name: &str,
        file1: &FileData,
        differences: &[Difference],
    ) -> io::Result<()> {
        writeln!(self.writer, "Index: {}", index_name)?;
        match self.format {
            OutputFormat::Default => write_normal(&mut self.writer, differences)?,
            OutputFormat::Unified(n) => {
                writeln!(self.writer, "--- {}", index_name)?;
                writeln!(self.writer, "+++ {}", index_name)?;
                write_unified(&mut self.writer, differences, file1.lines(), n)?;
            }
            OutputFormat::Context(n) => {
                writeln!(self.writer, "*** {}", index_name)?;
                writeln!(self.writer, "--- {}", index_name)?;
                write_context(&mut self.writer, differences, file1.lines(), n)?;
            }
        }
        Ok(())
    }

    pub fn finish(mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

/// Patch artifacts carry a `.patch` or `.diff` extension; anything
/// else gets `.patch` appended.
fn enforce_patch_extension(path: &Path) -> PathBuf {
    match path.extension().and_then(|e| e.to_str()) {
        Some("patch") | Some("diff") => path.to_path_buf(),
        _ => {
            let mut name = OsString::from(path.as_os_str());
            name.push(".patch");
            PathBuf::from(name)
        }
    }
}
