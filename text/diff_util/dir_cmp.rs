//
// Copyright (c) 2025 Jeff Garzik
//
// This file is part of the difftools-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

//! Comparison of two directory trees.

use std::{
    collections::BTreeMap,
    ffi::OsString,
    fs::{self, FileType},
    io,
    path::{Path, PathBuf},
};

use super::{
    common::{FormatOptions, OutputFormat},
    constants::COULD_NOT_UNWRAP_FILENAME,
    diff_exit_status::DiffExitStatus,
    export::PatchExport,
    file_cmp,
};

pub struct DirCmp<'a> {
    format_options: &'a FormatOptions,
    recursive: bool,
}

impl<'a> DirCmp<'a> {
    /// Compare `path1` and `path2`. With `export` set, differing files
    /// are collected into the patch artifact instead of being printed.
    pub fn compare(
        path1: &Path,
        path2: &Path,
        format_options: &'a FormatOptions,
        recursive: bool,
        export: &mut Option<PatchExport>,
    ) -> io::Result<DiffExitStatus> {
        let dir_cmp = DirCmp {
            format_options,
            recursive,
        };
        dir_cmp.analyze(path1, path2, &PathBuf::new(), export)
    }

    fn analyze(
        &self,
        dir1: &Path,
        dir2: &Path,
        relative: &Path,
        export: &mut Option<PatchExport>,
    ) -> io::Result<DiffExitStatus> {
        let mut exit_status = DiffExitStatus::NotDifferent;

        let entries1 = load_entries(dir1)?;
        let entries2 = load_entries(dir2)?;

        let mut names: Vec<&OsString> = entries1.keys().chain(entries2.keys()).collect();
        names.sort();
        names.dedup();

        for name in names {
            let in_dir1 = entries1.get(name);
            let in_dir2 = entries2.get(name);
            let path1 = dir1.join(name);
            let path2 = dir2.join(name);

            match (in_dir1, in_dir2) {
                (Some(type1), Some(type2)) => {
                    if type1.is_file() && type2.is_file() {
                        let relative = relative.join(name);
                        let inner = self.compare_file_pair(&path1, &path2, &relative, export)?;
                        exit_status = exit_status.merge(inner);
                    } else if type1.is_dir() && type2.is_dir() {
                        if self.recursive {
                            let relative = relative.join(name);
                            let inner = self.analyze(&path1, &path2, &relative, export)?;
                            exit_status = exit_status.merge(inner);
                        } else {
                            println!(
                                "Common subdirectories: \"{}\" and \"{}\"",
                                path1.display(),
                                path2.display()
                            );
                        }
                    } else {
                        let (file, dir) = if type1.is_file() {
                            (path1.display(), path2.display())
                        } else {
                            (path2.display(), path1.display())
                        };
                        println!(
                            "File \"{}\" is a directory while file \"{}\" is a regular file",
                            dir, file
                        );
                        exit_status = exit_status.merge(DiffExitStatus::Different);
                    }
                }
                (Some(_), None) => {
                    println!(
                        "Only in {}: {}",
                        dir1.display(),
                        name.to_str().unwrap_or(COULD_NOT_UNWRAP_FILENAME)
                    );
                    exit_status = exit_status.merge(DiffExitStatus::Different);
                }
                (None, Some(_)) => {
                    println!(
                        "Only in {}: {}",
                        dir2.display(),
                        name.to_str().unwrap_or(COULD_NOT_UNWRAP_FILENAME)
                    );
                    exit_status = exit_status.merge(DiffExitStatus::Different);
                }
                (None, None) => unreachable!("name came from one of the two maps"),
            }
        }

        Ok(exit_status)
    }

    fn compare_file_pair(
        &self,
        path1: &Path,
        path2: &Path,
        relative: &Path,
        export: &mut Option<PatchExport>,
    ) -> io::Result<DiffExitStatus> {
        let index_name = relative.to_string_lossy().to_string();
        if let Some(export) = export.as_mut() {
            return file_cmp::export_files(path1, path2, self.format_options, &index_name, export);
        }

        let banner = self.command_banner(path1, path2);
        file_cmp::compare_files(path1, path2, self.format_options, Some(banner))
    }

    /// The `diff <options> <file1> <file2>` line announcing each
    /// differing pair of a directory comparison.
    fn command_banner(&self, path1: &Path, path2: &Path) -> String {
        let mut banner = String::from("diff ");

        match self.format_options.output_format {
            OutputFormat::Default => {}
            OutputFormat::Context(ctx) => banner.push_str(&format!("-C {} ", ctx)),
            OutputFormat::Unified(ctx) => banner.push_str(&format!("-U {} ", ctx)),
        }
        if self.recursive {
            banner.push_str("-r ");
        }
        if self.format_options.ignore_trailing_white_spaces {
            banner.push_str("-b ");
        }

        banner.push_str(path1.to_str().unwrap_or(COULD_NOT_UNWRAP_FILENAME));
        banner.push(' ');
        banner.push_str(path2.to_str().unwrap_or(COULD_NOT_UNWRAP_FILENAME));
        banner
    }
}

fn load_entries(path: &Path) -> io::Result<BTreeMap<OsString, FileType>> {
    let mut entries = BTreeMap::new();
    for entry in fs::read_dir(path)? {
        let entry = entry?;
        entries.insert(entry.file_name(), entry.file_type()?);
    }
    Ok(entries)
}
