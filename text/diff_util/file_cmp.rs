//
// Copyright (c) 2025 Jeff Garzik
//
// This file is part of the difftools-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

//! Comparison of two regular files.

use std::{
    fs::File,
    io::{self, BufReader, Read, Write},
    path::{Path, PathBuf},
};

use dlib::diff::{diff_lines, diff_lines_by, Difference};
use dlib::patchfile::writer::{write_context, write_normal, write_unified};

use super::{
    common::{FormatOptions, OutputFormat},
    constants::COULD_NOT_UNWRAP_FILENAME,
    diff_exit_status::DiffExitStatus,
    export::PatchExport,
    file_data::FileData,
    functions::{is_binary, system_time_to_rfc2822},
};

/// Compare two regular files and print the differences to stdout in
/// the selected format. `show_if_different` is printed first when the
/// files differ (the directory walk announces each comparison this
/// way).
pub fn compare_files(
    path1: &Path,
    path2: &Path,
    format_options: &FormatOptions,
    show_if_different: Option<String>,
) -> io::Result<DiffExitStatus> {
    if is_binary(path1)? || is_binary(path2)? {
        return binary_file_cmp(path1, path2);
    }

    let file1 = FileData::get_file(path1.to_path_buf())?;
    let file2 = FileData::get_file(path2.to_path_buf())?;

    let differences = diff_file_data(&file1, &file2, format_options);
    if differences.is_empty() {
        return Ok(DiffExitStatus::NotDifferent);
    }

    if let Some(banner) = show_if_different {
        println!("{}", banner);
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match format_options.output_format {
        OutputFormat::Default => write_normal(&mut out, &differences)?,
        OutputFormat::Unified(n) => {
            writeln!(out, "--- {}", get_header(&file1, format_options.label1()))?;
            writeln!(out, "+++ {}", get_header(&file2, format_options.label2()))?;
            write_unified(&mut out, &differences, file1.lines(), n)?;
        }
        OutputFormat::Context(n) => {
            writeln!(out, "*** {}", get_header(&file1, format_options.label1()))?;
            writeln!(out, "--- {}", get_header(&file2, format_options.label2()))?;
            write_context(&mut out, &differences, file1.lines(), n)?;
        }
    }

    Ok(DiffExitStatus::Different)
}

/// Compare two regular files for a patch artifact; differing text
/// files are appended to `export` under `index_name`.
pub fn export_files(
    path1: &Path,
    path2: &Path,
    format_options: &FormatOptions,
    index_name: &str,
    export: &mut PatchExport,
) -> io::Result<DiffExitStatus> {
    if is_binary(path1)? || is_binary(path2)? {
        return binary_file_cmp(path1, path2);
    }

    let file1 = FileData::get_file(path1.to_path_buf())?;
    let file2 = FileData::get_file(path2.to_path_buf())?;

    let differences = diff_file_data(&file1, &file2, format_options);
    if differences.is_empty() {
        return Ok(DiffExitStatus::NotDifferent);
    }

    export.add_file(index_name, &file1, &differences)?;
    Ok(DiffExitStatus::Different)
}

/// Run the differencing engine over two loaded files.
pub fn diff_file_data(
    file1: &FileData,
    file2: &FileData,
    format_options: &FormatOptions,
) -> Vec<Difference> {
    if format_options.ignore_trailing_white_spaces {
        diff_lines_by(file1.lines(), file2.lines(), |l1, l2| {
            l1.trim_end() == l2.trim_end()
        })
    } else {
        diff_lines(file1.lines(), file2.lines())
    }
}

fn binary_file_cmp(file1_path: &Path, file2_path: &Path) -> io::Result<DiffExitStatus> {
    let differ_report = format!(
        "Binary files {} and {} differ",
        file1_path.to_str().unwrap_or(COULD_NOT_UNWRAP_FILENAME),
        file2_path.to_str().unwrap_or(COULD_NOT_UNWRAP_FILENAME)
    );

    let file1 = File::open(file1_path)?;
    let file2 = File::open(file2_path)?;

    if file1.metadata()?.len() != file2.metadata()?.len() {
        println!("{}", differ_report);
        return Ok(DiffExitStatus::Different);
    }

    let file1 = BufReader::new(file1);
    let file2 = BufReader::new(file2);

    for bytes_pair in file1.bytes().zip(file2.bytes()) {
        let (b1, b2) = (bytes_pair.0?, bytes_pair.1?);
        if b1 != b2 {
            println!("{}", differ_report);
            return Ok(DiffExitStatus::Different);
        }
    }

    Ok(DiffExitStatus::NotDifferent)
}

/// `path<TAB>mtime`, or the user-supplied label verbatim.
pub fn get_header(file: &FileData, label: &Option<String>) -> String {
    if let Some(label) = label {
        label.clone()
    } else {
        format!(
            "{}\t{}",
            file.path(),
            system_time_to_rfc2822(file.modified())
        )
    }
}

/// Resolve a file/directory pair by joining the file's name onto the
/// directory, as POSIX requires for mixed operands.
pub fn resolve_file_dir_pair(path1: PathBuf, path2: PathBuf) -> (PathBuf, PathBuf) {
    if path1.is_file() {
        let joined = path1
            .file_name()
            .map(|name| path2.join(name))
            .unwrap_or_else(|| path2.clone());
        (path1, joined)
    } else {
        let joined = path2
            .file_name()
            .map(|name| path1.join(name))
            .unwrap_or_else(|| path1.clone());
        (joined, path2)
    }
}
