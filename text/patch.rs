//
// Copyright (c) 2025 Jeff Garzik
//
// This file is part of the difftools-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

//! patch - apply changes to files
//!
//! The patch utility reads a file containing difference listings in
//! context, unified or normal format and applies those differences to
//! the named files. Application is exact: a hunk whose recorded
//! original text does not match the file is a failure for that file's
//! patch, and nothing is written for it.

mod patch_util;

use clap::Parser;
use dlib::patchfile::{
    applier::apply_to_string,
    parser::parse_patch_forced,
    types::{PatchError, PatchFormat},
};
use gettextrs::{bind_textdomain_codeset, gettext, setlocale, textdomain, LocaleCategory};
use patch_util::{
    config::PatchConfig,
    file_ops::{determine_target_file, write_output},
};
use std::{
    env,
    fs::File,
    io::{self, BufReader, Read},
    path::PathBuf,
    process::ExitCode,
};

/// patch - apply changes to files
#[derive(Parser, Debug)]
#[command(
    version,
    about = gettext("patch - apply changes to files"),
    after_help = gettext("The patch utility reads a source (patch) file containing difference listings and applies those differences to a file.")
)]
struct Args {
    /// Save original file with .orig suffix
    #[arg(short = 'b', help = gettext("Save a copy of the original file with .orig suffix"))]
    backup: bool,

    /// Interpret patch as context diff
    #[arg(short = 'c', help = gettext("Interpret the patch file as a context difference"))]
    context: bool,

    /// Change to directory before processing
    #[arg(short = 'd', value_name = "DIR", help = gettext("Change to directory before processing"))]
    directory: Option<PathBuf>,

    /// Read patch from file
    #[arg(short = 'i', value_name = "PATCHFILE", help = gettext("Read the patch from PATCHFILE instead of stdin"))]
    patchfile: Option<PathBuf>,

    /// Interpret patch as normal diff
    #[arg(short = 'n', help = gettext("Interpret the patch file as a normal difference"))]
    normal: bool,

    /// Write output to file
    #[arg(short = 'o', value_name = "OUTFILE", help = gettext("Write output to OUTFILE instead of patching in place"))]
    output: Option<PathBuf>,

    /// Strip path components
    #[arg(short = 'p', value_name = "NUM", help = gettext("Strip NUM leading path components from file names"))]
    strip: Option<usize>,

    /// Reverse patch direction
    #[arg(short = 'R', help = gettext("Assume the patch was created with old and new files swapped"))]
    reverse: bool,

    /// Interpret patch as unified diff
    #[arg(short = 'u', help = gettext("Interpret the patch file as a unified difference"))]
    unified: bool,

    /// File to patch
    #[arg(name = "FILE", help = gettext("File to patch"))]
    file: Option<PathBuf>,
}

impl Args {
    /// Validate command-line arguments.
    fn validate(&self) -> Result<(), String> {
        let format_count = [self.context, self.normal, self.unified]
            .iter()
            .filter(|&&x| x)
            .count();

        if format_count > 1 {
            return Err(gettext("only one of -c, -n, -u may be specified"));
        }

        Ok(())
    }

    /// Convert Args to PatchConfig.
    fn to_config(&self) -> PatchConfig {
        PatchConfig {
            backup: self.backup,
            force_context: self.context,
            directory: self.directory.clone(),
            patchfile: self.patchfile.clone(),
            force_normal: self.normal,
            output_file: self.output.clone(),
            strip_count: self.strip,
            reverse: self.reverse,
            force_unified: self.unified,
            target_file: self.file.clone(),
        }
    }
}

/// Read patch content from stdin or file.
fn read_patch_input(config: &PatchConfig) -> io::Result<String> {
    match &config.patchfile {
        Some(path) => {
            let file = File::open(path)?;
            let mut reader = BufReader::new(file);
            let mut content = String::new();
            reader.read_to_string(&mut content)?;
            Ok(content)
        }
        None => {
            let stdin = io::stdin();
            let mut content = String::new();
            stdin.lock().read_to_string(&mut content)?;
            Ok(content)
        }
    }
}

fn forced_format(config: &PatchConfig) -> Option<PatchFormat> {
    if config.force_context {
        Some(PatchFormat::Context)
    } else if config.force_unified {
        Some(PatchFormat::Unified)
    } else if config.force_normal {
        Some(PatchFormat::Normal)
    } else {
        None
    }
}

/// Outcome of one run: whether any file patch failed to apply and
/// whether a hard error occurred.
struct RunStatus {
    failed: bool,
    trouble: bool,
}

fn run(args: Args) -> Result<RunStatus, PatchError> {
    let config = args.to_config();

    if let Some(ref dir) = config.directory {
        env::set_current_dir(dir)?;
    }

    let patch_content = read_patch_input(&config)?;

    let mut patches = parse_patch_forced(&patch_content, forced_format(&config))?;

    if config.reverse {
        for file_patch in &mut patches {
            file_patch.reverse();
        }
    }

    let mut status = RunStatus {
        failed: false,
        trouble: false,
    };

    for file_patch in &patches {
        if file_patch.differences.is_empty() {
            continue;
        }

        let target = match determine_target_file(file_patch, &config) {
            Ok(target) => target,
            Err(message) => {
                eprintln!("patch: {}", message);
                status.trouble = true;
                continue;
            }
        };

        // The whole result is materialized before anything is written,
        // so a failing hunk leaves the target untouched.
        let result = if target.exists() {
            let base = BufReader::new(File::open(&target)?);
            apply_to_string(base, &file_patch.differences)
        } else if file_patch.creates_file() {
            apply_to_string(&b""[..], &file_patch.differences)
        } else {
            eprintln!(
                "patch: {}: {}",
                target.display(),
                gettext("No such file or directory")
            );
            status.trouble = true;
            continue;
        };

        match result {
            Ok(content) => write_output(&content, &target, &config)?,
            Err(e @ (PatchError::NotApplicable | PatchError::Unapplied(_))) => {
                eprintln!("patch: {}: {}", target.display(), e);
                status.failed = true;
            }
            Err(e) => return Err(e),
        }
    }

    Ok(status)
}

fn main() -> ExitCode {
    setlocale(LocaleCategory::LcAll, "");
    textdomain(dlib::PROJECT_NAME).unwrap();
    bind_textdomain_codeset(dlib::PROJECT_NAME, "UTF-8").unwrap();

    let args = Args::parse();

    if let Err(e) = args.validate() {
        eprintln!("patch: {}", e);
        return ExitCode::from(2);
    }

    match run(args) {
        Ok(RunStatus { trouble: true, .. }) => ExitCode::from(2),
        Ok(RunStatus { failed: true, .. }) => ExitCode::from(1),
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("patch: {}", e);
            ExitCode::from(2)
        }
    }
}
