//
// Copyright (c) 2025 Jeff Garzik
//
// This file is part of the difftools-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

use chrono::{DateTime, Local};
use std::{
    fs::File,
    io::{self, Read},
    path::Path,
    time::SystemTime,
};

use super::constants::{COULD_NOT_UNWRAP_FILENAME, UTF8_NOT_ALLOWED_BYTES};

pub fn system_time_to_rfc2822(system_time: SystemTime) -> String {
    Into::<DateTime<Local>>::into(system_time).to_rfc2822()
}

pub fn is_binary(file_path: &Path) -> io::Result<bool> {
    let mut file = File::open(file_path)?;
    let mut buffer = [0; 1024];

    let count = file.read(&mut buffer)?;
    for byte in &buffer[..count] {
        if UTF8_NOT_ALLOWED_BYTES.contains(byte) {
            return Ok(true);
        }
    }

    Ok(false)
}

pub fn check_existance(path_buf: &Path) -> bool {
    let result = path_buf.exists();

    if !result {
        println!(
            "diff: {}: No such file or directory",
            path_buf.to_str().unwrap_or(COULD_NOT_UNWRAP_FILENAME)
        );
    }

    result
}
