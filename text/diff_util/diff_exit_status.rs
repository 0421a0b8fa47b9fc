//
// Copyright (c) 2025 Jeff Garzik
//
// This file is part of the difftools-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

use std::process::Termination;

use super::constants::{EXIT_STATUS_DIFFERENCE, EXIT_STATUS_NO_DIFFERENCE, EXIT_STATUS_TROUBLE};

#[derive(Clone, Copy)]
pub enum DiffExitStatus {
    NotDifferent,
    Different,
    Trouble,
}

impl DiffExitStatus {
    pub fn status_code(&self) -> u8 {
        match self {
            DiffExitStatus::NotDifferent => EXIT_STATUS_NO_DIFFERENCE,
            DiffExitStatus::Different => EXIT_STATUS_DIFFERENCE,
            DiffExitStatus::Trouble => EXIT_STATUS_TROUBLE,
        }
    }

    /// The worse of two statuses wins when many files are compared.
    pub fn merge(self, other: DiffExitStatus) -> DiffExitStatus {
        if other.status_code() > self.status_code() {
            other
        } else {
            self
        }
    }
}

impl Termination for DiffExitStatus {
    fn report(self) -> std::process::ExitCode {
        std::process::ExitCode::from(self.status_code())
    }
}
