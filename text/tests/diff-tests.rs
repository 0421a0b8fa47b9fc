//
// Copyright (c) 2025 Jeff Garzik
//
// This file is part of the difftools-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

use dlib::testing::{run_test, TestPlan};
use std::path::PathBuf;

const EXIT_STATUS_NO_DIFFERENCE: i32 = 0;
const EXIT_STATUS_DIFFERENCE: i32 = 1;
const EXIT_STATUS_TROUBLE: i32 = 2;

fn diff_test(args: &[&str], expected_output: &str, expected_exit_status: i32) {
    let str_args = args.iter().cloned().map(str::to_owned).collect();

    run_test(TestPlan {
        cmd: String::from("diff"),
        args: str_args,
        stdin_data: String::from(""),
        expected_out: String::from(expected_output),
        expected_err: String::from(""),
        expected_exit_code: expected_exit_status,
    });
}

fn fixture(name: &str) -> String {
    PathBuf::from("tests")
        .join("diff")
        .join(name)
        .to_str()
        .expect("fixture path is valid UTF-8")
        .to_string()
}

#[test]
fn test_diff_normal_format() {
    diff_test(
        &[&fixture("f1.txt"), &fixture("f2.txt")],
        "2c2\n< banana\n---\n> berry\n3a4\n> grape\n",
        EXIT_STATUS_DIFFERENCE,
    );
}

#[test]
fn test_diff_unified_format_with_labels() {
    diff_test(
        &[
            "-U",
            "1",
            "--label",
            "a/f1",
            "--label2",
            "b/f2",
            &fixture("f1.txt"),
            &fixture("f2.txt"),
        ],
        "--- a/f1\n+++ b/f2\n@@ -1,3 +1,4 @@\n apple\n-banana\n+berry\n cherry\n+grape\n",
        EXIT_STATUS_DIFFERENCE,
    );
}

#[test]
fn test_diff_context_format_with_labels() {
    diff_test(
        &[
            "-C",
            "1",
            "--label",
            "a/f1",
            "--label2",
            "b/f2",
            &fixture("f1.txt"),
            &fixture("f2.txt"),
        ],
        "*** a/f1\n--- b/f2\n***************\n*** 1,3 ****\n  apple\n! banana\n  cherry\n--- 1,4 ----\n  apple\n! berry\n  cherry\n+ grape\n",
        EXIT_STATUS_DIFFERENCE,
    );
}

#[test]
fn test_diff_identical_files_print_nothing() {
    diff_test(
        &[&fixture("same_a.txt"), &fixture("same_b.txt")],
        "",
        EXIT_STATUS_NO_DIFFERENCE,
    );
}

#[test]
fn test_diff_missing_file_is_trouble() {
    diff_test(
        &[&fixture("missing.txt"), &fixture("f2.txt")],
        "diff: tests/diff/missing.txt: No such file or directory\n",
        EXIT_STATUS_TROUBLE,
    );
}

#[test]
fn test_diff_same_path_is_trouble() {
    diff_test(
        &[&fixture("f1.txt"), &fixture("f1.txt")],
        "",
        EXIT_STATUS_TROUBLE,
    );
}

#[test]
fn test_diff_ignore_trailing_whitespace() {
    // f1 differs from itself only in trailing blanks under -b
    diff_test(
        &["-b", &fixture("f1.txt"), &fixture("f1_ws.txt")],
        "",
        EXIT_STATUS_NO_DIFFERENCE,
    );
}
