//
// Copyright (c) 2025 Jeff Garzik
//
// This file is part of the difftools-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

use dlib::testing::{run_test, run_test_base, run_test_with_checker, TestPlan};
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

fn setup_test_dir(name: &str) -> PathBuf {
    let id = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
    let test_dir =
        PathBuf::from(env!("CARGO_TARGET_TMPDIR")).join(format!("patch_test_{}_{}", name, id));
    let _ = fs::remove_dir_all(&test_dir);
    fs::create_dir_all(&test_dir).expect("Failed to create test directory");
    test_dir
}

fn cleanup_test_dir(test_dir: &PathBuf) {
    let _ = fs::remove_dir_all(test_dir);
}

fn path_arg(path: &PathBuf) -> String {
    path.to_str().expect("path is valid UTF-8").to_string()
}

// Applying a unified diff in place
#[test]
fn test_patch_unified_simple() {
    let test_dir = setup_test_dir("unified_simple");

    let target = test_dir.join("test.txt");
    fs::write(&target, "a\nb\nc\n").unwrap();

    let patch_file = test_dir.join("test.patch");
    fs::write(
        &patch_file,
        "--- test.txt\n+++ test.txt\n@@ -1,3 +1,3 @@\n a\n-b\n+B\n c\n",
    )
    .unwrap();

    run_test(TestPlan {
        cmd: String::from("patch"),
        args: vec![
            String::from("-i"),
            path_arg(&patch_file),
            path_arg(&target),
        ],
        stdin_data: String::new(),
        expected_out: String::new(),
        expected_err: String::new(),
        expected_exit_code: 0,
    });

    assert_eq!(fs::read_to_string(&target).unwrap(), "a\nB\nc\n");
    cleanup_test_dir(&test_dir);
}

// A mismatched base must fail without touching the file
#[test]
fn test_patch_not_applicable_leaves_target_untouched() {
    let test_dir = setup_test_dir("not_applicable");

    let target = test_dir.join("test.txt");
    fs::write(&target, "a\nx\nc\n").unwrap();

    let patch_file = test_dir.join("test.patch");
    fs::write(
        &patch_file,
        "--- test.txt\n+++ test.txt\n@@ -1,3 +1,3 @@\n a\n-b\n+B\n c\n",
    )
    .unwrap();

    run_test_with_checker(
        TestPlan {
            cmd: String::from("patch"),
            args: vec![
                String::from("-i"),
                path_arg(&patch_file),
                path_arg(&target),
            ],
            stdin_data: String::new(),
            expected_out: String::new(),
            expected_err: String::new(),
            expected_exit_code: 1,
        },
        |_, output| {
            assert_eq!(output.status.code(), Some(1));
            let stderr = String::from_utf8_lossy(&output.stderr);
            assert!(
                stderr.contains("Patch not applicable"),
                "unexpected stderr: {stderr}"
            );
        },
    );

    assert_eq!(fs::read_to_string(&target).unwrap(), "a\nx\nc\n");
    cleanup_test_dir(&test_dir);
}

// Patch content arrives on stdin when -i is absent
#[test]
fn test_patch_normal_diff_from_stdin() {
    let test_dir = setup_test_dir("normal_stdin");

    let target = test_dir.join("test.txt");
    fs::write(&target, "a\nb\nc\n").unwrap();

    run_test(TestPlan {
        cmd: String::from("patch"),
        args: vec![path_arg(&target)],
        stdin_data: String::from("2c2\n< b\n---\n> B\n"),
        expected_out: String::new(),
        expected_err: String::new(),
        expected_exit_code: 0,
    });

    assert_eq!(fs::read_to_string(&target).unwrap(), "a\nB\nc\n");
    cleanup_test_dir(&test_dir);
}

// A multi-file context patch with Index: lines, applied with -d
#[test]
fn test_patch_multi_file_context() {
    let test_dir = setup_test_dir("multi_file");

    fs::write(test_dir.join("one.txt"), "a\nb\nc\n").unwrap();
    fs::write(test_dir.join("two.txt"), "x\ny\n").unwrap();

    let patch_file = test_dir.join("multi.patch");
    fs::write(
        &patch_file,
        concat!(
            "Index: one.txt\n",
            "*** one.txt\n",
            "--- one.txt\n",
            "***************\n",
            "*** 1,3 ****\n",
            "  a\n",
            "! b\n",
            "  c\n",
            "--- 1,3 ----\n",
            "  a\n",
            "! B\n",
            "  c\n",
            "Index: two.txt\n",
            "*** two.txt\n",
            "--- two.txt\n",
            "***************\n",
            "*** 1,2 ****\n",
            "  x\n",
            "- y\n",
            "--- 1 ----\n",
        ),
    )
    .unwrap();

    run_test(TestPlan {
        cmd: String::from("patch"),
        args: vec![
            String::from("-d"),
            path_arg(&test_dir),
            String::from("-i"),
            path_arg(&patch_file),
        ],
        stdin_data: String::new(),
        expected_out: String::new(),
        expected_err: String::new(),
        expected_exit_code: 0,
    });

    assert_eq!(
        fs::read_to_string(test_dir.join("one.txt")).unwrap(),
        "a\nB\nc\n"
    );
    assert_eq!(fs::read_to_string(test_dir.join("two.txt")).unwrap(), "x\n");
    cleanup_test_dir(&test_dir);
}

// -R applies the patch backwards
#[test]
fn test_patch_reverse() {
    let test_dir = setup_test_dir("reverse");

    let target = test_dir.join("test.txt");
    fs::write(&target, "a\nB\nc\n").unwrap();

    let patch_file = test_dir.join("test.patch");
    fs::write(
        &patch_file,
        "--- test.txt\n+++ test.txt\n@@ -1,3 +1,3 @@\n a\n-b\n+B\n c\n",
    )
    .unwrap();

    run_test(TestPlan {
        cmd: String::from("patch"),
        args: vec![
            String::from("-R"),
            String::from("-i"),
            path_arg(&patch_file),
            path_arg(&target),
        ],
        stdin_data: String::new(),
        expected_out: String::new(),
        expected_err: String::new(),
        expected_exit_code: 0,
    });

    assert_eq!(fs::read_to_string(&target).unwrap(), "a\nb\nc\n");
    cleanup_test_dir(&test_dir);
}

// -b keeps the original next to the patched file
#[test]
fn test_patch_backup() {
    let test_dir = setup_test_dir("backup");

    let target = test_dir.join("test.txt");
    fs::write(&target, "a\nb\nc\n").unwrap();

    let patch_file = test_dir.join("test.patch");
    fs::write(
        &patch_file,
        "--- test.txt\n+++ test.txt\n@@ -1,3 +1,3 @@\n a\n-b\n+B\n c\n",
    )
    .unwrap();

    run_test(TestPlan {
        cmd: String::from("patch"),
        args: vec![
            String::from("-b"),
            String::from("-i"),
            path_arg(&patch_file),
            path_arg(&target),
        ],
        stdin_data: String::new(),
        expected_out: String::new(),
        expected_err: String::new(),
        expected_exit_code: 0,
    });

    assert_eq!(fs::read_to_string(&target).unwrap(), "a\nB\nc\n");
    let backup = test_dir.join("test.txt.orig");
    assert_eq!(fs::read_to_string(&backup).unwrap(), "a\nb\nc\n");
    cleanup_test_dir(&test_dir);
}

// -o leaves the target alone and writes elsewhere
#[test]
fn test_patch_output_redirection() {
    let test_dir = setup_test_dir("output");

    let target = test_dir.join("test.txt");
    fs::write(&target, "a\nb\nc\n").unwrap();
    let out_file = test_dir.join("patched.txt");

    let patch_file = test_dir.join("test.patch");
    fs::write(
        &patch_file,
        "--- test.txt\n+++ test.txt\n@@ -1,3 +1,3 @@\n a\n-b\n+B\n c\n",
    )
    .unwrap();

    run_test(TestPlan {
        cmd: String::from("patch"),
        args: vec![
            String::from("-i"),
            path_arg(&patch_file),
            String::from("-o"),
            path_arg(&out_file),
            path_arg(&target),
        ],
        stdin_data: String::new(),
        expected_out: String::new(),
        expected_err: String::new(),
        expected_exit_code: 0,
    });

    assert_eq!(fs::read_to_string(&target).unwrap(), "a\nb\nc\n");
    assert_eq!(fs::read_to_string(&out_file).unwrap(), "a\nB\nc\n");
    cleanup_test_dir(&test_dir);
}

// CRLF files keep their line-ending style through patching
#[test]
fn test_patch_preserves_crlf() {
    let test_dir = setup_test_dir("crlf");

    let target = test_dir.join("test.txt");
    fs::write(&target, "a\r\nb\r\nc\r\n").unwrap();

    run_test(TestPlan {
        cmd: String::from("patch"),
        args: vec![path_arg(&target)],
        stdin_data: String::from("2c2\n< b\n---\n> B\n"),
        expected_out: String::new(),
        expected_err: String::new(),
        expected_exit_code: 0,
    });

    assert_eq!(fs::read_to_string(&target).unwrap(), "a\r\nB\r\nc\r\n");
    cleanup_test_dir(&test_dir);
}

// The output of diff applies cleanly with patch
#[test]
fn test_diff_output_applies_with_patch() {
    let test_dir = setup_test_dir("pipeline");

    let f1 = test_dir.join("f1.txt");
    let f2 = test_dir.join("f2.txt");
    fs::write(&f1, "one\ntwo\nthree\nfour\n").unwrap();
    fs::write(&f2, "one\n2\nthree\nfour\nfive\n").unwrap();

    let diff_output = run_test_base(
        "diff",
        &vec![String::from("-u"), path_arg(&f1), path_arg(&f2)],
        b"",
    );
    assert_eq!(diff_output.status.code(), Some(1));
    let patch_text = String::from_utf8(diff_output.stdout).unwrap();

    let target = test_dir.join("target.txt");
    fs::write(&target, "one\ntwo\nthree\nfour\n").unwrap();

    run_test(TestPlan {
        cmd: String::from("patch"),
        args: vec![path_arg(&target)],
        stdin_data: patch_text,
        expected_out: String::new(),
        expected_err: String::new(),
        expected_exit_code: 0,
    });

    assert_eq!(
        fs::read_to_string(&target).unwrap(),
        "one\n2\nthree\nfour\nfive\n"
    );
    cleanup_test_dir(&test_dir);
}

// diff -o writes a banner plus Index: sections, and the artifact
// applies with patch
#[test]
fn test_diff_export_artifact_round_trips() {
    let test_dir = setup_test_dir("export");

    let f1 = test_dir.join("f1.txt");
    let f2 = test_dir.join("f2.txt");
    fs::write(&f1, "a\nb\nc\n").unwrap();
    fs::write(&f2, "a\nB\nc\n").unwrap();

    let artifact = test_dir.join("out");
    let diff_output = run_test_base(
        "diff",
        &vec![
            String::from("-o"),
            path_arg(&artifact),
            path_arg(&f1),
            path_arg(&f2),
        ],
        b"",
    );
    assert_eq!(diff_output.status.code(), Some(1));

    // the extension is enforced on save
    let artifact = test_dir.join("out.patch");
    let content = fs::read_to_string(&artifact).unwrap();
    let mut lines = content.lines();
    assert_eq!(
        lines.next().unwrap(),
        "# This patch file was generated by difftools-rs diff"
    );
    assert!(content.lines().take(4).all(|l| l.starts_with('#')));
    assert!(content.contains("Index: "));

    let target = test_dir.join("target.txt");
    fs::write(&target, "a\nb\nc\n").unwrap();

    run_test(TestPlan {
        cmd: String::from("patch"),
        args: vec![
            String::from("-i"),
            path_arg(&artifact),
            path_arg(&target),
        ],
        stdin_data: String::new(),
        expected_out: String::new(),
        expected_err: String::new(),
        expected_exit_code: 0,
    });

    assert_eq!(fs::read_to_string(&target).unwrap(), "a\nB\nc\n");
    cleanup_test_dir(&test_dir);
}
