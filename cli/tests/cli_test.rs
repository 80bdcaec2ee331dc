// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn cli_cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("bloomsift"))
}

#[test]
fn test_remove_duplicates() {
    cli_cmd()
        .args(["-p", "0.01", "-n", "100", "-r"])
        .write_stdin("a\nb\na\nc\n")
        .assert()
        .success()
        .stdout("a\nb\nc\n");
}

#[test]
fn test_only_duplicates() {
    cli_cmd()
        .args(["-p", "0.01", "-n", "100", "-d"])
        .write_stdin("a\nb\na\nc\n")
        .assert()
        .success()
        .stdout("a\n");
}

#[test]
fn test_unterminated_last_line() {
    cli_cmd()
        .args(["-p", "0.01", "-n", "100", "-r"])
        .write_stdin("x\n\ny")
        .assert()
        .success()
        .stdout("x\n\ny\n");
}

#[test]
fn test_save_then_load_read_only() {
    let tmp = tempdir().unwrap();
    let seen = tmp.path().join("seen.bf");

    cli_cmd()
        .args(["-p", "0.01", "-n", "1000", "-r", "-s"])
        .arg(&seen)
        .write_stdin("alpha\nbeta\n")
        .assert()
        .success()
        .stdout("alpha\nbeta\n");
    let saved = fs::read(&seen).unwrap();
    assert_eq!(&saved[..4], &[0xB1, 0x00, 0xF1, 0x1E]);

    let copy = tmp.path().join("copy.bf");
    cli_cmd()
        .args(["-d", "-u", "-l"])
        .arg(&seen)
        .arg("-s")
        .arg(&copy)
        .write_stdin("alpha\ngamma\nbeta\n")
        .assert()
        .success()
        .stdout("alpha\nbeta\n");
    assert_eq!(fs::read(&copy).unwrap(), saved);
}

#[test]
fn test_load_merges_filters() {
    let tmp = tempdir().unwrap();
    let first = tmp.path().join("first.bf");
    let second = tmp.path().join("second.bf");

    for (path, input) in [(&first, "one\n"), (&second, "two\n")] {
        cli_cmd()
            .args(["-p", "0.01", "-n", "100", "-r", "-s"])
            .arg(path)
            .write_stdin(input)
            .assert()
            .success();
    }

    cli_cmd()
        .arg("-l")
        .arg(&first)
        .arg("-l")
        .arg(&second)
        .args(["-d", "-u"])
        .write_stdin("one\nthree\ntwo\n")
        .assert()
        .success()
        .stdout("one\ntwo\n");
}

#[test]
fn test_incomplete_shape() {
    cli_cmd()
        .args(["-p", "0.01", "-r"])
        .write_stdin("a\n")
        .assert()
        .code(7)
        .stdout("")
        .stderr(predicate::str::contains("--elements"));
}

#[test]
fn test_missing_load_file() {
    let tmp = tempdir().unwrap();
    cli_cmd()
        .arg("-l")
        .arg(tmp.path().join("missing.bf"))
        .arg("-r")
        .write_stdin("a\n")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("unable to load filter file"));
}

#[test]
fn test_load_incompatible_shapes() {
    let tmp = tempdir().unwrap();
    let small = tmp.path().join("small.bf");
    let large = tmp.path().join("large.bf");
    for (path, n) in [(&small, "10"), (&large, "1000")] {
        cli_cmd()
            .args(["-p", "0.01", "-n", n, "-s"])
            .arg(path)
            .assert()
            .success();
    }

    cli_cmd()
        .arg("-l")
        .arg(&small)
        .arg("-l")
        .arg(&large)
        .assert()
        .code(3)
        .stderr(predicate::str::contains("ShapeMismatch"));
}

#[test]
fn test_save_given_twice() {
    cli_cmd()
        .args(["-s", "a.bf", "-s", "b.bf"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--save"));
}

#[test]
fn test_repeated_rate_is_a_usage_error() {
    cli_cmd()
        .args(["-p", "0.01", "-p", "0.02", "-n", "10"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--false-positive"));
}

#[test]
fn test_conflicting_policies() {
    cli_cmd()
        .args(["-p", "0.01", "-n", "10", "-r", "-d"])
        .write_stdin("a\n")
        .assert()
        .code(4);
}

#[test]
fn test_create_after_load() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("f.bf");
    cli_cmd()
        .args(["-p", "0.01", "-n", "10", "-s"])
        .arg(&path)
        .assert()
        .success();

    cli_cmd()
        .arg("-l")
        .arg(&path)
        .args(["-p", "0.01", "-n", "10"])
        .assert()
        .code(5);
}

#[test]
fn test_save_to_missing_directory() {
    let tmp = tempdir().unwrap();
    cli_cmd()
        .args(["-p", "0.01", "-n", "10", "-s"])
        .arg(tmp.path().join("nope").join("f.bf"))
        .assert()
        .code(8)
        .stderr(predicate::str::contains("error saving filter"));
}

#[test]
fn test_save_without_filter_keeps_existing_file() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("important.bf");
    cli_cmd()
        .args(["-p", "0.01", "-n", "100", "-s"])
        .arg(&path)
        .assert()
        .success();
    let before = fs::read(&path).unwrap();

    cli_cmd()
        .arg("-s")
        .arg(&path)
        .assert()
        .code(8)
        .stderr(predicate::str::contains("no filter to save"));
    assert_eq!(fs::read(&path).unwrap(), before);
}

#[test]
fn test_oversized_filter_is_rejected() {
    cli_cmd()
        .args(["-p", "0.01", "-n", "1000000000000000000", "-r"])
        .write_stdin("a\n")
        .assert()
        .code(7)
        .stderr(predicate::str::contains("num_bits must not exceed"));
}

#[test]
fn test_truncation_cap() {
    cli_cmd()
        .args(["-p", "0.01", "-n", "10", "-r", "--max-record-len", "3"])
        .write_stdin("abcdef\nabcxyz\nab\n")
        .assert()
        .success()
        .stdout("abc\nab\n");
}

#[test]
fn test_unknown_hash() {
    cli_cmd()
        .args(["--hash", "sha1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("sha1"));
}
