//! Cross-crate pipeline tests against the compiled `milc` binary
//! (spec.md §8's testable properties, exercised end to end).

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

fn source_file(contents: &str) -> NamedTempFile {
    let mut f = NamedTempFile::new().expect("create temp source file");
    f.write_all(contents.as_bytes()).expect("write temp source file");
    f
}

#[test]
fn compiles_minimal_package_to_llir() {
    let src = source_file("package main\n");
    Command::cargo_bin("milc")
        .unwrap()
        .arg(src.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("; package main"));
}

#[test]
fn emits_main_trampoline_for_main_func() {
    let src = source_file("package main\nfunc main() i32 {\n return 0\n}\n");
    Command::cargo_bin("milc")
        .unwrap()
        .arg(src.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("define i32 @main()"));
}

#[test]
fn reports_parse_errors_with_file_line_column() {
    let src = source_file("package\n");
    Command::cargo_bin("milc")
        .unwrap()
        .arg(src.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains(":1:"));
}

#[test]
fn missing_file_argument_fails_with_usage_message() {
    Command::cargo_bin("milc")
        .unwrap()
        .assert()
        .failure()
        .stderr(predicate::str::contains("usage"));
}

#[test]
fn unreadable_path_fails_with_io_context() {
    Command::cargo_bin("milc")
        .unwrap()
        .arg("/nonexistent/path/to/source.mi")
        .assert()
        .failure()
        .stderr(predicate::str::contains("reading"));
}

#[test]
fn for_loop_with_break_lowers_to_five_line_disambiguated_labels() {
    let src = source_file(
        "package main\nfunc f() {\n for i := 0; i < 10; i = i + 1 {\n  break\n }\n}\n",
    );
    Command::cargo_bin("milc")
        .unwrap()
        .arg(src.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("for.init.line2"))
        .stdout(predicate::str::contains("for.cond.line2"))
        .stdout(predicate::str::contains("for.body.line2"))
        .stdout(predicate::str::contains("for.post.line2"))
        .stdout(predicate::str::contains("for.end.line2"));
}
