use std::path::Path;

use assert_cmd::Command;
use pretty_assertions::assert_eq;


use classfile_support::*;

fn umm_verify(cwd: &Path) -> Command {
    let mut cmd = Command::cargo_bin("umm-verify").expect("binary builds");
    cmd.current_dir(cwd)
        .env("NO_COLOR", "1")
        .env_remove("UMM_VERIFY_MARKER")
        .env_remove("UMM_VERIFY_REFERENCE")
        .env_remove("UMM_VERIFY_BUILD_DIR")
        .env_remove("UMM_VERIFY_TIMEOUT_SECS");
    cmd
}

fn foo(return_descriptor: &str) -> ClassSpec {
    ClassSpec::new("a/b/Foo").method(
        MethodSpec::public("doWork", &format!("(I){return_descriptor}"))
            .throws("java/lang/Exception"),
    )
}

/// A project root with `reference.jar` and compiled classes under `target/`.
fn project(candidate: &[ClassSpec]) -> std::path::PathBuf {
    let root = temp_root("umm-verify-cli");
    std::fs::write(root.join("reference.jar"), jar(&[foo("V")])).expect("write reference");
    write_classes(&root.join("target"), candidate);
    root
}

fn stdout(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

#[test]
fn check_without_reference_has_no_tests() {
    let root = project(&[foo("V")]);
    let output = umm_verify(&root).arg("check").output().expect("run");
    assert!(output.status.success());
    assert!(stdout(&output).contains("There are no verification tests for the assignment"));
    std::fs::remove_dir_all(&root).ok();
}

#[test]
fn check_passes_for_matching_classes() {
    let root = project(&[foo("V")]);
    let output = umm_verify(&root)
        .args(["check", "--reference", "reference.jar"])
        .output()
        .expect("run");
    assert!(output.status.success());
    assert!(stdout(&output).contains("Passed verification"));
    std::fs::remove_dir_all(&root).ok();
}

#[test]
fn check_fails_with_exit_code_one() {
    let root = project(&[foo("I")]);
    let output = umm_verify(&root)
        .args(["check", "-r", "reference.jar"])
        .output()
        .expect("run");
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains(
        "Method \"doWork(int)\" in class \"a.b.Foo\" needs a return type of \"void\", not \"int\"."
    ));
    std::fs::remove_dir_all(&root).ok();
}

#[test]
fn check_reads_reference_folder_from_environment() {
    let root = project(&[foo("V")]);
    let output = umm_verify(&root)
        .env("UMM_VERIFY_REFERENCE", root.display().to_string())
        .args(["check", "--json"])
        .output()
        .expect("run");
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json output");
    assert_eq!(json["status"], "pass");
    std::fs::remove_dir_all(&root).ok();
}

#[test]
fn check_json_describes_the_diagnostic() {
    let root = project(&[]);
    let other = root.join("classes");
    write_classes(&other, &[ClassSpec::new("a/b/Other")]);

    let output = umm_verify(&root)
        .args(["check", "--reference", "reference.jar", "--classes"])
        .arg(&other)
        .arg("--json")
        .output()
        .expect("run");
    assert_eq!(output.status.code(), Some(1));
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json output");
    assert_eq!(json["status"], "fail");
    assert_eq!(json["diagnostic"]["kind"], "missing_class");
    assert_eq!(json["diagnostic"]["class"], "a/b/Foo");
    std::fs::remove_dir_all(&root).ok();
}

#[test]
fn check_with_unreadable_reference_is_an_error() {
    let root = project(&[foo("V")]);
    umm_verify(&root)
        .args(["check", "--reference", "missing.jar"])
        .assert()
        .code(2);
    std::fs::remove_dir_all(&root).ok();
}

#[test]
fn internal_errors_and_failed_verdicts_exit_differently() {
    let root = project(&[foo("I")]);

    let failed = umm_verify(&root)
        .args(["check", "--reference", "reference.jar"])
        .output()
        .expect("run");
    assert_eq!(failed.status.code(), Some(1));

    let aborted = umm_verify(&root)
        .args(["check", "--reference", "reference.jar", "--classes", "no-such-dir"])
        .output()
        .expect("run");
    assert_eq!(aborted.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&aborted.stderr).contains("no-such-dir"));

    std::fs::write(root.join("broken.jar"), b"not a jar").expect("write broken jar");
    umm_verify(&root)
        .args(["check", "--reference", "broken.jar"])
        .assert()
        .code(2);

    umm_verify(&root)
        .args(["inspect", "missing.jar"])
        .assert()
        .code(2);

    std::fs::remove_dir_all(&root).ok();
}

#[test]
fn inspect_lists_classes_and_flags_excluded_methods() {
    let classes = [ClassSpec::new("a/b/Foo")
        .method(MethodSpec::public("doWork", "(I)V"))
        .method(MethodSpec::public("hidden", "()V").annotated(Annotation::invisible(SKIP)))];
    let root = class_dir("umm-verify-inspect", &classes);

    let output = umm_verify(&root)
        .args(["inspect", "."])
        .output()
        .expect("run");
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("a/b/Foo"));
    assert!(text.contains("doWork(int)"));

    let output = umm_verify(&root)
        .args(["inspect", ".", "--json"])
        .output()
        .expect("run");
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json output");
    let methods = json[0]["methods"].as_array().expect("methods array");
    assert_eq!(methods.len(), 2);
    assert_eq!(methods[0]["excluded"], false);
    assert_eq!(methods[1]["name"], "hidden");
    assert_eq!(methods[1]["excluded"], true);
    std::fs::remove_dir_all(&root).ok();
}
