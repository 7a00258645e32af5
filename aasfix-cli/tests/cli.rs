//! CLI contract tests.

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

fn aasfix() -> Command {
    Command::cargo_bin("aasfix").expect("aasfix binary")
}

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="xml" ContentType="text/xml"/>
</Types>"#;

const PACKAGE_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Type="http://www.admin-shell.io/aasx/relationships/aasx-origin" Target="/aasx/data.xml" Id="R1"/>
</Relationships>"#;

fn write_fixture(dir: &std::path::Path) -> std::path::PathBuf {
    let path = dir.join("input.aasx");
    let file = fs_err::File::create(&path).expect("create container");
    let mut writer = ZipWriter::new(file);
    let options = SimpleFileOptions::default();
    for (name, content) in [
        ("[Content_Types].xml", CONTENT_TYPES),
        ("_rels/.rels", PACKAGE_RELS),
        (
            "aasx/data.xml",
            r#"<environment xmlns="https://admin-shell.io/aas/3/0"><submodels/></environment>"#,
        ),
    ] {
        writer.start_file(name, options).expect("start entry");
        writer.write_all(content.as_bytes()).expect("write entry");
    }
    writer.finish().expect("finish container");
    path
}

fn write_malformed_fixture(dir: &std::path::Path) -> std::path::PathBuf {
    let path = dir.join("malformed.aasx");
    let file = fs_err::File::create(&path).expect("create container");
    let mut writer = ZipWriter::new(file);
    let options = SimpleFileOptions::default();
    for (name, content) in [
        ("[Content_Types].xml", CONTENT_TYPES),
        ("aasx/data.xml", "<environment><unclosed></environment>"),
    ] {
        writer.start_file(name, options).expect("start entry");
        writer.write_all(content.as_bytes()).expect("write entry");
    }
    writer.finish().expect("finish container");
    path
}

#[test]
fn requires_both_paths_and_a_direction() {
    aasfix().assert().failure();

    let dir = tempfile::tempdir().expect("tempdir");
    let input = write_fixture(dir.path());
    aasfix()
        .arg(&input)
        .arg(dir.path().join("out.aasx"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("--fix"));
}

#[test]
fn rejects_combining_fix_and_unfix() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = write_fixture(dir.path());
    aasfix()
        .arg(&input)
        .arg(dir.path().join("out.aasx"))
        .args(["--fix", "--unfix"])
        .assert()
        .failure();
}

#[test]
fn missing_input_exits_2_without_creating_output() {
    let dir = tempfile::tempdir().expect("tempdir");
    let output = dir.path().join("out.aasx");
    aasfix()
        .arg(dir.path().join("nope.aasx"))
        .arg(&output)
        .arg("--fix")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("does not exist"));
    assert!(!output.exists());
}

#[test]
fn existing_output_is_refused_unchanged() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = write_fixture(dir.path());
    let output = dir.path().join("out.aasx");
    fs_err::write(&output, b"keep me").expect("pre-create output");

    aasfix()
        .arg(&input)
        .arg(&output)
        .arg("--fix")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("will not overwrite"));

    assert_eq!(fs_err::read(&output).expect("read output"), b"keep me");
}

#[test]
fn malformed_xml_part_exits_1_leaving_the_partial_output() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = write_malformed_fixture(dir.path());
    let output = dir.path().join("out.aasx");

    aasfix()
        .arg(&input)
        .arg(&output)
        .arg("--fix")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("error"));

    // The output copy was written before the run aborted; it is not removed.
    assert!(output.exists());
}

#[test]
fn fix_writes_a_repaired_copy() {
    use aasfix_package::{OpcPackage, PackageStore};
    use camino::Utf8PathBuf;

    let dir = tempfile::tempdir().expect("tempdir");
    let input = write_fixture(dir.path());
    let output = dir.path().join("out.aasx");

    aasfix()
        .arg(&input)
        .arg(&output)
        .arg("--fix")
        .assert()
        .success()
        .stdout(predicate::str::contains("corrected"));

    let output = Utf8PathBuf::from_path_buf(output).expect("utf-8 path");
    let pkg = OpcPackage::open(&output).expect("open output");
    assert_eq!(
        pkg.relationships()[0].rel_type,
        "http://admin-shell.io/aasx/relationships/aasx-origin"
    );
    assert_eq!(pkg.relationships()[0].id, "R1");
}

#[test]
fn unfix_round_trips_through_a_fixed_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = write_fixture(dir.path());
    let fixed = dir.path().join("fixed.aasx");
    let unfixed = dir.path().join("unfixed.aasx");

    aasfix().arg(&input).arg(&fixed).arg("--fix").assert().success();
    aasfix().arg(&fixed).arg(&unfixed).arg("--unfix").assert().success();

    use aasfix_package::{OpcPackage, PackageStore};
    use camino::Utf8PathBuf;
    let unfixed = Utf8PathBuf::from_path_buf(unfixed).expect("utf-8 path");
    let pkg = OpcPackage::open(&unfixed).expect("open unfixed");
    assert_eq!(
        pkg.relationships()[0].rel_type,
        "http://www.admin-shell.io/aasx/relationships/aasx-origin"
    );
}
