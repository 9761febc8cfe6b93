use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

/// Config pointing nowhere, so the user's own config never leaks in.
fn isolated(dir: &TempDir) -> std::path::PathBuf {
    dir.path().join("no-config.toml")
}

#[test]
fn py2xml_from_file_to_stdout() {
    let dir = TempDir::new().unwrap();
    let source = write(&dir, "x.py", "1 + 2\n");

    let mut cmd = cargo_bin_cmd!("regurgitator");
    cmd.arg("py2xml")
        .arg(&source)
        .arg("--config")
        .arg(isolated(&dir));

    cmd.assert().success().stdout(
        "<Module><Expr><BinOp><Num>1</Num><Add> + </Add><Num>2</Num></BinOp></Expr>\n</Module>",
    );
}

#[test]
fn py2xml_from_stdin_without_module() {
    let dir = TempDir::new().unwrap();

    let mut cmd = cargo_bin_cmd!("regurgitator");
    cmd.args(["py2xml", "-", "--no-module", "--config"])
        .arg(isolated(&dir))
        .write_stdin("d = 5");

    cmd.assert().success().stdout(
        r#"<Assign><targets><Name ctx="Store" name="d">d</Name></targets> = <Num>5</Num></Assign>"#,
    );
}

#[test]
fn xml2py_writes_output_file() {
    let dir = TempDir::new().unwrap();
    let markup = write(&dir, "x.xml", "<a>x<b>y</b>z</a>");
    let out = dir.path().join("x.py");

    let mut cmd = cargo_bin_cmd!("regurgitator");
    cmd.arg("xml2py").arg(&markup).arg("-o").arg(&out);

    cmd.assert().success().stdout(predicate::str::is_empty());
    assert_eq!(fs::read_to_string(&out).unwrap(), "xyz");
}

#[test]
fn config_file_sets_separators() {
    let dir = TempDir::new().unwrap();
    let config = write(
        &dir,
        "config.toml",
        "[render]\nmodule_element = false\n\n[separators]\ncomma = \"wrap\"\n",
    );

    let mut cmd = cargo_bin_cmd!("regurgitator");
    cmd.args(["py2xml", "-", "--config"])
        .arg(&config)
        .write_stdin("(1, 2)");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("<comma>, </comma>"))
        .stdout(predicate::str::starts_with("<Expr>"));
}

#[test]
fn bad_config_is_reported() {
    let dir = TempDir::new().unwrap();
    let config = write(&dir, "config.toml", "[separators]\ncomma = \"both\"\n");

    let mut cmd = cargo_bin_cmd!("regurgitator");
    cmd.args(["xml2py", "-", "--config"])
        .arg(&config)
        .write_stdin("<a/>");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse config file"));
}

#[test]
fn check_reports_round_trip() {
    let dir = TempDir::new().unwrap();
    let source = write(&dir, "ok.py", "# comment\nx = (1,\n     2)  \n\n");

    let mut cmd = cargo_bin_cmd!("regurgitator");
    cmd.arg("check").arg(&source).arg("--config").arg(isolated(&dir));

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("ok (29 bytes)"));
}

#[test]
fn syntax_error_fails() {
    let dir = TempDir::new().unwrap();
    let source = write(&dir, "bad.py", "if x:\n    pass\n");

    let mut cmd = cargo_bin_cmd!("regurgitator");
    cmd.arg("check").arg(&source).arg("--config").arg(isolated(&dir));

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Failed to render"))
        .stderr(predicate::str::contains("syntax error at byte 0"));
}

#[test]
fn malformed_markup_fails() {
    let dir = TempDir::new().unwrap();

    let mut cmd = cargo_bin_cmd!("regurgitator");
    cmd.args(["xml2py", "-", "--config"])
        .arg(isolated(&dir))
        .write_stdin("<a><b></a>");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("does not match <b>"));
}
