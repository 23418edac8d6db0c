mod common;

use rstest::rstest;
use serde_json::Value;
use subst_core::AnyEmptyResult;

#[test]
fn check_passes_when_no_replacements_are_pending() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("subst.toml"), "TARGET_VERSION = \"1.2.3\"\n")?;
	std::fs::write(tmp.path().join("main.js"), "console.log('1.2.3');\n")?;

	common::subst_cmd()
		.arg("check")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Check passed"));

	Ok(())
}

#[test]
fn check_fails_when_replacements_are_pending() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("subst.toml"), "TARGET_VERSION = \"1.2.3\"\n")?;
	std::fs::write(tmp.path().join("main.js"), "console.log(TARGET_VERSION);\n")?;

	common::subst_cmd()
		.arg("check")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.failure()
		.code(1)
		.stderr(predicates::str::contains("Check failed."))
		.stderr(predicates::str::contains("main.js"))
		.stderr(predicates::str::contains("subst apply"));

	Ok(())
}

#[rstest]
#[case::pending("console.log(TARGET_VERSION);\n", false)]
#[case::clean("console.log('1.2.3');\n", true)]
fn check_json_reports_pending_files(#[case] source: &str, #[case] ok: bool) -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("subst.toml"), "TARGET_VERSION = \"1.2.3\"\n")?;
	std::fs::write(tmp.path().join("main.js"), source)?;

	let output = common::subst_cmd()
		.arg("check")
		.arg("--format")
		.arg("json")
		.arg("--path")
		.arg(tmp.path())
		.output()?;

	assert_eq!(output.status.success(), ok);

	let value: Value = serde_json::from_slice(&output.stdout)?;
	assert_eq!(value["ok"], Value::Bool(ok));
	let pending = value["pending"].as_array().ok_or("pending should be an array")?;
	if ok {
		assert!(pending.is_empty());
	} else {
		assert_eq!(pending, &[Value::String("main.js".into())]);
	}

	Ok(())
}

#[test]
fn check_passes_after_apply() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("subst.toml"), "TARGET_VERSION = \"1.2.3\"\n")?;
	std::fs::write(tmp.path().join("main.js"), "console.log(TARGET_VERSION);\n")?;

	common::subst_cmd()
		.arg("apply")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success();

	common::subst_cmd()
		.arg("check")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Check passed"));

	Ok(())
}

#[test]
fn check_without_config_is_a_noop() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("main.js"), "console.log(TARGET_VERSION);\n")?;

	common::subst_cmd()
		.arg("check")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("nothing to check"));

	Ok(())
}

#[test]
fn check_limits_itself_to_explicit_paths() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("subst.toml"), "TARGET_VERSION = \"1.2.3\"\n")?;
	std::fs::write(tmp.path().join("clean.js"), "console.log('1.2.3');\n")?;
	std::fs::write(tmp.path().join("pending.js"), "console.log(TARGET_VERSION);\n")?;

	common::subst_cmd()
		.arg("check")
		.arg("--path")
		.arg(tmp.path())
		.arg(tmp.path().join("clean.js"))
		.assert()
		.success()
		.stdout(predicates::str::contains("Check passed"));

	Ok(())
}
