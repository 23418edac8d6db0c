mod common;

use subst_core::AnyEmptyResult;

#[test]
fn resolves_subst_toml() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("subst.toml"), "TOKEN = \"from-subst-toml\"\n")?;
	std::fs::write(tmp.path().join("main.js"), "TOKEN\n")?;

	common::subst_cmd()
		.arg("apply")
		.arg("--stdout")
		.arg("--path")
		.arg(tmp.path())
		.arg(tmp.path().join("main.js"))
		.assert()
		.success()
		.stdout("from-subst-toml\n");

	Ok(())
}

#[test]
fn resolves_dot_subst_toml() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join(".subst.toml"), "TOKEN = \"from-dot-file\"\n")?;
	std::fs::write(tmp.path().join("main.js"), "TOKEN\n")?;

	common::subst_cmd()
		.arg("apply")
		.arg("--stdout")
		.arg("--path")
		.arg(tmp.path())
		.arg(tmp.path().join("main.js"))
		.assert()
		.success()
		.stdout("from-dot-file\n");

	Ok(())
}

#[test]
fn resolves_dot_config_subst_toml() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::create_dir_all(tmp.path().join(".config"))?;
	std::fs::write(
		tmp.path().join(".config/subst.toml"),
		"TOKEN = \"from-config-dir\"\n",
	)?;
	std::fs::write(tmp.path().join("main.js"), "TOKEN\n")?;

	common::subst_cmd()
		.arg("apply")
		.arg("--stdout")
		.arg("--path")
		.arg(tmp.path())
		.arg(tmp.path().join("main.js"))
		.assert()
		.success()
		.stdout("from-config-dir\n");

	Ok(())
}

#[test]
fn prefers_subst_toml_over_other_candidates() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::create_dir_all(tmp.path().join(".config"))?;
	std::fs::write(tmp.path().join("subst.toml"), "TOKEN = \"first\"\n")?;
	std::fs::write(tmp.path().join(".subst.toml"), "TOKEN = \"second\"\n")?;
	std::fs::write(tmp.path().join(".config/subst.toml"), "TOKEN = \"third\"\n")?;
	std::fs::write(tmp.path().join("main.js"), "TOKEN\n")?;

	common::subst_cmd()
		.arg("apply")
		.arg("--stdout")
		.arg("--path")
		.arg(tmp.path())
		.arg(tmp.path().join("main.js"))
		.assert()
		.success()
		.stdout("first\n");

	Ok(())
}

#[test]
fn explicit_config_flag_bypasses_discovery() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("subst.toml"), "TOKEN = \"discovered\"\n")?;
	std::fs::write(tmp.path().join("release.toml"), "TOKEN = \"explicit\"\n")?;
	std::fs::write(tmp.path().join("main.js"), "TOKEN\n")?;

	common::subst_cmd()
		.arg("apply")
		.arg("--stdout")
		.arg("--path")
		.arg(tmp.path())
		.arg("--config")
		.arg(tmp.path().join("release.toml"))
		.arg(tmp.path().join("main.js"))
		.assert()
		.success()
		.stdout("explicit\n");

	Ok(())
}

#[test]
fn invalid_toml_fails_with_config_error() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("subst.toml"), "TOKEN = [not valid\n")?;

	common::subst_cmd()
		.arg("check")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.failure()
		.code(2)
		.stderr(predicates::str::contains("failed to parse config file"));

	Ok(())
}

#[test]
fn structured_replacement_values_are_rejected() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("subst.toml"), "TOKEN = [1, 2, 3]\n")?;

	// The fancy diagnostic handler hard-wraps long messages, so only assert
	// on a short leading fragment.
	common::subst_cmd()
		.arg("check")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.failure()
		.code(2)
		.stderr(predicates::str::contains("must be a"));

	Ok(())
}
