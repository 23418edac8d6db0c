use assert_cmd::Command;

pub fn subst_cmd() -> Command {
	let mut cmd = Command::cargo_bin("subst").expect("the `subst` binary should build");
	cmd.env("NO_COLOR", "1");
	cmd
}
