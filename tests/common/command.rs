use assert_cmd::Command;
use assert_fs::TempDir;
use rstest::fixture;
use std::path::Path;

#[fixture]
pub fn workspace_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

pub fn run_ooxdiff_command(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("ooxdiff").expect("Failed to find ooxdiff binary");
    cmd.envs(vec![("OOXDIFF_NO_PAGER", "1"), ("OOXDIFF_LOG", "off")]);
    cmd.env_remove("OOXDIFF_MAX_LINES");
    cmd.env_remove("OOXDIFF_CONTEXT");
    cmd.current_dir(dir);
    cmd.arg("--color").arg("never");
    for arg in args {
        cmd.arg(arg);
    }
    cmd
}
