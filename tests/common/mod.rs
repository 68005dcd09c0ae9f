//! Shared test utilities

use assert_cmd::Command;

/// The `uniconv` binary with a predictable logging setup.
pub fn uniconv() -> Command {
    let mut cmd = Command::cargo_bin("uniconv").unwrap();
    cmd.env_remove("UNICONV_LOG");
    cmd
}
