//! Stages command integration tests.

use predicates::prelude::*;

use super::common::TestEnv;

#[test]
fn stages_lists_in_configured_order() {
  let env = TestEnv::from_fixture("two_stages.toml");

  env
    .stagebuild("stages")
    .assert()
    .success()
    .stdout(predicate::str::is_match(r"(?s)gen\s+Generate sources.*compile\s+Compile generated sources").unwrap());
}

#[test]
fn stages_json_output() {
  let env = TestEnv::from_fixture("two_stages.toml");

  env
    .stagebuild("stages")
    .arg("--format")
    .arg("json")
    .assert()
    .success()
    .stdout(predicate::str::contains(r#""name": "gen""#))
    .stdout(predicate::str::contains(r#""description": "Compile generated sources""#));
}

#[test]
fn stages_never_runs_anything() {
  let env = TestEnv::from_fixture("failing_stage.toml");

  env.stagebuild("stages").assert().success();

  assert!(env.read_file("out/log.txt").is_none());
  assert!(!env.root().join("_build").exists());
}
