//! Status command integration tests.

use predicates::prelude::*;

use super::common::TestEnv;

#[test]
fn status_reports_stale_lock_without_touching_it() {
  let env = TestEnv::from_fixture("local_dep.toml");
  env.write_file("shared/stagebuild.toml", "[project]\n");

  env
    .stagebuild("status")
    .assert()
    .success()
    .stdout(predicate::str::contains("Project: with-deps"))
    .stdout(predicate::str::contains("shared (path"))
    .stdout(predicate::str::contains("remote (git)"))
    .stderr(predicate::str::contains("Lock manifest is stale"));

  assert!(!env.root().join("_build/.stagebuild.lock").exists());
}

#[test]
fn status_after_compile_is_up_to_date() {
  let env = TestEnv::from_fixture("local_dep.toml");
  env.write_file("shared/stagebuild.toml", "[project]\n");

  env.stagebuild("compile").assert().success();

  env
    .stagebuild("status")
    .assert()
    .success()
    .stdout(predicate::str::contains("Lock manifest is up to date"));
}

#[test]
fn status_json_output() {
  let env = TestEnv::from_fixture("local_dep.toml");
  env.write_file("shared/stagebuild.toml", "[project]\n");

  env
    .stagebuild("status")
    .arg("--format")
    .arg("json")
    .assert()
    .success()
    .stdout(predicate::str::contains(r#""stale": true"#))
    .stdout(predicate::str::contains(r#""kind": "git""#));
}

#[test]
fn status_without_local_dependencies_is_fresh() {
  let env = TestEnv::from_fixture("two_stages.toml");

  env
    .stagebuild("status")
    .assert()
    .success()
    .stdout(predicate::str::contains("Lock manifest not needed"));
}
