//! Compile command integration tests.

use predicates::prelude::*;

use super::common::TestEnv;

#[test]
fn compile_runs_stages_then_consolidates() {
  let env = TestEnv::from_fixture("two_stages.toml");

  env
    .stagebuild("compile")
    .assert()
    .success()
    .stdout(predicate::str::contains("gen"))
    .stdout(predicate::str::contains("Compiled fixture"))
    .stdout(predicate::str::contains("Consolidated"));

  assert_eq!(env.read_file("out/log.txt").as_deref(), Some("gencompileconsolidate"));
  assert!(env.root().join("_build/manifests/gen.manifest").exists());
  assert!(env.root().join("_build/manifests/compile.manifest").exists());
}

#[test]
fn second_compile_has_nothing_to_do() {
  let env = TestEnv::from_fixture("two_stages.toml");

  env.stagebuild("compile").assert().success();

  env
    .stagebuild("compile")
    .assert()
    .success()
    .stdout(predicate::str::contains("Nothing to compile"))
    .stdout(predicate::str::contains("up to date"));

  assert_eq!(env.read_file("out/log.txt").as_deref(), Some("gencompileconsolidate"));
}

#[test]
fn changed_source_reruns_stages() {
  let env = TestEnv::from_fixture("two_stages.toml");
  env.stagebuild("compile").assert().success();

  env.backdate("_build/manifests/gen.manifest");
  env.backdate("_build/manifests/compile.manifest");
  env.write_file("schema/types.txt", "v2");

  env
    .stagebuild("compile")
    .assert()
    .success()
    .stdout(predicate::str::contains("Compiled fixture"));

  assert_eq!(
    env.read_file("out/log.txt").as_deref(),
    Some("gencompileconsolidategencompileconsolidate")
  );
}

#[test]
fn force_reruns_unchanged_stages() {
  let env = TestEnv::from_fixture("two_stages.toml");
  env.stagebuild("compile").assert().success();

  env
    .stagebuild("compile")
    .arg("--force")
    .assert()
    .success()
    .stdout(predicate::str::contains("Compiled fixture"));

  assert_eq!(
    env.read_file("out/log.txt").as_deref(),
    Some("gencompileconsolidategencompileconsolidate")
  );
}

#[test]
fn no_consolidate_skips_consolidation() {
  let env = TestEnv::from_fixture("two_stages.toml");

  env
    .stagebuild("compile")
    .arg("--no-consolidate")
    .assert()
    .success()
    .stdout(predicate::str::contains("Consolidated").not());

  assert_eq!(env.read_file("out/log.txt").as_deref(), Some("gencompile"));
}

#[test]
fn failing_stage_stops_the_pipeline() {
  let env = TestEnv::from_fixture("failing_stage.toml");

  env
    .stagebuild("compile")
    .assert()
    .failure()
    .stderr(predicate::str::contains("stage 'broken' failed"))
    .stderr(predicate::str::contains("boom"));

  assert_eq!(env.read_file("out/log.txt").as_deref(), Some("gen"));
}

#[test]
fn unknown_stage_runs_nothing() {
  let env = TestEnv::from_fixture("unknown_stage.toml");

  env
    .stagebuild("compile")
    .assert()
    .failure()
    .stderr(predicate::str::contains("unknown stage 'missing'"));

  assert!(env.read_file("out/log.txt").is_none());
  assert!(!env.root().join("_build").exists());
}

#[test]
fn arguments_and_environment_reach_the_stage() {
  let env = TestEnv::from_fixture("forward_args.toml");

  env
    .stagebuild("compile")
    .arg("--")
    .arg("--fast")
    .arg("--level=2")
    .assert()
    .success();

  assert_eq!(env.read_file("out/env.txt").as_deref(), Some("--fast --level=2|1|hello"));
  assert_eq!(env.read_file("out/argv.txt").as_deref(), Some("--fast\n--level=2\n"));
}

#[test]
fn forwarded_argument_with_spaces_stays_whole() {
  let env = TestEnv::from_fixture("forward_args.toml");

  env
    .stagebuild("compile")
    .arg("--")
    .arg("--title=release build")
    .assert()
    .success();

  assert_eq!(env.read_file("out/argv.txt").as_deref(), Some("--title=release build\n"));
}

#[test]
fn build_path_override_moves_manifests() {
  let env = TestEnv::from_fixture("two_stages.toml");

  env
    .stagebuild("compile")
    .arg("--build-path")
    .arg("custom-build")
    .assert()
    .success();

  assert!(env.root().join("custom-build/manifests/gen.manifest").exists());
  assert!(!env.root().join("_build").exists());
}

#[test]
fn build_path_from_environment() {
  let env = TestEnv::from_fixture("two_stages.toml");

  env
    .stagebuild("compile")
    .env("STAGEBUILD_BUILD_PATH", "env-build")
    .assert()
    .success();

  assert!(env.root().join("env-build/manifests/gen.manifest").exists());
}

#[test]
fn changed_local_dependency_refreshes_lock() {
  let env = TestEnv::from_fixture("local_dep.toml");
  env.write_file("shared/stagebuild.toml", "[project]\n");

  env
    .stagebuild("compile")
    .assert()
    .success()
    .stdout(predicate::str::contains("Nothing to compile"));

  assert!(env.root().join("_build/.stagebuild.lock").exists());
}
