//! Tests for `assetsync plan`.

use predicates::prelude::*;

use super::common::TestEnv;

#[test]
fn plan_lists_files_without_fetching() {
  let env = TestEnv::new("");
  env.put_remote("assets/a.js", "a");
  env.put_remote("assets/b.js", "b");
  env.put_local("assets/a.js", "a");

  env
    .cmd()
    .arg("plan")
    .assert()
    .success()
    .stdout(predicate::str::contains("assets/b.js"))
    .stdout(predicate::str::contains("would fetch 1 of 2 files"));

  assert!(!env.public_path().join("assets/b.js").exists());
}

#[test]
fn plan_json_marks_existing_files() {
  let env = TestEnv::new("");
  env.put_remote("assets/a.js", "a");
  env.put_local("assets/a.js", "a");

  env
    .cmd()
    .args(["plan", "asset_files", "--output", "json"])
    .assert()
    .success()
    .stdout(predicate::str::contains("\"exists\": true"))
    .stdout(predicate::str::contains("\"skip_if_exists\": true"));
}

#[test]
fn plan_rejects_unknown_target() {
  let env = TestEnv::new("");

  env
    .cmd()
    .args(["plan", "nope"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("unknown target specified: nope"));
}
