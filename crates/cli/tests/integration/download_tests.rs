//! Tests for `assetsync download`.

use predicates::prelude::*;

use super::common::TestEnv;

#[test]
fn asset_files_mirror_the_bucket_without_manifest() {
  let env = TestEnv::new("");
  env.put_remote("assets/app-1.js", "app");
  env.put_remote("assets/app-1.js.gz", "gz");
  env.put_remote("assets/app-1.css", "css");

  env
    .cmd()
    .arg("download")
    .assert()
    .success()
    .stderr(predicate::str::contains("Using: Remote Directory Search"))
    .stderr(predicate::str::contains("AssetSync: Done."));

  assert_eq!(env.read_local("assets/app-1.js"), "app");
  assert_eq!(env.read_local("assets/app-1.js.gz"), "gz");
  assert_eq!(env.read_local("assets/app-1.css"), "css");
}

#[test]
fn asset_files_leave_existing_files_alone() {
  let env = TestEnv::new("");
  env.put_remote("assets/app-1.js", "remote");
  env.put_local("assets/app-1.js", "local");

  env
    .cmd()
    .args(["download", "asset_files"])
    .assert()
    .success()
    .stderr(predicate::str::contains("Skipped: assets/app-1.js"));

  assert_eq!(env.read_local("assets/app-1.js"), "local");
}

#[test]
fn asset_files_follow_legacy_manifest() {
  let env = TestEnv::new("manifest: true\n");
  env.put_local("assets/manifest.yml", "application.js: application-1.js\nicons.ttf: icons-2.ttf\n");
  env.put_remote("assets/application-1.js", "app");
  env.put_remote("assets/icons.ttf", "font");
  env.put_remote("assets/icons-2.ttf", "font");
  env.put_remote("assets/stale-0.js", "stale");

  env.cmd().arg("download").assert().success();

  assert!(env.public_path().join("assets/application-1.js").exists());
  assert!(env.public_path().join("assets/icons.ttf").exists());
  assert!(env.public_path().join("assets/icons-2.ttf").exists());
  assert!(!env.public_path().join("assets/stale-0.js").exists());
}

#[test]
fn manifest_is_always_refreshed() {
  let env = TestEnv::new("");
  env.put_remote("app.js", "app");
  env.put_remote("app.js.gz", "gz");
  env.put_remote("manifest-abc123.json", "{\"new\": true}");
  env.put_local("manifest-abc123.json", "{\"old\": true}");

  env.cmd().args(["download", "manifest"]).assert().success();

  assert_eq!(env.read_local("manifest-abc123.json"), "{\"new\": true}");
  assert!(!env.public_path().join("app.js").exists());
}

#[test]
fn manifest_missing_from_bucket_fails() {
  let env = TestEnv::new("");

  env
    .cmd()
    .args(["download", "manifest"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("could not find any manifests"));
}

#[test]
fn unknown_target_fails_without_touching_disk() {
  let env = TestEnv::new("");
  env.put_remote("assets/app.js", "app");

  env
    .cmd()
    .args(["download", "everything"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("unknown target specified: everything"));

  assert!(!env.public_path().exists());
}

#[test]
fn unknown_target_is_rejected_before_config_is_read() {
  let env = TestEnv::new("");
  std::fs::remove_file(env.root().join("config/asset_sync.yml")).unwrap();

  env
    .cmd()
    .args(["download", "everything"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("unknown target specified: everything"))
    .stderr(predicate::str::contains("config file not found").not());
}

#[test]
fn webpacker_targets_use_public_manifest() {
  let env = TestEnv::new("manifest: true\nwebpacker:\n  public_manifest_path: public/packs/manifest.json\n");
  env.put_remote(
    "packs/manifest.json",
    r#"{"application.js": "/packs/js/application-1.js", "entrypoints": {"application": {"js": ["/packs/js/application-1.js"]}}}"#,
  );
  env.put_remote("packs/js/application-1.js", "bundle");
  env.put_remote("packs/js/application-1.js.gz", "bundle-gz");
  env.put_remote("packs/js/unused-2.js", "unused");

  env.cmd().args(["download", "webpacker_manifest"]).assert().success();
  env.cmd().args(["download", "webpacker_asset_files"]).assert().success();

  assert_eq!(env.read_local("packs/js/application-1.js"), "bundle");
  assert_eq!(env.read_local("packs/js/application-1.js.gz"), "bundle-gz");
  assert!(!env.public_path().join("packs/js/unused-2.js").exists());
}

#[test]
fn webpacker_targets_do_nothing_without_bundler() {
  let env = TestEnv::new("");
  env.put_remote("packs/manifest.json", "{}");

  env.cmd().args(["download", "webpacker_manifest"]).assert().success();

  assert!(!env.public_path().join("packs/manifest.json").exists());
}

#[test]
fn json_output_reports_downloads() {
  let env = TestEnv::new("");
  env.put_remote("assets/a.js", "12345");

  env
    .cmd()
    .args(["download", "--output", "json"])
    .assert()
    .success()
    .stdout(predicate::str::contains("\"target\": \"asset_files\""))
    .stdout(predicate::str::contains("\"bytes\": 5"));
}
