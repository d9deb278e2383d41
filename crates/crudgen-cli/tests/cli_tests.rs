//! End-to-end tests for the `crudgen` binary.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const LEGACY_CONTROLLER: &str = r#"package reviews

func TestController_List(t *testing.T) {
	tests := []struct {
		name           string
		mockSetup      func(*MockService)
		expectedStatus int
		expectedBody   map[string]interface{}
	}{
		{
			name: "success",
			mockSetup: func(m *MockService) {
				m.On("List", context.Background()).Return([]*GetReviewDTO{}, nil)
			},
			expectedStatus: http.StatusOK,
			expectedBody:   map[string]interface{}{"message": "Reviews Retrieved Successfully"},
		},
	}

	for _, tt := range tests {
		t.Run(tt.name, func(t *testing.T) {
			assert.Equal(t, tt.expectedBody["message"], responseBody["message"])
		})
	}
}
"#;

/// Command isolated from the caller's environment and config file.
fn crudgen(dir: &Path) -> Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("crudgen");
    let config = dir.join("crudgen-config.toml");
    if !config.exists() {
        fs::write(&config, "").unwrap();
    }
    cmd.current_dir(dir)
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1")
        .arg("--config")
        .arg(&config);
    cmd
}

/// Create the package directory of a backend module.
fn module_dir(dir: &Path, rel: &str) {
    fs::create_dir_all(dir.join(rel)).unwrap();
}

fn seed(dir: &Path, rel: &str, content: &str) {
    let path = dir.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

// ── basics ────────────────────────────────────────────────────────────────────

#[test]
fn help_lists_subcommands() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("crudgen");
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("generate"))
        .stdout(predicate::str::contains("patch"))
        .stdout(predicate::str::contains("show"));
}

#[test]
fn version_flag() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("crudgen");
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn completions_mention_binary() {
    let temp = TempDir::new().unwrap();
    crudgen(temp.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("crudgen"));
}

// ── generate ──────────────────────────────────────────────────────────────────

#[test]
fn generate_one_module() {
    let temp = TempDir::new().unwrap();
    module_dir(temp.path(), "backend/modules/recipes");
    crudgen(temp.path())
        .args(["generate", "--module", "recipes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("created"));

    let dir = temp.path().join("backend/modules/recipes");
    for file in ["repo_test.go", "service_test.go", "controller_test.go"] {
        assert!(dir.join(file).is_file(), "{file} missing");
    }
    let service = fs::read_to_string(dir.join("service_test.go")).unwrap();
    assert!(service.contains("Return([]*GetRecipeDTO{}, nil)"));
}

#[test]
fn generate_never_overwrites() {
    let temp = TempDir::new().unwrap();
    seed(temp.path(), "mods/reviews/service_test.go", "// mine\n");

    crudgen(temp.path())
        .args(["generate", "--modules-root", "mods", "-m", "reviews", "-v"])
        .assert()
        .success()
        .stdout(predicate::str::contains("skipped"));

    assert_eq!(
        fs::read_to_string(temp.path().join("mods/reviews/service_test.go")).unwrap(),
        "// mine\n"
    );
    assert!(temp.path().join("mods/reviews/repo_test.go").is_file());
}

#[test]
fn generate_dry_run_writes_nothing() {
    let temp = TempDir::new().unwrap();
    module_dir(temp.path(), "backend/modules/recipes");
    crudgen(temp.path())
        .args(["generate", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("would create"));
    assert_eq!(
        fs::read_dir(temp.path().join("backend/modules/recipes"))
            .unwrap()
            .count(),
        0
    );
}

#[test]
fn generate_skips_modules_without_a_directory() {
    let temp = TempDir::new().unwrap();
    module_dir(temp.path(), "backend/modules/reviews");
    crudgen(temp.path())
        .args(["generate", "-m", "recipes", "-m", "reviews"])
        .assert()
        .success()
        .stdout(predicate::str::contains("no module directory at backend/modules/recipes"))
        .stdout(predicate::str::contains("modules without a directory: 1"));

    assert!(!temp.path().join("backend/modules/recipes").exists());
    assert!(temp.path().join("backend/modules/reviews/repo_test.go").is_file());
}

#[test]
fn generate_json_report() {
    let temp = TempDir::new().unwrap();
    module_dir(temp.path(), "backend/modules/payments");
    let out = crudgen(temp.path())
        .args(["--output-format", "json", "generate", "-m", "payments"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let report: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(report["summary"]["created"], 3);
    assert_eq!(report["targets"][0]["status"], "created");
    assert_eq!(report["targets"][0]["module"], "payments");
}

#[test]
fn generate_unknown_module_exits_3() {
    let temp = TempDir::new().unwrap();
    crudgen(temp.path())
        .args(["generate", "--module", "warehouses"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Unknown module 'warehouses'"))
        .stderr(predicate::str::contains("reviews"));
    assert!(!temp.path().join("backend").exists());
}

#[test]
fn generate_special_module_exits_2() {
    let temp = TempDir::new().unwrap();
    crudgen(temp.path())
        .args(["generate", "--module", "uploads"])
        .assert()
        .code(2);
}

#[test]
fn generate_from_manifest() {
    let temp = TempDir::new().unwrap();
    seed(
        temp.path(),
        "crudgen.toml",
        "[[modules]]\nname = \"warehouses\"\ndto_prefix = \"Warehouse\"\nrequires = [\"Vendor\"]\n",
    );
    module_dir(temp.path(), "backend/modules/warehouses");

    crudgen(temp.path())
        .args(["generate", "--manifest", "crudgen.toml", "--go-module", "example.com/api"])
        .assert()
        .success();

    let repo =
        fs::read_to_string(temp.path().join("backend/modules/warehouses/repo_test.go")).unwrap();
    assert!(repo.contains("\"example.com/api/ent/enttest\""));
    assert!(repo.contains("vendor, err := client.Vendor.Create()."));
}

#[test]
fn invalid_manifest_exits_4() {
    let temp = TempDir::new().unwrap();
    seed(temp.path(), "crudgen.toml", "[[modules]]\nname = \"Bad Name\"\n");
    crudgen(temp.path())
        .args(["generate", "--manifest", "crudgen.toml"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("crudgen.toml"));
}

// ── patch ─────────────────────────────────────────────────────────────────────

#[test]
fn patch_rewrites_then_is_idempotent() {
    let temp = TempDir::new().unwrap();
    let rel = "backend/modules/reviews/controller_test.go";
    seed(temp.path(), rel, LEGACY_CONTROLLER);

    crudgen(temp.path())
        .args(["patch", rel, "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("patched"));

    let patched = fs::read_to_string(temp.path().join(rel)).unwrap();
    assert!(!patched.contains("expectedBody"));
    assert!(patched.contains("expectedMessage string"));
    assert!(patched.contains("tt.expectedMessage"));
    assert!(patched.contains("mock.Anything"));

    crudgen(temp.path())
        .args(["patch", rel, "--yes"])
        .assert()
        .success();
    assert_eq!(fs::read_to_string(temp.path().join(rel)).unwrap(), patched);
}

#[test]
fn patch_default_list_isolates_missing_files() {
    let temp = TempDir::new().unwrap();
    let rel = "backend/modules/reviews/controller_test.go";
    seed(temp.path(), rel, LEGACY_CONTROLLER);

    // Three of the four built-in targets are missing.
    crudgen(temp.path())
        .args(["patch", "--yes"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("3 of 4 targets failed"));

    assert!(
        !fs::read_to_string(temp.path().join(rel))
            .unwrap()
            .contains("expectedBody")
    );
}

#[test]
fn patch_scan_and_dry_run() {
    let temp = TempDir::new().unwrap();
    let rel = "api/modules/payments/controller_test.go";
    seed(temp.path(), rel, LEGACY_CONTROLLER);

    crudgen(temp.path())
        .args(["patch", "--scan", "api", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("patched"));

    assert_eq!(
        fs::read_to_string(temp.path().join(rel)).unwrap(),
        LEGACY_CONTROLLER
    );
}

#[test]
fn patch_scan_missing_dir_exits_3() {
    let temp = TempDir::new().unwrap();
    crudgen(temp.path())
        .args(["patch", "--scan", "nowhere"])
        .assert()
        .code(3);
}

#[test]
fn patch_unknown_rule_set_exits_3() {
    let temp = TempDir::new().unwrap();
    crudgen(temp.path())
        .args(["patch", "--rules", "nope", "--yes"])
        .assert()
        .code(3);
}

// ── list / show / config ──────────────────────────────────────────────────────

#[test]
fn list_json() {
    let temp = TempDir::new().unwrap();
    let out = crudgen(temp.path())
        .args(["list", "--format", "json", "--all"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let modules: serde_json::Value = serde_json::from_slice(&out).unwrap();
    let names: Vec<_> = modules
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["name"].as_str().unwrap().to_string())
        .collect();
    assert!(names.contains(&"reviews".to_string()));
    assert!(names.contains(&"uploads".to_string()));
}

#[test]
fn list_names_skips_special() {
    let temp = TempDir::new().unwrap();
    crudgen(temp.path())
        .args(["list", "--format", "names"])
        .assert()
        .success()
        .stdout(predicate::str::contains("meal_plans\n"))
        .stdout(predicate::str::contains("uploads").not());
}

#[test]
fn show_renders_without_writing() {
    let temp = TempDir::new().unwrap();
    crudgen(temp.path())
        .args(["show", "reviews", "--kind", "controller"])
        .assert()
        .success()
        .stdout(predicate::str::contains("func TestController_List(t *testing.T) {"))
        .stdout(predicate::str::contains("\"/reviews\""))
        .stdout(predicate::str::contains("expectedBody").not());
    assert!(!temp.path().join("backend").exists());
}

#[test]
fn show_unknown_module_exits_3() {
    let temp = TempDir::new().unwrap();
    crudgen(temp.path())
        .args(["show", "warehouses"])
        .assert()
        .code(3);
}

#[test]
fn config_file_and_env_layers() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("crudgen-config.toml"),
        "[generator]\ngo_module = \"example.com/from-file\"\n",
    )
    .unwrap();

    crudgen(temp.path())
        .args(["config", "get", "generator.go_module"])
        .assert()
        .success()
        .stdout("example.com/from-file\n");

    crudgen(temp.path())
        .env("CRUDGEN_GENERATOR__GO_MODULE", "example.com/from-env")
        .args(["config", "get", "generator.go_module"])
        .assert()
        .success()
        .stdout("example.com/from-env\n");
}

#[test]
fn config_unknown_key_exits_4() {
    let temp = TempDir::new().unwrap();
    crudgen(temp.path())
        .args(["config", "get", "nope.key"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Unknown config key"));
}

#[test]
fn missing_config_file_exits_4() {
    let temp = TempDir::new().unwrap();
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("crudgen");
    cmd.current_dir(temp.path())
        .args(["--config", "missing.toml", "list"])
        .assert()
        .code(4);
}
