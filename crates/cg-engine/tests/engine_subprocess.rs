#![cfg(unix)]

use std::fs;
use std::path::{Path, PathBuf};

use cg_core::BudgetSpec;
use cg_engine::{codes, locate_launcher_in, EngineClient, PricingEngine, ScenarioRequest, VoiceMode};

fn fake_engine(dir: &Path, body: &str) -> EngineClient {
    let script = dir.join("engine.sh");
    let recorder = format!(
        "#!/bin/sh\nprintf '%s' \"$1\" > \"{dir}/input_path\"\ncp \"$1\" \"{dir}/request.json\"\n{body}\n",
        dir = dir.display(),
        body = body
    );
    fs::write(&script, recorder).expect("write fake engine");
    let launcher = locate_launcher_in(&["sh".to_string()], None).expect("configured launcher");
    EngineClient::new(launcher, script, dir)
}

fn request() -> ScenarioRequest {
    ScenarioRequest::new(&BudgetSpec::default(), 50, 900, 5, VoiceMode::Inbuilt)
}

fn recorded_input_path(dir: &Path) -> PathBuf {
    PathBuf::from(fs::read_to_string(dir.join("input_path")).expect("input path recorded"))
}

#[test]
fn successful_invocation_parses_ranked_results() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let client = fake_engine(
        dir.path(),
        "echo '[{\"score\": 91.4, \"fitsBudget\": true}, {\"score\": 80, \"voiceAgent\": null}]'",
    );
    let results = client.invoke(&request()).expect("invoke");
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].score, Some(91.4));
    assert_eq!(results[0].fits_budget, Some(true));
    assert!(results[1].voice_agent.is_none());

    let sent: serde_json::Value =
        serde_json::from_slice(&fs::read(dir.path().join("request.json")).expect("request copy"))
            .expect("request json");
    assert_eq!(sent["minutesPerMonth"], 900);
    assert_eq!(sent["useVoiceAgent"], false);

    let input_path = recorded_input_path(dir.path());
    assert!(input_path.extension().map(|ext| ext == "json").unwrap_or(false));
    assert!(!input_path.exists(), "request file must be removed");
}

#[test]
fn nonzero_exit_carries_exit_code_and_streams() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let client = fake_engine(dir.path(), "echo partial\necho 'Error: boom' >&2\nexit 3");
    let err = client.invoke(&request()).expect_err("engine failure");
    assert_eq!(err.code(), codes::ENGINE_EXIT_STATUS);
    assert!(!err.is_fatal());
    let context = &err.info().context;
    assert_eq!(context.get("exit_code").map(String::as_str), Some("3"));
    assert_eq!(context.get("stdout").map(String::as_str), Some("partial\n"));
    assert_eq!(context.get("stderr").map(String::as_str), Some("Error: boom\n"));
    assert!(context.get("command").map(|cmd| cmd.starts_with("sh ")).unwrap_or(false));
    assert!(!recorded_input_path(dir.path()).exists());
}

#[test]
fn empty_output_is_reported() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let client = fake_engine(dir.path(), "printf '  \\n'");
    let err = client.invoke(&request()).expect_err("empty output");
    assert_eq!(err.code(), codes::ENGINE_EMPTY_OUTPUT);
    assert!(!recorded_input_path(dir.path()).exists());
}

#[test]
fn malformed_output_is_reported() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let client = fake_engine(dir.path(), "echo 'Combination list follows'");
    let err = client.invoke(&request()).expect_err("malformed output");
    assert_eq!(err.code(), codes::ENGINE_MALFORMED_OUTPUT);
    assert!(!recorded_input_path(dir.path()).exists());
}

#[test]
fn missing_launcher_program_fails_to_spawn() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let launcher = locate_launcher_in(&["/nonexistent/costgrid-launcher".to_string()], None)
        .expect("configured launcher");
    let client = EngineClient::new(launcher, dir.path().join("engine.sh"), dir.path());
    let err = client.invoke(&request()).expect_err("spawn failure");
    assert_eq!(err.code(), codes::ENGINE_SPAWN);
}

#[test]
fn missing_script_is_a_configuration_error() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let launcher = locate_launcher_in(&["sh".to_string()], None).expect("configured launcher");
    let client = EngineClient::new(launcher, dir.path().join("absent.ts"), dir.path());
    let err = client.check_script().expect_err("missing script");
    assert!(err.is_fatal());
    assert_eq!(err.code(), codes::ENGINE_SCRIPT_MISSING);
}

#[test]
fn path_search_finds_executable_npx_with_tsx_prefix() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().expect("tmp dir");
    let npx = dir.path().join("npx");
    fs::write(&npx, "#!/bin/sh\n").expect("write npx");
    let mut perms = fs::metadata(&npx).expect("meta").permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&npx, perms).expect("chmod");

    let launcher =
        locate_launcher_in(&[], Some(dir.path().as_os_str().to_owned())).expect("npx on path");
    assert_eq!(launcher.program, npx);
    assert_eq!(launcher.prefix, vec!["tsx"]);
}

#[test]
fn non_executable_candidates_are_skipped() {
    let dir = tempfile::tempdir().expect("tmp dir");
    fs::write(dir.path().join("npx"), "not executable").expect("write npx");
    let err = locate_launcher_in(&[], Some(dir.path().as_os_str().to_owned()))
        .expect_err("nothing executable");
    assert_eq!(err.code(), codes::ENGINE_NOT_FOUND);
}
