use std::path::{Path, PathBuf};

use cg_core::{load_config, PipelineConfig};

#[test]
fn defaults_match_batch_constants() {
    let config = PipelineConfig::default();
    assert_eq!(config.budget.monthly_budget_inr, 100_000.0);
    assert_eq!(config.budget.api_allocation_percent, 60.0);
    assert_eq!(config.budget.hosting_allocation_percent, 40.0);
    assert_eq!(config.prune.column, "Total Cost (INR)");
    assert_eq!(config.prune.registry, PathBuf::from("processed_files.json"));
    assert!(config.engine.launcher.is_empty());
}

#[test]
fn partial_file_keeps_defaults_and_resolves_paths() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let path = dir.path().join("costgrid.yaml");
    std::fs::write(
        &path,
        "budget:\n  monthly_budget_inr: 250000\ngenerate:\n  input: data/software numbers.csv\nengine:\n  launcher: [\"node\", \"--import\", \"tsx\"]\n",
    )
    .expect("write config");

    let config = load_config(&path).expect("load config");
    assert_eq!(config.budget.monthly_budget_inr, 250_000.0);
    assert_eq!(config.budget.api_allocation_percent, 60.0);
    assert_eq!(config.engine.launcher, vec!["node", "--import", "tsx"]);
    assert_eq!(
        config.resolve(&config.generate.input),
        dir.path().join("data/software numbers.csv")
    );
    assert_eq!(
        config.resolve(Path::new("/abs/out")),
        PathBuf::from("/abs/out")
    );
}

#[test]
fn missing_file_is_a_configuration_error() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let err = load_config(dir.path().join("absent.yaml")).expect_err("missing config");
    assert!(err.is_fatal());
    assert_eq!(err.code(), "config.read");
}

#[test]
fn malformed_yaml_is_a_configuration_error() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let path = dir.path().join("broken.yaml");
    std::fs::write(&path, "budget: [unclosed").expect("write config");
    let err = load_config(&path).expect_err("malformed config");
    assert!(err.is_fatal());
    assert_eq!(err.code(), "yaml_deserialize");
}

#[test]
fn yaml_round_trip_preserves_values() {
    let mut config = PipelineConfig::default();
    config.prune.column = "Hosting Total (INR)".to_string();
    let yaml = config.to_yaml_string().expect("serialize");
    let restored: PipelineConfig = serde_yaml::from_str(&yaml).expect("parse");
    assert_eq!(restored, config);
}
