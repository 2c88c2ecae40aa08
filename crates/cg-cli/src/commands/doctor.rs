use std::error::Error;
use std::path::Path;

use cg_core::PipelineConfig;
use clap::Args;
use serde::Serialize;

use super::engine_client;

#[derive(Args, Debug)]
pub struct DoctorArgs {
    /// Print the report as JSON instead of log lines.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: String,
    ok: bool,
    detail: String,
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    status: String,
    checks: Vec<DoctorCheck>,
}

pub fn run(args: &DoctorArgs, config: &PipelineConfig) -> Result<(), Box<dyn Error>> {
    let report = diagnose(config);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for check in &report.checks {
            if check.ok {
                tracing::info!(check = %check.name, "{}", check.detail);
            } else {
                tracing::warn!(check = %check.name, "{}", check.detail);
            }
        }
        tracing::info!(status = %report.status, "doctor finished");
    }
    if report.status != "ok" {
        return Err("one or more checks failed".into());
    }
    Ok(())
}

fn diagnose(config: &PipelineConfig) -> DoctorReport {
    let mut checks = Vec::new();
    match engine_client(config, None) {
        Ok(client) => {
            checks.push(DoctorCheck {
                name: "engine launcher".into(),
                ok: true,
                detail: client.launcher().to_string(),
            });
            checks.push(match client.check_script() {
                Ok(()) => DoctorCheck {
                    name: "engine script".into(),
                    ok: true,
                    detail: client.script().display().to_string(),
                },
                Err(err) => DoctorCheck {
                    name: "engine script".into(),
                    ok: false,
                    detail: err.to_string(),
                },
            });
        }
        Err(err) => checks.push(DoctorCheck {
            name: "engine launcher".into(),
            ok: false,
            detail: err.to_string(),
        }),
    }
    checks.push(check_file(
        "scenario table",
        &config.resolve(&config.generate.input),
    ));
    checks.push(check_output_dir(
        "inbuilt output",
        &config.resolve(&config.generate.output_inbuilt),
    ));
    checks.push(check_output_dir(
        "voice output",
        &config.resolve(&config.generate.output_voice),
    ));

    let status = if checks.iter().all(|check| check.ok) {
        "ok"
    } else {
        "needs-attention"
    };
    DoctorReport {
        status: status.into(),
        checks,
    }
}

fn check_file(name: &str, path: &Path) -> DoctorCheck {
    if path.is_file() {
        DoctorCheck {
            name: name.into(),
            ok: true,
            detail: path.display().to_string(),
        }
    } else {
        DoctorCheck {
            name: name.into(),
            ok: false,
            detail: format!("missing: {}", path.display()),
        }
    }
}

// Output folders are created on demand; only a file squatting on the path is fatal.
fn check_output_dir(name: &str, path: &Path) -> DoctorCheck {
    let (ok, detail) = if path.is_dir() {
        (true, path.display().to_string())
    } else if path.exists() {
        (false, format!("not a directory: {}", path.display()))
    } else {
        (true, format!("will be created: {}", path.display()))
    };
    DoctorCheck {
        name: name.into(),
        ok,
        detail,
    }
}
