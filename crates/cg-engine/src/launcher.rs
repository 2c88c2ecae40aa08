//! Discovery of the runtime that executes the pricing engine script.

use std::env;
use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};

use cg_core::errors::{CgError, ErrorInfo};

use crate::codes;

/// Where a [`Launcher`] was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LauncherSource {
    /// Taken verbatim from configuration.
    Configured,
    /// Found on `PATH` under the given executable name.
    Path(&'static str),
    /// Found at a well-known installation path.
    WellKnown,
}

/// Program plus leading arguments; the engine script and request file follow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Launcher {
    /// Executable to spawn.
    pub program: PathBuf,
    /// Arguments placed before the engine script.
    pub prefix: Vec<String>,
    /// How the launcher was located.
    pub source: LauncherSource,
}

impl Launcher {
    /// Full argument vector for one invocation, rendered for logs and errors.
    pub fn command_line(&self, script: &Path, input: &Path) -> String {
        let mut parts = vec![self.program.display().to_string()];
        parts.extend(self.prefix.iter().cloned());
        parts.push(script.display().to_string());
        parts.push(input.display().to_string());
        parts.join(" ")
    }
}

impl fmt::Display for Launcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.prefix {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// PATH candidates in search order, with the prefix each one needs.
const PATH_CANDIDATES: [(&str, &[&str]); 3] = [
    ("npx", &["tsx"]),
    ("npx.cmd", &["tsx"]),
    ("npm.cmd", &["exec", "tsx"]),
];

/// Locates the engine launcher using the process `PATH`.
///
/// Search order: configured argv, `npx`, `npx.cmd`, `npm.cmd exec`, then
/// well-known Windows install locations. The first hit wins.
pub fn locate_launcher(configured: &[String]) -> Result<Launcher, CgError> {
    locate_launcher_in(configured, env::var_os("PATH"))
}

/// Same as [`locate_launcher`] with an explicit `PATH` value.
pub fn locate_launcher_in(
    configured: &[String],
    path_var: Option<OsString>,
) -> Result<Launcher, CgError> {
    if let Some((program, prefix)) = configured.split_first() {
        return Ok(Launcher {
            program: PathBuf::from(program),
            prefix: prefix.to_vec(),
            source: LauncherSource::Configured,
        });
    }

    let search_dirs: Vec<PathBuf> = path_var
        .map(|value| env::split_paths(&value).collect())
        .unwrap_or_default();
    for (name, prefix) in PATH_CANDIDATES {
        if let Some(program) = find_in_dirs(name, &search_dirs) {
            return Ok(Launcher {
                program,
                prefix: prefix.iter().map(|arg| arg.to_string()).collect(),
                source: LauncherSource::Path(name),
            });
        }
    }

    if let Some(program) = well_known_paths().into_iter().find(|path| path.is_file()) {
        return Ok(Launcher {
            program,
            prefix: vec!["tsx".to_string()],
            source: LauncherSource::WellKnown,
        });
    }

    Err(CgError::Config(
        ErrorInfo::new(codes::ENGINE_NOT_FOUND, "npx not found")
            .with_context(
                "searched",
                PATH_CANDIDATES
                    .iter()
                    .map(|(name, _)| *name)
                    .collect::<Vec<_>>()
                    .join(", "),
            )
            .with_hint(
                "install Node.js from https://nodejs.org/ and add it to PATH, \
                 or set engine.launcher in the configuration",
            ),
    ))
}

fn find_in_dirs(name: &str, dirs: &[PathBuf]) -> Option<PathBuf> {
    dirs.iter()
        .map(|dir| dir.join(name))
        .find(|candidate| is_executable(candidate))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    path.metadata()
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

#[cfg(windows)]
fn well_known_paths() -> Vec<PathBuf> {
    let under = |var: &str, tail: &[&str]| {
        env::var_os(var).map(|root| tail.iter().fold(PathBuf::from(root), |acc, part| acc.join(part)))
    };
    [
        under("ProgramFiles", &["nodejs", "npx.cmd"]),
        under("ProgramFiles(x86)", &["nodejs", "npx.cmd"]),
        under(
            "LOCALAPPDATA",
            &["Programs", "Microsoft VS Code", "bin", "npx.cmd"],
        ),
    ]
    .into_iter()
    .flatten()
    .collect()
}

#[cfg(not(windows))]
fn well_known_paths() -> Vec<PathBuf> {
    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_launcher_wins() {
        let launcher = locate_launcher_in(
            &["node".to_string(), "--import".to_string(), "tsx".to_string()],
            None,
        )
        .expect("configured launcher");
        assert_eq!(launcher.program, PathBuf::from("node"));
        assert_eq!(launcher.prefix, vec!["--import", "tsx"]);
        assert_eq!(launcher.source, LauncherSource::Configured);
        assert_eq!(launcher.to_string(), "node --import tsx");
    }

    #[cfg(not(windows))]
    #[test]
    fn empty_path_reports_engine_not_found() {
        let err = locate_launcher_in(&[], Some(OsString::new())).expect_err("no launcher");
        assert_eq!(err.code(), codes::ENGINE_NOT_FOUND);
        assert!(err.is_fatal());
        assert!(err.info().hint.is_some());
    }

    #[test]
    fn command_line_lists_script_then_input() {
        let launcher = Launcher {
            program: PathBuf::from("npx"),
            prefix: vec!["tsx".to_string()],
            source: LauncherSource::Path("npx"),
        };
        assert_eq!(
            launcher.command_line(Path::new("scripts/calc.ts"), Path::new("/tmp/req.json")),
            "npx tsx scripts/calc.ts /tmp/req.json"
        );
    }
}
