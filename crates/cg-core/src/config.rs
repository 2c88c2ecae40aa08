//! Pipeline configuration loaded from YAML with per-field defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{CgError, ErrorInfo};
use crate::serde::{from_yaml_slice, to_yaml_string};

/// Fixed budget split forwarded to the pricing engine with every request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetSpec {
    /// Monthly budget in INR.
    #[serde(default = "BudgetSpec::default_monthly_budget_inr")]
    pub monthly_budget_inr: f64,
    /// Share of the budget reserved for avatar and voice APIs.
    #[serde(default = "BudgetSpec::default_api_allocation_percent")]
    pub api_allocation_percent: f64,
    /// Share of the budget reserved for hosting.
    #[serde(default = "BudgetSpec::default_hosting_allocation_percent")]
    pub hosting_allocation_percent: f64,
}

impl BudgetSpec {
    fn default_monthly_budget_inr() -> f64 {
        100_000.0
    }
    fn default_api_allocation_percent() -> f64 {
        60.0
    }
    fn default_hosting_allocation_percent() -> f64 {
        40.0
    }
}

impl Default for BudgetSpec {
    fn default() -> Self {
        Self {
            monthly_budget_inr: Self::default_monthly_budget_inr(),
            api_allocation_percent: Self::default_api_allocation_percent(),
            hosting_allocation_percent: Self::default_hosting_allocation_percent(),
        }
    }
}

/// Location of the pricing engine and the runtime that hosts it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineSpec {
    /// Engine entry point passed to the launcher.
    #[serde(default = "EngineSpec::default_script")]
    pub script: PathBuf,
    /// Working directory of the engine process.
    #[serde(default = "EngineSpec::default_working_dir")]
    pub working_dir: PathBuf,
    /// Explicit launcher argv prefix; empty means search the host.
    #[serde(default)]
    pub launcher: Vec<String>,
}

impl EngineSpec {
    fn default_script() -> PathBuf {
        PathBuf::from("scripts/calculate-batch.ts")
    }
    fn default_working_dir() -> PathBuf {
        PathBuf::from(".")
    }
}

impl Default for EngineSpec {
    fn default() -> Self {
        Self {
            script: Self::default_script(),
            working_dir: Self::default_working_dir(),
            launcher: Vec::new(),
        }
    }
}

/// Inputs and outputs of the batch generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateSpec {
    /// Scenario table with `users`, `minutes` and `concurrency` columns.
    #[serde(default = "GenerateSpec::default_input")]
    pub input: PathBuf,
    /// Directory receiving the inbuilt voice spreadsheets.
    #[serde(default = "GenerateSpec::default_output_inbuilt")]
    pub output_inbuilt: PathBuf,
    /// Directory receiving the voice agent spreadsheets.
    #[serde(default = "GenerateSpec::default_output_voice")]
    pub output_voice: PathBuf,
}

impl GenerateSpec {
    fn default_input() -> PathBuf {
        PathBuf::from("scenarios.csv")
    }
    fn default_output_inbuilt() -> PathBuf {
        PathBuf::from("excels_inbuilt")
    }
    fn default_output_voice() -> PathBuf {
        PathBuf::from("excels_voice")
    }
}

impl Default for GenerateSpec {
    fn default() -> Self {
        Self {
            input: Self::default_input(),
            output_inbuilt: Self::default_output_inbuilt(),
            output_voice: Self::default_output_voice(),
        }
    }
}

/// Outlier filter settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PruneSpec {
    /// Folder scanned by default when none is given on the command line.
    #[serde(default)]
    pub folder: Option<PathBuf>,
    /// Column holding the cost compared against the threshold.
    #[serde(default = "PruneSpec::default_column")]
    pub column: String,
    /// JSON file listing the already processed file names.
    #[serde(default = "PruneSpec::default_registry")]
    pub registry: PathBuf,
}

impl PruneSpec {
    fn default_column() -> String {
        "Total Cost (INR)".to_string()
    }
    fn default_registry() -> PathBuf {
        PathBuf::from("processed_files.json")
    }
}

impl Default for PruneSpec {
    fn default() -> Self {
        Self {
            folder: None,
            column: Self::default_column(),
            registry: Self::default_registry(),
        }
    }
}

/// Report merger settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeSpec {
    /// Directory receiving timestamped merged reports.
    #[serde(default = "MergeSpec::default_output_dir")]
    pub output_dir: PathBuf,
}

impl MergeSpec {
    fn default_output_dir() -> PathBuf {
        PathBuf::from(".")
    }
}

impl Default for MergeSpec {
    fn default() -> Self {
        Self {
            output_dir: Self::default_output_dir(),
        }
    }
}

/// Pipeline configuration shared by the three stages.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Budget split sent to the engine.
    #[serde(default)]
    pub budget: BudgetSpec,
    /// Engine location.
    #[serde(default)]
    pub engine: EngineSpec,
    /// Generator paths.
    #[serde(default)]
    pub generate: GenerateSpec,
    /// Outlier filter settings.
    #[serde(default)]
    pub prune: PruneSpec,
    /// Merger settings.
    #[serde(default)]
    pub merge: MergeSpec,
    /// Directory containing the configuration on disk (ignored when serializing).
    #[serde(skip)]
    pub base_dir: PathBuf,
}

impl PipelineConfig {
    /// Resolves a configured path against the configuration directory.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() || self.base_dir.as_os_str().is_empty() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    /// Produces the YAML representation of the configuration.
    pub fn to_yaml_string(&self) -> Result<String, CgError> {
        to_yaml_string(self)
    }
}

/// Loads a configuration file; relative paths inside it are resolved against its directory.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<PipelineConfig, CgError> {
    let config_path = path.as_ref();
    let bytes = fs::read(config_path).map_err(|err| {
        CgError::Config(
            ErrorInfo::new("config.read", err.to_string())
                .with_context("path", config_path.display().to_string()),
        )
    })?;
    let mut config: PipelineConfig = from_yaml_slice(&bytes).map_err(|err| {
        CgError::Config(
            err.info()
                .clone()
                .with_context("path", config_path.display().to_string()),
        )
    })?;
    config.base_dir = config_path
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .to_path_buf();
    Ok(config)
}
