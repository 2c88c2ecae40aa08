//! Pricing engine contract: request and result types, launcher discovery and
//! the subprocess client.

mod client;
mod launcher;
mod request;
mod result;

pub use client::{parse_output, EngineClient, PricingEngine};
pub use launcher::{locate_launcher, locate_launcher_in, Launcher, LauncherSource};
pub use request::{ScenarioRequest, VoiceMode};
pub use result::{AvatarPlan, CostBreakdown, HostingOption, ScenarioResult, VoiceAgent};

/// Error codes reported by this crate.
pub mod codes {
    /// No launcher could be located.
    pub const ENGINE_NOT_FOUND: &str = "engine.not_found";
    /// The configured engine script does not exist.
    pub const ENGINE_SCRIPT_MISSING: &str = "engine.script_missing";
    /// The temporary request file could not be written.
    pub const ENGINE_REQUEST_FILE: &str = "engine.request_file";
    /// The child process could not be started.
    pub const ENGINE_SPAWN: &str = "engine.spawn";
    /// The child process exited unsuccessfully.
    pub const ENGINE_EXIT_STATUS: &str = "engine.exit_status";
    /// Standard output was empty after trimming.
    pub const ENGINE_EMPTY_OUTPUT: &str = "engine.empty_output";
    /// Standard output was not a JSON array of scenarios.
    pub const ENGINE_MALFORMED_OUTPUT: &str = "engine.malformed_output";
}
