use serde::{Deserialize, Serialize};

/// Per-driver diagnostics switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagnosticsCfg {
    /// Emit a `log::debug!` line per tick.
    pub enabled: bool,
    /// Attach a shared task profiler to every task list.
    pub profile_tasks: bool,
}

impl Default for DiagnosticsCfg {
    fn default() -> Self {
        DiagnosticsCfg {
            enabled: true,
            profile_tasks: false,
        }
    }
}
