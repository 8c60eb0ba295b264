use serde::{Deserialize, Serialize};

/// Per-tick diagnostics. When enabled, every frame carries phase timings and a
/// debug line is logged for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosticsCfg {
    pub enabled: bool,
}

impl Default for DiagnosticsCfg {
    fn default() -> Self {
        DiagnosticsCfg { enabled: true }
    }
}
