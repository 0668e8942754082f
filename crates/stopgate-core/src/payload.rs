//! The JSON payload the orchestrator feeds the hook on stdin.
//!
//! The only field the gate acts on is `stop_hook_active` — the re-entrancy
//! guard that is set when the orchestrator re-invokes the hook as a direct
//! consequence of a prior block. The other fields are part of the hook
//! protocol and are accepted but unused.

use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HookPayload {
    #[serde(default)]
    pub stop_hook_active: bool,

    #[serde(default)]
    pub session_id: Option<String>,

    #[serde(default)]
    pub transcript_path: Option<String>,

    #[serde(default)]
    pub cwd: Option<String>,

    #[serde(default)]
    pub hook_event_name: Option<String>,
}

impl HookPayload {
    /// Parse the stdin payload. Malformed or empty input yields the default
    /// payload — a broken orchestrator must never crash the hook.
    pub fn parse(input: &str) -> Self {
        match serde_json::from_str(input) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::debug!("unparseable hook payload, using defaults: {e}");
                Self::default()
            }
        }
    }
}
