//! The hook's wire protocol back to the orchestrator.
//!
//! Allow is silence: no stdout at all. Block is a single JSON line. The
//! process exits 0 either way — a non-zero exit would read as "the hook
//! crashed", not "the hook decided".

use serde::Serialize;

use crate::gate::GateDecision;

#[derive(Debug, Serialize)]
pub struct BlockResponse<'a> {
    pub decision: &'static str,
    pub reason: &'a str,
}

/// Render the decision for stdout. `None` means print nothing.
pub fn render(decision: &GateDecision) -> Option<String> {
    match decision {
        GateDecision::Allow => None,
        GateDecision::Block { reason } => serde_json::to_string(&BlockResponse {
            decision: "block",
            reason,
        })
        .ok(),
    }
}
