// src/inspect/mod.rs
// =============================================================================
// This module drives a run over a folder tree.
//
// Submodules:
// - walker: finds files and inspects them concurrently
// - file: checks one file and emits its findings
// - session: the shared report sink plus de-duplication
// =============================================================================

mod file;
mod session;
mod walker;

pub use session::InspectionSession;
pub use walker::{inspect_tree, TreeReport};
