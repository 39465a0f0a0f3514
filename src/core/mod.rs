// AgentView - core/mod.rs
//
// Core layer: data model, backend seam, wire-format parsing, formatting.
// Dependencies: serde, serde_json, chrono, util.
// Must NOT depend on: ui, platform, app, or any network crate directly.

pub mod backend;
pub mod event_stream;
pub mod export;
pub mod format;
pub mod model;
