// AgentView - platform/mod.rs
//
// Platform abstraction layer: network access, configuration files, and the
// Windows console.
// Dependencies: core (model and backend seam), reqwest, directories, toml.
// Must NOT depend on: app, ui.

pub mod config;
pub mod console;
pub mod http;
