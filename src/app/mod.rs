// AgentView - app/mod.rs
//
// Application layer: the QueryView, its background workers, and view state.
// Dependencies: core layer.
// Must NOT depend on: ui, platform specifics.

pub mod headless;
pub mod live;
pub mod logs;
pub mod query;
pub mod state;
pub mod view;
