// AgentView - ui/panels/mod.rs

pub mod live;
pub mod logs;
pub mod query;
pub mod warnings;
