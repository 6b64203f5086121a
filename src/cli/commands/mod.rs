//! Command implementations

pub mod classify;
pub mod completions;
pub mod report;
pub mod template;
