//! Type definitions shared across the workspace

pub mod app;
pub mod chain;
pub mod review;
