//! CLI library components for formgrid.

pub mod export;
pub mod logging;
pub mod render;
