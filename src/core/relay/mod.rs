// Core relay module - the per-mention decision flow.

pub mod relay_service;

pub use relay_service::*;
