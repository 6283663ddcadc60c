//! Domain models, services, and repository traits for Sow Brand tools

pub mod format;
pub mod model;
pub mod repository;
pub mod service;
