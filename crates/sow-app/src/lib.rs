//! Application service layer - sessions, config, printing, export

pub mod app;
pub mod config;
pub mod constants;
pub mod export;
pub mod print;
pub mod repository;
