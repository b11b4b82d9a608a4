// src/commands/mod.rs
pub mod check;
pub mod common;
pub mod resolve;
pub mod version;
