//! Task lifecycle and deadline model behind `planpass`, plus its CLI and TUI
//! front-ends.

pub mod commands;
pub mod config;
pub mod deadline;
pub mod error;
pub mod logging;
pub mod models;
pub mod planner;
pub mod repository;
pub mod storage;
pub mod tui;
