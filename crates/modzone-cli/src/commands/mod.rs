//! CLI command handlers

pub mod category;
pub mod config;
pub mod game;
pub mod reset;
pub mod site;
pub mod status;
