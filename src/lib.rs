//! meshctl library - client side of the Meshery command line tool
//!
//! This library provides the core functionality for the `meshctl` CLI tool.

pub mod cli;
pub mod commands;
pub mod config;
pub mod logs;
pub mod version;
