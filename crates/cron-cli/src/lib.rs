//! cronctl: argument parsing and command handlers, kept in a library so they can be
//! driven against a mock API in tests.

pub mod cli;
pub mod commands;
