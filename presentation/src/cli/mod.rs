//! Command-line interface definition

pub mod commands;
