//! CLI module for the message board
//!
//! Provides subcommands:
//! - `serve`: run the HTTP API
//! - `migrate`: apply or revert PostgreSQL schema migrations

pub mod migrate;
pub mod serve;

use clap::{Parser, Subcommand};

/// Message Board - credential store and shared message log
#[derive(Parser)]
#[command(name = "message-board")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP API server
    Serve,

    /// Apply pending PostgreSQL migrations
    Migrate(migrate::MigrateArgs),
}
