//! CLI module - Command-line interface for Cadre
//!
//! This module provides a structured CLI using clap for argument parsing.

mod commands;

use clap::{Parser, Subcommand};

/// Cadre - HR Management Backend
/// Employees, leave, attendance, expenses, tasks and reviews over one API
#[derive(Parser)]
#[command(name = "cadre")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the API server with the background scheduler (default)
    #[command(alias = "daemon")]
    Serve,

    /// Run one reminder and retention sweep, then exit
    #[command(alias = "check")]
    Sweep,

    /// Create default config file
    Init,

    /// Reset an account's password
    ResetPassword {
        /// Username of the account
        username: String,

        /// New password; a random one is generated and printed when omitted
        #[arg(long)]
        password: Option<String>,
    },
}

pub use commands::*;
