//! CLI argument definitions using clap
//!
//! Commands:
//! - chirpstore init
//! - chirpstore register <email> <password>
//! - chirpstore login <email> <password> [--expires-in-seconds N]
//! - chirpstore refresh <token>
//! - chirpstore revoke <token>
//! - chirpstore post <body> [--author-id N]
//! - chirpstore posts [--id N | --author N]
//! - chirpstore update-account <token> <email> <password>
//! - chirpstore purge
//!
//! Every command takes `--config <path>` (default `./chirpstore.json`).

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::store::EntityId;

/// chirpstore - posts and accounts in a single JSON document
#[derive(Parser, Debug)]
#[command(name = "chirpstore")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, global = true, default_value = "./chirpstore.json")]
    pub config: PathBuf,

    /// Minimum log severity (trace, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the document file if it does not exist
    Init,

    /// Register a new account
    Register { email: String, password: String },

    /// Log in and print a session token and renewal token
    Login {
        email: String,
        password: String,

        /// Requested session lifetime; capped at the configured default
        #[arg(long)]
        expires_in_seconds: Option<i64>,
    },

    /// Exchange a renewal token for a new session token
    Refresh { token: String },

    /// Revoke a renewal token
    Revoke { token: String },

    /// Create a post
    Post {
        body: String,

        #[arg(long)]
        author_id: Option<EntityId>,
    },

    /// Show one post, or list posts
    Posts {
        #[arg(long, conflicts_with = "author")]
        id: Option<EntityId>,

        /// Only posts by this account
        #[arg(long)]
        author: Option<EntityId>,
    },

    /// Change the email and password of the account owning a session token
    UpdateAccount {
        token: String,
        email: String,
        password: String,
    },

    /// Delete expired renewal tokens
    Purge,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_login() {
        let cli = Cli::try_parse_from([
            "chirpstore",
            "--config",
            "/tmp/c.json",
            "login",
            "a@x.com",
            "pw1",
            "--expires-in-seconds",
            "60",
        ])
        .unwrap();

        assert_eq!(cli.config, PathBuf::from("/tmp/c.json"));
        match cli.command {
            Command::Login {
                email,
                password,
                expires_in_seconds,
            } => {
                assert_eq!(email, "a@x.com");
                assert_eq!(password, "pw1");
                assert_eq!(expires_in_seconds, Some(60));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_default_config_path() {
        let cli = Cli::try_parse_from(["chirpstore", "init"]).unwrap();
        assert_eq!(cli.config, PathBuf::from("./chirpstore.json"));
        assert!(cli.log_level.is_none());
    }

    #[test]
    fn test_kebab_case_subcommand() {
        let cli =
            Cli::try_parse_from(["chirpstore", "update-account", "tok", "b@x.com", "pw2"]).unwrap();
        assert!(matches!(cli.command, Command::UpdateAccount { .. }));
    }

    #[test]
    fn test_posts_id_conflicts_with_author() {
        let result = Cli::try_parse_from(["chirpstore", "posts", "--id", "1", "--author", "2"]);
        assert!(result.is_err());
    }
}
