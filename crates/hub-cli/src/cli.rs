//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Management hub environment loader - map the hub document to and from environment files
#[derive(Parser, Debug)]
#[command(name = "hubenv")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Merge environment files into the document and generate both env files
    ///
    /// Prints a JSON result with `changed`, `hzn_mgmt_hub`,
    /// `administrator_env` and `agent_install`.
    ///
    /// Examples:
    ///   hubenv load --config hub.yaml --env-file mgmt-hub.env
    ///   hubenv load --config hub.yaml --agent-install agent-install.cfg --plain
    Load(LoadArgs),

    /// Check the document without merging anything
    Validate {
        /// Hub document (TOML, JSON or YAML)
        #[arg(short, long, env = "HUBENV_CONFIG")]
        config: PathBuf,
    },

    /// Show where environment keys would be stored
    Classify {
        /// Environment keys, e.g. EXCHANGE_ROOT_PW
        #[arg(required = true)]
        keys: Vec<String>,
    },
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct LoadArgs {
    /// Hub document (TOML, JSON or YAML)
    #[arg(short, long, env = "HUBENV_CONFIG")]
    pub config: PathBuf,

    /// General environment file, merged first
    #[arg(long, env = "HUBENV_ENV_FILE")]
    pub env_file: Option<PathBuf>,

    /// agent-install.cfg, merged after the environment file
    #[arg(long, env = "HUBENV_AGENT_INSTALL")]
    pub agent_install: Option<PathBuf>,

    /// Fail instead of skipping when a source file is missing
    #[arg(long)]
    pub require_sources: bool,

    /// Do not let the process environment shadow source values
    #[arg(long)]
    pub no_process_env: bool,

    /// Write `NAME="value"` lines instead of `export NAME='value'`
    #[arg(long)]
    pub plain: bool,

    /// Fill null secrets with random tokens
    #[arg(long)]
    pub generate_secrets: bool,

    /// Save the resulting document here
    #[arg(long, value_name = "PATH")]
    pub write_document: Option<PathBuf>,

    /// Write the administrator's environment here
    #[arg(long, value_name = "PATH")]
    pub write_admin_env: Option<PathBuf>,

    /// Write agent-install.cfg here
    #[arg(long, value_name = "PATH")]
    pub write_agent_install: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_load_command() {
        let cli = Cli::parse_from([
            "hubenv",
            "load",
            "--config",
            "hub.yaml",
            "--env-file",
            "mgmt-hub.env",
            "--plain",
        ]);
        match cli.command {
            Some(Commands::Load(args)) => {
                assert_eq!(args.config, PathBuf::from("hub.yaml"));
                assert_eq!(args.env_file, Some(PathBuf::from("mgmt-hub.env")));
                assert!(args.plain);
                assert!(!args.generate_secrets);
            }
            other => panic!("expected load command, got {other:?}"),
        }
    }

    #[test]
    fn parse_classify_requires_keys() {
        assert!(Cli::try_parse_from(["hubenv", "classify"]).is_err());
    }

    #[test]
    fn parse_verbose_is_global() {
        let cli = Cli::parse_from(["hubenv", "classify", "HZN_ORG_ID", "-v"]);
        assert!(cli.verbose);
    }
}
