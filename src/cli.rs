use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "hotclaim")]
#[command(version = "0.1.0")]
#[command(about = "Periodic HOT claimer for a NEAR account", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Directory holding default.toml and the per-environment overlays
    #[arg(short, long, default_value = "config")]
    pub config_dir: String,

    /// Log status lines instead of redrawing them in place
    #[arg(long)]
    pub plain: bool,

    /// Claim interval in hours, overrides CLAIM_INTERVAL and the config files
    #[arg(short, long)]
    pub interval: Option<f64>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Claim forever (default)
    Run,
    /// Print the account balance and exit
    Balance,
    /// Submit a single claim and exit
    Claim,
}

impl Cli {
    /// Subcommand to run, `run` when none was given
    pub fn command(&self) -> Commands {
        self.command.unwrap_or(Commands::Run)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_run() {
        let cli = Cli::parse_from(["hotclaim"]);
        assert_eq!(cli.command(), Commands::Run);
        assert_eq!(cli.config_dir, "config");
        assert!(!cli.plain);
        assert!(cli.interval.is_none());
    }

    #[test]
    fn test_flags_and_subcommand() {
        let cli = Cli::parse_from(["hotclaim", "--plain", "--interval", "2.5", "balance"]);
        assert_eq!(cli.command(), Commands::Balance);
        assert!(cli.plain);
        assert_eq!(cli.interval, Some(2.5));
    }
}
