use anyhow::Result;
use caskup::commands::config::{Config, ConfigOverrides, UpgradeOptions};
use caskup::commands::{list, outdated, upgrade};
use clap::Parser;
use std::path::PathBuf;

/// caskup - keep Homebrew casks up to date
///
/// Compares every installed cask with the version declared in its cask
/// definition, force-installs the outdated ones and removes superseded
/// version directories from the Caskroom.
///
/// Examples:
///   caskup upgrade           # Ask before each upgrade and removal
///   caskup upgrade -y        # Upgrade and prune without asking
///   caskup outdated --json   # Report only
#[derive(Parser, Debug)]
#[command(author, version = env!("CASKUP_VERSION"), about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Caskroom directory (defaults to <prefix>/Caskroom)
    #[arg(long, env = "CASKUP_CASKROOM", value_name = "PATH", global = true)]
    caskroom: Option<PathBuf>,

    /// Directory with cask definitions; repeat to search several, in order
    #[arg(long = "metadata-root", value_name = "PATH", global = true)]
    metadata_roots: Vec<PathBuf>,

    /// Homebrew prefix (defaults to $HOMEBREW_PREFIX or `brew --prefix`)
    #[arg(long, value_name = "PATH", global = true)]
    prefix: Option<PathBuf>,

    /// Homebrew repository (defaults to $HOMEBREW_REPOSITORY or `brew --repository`)
    #[arg(long, value_name = "PATH", global = true)]
    repository: Option<PathBuf>,

    /// Homebrew executable
    #[arg(long, env = "CASKUP_BREW", value_name = "PROGRAM", global = true)]
    brew: Option<String>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Upgrade outdated casks and remove old versions
    Upgrade(UpgradeArgs),

    /// List outdated casks without changing anything
    Outdated(OutdatedArgs),

    /// List installed casks and their versions
    List,
}

#[derive(clap::Args, Debug)]
pub struct UpgradeArgs {
    /// Casks to check (defaults to all installed casks)
    #[arg(value_name = "CASK")]
    pub casks: Vec<String>,

    /// Upgrade and remove old versions without asking
    #[arg(short, long)]
    pub yes: bool,

    /// Only report what would be done
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Keep old versions
    #[arg(long)]
    pub no_prune: bool,
}

#[derive(clap::Args, Debug)]
pub struct OutdatedArgs {
    /// Casks to check (defaults to all installed casks)
    #[arg(value_name = "CASK")]
    pub casks: Vec<String>,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            prefix: self.prefix.clone(),
            repository: self.repository.clone(),
            caskroom: self.caskroom.clone(),
            metadata_roots: self.metadata_roots.clone(),
            brew: self.brew.clone(),
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let runtime = caskup::runtime::RealRuntime;
    let config = Config::resolve(&runtime, cli.overrides())?;

    match cli.command {
        Commands::Upgrade(args) => upgrade(
            runtime,
            config,
            args.casks,
            UpgradeOptions {
                yes: args.yes,
                dry_run: args.dry_run,
                prune: !args.no_prune,
            },
        )?,
        Commands::Outdated(args) => outdated(runtime, config, args.casks, args.json)?,
        Commands::List => list(runtime, config)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_upgrade_parsing() {
        let cli = Cli::try_parse_from(["caskup", "upgrade", "-y", "firefox", "iterm2"]).unwrap();
        match cli.command {
            Commands::Upgrade(args) => {
                assert_eq!(args.casks, vec!["firefox", "iterm2"]);
                assert!(args.yes);
                assert!(!args.dry_run);
                assert!(!args.no_prune);
            }
            _ => panic!("Expected Upgrade command"),
        }
    }

    #[test]
    fn test_cli_dry_run_parsing() {
        let cli = Cli::try_parse_from(["caskup", "upgrade", "-n", "--no-prune"]).unwrap();
        match cli.command {
            Commands::Upgrade(args) => {
                assert!(args.dry_run);
                assert!(args.no_prune);
                assert!(args.casks.is_empty());
            }
            _ => panic!("Expected Upgrade command"),
        }
    }

    #[test]
    fn test_cli_global_paths_parsing() {
        let cli = Cli::try_parse_from([
            "caskup",
            "outdated",
            "--json",
            "--caskroom",
            "/tmp/Caskroom",
            "--metadata-root",
            "/tmp/a",
            "--metadata-root",
            "/tmp/b",
        ])
        .unwrap();

        let overrides = cli.overrides();
        assert_eq!(overrides.caskroom, Some(PathBuf::from("/tmp/Caskroom")));
        assert_eq!(
            overrides.metadata_roots,
            vec![PathBuf::from("/tmp/a"), PathBuf::from("/tmp/b")]
        );
        match cli.command {
            Commands::Outdated(args) => assert!(args.json),
            _ => panic!("Expected Outdated command"),
        }
    }

    #[test]
    fn test_cli_no_subcommand_fails() {
        assert!(Cli::try_parse_from(["caskup"]).is_err());
    }
}
