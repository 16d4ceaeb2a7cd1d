mod cli;
mod score;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing_subscriber::EnvFilter;
use tradesim_core::{WorldDefinition, WorldState};

#[derive(Parser, Debug)]
#[command(author, version, about = "貿易関税シミュレーター", long_about = None)]
struct Cli {
    /// Seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// World definition file (YAML or JSON)
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging();

    let definition = load_definition(cli.config.as_deref())?;
    let rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut world = WorldState::from_definition_with_rng(definition, rng)
        .context("世界の初期化に失敗しました")?;

    cli::run(&mut world)
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_definition(explicit: Option<&Path>) -> Result<WorldDefinition> {
    if let Some(path) = explicit {
        return WorldDefinition::load_from_path(path);
    }
    match resolve_config_path()? {
        Some(path) => WorldDefinition::load_from_path(&path),
        None => WorldDefinition::from_embedded(),
    }
}

fn resolve_config_path() -> Result<Option<PathBuf>> {
    let cwd = std::env::current_dir().context("カレントディレクトリの取得に失敗しました")?;
    let candidates = [
        cwd.join("config").join("world.yaml"),
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("config")
            .join("world.yaml"),
    ];

    Ok(candidates.into_iter().find(|path| path.exists()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_and_config_are_parsed() {
        let cli =
            Cli::try_parse_from(["tradesim", "--seed", "42", "--config", "custom.json"]).unwrap();
        assert_eq!(cli.seed, Some(42));
        assert_eq!(cli.config, Some(PathBuf::from("custom.json")));
    }

    #[test]
    fn no_arguments_leave_defaults() {
        let cli = Cli::try_parse_from(["tradesim"]).unwrap();
        assert_eq!(cli.seed, None);
        assert_eq!(cli.config, None);
    }

    #[test]
    fn malformed_arguments_are_rejected() {
        assert!(Cli::try_parse_from(["tradesim", "--seed"]).is_err());
        assert!(Cli::try_parse_from(["tradesim", "--seed", "many"]).is_err());
        assert!(Cli::try_parse_from(["tradesim", "--fast"]).is_err());
    }

    #[test]
    fn command_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn default_definition_resolves_without_arguments() {
        let definition = load_definition(None).unwrap();
        assert_eq!(definition.partners.len(), 4);
    }
}
