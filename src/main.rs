use anyhow::Result;
use clap::Parser;
use pkgdeps::runtime::{RealRuntime, Runtime};
use pkgdeps::{Config, DependencyManager, DependencyRef, ModuleSet, get_dependency_map};
use std::path::PathBuf;
use std::str::FromStr;

/// pkgdeps - package dependency resolver
///
/// Resolve package names to built artifacts and compute per-module
/// dependency maps for rebuild planning.
///
/// Examples:
///   pkgdeps resolve foo grp/bar    # Print the artifact built for each package
///   pkgdeps map                    # Print the dependency map of modules.json
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Repository root holding one directory per package group (also via PKGDEPS_REPO_ROOT)
    #[arg(
        long = "repo-root",
        short = 'r',
        env = "PKGDEPS_REPO_ROOT",
        value_name = "PATH",
        global = true
    )]
    pub repo_root: Option<PathBuf>,

    /// Artifact file suffix, repeatable (defaults to PKGDEPS_SUFFIXES, then .pkg.tar.xz and .pkg.tar.zst)
    #[arg(long = "suffix", value_name = "SUFFIX", global = true)]
    pub suffixes: Vec<String>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Print the built artifact for each package
    Resolve(ResolveArgs),

    /// Print the dependency map of the declared modules as JSON
    Map(MapArgs),
}

#[derive(clap::Args, Debug)]
pub struct ResolveArgs {
    /// Packages to resolve, as "name" or "group/name"
    #[arg(value_name = "REF", required = true, value_parser = DependencyRef::from_str)]
    pub references: Vec<DependencyRef>,
}

#[derive(clap::Args, Debug)]
pub struct MapArgs {
    /// Module declarations file (defaults to <repo-root>/modules.json)
    #[arg(long = "modules", short = 'm', value_name = "FILE")]
    pub modules: Option<PathBuf>,
}

fn resolve<R: Runtime>(runtime: &R, config: &Config, args: ResolveArgs) -> Result<()> {
    let manager = DependencyManager::new(runtime, config);
    for reference in args.references {
        match manager.resolve(&reference)? {
            Some(path) => println!("{}\t{}", reference, path.display()),
            None => println!("{}\t(not built)", reference),
        }
    }
    Ok(())
}

fn map<R: Runtime>(runtime: &R, config: &Config, args: MapArgs) -> Result<()> {
    let path = args.modules.unwrap_or_else(|| config.modules_file());
    let modules = ModuleSet::load(runtime, &path)?;
    let manager = DependencyManager::new(runtime, config);
    let map = get_dependency_map(&manager, &modules);
    println!("{}", serde_json::to_string_pretty(&map)?);
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let runtime = RealRuntime;
    let config = Config::new(&runtime, cli.repo_root, cli.suffixes)?;

    match cli.command {
        Commands::Resolve(args) => resolve(&runtime, &config, args)?,
        Commands::Map(args) => map(&runtime, &config, args)?,
    }
    Ok(())
}
