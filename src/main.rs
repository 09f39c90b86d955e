use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::debug;
use std::env;
use std::io::{self, Write};
use std::path::PathBuf;

use gulpfiles::{Config, Environment, TaskRegistry};

/// Gulpfiles - Run build tasks configured by gulpfile.yml
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory to run in (defaults to the current directory)
    #[arg(long, global = true, env = "GULPFILES_CWD")]
    cwd: Option<PathBuf>,

    /// Config file to load instead of gulpfile.yml
    #[arg(short, long, global = true, env = "GULPFILES_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one or more tasks in order
    Run {
        /// Names of the tasks to run
        #[arg(required = true)]
        tasks: Vec<String>,
    },

    /// List the available tasks
    List,

    /// Print the loaded configuration
    Config {
        /// Print as JSON instead of YAML
        #[arg(long)]
        json: bool,
    },

    /// Write a starter gulpfile.yml in the current directory
    Init,
}

fn main() {
    env_logger::init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let root_dir = match cli.cwd {
        Some(dir) => dir,
        None => env::current_dir().context("Failed to determine current directory")?,
    };
    let mut env = Environment::new(root_dir);
    if let Some(config_file) = cli.config {
        env = env.with_config_file(config_file);
    }

    debug!("Using config file {}", env.get_config_path().display());

    let registry = TaskRegistry::with_builtin_tasks();

    match cli.command {
        Some(Commands::Init) => {
            env.init()?;
            println!("Created {}", env.get_config_path().display());
            Ok(())
        }
        Some(Commands::List) => {
            list_tasks(&registry);
            Ok(())
        }
        Some(Commands::Config { json }) => {
            let config = env.load_config()?;
            print_config(&config, json)
        }
        Some(Commands::Run { tasks }) => {
            let config = env.load_config()?;
            run_tasks(&registry, &config, &tasks)
        }
        None => {
            let config = env.load_config()?;
            run_tasks(&registry, &config, &["default".to_string()])
        }
    }
}

fn run_tasks(registry: &TaskRegistry, config: &Config, tasks: &[String]) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    for name in tasks {
        registry.run(name, config, &mut out)?;
    }

    out.flush()?;
    Ok(())
}

fn list_tasks(registry: &TaskRegistry) {
    println!("Tasks:");
    for task in registry.tasks() {
        println!("  {:<12} {}", task.name(), task.description());
    }
}

fn print_config(config: &Config, json: bool) -> Result<()> {
    if json {
        let text = config
            .to_json_pretty()
            .context("Failed to render configuration as JSON")?;
        println!("{}", text);
    } else {
        let text = config
            .to_yaml()
            .context("Failed to render configuration as YAML")?;
        print!("{}", text);
    }
    Ok(())
}
