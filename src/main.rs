use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use gh_keys::cli::{self, Options};
use gh_keys::Result;

#[derive(Parser)]
#[command(name = "gh-keys")]
#[command(author = "Oleg")]
#[command(version)]
#[command(about = "Управление SSH-ключами для нескольких аккаунтов GitHub", long_about = None)]
struct Cli {
    /// Подробный вывод (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Таймаут внешних утилит в секундах
    #[arg(long, value_name = "SECS", global = true)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Создать SSH-ключ, добавить github.com в known_hosts и блок Host в SSH config
    Generate {
        /// Метка аккаунта (например, personal, work)
        #[arg(short, long)]
        label: String,
        /// Псевдоним хоста (например, github-work)
        #[arg(short, long)]
        alias: String,
    },

    /// Показать публичный SSH-ключ
    Pubkey {
        #[arg(short, long)]
        label: String,
    },

    /// Загрузить публичный ключ в GitHub
    Upload {
        #[arg(short, long)]
        label: String,
        #[arg(short, long)]
        alias: String,
    },

    /// Проверить SSH-подключение (ssh -T git@<alias>)
    Test {
        #[arg(short, long)]
        alias: String,
    },

    /// Показать SSH config
    Config {
        /// Только список псевдонимов хостов
        #[arg(long)]
        aliases: bool,
    },
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "Ошибка:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let options = Options {
        command_timeout: cli.timeout.map(Duration::from_secs),
    };

    match cli.command {
        Commands::Generate { label, alias } => cli::generate::run(&options, label.trim(), alias.trim()),
        Commands::Pubkey { label } => cli::pubkey::run(&options, label.trim()),
        Commands::Upload { label, alias } => cli::upload::run(&options, label.trim(), alias.trim()),
        Commands::Test { alias } => cli::verify::run(&options, alias.trim()),
        Commands::Config { aliases } => cli::config::run(&options, aliases),
    }
}
