//! Отображение публичного SSH-ключа

use colored::Colorize;

use crate::error::Result;
use crate::lifecycle;
use crate::ssh::{HomeDir, PlatformPaths};
use crate::validation::validate_label;

use super::{build_context, rule, Options};

pub fn run(options: &Options, label: &str) -> Result<()> {
    run_at(&HomeDir::current(), options, label)
}

fn run_at(paths: &dyn PlatformPaths, options: &Options, label: &str) -> Result<()> {
    validate_label(label)?;

    let ctx = build_context(paths, options.settings())?;
    let info = lifecycle::public_key(&ctx, label)?;

    println!();
    println!("{}", format!("Публичный SSH-ключ - {}:", label).cyan().bold());
    println!();
    println!("{}", rule());
    println!("{}", info.key);
    println!("{}", rule());
    println!();
    if let Some(fingerprint) = &info.fingerprint {
        println!("Отпечаток: {}", fingerprint.bold());
    }
    println!("Файл:      {}", info.path.display().to_string().cyan());
    println!();
    println!(
        "Добавьте ключ в {} или выполните {}.",
        "https://github.com/settings/keys".cyan(),
        format!("gh-keys upload --label {}", label).cyan()
    );
    println!();

    Ok(())
}
