//! Просмотр SSH config

use colored::Colorize;

use crate::error::Result;
use crate::lifecycle;
use crate::ssh::HomeDir;

use super::{build_context, rule, Options};

const EMPTY_PLACEHOLDER: &str = "# SSH config пуст\n# Создайте ключ командой gh-keys generate, чтобы добавить записи";

pub fn run(options: &Options, aliases_only: bool) -> Result<()> {
    let ctx = build_context(&HomeDir::current(), options.settings())?;

    if aliases_only {
        let aliases = lifecycle::configured_aliases(&ctx)?;
        if aliases.is_empty() {
            println!("Псевдонимы хостов не настроены.");
        }
        for alias in aliases {
            println!("{}", alias);
        }
        return Ok(());
    }

    let content = lifecycle::read_config(&ctx)?;

    println!("{}", "=== SSH config ===".cyan().bold());
    println!("{}", ctx.config_path().display().to_string().dimmed());
    println!("{}", rule());
    if content.trim().is_empty() {
        println!("{}", EMPTY_PLACEHOLDER.dimmed());
    } else {
        print!("{}", content);
        if !content.ends_with('\n') {
            println!();
        }
    }
    println!("{}", rule());
    println!("{} байт", content.len());

    Ok(())
}
