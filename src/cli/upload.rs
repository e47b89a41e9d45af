//! Загрузка публичного ключа в GitHub

use colored::Colorize;

use crate::error::Result;
use crate::github::GitHubClient;
use crate::lifecycle;
use crate::ssh::HomeDir;
use crate::validation::{validate_host_alias, validate_label};

use super::{build_context, prompt_token, runtime, Options};

pub fn run(options: &Options, label: &str, alias: &str) -> Result<()> {
    // Проверить ввод до запроса токена
    let settings = options.settings();
    validate_label(label)?;
    validate_host_alias(alias, &settings.provider_host)?;

    let ctx = build_context(&HomeDir::current(), settings)?;
    let client = GitHubClient::new(ctx.settings())?;

    println!("{}", "=== Загрузка ключа в GitHub ===".cyan().bold());
    println!("Нужен токен с правом {}.", "admin:public_key".bold());
    println!();

    let token = prompt_token()?;
    let registered =
        runtime()?.block_on(lifecycle::upload_key(&ctx, &client, token, label, alias))?;

    println!();
    println!("{}", "Ключ успешно загружен!".green().bold());
    println!("  Название: {}", registered.title);
    println!("  ID:       {}", registered.id);

    Ok(())
}
