//! Генерация SSH-ключа, known_hosts и блока Host в SSH config

use colored::Colorize;

use crate::error::Result;
use crate::lifecycle;
use crate::ssh::{ConfigUpdate, HomeDir, HostKeyStatus, PlatformPaths};
use crate::validation::{validate_host_alias, validate_label};

use super::{build_context, runtime, Options};

pub fn run(options: &Options, label: &str, alias: &str) -> Result<()> {
    run_at(&HomeDir::current(), options, label, alias)
}

fn run_at(paths: &dyn PlatformPaths, options: &Options, label: &str, alias: &str) -> Result<()> {
    let settings = options.settings();
    validate_label(label)?;
    validate_host_alias(alias, &settings.provider_host)?;

    let ctx = build_context(paths, settings)?;
    let host = ctx.settings().provider_host.clone();
    println!("{}", "=== Создание SSH-ключа ===".cyan().bold());
    println!();

    // Существующий ключ не перезаписывается: ошибка уходит в main, код выхода 1
    let report = runtime()?.block_on(lifecycle::create_identity(&ctx, label, alias))?;

    println!();
    println!("{}", "=== Готово ===".green().bold());
    println!();
    println!("  {} SSH-ключ создан", "✓".green());
    match report.config {
        ConfigUpdate::Added => println!("  {} SSH config обновлён", "✓".green()),
        ConfigUpdate::AlreadyPresent => println!("  {} SSH config уже содержал {}", "•".cyan(), alias),
    }
    match report.known_hosts {
        Some(HostKeyStatus::Added) => println!("  {} {} добавлен в known_hosts", "✓".green(), host),
        Some(HostKeyStatus::AlreadyPresent) => {
            println!("  {} {} уже был в known_hosts", "•".cyan(), host)
        }
        None => println!("  {} known_hosts не обновлён", "!".yellow()),
    }
    println!();
    println!("Ключ:           {}", report.key_path.display().to_string().cyan());
    println!("Публичный ключ: {}", report.public_key_path.display().to_string().cyan());
    println!();
    println!(
        "Дальше: {} и {}",
        format!("gh-keys upload --label {} --alias {}", label, alias).cyan(),
        format!("gh-keys test --alias {}", alias).cyan()
    );
    println!(
        "Клонирование: {}",
        format!("git clone git@{}:<owner>/<repo>.git", alias).cyan()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::KeyManagerError;
    use std::fs;

    #[test]
    fn test_invalid_input_leaves_home_untouched() {
        let tmp = tempfile::tempdir().unwrap();
        let paths = HomeDir::at(tmp.path());

        let bad_label = run_at(&paths, &Options::default(), "my key", "github-work");
        let bad_alias = run_at(&paths, &Options::default(), "work", "GitHub.com");

        assert!(matches!(bad_label, Err(KeyManagerError::Validation(_))));
        assert!(matches!(bad_alias, Err(KeyManagerError::Validation(_))));
        assert!(!tmp.path().join(".ssh").exists());
    }

    #[test]
    fn test_existing_key_fails_the_command() {
        let tmp = tempfile::tempdir().unwrap();
        let ssh_dir = tmp.path().join(".ssh");
        fs::create_dir_all(&ssh_dir).unwrap();
        fs::write(ssh_dir.join("id_ed25519_work"), "ORIGINAL").unwrap();

        let err = run_at(&HomeDir::at(tmp.path()), &Options::default(), "work", "github-work")
            .unwrap_err();

        assert!(matches!(err, KeyManagerError::AlreadyExists(_)));
        assert_eq!(fs::read_to_string(ssh_dir.join("id_ed25519_work")).unwrap(), "ORIGINAL");
        assert!(!ssh_dir.join("config").exists());
    }
}
