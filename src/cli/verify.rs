//! Проверка SSH-подключения к GitHub

use crate::error::{KeyManagerError, Result};
use crate::lifecycle;
use crate::ssh::{HomeDir, PlatformPaths};
use crate::validation::validate_host_alias;

use super::{build_context, rule, runtime, Options};

pub fn run(options: &Options, alias: &str) -> Result<()> {
    run_at(&HomeDir::current(), options, alias)
}

fn run_at(paths: &dyn PlatformPaths, options: &Options, alias: &str) -> Result<()> {
    let settings = options.settings();
    validate_host_alias(alias, &settings.provider_host)?;

    let ctx = build_context(paths, settings)?;
    let report = runtime()?.block_on(lifecycle::verify_connection(&ctx, alias))?;

    // Вывод ssh при неудаче уже показан через sink
    if !report.ok {
        return Err(KeyManagerError::tool(
            &ctx.settings().tools.ssh,
            format!("аутентификация на git@{} не подтверждена", alias),
        ));
    }

    println!();
    println!("{}", rule());
    println!("{}", report.output);
    println!("{}", rule());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_alias_leaves_home_untouched() {
        let tmp = tempfile::tempdir().unwrap();

        let result = run_at(&HomeDir::at(tmp.path()), &Options::default(), "github.com");

        assert!(matches!(result, Err(KeyManagerError::Validation(_))));
        assert!(!tmp.path().join(".ssh").exists());
    }
}
