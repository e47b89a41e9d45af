//! gh-keys - per-account GitHub SSH identities
//!
//! This crate manages one SSH identity per GitHub account:
//! - Generates `id_ed25519_<label>` key pairs with `ssh-keygen`, never overwriting
//! - Adds github.com to `known_hosts` and a `Host <alias>` block to `~/.ssh/config`
//! - Registers public keys through the GitHub REST API
//! - Verifies authentication with `ssh -T`

pub mod cli;
pub mod context;
pub mod error;
pub mod github;
pub mod lifecycle;
pub mod process;
pub mod settings;
pub mod ssh;
pub mod validation;

pub use context::{ConsoleSink, Context, MemorySink, Sink};
pub use error::{KeyManagerError, Result};
pub use settings::Settings;
