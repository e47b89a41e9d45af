//! Local SSH state: key pairs, known_hosts, client config and the
//! connectivity check

pub mod config;
pub mod dir;
pub mod keygen;
pub mod known_hosts;
pub mod perms;
pub mod verify;

pub use config::{ensure_entry, ConfigUpdate};
pub use dir::{resolve_and_prepare, HomeDir, PlatformPaths};
pub use keygen::{generate, read_public_key};
pub use known_hosts::{ensure_host_present, HostKeyStatus};
pub use verify::{test_connection, ConnectionReport};
