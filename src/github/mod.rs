//! GitHub REST API: registration of SSH public keys

mod client;

pub use client::{GitHubClient, RegisteredKey};
