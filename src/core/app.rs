//! Application identity from Cargo.toml.

/// Application name (from Cargo.toml `package.name`).
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Application version (from Cargo.toml `package.version`).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Vendor used for platform directories.
pub const VENDOR: &str = "shopchat";

/// User-Agent header sent with every request.
pub fn user_agent() -> String {
    format!("{}/{}", NAME, VERSION)
}
