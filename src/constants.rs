//! Process-wide identifying constants.

/// Crate version, or `dev` when built without Cargo metadata.
pub const VERSION: &str = match option_env!("CARGO_PKG_VERSION") {
    Some(version) => version,
    None => "dev",
};

/// Identifying string sent with outgoing requests and logged at startup.
#[must_use]
pub fn user_agent() -> String {
    format!("netcassette/{VERSION}")
}
