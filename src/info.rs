//! Runtime information about this build.

use once_cell::sync::Lazy;

/// Gets a human-readable string with the version number of batchget, the
/// features it was compiled with, and the HTTP engine underneath it.
///
/// Printed by `batchget --version` and handy to include in bug reports.
pub fn version() -> &'static str {
    static VERSION_STRING: Lazy<String> = Lazy::new(|| {
        format!(
            "batchget/{} (features:{}) {}",
            env!("CARGO_PKG_VERSION"),
            env!("BATCHGET_FEATURES"),
            isahc::version(),
        )
    });

    &VERSION_STRING
}
