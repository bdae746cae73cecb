use std::{env, error::Error};

fn main() -> Result<(), Box<dyn Error>> {
    println!("cargo:rustc-env=BATCHGET_FEATURES={}", feature_string());

    Ok(())
}

/// Comma-separated list of the crate features enabled for this build.
fn feature_string() -> String {
    let mut features = env::vars()
        .filter(|(name, value)| name.starts_with("CARGO_FEATURE_") && value == "1")
        .map(|(name, _)| name["CARGO_FEATURE_".len()..].to_lowercase().replace('_', "-"))
        .collect::<Vec<String>>();

    // Environment iteration order is unspecified.
    features.sort();
    features.join(",")
}
