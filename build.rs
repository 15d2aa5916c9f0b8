use std::env;

/// Variables embedded at compile time as defaults for the runtime config.
const EMBEDDED_VARS: &[&str] = &["TALENTSCOUT_MODEL", "TALENTSCOUT_BASE_URL", "TALENTSCOUT_HEALTH_URL"];

fn main() {
    println!("cargo:rerun-if-changed=.env");

    // Load .env file during build for environment variables
    if let Err(e) = dotenvy::dotenv() {
        println!("cargo:warning=BUILD.RS: Failed to load .env file: {}. Using system environment variables.", e);
    }

    for key in EMBEDDED_VARS {
        println!("cargo:rerun-if-env-changed={}", key);
        if let Ok(value) = env::var(key) {
            println!("cargo:rustc-env={}={}", key, value);
            println!("cargo:warning=BUILD.RS: Embedded {} ({})", key, value);
        }
    }
}
