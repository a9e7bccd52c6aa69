//! Configuration command handler.
//!
//! Displays the resolved configuration with the source of every value
//! (default, environment, or configuration file).
//!
//! # Example Output
//!
//! ```json
//! {
//!   "seed": {
//!     "value": null,
//!     "source": "default"
//!   },
//!   "auto_interval_ms": {
//!     "value": 2500,
//!     "source": "default"
//!   },
//!   ...
//! }
//! ```

use crate::config;
use crate::error::CliError;
use std::io::Write;

/// Handle the cfg command.
///
/// # Errors
///
/// Returns `CliError::Config` if configuration loading fails.
/// Returns `CliError::Io` if writing to output stream fails.
pub fn handle_cfg_command(out: &mut dyn Write) -> Result<(), CliError> {
    let resolved = config::load_with_sources()
        .map_err(|e| CliError::Config(format!("Invalid configuration: {}", e)))?;

    let config::ConfigResolved { config, sources } = resolved;
    let display = serde_json::json!({
        "seed": {
            "value": config.seed,
            "source": sources.seed,
        },
        "auto_interval_ms": {
            "value": config.auto_interval_ms,
            "source": sources.auto_interval_ms,
        },
        "strategy": {
            "value": config.strategy,
            "source": sources.strategy,
        }
    });
    let json_str = serde_json::to_string_pretty(&display).map_err(std::io::Error::other)?;
    writeln!(out, "{}", json_str)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: [&str; 4] = [
        "CLOCKPATIENCE_CONFIG",
        "CLOCKPATIENCE_SEED",
        "CLOCKPATIENCE_AUTO_INTERVAL_MS",
        "CLOCKPATIENCE_STRATEGY",
    ];

    #[test]
    #[serial]
    fn test_cfg_displays_json_output() {
        let saved: Vec<(&str, Option<String>)> =
            VARS.iter().map(|&k| (k, std::env::var(k).ok())).collect();
        for key in VARS {
            unsafe { std::env::remove_var(key) };
        }

        let mut out = Vec::new();
        let result = handle_cfg_command(&mut out);

        for (key, value) in saved {
            if let Some(v) = value {
                unsafe { std::env::set_var(key, v) };
            }
        }
        assert!(result.is_ok(), "{:?}", result);

        let output = String::from_utf8(out).unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&output).expect("cfg output should be valid JSON");
        for key in ["seed", "auto_interval_ms", "strategy"] {
            assert!(json[key].get("value").is_some(), "{} value", key);
            assert_eq!(json[key]["source"], "default", "{} source", key);
        }
        assert_eq!(json["auto_interval_ms"]["value"], 2500);
        assert!(output.contains('\n'), "output should be pretty-printed");
    }
}
