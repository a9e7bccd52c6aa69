use clockpatience_cli::run;

use once_cell::sync::Lazy;
use std::sync::Mutex;

static ENV_GUARD: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

const VARS: [&str; 4] = [
    "CLOCKPATIENCE_CONFIG",
    "CLOCKPATIENCE_SEED",
    "CLOCKPATIENCE_AUTO_INTERVAL_MS",
    "CLOCKPATIENCE_STRATEGY",
];

struct TempEnvVar {
    key: &'static str,
    previous: Option<String>,
}

impl TempEnvVar {
    fn set(key: &'static str, value: &str) -> Self {
        let previous = std::env::var(key).ok();
        unsafe { std::env::set_var(key, value) };
        Self { key, previous }
    }

    fn unset(key: &'static str) -> Self {
        let previous = std::env::var(key).ok();
        unsafe { std::env::remove_var(key) };
        Self { key, previous }
    }
}

impl Drop for TempEnvVar {
    fn drop(&mut self) {
        match &self.previous {
            Some(prev) => unsafe { std::env::set_var(self.key, prev) },
            None => unsafe { std::env::remove_var(self.key) },
        }
    }
}

fn clean_env() -> Vec<TempEnvVar> {
    VARS.iter().map(|&k| TempEnvVar::unset(k)).collect()
}

fn cfg_json() -> (i32, serde_json::Value, String) {
    let mut out: Vec<u8> = Vec::new();
    let mut err: Vec<u8> = Vec::new();
    let code = run(["clockpatience", "cfg"], &mut out, &mut err);
    let json = serde_json::from_slice(&out).unwrap_or(serde_json::Value::Null);
    (code, json, String::from_utf8_lossy(&err).into_owned())
}

#[test]
fn help_lists_expected_commands() {
    let mut out: Vec<u8> = Vec::new();
    let mut err: Vec<u8> = Vec::new();
    let code = run(["clockpatience", "--help"], &mut out, &mut err);
    assert_eq!(code, 0);
    let stdout = String::from_utf8_lossy(&out);
    for cmd in ["play", "deal", "shuffle", "cfg"] {
        assert!(stdout.contains(cmd), "help should list subcommand `{}`", cmd);
    }
}

#[test]
fn unknown_command_prints_usage_and_fails() {
    let mut out: Vec<u8> = Vec::new();
    let mut err: Vec<u8> = Vec::new();
    let code = run(["clockpatience", "solve"], &mut out, &mut err);
    assert_eq!(code, 2);
    let stderr = String::from_utf8_lossy(&err);
    assert!(stderr.contains("Usage: clockpatience"));
    assert!(stderr.contains("shuffle"));
}

#[test]
fn cfg_shows_default_settings() {
    let _env = ENV_GUARD.lock().unwrap();
    let _vars = clean_env();

    let (code, json, _) = cfg_json();
    assert_eq!(code, 0);
    assert_eq!(json["seed"]["value"], serde_json::Value::Null);
    assert_eq!(json["auto_interval_ms"]["value"], 2500);
    assert_eq!(json["strategy"]["value"], "reveal");
    for key in ["seed", "auto_interval_ms", "strategy"] {
        assert_eq!(json[key]["source"], "default");
    }
}

#[test]
fn cfg_env_overrides_file() {
    let _env = ENV_GUARD.lock().unwrap();
    let _vars = clean_env();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("clock.toml");
    std::fs::write(&path, "seed = 11\nauto_interval_ms = 900\nstrategy = \"move\"\n").unwrap();
    let _cfg = TempEnvVar::set("CLOCKPATIENCE_CONFIG", path.to_str().unwrap());
    let _seed = TempEnvVar::set("CLOCKPATIENCE_SEED", "77");

    let (code, json, _) = cfg_json();
    assert_eq!(code, 0);
    assert_eq!(json["seed"]["value"], 77);
    assert_eq!(json["seed"]["source"], "env");
    assert_eq!(json["auto_interval_ms"]["value"], 900);
    assert_eq!(json["auto_interval_ms"]["source"], "file");
    assert_eq!(json["strategy"]["value"], "move");
    assert_eq!(json["strategy"]["source"], "file");
}

#[test]
fn cfg_rejects_invalid_env_values() {
    let _env = ENV_GUARD.lock().unwrap();
    let _vars = clean_env();

    for (key, value) in [
        ("CLOCKPATIENCE_SEED", "not-a-number"),
        ("CLOCKPATIENCE_AUTO_INTERVAL_MS", "0"),
        ("CLOCKPATIENCE_STRATEGY", "cheat"),
    ] {
        let _bad = TempEnvVar::set(key, value);
        let (code, _, stderr) = cfg_json();
        assert_eq!(code, 2, "{}={} should fail", key, value);
        assert!(stderr.contains("Invalid configuration"), "{}", stderr);
    }
}

#[test]
fn deal_is_reproducible_from_seed() {
    let _env = ENV_GUARD.lock().unwrap();
    let _vars = clean_env();

    let mut a: Vec<u8> = Vec::new();
    let mut b: Vec<u8> = Vec::new();
    let mut err: Vec<u8> = Vec::new();
    assert_eq!(run(["clockpatience", "deal", "--seed", "8"], &mut a, &mut err), 0);
    assert_eq!(run(["clockpatience", "deal", "--seed", "8"], &mut b, &mut err), 0);
    assert_eq!(a, b);
    assert!(err.is_empty());
}

#[test]
fn shuffle_prints_full_order() {
    let _env = ENV_GUARD.lock().unwrap();
    let _vars = clean_env();

    let mut out: Vec<u8> = Vec::new();
    let mut err: Vec<u8> = Vec::new();
    assert_eq!(run(["clockpatience", "shuffle", "--seed", "21"], &mut out, &mut err), 0);
    let stdout = String::from_utf8(out).unwrap();
    let order = stdout
        .lines()
        .find_map(|l| l.strip_prefix("Order: "))
        .expect("order line");
    let mut names: Vec<&str> = order.split_whitespace().collect();
    names.sort();
    names.dedup();
    assert_eq!(names.len(), 52);
}

#[test]
fn deal_and_shuffle_use_configured_seed() {
    let _env = ENV_GUARD.lock().unwrap();
    let _vars = clean_env();
    let _seed = TempEnvVar::set("CLOCKPATIENCE_SEED", "64");

    for cmd in ["deal", "shuffle"] {
        let mut out: Vec<u8> = Vec::new();
        let mut err: Vec<u8> = Vec::new();
        assert_eq!(run(["clockpatience", cmd], &mut out, &mut err), 0, "{}", cmd);
        let stdout = String::from_utf8(out).unwrap();
        assert!(stdout.starts_with("Seed: 64\n"), "{}: {}", cmd, stdout);
    }

    // the flag still wins over the environment
    let mut out: Vec<u8> = Vec::new();
    let mut err: Vec<u8> = Vec::new();
    assert_eq!(run(["clockpatience", "deal", "--seed", "5"], &mut out, &mut err), 0);
    assert!(String::from_utf8(out).unwrap().starts_with("Seed: 5\n"));
}

#[test]
fn invalid_config_is_reported_once() {
    let _env = ENV_GUARD.lock().unwrap();
    let _vars = clean_env();
    let _bad = TempEnvVar::set("CLOCKPATIENCE_SEED", "oops");

    let (code, _, stderr) = cfg_json();
    assert_eq!(code, 2);
    assert_eq!(stderr.lines().filter(|l| l.starts_with("Error:")).count(), 1, "{}", stderr);
}
