// Discovery config loading: explicit path, env var, fallbacks, defaults.

use std::{env, fs};

use ats_discovery::config::{DiscoveryConfig, DEFAULT_USER_AGENT, ENV_CONFIG_PATH};

#[test]
fn explicit_toml_path_loads() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("discovery.toml");
    fs::write(
        &path,
        r#"
        queries = ["site:jobs.ashbyhq.com"]
        max_batch = 10
        "#,
    )
    .unwrap();

    let cfg = DiscoveryConfig::load_from(&path).unwrap();
    assert_eq!(cfg.queries, vec!["site:jobs.ashbyhq.com".to_string()]);
    assert_eq!(cfg.max_batch, 10);
    assert_eq!(cfg.user_agent, DEFAULT_USER_AGENT);
}

#[test]
fn explicit_json_path_loads() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("discovery.json");
    fs::write(&path, r#"{"per_query_limit": 3, "export_limit": 7}"#).unwrap();

    let cfg = DiscoveryConfig::load_from(&path).unwrap();
    assert_eq!(cfg.per_query_limit, 3);
    assert_eq!(cfg.export_limit, 7);
}

#[test]
fn missing_file_is_an_error() {
    assert!(DiscoveryConfig::load_from(std::path::Path::new("/nonexistent/discovery.toml")).is_err());
}

#[serial_test::serial]
#[test]
fn default_chain_uses_env_then_fallbacks() {
    // Isolate CWD in a temp dir so a real config/ in the repo does not
    // interfere.
    let old = env::current_dir().unwrap();
    let tmp = tempfile::tempdir().unwrap();
    env::set_current_dir(tmp.path()).unwrap();
    env::remove_var(ENV_CONFIG_PATH);

    // No files anywhere: built-in defaults.
    let cfg = DiscoveryConfig::load_default().unwrap();
    assert_eq!(cfg, DiscoveryConfig::default());
    assert_eq!(cfg.queries.len(), 7);

    // config/discovery.toml fallback.
    fs::create_dir_all(tmp.path().join("config")).unwrap();
    fs::write(
        tmp.path().join("config/discovery.toml"),
        "probe_concurrency = 3\n",
    )
    .unwrap();
    let cfg = DiscoveryConfig::load_default().unwrap();
    assert_eq!(cfg.probe_concurrency, 3);

    // Env var takes precedence over the fallback file.
    let explicit = tmp.path().join("elsewhere.json");
    fs::write(&explicit, r#"{"probe_concurrency": 9}"#).unwrap();
    env::set_var(ENV_CONFIG_PATH, explicit.display().to_string());
    let cfg = DiscoveryConfig::load_default().unwrap();
    assert_eq!(cfg.probe_concurrency, 9);

    // Env pointing nowhere is an error, not a silent fallback.
    env::set_var(ENV_CONFIG_PATH, tmp.path().join("missing.toml"));
    assert!(DiscoveryConfig::load_default().is_err());

    env::remove_var(ENV_CONFIG_PATH);
    env::set_current_dir(&old).unwrap();
}
