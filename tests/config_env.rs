// tests/config_env.rs
//
// Config discovery and environment overrides. These tests mutate process-wide
// env vars and the working directory, so they run serially.

use std::{env, fs};

use axum::body::{self, Body};
use axum::http::{Request, StatusCode};
use tower::ServiceExt as _;

use doc_sentiment_analyzer::config::app::{
    ENV_CONFIG_PATH, ENV_JWT_ALGO, ENV_SECRET_KEY, DEV_SECRET,
};
use doc_sentiment_analyzer::config::AppConfig;

fn clear_env() {
    env::remove_var(ENV_CONFIG_PATH);
    env::remove_var(ENV_SECRET_KEY);
    env::remove_var(ENV_JWT_ALGO);
}

#[serial_test::serial]
#[test]
fn default_uses_env_then_fallbacks() {
    // Isolate CWD so the repo's own config/ is not picked up.
    let old = env::current_dir().unwrap();
    let tmp = tempfile::tempdir().unwrap();
    env::set_current_dir(tmp.path()).unwrap();
    clear_env();

    // 1) Nothing on disk → built-in defaults.
    let cfg = AppConfig::load_default().unwrap();
    assert_eq!(cfg.analysis.top_n, 5);
    assert_eq!(cfg.auth.secret_key, DEV_SECRET);

    // 2) ./config/analyzer.toml fallback.
    fs::create_dir_all(tmp.path().join("config")).unwrap();
    fs::write(
        tmp.path().join("config/analyzer.toml"),
        "[analysis]\ntop_n = 9\n",
    )
    .unwrap();
    assert_eq!(AppConfig::load_default().unwrap().analysis.top_n, 9);

    // 3) The env path wins over the fallback.
    let p_env = tmp.path().join("custom.toml");
    fs::write(&p_env, "[analysis]\ntop_n = 2\n").unwrap();
    env::set_var(ENV_CONFIG_PATH, &p_env);
    assert_eq!(AppConfig::load_default().unwrap().analysis.top_n, 2);

    // 4) An env path that does not exist is an error, not a silent fallback.
    env::set_var(ENV_CONFIG_PATH, tmp.path().join("missing.toml"));
    assert!(AppConfig::load_default().is_err());

    // 5) Malformed file is an error too.
    fs::write(&p_env, "[analysis\n").unwrap();
    env::set_var(ENV_CONFIG_PATH, &p_env);
    assert!(AppConfig::load_default().is_err());

    clear_env();
    env::set_current_dir(old).unwrap();
}

#[serial_test::serial]
#[test]
fn secret_and_algorithm_come_from_env() {
    clear_env();
    let mut cfg = AppConfig::default();

    env::set_var(ENV_SECRET_KEY, "s3cret");
    cfg.apply_env().unwrap();
    assert_eq!(cfg.auth.secret_key, "s3cret");

    env::set_var(ENV_JWT_ALGO, "hs256");
    assert!(cfg.apply_env().is_ok());

    env::set_var(ENV_JWT_ALGO, "RS256");
    assert!(cfg.apply_env().is_err());

    env::remove_var(ENV_JWT_ALGO);
    env::set_var(ENV_SECRET_KEY, "   ");
    cfg.apply_env().unwrap();
    assert_eq!(cfg.auth.secret_key, DEV_SECRET);

    clear_env();
}

#[serial_test::serial]
#[tokio::test]
async fn app_builds_from_env_config() {
    clear_env();
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path().display().to_string().replace('\\', "/");
    let cfg_path = tmp.path().join("analyzer.toml");
    fs::write(
        &cfg_path,
        format!(
            "[storage]\n\
             users_file = \"{root}/users.json\"\n\
             history_file = \"{root}/history.json\"\n\
             upload_dir = \"{root}/uploads\"\n"
        ),
    )
    .unwrap();
    env::set_var(ENV_CONFIG_PATH, &cfg_path);
    env::set_var(ENV_SECRET_KEY, "integration-secret");

    let app = doc_sentiment_analyzer::app()
        .await
        .expect("app() should build Router in tests");

    let resp = app
        .clone()
        .oneshot(
            Request::post("/auth/register")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"email":"ann@example.com","password":"pw"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = body::to_bytes(resp.into_body(), 1_048_576).await.unwrap();
    let v: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(v["name"], "ann");

    // Registration is persisted to the configured users file.
    let users = fs::read_to_string(tmp.path().join("users.json")).unwrap();
    assert!(users.contains("ann@example.com"));

    clear_env();
}
