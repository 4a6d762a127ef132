// tests/config_env.rs
//
// AppConfig::load: file lookup order and credential resolution from the process env.
// Every test mutates env/CWD, so all of them run serially.

use legal_ai_news::config::AiProviderKind;
use legal_ai_news::error::PipelineError;
use legal_ai_news::{AppConfig, ErrorPolicy};
use std::{env, fs};

const VARS: [&str; 4] = [
    "CURATOR_CONFIG_PATH",
    "NEWSAPI_KEY",
    "GEMINI_API_KEY",
    "OPENAI_API_KEY",
];

fn clear_env() {
    for v in VARS {
        env::remove_var(v);
    }
}

/// Run `f` with the CWD set to a fresh temp dir so the repo's own config/ is not read.
fn in_temp_cwd<F: FnOnce(&std::path::Path)>(f: F) {
    let old = env::current_dir().unwrap();
    let tmp = tempfile::tempdir().unwrap();
    env::set_current_dir(tmp.path()).unwrap();
    clear_env();
    f(tmp.path());
    clear_env();
    env::set_current_dir(&old).unwrap();
}

#[serial_test::serial]
#[test]
fn defaults_with_keys_from_env() {
    in_temp_cwd(|_| {
        env::set_var("NEWSAPI_KEY", "news-123");
        env::set_var("GEMINI_API_KEY", "gem-456");

        let cfg = AppConfig::load().unwrap();
        assert_eq!(cfg.search_key(), "news-123");
        assert_eq!(cfg.ai_key(), "gem-456");
        assert_eq!(cfg.ai.provider, AiProviderKind::Gemini);
        assert_eq!(cfg.on_error, ErrorPolicy::SkipAndReport);
        assert_eq!(cfg.taxonomy.len(), 6);
    });
}

#[serial_test::serial]
#[test]
fn missing_key_fails_before_anything_else() {
    in_temp_cwd(|_| {
        env::set_var("NEWSAPI_KEY", "news-123");
        let err = AppConfig::load().unwrap_err();
        assert_eq!(
            err,
            PipelineError::Configuration("missing GEMINI_API_KEY env var".into())
        );
    });
}

#[serial_test::serial]
#[test]
fn fallback_toml_then_env_path_wins() {
    in_temp_cwd(|dir| {
        env::set_var("NEWSAPI_KEY", "news-123");
        env::set_var("OPENAI_API_KEY", "oa-789");

        // 1) ./config/curator.toml
        let cfg_dir = dir.join("config");
        fs::create_dir_all(&cfg_dir).unwrap();
        fs::write(
            cfg_dir.join("curator.toml"),
            r#"
on_error = "abort_run"

[ai]
provider = "openai"
api_key = "ENV"
"#,
        )
        .unwrap();
        let cfg = AppConfig::load().unwrap();
        assert_eq!(cfg.on_error, ErrorPolicy::AbortRun);
        assert_eq!(cfg.ai.provider, AiProviderKind::OpenAi);
        assert_eq!(cfg.ai_key(), "oa-789");

        // 2) $CURATOR_CONFIG_PATH takes precedence
        let p_json = dir.join("other.json");
        fs::write(
            &p_json,
            r#"{ "on_error": "skip_silently", "taxonomy": ["IA generativa", "Regulação"], "search": { "api_key": "inline-key" } }"#,
        )
        .unwrap();
        env::set_var("CURATOR_CONFIG_PATH", p_json.display().to_string());
        env::set_var("GEMINI_API_KEY", "gem-456");

        let cfg = AppConfig::load().unwrap();
        assert_eq!(cfg.on_error, ErrorPolicy::SkipSilently);
        assert_eq!(cfg.taxonomy.labels(), ["IA generativa", "Regulação"]);
        assert_eq!(cfg.search_key(), "inline-key");
        assert_eq!(cfg.ai_key(), "gem-456");
    });
}

#[serial_test::serial]
#[test]
fn env_path_to_missing_file_is_an_error() {
    in_temp_cwd(|dir| {
        env::set_var("CURATOR_CONFIG_PATH", dir.join("nope.toml").display().to_string());
        let err = AppConfig::load().unwrap_err();
        assert!(matches!(err, PipelineError::Configuration(ref m) if m.contains("non-existent")));
    });
}

#[serial_test::serial]
#[test]
fn secrets_never_show_in_debug() {
    in_temp_cwd(|_| {
        env::set_var("NEWSAPI_KEY", "news-secret-value");
        env::set_var("GEMINI_API_KEY", "gem-secret-value");
        let cfg = AppConfig::load().unwrap();
        let dbg = format!("{cfg:?}");
        assert!(!dbg.contains("news-secret-value"));
        assert!(!dbg.contains("gem-secret-value"));
        assert!(dbg.contains("<redacted>"));
    });
}
