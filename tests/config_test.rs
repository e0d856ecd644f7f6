//! Tests for loading a config file and serving resolutions from it.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use mimir::config::{Config, Secrets};
use mimir::{Mimir, ModelCategory, NotFoundReason};

const CONFIG: &str = r#"
[cache]
ttl_secs = 3600
max_entries = 200

[[providers]]
name = "openai"
base_url = "https://api.openai.com/v1"
api_key = "sk-inline"

[[providers.models]]
id = "gpt-x"
category = "chat"

[[providers.models]]
id = "whisper-1"
category = "audio"

[[providers]]
name = "mimir-config-test-keyless"
base_url = "https://keyless.test"

[[providers.models]]
id = "m1"
category = "chat"
"#;

fn write_config(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn load_from_explicit_path() {
    let file = write_config(CONFIG);
    let config = Config::load(Some(file.path())).unwrap();

    assert_eq!(config.providers.len(), 2);
    let cache = config.cache_config();
    assert_eq!(cache.ttl, Duration::from_secs(3600));
    assert_eq!(cache.max_entries, 200);
}

#[test]
fn malformed_config_reports_path() {
    let file = write_config("[cache]\nttl_secs = \"soon\"\n");
    let err = Config::load(Some(file.path())).unwrap_err().to_string();
    assert!(err.contains("Failed to parse config file"));
}

#[test]
fn duplicate_provider_names_rejected() {
    let file = write_config(
        r#"
        [[providers]]
        id = "a"
        name = "dup"
        base_url = "https://a"

        [[providers]]
        id = "b"
        name = "dup"
        base_url = "https://b"
        "#,
    );
    let config = Config::load(Some(file.path())).unwrap();
    assert!(config.build_store(&Secrets::default()).is_err());
}

#[tokio::test]
async fn configured_providers_resolve() {
    let file = write_config(CONFIG);
    let config = Config::load(Some(file.path())).unwrap();
    let store = config.build_store(&Secrets::default()).unwrap();
    let service = Mimir::builder()
        .store(Arc::new(store))
        .cache(config.cache_config())
        .build()
        .unwrap();

    let audio = service
        .resolve("openai", "whisper-1", ModelCategory::Audio)
        .await
        .unwrap();
    assert!(audio.is_found());

    let keyless = service
        .resolve("mimir-config-test-keyless", "m1", ModelCategory::Chat)
        .await
        .unwrap();
    assert_eq!(keyless.reason(), Some(&NotFoundReason::MissingApiKey));
}
