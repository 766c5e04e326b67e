use std::fs;
use std::path::Path;
use superthanks::AppCommand;
use superthanks::core::TipStore;
use superthanks::store::disk::FjallStore;
use tracing::info;

mod test_utils {
    use std::path::{Path, PathBuf};

    pub fn write_config(dir: &Path, extra: &str) -> PathBuf {
        let path = dir.join("config.yaml");
        let content = format!(
            r#"
canonical_currency: "TWD"
data_path: "{}"
{extra}
"#,
            dir.join("data").display()
        );
        std::fs::write(&path, content).expect("Failed to write config file");
        path
    }

    pub fn write_capture(dir: &Path, name: &str, json: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, json).expect("Failed to write capture file");
        path
    }
}

const CAPTURE: &str = r#"{
    "video": "https://www.youtube.com/watch?v=vid001&t=10s",
    "title": "Launch stream",
    "channel": "Rustacean TV",
    "fragments": [
        {"text": "US$ 5.00", "author": "@alice", "comment": "great"},
        {"text": "US$3", "author": "@bob"},
        {"text": "¥100", "author": "@carol"},
        {"text": "12345"},
        {"text": "   "}
    ]
}"#;

fn data_dir(dir: &Path) -> std::path::PathBuf {
    dir.join("data").join("store")
}

#[test_log::test(tokio::test)]
async fn test_full_app_flow_with_capture() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config_path = test_utils::write_config(dir.path(), "rates:\n  \"US$\": 32.95\n");
    let capture = test_utils::write_capture(dir.path(), "capture.json", CAPTURE);
    let config = config_path.to_str().unwrap();

    let result = superthanks::run_command(
        AppCommand::Analyze {
            captures: vec![capture],
        },
        Some(config),
    )
    .await;
    assert!(result.is_ok(), "Analyze failed with: {:?}", result.err());

    for command in [
        AppCommand::Stats {
            video: Some("vid001".to_string()),
        },
        AppCommand::Tips {
            video: "https://youtu.be/vid001".to_string(),
        },
        AppCommand::Currencies,
        AppCommand::Videos,
        AppCommand::Rates,
    ] {
        info!(?command, "Running command");
        let result = superthanks::run_command(command, Some(config)).await;
        assert!(result.is_ok(), "Command failed with: {:?}", result.err());
    }

    let store = FjallStore::open(&data_dir(dir.path())).expect("Failed to reopen store");
    let tips = store.tips(Some("vid001")).await.unwrap();
    assert_eq!(tips.len(), 3);
    let total: f64 = tips.iter().map(|t| t.amount_converted).sum();
    assert!((total - 285.6).abs() < 1e-9, "unexpected total {total}");
    assert_eq!(tips[0].commenter_name, "alice");

    let videos = store.videos().await.unwrap();
    assert_eq!(videos.len(), 1);
    assert_eq!(videos[0].video_id, "vid001");
    assert_eq!(videos[0].channel.as_deref(), Some("Rustacean TV"));
}

#[test_log::test(tokio::test)]
async fn test_rescrape_replaces_previous_tips() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config_path = test_utils::write_config(dir.path(), "");
    let config = config_path.to_str().unwrap();

    let first = test_utils::write_capture(dir.path(), "first.json", CAPTURE);
    let second = test_utils::write_capture(
        dir.path(),
        "second.json",
        r#"{"video": "vid001", "fragments": [{"text": "€ 2", "author": "@dan"}]}"#,
    );

    for capture in [first, second] {
        superthanks::run_command(
            AppCommand::Analyze {
                captures: vec![capture],
            },
            Some(config),
        )
        .await
        .expect("Analyze failed");
    }

    let store = FjallStore::open(&data_dir(dir.path())).expect("Failed to reopen store");
    let tips = store.tips(None).await.unwrap();
    assert_eq!(tips.len(), 1);
    assert_eq!(tips[0].currency, "€");
    assert!((tips[0].amount_converted - 71.4).abs() < 1e-9);
}

#[test_log::test(tokio::test)]
async fn test_invalid_config_rate_fails() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config_path = test_utils::write_config(dir.path(), "rates:\n  \"US$\": 0\n");

    let result =
        superthanks::run_command(AppCommand::Rates, Some(config_path.to_str().unwrap())).await;
    assert!(result.is_err());
    assert!(!data_dir(dir.path()).exists());
}

#[test_log::test(tokio::test)]
async fn test_parse_needs_no_config() {
    let missing = Path::new("/definitely/not/a/config.yaml");
    let result = superthanks::run_command(
        AppCommand::Parse {
            text: "AU$50".to_string(),
        },
        missing.to_str(),
    )
    .await;
    assert!(result.is_ok());
    fs::metadata(missing).expect_err("parse must not create a config");
}
