//! Integration test for config file loading and hot-reload polling.

use std::fs::{File, FileTimes};
use std::path::PathBuf;
use std::time::{Duration, SystemTime};

use skyline_core::{ConfigWatcher, SkylineConfig, SkylineError};

fn temp_config_path() -> PathBuf {
    let id = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("test_skyline_{id}.toml"))
}

fn write_with_mtime(path: &PathBuf, text: &str, modified: SystemTime) {
    std::fs::write(path, text).unwrap();
    let file = File::options().write(true).open(path).unwrap();
    file.set_times(FileTimes::new().set_modified(modified)).unwrap();
}

#[test]
fn test_defaults_survive_toml_roundtrip() {
    let config = SkylineConfig::default();
    let text = config.to_toml_string().unwrap();
    let parsed = SkylineConfig::from_toml_str(&text).unwrap();
    assert_eq!(parsed, config);
}

#[test]
fn test_load_missing_file() {
    let path = temp_config_path();
    let result = SkylineConfig::load(&path);
    assert!(matches!(result, Err(SkylineError::ConfigIo { .. })));
}

#[test]
fn test_watcher_reloads_on_change() {
    let path = temp_config_path();
    let start = SystemTime::now() - Duration::from_secs(60);
    write_with_mtime(&path, "[city]\nchunk_size = 40.0\n", start);

    let mut watcher = ConfigWatcher::new(&path);
    let first = watcher.load().unwrap();
    assert_eq!(first.city.chunk_size, 40.0);

    // Unchanged file
    assert!(watcher.poll().unwrap().is_none());

    write_with_mtime(&path, "[city]\nchunk_size = 80.0\n", start + Duration::from_secs(10));
    let reloaded = watcher.poll().unwrap().expect("file changed");
    assert_eq!(reloaded.city.chunk_size, 80.0);
    assert!(watcher.poll().unwrap().is_none());

    std::fs::remove_file(&path).ok();
}

#[test]
fn test_watcher_retries_after_bad_edit() {
    let path = temp_config_path();
    let start = SystemTime::now() - Duration::from_secs(60);
    write_with_mtime(&path, "", start);

    let mut watcher = ConfigWatcher::new(&path);
    watcher.load().unwrap();

    write_with_mtime(&path, "[streaming]\nload_distance = -1.0\n", start + Duration::from_secs(5));
    assert!(watcher.poll().is_err());
    // Still considered changed until a valid version loads
    assert!(watcher.poll().is_err());

    write_with_mtime(
        &path,
        "[streaming]\nload_distance = 120.0\n",
        start + Duration::from_secs(10),
    );
    let config = watcher.poll().unwrap().expect("valid edit loads");
    assert_eq!(config.streaming.load_distance, 120.0);

    std::fs::remove_file(&path).ok();
}
