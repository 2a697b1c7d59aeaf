use std::path::PathBuf;
use std::time::Duration;

use rawhttp::config::Config;

#[test]
fn test_config_defaults() {
    let cfg = Config::default();

    assert_eq!(cfg.listen_addr, "127.0.0.1:42069");
    assert_eq!(cfg.upstream, "http://httpbin.org");
    assert_eq!(cfg.video_path, PathBuf::from("assets/vim.mp4"));
    assert_eq!(cfg.upstream_timeout, Duration::from_secs(10));
}

#[test]
fn test_config_from_yaml() {
    let cfg = Config::from_yaml(
        "listen_addr: 0.0.0.0:3000\nupstream: http://localhost:9000\nupstream_timeout_secs: 2\n",
    )
    .unwrap();

    assert_eq!(cfg.listen_addr, "0.0.0.0:3000");
    assert_eq!(cfg.upstream, "http://localhost:9000");
    assert_eq!(cfg.upstream_timeout, Duration::from_secs(2));
    // untouched fields keep their defaults
    assert_eq!(cfg.video_path, PathBuf::from("assets/vim.mp4"));
}

#[test]
fn test_config_from_yaml_rejects_bad_types() {
    assert!(Config::from_yaml("upstream_timeout_secs: soon\n").is_err());
}

#[test]
fn test_config_from_missing_file() {
    assert!(Config::from_file("/definitely/not/here.yaml").is_err());
}

#[test]
fn test_config_env_overrides() {
    // all env mutation lives in this one test so parallel tests never race
    let path = std::env::temp_dir().join(format!("rawhttp-config-{}.yaml", std::process::id()));
    std::fs::write(&path, "listen_addr: 10.0.0.1:1\nvideo_path: /srv/video.mp4\n").unwrap();

    unsafe {
        std::env::set_var("RAWHTTP_CONFIG", &path);
        std::env::set_var("LISTEN", "0.0.0.0:5000");
        std::env::set_var("UPSTREAM_TIMEOUT_SECS", "3");
    }

    let cfg = Config::load().unwrap();
    assert_eq!(cfg.listen_addr, "0.0.0.0:5000");
    assert_eq!(cfg.video_path, PathBuf::from("/srv/video.mp4"));
    assert_eq!(cfg.upstream_timeout, Duration::from_secs(3));

    unsafe {
        std::env::set_var("UPSTREAM_TIMEOUT_SECS", "later");
    }
    assert!(Config::load().is_err());

    unsafe {
        std::env::remove_var("RAWHTTP_CONFIG");
        std::env::remove_var("LISTEN");
        std::env::remove_var("UPSTREAM_TIMEOUT_SECS");
    }
    let _ = std::fs::remove_file(&path);

    let cfg = Config::load().unwrap();
    assert_eq!(cfg.listen_addr, "127.0.0.1:42069");
}
