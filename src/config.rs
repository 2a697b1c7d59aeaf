use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

const DEFAULT_LISTEN: &str = "127.0.0.1:42069";
const DEFAULT_UPSTREAM: &str = "http://httpbin.org";
const DEFAULT_VIDEO_PATH: &str = "assets/vim.mp4";
const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: String,
    /// Base URL that `/httpbin/*` requests are relayed to
    pub upstream: String,
    pub video_path: PathBuf,
    pub upstream_timeout: Duration,
}

/// On-disk shape of the optional YAML config file. Every field may be left
/// out.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileConfig {
    listen_addr: Option<String>,
    upstream: Option<String>,
    video_path: Option<PathBuf>,
    upstream_timeout_secs: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: DEFAULT_LISTEN.to_string(),
            upstream: DEFAULT_UPSTREAM.to_string(),
            video_path: PathBuf::from(DEFAULT_VIDEO_PATH),
            upstream_timeout: Duration::from_secs(DEFAULT_UPSTREAM_TIMEOUT_SECS),
        }
    }
}

impl Config {
    /// Loads the config file named by `RAWHTTP_CONFIG` (if set), then applies
    /// `LISTEN`, `UPSTREAM`, `VIDEO_PATH` and `UPSTREAM_TIMEOUT_SECS`
    /// overrides from the environment.
    pub fn load() -> anyhow::Result<Self> {
        let mut cfg = match std::env::var("RAWHTTP_CONFIG") {
            Ok(path) => Self::from_file(&path)?,
            Err(_) => Self::default(),
        };

        if let Ok(addr) = std::env::var("LISTEN") {
            cfg.listen_addr = addr;
        }
        if let Ok(upstream) = std::env::var("UPSTREAM") {
            cfg.upstream = upstream;
        }
        if let Ok(path) = std::env::var("VIDEO_PATH") {
            cfg.video_path = PathBuf::from(path);
        }
        if let Ok(secs) = std::env::var("UPSTREAM_TIMEOUT_SECS") {
            let secs: u64 = secs
                .parse()
                .with_context(|| format!("UPSTREAM_TIMEOUT_SECS is not a number: {secs}"))?;
            cfg.upstream_timeout = Duration::from_secs(secs);
        }

        Ok(cfg)
    }

    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {path}"))?;
        Self::from_yaml(&raw).with_context(|| format!("invalid config file {path}"))
    }

    pub fn from_yaml(raw: &str) -> anyhow::Result<Self> {
        let file: FileConfig = serde_yaml::from_str(raw)?;
        let defaults = Self::default();

        Ok(Self {
            listen_addr: file.listen_addr.unwrap_or(defaults.listen_addr),
            upstream: file.upstream.unwrap_or(defaults.upstream),
            video_path: file.video_path.unwrap_or(defaults.video_path),
            upstream_timeout: file
                .upstream_timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.upstream_timeout),
        })
    }
}
