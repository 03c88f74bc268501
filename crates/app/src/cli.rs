//! CLI argument parsing for replay.

use std::path::PathBuf;

use clap::Parser;
use url::Url;

/// Replay recorded HTTP fixtures against a running service.
#[derive(Parser, Debug)]
#[command(name = "replay")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Base URL of the service under test
    #[arg(long, env = "REPLAY_BASE_URL")]
    pub base_url: Url,

    /// Directory containing fixture files
    #[arg(long, env = "REPLAY_FIXTURES")]
    pub fixtures: PathBuf,

    /// Rewrite fixtures on mismatch instead of failing
    #[arg(long, env = "REPLAY_UPDATE", default_value_t = false)]
    pub update: bool,

    /// Staging directory for actual images (default: system temp dir)
    #[arg(long, env = "REPLAY_STAGING_DIR")]
    pub staging_dir: Option<PathBuf>,

    /// GraphicsMagick executable used for image comparison
    #[arg(long, env = "REPLAY_GM_BINARY", default_value = "gm")]
    pub gm_binary: PathBuf,

    /// Maximum pixel difference accepted for images
    #[arg(long)]
    pub tolerance: Option<f64>,
}
