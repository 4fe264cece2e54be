//! Runner configuration read from the environment.
use std::env;
use std::path::PathBuf;

/// Configuration of one headless simulation run.
#[derive(Clone, Debug)]
pub struct CliConfig {
    pub content_dir: PathBuf,
    pub frames: u32,
    /// Seconds simulated per frame.
    pub frame_time: f32,
    pub seed: u64,
    pub log_dir: Option<PathBuf>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            content_dir: PathBuf::from("content"),
            frames: 600,
            frame_time: 1.0 / 30.0,
            seed: 0x5eed,
            log_dir: None,
        }
    }
}

impl CliConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `DROID_SIM_CONTENT` - Content directory (default: `content`)
    /// - `DROID_SIM_FRAMES` - Number of frames to run (default: 600)
    /// - `DROID_SIM_FRAME_TIME` - Seconds per frame (default: 1/30)
    /// - `DROID_SIM_SEED` - Random seed (default: 0x5eed)
    /// - `DROID_SIM_LOG_DIR` - Also write logs to this directory (optional)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(dir) = env::var("DROID_SIM_CONTENT") {
            config.content_dir = PathBuf::from(dir);
        }
        if let Some(frames) = read_env::<u32>("DROID_SIM_FRAMES") {
            config.frames = frames;
        }
        // zero or negative frame lengths would stall every timer
        if let Some(frame_time) = read_env::<f32>("DROID_SIM_FRAME_TIME")
            && frame_time > 0.0
        {
            config.frame_time = frame_time;
        }
        if let Some(seed) = read_env::<u64>("DROID_SIM_SEED") {
            config.seed = seed;
        }
        config.log_dir = env::var("DROID_SIM_LOG_DIR").ok().map(PathBuf::from);

        config
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
