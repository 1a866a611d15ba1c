use directories::ProjectDirs;
use std::path::PathBuf;

const APP_NAME: &str = "vedaquiz";

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    fn project() -> Option<ProjectDirs> {
        ProjectDirs::from("", "", APP_NAME)
    }

    /// $HOME/.local/state/vedaquiz when HOME is set, else the platform data dir
    pub fn state_dir() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            Some(PathBuf::from(home).join(".local").join("state").join(APP_NAME))
        } else {
            Self::project().map(|pd| pd.data_local_dir().to_path_buf())
        }
    }

    pub fn leaderboard_path() -> PathBuf {
        Self::state_dir()
            .map(|d| d.join("leaderboard.json"))
            .unwrap_or_else(|| PathBuf::from("leaderboard.json"))
    }

    pub fn log_path() -> PathBuf {
        Self::state_dir()
            .map(|d| d.join("vedaquiz.log"))
            .unwrap_or_else(|| PathBuf::from("vedaquiz.log"))
    }

    pub fn config_path() -> PathBuf {
        Self::project()
            .map(|pd| pd.config_dir().join("config.json"))
            .unwrap_or_else(|| PathBuf::from("vedaquiz_config.json"))
    }
}
