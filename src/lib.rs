// Library surface for headless/integration tests and reuse.
// Keep this lean to avoid coupling to bin-only types in main.rs.
pub mod app_dirs;
pub mod config;
pub mod controls;
pub mod error;
pub mod leaderboard;
pub mod logging;
pub mod question;
pub mod runtime;
pub mod scorer;
pub mod session;
pub mod timer;

pub use error::{QuizError, Result};
