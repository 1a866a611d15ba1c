use std::time::SystemTime;

use ratatui::Frame;
use vedaquiz::session::Phase;

use crate::{
    ui::{render_name_entry, render_questions, render_results},
    App,
};

/// A UI Screen boundary: responsible for rendering one session phase
pub trait Screen {
    fn render(&self, app: &App, f: &mut Frame);
}

/// Name prompt shown before the questions
pub struct NameScreen;

impl Screen for NameScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        render_name_entry(app, f.area(), f.buffer_mut());
    }
}

/// Answering screen, with the countdown when the session is timed
pub struct QuestionsScreen;

impl Screen for QuestionsScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        render_questions(app, f.area(), f.buffer_mut(), SystemTime::now());
    }
}

/// Score breakdown and leaderboard. Only reads the stored outcome.
pub struct ResultsScreen;

impl Screen for ResultsScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        render_results(app, f.area(), f.buffer_mut());
    }
}

/// Helper to construct the appropriate screen for the current phase
pub fn current_screen(phase: Phase) -> Box<dyn Screen> {
    match phase {
        Phase::AwaitingName => Box::new(NameScreen),
        Phase::AwaitingResponses => Box::new(QuestionsScreen),
        Phase::Submitted => Box::new(ResultsScreen),
    }
}
