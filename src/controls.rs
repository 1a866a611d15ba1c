use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::question::AnswerLetter;
use crate::session::Phase;

/// What a key press means in the current phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Type(char),
    Erase,
    ConfirmName,
    NextQuestion,
    PrevQuestion,
    Select(AnswerLetter),
    NextOption,
    PrevOption,
    ClearAnswer,
    Submit,
    Restart,
    Quit,
    Ignore,
}

pub fn action_for(phase: Phase, key: &KeyEvent) -> Action {
    // ctrl+c quits from anywhere
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Action::Quit;
    }
    if key.code == KeyCode::Esc {
        return Action::Quit;
    }

    match phase {
        Phase::AwaitingName => match key.code {
            KeyCode::Char(c) => Action::Type(c),
            KeyCode::Backspace => Action::Erase,
            KeyCode::Enter => Action::ConfirmName,
            _ => Action::Ignore,
        },
        Phase::AwaitingResponses => match key.code {
            KeyCode::Up | KeyCode::Char('k') | KeyCode::BackTab => Action::PrevQuestion,
            KeyCode::Down | KeyCode::Char('j') | KeyCode::Tab => Action::NextQuestion,
            KeyCode::Left | KeyCode::Char('h') => Action::PrevOption,
            KeyCode::Right | KeyCode::Char('l') => Action::NextOption,
            KeyCode::Backspace | KeyCode::Delete | KeyCode::Char('x') => Action::ClearAnswer,
            KeyCode::Enter => Action::Submit,
            KeyCode::Char(c) => match AnswerLetter::from_char(c) {
                Some(letter) => Action::Select(letter),
                None => match c {
                    '1'..='4' => c
                        .to_digit(10)
                        .and_then(|d| AnswerLetter::from_index(d as usize - 1))
                        .map_or(Action::Ignore, Action::Select),
                    _ => Action::Ignore,
                },
            },
            _ => Action::Ignore,
        },
        Phase::Submitted => match key.code {
            KeyCode::Char('r') | KeyCode::Char('n') => Action::Restart,
            KeyCode::Char('q') => Action::Quit,
            _ => Action::Ignore,
        },
    }
}
