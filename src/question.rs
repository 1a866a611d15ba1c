use include_dir::{include_dir, Dir};
use serde::Deserialize;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{QuizError, Result};

static BANK_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/banks");

pub const DEFAULT_BANK: &str = "rig-veda";
pub const OPTIONS_PER_QUESTION: usize = 4;

/// One of the four answer slots of a question
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, strum_macros::Display)]
pub enum AnswerLetter {
    A,
    B,
    C,
    D,
}

impl AnswerLetter {
    pub const ALL: [AnswerLetter; OPTIONS_PER_QUESTION] = [
        AnswerLetter::A,
        AnswerLetter::B,
        AnswerLetter::C,
        AnswerLetter::D,
    ];

    pub fn index(self) -> usize {
        match self {
            AnswerLetter::A => 0,
            AnswerLetter::B => 1,
            AnswerLetter::C => 2,
            AnswerLetter::D => 3,
        }
    }

    pub fn from_index(idx: usize) -> Option<Self> {
        Self::ALL.get(idx).copied()
    }

    /// Case-insensitive; anything outside a..d is rejected
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'A' => Some(AnswerLetter::A),
            'B' => Some(AnswerLetter::B),
            'C' => Some(AnswerLetter::C),
            'D' => Some(AnswerLetter::D),
            _ => None,
        }
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % OPTIONS_PER_QUESTION]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + OPTIONS_PER_QUESTION - 1) % OPTIONS_PER_QUESTION]
    }
}

/// A validated multiple-choice question
#[derive(Debug, Clone, PartialEq)]
pub struct Question {
    pub text: String,
    pub options: [String; OPTIONS_PER_QUESTION],
    pub correct: AnswerLetter,
}

impl Question {
    pub fn option(&self, letter: AnswerLetter) -> &str {
        &self.options[letter.index()]
    }

    /// Options as shown to the player, e.g. "B. Indo-European"
    pub fn labelled_options(&self) -> impl Iterator<Item = (AnswerLetter, String)> + '_ {
        AnswerLetter::ALL
            .iter()
            .map(move |&letter| (letter, format!("{}. {}", letter, self.option(letter))))
    }
}

#[derive(Deserialize)]
struct RawQuestion {
    question: String,
    options: Vec<String>,
    answer: String,
}

impl RawQuestion {
    fn validate(self, index: usize) -> Result<Question> {
        let invalid = |reason: String| QuizError::InvalidQuestionData { index, reason };

        let option_count = self.options.len();
        let options: [String; OPTIONS_PER_QUESTION] = self.options.try_into().map_err(|_| {
            invalid(format!(
                "expected {} options, found {}",
                OPTIONS_PER_QUESTION, option_count
            ))
        })?;

        let correct = match self.answer.as_str() {
            "A" => AnswerLetter::A,
            "B" => AnswerLetter::B,
            "C" => AnswerLetter::C,
            "D" => AnswerLetter::D,
            other => return Err(invalid(format!("answer {:?} is not one of A, B, C, D", other))),
        };

        Ok(Question {
            text: self.question,
            options,
            correct,
        })
    }
}

/// Parse and validate a JSON question bank. Entries are numbered from 1 in errors.
pub fn parse_questions(json: &str) -> Result<Vec<Question>> {
    let raw: Vec<RawQuestion> = serde_json::from_str(json)?;
    raw.into_iter()
        .enumerate()
        .map(|(i, q)| q.validate(i + 1))
        .collect()
}

pub trait QuestionStore {
    fn load(&self) -> Result<Vec<Question>>;
}

/// Question bank read from a JSON file on disk
#[derive(Debug, Clone)]
pub struct FileQuestionStore {
    path: PathBuf,
}

impl FileQuestionStore {
    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

}

impl QuestionStore for FileQuestionStore {
    fn load(&self) -> Result<Vec<Question>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(s) => s,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!(path = %self.path.display(), "question file not found, no questions loaded");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        let questions = parse_questions(&contents)?;
        debug!(path = %self.path.display(), count = questions.len(), "loaded questions");
        Ok(questions)
    }
}

/// Question bank compiled into the binary
#[derive(Debug, Clone)]
pub struct BuiltinQuestionStore {
    name: String,
}

impl BuiltinQuestionStore {
    pub fn named(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if BANK_DIR.get_file(format!("{}.json", name)).is_none() {
            return Err(QuizError::UnknownBank {
                name,
                available: Self::available().join(", "),
            });
        }
        Ok(Self { name })
    }

    /// Names of every embedded bank, sorted
    pub fn available() -> Vec<String> {
        let mut names: Vec<String> = BANK_DIR
            .files()
            .filter_map(|f| f.path().file_stem())
            .filter_map(|s| s.to_str())
            .map(str::to_string)
            .collect();
        names.sort();
        names
    }
}

impl Default for BuiltinQuestionStore {
    fn default() -> Self {
        Self {
            name: DEFAULT_BANK.to_string(),
        }
    }
}

impl QuestionStore for BuiltinQuestionStore {
    fn load(&self) -> Result<Vec<Question>> {
        let contents = BANK_DIR
            .get_file(format!("{}.json", self.name))
            .and_then(|f| f.contents_utf8())
            .ok_or_else(|| QuizError::UnknownBank {
                name: self.name.clone(),
                available: Self::available().join(", "),
            })?;

        parse_questions(contents)
    }
}
