use std::collections::BTreeMap;

use crate::question::{AnswerLetter, Question};

pub const CORRECT_POINTS: f64 = 2.0;
pub const WRONG_PENALTY: f64 = 0.66;

/// The player's picks, keyed by 1-based question number
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Responses {
    picks: BTreeMap<usize, AnswerLetter>,
}

impl Responses {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set or change the pick for a question
    pub fn select(&mut self, number: usize, letter: AnswerLetter) {
        self.picks.insert(number, letter);
    }

    pub fn clear(&mut self, number: usize) -> Option<AnswerLetter> {
        self.picks.remove(&number)
    }

    pub fn get(&self, number: usize) -> Option<AnswerLetter> {
        self.picks.get(&number).copied()
    }

    pub fn answered(&self) -> usize {
        self.picks.len()
    }
}

impl FromIterator<(usize, AnswerLetter)> for Responses {
    fn from_iter<I: IntoIterator<Item = (usize, AnswerLetter)>>(iter: I) -> Self {
        Self {
            picks: iter.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Correct,
    Wrong,
    Unanswered,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuestionResult {
    pub number: usize,
    pub status: Status,
    pub correct: AnswerLetter,
    pub selected: Option<AnswerLetter>,
}

impl QuestionResult {
    pub fn points(&self) -> f64 {
        match self.status {
            Status::Correct => CORRECT_POINTS,
            Status::Wrong => -WRONG_PENALTY,
            Status::Unanswered => 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreResult {
    pub total: f64,
    pub max: f64,
    pub per_question: Vec<QuestionResult>,
}

impl ScoreResult {
    pub fn count(&self, status: Status) -> usize {
        self.per_question
            .iter()
            .filter(|r| r.status == status)
            .count()
    }

    /// "2.68/10" style summary; the denominator is always 2 per question
    pub fn display(&self) -> String {
        format!("{}/{}", format_points(self.total), format_points(self.max))
    }
}

pub fn score(questions: &[Question], responses: &Responses) -> ScoreResult {
    let mut total = 0.0;
    let per_question = questions
        .iter()
        .enumerate()
        .map(|(i, q)| {
            let number = i + 1;
            let selected = responses.get(number);
            let status = match selected {
                Some(letter) if letter == q.correct => Status::Correct,
                Some(_) => Status::Wrong,
                None => Status::Unanswered,
            };
            let result = QuestionResult {
                number,
                status,
                correct: q.correct,
                selected,
            };
            total += result.points();
            result
        })
        .collect();

    ScoreResult {
        total,
        max: CORRECT_POINTS * questions.len() as f64,
        per_question,
    }
}

/// Two decimals with trailing zeros dropped: 10.0 -> "10", 2.6799999 -> "2.68"
pub fn format_points(points: f64) -> String {
    let rounded = format!("{:.2}", points);
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    match trimmed {
        "-0" | "" => "0".to_string(),
        s => s.to_string(),
    }
}
