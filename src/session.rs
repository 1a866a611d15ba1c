use chrono::{DateTime, Local};
use std::time::{Duration, SystemTime};
use tracing::{debug, info, warn};

use crate::controls::Action;
use crate::error::Result;
use crate::leaderboard::{LeaderboardStore, RankedEntry, ScorePolicy};
use crate::question::{AnswerLetter, Question};
use crate::scorer::{score, Responses, ScoreResult};
use crate::timer::Countdown;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    AwaitingName,
    AwaitingResponses,
    Submitted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum SubmitReason {
    #[strum(to_string = "submitted")]
    Manual,
    #[strum(to_string = "time's up")]
    TimeUp,
}

#[derive(Debug, Clone, Default)]
pub struct SessionConfig {
    pub timed: bool,
    pub policy: ScorePolicy,
}

/// Everything shown after submission. Computed once, only read afterwards.
#[derive(Debug, Clone)]
pub struct SessionOutcome {
    pub player: String,
    pub result: ScoreResult,
    pub reason: SubmitReason,
    pub standings: Vec<RankedEntry>,
    pub finished_at: DateTime<Local>,
}

impl SessionOutcome {
    pub fn rank(&self) -> Option<usize> {
        self.standings
            .iter()
            .find(|e| e.name == self.player)
            .map(|e| e.rank)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// One player's run through the question set
#[derive(Debug)]
pub struct Session {
    pub questions: Vec<Question>,
    pub config: SessionConfig,
    phase: Phase,
    name_input: String,
    player: Option<String>,
    responses: Responses,
    cursor: usize,
    countdown: Option<Countdown>,
    outcome: Option<SessionOutcome>,
}

impl Session {
    pub fn new(questions: Vec<Question>, config: SessionConfig) -> Self {
        Self {
            questions,
            config,
            phase: Phase::AwaitingName,
            name_input: String::new(),
            player: None,
            responses: Responses::new(),
            cursor: 0,
            countdown: None,
            outcome: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn name_input(&self) -> &str {
        &self.name_input
    }

    pub fn player(&self) -> Option<&str> {
        self.player.as_deref()
    }

    pub fn responses(&self) -> &Responses {
        &self.responses
    }

    /// 0-based index of the question under the cursor
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn countdown(&self) -> Option<&Countdown> {
        self.countdown.as_ref()
    }

    pub fn remaining(&self, now: SystemTime) -> Option<Duration> {
        self.countdown.map(|c| c.remaining(now))
    }

    pub fn outcome(&self) -> Option<&SessionOutcome> {
        self.outcome.as_ref()
    }

    pub fn push_name_char(&mut self, c: char) {
        if self.phase == Phase::AwaitingName && !c.is_control() {
            self.name_input.push(c);
        }
    }

    pub fn pop_name_char(&mut self) {
        if self.phase == Phase::AwaitingName {
            self.name_input.pop();
        }
    }

    /// Accept the typed name. Blank names are refused. Returns true on transition.
    pub fn submit_name(&mut self, now: SystemTime) -> bool {
        if self.phase != Phase::AwaitingName {
            return false;
        }
        let name = self.name_input.trim();
        if name.is_empty() {
            return false;
        }

        self.player = Some(name.to_string());
        self.phase = Phase::AwaitingResponses;
        if self.config.timed {
            let countdown = Countdown::start(self.questions.len(), now);
            debug!(allotted_secs = countdown.allotted().as_secs(), "countdown started");
            self.countdown = Some(countdown);
        }
        info!(
            player = name,
            questions = self.questions.len(),
            policy = %self.config.policy,
            "session started"
        );
        true
    }

    pub fn move_cursor(&mut self, forward: bool) {
        if self.questions.is_empty() {
            return;
        }
        let last = self.questions.len() - 1;
        self.cursor = if forward {
            (self.cursor + 1).min(last)
        } else {
            self.cursor.saturating_sub(1)
        };
    }

    /// Pick an answer for the question under the cursor
    pub fn select(&mut self, letter: AnswerLetter) {
        if self.phase == Phase::AwaitingResponses && self.cursor < self.questions.len() {
            self.responses.select(self.cursor + 1, letter);
        }
    }

    /// Step the current pick through A..D; an unanswered question starts at A
    pub fn cycle_selection(&mut self, forward: bool) {
        let next = match self.responses.get(self.cursor + 1) {
            Some(letter) if forward => letter.next(),
            Some(letter) => letter.prev(),
            None if forward => AnswerLetter::A,
            None => AnswerLetter::D,
        };
        self.select(next);
    }

    pub fn clear_selection(&mut self) {
        if self.phase == Phase::AwaitingResponses {
            self.responses.clear(self.cursor + 1);
        }
    }

    /// Explicit submission. Cancels the countdown.
    pub fn submit(&mut self, store: &dyn LeaderboardStore, now: SystemTime) -> Result<bool> {
        self.finish(SubmitReason::Manual, store, now)
    }

    /// Check the countdown; once expired, submits whatever has been answered
    pub fn poll_timer(&mut self, store: &dyn LeaderboardStore, now: SystemTime) -> Result<bool> {
        match self.countdown {
            Some(c) if self.phase == Phase::AwaitingResponses && c.expired(now) => {
                info!("countdown expired, submitting collected answers");
                self.finish(SubmitReason::TimeUp, store, now)
            }
            _ => Ok(false),
        }
    }

    fn finish(
        &mut self,
        reason: SubmitReason,
        store: &dyn LeaderboardStore,
        now: SystemTime,
    ) -> Result<bool> {
        if self.phase != Phase::AwaitingResponses {
            return Ok(false);
        }
        let player = self.player.clone().unwrap_or_default();
        let result = score(&self.questions, &self.responses);

        let mut board = store.load()?;
        board.record(&player, result.total, self.config.policy);
        if let Err(e) = store.save(&board) {
            warn!(error = %e, "leaderboard save failed");
            return Err(e);
        }

        info!(
            player = %player,
            score = result.total,
            max = result.max,
            reason = %reason,
            "session submitted"
        );
        self.countdown = None;
        self.phase = Phase::Submitted;
        self.outcome = Some(SessionOutcome {
            player,
            result,
            reason,
            standings: board.ranked(),
            finished_at: DateTime::<Local>::from(now),
        });
        Ok(true)
    }

    /// Play the same questions again, keeping the last name typed
    pub fn restart(&mut self) {
        if self.phase != Phase::Submitted {
            return;
        }
        self.name_input = self.player.take().unwrap_or_default();
        self.phase = Phase::AwaitingName;
        self.responses = Responses::new();
        self.cursor = 0;
        self.countdown = None;
        self.outcome = None;
    }

    pub fn apply(
        &mut self,
        action: Action,
        store: &dyn LeaderboardStore,
        now: SystemTime,
    ) -> Result<Flow> {
        match action {
            Action::Quit => return Ok(Flow::Quit),
            Action::Type(c) => self.push_name_char(c),
            Action::Erase => self.pop_name_char(),
            Action::ConfirmName => {
                self.submit_name(now);
            }
            Action::NextQuestion => self.move_cursor(true),
            Action::PrevQuestion => self.move_cursor(false),
            Action::Select(letter) => self.select(letter),
            Action::NextOption => self.cycle_selection(true),
            Action::PrevOption => self.cycle_selection(false),
            Action::ClearAnswer => self.clear_selection(),
            Action::Submit => {
                self.submit(store, now)?;
            }
            Action::Restart => self.restart(),
            Action::Ignore => {}
        }
        Ok(Flow::Continue)
    }
}
