use std::time::{Duration, SystemTime};

pub const SECONDS_PER_QUESTION: u64 = 15;

/// Countdown for a timed session. The allotment is fixed when it starts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Countdown {
    pub started_at: SystemTime,
    pub deadline: SystemTime,
}

impl Countdown {
    pub fn start(question_count: usize, now: SystemTime) -> Self {
        Self {
            started_at: now,
            deadline: now + allotted(question_count),
        }
    }

    pub fn allotted(&self) -> Duration {
        self.deadline
            .duration_since(self.started_at)
            .unwrap_or_default()
    }

    /// Time left, clamped to zero once the deadline has passed
    pub fn remaining(&self, now: SystemTime) -> Duration {
        self.deadline.duration_since(now).unwrap_or_default()
    }

    pub fn expired(&self, now: SystemTime) -> bool {
        now >= self.deadline
    }
}

pub fn allotted(question_count: usize) -> Duration {
    Duration::from_secs(question_count as u64 * SECONDS_PER_QUESTION)
}

/// mm:ss, rounding partial seconds up so 0:00 only shows once expired
pub fn format_remaining(remaining: Duration) -> String {
    let mut secs = remaining.as_secs();
    if remaining.subsec_nanos() > 0 {
        secs += 1;
    }
    format!("{}:{:02}", secs / 60, secs % 60)
}
