use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::sync::Mutex;
use std::time::{Duration, SystemTime};

use crossterm::event::{self, Event as CtEvent, KeyEvent, KeyEventKind};
use tracing::debug;

use crate::controls::action_for;
use crate::error::Result;
use crate::leaderboard::LeaderboardStore;
use crate::session::{Flow, Session};

/// The countdown is re-checked at least this often
pub const TICK_RATE_MS: u64 = 1000;

/// Unified event type consumed by the app runner
#[derive(Clone, Debug)]
pub enum QuizEvent {
    Key(KeyEvent),
    Resize,
    Tick,
}

/// Source of terminal events (keyboard, resize, etc.)
pub trait QuizEventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    /// Returns Ok(event) if an event arrives before the timeout, or Err(Timeout) if it expires.
    fn recv_timeout(&self, timeout: Duration) -> std::result::Result<QuizEvent, RecvTimeoutError>;
}

/// Production event source using crossterm
pub struct CrosstermEventSource {
    rx: Receiver<QuizEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            let ev = match event::read() {
                // key release/repeat events would double every keystroke on some platforms
                Ok(CtEvent::Key(key)) if key.kind == KeyEventKind::Press => QuizEvent::Key(key),
                Ok(CtEvent::Resize(_, _)) => QuizEvent::Resize,
                Ok(_) => continue,
                Err(_) => break,
            };
            if tx.send(ev).is_err() {
                break;
            }
        });

        Self { rx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl QuizEventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> std::result::Result<QuizEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Test event source fed through a channel
pub struct TestEventSource {
    rx: Receiver<QuizEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<QuizEvent>) -> Self {
        Self { rx }
    }
}

impl QuizEventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> std::result::Result<QuizEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Configurable ticker interface
pub trait Ticker: Send + Sync + 'static {
    fn interval(&self) -> Duration;
}

/// Fixed interval ticker
#[derive(Clone, Copy, Debug)]
pub struct FixedTicker {
    interval: Duration,
}

impl FixedTicker {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Default for FixedTicker {
    fn default() -> Self {
        Self::new(Duration::from_millis(TICK_RATE_MS))
    }
}

impl Ticker for FixedTicker {
    fn interval(&self) -> Duration {
        self.interval
    }
}

/// Wall clock used to judge the countdown
pub trait Clock {
    fn now(&self) -> SystemTime;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

/// Clock that only moves when told to
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<SystemTime>,
}

impl ManualClock {
    pub fn new(start: SystemTime) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn advance(&self, by: Duration) {
        if let Ok(mut now) = self.now.lock() {
            *now += by;
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> SystemTime {
        self.now
            .lock()
            .map(|n| *n)
            .unwrap_or_else(|poisoned| *poisoned.into_inner())
    }
}

/// Runner that advances the session one event/tick at a time
pub struct Runner<E: QuizEventSource, T: Ticker, C: Clock = SystemClock> {
    event_source: E,
    ticker: T,
    clock: C,
}

impl<E: QuizEventSource, T: Ticker> Runner<E, T, SystemClock> {
    pub fn new(event_source: E, ticker: T) -> Self {
        Self::with_clock(event_source, ticker, SystemClock)
    }
}

impl<E: QuizEventSource, T: Ticker, C: Clock> Runner<E, T, C> {
    pub fn with_clock(event_source: E, ticker: T, clock: C) -> Self {
        Self {
            event_source,
            ticker,
            clock,
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Blocks up to tick interval and returns the next event, or Tick on timeout
    pub fn step(&self) -> QuizEvent {
        match self.event_source.recv_timeout(self.ticker.interval()) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => QuizEvent::Tick,
        }
    }

    /// Take one event and apply it to the session.
    /// The countdown is checked before a key is applied, so a key that
    /// arrives after the deadline is dropped and the answers held at
    /// expiry are the ones scored. It is checked again after every event
    /// so a stream of key presses cannot hold the deadline off.
    pub fn advance(&self, session: &mut Session, store: &dyn LeaderboardStore) -> Result<Flow> {
        let flow = match self.step() {
            QuizEvent::Key(key) => {
                if session.poll_timer(store, self.clock.now())? {
                    debug!(?key, "key arrived after the deadline, dropped");
                    return Ok(Flow::Continue);
                }
                let action = action_for(session.phase(), &key);
                session.apply(action, store, self.clock.now())?
            }
            QuizEvent::Resize | QuizEvent::Tick => Flow::Continue,
        };
        if flow == Flow::Continue {
            session.poll_timer(store, self.clock.now())?;
        }
        Ok(flow)
    }
}
