//! Time-driven progressive disclosure of one message.
//!
//! A [`RevealScheduler`] walks a visible-character cursor from 0 to the plain
//! length of its source text, one step per timer tick, and hands the sliced
//! span prefix to its [`RevealObserver`] after every step. The state machine is
//! `Idle -> Revealing -> Complete`; completion is reported exactly once per
//! cycle.
//!
//! The timer lives in a spawned task (see [`timer`]) and only ever sends
//! ticks. All cursor state is owned here and advanced from the single loop
//! that drains the tick channel, so ticks are processed strictly in order.
//! Restarting always clears the armed timer before a new one is armed, and a
//! tick from a cleared timer that is still sitting in the channel is
//! recognized by its id and dropped.

pub mod timer;

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::core::constants::{DEFAULT_INTERVAL_MS, DEFAULT_WORD_TICK_MULTIPLIER, MIN_INTERVAL_MS};
use crate::text::{plain_length, slice_at, tokenize, word_boundaries, Span};
use timer::{ArmedTimer, RevealTick, TickDispatcher};

/// Granularity of each reveal step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RevealMode {
    /// One visible character per tick.
    #[default]
    Character,
    /// One whitespace-delimited word per tick, at a slower cadence.
    Word,
}

impl RevealMode {
    pub fn as_str(self) -> &'static str {
        match self {
            RevealMode::Character => "character",
            RevealMode::Word => "word",
        }
    }
}

impl std::str::FromStr for RevealMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "character" | "char" => Ok(RevealMode::Character),
            "word" => Ok(RevealMode::Word),
            other => Err(format!("invalid reveal mode: {other} (expected character or word)")),
        }
    }
}

/// Effective reveal tuning for one scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealSettings {
    pub mode: RevealMode,
    /// Base tick interval; character mode ticks at exactly this rate.
    pub interval: Duration,
    /// Word mode ticks every `interval * word_tick_multiplier`.
    pub word_tick_multiplier: u32,
    /// When false the text is shown fully formed with no timer.
    pub animation: bool,
}

impl Default for RevealSettings {
    fn default() -> Self {
        Self {
            mode: RevealMode::Character,
            interval: Duration::from_millis(DEFAULT_INTERVAL_MS),
            word_tick_multiplier: DEFAULT_WORD_TICK_MULTIPLIER,
            animation: true,
        }
    }
}

impl RevealSettings {
    pub fn with_mode(mut self, mode: RevealMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_animation(mut self, animation: bool) -> Self {
        self.animation = animation;
        self
    }

    /// Time between two ticks for the configured mode, never zero.
    pub fn tick_period(&self) -> Duration {
        let base = self.interval.max(Duration::from_millis(MIN_INTERVAL_MS));
        match self.mode {
            RevealMode::Character => base,
            RevealMode::Word => base.saturating_mul(self.word_tick_multiplier.max(1)),
        }
    }
}

/// Receives the output of a [`RevealScheduler`].
///
/// `visible` is a snapshot owned by the scheduler; observers read it and must
/// copy what they want to keep.
pub trait RevealObserver {
    fn on_tick(&mut self, visible: &[Span]);
    fn on_complete(&mut self);
}

/// Adapts a pair of closures into a [`RevealObserver`].
pub struct RevealCallbacks<T, C> {
    on_tick: T,
    on_complete: C,
}

impl<T, C> RevealCallbacks<T, C>
where
    T: FnMut(&[Span]),
    C: FnMut(),
{
    pub fn new(on_tick: T, on_complete: C) -> Self {
        Self {
            on_tick,
            on_complete,
        }
    }
}

impl<T, C> RevealObserver for RevealCallbacks<T, C>
where
    T: FnMut(&[Span]),
    C: FnMut(),
{
    fn on_tick(&mut self, visible: &[Span]) {
        (self.on_tick)(visible)
    }

    fn on_complete(&mut self) {
        (self.on_complete)()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchedulerState {
    #[default]
    Idle,
    Revealing,
    Complete,
}

pub struct RevealScheduler<O> {
    dispatcher: TickDispatcher,
    settings: RevealSettings,
    observer: O,
    source: String,
    spans: Vec<Span>,
    total: usize,
    boundaries: Vec<usize>,
    cursor: usize,
    // None until the first word-mode tick.
    word_index: Option<usize>,
    visible: Vec<Span>,
    state: SchedulerState,
    timer: Option<ArmedTimer>,
}

impl<O: RevealObserver> RevealScheduler<O> {
    pub fn new(dispatcher: TickDispatcher, settings: RevealSettings, observer: O) -> Self {
        Self {
            dispatcher,
            settings,
            observer,
            source: String::new(),
            spans: Vec::new(),
            total: 0,
            boundaries: Vec::new(),
            cursor: 0,
            word_index: None,
            visible: Vec::new(),
            state: SchedulerState::Idle,
            timer: None,
        }
    }

    /// Begins a new cycle for `source` at cursor 0, replacing whatever cycle
    /// was running. With animation disabled, or nothing visible to reveal, the
    /// cycle goes straight to `Complete`.
    pub fn start(&mut self, source: impl Into<String>) {
        self.clear_timer();

        self.source = source.into();
        self.spans = tokenize(&self.source);
        self.total = plain_length(&self.spans);
        self.boundaries = match self.settings.mode {
            RevealMode::Character => Vec::new(),
            RevealMode::Word => word_boundaries(&self.spans),
        };
        self.cursor = 0;
        self.word_index = None;
        self.visible.clear();

        if !self.settings.animation || self.total == 0 {
            debug!(
                animation = self.settings.animation,
                total = self.total,
                "reveal skipped, showing full text"
            );
            self.cursor = self.total;
            self.visible = self.spans.clone();
            self.complete();
            return;
        }

        let period = self.settings.tick_period();
        let timer = self.dispatcher.arm(period);
        let reveal_id = timer.reveal_id();
        self.timer = Some(timer);
        self.state = SchedulerState::Revealing;
        debug!(
            reveal_id,
            total = self.total,
            mode = self.settings.mode.as_str(),
            ?period,
            "reveal armed"
        );
    }

    /// Replaces the source text. Identical text is a no-op; different text
    /// cancels the running cycle and starts over at cursor 0.
    pub fn set_source(&mut self, source: &str) {
        if self.state != SchedulerState::Idle && source == self.source {
            return;
        }
        debug!(previous_len = self.source.len(), "reveal source replaced");
        self.start(source);
    }

    /// Stops the cycle without completing it. Safe to call in any state.
    pub fn cancel(&mut self) {
        if self.clear_timer() {
            debug!(cursor = self.cursor, total = self.total, "reveal cancelled");
        }
        if self.state == SchedulerState::Revealing {
            self.state = SchedulerState::Idle;
        }
    }

    /// Skips the rest of the animation: the full text becomes visible and
    /// completion fires, once.
    pub fn finish_now(&mut self) {
        if self.state != SchedulerState::Revealing {
            return;
        }
        self.clear_timer();
        self.cursor = self.total;
        self.visible = self.spans.clone();
        self.observer.on_tick(&self.visible);
        self.complete();
    }

    /// Advances one step for `tick`. Returns false when the tick belongs to a
    /// timer that is no longer armed and was ignored.
    pub fn handle_tick(&mut self, tick: RevealTick) -> bool {
        let current = self.timer.as_ref().map(ArmedTimer::reveal_id);
        if current != Some(tick.reveal_id) || self.state != SchedulerState::Revealing {
            trace!(reveal_id = tick.reveal_id, ?current, "stale reveal tick dropped");
            return false;
        }

        self.cursor = match self.settings.mode {
            RevealMode::Character => self.cursor + 1,
            RevealMode::Word => {
                let next = self.word_index.map_or(0, |idx| idx + 1);
                self.word_index = Some(next);
                self.boundaries.get(next).copied().unwrap_or(self.total)
            }
        }
        .min(self.total);

        self.visible = slice_at(&self.spans, self.cursor);
        self.observer.on_tick(&self.visible);

        if self.cursor >= self.total {
            self.clear_timer();
            self.complete();
        }
        true
    }

    fn complete(&mut self) {
        self.state = SchedulerState::Complete;
        debug!(total = self.total, "reveal complete");
        self.observer.on_complete();
    }

    fn clear_timer(&mut self) -> bool {
        match self.timer.take() {
            Some(timer) => {
                timer.clear();
                true
            }
            None => false,
        }
    }
}

impl<O> RevealScheduler<O> {
    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn settings(&self) -> &RevealSettings {
        &self.settings
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    /// Latest visible snapshot.
    pub fn visible(&self) -> &[Span] {
        &self.visible
    }

    /// `(cursor, plain length)` of the current cycle.
    pub fn progress(&self) -> (usize, usize) {
        (self.cursor, self.total)
    }

    /// Whether the renderer should draw the typing cursor indicator.
    pub fn shows_cursor(&self) -> bool {
        self.state == SchedulerState::Revealing
    }

    /// Id of the cycle whose timer is armed, if any.
    pub fn armed_reveal_id(&self) -> Option<u64> {
        self.timer.as_ref().map(ArmedTimer::reveal_id)
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }
}

impl<O> Drop for RevealScheduler<O> {
    fn drop(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.clear();
        }
    }
}

/// Full rendering for entries that are never animated.
pub fn render_complete(source: &str) -> Vec<Span> {
    let spans = tokenize(source);
    slice_at(&spans, plain_length(&spans))
}
