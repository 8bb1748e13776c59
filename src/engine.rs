//! Countdown engine driving a row of flip cards.
//!
//! The engine owns the end moment of a countdown and a periodic tick. On every
//! tick (including one immediately after [`Model::start`]) it samples the clock,
//! formats the remaining time and the remaining time one interval earlier, and
//! flips every card whose digit differs between the two. When the remaining
//! time reaches zero it stops ticking and reports completion exactly once.
//!
//! The previous digits are always recomputed from the formatter rather than
//! remembered from the last tick, so a late or early tick can never make the
//! cards drift away from the clock.
//!
//! # Basic Usage
//!
//! ```rust
//! use flip_countdown::engine::{Model, Sample};
//! use std::time::{Duration, SystemTime};
//!
//! let now = SystemTime::now();
//! let engine = Model::new(now + Duration::from_secs(61));
//!
//! match engine.sample(now) {
//!     Sample::Remaining { current, previous, .. } => {
//!         assert_eq!(current.as_str(), "01010000");
//!         assert_eq!(previous.as_str(), "02010000");
//!     }
//!     Sample::Ended => unreachable!(),
//! }
//! ```
//!
//! # Cancellation
//!
//! Ticks carry the engine id and a generation tag. [`Model::stop`] bumps the
//! generation, so a tick that was already scheduled is ignored when it
//! arrives. A replaced engine has a different id, so its ticks are ignored by
//! the new one as well.

use crate::digits::{format_remaining, DigitString, DIGIT_COUNT};
use crate::flipcard::{FlipDirection, FlipHandle};
use bubbletea_rs::{batch, tick as bubbletea_tick, Cmd, Msg};
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{Duration, SystemTime};

// Internal ID management for engine instances
static LAST_ID: AtomicI64 = AtomicI64::new(0);

fn next_id() -> i64 {
    LAST_ID.fetch_add(1, Ordering::SeqCst) + 1
}

/// Sampling period of the countdown.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Identifies one live periodic timer of one engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerHandle {
    id: i64,
    tag: i64,
}

impl TimerHandle {
    /// Engine the timer belongs to.
    pub fn id(&self) -> i64 {
        self.id
    }

    /// Generation of the timer within its engine.
    pub fn generation(&self) -> i64 {
        self.tag
    }
}

/// Periodic sampling message.
#[derive(Debug, Clone)]
pub struct TickMsg {
    /// Engine that scheduled the tick.
    pub id: i64,
    /// Clock reading the tick was taken at.
    pub time: SystemTime,
    tag: i64,
}

/// A single card animation requested by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlipCommand {
    /// Digit position, see [`crate::digits`].
    pub position: usize,
    /// Always [`FlipDirection::Down`] for a countdown.
    pub direction: FlipDirection,
    /// Digit one interval ago.
    pub front: char,
    /// Digit now.
    pub back: char,
}

/// What the clock says at one instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sample {
    /// Time is left.
    Remaining {
        /// Milliseconds until the end moment, always positive.
        millis: u64,
        /// Digits for now.
        current: DigitString,
        /// Digits one interval ago.
        previous: DigitString,
    },
    /// The end moment has been reached or passed.
    Ended,
}

impl Sample {
    /// Flip commands for every position that changed, in position order.
    pub fn flips(&self) -> Vec<FlipCommand> {
        match self {
            Sample::Remaining {
                current, previous, ..
            } => current
                .changes(previous)
                .filter_map(|position| {
                    Some(FlipCommand {
                        position,
                        direction: FlipDirection::Down,
                        front: previous.digit(position)?,
                        back: current.digit(position)?,
                    })
                })
                .collect(),
            Sample::Ended => Vec::new(),
        }
    }
}

/// Result of handing a tick to the engine.
pub enum TickOutcome {
    /// The tick was stale, foreign, or the engine is not running.
    Ignored,
    /// Cards were driven and the next tick scheduled.
    Running {
        /// Positions whose card accepted a flip.
        flipped: Vec<usize>,
        /// Positions whose card was still busy and dropped the flip.
        rejected: Vec<usize>,
        /// Card completion commands followed by the next tick.
        cmds: Vec<Cmd>,
    },
    /// The countdown just finished. Reported once per engine.
    Ended,
}

impl TickOutcome {
    /// Collapses the outcome into a single command for the runtime.
    pub fn into_cmd(self) -> Option<Cmd> {
        match self {
            TickOutcome::Running { mut cmds, .. } => match cmds.len() {
                0 => None,
                1 => cmds.pop(),
                _ => Some(batch(cmds)),
            },
            _ => None,
        }
    }
}

/// Countdown engine state.
#[derive(Debug, Clone)]
pub struct Model {
    /// Time between samples.
    pub interval: Duration,
    end: SystemTime,
    started: Option<SystemTime>,
    ticks: u32,
    running: bool,
    ended: bool,
    id: i64,
    tag: i64,
}

impl Model {
    /// Creates a stopped engine counting down to `end`.
    pub fn new(end: SystemTime) -> Self {
        Self {
            interval: TICK_INTERVAL,
            end,
            started: None,
            ticks: 0,
            running: false,
            ended: false,
            id: next_id(),
            tag: 0,
        }
    }

    /// Overrides the sampling period.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Unique identifier of this engine.
    pub fn id(&self) -> i64 {
        self.id
    }

    /// The moment the countdown targets.
    pub fn end_moment(&self) -> SystemTime {
        self.end
    }

    /// Whether the periodic timer is live.
    pub fn running(&self) -> bool {
        self.running
    }

    /// Whether completion has been reported.
    pub fn ended(&self) -> bool {
        self.ended
    }

    /// Handle of the live timer, if any.
    pub fn handle(&self) -> Option<TimerHandle> {
        self.running.then_some(TimerHandle {
            id: self.id,
            tag: self.tag,
        })
    }

    /// Milliseconds until the end moment; negative once it has passed.
    pub fn remaining_millis(&self, now: SystemTime) -> i64 {
        match self.end.duration_since(now) {
            Ok(left) => i64::try_from(left.as_millis()).unwrap_or(i64::MAX),
            Err(past) => -i64::try_from(past.duration().as_millis()).unwrap_or(i64::MAX),
        }
    }

    /// Time until the end moment, clamped at zero.
    pub fn remaining(&self, now: SystemTime) -> Duration {
        self.end.duration_since(now).unwrap_or(Duration::ZERO)
    }

    /// Samples the countdown at `now` without touching any state.
    pub fn sample(&self, now: SystemTime) -> Sample {
        let diff = self.remaining_millis(now);
        if diff <= 0 {
            return Sample::Ended;
        }
        let millis = diff as u64;
        let step = u64::try_from(self.interval.as_millis()).unwrap_or(u64::MAX);
        Sample::Remaining {
            millis,
            current: format_remaining(millis),
            previous: format_remaining(millis.saturating_add(step)),
        }
    }

    /// Starts the periodic timer and returns an immediate first tick.
    ///
    /// Calling `start` on a running engine replaces its timer. An engine that
    /// has already ended stays stopped; the returned tick is ignored.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use flip_countdown::engine::{Model, TickMsg};
    /// use std::time::{Duration, SystemTime};
    ///
    /// let mut engine = Model::new(SystemTime::now() + Duration::from_secs(10));
    /// let first_tick = engine.start();
    ///
    /// assert!(engine.running());
    /// let handle = engine.handle().expect("running engine has a handle");
    /// assert_eq!(handle.id(), engine.id());
    /// # drop(first_tick);
    /// ```
    ///
    /// Inside an application the command goes straight back to the runtime:
    ///
    /// ```rust
    /// use bubbletea_rs::{Cmd, Model as BubbleTeaModel, Msg};
    /// use flip_countdown::engine::Model;
    /// use flip_countdown::flipcard::{FlipDoneMsg, Model as FlipCard};
    /// use std::time::{Duration, SystemTime};
    ///
    /// struct App {
    ///     engine: Model,
    ///     cards: Vec<FlipCard>,
    /// }
    ///
    /// impl BubbleTeaModel for App {
    ///     fn init() -> (Self, Option<Cmd>) {
    ///         let mut engine = Model::new(SystemTime::now() + Duration::from_secs(30));
    ///         let cmd = engine.start();
    ///         let cards = (0..8).map(|_| FlipCard::new()).collect();
    ///         (Self { engine, cards }, Some(cmd))
    ///     }
    ///
    ///     fn update(&mut self, msg: Msg) -> Option<Cmd> {
    ///         if let Some(done) = msg.downcast_ref::<FlipDoneMsg>() {
    ///             self.cards.iter_mut().for_each(|card| {
    ///                 card.on_done(done);
    ///             });
    ///             return None;
    ///         }
    ///         self.engine.update(&msg, &mut self.cards).into_cmd()
    ///     }
    ///
    ///     fn view(&self) -> String {
    ///         self.cards.iter().map(|c| c.front()).collect()
    ///     }
    /// }
    /// ```
    pub fn start(&mut self) -> Cmd {
        if self.ended {
            log::debug!(
                "countdown engine {} already ended, not restarting",
                self.id
            );
            self.running = false;
            return self.tick_after(Duration::from_nanos(1));
        }
        self.tag += 1;
        self.running = true;
        self.started = Some(SystemTime::now());
        self.ticks = 0;
        log::debug!(
            "countdown engine {} started (generation {})",
            self.id,
            self.tag
        );
        self.tick_after(Duration::from_nanos(1))
    }

    /// Cancels the periodic timer. Ticks already scheduled become stale.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use flip_countdown::engine::{Model, TickOutcome};
    /// use flip_countdown::flipcard::Model as FlipCard;
    /// use std::time::{Duration, SystemTime};
    ///
    /// let now = SystemTime::now();
    /// let mut engine = Model::new(now + Duration::from_secs(10));
    /// let mut cards: Vec<FlipCard> = (0..8).map(|_| FlipCard::new()).collect();
    /// let _ = engine.start();
    /// let scheduled = engine.tick_msg_at(now);
    ///
    /// engine.stop();
    /// assert!(!engine.running());
    /// assert!(matches!(engine.on_tick(&scheduled, &mut cards), TickOutcome::Ignored));
    /// ```
    pub fn stop(&mut self) {
        if self.running {
            log::debug!("countdown engine {} stopped", self.id);
        }
        self.running = false;
        self.tag += 1;
    }

    /// Builds a tick for this engine's current timer at `time`.
    pub fn tick_msg_at(&self, time: SystemTime) -> TickMsg {
        TickMsg {
            id: self.id,
            time,
            tag: self.tag,
        }
    }

    /// Builds a tick for this engine's current timer at the current time.
    pub fn tick_msg(&self) -> TickMsg {
        self.tick_msg_at(SystemTime::now())
    }

    fn tick_after(&self, delay: Duration) -> Cmd {
        let id = self.id;
        let tag = self.tag;
        bubbletea_tick(delay, move |_| {
            Box::new(TickMsg {
                id,
                time: SystemTime::now(),
                tag,
            }) as Msg
        })
    }

    fn accepts(&self, msg: &TickMsg) -> bool {
        self.running && !self.ended && msg.id == self.id && msg.tag == self.tag
    }

    /// Handles a tick: drives `cards` or reports completion.
    ///
    /// Card `i` is bound to digit position `i`. Flips are dispatched in
    /// position order.
    pub fn on_tick<H: FlipHandle>(&mut self, msg: &TickMsg, cards: &mut [H]) -> TickOutcome {
        if !self.accepts(msg) {
            return TickOutcome::Ignored;
        }

        let sample = self.sample(msg.time);
        if sample == Sample::Ended {
            self.stop();
            self.ended = true;
            log::debug!("countdown engine {} reached its end moment", self.id);
            return TickOutcome::Ended;
        }

        let mut flipped = Vec::new();
        let mut rejected = Vec::new();
        let mut cmds = Vec::new();
        for flip in sample.flips() {
            debug_assert!(flip.position < DIGIT_COUNT);
            let Some(card) = cards.get_mut(flip.position) else {
                continue;
            };
            match card.flip(flip.direction, flip.front, flip.back) {
                Some(cmd) => {
                    flipped.push(flip.position);
                    cmds.push(cmd);
                }
                None => rejected.push(flip.position),
            }
        }
        if !rejected.is_empty() {
            log::debug!(
                "countdown engine {}: busy cards dropped flips at {:?}",
                self.id,
                rejected
            );
        }

        self.ticks = self.ticks.saturating_add(1);
        cmds.push(self.tick_after(self.next_delay(msg.time)));

        TickOutcome::Running {
            flipped,
            rejected,
            cmds,
        }
    }

    /// Delay until the next tick, aligned to the start of the timer so that
    /// handling time does not accumulate.
    fn next_delay(&self, now: SystemTime) -> Duration {
        let started = self.started.unwrap_or(now);
        let due = started + self.interval * self.ticks;
        due.duration_since(now)
            .unwrap_or(Duration::ZERO)
            .max(Duration::from_nanos(1))
    }

    /// Handles a raw message if it is a tick; other messages are ignored.
    pub fn update<H: FlipHandle>(&mut self, msg: &Msg, cards: &mut [H]) -> TickOutcome {
        match msg.downcast_ref::<TickMsg>() {
            Some(tick) => self.on_tick(tick, cards),
            None => TickOutcome::Ignored,
        }
    }
}
