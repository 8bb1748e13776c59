//! Flip countdown component for Bubble Tea applications.
//!
//! The countdown composes eight [flip cards](crate::flipcard) (two per unit:
//! seconds, minutes, hours, days) with an [engine](crate::engine) that flips
//! them as time passes. Depending on its [`Granularity`] only the trailing
//! units are rendered, but all eight cards keep receiving flips.
//!
//! The end moment is derived once per configuration: an explicit target wins,
//! otherwise the configured duration is added to the current time, otherwise
//! the countdown runs for [`DEFAULT_DURATION`]. Every call to
//! [`Model::configure`] tears the running engine down before building a new
//! one, so ticks from an earlier configuration are never observed.
//!
//! # Basic Usage
//!
//! ```rust
//! use flip_countdown::countdown::{new, with_duration, with_granularity, Granularity};
//! use std::time::Duration;
//!
//! let countdown = new(&[
//!     with_duration(Duration::from_secs(90)),
//!     with_granularity(Granularity::Minute),
//! ]);
//! assert_eq!(countdown.initial_digits().minutes(), 1);
//! ```
//!
//! # bubbletea-rs Integration
//!
//! ```rust
//! use bubbletea_rs::{Cmd, Model as BubbleTeaModel, Msg};
//! use flip_countdown::countdown::{new, with_duration, EndedMsg, Model};
//! use std::time::Duration;
//!
//! struct MyApp {
//!     countdown: Model,
//!     done: bool,
//! }
//!
//! impl BubbleTeaModel for MyApp {
//!     fn init() -> (Self, Option<Cmd>) {
//!         let mut countdown = new(&[with_duration(Duration::from_secs(10))]);
//!         let cmd = countdown.init();
//!         (Self { countdown, done: false }, Some(cmd))
//!     }
//!
//!     fn update(&mut self, msg: Msg) -> Option<Cmd> {
//!         if msg.downcast_ref::<EndedMsg>().is_some() {
//!             self.done = true;
//!             return None;
//!         }
//!         self.countdown.update(msg)
//!     }
//!
//!     fn view(&self) -> String {
//!         if self.done {
//!             "Countdown ended!".to_string()
//!         } else {
//!             self.countdown.view()
//!         }
//!     }
//! }
//! ```

use crate::digits::{format_remaining, DigitString, DIGIT_COUNT};
use crate::engine::{self, TickMsg, TickOutcome};
use crate::flipcard::{self, FlipDoneMsg};
use crate::input::{CountdownInput, InputError};
use bubbletea_rs::{tick as bubbletea_tick, Cmd, Model as BubbleTeaModel, Msg};
use lipgloss_extras::lipgloss::{self, Style};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{Duration, SystemTime};

// Internal ID management for countdown instances
static LAST_ID: AtomicI64 = AtomicI64::new(0);

fn next_id() -> i64 {
    LAST_ID.fetch_add(1, Ordering::SeqCst) + 1
}

/// Countdown length when neither a duration nor a target is given.
pub const DEFAULT_DURATION: Duration = Duration::from_secs(5 * 60);

const SECS_PER_DAY: u64 = 86_400;

/// Callback invoked once when a configuration's countdown reaches zero.
pub type OnEndedFunc = Box<dyn FnMut() + Send>;

/// Which trailing units of the countdown are shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Granularity {
    /// Days, hours, minutes and seconds.
    #[default]
    Day,
    /// Hours, minutes and seconds.
    Hour,
    /// Minutes and seconds.
    Minute,
    /// Seconds only.
    Second,
}

impl Granularity {
    /// Every granularity, coarsest first.
    pub const ALL: [Granularity; 4] = [
        Granularity::Day,
        Granularity::Hour,
        Granularity::Minute,
        Granularity::Second,
    ];

    /// Number of digit pairs rendered.
    pub fn pairs(self) -> usize {
        match self {
            Granularity::Day => 4,
            Granularity::Hour => 3,
            Granularity::Minute => 2,
            Granularity::Second => 1,
        }
    }

    /// Exclusive upper bound on countdown length that the rendered units can
    /// show without hiding a carry.
    pub fn horizon(self) -> Duration {
        match self {
            Granularity::Day => Duration::from_secs(99 * SECS_PER_DAY),
            Granularity::Hour => Duration::from_secs(SECS_PER_DAY),
            Granularity::Minute => Duration::from_secs(3_600),
            Granularity::Second => Duration::from_secs(60),
        }
    }

    /// Canonical name.
    pub fn name(self) -> &'static str {
        match self {
            Granularity::Day => "Day",
            Granularity::Hour => "Hour",
            Granularity::Minute => "Minute",
            Granularity::Second => "Second",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Granularity {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Granularity::ALL
            .into_iter()
            .find(|g| g.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| InputError::UnknownGranularity(s.to_string()))
    }
}

/// Message sent once when the countdown reaches zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndedMsg {
    /// Identifier of the countdown that ended.
    pub id: i64,
}

/// Computes the end moment of a configuration.
///
/// `target` takes precedence over `duration`; with neither, the countdown
/// lasts [`DEFAULT_DURATION`].
pub fn derive_end_moment(
    duration: Option<Duration>,
    target: Option<SystemTime>,
    now: SystemTime,
) -> SystemTime {
    match (target, duration) {
        (Some(target), _) => target,
        (None, Some(duration)) => now + duration,
        (None, None) => now + DEFAULT_DURATION,
    }
}

/// Configuration options for [`new`].
pub enum CountdownOption {
    /// Count down for a fixed duration from creation.
    WithDuration(Duration),
    /// Count down to an absolute moment.
    WithTarget(SystemTime),
    /// Units to render.
    WithGranularity(Granularity),
    /// Card animation length.
    WithFlipDuration(Duration),
    /// Card face style.
    WithCardStyle(Box<Style>),
    /// Label rendered after the day cards.
    WithDayLabel(String),
}

impl CountdownOption {
    fn apply(&self, m: &mut Model) {
        match self {
            CountdownOption::WithDuration(d) => m.duration = Some(*d),
            CountdownOption::WithTarget(t) => m.target = Some(*t),
            CountdownOption::WithGranularity(g) => m.granularity = *g,
            CountdownOption::WithFlipDuration(d) => m.flip_duration = *d,
            CountdownOption::WithCardStyle(style) => m.card_style = style.as_ref().clone(),
            CountdownOption::WithDayLabel(label) => m.day_label = label.clone(),
        }
    }
}

/// Sets the countdown duration.
pub fn with_duration(duration: Duration) -> CountdownOption {
    CountdownOption::WithDuration(duration)
}

/// Sets the target moment. Wins over [`with_duration`].
pub fn with_target(target: SystemTime) -> CountdownOption {
    CountdownOption::WithTarget(target)
}

/// Sets which units are rendered.
pub fn with_granularity(granularity: Granularity) -> CountdownOption {
    CountdownOption::WithGranularity(granularity)
}

/// Sets the card animation length.
pub fn with_flip_duration(duration: Duration) -> CountdownOption {
    CountdownOption::WithFlipDuration(duration)
}

/// Sets the card face style.
pub fn with_card_style(style: Style) -> CountdownOption {
    CountdownOption::WithCardStyle(Box::new(style))
}

/// Sets the label rendered after the day cards.
pub fn with_day_label(label: impl Into<String>) -> CountdownOption {
    CountdownOption::WithDayLabel(label.into())
}

/// Flip countdown widget.
pub struct Model {
    /// Units to render.
    pub granularity: Granularity,
    /// Label rendered after the day cards.
    pub day_label: String,
    /// Separator between hours, minutes and seconds.
    pub separator: String,
    flip_duration: Duration,
    card_style: Style,
    duration: Option<Duration>,
    target: Option<SystemTime>,
    initial: DigitString,
    cards: Vec<flipcard::Model>,
    engine: engine::Model,
    on_ended: Option<OnEndedFunc>,
    id: i64,
}

impl fmt::Debug for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("id", &self.id)
            .field("granularity", &self.granularity)
            .field("duration", &self.duration)
            .field("target", &self.target)
            .field("initial", &self.initial)
            .field("engine", &self.engine)
            .field("on_ended", &self.on_ended.is_some())
            .finish()
    }
}

impl Default for Model {
    fn default() -> Self {
        new(&[])
    }
}

impl Model {
    fn unconfigured() -> Self {
        let now = SystemTime::now();
        Self {
            granularity: Granularity::Day,
            day_label: "day".to_string(),
            separator: ":".to_string(),
            flip_duration: flipcard::DEFAULT_FLIP_DURATION,
            card_style: flipcard::default_style(),
            duration: None,
            target: None,
            initial: format_remaining(0),
            cards: Vec::new(),
            engine: engine::Model::new(now),
            on_ended: None,
            id: next_id(),
        }
    }

    /// Registers the completion callback.
    pub fn with_on_ended<F>(mut self, f: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        self.on_ended = Some(Box::new(f));
        self
    }

    /// Replaces the completion callback.
    pub fn set_on_ended(&mut self, f: Option<OnEndedFunc>) {
        self.on_ended = f;
    }

    /// Unique identifier of this countdown.
    pub fn id(&self) -> i64 {
        self.id
    }

    /// Configured duration, if any.
    pub fn duration(&self) -> Option<Duration> {
        self.duration
    }

    /// Configured target moment, if any.
    pub fn target(&self) -> Option<SystemTime> {
        self.target
    }

    /// The moment the current configuration counts down to.
    pub fn end_moment(&self) -> SystemTime {
        self.engine.end_moment()
    }

    /// Digits the cards were seeded with for the current configuration.
    pub fn initial_digits(&self) -> &DigitString {
        &self.initial
    }

    /// All eight cards, indexed by digit position.
    pub fn cards(&self) -> &[flipcard::Model] {
        &self.cards
    }

    /// The engine of the current configuration.
    pub fn engine(&self) -> &engine::Model {
        &self.engine
    }

    /// Whether the current configuration has finished.
    pub fn ended(&self) -> bool {
        self.engine.ended()
    }

    /// Digits for `now`, clamped at zero.
    pub fn digits_at(&self, now: SystemTime) -> DigitString {
        format_remaining(millis(self.engine.remaining(now)))
    }

    /// Starts the countdown.
    pub fn init(&mut self) -> Cmd {
        self.engine.start()
    }

    /// Applies a new configuration and restarts, sampling the clock once.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use flip_countdown::countdown::{new, Granularity};
    /// use flip_countdown::input::CountdownInput;
    /// use std::time::Duration;
    ///
    /// let mut countdown = new(&[]);
    /// let first_engine = countdown.engine().id();
    ///
    /// let input = CountdownInput::from_duration(Duration::from_secs(3), Granularity::Second);
    /// let _tick = countdown.configure(input);
    ///
    /// assert_ne!(countdown.engine().id(), first_engine);
    /// assert_eq!(countdown.granularity, Granularity::Second);
    /// assert!(countdown.engine().running());
    /// ```
    ///
    /// Typically called from `update` when the user submits new input:
    ///
    /// ```rust
    /// use bubbletea_rs::{Cmd, Model as BubbleTeaModel, Msg};
    /// use flip_countdown::countdown::{new, Model};
    /// use flip_countdown::input::CountdownInput;
    ///
    /// struct SubmitMsg(CountdownInput);
    ///
    /// struct App {
    ///     countdown: Model,
    /// }
    ///
    /// impl BubbleTeaModel for App {
    ///     fn init() -> (Self, Option<Cmd>) {
    ///         let mut countdown = new(&[]);
    ///         let cmd = countdown.init();
    ///         (Self { countdown }, Some(cmd))
    ///     }
    ///
    ///     fn update(&mut self, msg: Msg) -> Option<Cmd> {
    ///         if let Some(SubmitMsg(input)) = msg.downcast_ref::<SubmitMsg>() {
    ///             return Some(self.countdown.configure(*input));
    ///         }
    ///         self.countdown.update(msg)
    ///     }
    ///
    ///     fn view(&self) -> String {
    ///         self.countdown.view()
    ///     }
    /// }
    /// ```
    pub fn configure(&mut self, input: CountdownInput) -> Cmd {
        self.configure_at(input, SystemTime::now())
    }

    /// Applies a new configuration as of `now` and restarts.
    ///
    /// The old engine is stopped and its cards cancelled before anything new
    /// is created.
    pub fn configure_at(&mut self, input: CountdownInput, now: SystemTime) -> Cmd {
        self.stop();
        self.duration = input.duration;
        self.target = input.target;
        self.granularity = input.granularity;
        self.rebuild(now);
        log::debug!(
            "countdown {} reconfigured: engine {}, {} granularity",
            self.id,
            self.engine.id(),
            self.granularity
        );
        self.engine.start()
    }

    /// Stops the countdown. In-flight card animations finish immediately, so
    /// the cards keep showing the digits they were flipping to.
    pub fn stop(&mut self) {
        self.engine.stop();
        for card in &mut self.cards {
            card.cancel();
        }
    }

    fn rebuild(&mut self, now: SystemTime) {
        let end = derive_end_moment(self.duration, self.target, now);
        self.engine = engine::Model::new(end);
        self.initial = self.digits_at(now);
        self.cards = (0..DIGIT_COUNT)
            .map(|i| {
                flipcard::new()
                    .with_front(self.initial.digit(i).unwrap_or('0'))
                    .with_duration(self.flip_duration)
                    .with_style(self.card_style.clone())
            })
            .collect();
    }

    fn ended_cmd(&self) -> Cmd {
        let id = self.id;
        bubbletea_tick(Duration::from_nanos(1), move |_| {
            Box::new(EndedMsg { id }) as Msg
        })
    }

    /// Handles engine ticks and card completions.
    ///
    /// Returns an [`EndedMsg`] command the one time the countdown finishes.
    pub fn update(&mut self, msg: Msg) -> std::option::Option<Cmd> {
        if let Some(tick) = msg.downcast_ref::<TickMsg>() {
            return match self.engine.on_tick(tick, &mut self.cards) {
                TickOutcome::Ended => {
                    if let Some(on_ended) = self.on_ended.as_mut() {
                        on_ended();
                    }
                    Some(self.ended_cmd())
                }
                outcome => outcome.into_cmd(),
            };
        }

        if let Some(done) = msg.downcast_ref::<FlipDoneMsg>() {
            for card in &mut self.cards {
                if card.on_done(done) {
                    break;
                }
            }
        }

        None
    }

    /// Renders the visible units, most significant first.
    pub fn view(&self) -> String {
        let pairs = self.granularity.pairs().min(self.cards.len() / 2);
        let mut parts: Vec<String> = Vec::new();

        for unit in (0..pairs).rev() {
            parts.push(self.cards[unit * 2].view());
            parts.push(self.cards[unit * 2 + 1].view());
            match unit {
                3 => parts.push(format!(" {} ", self.day_label)),
                1 | 2 => parts.push(format!(" {} ", self.separator)),
                _ => {}
            }
        }

        let parts: Vec<&str> = parts.iter().map(String::as_str).collect();
        lipgloss::join_horizontal(lipgloss::CENTER, &parts)
    }
}

fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

impl BubbleTeaModel for Model {
    fn init() -> (Self, std::option::Option<Cmd>) {
        let mut model = Self::default();
        let cmd = Model::init(&mut model);
        (model, std::option::Option::Some(cmd))
    }

    fn update(&mut self, msg: Msg) -> std::option::Option<Cmd> {
        self.update(msg)
    }

    fn view(&self) -> String {
        self.view()
    }
}

/// Creates a countdown configured by `opts`, as of now. Call
/// [`Model::init`] to start it.
pub fn new(opts: &[CountdownOption]) -> Model {
    let mut m = Model::unconfigured();
    for opt in opts {
        opt.apply(&mut m);
    }
    m.rebuild(SystemTime::now());
    m
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;

    fn at(base: SystemTime, millis: u64) -> SystemTime {
        base + Duration::from_millis(millis)
    }

    fn input(duration: Option<u64>, granularity: Granularity) -> CountdownInput {
        CountdownInput {
            duration: duration.map(Duration::from_millis),
            target: None,
            granularity,
        }
    }

    fn tick(countdown: &mut Model, time: SystemTime) -> Option<Cmd> {
        let msg = countdown.engine().tick_msg_at(time);
        countdown.update(Box::new(msg))
    }

    fn counter() -> (Arc<AtomicUsize>, OnEndedFunc) {
        let count = Arc::new(AtomicUsize::new(0));
        let inner = Arc::clone(&count);
        let on_ended: OnEndedFunc = Box::new(move || {
            inner.fetch_add(1, Ordering::SeqCst);
        });
        (count, on_ended)
    }

    #[test]
    fn test_derive_end_moment_precedence() {
        let now = SystemTime::now();
        let target = at(now, 42_000);

        assert_eq!(
            derive_end_moment(Some(Duration::from_secs(1)), Some(target), now),
            target
        );
        assert_eq!(
            derive_end_moment(Some(Duration::from_secs(3)), None, now),
            at(now, 3000)
        );
        assert_eq!(derive_end_moment(None, None, now), now + DEFAULT_DURATION);
    }

    #[test]
    fn test_granularity_pairs_and_names() {
        assert_eq!(Granularity::default(), Granularity::Day);
        let pairs: Vec<usize> = Granularity::ALL.iter().map(|g| g.pairs()).collect();
        assert_eq!(pairs, vec![4, 3, 2, 1]);
        assert_eq!("minute".parse::<Granularity>().unwrap(), Granularity::Minute);
        assert_eq!(" Hour ".parse::<Granularity>().unwrap(), Granularity::Hour);
        assert_eq!(Granularity::Second.to_string(), "Second");
        assert!(matches!(
            "week".parse::<Granularity>(),
            Err(InputError::UnknownGranularity(_))
        ));
    }

    #[test]
    fn test_default_countdown_is_five_minutes() {
        let countdown = new(&[]);
        assert_eq!(countdown.granularity, Granularity::Day);
        assert_eq!(countdown.cards().len(), DIGIT_COUNT);
        assert_eq!(countdown.initial_digits().as_str(), "00050000");
    }

    #[test]
    fn test_configure_seeds_cards_from_one_clock_sample() {
        let now = SystemTime::now();
        let mut countdown = new(&[]);
        let _ = countdown.configure_at(input(Some(3000), Granularity::Second), now);

        assert_eq!(countdown.end_moment(), at(now, 3000));
        assert_eq!(countdown.initial_digits().as_str(), "03000000");
        let fronts: String = countdown.cards().iter().map(|c| c.front()).collect();
        assert_eq!(fronts, "03000000");
        assert!(countdown.engine().running());
    }

    #[test]
    fn test_target_wins_over_duration() {
        let now = SystemTime::now();
        let mut countdown = new(&[]);
        let config = CountdownInput {
            duration: Some(Duration::from_secs(5)),
            target: Some(at(now, 90_061_000)),
            granularity: Granularity::Day,
        };
        let _ = countdown.configure_at(config, now);

        assert_eq!(countdown.initial_digits().as_str(), "01010101");
    }

    #[test]
    fn test_three_second_countdown_end_to_end() {
        let now = SystemTime::now();
        let (count, on_ended) = counter();
        let mut countdown = new(&[]);
        countdown.set_on_ended(Some(on_ended));
        let _ = countdown.configure_at(input(Some(3000), Granularity::Second), now);

        // Immediate tick: "03" vs one second ago "04".
        assert!(tick(&mut countdown, now).is_some());
        assert_eq!(countdown.cards()[1].back(), '3');
        assert!(countdown.cards()[1].flipping());
        assert!(!countdown.cards()[0].flipping());

        // Let the animation commit before the next second.
        let done = countdown.cards()[1].done_msg();
        assert!(countdown.update(Box::new(done)).is_none());
        assert_eq!(countdown.cards()[1].front(), '3');
        assert!(!countdown.cards()[1].flipping());

        // One second later exactly one card flips 3 -> 2.
        let _ = tick(&mut countdown, at(now, 1000));
        let flipping: Vec<usize> = countdown
            .cards()
            .iter()
            .enumerate()
            .filter(|(_, c)| c.flipping())
            .map(|(i, _)| i)
            .collect();
        assert_eq!(flipping, vec![1]);
        assert_eq!(countdown.cards()[1].front(), '3');
        assert_eq!(countdown.cards()[1].back(), '2');

        let _ = tick(&mut countdown, at(now, 2000));
        assert_eq!(count.load(Ordering::SeqCst), 0);

        assert!(tick(&mut countdown, at(now, 3000)).is_some());
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(countdown.ended());

        // Further ticks never fire the callback again.
        assert!(tick(&mut countdown, at(now, 4000)).is_none());
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_reconfigure_drops_ticks_from_previous_engine() {
        let now = SystemTime::now();
        let (count, on_ended) = counter();
        let mut countdown = new(&[]);
        countdown.set_on_ended(Some(on_ended));
        let _ = countdown.configure_at(input(Some(2000), Granularity::Second), now);
        let stale = countdown.engine().tick_msg_at(at(now, 5000));
        let old_engine = countdown.engine().id();

        let _ = countdown.configure_at(input(Some(60_000), Granularity::Minute), now);
        assert_ne!(countdown.engine().id(), old_engine);

        // A tick scheduled by the first engine would have ended it.
        assert!(countdown.update(Box::new(stale)).is_none());
        assert_eq!(count.load(Ordering::SeqCst), 0);
        assert!(!countdown.ended());
        assert!(countdown.cards().iter().all(|c| !c.flipping()));
    }

    #[test]
    fn test_reconfigure_resets_cards() {
        let now = SystemTime::now();
        let mut countdown = new(&[]);
        let _ = countdown.configure_at(input(Some(10_000), Granularity::Second), now);
        let _ = tick(&mut countdown, now);
        let old_card = countdown.cards()[1].id();

        let _ = countdown.configure_at(input(Some(20_000), Granularity::Second), now);
        assert_ne!(countdown.cards()[1].id(), old_card);
        assert_eq!(countdown.initial_digits().as_str(), "20000000");
        assert!(countdown.cards().iter().all(|c| !c.flipping()));
    }

    #[test]
    fn test_hidden_cards_still_flip() {
        let now = SystemTime::now();
        let mut countdown = new(&[]);
        // 1 hour: minutes and hours change one second in.
        let _ = countdown.configure_at(input(Some(3_600_000), Granularity::Second), now);
        let _ = tick(&mut countdown, at(now, 1000));

        // "59590000" vs "00000100": hours units card flips although hidden.
        assert!(countdown.cards()[5].flipping());
        assert!(countdown.cards()[2].flipping());
    }

    #[test]
    fn test_stop_cancels_engine_and_cards() {
        let now = SystemTime::now();
        let mut countdown = new(&[]);
        let _ = countdown.configure_at(input(Some(10_000), Granularity::Second), now);
        let _ = tick(&mut countdown, now);
        let pending = countdown.engine().tick_msg_at(at(now, 1000));

        countdown.stop();
        assert!(!countdown.engine().running());
        assert!(countdown.cards().iter().all(|c| !c.flipping()));
        assert!(countdown.update(Box::new(pending)).is_none());
    }

    #[test]
    fn test_stop_mid_flip_keeps_current_digits() {
        let now = SystemTime::now();
        let mut countdown = new(&[]);
        let _ = countdown.configure_at(input(Some(10_000), Granularity::Second), now);
        // "10" vs one second ago "11": the units card is mid-flip.
        let _ = tick(&mut countdown, now);
        assert!(countdown.cards()[1].flipping());

        countdown.stop();

        let fronts: String = countdown.cards().iter().map(|c| c.front()).collect();
        assert_eq!(fronts, "10000000");
        assert_eq!(countdown.cards()[1].halves(), ('0', '0'));
        assert_eq!(countdown.cards()[0].halves(), ('1', '1'));
    }

    #[test]
    fn test_options_apply() {
        let now = SystemTime::now();
        let countdown = new(&[
            with_target(at(now, 3_600_000)),
            with_granularity(Granularity::Hour),
            with_flip_duration(Duration::from_millis(300)),
            with_day_label("d"),
        ]);

        assert_eq!(countdown.granularity, Granularity::Hour);
        assert_eq!(countdown.target(), Some(at(now, 3_600_000)));
        assert_eq!(countdown.end_moment(), at(now, 3_600_000));
        assert_eq!(countdown.day_label, "d");
        assert!(countdown
            .cards()
            .iter()
            .all(|c| c.duration == Duration::from_millis(300)));
    }

    #[test]
    fn test_view_renders_trailing_units() {
        let now = SystemTime::now();
        let mut countdown = new(&[]);
        let _ = countdown.configure_at(input(Some(90_061_000), Granularity::Day), now);
        let full = lipgloss::strip_ansi(&countdown.view());
        assert!(full.contains("day"));
        assert_eq!(full.matches(':').count(), 2);

        let _ = countdown.configure_at(input(Some(45_000), Granularity::Second), now);
        let seconds = lipgloss::strip_ansi(&countdown.view());
        assert!(!seconds.contains("day"));
        assert!(!seconds.contains(':'));
        assert!(seconds.contains('4'));
        assert!(seconds.contains('5'));
    }

    #[tokio::test]
    async fn test_init_produces_engine_tick() {
        let mut countdown = new(&[with_duration(Duration::from_secs(30))]);
        let msg = countdown.init().await.expect("init yields a tick");
        assert!(msg.downcast_ref::<TickMsg>().is_some());

        let next = countdown.update(msg);
        assert!(next.is_some());
    }
}
