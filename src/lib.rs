#![warn(missing_docs)]
#![doc(html_root_url = "https://docs.rs/flip-countdown/")]

//! # flip-countdown
//!
//! A split-flap countdown component for [bubbletea-rs](https://github.com/joshka/bubbletea-rs)
//! applications. Remaining time is shown as flipping digit cards for days,
//! hours, minutes and seconds; a card animates only when its digit changes,
//! and completion is signalled exactly once.
//!
//! ## Overview
//!
//! Like the other bubbletea-rs components, every piece follows the Elm
//! Architecture with `init()`, `update()` and `view()`. Timers are plain
//! `tick` commands whose messages carry an instance id and a generation tag,
//! so stopping or reconfiguring a component makes its outstanding timers
//! harmless.
//!
//! ## Components
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`digits`] | Formats remaining milliseconds as an eight-digit string |
//! | [`flipcard`] | One animated card; rejects flips while animating |
//! | [`engine`] | Samples the clock once a second and flips changed cards |
//! | [`countdown`] | The widget: end moment, eight cards, engine and rendering |
//! | [`input`] | Parses and validates raw duration/target/granularity input |
//!
//! ## Integration with bubbletea-rs
//!
//! ```rust
//! use flip_countdown::prelude::*;
//! use bubbletea_rs::{Cmd, Model, Msg};
//! use std::time::{Duration, SystemTime};
//!
//! struct App {
//!     countdown: Countdown,
//! }
//!
//! impl Model for App {
//!     fn init() -> (Self, Option<Cmd>) {
//!         let mut countdown = countdown_new(&[]).with_on_ended(|| {
//!             // notify the user
//!         });
//!         let input = CountdownInput::parse("3000", "", "Second", SystemTime::now())
//!             .unwrap_or_default();
//!         let cmd = countdown.configure(input);
//!         (Self { countdown }, Some(cmd))
//!     }
//!
//!     fn update(&mut self, msg: Msg) -> Option<Cmd> {
//!         self.countdown.update(msg)
//!     }
//!
//!     fn view(&self) -> String {
//!         self.countdown.view()
//!     }
//! }
//! ```

pub mod countdown;
pub mod digits;
pub mod engine;
pub mod flipcard;
pub mod input;

pub use countdown::{
    derive_end_moment, new as countdown_new, with_card_style, with_day_label, with_duration,
    with_flip_duration, with_granularity, with_target, CountdownOption,
    EndedMsg as CountdownEndedMsg, Granularity, Model as Countdown, OnEndedFunc, DEFAULT_DURATION,
};
pub use digits::{format_remaining, DigitString, DIGIT_COUNT};
pub use engine::{
    FlipCommand, Model as CountdownEngine, Sample, TickMsg as CountdownTickMsg, TickOutcome,
    TimerHandle, TICK_INTERVAL,
};
pub use flipcard::{
    new as flipcard_new, FlipDirection, FlipDoneMsg, FlipHandle, FlipState, Model as FlipCard,
    DEFAULT_FLIP_DURATION,
};
pub use input::{CountdownInput, InputError};

/// Prelude module for convenient imports.
///
/// ```rust
/// use flip_countdown::prelude::*;
///
/// let card = flipcard_new();
/// assert_eq!(card.state(), FlipState::Idle);
/// ```
pub mod prelude {
    pub use crate::countdown::{
        new as countdown_new, with_duration, with_granularity, with_target,
        EndedMsg as CountdownEndedMsg, Granularity, Model as Countdown,
    };
    pub use crate::digits::{format_remaining, DigitString};
    pub use crate::engine::{Model as CountdownEngine, TickMsg as CountdownTickMsg};
    pub use crate::flipcard::{
        new as flipcard_new, FlipDirection, FlipDoneMsg, FlipHandle, FlipState, Model as FlipCard,
    };
    pub use crate::input::{CountdownInput, InputError};
}
