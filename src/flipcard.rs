//! Flip card component for Bubble Tea applications.
//!
//! A flip card shows a single character on a split-flap face. Asking it to
//! flip swaps in a new face and, after a fixed animation duration, commits the
//! new face as the resting one. While a flip is in progress any further flip
//! request is rejected: commands are dropped, never queued.
//!
//! # Basic Usage
//!
//! ```rust
//! use flip_countdown::flipcard::{new, FlipDirection};
//!
//! let mut card = new().with_front('5');
//! assert_eq!(card.front(), '5');
//!
//! // The returned command resolves to a FlipDoneMsg once the animation ends.
//! let cmd = card.flip(FlipDirection::Down, '5', '4');
//! assert!(cmd.is_some());
//! assert!(card.flipping());
//!
//! // A second flip while the first is animating is dropped.
//! assert!(card.flip_down('4', '3').is_none());
//! ```
//!
//! # bubbletea-rs Integration
//!
//! Forward messages to the card so it can observe its own `FlipDoneMsg`:
//!
//! ```rust
//! use bubbletea_rs::{Cmd, Msg};
//! use flip_countdown::flipcard::Model;
//!
//! fn forward(card: &mut Model, msg: Msg) -> Option<Cmd> {
//!     card.update(msg)
//! }
//! ```

use bubbletea_rs::{tick as bubbletea_tick, Cmd, Model as BubbleTeaModel, Msg};
use lipgloss_extras::lipgloss::{self, Color, Style};
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

// Internal ID management for flip card instances
static LAST_ID: AtomicI64 = AtomicI64::new(0);

fn next_id() -> i64 {
    LAST_ID.fetch_add(1, Ordering::SeqCst) + 1
}

/// Animation length used when none is configured.
///
/// Renderers that animate the transition must use the same duration, otherwise
/// the logical commit and the visual transition drift apart.
pub const DEFAULT_FLIP_DURATION: Duration = Duration::from_millis(600);

/// Direction a card turns when flipping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlipDirection {
    /// The upper half falls forward, revealing the new face from the top.
    #[default]
    Down,
    /// The lower half rises, revealing the new face from the bottom.
    Up,
}

/// Coarse animation state of a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlipState {
    /// Resting on its front face; flips are accepted.
    Idle,
    /// Animating towards its back face; flips are rejected.
    Flipping,
}

/// Message sent when a flip animation has run its course.
///
/// Only the card whose `id` and current generation match will commit.
#[derive(Debug, Clone)]
pub struct FlipDoneMsg {
    /// Identifier of the card that scheduled this message.
    pub id: i64,
    tag: i64,
}

/// Capability a countdown engine uses to drive a card.
///
/// Returning `None` means the request was rejected because the card is busy.
/// On success the returned command must be run for the flip to complete.
pub trait FlipHandle {
    /// Requests a flip from `front` to `back` in `direction`.
    fn flip(&mut self, direction: FlipDirection, front: char, back: char) -> Option<Cmd>;
}

/// A single split-flap digit card.
#[derive(Debug, Clone)]
pub struct Model {
    /// How long a flip animates before the new face is committed.
    pub duration: Duration,
    /// Style applied to the card face.
    pub style: Style,
    front: char,
    back: char,
    direction: FlipDirection,
    flipping: bool,
    id: i64,
    tag: i64,
}

impl Default for Model {
    fn default() -> Self {
        Self::new()
    }
}

impl Model {
    /// Creates an idle card showing `'0'` with `'1'` behind it.
    pub fn new() -> Self {
        Self {
            duration: DEFAULT_FLIP_DURATION,
            style: default_style(),
            front: '0',
            back: '1',
            direction: FlipDirection::Down,
            flipping: false,
            id: next_id(),
            tag: 0,
        }
    }

    /// Sets the initial front face.
    pub fn with_front(mut self, front: char) -> Self {
        self.front = front;
        self
    }

    /// Sets the initial back face.
    pub fn with_back(mut self, back: char) -> Self {
        self.back = back;
        self
    }

    /// Sets the animation duration.
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Sets the face style.
    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Unique identifier of this card.
    pub fn id(&self) -> i64 {
        self.id
    }

    /// Face currently at rest (or being flipped away from).
    pub fn front(&self) -> char {
        self.front
    }

    /// Face being flipped towards.
    pub fn back(&self) -> char {
        self.back
    }

    /// Direction of the most recent flip.
    pub fn direction(&self) -> FlipDirection {
        self.direction
    }

    /// Whether an animation is in progress.
    pub fn flipping(&self) -> bool {
        self.flipping
    }

    /// Current animation state.
    pub fn state(&self) -> FlipState {
        if self.flipping {
            FlipState::Flipping
        } else {
            FlipState::Idle
        }
    }

    /// Starts a flip from `front` to `back`.
    ///
    /// Returns the command that completes the flip, or `None` if the card is
    /// already flipping, in which case nothing about the card changes.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use flip_countdown::flipcard::{new, FlipDirection, FlipState};
    ///
    /// let mut card = new().with_front('3');
    ///
    /// let cmd = card.flip(FlipDirection::Down, '4', '3');
    /// assert!(cmd.is_some());
    /// assert_eq!(card.state(), FlipState::Flipping);
    /// assert_eq!((card.front(), card.back()), ('4', '3'));
    ///
    /// // Busy: the request is dropped, not queued.
    /// assert!(card.flip(FlipDirection::Up, '3', '2').is_none());
    /// assert_eq!(card.back(), '3');
    /// ```
    ///
    /// Run the returned command and feed its message back through
    /// [`Model::update`] to commit the new face:
    ///
    /// ```rust
    /// use bubbletea_rs::{Cmd, Model as BubbleTeaModel, Msg};
    /// use flip_countdown::flipcard::Model;
    ///
    /// struct Digit {
    ///     card: Model,
    /// }
    ///
    /// impl BubbleTeaModel for Digit {
    ///     fn init() -> (Self, Option<Cmd>) {
    ///         let mut card = Model::new().with_front('9');
    ///         let cmd = card.flip_down('9', '8');
    ///         (Self { card }, cmd)
    ///     }
    ///
    ///     fn update(&mut self, msg: Msg) -> Option<Cmd> {
    ///         self.card.update(msg)
    ///     }
    ///
    ///     fn view(&self) -> String {
    ///         self.card.view()
    ///     }
    /// }
    /// ```
    pub fn flip(&mut self, direction: FlipDirection, front: char, back: char) -> Option<Cmd> {
        if self.flipping {
            log::trace!(
                "flip card {} busy, dropping flip {:?} {} -> {}",
                self.id,
                direction,
                front,
                back
            );
            return None;
        }

        self.front = front;
        self.back = back;
        self.direction = direction;
        self.flipping = true;
        self.tag += 1;

        Some(self.done_after())
    }

    /// Flips downwards from `front` to `back`.
    pub fn flip_down(&mut self, front: char, back: char) -> Option<Cmd> {
        self.flip(FlipDirection::Down, front, back)
    }

    /// Flips upwards from `front` to `back`.
    pub fn flip_up(&mut self, front: char, back: char) -> Option<Cmd> {
        self.flip(FlipDirection::Up, front, back)
    }

    /// Finishes an in-flight flip immediately.
    ///
    /// The back face is committed just as the pending `FlipDoneMsg` would have
    /// done, and that message becomes stale.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use flip_countdown::flipcard::{new, FlipState};
    ///
    /// let mut card = new();
    /// let _cmd = card.flip_down('1', '0');
    /// card.cancel();
    ///
    /// assert_eq!(card.state(), FlipState::Idle);
    /// assert_eq!(card.front(), '0');
    /// ```
    pub fn cancel(&mut self) {
        if self.flipping {
            self.front = self.back;
            self.flipping = false;
            self.tag += 1;
        }
    }

    /// Message that completes the current flip.
    pub fn done_msg(&self) -> FlipDoneMsg {
        FlipDoneMsg {
            id: self.id,
            tag: self.tag,
        }
    }

    fn done_after(&self) -> Cmd {
        let id = self.id;
        let tag = self.tag;
        bubbletea_tick(self.duration, move |_| Box::new(FlipDoneMsg { id, tag }) as Msg)
    }

    /// Handles `FlipDoneMsg` for this card; everything else is ignored.
    pub fn update(&mut self, msg: Msg) -> std::option::Option<Cmd> {
        if let Some(done) = msg.downcast_ref::<FlipDoneMsg>() {
            self.on_done(done);
        }
        None
    }

    /// Commits the back face if `msg` belongs to the current flip.
    ///
    /// Returns whether the message was accepted.
    pub fn on_done(&mut self, msg: &FlipDoneMsg) -> bool {
        if msg.id != self.id || msg.tag != self.tag || !self.flipping {
            return false;
        }
        self.front = self.back;
        self.flipping = false;
        true
    }

    /// Characters shown on the upper and lower halves right now.
    pub fn halves(&self) -> (char, char) {
        match (self.flipping, self.direction) {
            (false, _) => (self.front, self.front),
            (true, FlipDirection::Down) => (self.back, self.front),
            (true, FlipDirection::Up) => (self.front, self.back),
        }
    }

    /// Renders the card as a bordered split-flap face.
    pub fn view(&self) -> String {
        let (upper, lower) = self.halves();
        let hinge = if self.flipping { '╌' } else { '─' };
        self.style.render(&format!("{}\n{}\n{}", upper, hinge, lower))
    }
}

impl FlipHandle for Model {
    fn flip(&mut self, direction: FlipDirection, front: char, back: char) -> Option<Cmd> {
        Model::flip(self, direction, front, back)
    }
}

impl BubbleTeaModel for Model {
    fn init() -> (Self, std::option::Option<Cmd>) {
        (Self::new(), None)
    }

    fn update(&mut self, msg: Msg) -> std::option::Option<Cmd> {
        self.update(msg)
    }

    fn view(&self) -> String {
        self.view()
    }
}

/// Default card face: bold digit in a plain border.
pub fn default_style() -> Style {
    Style::new()
        .bold(true)
        .foreground(Color::from("#EEEEEE"))
        .border_style(lipgloss::normal_border())
        .border_top(true)
        .border_bottom(true)
        .border_left(true)
        .border_right(true)
        .padding(0, 1, 0, 1)
}

/// Creates a card with default settings.
pub fn new() -> Model {
    Model::new()
}
