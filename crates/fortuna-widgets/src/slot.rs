//! Three-column slot machine drawing numbers without repeats.
//!
//! A spin draws all three numbers up front, then lets the columns cycle and
//! stop one after another on their draws:
//!
//! ```text
//! t = 0        all columns cycling
//! t = 3000     column 0 stops
//! t = 6000     column 1 stops
//! t = 9000     column 2 stops, result revealed, blinking starts
//! +6 × 300     blinking ends, result highlighted
//! +500         reset affordance shown
//! ```
//!
//! The start control stays disabled from the moment a spin starts until the
//! slot is reset, so a finished machine ignores further spins as well.

use crate::error::SlotError;
use fortuna_core::{CubicBezier, Easing, HistoryMode, Millis, SlotConfig, Timeline};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Number of columns.
pub const REEL_COUNT: usize = 3;
/// Cells on a column strip (the digits 0 to 9).
pub const REEL_CELLS: u32 = 10;

// =============================================================================
// Input parsing
// =============================================================================

/// Sign and digit run of the integer `text` starts with, after optional whitespace.
fn leading_integer(text: &str) -> (bool, &str) {
    let trimmed = text.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    (negative, &rest[..end])
}

/// Parse a range field the way a lenient number input reads.
///
/// Takes the leading integer after optional whitespace and sign; blank or
/// non-numeric text reads as `0`. Values outside `i32` are rejected.
///
/// ```
/// use fortuna_widgets::parse_bound;
///
/// assert_eq!(parse_bound("42"), Ok(42));
/// assert_eq!(parse_bound(" 12abc"), Ok(12));
/// assert_eq!(parse_bound(""), Ok(0));
/// assert_eq!(parse_bound("-3"), Ok(-3));
/// ```
pub fn parse_bound(input: &str) -> Result<i32, SlotError> {
    let (negative, digits) = leading_integer(input);
    if digits.is_empty() {
        return Ok(0);
    }
    let out_of_range = || SlotError::BoundOutOfRange {
        input: input.to_string(),
    };
    let magnitude: i64 = digits.parse().map_err(|_| out_of_range())?;
    let value = if negative { -magnitude } else { magnitude };
    i32::try_from(value).map_err(|_| out_of_range())
}

// =============================================================================
// History and results
// =============================================================================

/// Numbers drawn so far, in draw order, with constant-time membership.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotHistory {
    order: Vec<i32>,
    seen: HashSet<i32>,
}

impl SlotHistory {
    /// Empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `value` was drawn before.
    #[must_use]
    pub fn contains(&self, value: i32) -> bool {
        self.seen.contains(&value)
    }

    /// Record a draw. Fallback draws may repeat, so duplicates are kept in order.
    pub fn record(&mut self, value: i32) {
        self.order.push(value);
        self.seen.insert(value);
    }

    /// Draws in the order they were made.
    #[must_use]
    pub fn draws(&self) -> &[i32] {
        &self.order
    }

    /// Number of draws recorded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether nothing was drawn yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Forget every draw.
    pub fn clear(&mut self) {
        self.order.clear();
        self.seen.clear();
    }
}

/// The three draws of one spin and their composite number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotResult {
    /// Per-column draws
    pub draws: [i32; REEL_COUNT],
    /// Leading integer of the draws' decimal text written one after another
    pub value: i128,
}

impl SlotResult {
    /// Build from draws; `[1, 4, 9]` composes to `149`, `[0, 5, 9]` to `59`.
    ///
    /// The draws are written out as text and read back as one integer, so a
    /// minus sign past the first column ends the number: `[-5, 3, 2]` is
    /// `-532`, `[3, -5, 2]` is `3`.
    #[must_use]
    pub fn from_draws(draws: [i32; REEL_COUNT]) -> Self {
        let text: String = draws.iter().map(ToString::to_string).collect();
        let (negative, digits) = leading_integer(&text);
        // At most 30 digits, well inside i128.
        let magnitude = digits
            .bytes()
            .fold(0i128, |acc, b| acc * 10 + i128::from(b - b'0'));
        let value = if negative { -magnitude } else { magnitude };
        Self { draws, value }
    }

    /// Display text, zero-padded to at least three characters.
    #[must_use]
    pub fn display(&self) -> String {
        format!("{:03}", self.value)
    }
}

// =============================================================================
// Columns
// =============================================================================

/// Motion state of one column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ReelState {
    /// At rest at the top of the strip
    #[default]
    Idle,
    /// Cycling since the given time
    Spinning {
        /// Virtual time the column started
        since: Millis,
    },
    /// Stopped on a draw
    Stopped {
        /// The draw this column landed on
        value: i32,
    },
}

/// Vertical strip offset of a column, in pixels (negative moves the strip up).
///
/// A cycling column moves one cell per `step_ms` and wraps after the tenth
/// cell. A stopped column shows the last digit of its draw's magnitude.
#[must_use]
pub fn reel_offset(state: ReelState, now: Millis, step_ms: Millis, cell_height: f64) -> f64 {
    match state {
        ReelState::Idle => 0.0,
        ReelState::Spinning { since } => {
            let ticks = now.saturating_sub(since) / step_ms.max(1);
            if ticks == 0 {
                0.0
            } else {
                let cell = (ticks - 1) % u64::from(REEL_CELLS) + 1;
                -(cell as f64) * cell_height
            }
        }
        ReelState::Stopped { value } => {
            -f64::from(value.unsigned_abs() % REEL_CELLS) * cell_height
        }
    }
}

// =============================================================================
// Machine
// =============================================================================

/// Outcome of a start request that passed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpinStart {
    /// Columns are cycling toward this result
    Started(SlotResult),
    /// A spin is running or the machine awaits reset; nothing changed
    Busy,
}

/// Notifications emitted by the slot machine.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SlotEvent {
    /// A column stopped on its draw
    ColumnStopped {
        /// Column index
        column: usize,
        /// Draw shown
        value: i32,
        /// Final strip offset in pixels
        offset: f64,
    },
    /// The composite number is shown
    ResultRevealed {
        /// Composite value
        value: i128,
        /// Padded display text
        display: String,
    },
    /// The result blinked
    BlinkToggled {
        /// Whether the blink style is on
        on: bool,
    },
    /// Blinking finished; the result is highlighted
    Highlighted,
    /// The reset affordance is shown
    ResetAvailable,
    /// The modal was closed; the host may resume the wheels
    Closed,
}

/// Observable state of the machine, ready for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotView {
    /// Whether the modal is shown
    pub is_open: bool,
    /// Upper-cased prize title
    pub title: Option<String>,
    /// Whether the columns are still moving
    pub is_spinning: bool,
    /// Whether the start control accepts clicks
    pub start_enabled: bool,
    /// Strip offsets in pixels
    pub column_offsets: [f64; REEL_COUNT],
    /// Which columns have stopped
    pub column_stopped: [bool; REEL_COUNT],
    /// Result text, once revealed
    pub result_text: Option<String>,
    /// Blink style state
    pub blink_on: bool,
    /// Highlight style state
    pub highlighted: bool,
    /// Whether the reset affordance is shown
    pub reset_visible: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SlotTimer {
    StopColumn(usize),
    Blink(u32),
    ShowReset,
}

/// The slot machine widget.
#[derive(Debug)]
pub struct SlotMachine {
    config: SlotConfig,
    history: SlotHistory,
    rng: StdRng,
    timeline: Timeline<SlotTimer>,
    is_open: bool,
    title: Option<String>,
    is_spinning: bool,
    start_enabled: bool,
    result: Option<SlotResult>,
    reels: [ReelState; REEL_COUNT],
    result_visible: bool,
    blink_on: bool,
    highlighted: bool,
    reset_visible: bool,
}

impl Default for SlotMachine {
    fn default() -> Self {
        Self::new(SlotConfig::default())
    }
}

impl SlotMachine {
    /// Create a closed, idle machine.
    #[must_use]
    pub fn new(config: SlotConfig) -> Self {
        Self {
            config,
            history: SlotHistory::new(),
            rng: StdRng::from_entropy(),
            timeline: Timeline::new(),
            is_open: false,
            title: None,
            is_spinning: false,
            start_enabled: true,
            result: None,
            reels: [ReelState::Idle; REEL_COUNT],
            result_visible: false,
            blink_on: false,
            highlighted: false,
            reset_visible: false,
        }
    }

    /// Use a deterministic random source.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    // === Accessors ===

    /// Slot configuration.
    #[must_use]
    pub const fn config(&self) -> &SlotConfig {
        &self.config
    }

    /// Whether the columns are moving.
    #[must_use]
    pub const fn is_spinning(&self) -> bool {
        self.is_spinning
    }

    /// Whether a start request would be accepted.
    #[must_use]
    pub const fn start_enabled(&self) -> bool {
        self.start_enabled
    }

    /// Whether the modal is shown.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.is_open
    }

    /// Upper-cased prize title of the open modal.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Result of the current spin, known as soon as it starts.
    #[must_use]
    pub const fn result(&self) -> Option<SlotResult> {
        self.result
    }

    /// Every number drawn so far.
    #[must_use]
    pub const fn history(&self) -> &SlotHistory {
        &self.history
    }

    /// State of column `index`.
    #[must_use]
    pub fn reel(&self, index: usize) -> Option<ReelState> {
        self.reels.get(index).copied()
    }

    /// Virtual time of this machine.
    #[must_use]
    pub const fn now(&self) -> Millis {
        self.timeline.now()
    }

    /// Timing function of the settle transition when a column stops.
    #[must_use]
    pub const fn stop_easing(&self) -> Easing {
        Easing::Bezier(CubicBezier::REEL_STOP)
    }

    /// Snapshot for rendering.
    #[must_use]
    pub fn view(&self) -> SlotView {
        let now = self.timeline.now();
        SlotView {
            is_open: self.is_open,
            title: self.title.clone(),
            is_spinning: self.is_spinning,
            start_enabled: self.start_enabled,
            column_offsets: self.reels.map(|r| {
                reel_offset(r, now, self.config.reel_step_ms, self.config.cell_height)
            }),
            column_stopped: self.reels.map(|r| matches!(r, ReelState::Stopped { .. })),
            result_text: self
                .result
                .filter(|_| self.result_visible)
                .map(|r| r.display()),
            blink_on: self.blink_on,
            highlighted: self.highlighted,
            reset_visible: self.reset_visible,
        }
    }

    // === Operations ===

    /// Show the modal for `prize` and reset the machine.
    pub fn open(&mut self, prize: &str) {
        let title = prize.to_uppercase();
        log::info!("slot machine opened for {title}");
        self.title = Some(title);
        self.is_open = true;
        self.reset_slot();
    }

    /// Hide the modal and reset the machine.
    pub fn close(&mut self) -> SlotEvent {
        self.is_open = false;
        self.reset_slot();
        log::debug!("slot machine closed");
        SlotEvent::Closed
    }

    /// Start a spin from raw range field text.
    ///
    /// Busy machines ignore the request before the fields are read.
    pub fn start_spin_from_input(
        &mut self,
        start_text: &str,
        end_text: &str,
    ) -> Result<SpinStart, SlotError> {
        if !self.start_enabled {
            return Ok(SpinStart::Busy);
        }
        let start = parse_bound(start_text)?;
        let end = parse_bound(end_text)?;
        self.start_spin(start, end)
    }

    /// Draw three numbers from `[start, end]` and start the columns.
    ///
    /// Returns [`SpinStart::Busy`] without side effects while a spin runs or
    /// before [`reset_slot`](Self::reset_slot). Fails when `end <= start`,
    /// also without side effects.
    pub fn start_spin(&mut self, start: i32, end: i32) -> Result<SpinStart, SlotError> {
        if self.is_spinning || !self.start_enabled {
            return Ok(SpinStart::Busy);
        }
        if end <= start {
            log::warn!("rejected slot range {start}..={end}");
            return Err(SlotError::InvalidRange { start, end });
        }

        let result = SlotResult::from_draws(self.draw_unique(start, end));
        self.is_spinning = true;
        self.start_enabled = false;
        self.result = Some(result);

        let now = self.timeline.now();
        self.reels = [ReelState::Spinning { since: now }; REEL_COUNT];
        for column in 0..REEL_COUNT {
            let delay = self.config.stop_interval_ms * (column as u64 + 1);
            self.timeline
                .schedule_in(delay, SlotTimer::StopColumn(column));
        }

        log::debug!("slot spin started over {start}..={end}");
        Ok(SpinStart::Started(result))
    }

    fn draw_unique(&mut self, start: i32, end: i32) -> [i32; REEL_COUNT] {
        let range = i64::from(end) - i64::from(start) + 1;
        let mut draws = [0; REEL_COUNT];
        for (column, draw) in draws.iter_mut().enumerate() {
            let mut attempts = 0;
            let value = loop {
                let candidate = self.rng.gen_range(start..=end);
                attempts += 1;
                // Past the cap the candidate is discarded unchecked.
                if attempts > self.config.max_attempts {
                    let offset = column as i64 % range;
                    log::debug!("slot history saturated, falling back for column {column}");
                    break i32::try_from(i64::from(start) + offset).unwrap_or(end);
                }
                if !self.history.contains(candidate) {
                    break candidate;
                }
            };
            self.history.record(value);
            *draw = value;
        }
        draws
    }

    /// Advance this machine's clock by `dt` milliseconds, firing due transitions.
    pub fn advance(&mut self, dt: Millis) -> Vec<SlotEvent> {
        let target = self.timeline.now().saturating_add(dt);
        let mut events = Vec::new();
        while let Some(timer) = self.timeline.pop_due(target) {
            self.fire(timer, &mut events);
        }
        self.timeline.advance_to(target);
        events
    }

    fn fire(&mut self, timer: SlotTimer, events: &mut Vec<SlotEvent>) {
        match timer {
            SlotTimer::StopColumn(column) => self.stop_column(column, events),
            SlotTimer::Blink(toggle) => {
                self.blink_on = !self.blink_on;
                events.push(SlotEvent::BlinkToggled { on: self.blink_on });
                if toggle < self.config.blink_toggles {
                    self.timeline
                        .schedule_in(self.config.blink_interval_ms, SlotTimer::Blink(toggle + 1));
                } else {
                    self.blink_on = false;
                    self.highlighted = true;
                    events.push(SlotEvent::Highlighted);
                    self.timeline
                        .schedule_in(self.config.reset_delay_ms, SlotTimer::ShowReset);
                }
            }
            SlotTimer::ShowReset => {
                self.reset_visible = true;
                events.push(SlotEvent::ResetAvailable);
            }
        }
    }

    fn stop_column(&mut self, column: usize, events: &mut Vec<SlotEvent>) {
        let Some(result) = self.result else {
            return;
        };
        let value = result.draws[column];
        self.reels[column] = ReelState::Stopped { value };
        events.push(SlotEvent::ColumnStopped {
            column,
            value,
            offset: reel_offset(
                self.reels[column],
                self.timeline.now(),
                self.config.reel_step_ms,
                self.config.cell_height,
            ),
        });

        if column + 1 == REEL_COUNT {
            self.is_spinning = false;
            self.result_visible = true;
            log::info!("slot result: {}", result.display());
            events.push(SlotEvent::ResultRevealed {
                value: result.value,
                display: result.display(),
            });
            if self.config.blink_toggles == 0 {
                self.highlighted = true;
                events.push(SlotEvent::Highlighted);
                self.timeline
                    .schedule_in(self.config.reset_delay_ms, SlotTimer::ShowReset);
            } else {
                self.timeline
                    .schedule_in(self.config.blink_interval_ms, SlotTimer::Blink(1));
            }
        }
    }

    /// Return to the initial visual state and re-enable the start control.
    ///
    /// Pending transitions are cancelled. History survives unless the machine
    /// is configured with [`HistoryMode::PerSession`].
    pub fn reset_slot(&mut self) {
        self.timeline.cancel_all();
        self.is_spinning = false;
        self.start_enabled = true;
        self.result = None;
        self.reels = [ReelState::Idle; REEL_COUNT];
        self.result_visible = false;
        self.blink_on = false;
        self.highlighted = false;
        self.reset_visible = false;
        if self.config.history == HistoryMode::PerSession {
            self.history.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn machine() -> SlotMachine {
        SlotMachine::default().with_seed(11)
    }

    fn started(outcome: Result<SpinStart, SlotError>) -> SlotResult {
        match outcome {
            Ok(SpinStart::Started(result)) => result,
            other => panic!("spin did not start: {other:?}"),
        }
    }

    // =========================================================================
    // Parsing and composition
    // =========================================================================

    #[test]
    fn test_parse_bound() {
        assert_eq!(parse_bound("7"), Ok(7));
        assert_eq!(parse_bound("+7"), Ok(7));
        assert_eq!(parse_bound("  15 "), Ok(15));
        assert_eq!(parse_bound("3.9"), Ok(3));
        assert_eq!(parse_bound("abc"), Ok(0));
        assert_eq!(parse_bound("-"), Ok(0));
        assert_eq!(parse_bound("-0"), Ok(0));
        assert_eq!(parse_bound("-12"), Ok(-12));
        assert_eq!(parse_bound(" -4px"), Ok(-4));
        assert_eq!(parse_bound("-2147483648"), Ok(i32::MIN));
        assert!(matches!(
            parse_bound("2147483648"),
            Err(SlotError::BoundOutOfRange { .. })
        ));
        assert!(matches!(
            parse_bound("-99999999999"),
            Err(SlotError::BoundOutOfRange { .. })
        ));
    }

    #[test]
    fn test_composite_is_concatenation() {
        assert_eq!(SlotResult::from_draws([1, 4, 9]).value, 149);
        assert_eq!(SlotResult::from_draws([0, 5, 9]).value, 59);
        assert_eq!(SlotResult::from_draws([12, 0, 345]).value, 120_345);
        assert_eq!(SlotResult::from_draws([0, 0, 0]).value, 0);
    }

    #[test]
    fn test_negative_draws_compose_as_leading_integer() {
        assert_eq!(SlotResult::from_draws([-5, 3, 2]).value, -532);
        assert_eq!(SlotResult::from_draws([-1, -2, -3]).value, -1);
        assert_eq!(SlotResult::from_draws([3, -5, 2]).value, 3);
        assert_eq!(SlotResult::from_draws([0, -5, 2]).value, 0);
        assert_eq!(SlotResult::from_draws([-5, 3, 2]).display(), "-532");
        assert_eq!(SlotResult::from_draws([-5, -3, 2]).display(), "-05");
    }

    #[test]
    fn test_display_pads_to_three_digits() {
        assert_eq!(SlotResult::from_draws([0, 5, 9]).display(), "059");
        assert_eq!(SlotResult::from_draws([0, 0, 7]).display(), "007");
        assert_eq!(SlotResult::from_draws([10, 20, 30]).display(), "102030");
    }

    #[test]
    fn test_composite_of_largest_draws_fits() {
        let result = SlotResult::from_draws([i32::MAX; 3]);
        assert_eq!(result.display(), "214748364721474836472147483647");
        let result = SlotResult::from_draws([i32::MIN, 0, 0]);
        assert_eq!(result.value, -214_748_364_800);
    }

    #[test]
    fn test_reel_offset_cycles_and_wraps() {
        let spin = ReelState::Spinning { since: 0 };
        assert_eq!(reel_offset(spin, 0, 100, 60.0), 0.0);
        assert_eq!(reel_offset(spin, 100, 100, 60.0), -60.0);
        assert_eq!(reel_offset(spin, 1000, 100, 60.0), -600.0);
        assert_eq!(reel_offset(spin, 1100, 100, 60.0), -60.0);
        assert_eq!(reel_offset(ReelState::Stopped { value: 7 }, 0, 100, 60.0), -420.0);
        assert_eq!(reel_offset(ReelState::Stopped { value: 23 }, 0, 100, 60.0), -180.0);
        assert_eq!(reel_offset(ReelState::Stopped { value: -23 }, 0, 100, 60.0), -180.0);
        assert_eq!(reel_offset(ReelState::Idle, 5000, 100, 60.0), 0.0);
    }

    // =========================================================================
    // Validation and busy handling
    // =========================================================================

    #[test]
    fn test_invalid_range_mutates_nothing() {
        let mut slot = machine();
        assert_eq!(
            slot.start_spin(5, 5),
            Err(SlotError::InvalidRange { start: 5, end: 5 })
        );
        assert_eq!(
            slot.start_spin(10, 3),
            Err(SlotError::InvalidRange { start: 10, end: 3 })
        );
        assert!(!slot.is_spinning());
        assert!(slot.start_enabled());
        assert!(slot.history().is_empty());
        assert_eq!(slot.result(), None);
    }

    #[test]
    fn test_blank_inputs_are_rejected_as_range() {
        let mut slot = machine();
        assert_eq!(
            slot.start_spin_from_input("", ""),
            Err(SlotError::InvalidRange { start: 0, end: 0 })
        );
    }

    #[test]
    fn test_out_of_range_input_is_rejected() {
        let mut slot = machine();
        assert!(matches!(
            slot.start_spin_from_input("0", "3000000000"),
            Err(SlotError::BoundOutOfRange { .. })
        ));
        assert!(slot.history().is_empty());
        assert!(slot.start_enabled());
    }

    #[test]
    fn test_busy_while_spinning_and_until_reset() {
        let mut slot = machine();
        let first = started(slot.start_spin(0, 9));
        assert_eq!(slot.start_spin(0, 9), Ok(SpinStart::Busy));
        // Even bad input is ignored while busy.
        assert_eq!(slot.start_spin(9, 0), Ok(SpinStart::Busy));
        assert_eq!(slot.start_spin_from_input("x", "-1"), Ok(SpinStart::Busy));

        slot.advance(20_000);
        assert!(!slot.is_spinning());
        assert_eq!(slot.start_spin(0, 9), Ok(SpinStart::Busy));
        assert_eq!(slot.result(), Some(first));
        assert_eq!(slot.history().len(), 3);

        slot.reset_slot();
        started(slot.start_spin(0, 9));
    }

    // =========================================================================
    // Drawing
    // =========================================================================

    #[test]
    fn test_draws_are_in_range_and_recorded() {
        let mut slot = machine();
        let result = started(slot.start_spin_from_input("10", "20"));
        assert!(result.draws.iter().all(|d| (10..=20).contains(d)));
        assert_eq!(slot.history().draws(), result.draws);
    }

    #[test]
    fn test_negative_range_draws() {
        let mut slot = machine();
        let result = started(slot.start_spin_from_input("-5", "5"));
        assert!(result.draws.iter().all(|d| (-5..=5).contains(d)));
        assert_eq!(result, SlotResult::from_draws(result.draws));
        slot.reset_slot();

        let result = started(slot.start_spin(-30, -20));
        assert!(result.draws.iter().all(|d| (-30..=-20).contains(d)));
        assert!(result.value < 0);
        assert_eq!(slot.history().len(), 6);
    }

    #[test]
    fn test_full_signed_range_draws() {
        let mut slot = machine();
        let result = started(slot.start_spin(i32::MIN, i32::MAX));
        assert_eq!(slot.history().draws(), result.draws);
    }

    #[test]
    fn test_history_persists_across_resets() {
        let mut slot = machine();
        let mut seen = Vec::new();
        for _ in 0..3 {
            let result = started(slot.start_spin(1, 30));
            seen.extend(result.draws);
            slot.reset_slot();
        }
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), 9);
        assert_eq!(slot.history().len(), 9);
    }

    #[test]
    fn test_exhausted_range_falls_back() {
        let mut slot = machine();
        started(slot.start_spin(0, 2));
        slot.reset_slot();
        let result = started(slot.start_spin(0, 2));
        assert_eq!(result.draws, [0, 1, 2]);
        assert_eq!(slot.history().len(), 6);
    }

    #[test]
    fn test_attempt_cap_bounds_history_checks() {
        // With no attempts allowed, the first candidate is never accepted.
        let config = SlotConfig {
            max_attempts: 0,
            ..SlotConfig::default()
        };
        let mut slot = SlotMachine::new(config).with_seed(5);
        let result = started(slot.start_spin(10, 1000));
        assert_eq!(result.draws, [10, 11, 12]);
    }

    #[test]
    fn test_fallback_wraps_on_tiny_range() {
        let mut slot = machine();
        started(slot.start_spin(4, 5));
        slot.reset_slot();
        let result = started(slot.start_spin(4, 5));
        assert_eq!(result.draws, [4, 5, 4]);
    }

    #[test]
    fn test_per_session_history_clears_on_reset() {
        let config = SlotConfig {
            history: HistoryMode::PerSession,
            ..SlotConfig::default()
        };
        let mut slot = SlotMachine::new(config).with_seed(2);
        started(slot.start_spin(0, 50));
        assert_eq!(slot.history().len(), 3);
        slot.reset_slot();
        assert!(slot.history().is_empty());
    }

    // =========================================================================
    // Timeline
    // =========================================================================

    #[test]
    fn test_columns_stop_in_sequence() {
        let mut slot = machine();
        let result = started(slot.start_spin(0, 9));

        assert!(slot.advance(2999).is_empty());
        let events = slot.advance(1);
        assert_eq!(
            events,
            vec![SlotEvent::ColumnStopped {
                column: 0,
                value: result.draws[0],
                offset: -f64::from(result.draws[0]) * 60.0,
            }]
        );
        assert!(slot.is_spinning());

        let events = slot.advance(3000);
        assert!(matches!(events[0], SlotEvent::ColumnStopped { column: 1, .. }));
        assert!(slot.is_spinning());

        let events = slot.advance(3000);
        assert!(matches!(events[0], SlotEvent::ColumnStopped { column: 2, .. }));
        assert_eq!(
            events[1],
            SlotEvent::ResultRevealed {
                value: result.value,
                display: result.display(),
            }
        );
        assert!(!slot.is_spinning());
        assert!(!slot.start_enabled());
    }

    #[test]
    fn test_reveal_blinks_then_highlights() {
        let mut slot = machine();
        slot.start_spin(0, 9).unwrap();
        slot.advance(9000);

        let events = slot.advance(1800);
        let toggles: Vec<bool> = events
            .iter()
            .filter_map(|e| match e {
                SlotEvent::BlinkToggled { on } => Some(*on),
                _ => None,
            })
            .collect();
        assert_eq!(toggles, vec![true, false, true, false, true, false]);
        assert_eq!(events.last(), Some(&SlotEvent::Highlighted));
        assert!(!slot.view().reset_visible);

        assert!(slot.advance(499).is_empty());
        assert_eq!(slot.advance(1), vec![SlotEvent::ResetAvailable]);

        let view = slot.view();
        assert!(view.highlighted);
        assert!(!view.blink_on);
        assert!(view.reset_visible);
    }

    #[test]
    fn test_view_during_spin() {
        let mut slot = machine();
        slot.open("Grand prize");
        slot.start_spin(0, 9).unwrap();
        slot.advance(250);

        let view = slot.view();
        assert!(view.is_open);
        assert_eq!(view.title.as_deref(), Some("GRAND PRIZE"));
        assert_eq!(view.column_offsets, [-120.0; 3]);
        assert_eq!(view.column_stopped, [false; 3]);
        assert_eq!(view.result_text, None);
    }

    #[test]
    fn test_reset_mid_spin_cancels_stops() {
        let mut slot = machine();
        slot.start_spin(0, 9).unwrap();
        slot.advance(4000);
        slot.reset_slot();

        assert!(slot.advance(20_000).is_empty());
        let view = slot.view();
        assert_eq!(view.column_offsets, [0.0; 3]);
        assert!(view.start_enabled);
        assert_eq!(slot.history().len(), 3);
    }

    #[test]
    fn test_open_and_close() {
        let mut slot = machine();
        slot.open("car");
        assert!(slot.is_open());
        assert_eq!(slot.title(), Some("CAR"));

        slot.start_spin(0, 9).unwrap();
        assert_eq!(slot.close(), SlotEvent::Closed);
        assert!(!slot.is_open());
        assert!(!slot.is_spinning());
        assert!(slot.start_enabled());
    }

    proptest! {
        #[test]
        fn prop_no_repeats_until_exhausted(seed in any::<u64>(), start in -1000i32..1000, width in 9i32..40) {
            let end = start + width;
            let mut slot = SlotMachine::default().with_seed(seed);
            // Stay well below exhaustion so rejection sampling never gives up.
            let spins = (width + 1) / 6;
            for _ in 0..spins {
                let result = started(slot.start_spin(start, end));
                prop_assert!(result.draws.iter().all(|d| (start..=end).contains(d)));
                slot.reset_slot();
            }
            let mut draws = slot.history().draws().to_vec();
            let total = draws.len();
            draws.sort_unstable();
            draws.dedup();
            prop_assert_eq!(draws.len(), total);
        }

        #[test]
        fn prop_composite_matches_text(draws in proptest::array::uniform3(0i32..100_000)) {
            let text: String = draws.iter().map(ToString::to_string).collect();
            prop_assert_eq!(SlotResult::from_draws(draws).value, text.parse::<i128>().unwrap());
        }

        #[test]
        fn prop_negative_lead_negates_composite(lead in 1i32..100_000, rest in proptest::array::uniform2(0i32..100_000)) {
            let positive = SlotResult::from_draws([lead, rest[0], rest[1]]).value;
            prop_assert_eq!(SlotResult::from_draws([-lead, rest[0], rest[1]]).value, -positive);
        }
    }
}
