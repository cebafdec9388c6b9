#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Gridbot engine.
//!
//! This crate defines the value types and seams that connect the arena, the
//! robot engine, and adapters. The engine consumes a read-only [`Terrain`],
//! asks a [`StateMutations`] provider for arena-driven state rewrites, and
//! reports every applied [`RobotState`] to a [`StateSink`]. Terminal outcomes
//! travel as [`RunError`] values rather than panics, so runners and test
//! harnesses inspect them like any other result.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Location of a single grid cell expressed as row and column indices.
///
/// Coordinates are signed so that candidate positions outside the arena stay
/// representable; the [`Terrain`] contract resolves those to a destroying
/// cell instead of rejecting them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    row: i32,
    col: i32,
}

impl Position {
    /// Creates a new grid position.
    #[must_use]
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Zero-based row index of the position.
    #[must_use]
    pub const fn row(&self) -> i32 {
        self.row
    }

    /// Zero-based column index of the position.
    #[must_use]
    pub const fn col(&self) -> i32 {
        self.col
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Cardinal movement directions available to the robot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Movement {
    /// Movement toward decreasing row indices.
    Up,
    /// Movement toward increasing row indices.
    Down,
    /// Movement toward decreasing column indices.
    Left,
    /// Movement toward increasing column indices.
    Right,
}

impl Movement {
    /// Fixed `(row, col)` offset contributed by one step of this movement.
    #[must_use]
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Self::Up => (-1, 0),
            Self::Down => (1, 0),
            Self::Left => (0, -1),
            Self::Right => (0, 1),
        }
    }

    /// Applies the movement offset to the provided position.
    #[must_use]
    pub const fn apply(self, position: Position) -> Position {
        let (row_delta, col_delta) = self.offset();
        Position::new(position.row() + row_delta, position.col() + col_delta)
    }
}

/// Dimensions of an arena grid measured in whole cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Bounds {
    rows: u32,
    cols: u32,
}

impl Bounds {
    /// Creates a new bounds descriptor with explicit dimensions.
    #[must_use]
    pub const fn new(rows: u32, cols: u32) -> Self {
        Self { rows, cols }
    }

    /// Number of rows contained in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of columns contained in the grid.
    #[must_use]
    pub const fn cols(&self) -> u32 {
        self.cols
    }

    /// Reports whether the provided position falls inside the grid.
    #[must_use]
    pub fn contains(&self, position: Position) -> bool {
        let row_inside = u32::try_from(position.row()).map_or(false, |row| row < self.rows);
        let col_inside = u32::try_from(position.col()).map_or(false, |col| col < self.cols);
        row_inside && col_inside
    }
}

/// Arena feature that rewrites robot states around a move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Feature {
    /// Pressure plate that stamps an overlay message before the robot
    /// settles on it.
    Plate,
    /// Conveyor that slides the robot one further cell after it lands.
    Conveyor(Movement),
}

/// Semantics of a single arena cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CellKind {
    /// Plain walkable floor.
    Empty,
    /// Impassable wall; entering it destroys the robot.
    Wall,
    /// Winning cell the script must reach.
    Goal,
    /// Walkable-looking trap; entering it destroys the robot.
    Hazard,
    /// Walkable cell that triggers an arena feature.
    Feature(Feature),
}

impl CellKind {
    /// Reports whether a robot entering this cell is destroyed.
    #[must_use]
    pub const fn is_destroying(self) -> bool {
        matches!(self, Self::Wall | Self::Hazard)
    }

    /// Reports whether this cell completes the level.
    #[must_use]
    pub const fn is_goal(self) -> bool {
        matches!(self, Self::Goal)
    }
}

/// Read-only arena contract consumed by the engine.
pub trait Terrain {
    /// Resolves the cell kind at the provided position.
    ///
    /// Positions outside [`Terrain::bounds`] resolve to [`CellKind::Wall`] so
    /// that stepping off the grid destroys the robot like any wall does.
    fn cell_at(&self, position: Position) -> CellKind;

    /// Dimensions of the arena grid.
    fn bounds(&self) -> Bounds;
}

/// Immutable snapshot of the robot at one point in a run.
///
/// States are values: every transition produces a new snapshot and leaves its
/// input untouched. Structural equality between snapshots is what the
/// engine's fixed-point checks rely on.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RobotState {
    position: Position,
    display_text: Option<String>,
    is_won: bool,
    is_destroyed: bool,
}

impl RobotState {
    /// Creates a snapshot at the provided position with flags derived from
    /// the terrain cell underneath it.
    #[must_use]
    pub fn at<T: Terrain + ?Sized>(position: Position, terrain: &T) -> Self {
        let kind = terrain.cell_at(position);
        Self {
            position,
            display_text: None,
            is_won: kind.is_goal(),
            is_destroyed: kind.is_destroying(),
        }
    }

    /// Returns the snapshot produced by one movement step.
    ///
    /// The landing cell is looked up in the terrain and the terminal flags
    /// recomputed from it; an illegal step simply yields a destroyed snapshot
    /// instead of failing. The overlay text carries forward unchanged.
    #[must_use]
    pub fn moved<T: Terrain + ?Sized>(&self, movement: Movement, terrain: &T) -> Self {
        let position = movement.apply(self.position);
        let kind = terrain.cell_at(position);
        Self {
            position,
            display_text: self.display_text.clone(),
            is_won: kind.is_goal(),
            is_destroyed: kind.is_destroying(),
        }
    }

    /// Returns a copy of the snapshot with the overlay text replaced.
    #[must_use]
    pub fn with_display(&self, text: impl Into<String>) -> Self {
        Self {
            display_text: Some(text.into()),
            ..self.clone()
        }
    }

    /// Grid position occupied by the robot.
    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Overlay text shown alongside the robot, if any.
    #[must_use]
    pub fn display_text(&self) -> Option<&str> {
        self.display_text.as_deref()
    }

    /// Whether the robot rests on the winning cell.
    #[must_use]
    pub const fn is_won(&self) -> bool {
        self.is_won
    }

    /// Whether the robot has been destroyed.
    #[must_use]
    pub const fn is_destroyed(&self) -> bool {
        self.is_destroyed
    }
}

impl fmt::Display for RobotState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.position)?;
        if let Some(text) = &self.display_text {
            write!(f, " \"{text}\"")?;
        }
        if self.is_won {
            write!(f, " won")?;
        }
        if self.is_destroyed {
            write!(f, " destroyed")?;
        }
        Ok(())
    }
}

/// Script commands that express all permissible robot instructions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Step right the given number of times.
    Right {
        /// Number of single steps to take.
        steps: u32,
    },
    /// Step left the given number of times.
    Left {
        /// Number of single steps to take.
        steps: u32,
    },
    /// Step up the given number of times.
    Up {
        /// Number of single steps to take.
        steps: u32,
    },
    /// Step down the given number of times.
    Down {
        /// Number of single steps to take.
        steps: u32,
    },
    /// Replace the robot's overlay text without moving.
    Display {
        /// Text to show alongside the robot.
        text: String,
    },
}

/// Provider of arena-driven state rewrites around a move.
///
/// Both hooks must be pure and deterministic for a given snapshot and arena.
/// Returning a snapshot structurally equal to the input means "no effect";
/// anything else is treated as a chained effect and re-expanded by the
/// engine until a fixed point is reached. Arena content must guarantee that
/// fixed point: the engine does not detect mutation cycles, and a layout
/// whose effects feed each other forever recurses without bound.
pub trait StateMutations {
    /// Rewrite recorded as happening before the candidate state settles.
    fn before_move(&self, state: &RobotState) -> RobotState;

    /// Rewrite applied after the candidate state has settled.
    fn after_move(&self, state: &RobotState) -> RobotState;
}

/// Provider for arenas without features; both hooks are identity.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoMutations;

impl StateMutations for NoMutations {
    fn before_move(&self, state: &RobotState) -> RobotState {
        state.clone()
    }

    fn after_move(&self, state: &RobotState) -> RobotState {
        state.clone()
    }
}

/// Collaborator notified of every applied state, in expansion order.
///
/// The engine calls the sink synchronously, exactly once per applied state,
/// before running its own destroyed check. Scheduling the notification onto
/// a UI thread or animation clock is the host's concern.
pub trait StateSink {
    /// Invoked after the engine applies `state`.
    fn on_state_applied(&mut self, state: &RobotState);
}

/// Adapter that lets a plain closure serve as a [`StateSink`].
pub struct FnSink<F>(F);

impl<F> FnSink<F>
where
    F: FnMut(&RobotState),
{
    /// Wraps the provided closure.
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F> StateSink for FnSink<F>
where
    F: FnMut(&RobotState),
{
    fn on_state_applied(&mut self, state: &RobotState) {
        (self.0)(state);
    }
}

/// Sink that ignores every notification.
#[derive(Clone, Copy, Debug, Default)]
pub struct DiscardSink;

impl StateSink for DiscardSink {
    fn on_state_applied(&mut self, _state: &RobotState) {}
}

/// Terminal outcome of a failed run, carrying the full applied history.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RunError {
    /// An applied state had its destroyed flag set; the run is over.
    #[error("robot is destroyed, state={state}, history:\n{}", format_history(.history))]
    Destroyed {
        /// Snapshot that destroyed the robot.
        state: RobotState,
        /// Every applied state up to and including the destroying one.
        history: Vec<RobotState>,
    },
    /// The script finished without the robot resting on the winning cell.
    #[error("level is not completed, state={state}, history:\n{}", format_history(.history))]
    NotComplete {
        /// Snapshot the script finished on.
        state: RobotState,
        /// Every state applied during the run.
        history: Vec<RobotState>,
    },
}

impl RunError {
    /// Final snapshot carried by the failure.
    #[must_use]
    pub fn state(&self) -> &RobotState {
        match self {
            Self::Destroyed { state, .. } | Self::NotComplete { state, .. } => state,
        }
    }

    /// Ordered history of every state applied before the failure.
    #[must_use]
    pub fn history(&self) -> &[RobotState] {
        match self {
            Self::Destroyed { history, .. } | Self::NotComplete { history, .. } => history,
        }
    }
}

fn format_history(history: &[RobotState]) -> String {
    let entries: Vec<String> = history.iter().map(|state| format!("({state})")).collect();
    entries.join(" ->\n")
}
