#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Static arena model for Gridbot.
//!
//! An [`Arena`] is parsed once from a textual layout and stays read-only for
//! the lifetime of a run. This crate also houses the arena-driven
//! [`StateMutations`] implementation: pressure plates stamp their message
//! before a landing settles, conveyors slide the robot after one.

pub mod levels;

use gridbot_core::{
    Bounds, CellKind, Feature, Movement, Position, RobotState, StateMutations, Terrain,
};
use thiserror::Error;

/// Overlay message stamped by a pressure plate.
pub const PLATE_MESSAGE: &str = "click";

/// Immutable grid of cells with a designated start position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Arena {
    cells: Vec<CellKind>,
    bounds: Bounds,
    start: Position,
}

impl Arena {
    /// Parses an arena from a textual layout.
    ///
    /// One character per cell, rows separated by newlines; blank lines are
    /// ignored and short rows are padded with walls. Symbols: `#` wall,
    /// `.` floor, `s` start, `g` goal, `x` hazard, `>` `<` `^` `v` conveyor,
    /// `!` pressure plate. Exactly one start cell is required.
    pub fn parse(layout: &str) -> Result<Self, ParseError> {
        let rows: Vec<&str> = layout
            .lines()
            .map(str::trim_end)
            .filter(|line| !line.is_empty())
            .collect();
        if rows.is_empty() {
            return Err(ParseError::EmptyLayout);
        }

        let cols = rows.iter().map(|line| line.chars().count()).max().unwrap_or(0);
        let mut cells = Vec::with_capacity(rows.len() * cols);
        let mut start = None;

        for (row, line) in rows.iter().enumerate() {
            let mut width = 0;
            for (col, symbol) in line.chars().enumerate() {
                let kind = match symbol {
                    '#' => CellKind::Wall,
                    '.' => CellKind::Empty,
                    'g' => CellKind::Goal,
                    'x' => CellKind::Hazard,
                    '>' => CellKind::Feature(Feature::Conveyor(Movement::Right)),
                    '<' => CellKind::Feature(Feature::Conveyor(Movement::Left)),
                    '^' => CellKind::Feature(Feature::Conveyor(Movement::Up)),
                    'v' => CellKind::Feature(Feature::Conveyor(Movement::Down)),
                    '!' => CellKind::Feature(Feature::Plate),
                    's' => {
                        if start.is_some() {
                            return Err(ParseError::DuplicateStart { row, col });
                        }
                        start = Some(Position::new(row as i32, col as i32));
                        CellKind::Empty
                    }
                    other => {
                        return Err(ParseError::UnknownSymbol {
                            symbol: other,
                            row,
                            col,
                        })
                    }
                };
                cells.push(kind);
                width += 1;
            }
            cells.resize(cells.len() + cols - width, CellKind::Wall);
        }

        let start = start.ok_or(ParseError::MissingStart)?;
        let arena = Self {
            cells,
            bounds: Bounds::new(rows.len() as u32, cols as u32),
            start,
        };
        log::debug!(
            "parsed arena: {} rows x {} cols, start at {}",
            arena.bounds.rows(),
            arena.bounds.cols(),
            arena.start
        );
        Ok(arena)
    }

    /// Cell the robot spawns on.
    #[must_use]
    pub const fn start(&self) -> Position {
        self.start
    }

    /// Mutation provider backed by this arena's feature cells.
    #[must_use]
    pub const fn mutations(&self) -> ArenaMutations<'_> {
        ArenaMutations { arena: self }
    }

    fn index(&self, position: Position) -> Option<usize> {
        if !self.bounds.contains(position) {
            return None;
        }
        let row = usize::try_from(position.row()).ok()?;
        let col = usize::try_from(position.col()).ok()?;
        let width = usize::try_from(self.bounds.cols()).ok()?;
        Some(row * width + col)
    }
}

impl Terrain for Arena {
    fn cell_at(&self, position: Position) -> CellKind {
        self.index(position)
            .and_then(|index| self.cells.get(index).copied())
            .unwrap_or(CellKind::Wall)
    }

    fn bounds(&self) -> Bounds {
        self.bounds
    }
}

/// Errors produced while parsing a textual layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The layout contained no cells.
    #[error("layout contains no cells")]
    EmptyLayout,
    /// The layout used a symbol outside the accepted vocabulary.
    #[error("unknown layout symbol '{symbol}' at row {row}, column {col}")]
    UnknownSymbol {
        /// Offending character.
        symbol: char,
        /// Zero-based row of the character.
        row: usize,
        /// Zero-based column of the character.
        col: usize,
    },
    /// No `s` cell marked the robot's start.
    #[error("layout does not mark a start cell")]
    MissingStart,
    /// More than one `s` cell marked a start.
    #[error("layout marks a second start cell at row {row}, column {col}")]
    DuplicateStart {
        /// Zero-based row of the second start.
        row: usize,
        /// Zero-based column of the second start.
        col: usize,
    },
}

/// [`StateMutations`] provider derived from an arena's feature cells.
#[derive(Clone, Copy, Debug)]
pub struct ArenaMutations<'a> {
    arena: &'a Arena,
}

impl StateMutations for ArenaMutations<'_> {
    fn before_move(&self, state: &RobotState) -> RobotState {
        if state.is_destroyed() || state.is_won() {
            return state.clone();
        }
        match self.arena.cell_at(state.position()) {
            CellKind::Feature(Feature::Plate)
                if state.display_text() != Some(PLATE_MESSAGE) =>
            {
                state.with_display(PLATE_MESSAGE)
            }
            _ => state.clone(),
        }
    }

    fn after_move(&self, state: &RobotState) -> RobotState {
        if state.is_destroyed() || state.is_won() {
            return state.clone();
        }
        match self.arena.cell_at(state.position()) {
            CellKind::Feature(Feature::Conveyor(direction)) => state.moved(direction, self.arena),
            _ => state.clone(),
        }
    }
}

/// Query functions that provide read-only access to the arena.
pub mod query {
    use super::Arena;
    use gridbot_core::{CellKind, Feature, Position, RobotState, Terrain};

    /// Initial robot snapshot at the arena's start cell.
    #[must_use]
    pub fn spawn_state(arena: &Arena) -> RobotState {
        RobotState::at(arena.start(), arena)
    }

    /// Positions of every goal cell, in row-major order.
    #[must_use]
    pub fn goal_cells(arena: &Arena) -> Vec<Position> {
        cells_of(arena, |kind| kind.is_goal())
    }

    /// Positions of every feature cell together with its feature.
    #[must_use]
    pub fn feature_cells(arena: &Arena) -> Vec<(Position, Feature)> {
        let mut features = Vec::new();
        for position in positions(arena) {
            if let CellKind::Feature(feature) = arena.cell_at(position) {
                features.push((position, feature));
            }
        }
        features
    }

    fn cells_of(arena: &Arena, keep: impl Fn(CellKind) -> bool) -> Vec<Position> {
        positions(arena)
            .filter(|position| keep(arena.cell_at(*position)))
            .collect()
    }

    fn positions(arena: &Arena) -> impl Iterator<Item = Position> + '_ {
        let bounds = arena.bounds();
        (0..bounds.rows() as i32)
            .flat_map(move |row| (0..bounds.cols() as i32).map(move |col| Position::new(row, col)))
    }
}
