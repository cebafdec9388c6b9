#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Robot state-transition engine for Gridbot.
//!
//! A [`Robot`] drives exactly one run: it expands each requested transition
//! into the ordered sequence of resulting snapshots (pre-mutations, the
//! transition itself, post-mutations, recursively), applies them one at a
//! time while recording history, and surfaces terminal conditions as
//! [`RunError`] values. The arena stays behind the read-only
//! [`Terrain`] seam and contributes effects only through a
//! [`StateMutations`] provider, so this crate depends on nothing but the
//! core contracts.

use gridbot_core::{
    Command, Movement, RobotState, RunError, StateMutations, StateSink, Terrain,
};

/// Engine for a single robot run.
///
/// Constructed with an initial snapshot, a mutation provider, and a sink;
/// [`Robot::apply_initial_state`] seeds the history with state #0, every
/// movement appends at least one further state, and the instance is
/// discarded when the run ends.
pub struct Robot<'a, T: Terrain> {
    arena: &'a T,
    mutations: &'a dyn StateMutations,
    sink: &'a mut dyn StateSink,
    initial: RobotState,
    current: RobotState,
    history: Vec<RobotState>,
}

impl<'a, T: Terrain> Robot<'a, T> {
    /// Creates an engine positioned on the initial snapshot with an empty
    /// history.
    pub fn new(
        initial: RobotState,
        arena: &'a T,
        mutations: &'a dyn StateMutations,
        sink: &'a mut dyn StateSink,
    ) -> Self {
        Self {
            arena,
            mutations,
            sink,
            current: initial.clone(),
            initial,
            history: Vec::new(),
        }
    }

    /// Installs state #0 without invoking the mutation hooks.
    pub fn apply_initial_state(&mut self) -> Result<(), RunError> {
        let state = self.initial.clone();
        self.apply_state(state)
    }

    /// Steps right the given number of times.
    pub fn right(&mut self, steps: u32) -> Result<(), RunError> {
        self.walk(Movement::Right, steps)
    }

    /// Steps left the given number of times.
    pub fn left(&mut self, steps: u32) -> Result<(), RunError> {
        self.walk(Movement::Left, steps)
    }

    /// Steps up the given number of times.
    pub fn up(&mut self, steps: u32) -> Result<(), RunError> {
        self.walk(Movement::Up, steps)
    }

    /// Steps down the given number of times.
    pub fn down(&mut self, steps: u32) -> Result<(), RunError> {
        self.walk(Movement::Down, steps)
    }

    /// Replaces the overlay text without moving.
    ///
    /// The update still travels through the expansion algorithm, so mutation
    /// providers may react to it like to any other transition.
    pub fn display(&mut self, text: impl Into<String>) -> Result<(), RunError> {
        let candidate = self.current.with_display(text);
        self.update_state(candidate)
    }

    /// Verifies that the run ended on the winning cell.
    ///
    /// Called once by the runner after the script returns normally; a robot
    /// resting anywhere else yields [`RunError::NotComplete`] carrying the
    /// full history.
    pub fn require_won(&self) -> Result<(), RunError> {
        if self.current.is_won() {
            Ok(())
        } else {
            Err(RunError::NotComplete {
                state: self.current.clone(),
                history: self.history.clone(),
            })
        }
    }

    /// Snapshot the robot currently rests on.
    #[must_use]
    pub const fn current_state(&self) -> &RobotState {
        &self.current
    }

    /// Every state applied so far, in applied order.
    #[must_use]
    pub fn history(&self) -> &[RobotState] {
        &self.history
    }

    fn walk(&mut self, movement: Movement, steps: u32) -> Result<(), RunError> {
        for _ in 0..steps {
            let candidate = self.current.moved(movement, self.arena);
            self.update_state(candidate)?;
        }
        Ok(())
    }

    fn update_state(&mut self, state: RobotState) -> Result<(), RunError> {
        let mut states = Vec::new();
        self.expand(state, &mut states);
        for state in states {
            self.apply_state(state)?;
        }
        Ok(())
    }

    /// Expands one candidate snapshot into the depth-first linearization of
    /// all chained effects.
    ///
    /// "Before" effects of a snapshot are fully expanded ahead of the
    /// snapshot itself, "after" effects fully expanded behind it. A hook
    /// returning its input unchanged is the fixed point that stops the
    /// recursion on that branch; there is no cycle or depth guard, so arena
    /// content must guarantee the fixed point is reached.
    fn expand(&self, state: RobotState, out: &mut Vec<RobotState>) {
        let before = self.mutations.before_move(&state);
        if before != state {
            self.expand(before, out);
        }
        let after = self.mutations.after_move(&state);
        let chained = after != state;
        out.push(state);
        if chained {
            self.expand(after, out);
        }
    }

    fn apply_state(&mut self, state: RobotState) -> Result<(), RunError> {
        self.sink.on_state_applied(&state);
        log::debug!("applied state {state}");
        self.history.push(state.clone());
        self.current = state;
        if self.current.is_destroyed() {
            return Err(RunError::Destroyed {
                state: self.current.clone(),
                history: self.history.clone(),
            });
        }
        Ok(())
    }
}

/// Interprets a command script against a live robot.
pub fn run_script<T: Terrain>(
    robot: &mut Robot<'_, T>,
    commands: &[Command],
) -> Result<(), RunError> {
    for command in commands {
        match command {
            Command::Right { steps } => robot.right(*steps)?,
            Command::Left { steps } => robot.left(*steps)?,
            Command::Up { steps } => robot.up(*steps)?,
            Command::Down { steps } => robot.down(*steps)?,
            Command::Display { text } => robot.display(text.clone())?,
        }
    }
    Ok(())
}

/// Runs one script from start to verdict.
///
/// Seeds the engine with the initial snapshot, hands the robot and arena to
/// the user script, and checks completion after the script returns normally.
/// A destroying step inside the script short-circuits straight to the
/// caller.
pub fn execute<T, F>(
    initial: RobotState,
    arena: &T,
    mutations: &dyn StateMutations,
    sink: &mut dyn StateSink,
    script: F,
) -> Result<(), RunError>
where
    T: Terrain,
    F: FnOnce(&mut Robot<'_, T>, &T) -> Result<(), RunError>,
{
    let mut robot = Robot::new(initial, arena, mutations, sink);
    robot.apply_initial_state()?;
    script(&mut robot, arena)?;
    robot.require_won()
}

/// Convenience wrapper running a command slice instead of a closure.
pub fn execute_commands<T: Terrain>(
    initial: RobotState,
    arena: &T,
    mutations: &dyn StateMutations,
    sink: &mut dyn StateSink,
    commands: &[Command],
) -> Result<(), RunError> {
    execute(initial, arena, mutations, sink, |robot, _arena| {
        run_script(robot, commands)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridbot_core::{Bounds, CellKind, DiscardSink, FnSink, NoMutations, Position};

    struct GridStub {
        bounds: Bounds,
        walls: Vec<Position>,
        goal: Option<Position>,
    }

    impl GridStub {
        fn open(rows: u32, cols: u32) -> Self {
            Self {
                bounds: Bounds::new(rows, cols),
                walls: Vec::new(),
                goal: None,
            }
        }
    }

    impl Terrain for GridStub {
        fn cell_at(&self, position: Position) -> CellKind {
            if !self.bounds.contains(position) || self.walls.contains(&position) {
                return CellKind::Wall;
            }
            if self.goal == Some(position) {
                return CellKind::Goal;
            }
            CellKind::Empty
        }

        fn bounds(&self) -> Bounds {
            self.bounds
        }
    }

    /// Provider scripted with explicit input/output pairs; anything not
    /// listed is a fixed point.
    #[derive(Default)]
    struct Scripted {
        before: Vec<(RobotState, RobotState)>,
        after: Vec<(RobotState, RobotState)>,
    }

    impl Scripted {
        fn lookup(pairs: &[(RobotState, RobotState)], state: &RobotState) -> RobotState {
            pairs
                .iter()
                .find(|(input, _)| input == state)
                .map_or_else(|| state.clone(), |(_, output)| output.clone())
        }
    }

    impl StateMutations for Scripted {
        fn before_move(&self, state: &RobotState) -> RobotState {
            Self::lookup(&self.before, state)
        }

        fn after_move(&self, state: &RobotState) -> RobotState {
            Self::lookup(&self.after, state)
        }
    }

    fn expansion(
        arena: &GridStub,
        mutations: &dyn StateMutations,
        state: RobotState,
    ) -> Vec<RobotState> {
        let mut sink = DiscardSink;
        let robot = Robot::new(state.clone(), arena, mutations, &mut sink);
        let mut out = Vec::new();
        robot.expand(state, &mut out);
        out
    }

    #[test]
    fn expansion_of_a_fixed_point_is_the_state_alone() {
        let arena = GridStub::open(1, 3);
        let state = RobotState::at(Position::new(0, 0), &arena);
        let states = expansion(&arena, &NoMutations, state.clone());
        assert_eq!(states, vec![state]);
    }

    #[test]
    fn expansion_orders_before_state_after() {
        let arena = GridStub::open(3, 3);
        let state = RobotState::at(Position::new(1, 1), &arena);
        let before = state.with_display("pre");
        let after = RobotState::at(Position::new(2, 1), &arena);
        let mutations = Scripted {
            before: vec![(state.clone(), before.clone())],
            after: vec![(state.clone(), after.clone())],
        };

        let states = expansion(&arena, &mutations, state.clone());
        assert_eq!(states, vec![before, state, after]);
    }

    #[test]
    fn expansion_recurses_through_chained_effects() {
        let arena = GridStub::open(4, 3);
        let state = RobotState::at(Position::new(1, 1), &arena);
        let after = RobotState::at(Position::new(2, 1), &arena);
        let after_again = RobotState::at(Position::new(3, 1), &arena);
        let mutations = Scripted {
            before: Vec::new(),
            after: vec![
                (state.clone(), after.clone()),
                (after.clone(), after_again.clone()),
            ],
        };

        let states = expansion(&arena, &mutations, state.clone());
        assert_eq!(states, vec![state, after, after_again]);
    }

    #[test]
    fn initial_state_skips_mutation_hooks() {
        let arena = GridStub::open(1, 3);
        let initial = RobotState::at(Position::new(0, 0), &arena);
        let mutations = Scripted {
            before: vec![(initial.clone(), initial.with_display("never"))],
            after: Vec::new(),
        };
        let mut sink = DiscardSink;
        let mut robot = Robot::new(initial.clone(), &arena, &mutations, &mut sink);

        robot.apply_initial_state().expect("initial state applies");
        assert_eq!(robot.history(), [initial]);
    }

    #[test]
    fn destroying_state_aborts_the_expanded_sequence() {
        let mut arena = GridStub::open(3, 2);
        arena.walls.push(Position::new(2, 0));
        let start = RobotState::at(Position::new(0, 0), &arena);
        let landing = start.moved(Movement::Down, &arena);
        let into_wall = landing.moved(Movement::Down, &arena);
        assert!(into_wall.is_destroyed());
        let beyond = into_wall.with_display("never applied");
        let mutations = Scripted {
            before: Vec::new(),
            after: vec![
                (landing.clone(), into_wall.clone()),
                (into_wall.clone(), beyond.clone()),
            ],
        };

        let mut applied = Vec::new();
        let mut sink = FnSink::new(|state: &RobotState| applied.push(state.clone()));
        let mut robot = Robot::new(start.clone(), &arena, &mutations, &mut sink);
        robot.apply_initial_state().expect("initial state applies");

        let error = robot.down(1).expect_err("expanded wall state destroys");
        match &error {
            RunError::Destroyed { state, history } => {
                assert_eq!(state, &into_wall);
                assert_eq!(history.as_slice(), [start, landing, into_wall.clone()]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        // The chained state behind the destroying one was never applied.
        assert_eq!(applied.len(), 3);
        assert!(!applied.contains(&beyond));
    }

    #[test]
    fn remaining_repeats_never_run_after_destruction() {
        let arena = GridStub::open(1, 3);
        let initial = RobotState::at(Position::new(0, 0), &arena);
        let mut sink = DiscardSink;
        let mut robot = Robot::new(initial, &arena, &NoMutations, &mut sink);
        robot.apply_initial_state().expect("initial state applies");

        let error = robot.right(5).expect_err("third step leaves the grid");
        match &error {
            RunError::Destroyed { state, history } => {
                assert_eq!(state.position(), Position::new(0, 3));
                // Initial state plus two legal steps plus the destroying one.
                assert_eq!(history.len(), 4);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(robot.history().len(), 4);
    }

    #[test]
    fn history_matches_sink_notifications_in_order() {
        let arena = GridStub::open(2, 3);
        let initial = RobotState::at(Position::new(0, 0), &arena);
        let mut applied = Vec::new();
        let mut sink = FnSink::new(|state: &RobotState| applied.push(state.clone()));
        let mut robot = Robot::new(initial, &arena, &NoMutations, &mut sink);

        robot.apply_initial_state().expect("initial state applies");
        robot.right(2).expect("two steps right stay on the grid");
        robot.down(1).expect("one step down stays on the grid");
        robot.display("done").expect("display applies");

        let history = robot.history().to_vec();
        let overlay = robot.current_state().display_text().map(str::to_owned);
        assert_eq!(history.len(), 5);
        assert_eq!(overlay.as_deref(), Some("done"));
        assert_eq!(applied, history);
    }

    #[test]
    fn display_travels_through_the_expansion() {
        let arena = GridStub::open(2, 2);
        let initial = RobotState::at(Position::new(0, 0), &arena);
        let labelled = initial.with_display("go");
        let nudged = labelled.moved(Movement::Down, &arena);
        let mutations = Scripted {
            before: Vec::new(),
            after: vec![(labelled.clone(), nudged.clone())],
        };
        let mut sink = DiscardSink;
        let mut robot = Robot::new(initial, &arena, &mutations, &mut sink);
        robot.apply_initial_state().expect("initial state applies");

        robot.display("go").expect("display applies");
        assert_eq!(robot.current_state(), &nudged);
        assert_eq!(robot.history().len(), 3);
    }

    #[test]
    fn require_won_reports_not_complete_until_goal_reached() {
        let mut arena = GridStub::open(1, 2);
        arena.goal = Some(Position::new(0, 1));
        let initial = RobotState::at(Position::new(0, 0), &arena);
        let mut sink = DiscardSink;
        let mut robot = Robot::new(initial.clone(), &arena, &NoMutations, &mut sink);
        robot.apply_initial_state().expect("initial state applies");

        let error = robot.require_won().expect_err("start cell is not the goal");
        match &error {
            RunError::NotComplete { state, history } => {
                assert_eq!(state, &initial);
                assert_eq!(history.as_slice(), [initial]);
            }
            other => panic!("unexpected error: {other:?}"),
        }

        robot.right(1).expect("goal cell is walkable");
        robot.require_won().expect("robot rests on the goal");
    }

    #[test]
    fn run_script_interprets_every_command() {
        let mut arena = GridStub::open(3, 3);
        arena.goal = Some(Position::new(2, 2));
        let initial = RobotState::at(Position::new(0, 0), &arena);
        let mut sink = DiscardSink;
        let mut robot = Robot::new(initial, &arena, &NoMutations, &mut sink);
        robot.apply_initial_state().expect("initial state applies");

        let commands = [
            Command::Right { steps: 2 },
            Command::Down { steps: 2 },
            Command::Display {
                text: "arrived".to_owned(),
            },
        ];
        run_script(&mut robot, &commands).expect("script stays on the grid");

        assert_eq!(robot.current_state().position(), Position::new(2, 2));
        assert_eq!(robot.current_state().display_text(), Some("arrived"));
        robot.require_won().expect("script ends on the goal");
    }
}
