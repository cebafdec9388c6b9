//! ASCII frame rendering for applied robot states.

use gridbot_arena::Arena;
use gridbot_core::{CellKind, Feature, Movement, Position, RobotState, Terrain};

/// Renders the arena with the robot overlaid at its current position.
pub(crate) fn frame(arena: &Arena, state: &RobotState) -> String {
    let bounds = arena.bounds();
    let mut out = String::new();
    for row in 0..bounds.rows() as i32 {
        for col in 0..bounds.cols() as i32 {
            let position = Position::new(row, col);
            if state.position() == position {
                out.push(robot_glyph(state));
            } else {
                out.push(cell_glyph(arena.cell_at(position)));
            }
        }
        out.push('\n');
    }
    if let Some(text) = state.display_text() {
        out.push_str(text);
        out.push('\n');
    }
    out
}

const fn robot_glyph(state: &RobotState) -> char {
    if state.is_destroyed() {
        '*'
    } else {
        '@'
    }
}

const fn cell_glyph(kind: CellKind) -> char {
    match kind {
        CellKind::Empty => '.',
        CellKind::Wall => '#',
        CellKind::Goal => 'g',
        CellKind::Hazard => 'x',
        CellKind::Feature(Feature::Plate) => '!',
        CellKind::Feature(Feature::Conveyor(Movement::Right)) => '>',
        CellKind::Feature(Feature::Conveyor(Movement::Left)) => '<',
        CellKind::Feature(Feature::Conveyor(Movement::Up)) => '^',
        CellKind::Feature(Feature::Conveyor(Movement::Down)) => 'v',
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridbot_arena::{levels, query};

    #[test]
    fn frame_overlays_the_robot_on_the_grid() {
        let arena = Arena::parse(levels::LEVEL_1).expect("level1 parses");
        let spawn = query::spawn_state(&arena);
        assert_eq!(frame(&arena, &spawn), "#####\n#@..#\n###g#\n#####\n");
    }

    #[test]
    fn destroyed_robots_and_overlays_are_marked() {
        let arena = Arena::parse(levels::LEVEL_1).expect("level1 parses");
        let spawn = query::spawn_state(&arena);
        let crashed = spawn
            .moved(Movement::Up, &arena)
            .with_display("ouch");
        let rendered = frame(&arena, &crashed);
        assert!(rendered.contains('*'));
        assert!(rendered.ends_with("ouch\n"));
    }
}
