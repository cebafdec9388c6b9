//! Bundled teaching levels.
//!
//! Each level is a textual layout accepted by [`Arena::parse`](crate::Arena).
//! The set starts with the plain movement drill used by the demo scenarios
//! and adds one level per arena feature.

/// Names of the bundled levels, in teaching order.
pub const NAMES: [&str; 3] = ["level1", "level2", "level3"];

/// Plain movement drill: two steps right, one step down.
pub const LEVEL_1: &str = "\
#####
#s..#
###g#
#####
";

/// Conveyor belt pair that carries the robot over a hazard row.
pub const LEVEL_2: &str = "\
#######
#s.>>.#
#..x..#
#....g#
#######
";

/// Pressure plate guarding the last step to the goal.
pub const LEVEL_3: &str = "\
######
#s.!g#
######
";

/// Looks up a bundled level layout by name.
#[must_use]
pub fn by_name(name: &str) -> Option<&'static str> {
    match name {
        "level1" => Some(LEVEL_1),
        "level2" => Some(LEVEL_2),
        "level3" => Some(LEVEL_3),
        _ => None,
    }
}
