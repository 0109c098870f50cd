// Acorn Hunt Schema - Shared content definitions
// Static data shapes consumed by the battle core: stat blocks, moves and their
// effect descriptors, combatant definitions, relics and skill nodes.

pub use moves::*;
pub use relics::*;
pub use roster::*;
pub use stats::*;
pub use status::*;

pub mod moves;
pub mod relics;
pub mod roster;
pub mod stats;
pub mod status;
