use crate::combatant::{Combatant, Side};
use crate::content::ContentLibrary;
use crate::rng::SeededRng;

/// Read-only view of the battle handed to effect resolution and AI.
///
/// Only the random stream is mutable; combatants are never changed through a
/// `MoveContext`.
pub struct MoveContext<'a> {
    pub combatants: &'a [Combatant],
    pub source: usize,
    pub round: u32,
    pub library: &'a ContentLibrary,
    pub rng: &'a mut SeededRng,
}

impl<'a> MoveContext<'a> {
    pub fn source(&self) -> &'a Combatant {
        let combatants: &'a [Combatant] = self.combatants;
        &combatants[self.source]
    }

    /// Living combatants on a side, in working-list order.
    pub fn living_on(&self, side: Side) -> impl Iterator<Item = &'a Combatant> + 'a {
        let combatants: &'a [Combatant] = self.combatants;
        combatants
            .iter()
            .filter(move |c| c.side == side && c.is_alive())
    }

    /// Living teammates of the source, optionally including the source itself.
    pub fn friends(&self, include_source: bool) -> Vec<&'a Combatant> {
        let source = self.source();
        self.living_on(source.side)
            .filter(|c| include_source || c.id != source.id)
            .collect()
    }

    pub fn foes(&self) -> Vec<&'a Combatant> {
        self.living_on(self.source().side.opponent()).collect()
    }
}
