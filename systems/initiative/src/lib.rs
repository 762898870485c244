#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Initiative scheduler deciding the order creatures act in each round.

use rand::Rng;
use skirmish_core::{Creature, CreatureId, Event, D20};
use tracing::debug;

/// Lifecycle of the scheduler.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SchedulerState {
    /// Constructed, no initiative rolled yet.
    Rolling,
    /// Initiative rolled, turns are being handed out.
    Active,
    /// The battle is over; no further turns are handed out.
    Terminated,
}

/// Single row of the initiative table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct InitiativeEntry {
    /// Creature that acts.
    pub creature: CreatureId,
    /// d20 roll plus the creature's initiative bonus.
    pub priority: i32,
}

/// Turn order rolled once per battle.
#[derive(Clone, Debug)]
pub struct InitiativeScheduler {
    state: SchedulerState,
    entries: Vec<InitiativeEntry>,
}

impl Default for InitiativeScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl InitiativeScheduler {
    /// Creates an empty scheduler waiting for initiative rolls.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: SchedulerState::Rolling,
            entries: Vec::new(),
        }
    }

    /// Rolls initiative for every creature and activates the scheduler.
    ///
    /// Creatures are rolled in iteration order and then stably sorted by
    /// descending priority, so equal priorities keep that order. One
    /// `InitiativeRolled` event is emitted per creature in the final order.
    /// Calling this again replaces the previous table.
    pub fn initialize<'a, I, R>(&mut self, creatures: I, rng: &mut R, out: &mut Vec<Event>)
    where
        I: IntoIterator<Item = &'a Creature>,
        R: Rng,
    {
        self.entries.clear();
        for creature in creatures {
            let roll = i32::try_from(rng.gen_range(1..=D20)).unwrap_or(0);
            let priority = roll.saturating_add(creature.stats().initiative_bonus);
            debug!(creature = creature.name(), roll, priority, "initiative rolled");
            self.entries.push(InitiativeEntry {
                creature: creature.id(),
                priority,
            });
        }

        self.entries
            .sort_by(|left, right| right.priority.cmp(&left.priority));

        out.reserve(self.entries.len());
        out.extend(self.entries.iter().map(|entry| Event::InitiativeRolled {
            creature: entry.creature,
            priority: entry.priority,
        }));

        self.state = SchedulerState::Active;
    }

    /// Entries in descending priority order.
    ///
    /// Yields nothing unless the scheduler is active. Each call starts over
    /// from the highest priority.
    pub fn order(&self) -> impl Iterator<Item = InitiativeEntry> + '_ {
        let entries: &[InitiativeEntry] = match self.state {
            SchedulerState::Active => &self.entries,
            SchedulerState::Rolling | SchedulerState::Terminated => &[],
        };
        entries.iter().copied()
    }

    /// Drops the creature from the table. Absent creatures are ignored.
    pub fn remove(&mut self, creature: CreatureId) {
        self.entries.retain(|entry| entry.creature != creature);
    }

    /// Stops handing out turns.
    pub fn terminate(&mut self) {
        self.state = SchedulerState::Terminated;
    }

    /// Priority rolled for the creature, if it is still scheduled.
    #[must_use]
    pub fn priority(&self, creature: CreatureId) -> Option<i32> {
        self.entries
            .iter()
            .find(|entry| entry.creature == creature)
            .map(|entry| entry.priority)
    }

    /// Number of scheduled creatures.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Reports whether no creature is scheduled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> SchedulerState {
        self.state
    }
}
