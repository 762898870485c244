#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Battle loop tying the arena, the initiative scheduler and the combat
//! resolver together.
//!
//! A [`Battle`] owns both rosters, the arena and the random number generator.
//! Each round hands every scheduled creature one action. After every action
//! the dead are swept from their roster, the scheduler and the grid, and the
//! win condition is checked so the battle stops the moment one side falls.

use rand::Rng;
use skirmish_core::{
    Action, BattleState, Creature, CreatureId, DrawReason, Event, Roster, SetupError, TeamId,
};
use skirmish_system_combat::{CombatResolver, ToHitRule};
use skirmish_system_initiative::{InitiativeEntry, InitiativeScheduler};
use skirmish_world::{Arena, ArenaConfig};
use tracing::{debug, info, warn};

/// Number of rounds after which an undecided battle is declared a draw.
pub const DEFAULT_ROUND_CAP: u32 = 200;

/// Parameters of a battle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BattleConfig {
    /// Layout of the arena the teams spawn into.
    pub arena: ArenaConfig,
    /// Last round played before the battle ends in a draw.
    pub round_cap: u32,
    /// Whose attack bonus is added during armor checks.
    pub to_hit: ToHitRule,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            arena: ArenaConfig::default(),
            round_cap: DEFAULT_ROUND_CAP,
            to_hit: ToHitRule::default(),
        }
    }
}

/// A battle between team A and team B.
#[derive(Debug)]
pub struct Battle<R> {
    arena: Arena,
    team_a: Roster,
    team_b: Roster,
    fallen: Vec<Creature>,
    scheduler: InitiativeScheduler,
    resolver: CombatResolver,
    round_cap: u32,
    round: u32,
    state: BattleState,
    rng: R,
}

impl<R: Rng> Battle<R> {
    /// Spawns both teams on a fresh arena and rolls initiative.
    ///
    /// `team_a` must hold team A creatures and `team_b` team B creatures.
    pub fn new(
        mut team_a: Roster,
        mut team_b: Roster,
        config: BattleConfig,
        mut rng: R,
        out: &mut Vec<Event>,
    ) -> Result<Self, SetupError> {
        validate_rosters(&team_a, &team_b)?;

        let mut arena = Arena::new(&config.arena)?;
        arena.spawn_teams(&mut team_a, &mut team_b, &mut rng, out)?;

        Ok(Self::assemble(arena, team_a, team_b, &config, rng, out))
    }

    /// Starts a battle on an arena where every creature is already placed.
    ///
    /// Each creature's cell is taken from the arena, which must hold no
    /// other creatures. A `CreaturePlaced` event is emitted per creature,
    /// team A first.
    pub fn with_arena(
        arena: Arena,
        mut team_a: Roster,
        mut team_b: Roster,
        config: BattleConfig,
        rng: R,
        out: &mut Vec<Event>,
    ) -> Result<Self, SetupError> {
        validate_rosters(&team_a, &team_b)?;

        let mut placements = Vec::with_capacity(team_a.len() + team_b.len());
        for creature in team_a.iter_mut().chain(team_b.iter_mut()) {
            let cell = arena
                .position(creature.id())
                .ok_or(SetupError::Unplaced(creature.id()))?;
            creature.place(cell);
            placements.push(Event::CreaturePlaced {
                creature: creature.id(),
                cell,
            });
        }

        let placed = arena.positions().count();
        if placed != placements.len() {
            return Err(SetupError::StrayOccupants {
                placed,
                rostered: placements.len(),
            });
        }
        out.append(&mut placements);

        Ok(Self::assemble(arena, team_a, team_b, &config, rng, out))
    }

    fn assemble(
        arena: Arena,
        team_a: Roster,
        team_b: Roster,
        config: &BattleConfig,
        mut rng: R,
        out: &mut Vec<Event>,
    ) -> Self {
        let mut scheduler = InitiativeScheduler::new();
        scheduler.initialize(team_a.iter().chain(team_b.iter()), &mut rng, out);

        let (columns, rows) = arena.dimensions();
        info!(
            team_a = team_a.len(),
            team_b = team_b.len(),
            columns,
            rows,
            round_cap = config.round_cap,
            to_hit = ?config.to_hit,
            "battle prepared"
        );

        Self {
            arena,
            team_a,
            team_b,
            fallen: Vec::new(),
            scheduler,
            resolver: CombatResolver::new(config.to_hit),
            round_cap: config.round_cap,
            round: 0,
            state: BattleState::InProgress,
            rng,
        }
    }

    /// Plays rounds until the battle reaches a final state.
    pub fn run(&mut self, out: &mut Vec<Event>) -> BattleState {
        while !self.state.is_over() {
            let _ = self.play_round(out);
        }
        self.state
    }

    /// Plays a single round and returns the resulting state.
    ///
    /// Does nothing once the battle is over. A battle whose round cap is
    /// already reached ends in a draw without starting another round.
    pub fn play_round(&mut self, out: &mut Vec<Event>) -> BattleState {
        if self.state.is_over() {
            return self.state;
        }
        if self.round >= self.round_cap {
            self.end_at_round_cap(out);
            return self.state;
        }

        self.round = self.round.saturating_add(1);
        out.push(Event::RoundStarted { round: self.round });

        let order: Vec<InitiativeEntry> = self.scheduler.order().collect();
        for entry in order {
            self.take_turn(entry.creature, out);
            self.sweep();

            if let Some(state) = self.decide() {
                self.finish(state, out);
                return self.state;
            }
        }

        if self.round >= self.round_cap {
            self.end_at_round_cap(out);
        }

        self.state
    }

    fn end_at_round_cap(&mut self, out: &mut Vec<Event>) {
        warn!(round = self.round, "round cap reached without a winner");
        self.finish(BattleState::Draw(DrawReason::RoundCap), out);
    }

    fn take_turn(&mut self, creature: CreatureId, out: &mut Vec<Event>) {
        let team = if self.team_a.index_of(creature).is_some() {
            TeamId::A
        } else if self.team_b.index_of(creature).is_some() {
            TeamId::B
        } else {
            return;
        };

        let (own, enemies) = match team {
            TeamId::A => (&mut self.team_a, &mut self.team_b),
            TeamId::B => (&mut self.team_b, &mut self.team_a),
        };

        let Some(attacker) = own.get_mut(creature) else {
            return;
        };
        if !attacker.is_alive() {
            return;
        }

        let action = self
            .arena
            .find_target(attacker, enemies, &mut self.rng, out);

        if let Action::Attack { target } = action {
            if let Some(defender) = enemies.get_mut(target) {
                let _ = self
                    .resolver
                    .resolve(attacker, defender, &mut self.rng, out);
            }
        }
    }

    fn sweep(&mut self) {
        for roster in [&mut self.team_a, &mut self.team_b] {
            for dead in roster.remove_dead() {
                let _ = self.arena.release_position(dead.cell());
                self.scheduler.remove(dead.id());
                debug!(creature = dead.name(), cell = %dead.cell(), "removed from battle");
                self.fallen.push(dead);
            }
        }
    }

    fn decide(&self) -> Option<BattleState> {
        match (self.team_a.is_empty(), self.team_b.is_empty()) {
            (false, false) => None,
            (true, false) => Some(BattleState::Won(TeamId::B)),
            (false, true) => Some(BattleState::Won(TeamId::A)),
            (true, true) => Some(BattleState::Draw(DrawReason::MutualElimination)),
        }
    }

    fn finish(&mut self, state: BattleState, out: &mut Vec<Event>) {
        self.state = state;
        self.scheduler.terminate();
        out.push(Event::BattleEnded {
            state,
            round: self.round,
        });
        info!(
            ?state,
            round = self.round,
            survivors_a = self.team_a.len(),
            survivors_b = self.team_b.len(),
            "battle ended"
        );
    }

    /// Current state of the battle.
    #[must_use]
    pub const fn state(&self) -> BattleState {
        self.state
    }

    /// Number of rounds started so far.
    #[must_use]
    pub const fn round(&self) -> u32 {
        self.round
    }

    /// Surviving members of a team.
    #[must_use]
    pub const fn roster(&self, team: TeamId) -> &Roster {
        match team {
            TeamId::A => &self.team_a,
            TeamId::B => &self.team_b,
        }
    }

    /// Creatures removed from the battle, in the order they were swept.
    #[must_use]
    pub fn fallen(&self) -> &[Creature] {
        &self.fallen
    }

    /// Arena the battle is fought on.
    #[must_use]
    pub const fn arena(&self) -> &Arena {
        &self.arena
    }

    /// Initiative table of the battle.
    #[must_use]
    pub const fn scheduler(&self) -> &InitiativeScheduler {
        &self.scheduler
    }
}

fn validate_rosters(team_a: &Roster, team_b: &Roster) -> Result<(), SetupError> {
    for (expected, roster) in [(TeamId::A, team_a), (TeamId::B, team_b)] {
        if roster.team() != expected {
            return Err(SetupError::TeamMismatch {
                expected,
                found: roster.team(),
            });
        }
        if roster.is_empty() {
            return Err(SetupError::EmptyRoster(expected));
        }
    }
    Ok(())
}
