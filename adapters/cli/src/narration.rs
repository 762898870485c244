//! Renders battle events for humans or as JSON lines.

use std::{collections::BTreeMap, io::Write};

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Serialize;
use skirmish_core::{AttackResult, BattleState, CreatureId, DrawReason, Event, Roster, TeamId};

/// Layout of the narration written to stdout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// One sentence per event.
    Text,
    /// One JSON object per line.
    Json,
}

#[derive(Serialize)]
struct RosterLine<'a> {
    team: TeamId,
    creatures: Vec<CreatureLine<'a>>,
}

#[derive(Serialize)]
struct CreatureLine<'a> {
    id: CreatureId,
    name: &'a str,
    health: i32,
    armor_class: i32,
    attack_bonus: i32,
    initiative_bonus: i32,
    weapons: Vec<&'a str>,
}

#[derive(Serialize)]
enum Line<'a> {
    Seed(u64),
    Roster(RosterLine<'a>),
    Event(&'a Event),
}

/// Writes rosters and events to an output stream.
pub(crate) struct Narrator<W> {
    format: OutputFormat,
    names: BTreeMap<CreatureId, String>,
    writer: W,
}

impl<W: Write> Narrator<W> {
    pub(crate) fn new(format: OutputFormat, writer: W) -> Self {
        Self {
            format,
            names: BTreeMap::new(),
            writer,
        }
    }

    pub(crate) fn seed(&mut self, seed: u64) -> Result<()> {
        match self.format {
            OutputFormat::Text => writeln!(self.writer, "seed {seed}").context("failed to write seed"),
            OutputFormat::Json => self.json(&Line::Seed(seed)),
        }
    }

    /// Records the roster's names and prints a summary of its members.
    pub(crate) fn roster(&mut self, roster: &Roster) -> Result<()> {
        for creature in roster.iter() {
            let _ = self
                .names
                .insert(creature.id(), creature.name().to_owned());
        }

        match self.format {
            OutputFormat::Text => {
                writeln!(self.writer, "{}:", roster.team()).context("failed to write roster")?;
                for creature in roster.iter() {
                    let stats = creature.stats();
                    let weapons: Vec<String> = creature
                        .weapons()
                        .iter()
                        .map(|weapon| format!("{} {}", weapon.name(), weapon.dice()))
                        .collect();
                    writeln!(
                        self.writer,
                        "  {:<12} health {:>3}  armor {:>2}  attack {:+}  initiative {:+}  {}",
                        creature.name(),
                        creature.health(),
                        stats.armor_class,
                        stats.attack_bonus,
                        stats.initiative_bonus,
                        weapons.join(", ")
                    )
                    .context("failed to write roster")?;
                }
                Ok(())
            }
            OutputFormat::Json => {
                let creatures = roster
                    .iter()
                    .map(|creature| CreatureLine {
                        id: creature.id(),
                        name: creature.name(),
                        health: creature.health(),
                        armor_class: creature.stats().armor_class,
                        attack_bonus: creature.stats().attack_bonus,
                        initiative_bonus: creature.stats().initiative_bonus,
                        weapons: creature.weapons().iter().map(|weapon| weapon.name()).collect(),
                    })
                    .collect();
                self.json(&Line::Roster(RosterLine {
                    team: roster.team(),
                    creatures,
                }))
            }
        }
    }

    pub(crate) fn events(&mut self, events: &[Event]) -> Result<()> {
        for event in events {
            match self.format {
                OutputFormat::Text => {
                    let line = self.describe(event);
                    writeln!(self.writer, "{line}").context("failed to write narration")?;
                }
                OutputFormat::Json => self.json(&Line::Event(event))?,
            }
        }
        Ok(())
    }

    pub(crate) fn into_inner(self) -> W {
        self.writer
    }

    fn json(&mut self, line: &Line<'_>) -> Result<()> {
        serde_json::to_writer(&mut self.writer, line).context("failed to encode narration")?;
        writeln!(self.writer).context("failed to write narration")
    }

    fn name(&self, creature: CreatureId) -> String {
        self.names
            .get(&creature)
            .cloned()
            .unwrap_or_else(|| format!("#{}", creature.get()))
    }

    fn describe(&self, event: &Event) -> String {
        match event {
            Event::CreaturePlaced { creature, cell } => {
                format!("{} enters the arena at {cell}", self.name(*creature))
            }
            Event::InitiativeRolled { creature, priority } => {
                format!("{} rolls {priority} for initiative", self.name(*creature))
            }
            Event::RoundStarted { round } => format!("-- round {round} --"),
            Event::CreatureMoved { creature, from, to } => {
                format!("{} moves from {from} to {to}", self.name(*creature))
            }
            Event::AttackAttempted { attacker, defender } => {
                format!("{} attacks {}", self.name(*attacker), self.name(*defender))
            }
            Event::AttackResolved {
                defender, result, ..
            } => match result {
                AttackResult::Miss { roll } => format!("  misses (rolled {roll})"),
                AttackResult::NoWeapon => "  hits, but no weapon reaches".to_owned(),
                AttackResult::Hit {
                    weapon,
                    damage,
                    remaining_health,
                } => format!(
                    "  hits with {weapon} for {damage} damage, {} has {remaining_health} health left",
                    self.name(*defender)
                ),
            },
            Event::CreatureDied { creature } => format!("{} dies", self.name(*creature)),
            Event::BattleEnded { state, round } => match state {
                BattleState::Won(team) => format!("{team} wins in round {round}"),
                BattleState::Draw(DrawReason::MutualElimination) => {
                    format!("draw: both teams fell in round {round}")
                }
                BattleState::Draw(DrawReason::RoundCap) => {
                    format!("draw: no winner after {round} rounds")
                }
                BattleState::InProgress => format!("battle interrupted in round {round}"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skirmish_core::{CellCoord, CombatStats, Creature, DamageDice, RangeClass, Weapon};

    fn roster() -> Roster {
        Roster::new(
            TeamId::A,
            vec![Creature::new(
                CreatureId::new(3),
                "wolf1",
                TeamId::A,
                CombatStats {
                    armor_class: 13,
                    attack_bonus: 4,
                    initiative_bonus: 2,
                    speed: 8,
                },
                11,
                vec![Weapon::new("Bite", DamageDice::new(2, 4, 2), RangeClass::Melee)],
            )],
        )
    }

    fn render(format: OutputFormat, events: &[Event]) -> String {
        let mut narrator = Narrator::new(format, Vec::new());
        narrator.roster(&roster()).expect("roster written");
        narrator.events(events).expect("events written");
        String::from_utf8(narrator.into_inner()).expect("utf-8 output")
    }

    #[test]
    fn text_narration_uses_creature_names() {
        let output = render(
            OutputFormat::Text,
            &[
                Event::CreatureMoved {
                    creature: CreatureId::new(3),
                    from: CellCoord::new(0, 0),
                    to: CellCoord::new(1, 1),
                },
                Event::AttackAttempted {
                    attacker: CreatureId::new(3),
                    defender: CreatureId::new(8),
                },
                Event::BattleEnded {
                    state: BattleState::Won(TeamId::A),
                    round: 4,
                },
            ],
        );

        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0], "team A:");
        assert!(lines[1].contains("wolf1") && lines[1].contains("Bite 2d4+2"));
        assert_eq!(lines[2], "wolf1 moves from (0, 0) to (1, 1)");
        assert_eq!(lines[3], "wolf1 attacks #8");
        assert_eq!(lines[4], "team A wins in round 4");
    }

    #[test]
    fn json_narration_writes_one_object_per_line() {
        let output = render(
            OutputFormat::Json,
            &[Event::CreatureDied {
                creature: CreatureId::new(3),
            }],
        );

        let lines: Vec<serde_json::Value> = output
            .lines()
            .map(|line| serde_json::from_str(line).expect("valid json"))
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["Roster"]["creatures"][0]["name"], "wolf1");
        assert_eq!(lines[1]["Event"]["CreatureDied"]["creature"], 3);
    }
}
