#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system resolving a single attack between two creatures.
//!
//! An attack walks through a small state machine: the armor check decides
//! between a hit and a miss, a hit selects a weapon that reaches the defender,
//! the weapon's dice are rolled for damage, and the death check reports
//! whether the defender fell. The resolver only mutates the defender's health;
//! removing the dead is left to the caller.

use rand::Rng;
use skirmish_core::{AttackResult, Creature, DamageDice, Event, RangeClass, Weapon, D20};
use tracing::debug;

/// Whose attack bonus is added to the d20 during the armor check.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ToHitRule {
    /// The defender's own attack bonus is added to the roll.
    #[default]
    DefenderBonus,
    /// The attacker's attack bonus is added to the roll.
    AttackerBonus,
}

impl ToHitRule {
    /// Bonus added to the d20 under this rule.
    #[must_use]
    pub const fn bonus(self, attacker: &Creature, defender: &Creature) -> i32 {
        match self {
            Self::DefenderBonus => defender.stats().attack_bonus,
            Self::AttackerBonus => attacker.stats().attack_bonus,
        }
    }
}

/// Summary of a finished attack.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttackOutcome {
    /// Result reported in the `AttackResolved` event.
    pub result: AttackResult,
    /// Whether this attack killed the defender.
    pub defender_died: bool,
}

enum AttackStage<'a> {
    ArmorCheck,
    Hit,
    Miss { roll: i32 },
    WeaponSelect,
    Damage { weapon: &'a Weapon },
    DeathCheck { weapon: &'a Weapon, damage: i32 },
    Done(AttackOutcome),
}

/// Attack resolver parameterised by the to-hit rule.
#[derive(Clone, Copy, Debug, Default)]
pub struct CombatResolver {
    rule: ToHitRule,
}

impl CombatResolver {
    /// Creates a resolver applying the provided to-hit rule.
    #[must_use]
    pub const fn new(rule: ToHitRule) -> Self {
        Self { rule }
    }

    /// Rule applied during armor checks.
    #[must_use]
    pub const fn rule(&self) -> ToHitRule {
        self.rule
    }

    /// Resolves one attack of `attacker` against `defender`.
    ///
    /// Emits `AttackAttempted`, then `AttackResolved`, then `CreatureDied` if
    /// the defender fell.
    pub fn resolve<R: Rng>(
        &self,
        attacker: &Creature,
        defender: &mut Creature,
        rng: &mut R,
        out: &mut Vec<Event>,
    ) -> AttackOutcome {
        let mut stage = AttackStage::ArmorCheck;

        loop {
            stage = match stage {
                AttackStage::ArmorCheck => {
                    out.push(Event::AttackAttempted {
                        attacker: attacker.id(),
                        defender: defender.id(),
                    });
                    let face = i32::try_from(rng.gen_range(1..=D20)).unwrap_or(0);
                    let roll = face.saturating_add(self.rule.bonus(attacker, defender));
                    let armor_class = defender.stats().armor_class;
                    debug!(
                        attacker = attacker.name(),
                        defender = defender.name(),
                        roll,
                        armor_class,
                        "armor check"
                    );
                    if roll >= armor_class {
                        AttackStage::Hit
                    } else {
                        AttackStage::Miss { roll }
                    }
                }
                AttackStage::Miss { roll } => {
                    let result = AttackResult::Miss { roll };
                    out.push(resolved(attacker, defender, &result));
                    AttackStage::Done(AttackOutcome {
                        result,
                        defender_died: false,
                    })
                }
                AttackStage::Hit => AttackStage::WeaponSelect,
                AttackStage::WeaponSelect => {
                    let distance = attacker.cell().chebyshev_distance(defender.cell());
                    match select_weapon(attacker.weapons(), distance) {
                        Some(weapon) => AttackStage::Damage { weapon },
                        None => {
                            let result = AttackResult::NoWeapon;
                            out.push(resolved(attacker, defender, &result));
                            AttackStage::Done(AttackOutcome {
                                result,
                                defender_died: false,
                            })
                        }
                    }
                }
                AttackStage::Damage { weapon } => {
                    let damage = roll_damage(weapon.dice(), attacker.stats().attack_bonus, rng);
                    debug!(weapon = weapon.name(), damage, "damage rolled");
                    AttackStage::DeathCheck { weapon, damage }
                }
                AttackStage::DeathCheck { weapon, damage } => {
                    let defender_died = defender.apply_damage(damage);
                    let result = AttackResult::Hit {
                        weapon: weapon.name().to_owned(),
                        damage,
                        remaining_health: defender.health(),
                    };
                    out.push(resolved(attacker, defender, &result));
                    if defender_died {
                        out.push(Event::CreatureDied {
                            creature: defender.id(),
                        });
                    }
                    AttackStage::Done(AttackOutcome {
                        result,
                        defender_died,
                    })
                }
                AttackStage::Done(outcome) => return outcome,
            };
        }
    }
}

fn resolved(attacker: &Creature, defender: &Creature, result: &AttackResult) -> Event {
    Event::AttackResolved {
        attacker: attacker.id(),
        defender: defender.id(),
        result: result.clone(),
    }
}

/// Picks the weapon used against a defender `distance` cells away.
///
/// The first weapon whose class suits the distance wins (melee when adjacent,
/// ranged otherwise). Failing that, the first weapon that reaches at all.
#[must_use]
pub fn select_weapon(weapons: &[Weapon], distance: u32) -> Option<&Weapon> {
    let preferred = RangeClass::preferred_at(distance);
    weapons
        .iter()
        .find(|weapon| weapon.range() == preferred && weapon.reaches(distance))
        .or_else(|| weapons.iter().find(|weapon| weapon.reaches(distance)))
}

/// Rolls the dice, adds the weapon and attacker bonuses, and floors at zero.
pub fn roll_damage<R: Rng>(dice: DamageDice, attack_bonus: i32, rng: &mut R) -> i32 {
    let sides = dice.sides().max(1);
    let rolled = (0..dice.count()).fold(0_i32, |total, _| {
        let face = i32::try_from(rng.gen_range(1..=sides)).unwrap_or(i32::MAX);
        total.saturating_add(face)
    });
    rolled
        .saturating_add(dice.bonus())
        .saturating_add(attack_bonus)
        .max(0)
}
