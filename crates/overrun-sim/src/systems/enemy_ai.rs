//! Enemy AI system — retargeting, pursuit, and strikes.
//!
//! Applies the pure FSM from overrun-ai to every enemy, then lands the
//! strikes it queued against participant health. An enemy whose target dies
//! picks a new one with a random starting index so a surviving participant
//! is not always mobbed in join order.

use hecs::{Entity, World};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use overrun_ai::fsm::{evaluate, EnemyContext};
use overrun_ai::profiles::get_profile;
use overrun_core::components::{Enemy, EnemyBrain, EnemyInfo, Health, Player, PlayerInfo};
use overrun_core::enums::EnemyPhase;
use overrun_core::events::MatchEvent;
use overrun_core::types::{Position, Velocity};

struct ParticipantState {
    entity: Entity,
    player_id: u32,
    position: Position,
    alive: bool,
}

/// Run enemy behavior for one tick.
pub fn run(world: &mut World, rng: &mut ChaCha8Rng, now_secs: f64, events: &mut Vec<MatchEvent>) {
    let participants = collect_participants(world);
    let mut strikes: Vec<(Entity, i32)> = Vec::new();

    for (_entity, (_enemy, info, brain, pos, vel)) in world
        .query_mut::<(&Enemy, &EnemyInfo, &mut EnemyBrain, &Position, &mut Velocity)>()
    {
        if brain.phase == EnemyPhase::Dead {
            continue;
        }

        // Keep the current target while it lives; otherwise retarget.
        let target = match current_target(&participants, brain.target_player) {
            Some(t) => Some(t),
            None => {
                let picked = pick_target(&participants, rng);
                brain.target_player = picked.map(|p| p.player_id);
                picked
            }
        };

        let profile = get_profile(info.archetype);
        let update = evaluate(
            &EnemyContext {
                phase: brain.phase,
                position: *pos,
                target: target.map(|p| p.position),
            },
            &profile,
        );

        *vel = update.new_velocity;
        if update.phase_changed {
            brain.phase = update.new_phase;
            brain.phase_started_secs = now_secs;
        }

        if brain.phase == EnemyPhase::Attacking && now_secs >= brain.next_attack_secs {
            if let Some(target) = target {
                strikes.push((target.entity, profile.attack_damage));
                brain.next_attack_secs = now_secs + profile.attack_interval_secs;
            }
        }
    }

    land_strikes(world, &strikes, events);
}

fn collect_participants(world: &World) -> Vec<ParticipantState> {
    let mut participants: Vec<ParticipantState> = world
        .query::<(&Player, &PlayerInfo, &Position, &Health)>()
        .iter()
        .map(|(entity, (_, info, pos, health))| ParticipantState {
            entity,
            player_id: info.player_id,
            position: *pos,
            alive: health.current > 0,
        })
        .collect();
    participants.sort_unstable_by_key(|p| p.player_id);
    participants
}

/// The enemy's assigned target, if it is still joined and alive.
fn current_target<'a>(
    participants: &'a [ParticipantState],
    target_player: Option<u32>,
) -> Option<&'a ParticipantState> {
    let id = target_player?;
    participants
        .iter()
        .find(|p| p.player_id == id)
        .filter(|p| p.alive)
}

/// Scan for a living participant starting from a random index.
fn pick_target<'a>(
    participants: &'a [ParticipantState],
    rng: &mut ChaCha8Rng,
) -> Option<&'a ParticipantState> {
    if participants.is_empty() {
        return None;
    }
    let start = rng.gen_range(0..participants.len());
    (0..participants.len())
        .map(|i| &participants[(start + i) % participants.len()])
        .find(|p| p.alive)
}

fn land_strikes(world: &mut World, strikes: &[(Entity, i32)], events: &mut Vec<MatchEvent>) {
    for &(entity, damage) in strikes {
        let Ok((info, health)) = world
            .query_one_mut::<(&PlayerInfo, &mut Health)>(entity)
        else {
            continue;
        };
        if health.current <= 0 {
            continue;
        }

        health.current -= damage;
        events.push(MatchEvent::PlayerDamaged {
            player_id: info.player_id,
            health: health.current,
        });

        if health.current <= 0 {
            events.push(MatchEvent::PlayerDied {
                player_id: info.player_id,
            });
            log::info!("player {} eliminated", info.player_id);
        }
    }
}
