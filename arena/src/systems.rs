use std::sync::Arc;

use anyhow::Context;
use bulwark::{BoxedSystem, Entity, EntityQuery, Event, EventDispatcher, EventKind, Mut, Opt};

use crate::components::*;

/// Wraps a fallible closure into a system which logs its errors
fn system<F>(name: &'static str, mut f: F) -> BoxedSystem
where
    F: FnMut(&mut [Entity]) -> anyhow::Result<()> + 'static,
{
    BoxedSystem::named(name, move |entities: &mut [Entity]| {
        if let Err(err) = f(entities) {
            tracing::error!(system = name, "{err:#}");
        }
    })
}

/// Aims every tower at the closest living enemy in range
pub fn targeting_system() -> BoxedSystem {
    system("targeting", |entities| {
        let snapshot = EntityQuery::from(entities);

        let enemies = snapshot
            .with_components::<(Position, Team, Health)>()
            .filter(|item| *item.components.1 == Team::Enemy && !item.components.2.is_dead())
            .execute()?;

        for item in snapshot
            .with_components::<(Tower, Position, Mut<Target>)>()
            .iter()?
        {
            let (tower, position, mut target) = item.components;

            target.0 = enemies
                .iter()
                .map(|enemy| {
                    let (enemy_position, _, _) = &enemy.components;
                    (enemy.entity.id(), enemy_position.0.distance(position.0))
                })
                .filter(|&(_, distance)| distance <= tower.range)
                .min_by(|a, b| a.1.total_cmp(&b.1))
                .map(|(id, _)| id);
        }

        Ok(())
    })
}

/// Fires the towers at their targets.
///
/// Dispatches `DamageDealt` for every hit, `EntityKilled` and
/// `CurrencyEarned` for kills and `StunApplied` for stunning hits.
pub fn attack_system(dispatcher: Arc<EventDispatcher>, dt: f32) -> BoxedSystem {
    system("attack", move |entities| {
        let mut stuns = Vec::new();

        {
            let snapshot = EntityQuery::from(&*entities);
            let targets = snapshot.with_components::<(Mut<Health>, Position, Opt<Bounty>)>();

            for item in snapshot
                .with_components::<(Tower, Target, Mut<AttackCooldown>)>()
                .iter()?
            {
                let (tower, target, mut cooldown) = item.components;
                cooldown.0 -= dt;

                let Some(target_id) = target.0 else {
                    continue;
                };

                if cooldown.0 > 0.0 {
                    continue;
                }

                // The target may have died earlier this frame
                let Some(hit) = targets.get(target_id)? else {
                    continue;
                };

                let (mut health, position, bounty) = hit.components;
                if health.is_dead() {
                    continue;
                }

                cooldown.0 = tower.rate;
                health.hp = (health.hp - tower.damage).max(0.0);

                dispatcher.dispatch(
                    &Event::new(EventKind::DamageDealt)
                        .with_arg("source", item.entity.id())
                        .with_arg("target", target_id)
                        .with_arg("amount", tower.damage)
                        .with_arg("position", position.0),
                );

                if health.is_dead() {
                    let reward = bounty.map_or(0, |v| v.0);
                    dispatcher.dispatch(
                        &Event::new(EventKind::EntityKilled)
                            .with_arg("target", target_id)
                            .with_arg("reward", reward)
                            .with_arg("position", position.0),
                    );

                    dispatcher.dispatch(
                        &Event::new(EventKind::CurrencyEarned)
                            .with_arg("amount", reward)
                            .with_arg("source", target_id),
                    );
                } else if tower.stun > 0.0 {
                    stuns.push((target_id, tower.stun));
                }
            }
        }

        for (id, duration) in stuns {
            let Some(entity) = entities.iter_mut().find(|v| v.id() == id) else {
                continue;
            };

            let previous = entity.replace_component(Stun {
                remaining: duration,
            });

            dispatcher.dispatch(
                &Event::new(EventKind::StunApplied)
                    .with_arg("target", id)
                    .with_arg("duration", duration)
                    .with_arg("refreshed", previous.is_some()),
            );
        }

        Ok(())
    })
}

/// Counts down stuns and removes them once they run out
pub fn stun_system(dispatcher: Arc<EventDispatcher>, dt: f32) -> BoxedSystem {
    system("stun", move |entities| {
        for entity in entities.iter_mut() {
            let expired = match entity.get_component_mut::<Stun>() {
                Some(mut stun) => {
                    stun.remaining -= dt;
                    stun.remaining <= 0.0
                }
                None => false,
            };

            if expired {
                entity.remove_component::<Stun>();
                dispatcher
                    .dispatch(&Event::new(EventKind::StunExpired).with_arg("target", entity.id()));
            }
        }

        Ok(())
    })
}

/// Moves everything which is not stunned
pub fn movement_system(dt: f32) -> BoxedSystem {
    system("movement", move |entities| {
        let query = EntityQuery::from(entities)
            .with_components::<(Mut<Position>, Velocity, Opt<Stun>)>();

        for item in query.iter()? {
            let (mut position, velocity, stun) = item.components;
            if stun.is_none() {
                position.0 += velocity.0 * dt;
            }
        }

        Ok(())
    })
}

/// Enemies which reach the core sacrifice their remaining health to damage it
pub fn core_contact_system(dispatcher: Arc<EventDispatcher>) -> BoxedSystem {
    let mut destroyed = false;

    system("core_contact", move |entities| {
        let snapshot = EntityQuery::from(entities);

        let core = snapshot
            .with_components::<(Core, Position, Mut<Health>)>()
            .execute_first()?
            .context("No core in the arena")?;

        let core_id = core.entity.id();
        let (_, core_position, mut core_health) = core.components;

        // The core does not move, which keeps it out of this query
        for item in snapshot
            .with_components::<(Position, Velocity, Mut<Health>)>()
            .iter()?
        {
            let (position, _, mut health) = item.components;
            if health.is_dead() || position.0.distance(core_position.0) > CORE_RADIUS {
                continue;
            }

            let damage = health.hp;
            health.hp = 0.0;
            core_health.hp = (core_health.hp - damage).max(0.0);

            dispatcher.dispatch(
                &Event::new(EventKind::CoreDamaged)
                    .with_arg("source", item.entity.id())
                    .with_arg("amount", damage)
                    .with_arg("remaining", core_health.hp),
            );

            if core_health.is_dead() && !destroyed {
                destroyed = true;
                dispatcher
                    .dispatch(&Event::new(EventKind::CoreDestroyed).with_arg("target", core_id));
            }
        }

        Ok(())
    })
}
