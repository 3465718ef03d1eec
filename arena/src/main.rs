use std::{f32::consts::TAU, sync::Arc};

use anyhow::Result;
use bulwark::{Entity, EntityQuery, Event, EventDispatcher, EventKind, Mut, Schedule};
use glam::vec3;
use itertools::Itertools;
use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing_subscriber::{filter::LevelFilter, prelude::*, registry, EnvFilter};
use tracing_tree::HierarchicalLayer;

mod components;
mod listeners;
mod systems;

use components::*;
use listeners::*;
use systems::*;

const DT: f32 = 0.05;
const FRAMES: usize = 4_000;
const WAVES: u32 = 6;
const SEED: u64 = 42;
const UPGRADE_COST: f64 = 60.0;

fn main() -> Result<()> {
    registry()
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .with(HierarchicalLayer::default())
        .init();

    let dispatcher = Arc::new(EventDispatcher::new());

    let kills = dispatcher.register_listener("kill_tally", KillTally::default());
    let wallet = dispatcher.register_listener("wallet", Wallet::default());
    let log = dispatcher.register_listener("event_log", EventLog::default());

    let (alerts_tx, alerts_rx) = flume::unbounded::<Event>();
    dispatcher.register_listener("alerts", alerts_tx);

    let mut rng = StdRng::seed_from_u64(SEED);
    let mut entities = Vec::new();

    create_core().spawn(&mut entities);
    for i in 0..3 {
        let angle = i as f32 / 3.0 * TAU;
        let stun = if i == 0 { 0.75 } else { 0.0 };
        create_tower(vec3(angle.cos(), 0.0, angle.sin()) * 4.0, stun).spawn(&mut entities);
    }

    let mut schedule = Schedule::builder()
        .with_system(targeting_system())
        .with_system(attack_system(dispatcher.clone(), DT))
        .with_system(stun_system(dispatcher.clone(), DT))
        .with_system(movement_system(DT))
        .with_system(core_contact_system(dispatcher.clone()))
        .build();

    tracing::info!(systems = ?schedule.system_names().collect_vec(), "Starting arena");

    let mut wave = 0;
    let mut frames = 0;
    while frames < FRAMES {
        let enemies = EntityQuery::from(&entities)
            .with_components::<Team>()
            .filter(|item| *item.components == Team::Enemy)
            .execute_count()?;

        if enemies == 0 {
            if wave > 0 {
                dispatcher.dispatch(&Event::new(EventKind::WaveCleared).with_arg("wave", wave));

                let balance = wallet.borrow().balance;
                if balance >= UPGRADE_COST {
                    upgrade_towers(&entities, &dispatcher)?;
                }
            }

            if wave == WAVES {
                break;
            }

            wave += 1;
            let count = spawn_wave(&mut entities, &mut rng, wave);
            dispatcher.dispatch(
                &Event::new(EventKind::WaveStarted)
                    .with_arg("wave", wave)
                    .with_arg("enemies", count as u32),
            );
        }

        schedule.execute(&mut entities);
        frames += 1;

        entities.retain(|entity| {
            entity.has_component::<Core>()
                || entity
                    .get_component::<Health>()
                    .map_or(true, |health| !health.is_dead())
        });

        if alerts_rx
            .drain()
            .any(|event| event.kind() == EventKind::CoreDestroyed)
        {
            tracing::warn!(frames, wave, "The core was destroyed");
            break;
        }
    }

    let kills = kills.borrow();
    let wallet = wallet.borrow();
    let log = log.borrow();

    tracing::info!(
        frames,
        wave,
        kills = kills.total,
        earned = wallet.earned,
        balance = wallet.balance,
        "Simulation finished"
    );

    tracing::info!(
        "Events: {}",
        log.counts
            .iter()
            .map(|(kind, count)| format!("{kind:?}: {count}"))
            .join(", ")
    );

    Ok(())
}

fn spawn_wave(entities: &mut Vec<Entity>, rng: &mut StdRng, wave: u32) -> usize {
    let count = 4 + wave as usize * 2;

    for _ in 0..count {
        let angle = rng.random_range(0.0..TAU);
        let distance = rng.random_range(12.0..16.0);
        let speed = rng.random_range(0.8..1.4);

        let position = vec3(angle.cos(), 0.0, angle.sin()) * distance;
        create_enemy(position, speed, 20.0 + wave as f32 * 5.0, 5 + wave).spawn(entities);
    }

    tracing::info!(wave, count, "Spawned wave");
    count
}

fn upgrade_towers(entities: &[Entity], dispatcher: &EventDispatcher) -> Result<()> {
    for item in EntityQuery::from(entities)
        .with_components::<Mut<Tower>>()
        .iter()?
    {
        let mut tower = item.components;
        tower.damage *= 1.25;
        tower.range = (tower.range + 0.5).min(9.0);
    }

    dispatcher.dispatch(
        &Event::new(EventKind::UpgradePurchased)
            .with_arg("upgrade", "damage")
            .with_arg("cost", UPGRADE_COST),
    );

    Ok(())
}
