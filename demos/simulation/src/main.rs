//! Example simulation — a spawn/move/expire loop over two pipelines.
//!
//! Systems are registered in a deliberately scrambled order; the pipelines
//! compute the correct execution order from what each system's setup stage
//! asked for. `spawn` initiates the component types everyone else touches,
//! `movement` writes positions from velocities, `aging` burns lifetimes
//! down, and `cleanup` strips expired entities — so the compiled order is
//! spawn, then the mutators, then cleanup, with no ordering declared by
//! hand.

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cadence_pipeline::{Engine, SetupWorld, TickFn};
use components::{Lifetime, Position, Velocity};

/// Number of entities spawned on the first tick.
const WAVE_SIZE: u32 = 4;

/// Spawns one wave of short-lived drifting entities on the first tick.
fn spawn(world: &mut SetupWorld<'_>) -> TickFn {
    let spawner = world.spawner();
    let positions = world.inserter::<Position>();
    let velocities = world.inserter::<Velocity>();
    let lifetimes = world.inserter::<Lifetime>();

    let mut spawned = false;
    Box::new(move || {
        if spawned {
            return Ok(());
        }
        spawned = true;
        for i in 0..WAVE_SIZE {
            let entity = spawner.spawn();
            positions.insert(entity, Position::new(i as f32, 0.0));
            velocities.insert(entity, Velocity::new(0.0, 1.0));
            lifetimes.insert(entity, Lifetime::ticks(2 + i));
            info!(%entity, "spawned");
        }
        Ok(())
    })
}

/// Applies velocities to positions.
fn movement(world: &mut SetupWorld<'_>) -> TickFn {
    let moving = world.filter::<Position>().with::<Velocity>().build();
    let positions = world.writer::<Position>();
    let velocities = world.reader::<Velocity>();

    Box::new(move || {
        for entity in &moving {
            let vel = *velocities.get(entity)?;
            let mut pos = positions.get_mut(entity)?;
            pos.x += vel.dx;
            pos.y += vel.dy;
        }
        Ok(())
    })
}

/// Burns one tick off every lifetime.
fn aging(world: &mut SetupWorld<'_>) -> TickFn {
    let aging = world.filter::<Lifetime>().build();
    let lifetimes = world.writer::<Lifetime>();

    Box::new(move || {
        for entity in &aging {
            let mut lifetime = lifetimes.get_mut(entity)?;
            lifetime.remaining = lifetime.remaining.saturating_sub(1);
        }
        Ok(())
    })
}

/// Strips every component from entities whose lifetime ran out.
fn cleanup(world: &mut SetupWorld<'_>) -> TickFn {
    let doomed = world.filter::<Lifetime>().build();
    let lifetimes = world.reader::<Lifetime>();
    let positions = world.remover::<Position>();
    let velocities = world.remover::<Velocity>();
    let remaining = world.remover::<Lifetime>();

    Box::new(move || {
        let mut expired = Vec::new();
        for entity in &doomed {
            if lifetimes.get(entity)?.expired() {
                expired.push(entity);
            }
        }
        for entity in expired {
            positions.remove(entity);
            velocities.remove(entity);
            remaining.remove(entity);
            info!(%entity, "expired");
        }
        Ok(())
    })
}

/// Logs where everything is. Lives in its own pipeline, invoked after the
/// main update.
fn report(world: &mut SetupWorld<'_>) -> TickFn {
    let placed = world.filter::<Position>().build();
    let positions = world.reader::<Position>();

    Box::new(move || {
        for entity in &placed {
            let pos = positions.get(entity)?;
            info!(%entity, x = pos.x, y = pos.y, "position");
        }
        Ok(())
    })
}

fn main() -> Result<()> {
    // Initialise structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("simulation=info".parse()?)
                .add_directive("cadence_pipeline=info".parse()?),
        )
        .init();

    let engine = Engine::new();

    // Registration order is scrambled on purpose; the compiled order is not.
    let mut update = engine
        .new_pipeline("update")
        .add_system("cleanup", cleanup)
        .add_system("movement", movement)
        .add_system("spawn", spawn)
        .add_system("aging", aging)
        .finish()?;

    let mut late_update = engine
        .new_pipeline("late_update")
        .add_system("report", report)
        .finish()?;

    info!(order = ?update.order(), "update pipeline ready");

    for tick in 0..6u64 {
        info!(tick, "tick");
        update.run_tick()?;
        late_update.run_tick()?;
    }

    info!(
        entities = engine.store().entity_count(),
        "simulation finished"
    );
    Ok(())
}
