//! Multi-tick lifecycle tests driven through the `.colony/` state files.
//!
//! Each tick reloads config, memory and world from disk, so these tests also
//! cover the per-tick decode/encode of creep memory.

use colony::core::intent::Intent;
use colony::core::memory::{Assignment, CreepMemory};
use colony::core::mission::{Mission, MissionKind};
use colony::core::run_loop::Outcome;
use colony::core::types::{ObjectId, Role};
use colony::core::world::{StructureKind, World};
use colony::io::memory_store::Memory;
use colony::looping::run_ticks;
use colony::spawn::{SpawnOptions, spawn_creep};
use colony::test_support::{
    TestColony, container, guard_creep, hostile_creep, hostile_structure, miner_creep, pos, source,
};

/// Miner harvest → deposit cycle across many ticks.
///
/// Layout: source at (10,9), miner at (10,10), container at (10,11).
///
/// Sequence:
/// 1. Ticks 1-13: empty miner harvests 12/tick until its 150 capacity is full.
/// 2. Next tick: full miner drops the harvest task and deposits into the container.
/// 3. Then: empty again, back to harvesting.
#[test]
fn miner_cycles_between_harvest_and_deposit() {
    let colony = TestColony::new().expect("colony");
    let mut world = World::empty(0);
    world.sources.push(source("src", pos(10, 9)));
    world.structures.push(container("c1", pos(10, 11), 0));
    world.creeps.push(miner_creep("miner_1", pos(10, 10), 0));
    colony.write_world(&world).expect("world");
    let mut memory = Memory::default();
    memory
        .encode(
            "miner_1",
            &CreepMemory::new(
                Role::Miner,
                Some(Assignment::object(ObjectId::new("src"))),
                "W1N1",
            ),
        )
        .expect("encode");
    colony.write_memory(&memory).expect("memory");

    let mut tasks = Vec::new();
    let outcome = run_ticks(colony.root(), 16, |report| {
        tasks.push(report.creeps[0].task.clone().unwrap_or_default());
    })
    .expect("run");

    assert_eq!(outcome.ticks_run, 16);
    assert_eq!(outcome.failures, 0);
    assert!(tasks[..13].iter().all(|task| task == "harvest"));
    assert_eq!(tasks[13], "deposit");
    assert_eq!(tasks[14], "harvest");

    let world = colony.read_world().expect("world");
    let container = world.structure(&ObjectId::new("c1")).expect("container");
    assert_eq!(container.energy, 150);
    let record = colony
        .read_memory()
        .expect("memory")
        .decode("miner_1")
        .expect("decode")
        .expect("record");
    assert!(record.data.replace_at > 0);
}

/// Guard posted in its room walks in, is pulled off its walk by an invader,
/// and the destroy mission it served retires once the room is clear.
#[test]
fn guard_defends_mission_room_until_clear() {
    let colony = TestColony::new().expect("colony");
    let mut world = colony.read_world().expect("world");
    world.missions.push(Mission {
        name: "raid".to_string(),
        kind: MissionKind::Destroy,
        pos: pos(15, 10),
    });
    world.creeps.push(guard_creep("guard_1", pos(10, 10)));
    let mut invader = hostile_creep("invader", pos(12, 10));
    invader.body[0].hits = 30;
    invader.body[1].hits = 30;
    world.creeps.push(invader);
    world
        .structures
        .push(hostile_structure("wall", StructureKind::Wall, pos(40, 40)));
    colony.write_world(&world).expect("world");
    let mut memory = Memory::default();
    memory
        .encode(
            "guard_1",
            &CreepMemory::new(Role::Guard, Some(Assignment::mission("raid")), "W1N1"),
        )
        .expect("encode");
    colony.write_memory(&memory).expect("memory");

    let mut outcomes = Vec::new();
    run_ticks(colony.root(), 3, |report| {
        outcomes.push(report.creeps[0].outcome.clone());
    })
    .expect("run");

    assert!(matches!(&outcomes[0], Outcome::Assigned { task, .. } if task == "attack"));
    let world = colony.read_world().expect("world");
    assert!(world.creep("invader").is_none());
    assert_eq!(world.missions.len(), 1, "hostile wall keeps the mission active");
}

/// A creep spawned through the CLI-facing helper gets memory and is picked
/// up by the next tick.
#[test]
fn spawned_miner_starts_working_next_tick() {
    let colony = TestColony::new().expect("colony");
    let request = spawn_creep(
        colony.root(),
        &SpawnOptions {
            role: Role::Miner,
            room: "W1N1".to_string(),
            assignment: Some(Assignment::object(ObjectId::new("source1"))),
            remote: false,
        },
    )
    .expect("spawn");

    let mut first = None;
    run_ticks(colony.root(), 1, |report| {
        first = Some(report.creeps[0].clone());
    })
    .expect("run");

    let first = first.expect("report");
    assert_eq!(first.name, request.name);
    assert_eq!(first.task.as_deref(), Some("harvest"));
    assert_eq!(
        first.outcome,
        Outcome::Assigned {
            task: "harvest".to_string(),
            replaced: None
        }
    );
    assert!(matches!(
        first.intent,
        Some(Intent::MoveTo { range: 1, .. })
    ));
}
