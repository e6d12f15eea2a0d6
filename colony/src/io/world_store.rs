//! World snapshot load/save with schema validation.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use jsonschema::validator_for;
use serde_json::Value;
use tracing::debug;

use crate::core::world::World;

/// Load and validate the world snapshot from disk.
pub fn load_world(schema_path: &Path, world_path: &Path) -> Result<World> {
    debug!(path = %world_path.display(), "loading world");
    let contents = fs::read_to_string(world_path)
        .with_context(|| format!("read world {}", world_path.display()))?;
    let value: Value = serde_json::from_str(&contents)
        .with_context(|| format!("parse world {}", world_path.display()))?;
    validate_schema(schema_path, &value)?;
    let world: World = serde_json::from_value(value)
        .with_context(|| format!("deserialize world {}", world_path.display()))?;
    debug!(
        tick = world.tick,
        creeps = world.creeps.len(),
        "world loaded"
    );
    Ok(world)
}

/// Atomically write the world snapshot (temp file + rename).
pub fn write_world(world_path: &Path, world: &World) -> Result<()> {
    let mut buf = serde_json::to_string_pretty(world)?;
    buf.push('\n');
    super::write_atomic(world_path, &buf)
}

fn validate_schema(schema_path: &Path, world: &Value) -> Result<()> {
    let schema_contents = fs::read_to_string(schema_path)
        .with_context(|| format!("read schema {}", schema_path.display()))?;
    let schema_value: Value = serde_json::from_str(&schema_contents)
        .with_context(|| format!("parse schema {}", schema_path.display()))?;
    let compiled =
        validator_for(&schema_value).map_err(|err| anyhow!("invalid schema: {}", err))?;
    if !compiled.is_valid(world) {
        let messages = compiled
            .iter_errors(world)
            .map(|err| err.to_string())
            .collect::<Vec<_>>();
        return Err(anyhow!(
            "world schema validation failed: {}",
            messages.join("; ")
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Part;
    use crate::test_support::{body, container, creep, pos, source};

    const SCHEMA: &str = include_str!(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/schemas/world/v1.schema.json"
    ));

    fn write_schema(dir: &Path) -> std::path::PathBuf {
        let schema_path = dir.join("world.schema.json");
        fs::write(&schema_path, SCHEMA).expect("write schema");
        schema_path
    }

    /// Verifies write → load keeps every object and passes the schema.
    #[test]
    fn world_round_trips_through_schema() {
        let temp = tempfile::tempdir().expect("tempdir");
        let schema_path = write_schema(temp.path());
        let world_path = temp.path().join("world.json");

        let mut world = World::empty(7);
        world.sources.push(source("src", pos(10, 9)));
        world.structures.push(container("c1", pos(10, 11), 40));
        world
            .creeps
            .push(creep("miner_1", pos(10, 10), body(&[Part::Work, Part::Carry, Part::Move])));

        write_world(&world_path, &world).expect("write");
        let loaded = load_world(&schema_path, &world_path).expect("load");
        assert_eq!(loaded, world);
    }

    #[test]
    fn schema_rejects_out_of_bounds_position() {
        let temp = tempfile::tempdir().expect("tempdir");
        let schema_path = write_schema(temp.path());
        let world_path = temp.path().join("world.json");

        let mut world = World::empty(1);
        world.sources.push(source("src", pos(60, 9)));
        write_world(&world_path, &world).expect("write");

        let err = load_world(&schema_path, &world_path).expect_err("invalid");
        assert!(err.to_string().contains("world schema validation failed"));
    }

    #[test]
    fn missing_tick_is_rejected() {
        let temp = tempfile::tempdir().expect("tempdir");
        let schema_path = write_schema(temp.path());
        let world_path = temp.path().join("world.json");
        fs::write(&world_path, "{\"creeps\": []}\n").expect("write");

        assert!(load_world(&schema_path, &world_path).is_err());
    }
}
