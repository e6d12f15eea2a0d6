//! Persistent creep memory (`.colony/memory.json`).
//!
//! Records are stored as raw JSON and decoded one creep at a time, so a single
//! corrupt record only takes its own creep out of the tick.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::core::memory::CreepMemory;
use crate::core::types::Role;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Memory {
    /// Counter used to name newly created creeps.
    #[serde(default)]
    pub next_creep_id: u32,
    /// Memory record per creep name.
    #[serde(default)]
    pub creeps: BTreeMap<String, Value>,
}

impl Memory {
    /// Decode the record of `name`, if one exists.
    pub fn decode(&self, name: &str) -> Result<Option<CreepMemory>> {
        let Some(raw) = self.creeps.get(name) else {
            return Ok(None);
        };
        let memory = CreepMemory::deserialize(raw)
            .with_context(|| format!("decode memory of creep {name}"))?;
        Ok(Some(memory))
    }

    pub fn encode(&mut self, name: &str, memory: &CreepMemory) -> Result<()> {
        let raw = serde_json::to_value(memory)
            .with_context(|| format!("encode memory of creep {name}"))?;
        self.creeps.insert(name.to_string(), raw);
        Ok(())
    }

    /// Drop records of creeps that no longer exist. Returns the removed names.
    pub fn forget_missing(&mut self, alive: impl Fn(&str) -> bool) -> Vec<String> {
        let dead: Vec<String> = self
            .creeps
            .keys()
            .filter(|name| !alive(name.as_str()))
            .cloned()
            .collect();
        for name in &dead {
            self.creeps.remove(name);
            info!(creep = %name, "forgot memory of dead creep");
        }
        dead
    }

    /// Reserve a fresh creep name for `role`.
    pub fn next_name(&mut self, role: Role) -> String {
        loop {
            self.next_creep_id += 1;
            let name = format!("{role}_{}", self.next_creep_id);
            if !self.creeps.contains_key(&name) {
                return name;
            }
        }
    }
}

/// Load memory from disk.
pub fn load_memory(path: &Path) -> Result<Memory> {
    debug!(path = %path.display(), "loading memory");
    let contents =
        fs::read_to_string(path).with_context(|| format!("read memory {}", path.display()))?;
    let memory: Memory = serde_json::from_str(&contents)
        .with_context(|| format!("parse memory {}", path.display()))?;
    debug!(creeps = memory.creeps.len(), "memory loaded");
    Ok(memory)
}

/// Load memory, or start empty when the file does not exist yet.
pub fn load_or_default_memory(path: &Path) -> Result<Memory> {
    if path.exists() {
        return load_memory(path);
    }
    Ok(Memory::default())
}

/// Atomically write memory to disk (temp file + rename).
pub fn write_memory(path: &Path, memory: &Memory) -> Result<()> {
    debug!(path = %path.display(), creeps = memory.creeps.len(), "writing memory");
    let mut buf = serde_json::to_string_pretty(memory)?;
    buf.push('\n');
    super::write_atomic(path, &buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::memory::Assignment;
    use crate::core::task::Task;
    use crate::core::types::ObjectId;

    /// Verifies write → read preserves every record.
    #[test]
    fn memory_round_trips() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("memory.json");

        let mut creep = CreepMemory::new(
            Role::Miner,
            Some(Assignment::object(ObjectId::new("src"))),
            "W1N1",
        );
        creep.task = Some(Task::harvest(ObjectId::new("src")).quiet());
        let mut memory = Memory::default();
        memory.encode("miner_1", &creep).expect("encode");

        write_memory(&path, &memory).expect("write");
        let loaded = load_memory(&path).expect("load");
        assert_eq!(loaded, memory);
        assert_eq!(loaded.decode("miner_1").expect("decode"), Some(creep));
    }

    /// Ensures default memory serializes to a known, stable JSON format.
    #[test]
    fn memory_defaults_are_deterministic() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("memory.json");

        write_memory(&path, &Memory::default()).expect("write");
        let contents = fs::read_to_string(&path).expect("read");
        assert_eq!(contents, "{\n  \"next_creep_id\": 0,\n  \"creeps\": {}\n}\n");
    }

    #[test]
    fn corrupt_record_fails_only_its_own_decode() {
        let mut memory = Memory::default();
        memory
            .creeps
            .insert("broken".to_string(), serde_json::json!({ "role": "wizard" }));
        memory
            .encode("guard_1", &CreepMemory::new(Role::Guard, None, "W1N1"))
            .expect("encode");

        assert!(memory.decode("broken").is_err());
        assert!(memory.decode("guard_1").expect("decode").is_some());
        assert_eq!(memory.decode("missing").expect("decode"), None);
    }

    #[test]
    fn forget_missing_and_naming() {
        let mut memory = Memory::default();
        let name = memory.next_name(Role::Guard);
        assert_eq!(name, "guard_1");
        memory
            .encode(&name, &CreepMemory::new(Role::Guard, None, "W1N1"))
            .expect("encode");
        memory
            .encode("miner_7", &CreepMemory::new(Role::Miner, None, "W1N1"))
            .expect("encode");

        let removed = memory.forget_missing(|name| name == "guard_1");
        assert_eq!(removed, vec!["miner_7".to_string()]);
        assert_eq!(memory.next_name(Role::Miner), "miner_2");
    }
}
