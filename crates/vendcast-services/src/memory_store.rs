//! In-memory machine storage, optionally mirrored to a JSON file.

use std::path::{Path, PathBuf};

use anyhow::Context;
use parking_lot::Mutex;
use vendcast_forecast::{Machine, MachineInput};

use crate::machine_backend::{
    check_input, generate_machine_id, MachineBackend, MachineStoreError, MachineStoreResult,
};
use crate::seed::seed_machines;

/// Machines held in a `Vec`, in insertion order
#[derive(Debug, Default)]
pub struct MemoryMachineStore {
    machines: Mutex<Vec<Machine>>,
    /// Rewritten after every change when set
    file: Option<PathBuf>,
}

impl MemoryMachineStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_machines(machines: Vec<Machine>) -> Self {
        Self {
            machines: Mutex::new(machines),
            file: None,
        }
    }

    /// Store holding the demo machines
    pub fn seeded() -> Self {
        Self::with_machines(seed_machines())
    }

    /// Load from a serialized machine array.
    ///
    /// Unparseable JSON or any invalid record falls back to the demo machines.
    pub fn from_json(raw: &str) -> Self {
        let machines = match serde_json::from_str::<Vec<Machine>>(raw) {
            Ok(machines) => machines,
            Err(e) => {
                tracing::warn!("Failed to parse stored machines: {}", e);
                return Self::seeded();
            }
        };

        for machine in &machines {
            if let Err(e) = check_input(MachineInput::from(machine)) {
                tracing::warn!("Invalid machines payload ({}): {}", machine.id, e);
                return Self::seeded();
            }
        }

        Self::with_machines(machines)
    }

    /// Open the JSON file at `path`, keeping it in sync from then on.
    ///
    /// A missing file starts with the demo machines when `seed` is set, and is
    /// written immediately.
    pub fn open_file(path: &Path, seed: bool) -> MachineStoreResult<Self> {
        let mut store = if path.exists() {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            Self::from_json(&raw)
        } else if seed {
            Self::seeded()
        } else {
            Self::new()
        };

        store.file = Some(path.to_path_buf());
        store.persist()?;
        tracing::info!("Opened machines file {}", path.display());
        Ok(store)
    }

    /// Serialize the current machines as a JSON array
    pub fn to_json(&self) -> MachineStoreResult<String> {
        serde_json::to_string_pretty(&*self.machines.lock())
            .map_err(|e| MachineStoreError::Other(e.into()))
    }

    fn persist(&self) -> MachineStoreResult<()> {
        let Some(path) = &self.file else {
            return Ok(());
        };
        let json = self.to_json()?;
        std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }
}

impl MachineBackend for MemoryMachineStore {
    fn list(&self) -> MachineStoreResult<Vec<Machine>> {
        Ok(self.machines.lock().clone())
    }

    fn get(&self, id: &str) -> MachineStoreResult<Option<Machine>> {
        Ok(self.machines.lock().iter().find(|m| m.id == id).cloned())
    }

    fn add(&self, input: MachineInput) -> MachineStoreResult<Machine> {
        let input = check_input(input)?;
        let machine = Machine::from_input(generate_machine_id(), input);
        self.machines.lock().push(machine.clone());
        self.persist()?;
        Ok(machine)
    }

    fn update(&self, id: &str, input: MachineInput) -> MachineStoreResult<Machine> {
        let input = check_input(input)?;
        let updated = {
            let mut machines = self.machines.lock();
            let machine = machines
                .iter_mut()
                .find(|m| m.id == id)
                .ok_or_else(|| MachineStoreError::not_found(id))?;
            machine.apply(input);
            machine.clone()
        };
        self.persist()?;
        Ok(updated)
    }

    fn remove(&self, id: &str) -> MachineStoreResult<()> {
        let removed = {
            let mut machines = self.machines.lock();
            let before = machines.len();
            machines.retain(|m| m.id != id);
            machines.len() < before
        };
        if !removed {
            return Err(MachineStoreError::not_found(id));
        }
        self.persist()
    }

    fn count(&self) -> MachineStoreResult<usize> {
        Ok(self.machines.lock().len())
    }
}
