//! SQLite-based machine storage.
//!
//! `SqliteMachineStore` keeps machines in a single `machines` table. Rows are
//! returned in insertion order (`seq`), which the best-location tie-break
//! relies on.

use anyhow::Context;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use vendcast_forecast::{LocationType, Machine, MachineInput};

use crate::machine_backend::{
    check_input, generate_machine_id, MachineBackend, MachineStoreError, MachineStoreResult,
};
use crate::seed::seed_machines;

const SCHEMA_VERSION: i32 = 1;

const SELECT_COLUMNS: &str = "SELECT id, name, location_type, expected_sales_per_day,
        average_profit_margin, rent_cost_per_day, electric_cost_per_temp_per_day
     FROM machines";

/// Row as stored, before the location type is parsed
struct StoredRow {
    id: String,
    name: String,
    location_type: String,
    expected_sales_per_day: f64,
    average_profit_margin: f64,
    rent_cost_per_day: f64,
    electric_cost_per_temp_per_day: f64,
}

impl StoredRow {
    fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            location_type: row.get(2)?,
            expected_sales_per_day: row.get(3)?,
            average_profit_margin: row.get(4)?,
            rent_cost_per_day: row.get(5)?,
            electric_cost_per_temp_per_day: row.get(6)?,
        })
    }

    /// `None` when the stored location type is not one we know
    fn into_machine(self) -> Option<Machine> {
        let location_type = match self.location_type.parse::<LocationType>() {
            Ok(t) => t,
            Err(e) => {
                tracing::warn!("Skipping stored machine {}: {}", self.id, e);
                return None;
            }
        };

        Some(Machine::from_input(
            self.id,
            MachineInput {
                name: self.name,
                location_type,
                expected_sales_per_day: self.expected_sales_per_day,
                average_profit_margin_percentage: self.average_profit_margin,
                rent_cost_per_day: self.rent_cost_per_day,
                electric_cost_per_temp_per_day: self.electric_cost_per_temp_per_day,
            },
        ))
    }
}

/// Local SQLite storage for machines
pub struct SqliteMachineStore {
    conn: Connection,
}

impl SqliteMachineStore {
    /// Open or create the database.
    ///
    /// When the database is new and `seed` is set, the demo machines are
    /// inserted.
    pub fn open(path: &Path, seed: bool) -> anyhow::Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open machines database at {:?}", path))?;
        Self::with_connection(conn, seed)
    }

    /// In-memory database (for testing).
    pub fn in_memory(seed: bool) -> anyhow::Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::with_connection(conn, seed)
    }

    fn with_connection(conn: Connection, seed: bool) -> anyhow::Result<Self> {
        let store = Self { conn };
        let created = store.init_schema()?;
        if created && seed {
            store.seed()?;
        }
        Ok(store)
    }

    /// Create tables if needed. Returns true when the schema was just created.
    fn init_schema(&self) -> anyhow::Result<bool> {
        self.conn
            .execute("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL)", [])?;

        let version: i32 = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| row.get(0))
            .optional()?
            .unwrap_or(0);

        if version > SCHEMA_VERSION {
            anyhow::bail!(
                "Machines database schema v{} is newer than supported v{}",
                version,
                SCHEMA_VERSION
            );
        }

        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS machines (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                id TEXT NOT NULL UNIQUE,
                name TEXT NOT NULL,
                location_type TEXT NOT NULL,
                expected_sales_per_day REAL NOT NULL,
                average_profit_margin REAL NOT NULL,
                rent_cost_per_day REAL NOT NULL,
                electric_cost_per_temp_per_day REAL NOT NULL
            );
            "#,
        )?;

        if version == SCHEMA_VERSION {
            return Ok(false);
        }

        self.conn.execute("DELETE FROM schema_version", [])?;
        self.conn
            .execute("INSERT INTO schema_version (version) VALUES (?1)", params![SCHEMA_VERSION])?;
        tracing::info!("Created machines schema v{}", SCHEMA_VERSION);
        Ok(true)
    }

    fn seed(&self) -> anyhow::Result<()> {
        let machines = seed_machines();
        for machine in &machines {
            self.insert(machine).context("Failed to seed machines")?;
        }
        tracing::info!("Seeded {} machines", machines.len());
        Ok(())
    }

    fn insert(&self, machine: &Machine) -> rusqlite::Result<()> {
        self.conn.execute(
            "INSERT INTO machines (id, name, location_type, expected_sales_per_day,
                 average_profit_margin, rent_cost_per_day, electric_cost_per_temp_per_day)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                machine.id,
                machine.name,
                machine.location_type.as_str(),
                machine.expected_sales_per_day,
                machine.average_profit_margin_percentage,
                machine.rent_cost_per_day,
                machine.electric_cost_per_temp_per_day,
            ],
        )?;
        Ok(())
    }
}

impl MachineBackend for SqliteMachineStore {
    fn list(&self) -> MachineStoreResult<Vec<Machine>> {
        let mut stmt = self.conn.prepare(&format!("{} ORDER BY seq", SELECT_COLUMNS))?;
        let rows = stmt
            .query_map([], StoredRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(rows.into_iter().filter_map(StoredRow::into_machine).collect())
    }

    fn get(&self, id: &str) -> MachineStoreResult<Option<Machine>> {
        let row = self
            .conn
            .query_row(
                &format!("{} WHERE id = ?1", SELECT_COLUMNS),
                params![id],
                StoredRow::from_row,
            )
            .optional()?;

        Ok(row.and_then(StoredRow::into_machine))
    }

    fn add(&self, input: MachineInput) -> MachineStoreResult<Machine> {
        let input = check_input(input)?;
        let machine = Machine::from_input(generate_machine_id(), input);
        self.insert(&machine)?;
        tracing::info!("Added machine {} ({})", machine.id, machine.name);
        Ok(machine)
    }

    fn update(&self, id: &str, input: MachineInput) -> MachineStoreResult<Machine> {
        let input = check_input(input)?;
        let changed = self.conn.execute(
            "UPDATE machines SET name = ?2, location_type = ?3, expected_sales_per_day = ?4,
                 average_profit_margin = ?5, rent_cost_per_day = ?6,
                 electric_cost_per_temp_per_day = ?7
             WHERE id = ?1",
            params![
                id,
                input.name,
                input.location_type.as_str(),
                input.expected_sales_per_day,
                input.average_profit_margin_percentage,
                input.rent_cost_per_day,
                input.electric_cost_per_temp_per_day,
            ],
        )?;

        if changed == 0 {
            return Err(MachineStoreError::not_found(id));
        }

        tracing::info!("Updated machine {}", id);
        Ok(Machine::from_input(id, input))
    }

    fn remove(&self, id: &str) -> MachineStoreResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM machines WHERE id = ?1", params![id])?;

        if changed == 0 {
            return Err(MachineStoreError::not_found(id));
        }

        tracing::info!("Removed machine {}", id);
        Ok(())
    }

    fn count(&self) -> MachineStoreResult<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM machines", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use tempfile::TempDir;

    fn input(name: &str, location_type: LocationType, sales: f64) -> MachineInput {
        MachineInput {
            name: name.to_string(),
            location_type,
            expected_sales_per_day: sales,
            average_profit_margin_percentage: 0.5,
            rent_cost_per_day: 20.0,
            electric_cost_per_temp_per_day: 2.0,
        }
    }

    #[test]
    fn test_new_store_is_seeded() {
        let store = SqliteMachineStore::in_memory(true).unwrap();
        let machines = store.list().unwrap();

        assert_eq!(machines.len(), 3);
        assert_eq!(machines[0].id, "machine-001");
        assert_eq!(machines[0].name, "Siam Paragon Lobby");
        assert_eq!(machines[1].location_type, LocationType::School);
        assert_eq!(machines[2].location_type, LocationType::Hospital);
    }

    #[test]
    fn test_seeding_disabled() {
        let store = SqliteMachineStore::in_memory(false).unwrap();
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_reopen_does_not_reseed() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("machines.db");

        {
            let store = SqliteMachineStore::open(&path, true).unwrap();
            store.remove("machine-002").unwrap();
        }

        let store = SqliteMachineStore::open(&path, true).unwrap();
        let ids: Vec<String> = store.list().unwrap().into_iter().map(|m| m.id).collect();
        assert_eq!(ids, vec!["machine-001", "machine-003"]);
    }

    #[test]
    fn test_add_preserves_insertion_order() {
        let store = SqliteMachineStore::in_memory(false).unwrap();
        let a = store.add(input("A", LocationType::Hospital, 100.0)).unwrap();
        let b = store.add(input("B", LocationType::School, 100.0)).unwrap();

        let ids: Vec<String> = store.snapshot().unwrap().into_iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![a.id.clone(), b.id]);
        assert!(a.id.starts_with("machine-"));
        assert!(store.get(&a.id).unwrap().is_some());
    }

    #[test]
    fn test_update_keeps_id_and_position() {
        let store = SqliteMachineStore::in_memory(true).unwrap();
        let updated = store
            .update("machine-001", input("Renamed", LocationType::School, 90.0))
            .unwrap();

        assert_eq!(updated.id, "machine-001");
        let machines = store.list().unwrap();
        assert_eq!(machines[0].name, "Renamed");
        assert_eq!(machines[0].location_type, LocationType::School);
        assert_eq!(machines[0].expected_sales_per_day, 90.0);
        assert_eq!(store.get("machine-001").unwrap(), Some(updated));
    }

    #[test]
    fn test_unknown_id_is_not_found() {
        let store = SqliteMachineStore::in_memory(false).unwrap();

        let update = store.update("machine-missing", input("X", LocationType::School, 1.0));
        assert!(matches!(update, Err(MachineStoreError::NotFound(_))));

        let remove = store.remove("machine-missing");
        assert!(matches!(remove, Err(MachineStoreError::NotFound(_))));

        assert_eq!(store.get("machine-missing").unwrap(), None);
    }

    #[test]
    fn test_invalid_input_rejected() {
        let store = SqliteMachineStore::in_memory(false).unwrap();
        let bad = MachineInput {
            average_profit_margin_percentage: 40.0,
            ..input("Bad", LocationType::School, 1.0)
        };

        assert!(matches!(store.add(bad), Err(MachineStoreError::Validation(_))));
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_unknown_location_type_skipped() {
        let store = SqliteMachineStore::in_memory(true).unwrap();
        store
            .conn
            .execute(
                "UPDATE machines SET location_type = 'AIRPORT' WHERE id = 'machine-002'",
                [],
            )
            .unwrap();

        let machines = store.list().unwrap();
        assert_eq!(machines.len(), 2);
        assert!(machines.iter().all(|m| m.id != "machine-002"));
        assert_eq!(store.get("machine-002").unwrap(), None);
    }

    #[test]
    fn test_shopping_mall_round_trips_through_storage() {
        let store = SqliteMachineStore::in_memory(false).unwrap();
        let added = store.add(input("Mall", LocationType::ShoppingMall, 10.0)).unwrap();

        let stored: String = store
            .conn
            .query_row(
                "SELECT location_type FROM machines WHERE id = ?1",
                params![added.id],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(stored, "SHOPPING MALL");
        assert_eq!(store.get(&added.id).unwrap().unwrap().location_type, LocationType::ShoppingMall);
    }
}
