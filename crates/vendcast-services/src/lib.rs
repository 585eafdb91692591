pub mod machine_backend;
pub mod machine_store;
pub mod memory_store;
pub mod seed;
pub mod validation;

pub use machine_backend::{
    generate_machine_id, MachineBackend, MachineStoreError, MachineStoreResult,
};
pub use machine_store::SqliteMachineStore;
pub use memory_store::MemoryMachineStore;
pub use seed::seed_machines;
pub use validation::{validate_input, FieldError, ValidationErrors};
