//! formcraft-store — reference store implementations for FormCraft.
//!
//! Implements the `FormStore`/`ResponseStore` traits from
//! `formcraft-core` in memory, for tests, the CLI, and small
//! deployments. Database-backed stores live outside this workspace.

mod memory;

pub use memory::MemoryStore;
