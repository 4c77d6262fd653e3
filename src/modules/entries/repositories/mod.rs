pub mod entry_repository;

pub use entry_repository::{EntryRepository, InMemoryEntryRepository, MySqlEntryRepository};
