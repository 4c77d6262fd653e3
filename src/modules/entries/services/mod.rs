pub mod entry_service;

pub use entry_service::EntryService;
