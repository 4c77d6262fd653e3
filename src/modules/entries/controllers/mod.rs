pub mod entry_controller;

pub use entry_controller::configure;
