pub mod appointment;
pub mod directory;
pub mod selector;
pub mod template;
