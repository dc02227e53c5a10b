//! Storage implementations for the template workbook and the client directory

pub mod in_memory;
pub mod json_directory;
pub mod xlsx;

pub use in_memory::{InMemoryClientDirectory, InMemoryTemplateStore};
pub use json_directory::JsonClientDirectory;
pub use xlsx::XlsxTemplateStore;
