pub mod backend;
pub mod filesystem;
pub mod memory;

pub use backend::{StoreError, TemplateStore};
pub use filesystem::FilesystemTemplateStore;
pub use memory::InMemoryTemplateStore;
