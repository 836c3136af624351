pub mod documents;
pub mod health;
pub mod templates;

pub use documents::{generate_document, preview_document};
pub use health::health_check;
pub use templates::{get_template, save_default_template, save_template};
