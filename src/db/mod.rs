mod preferences;
mod repository;
mod schema;

pub use preferences::PreferenceStore;
pub use repository::Repository;
