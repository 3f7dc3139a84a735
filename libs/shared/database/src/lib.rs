pub mod sqlite;
pub mod timestamps;

pub use sqlite::Database;
