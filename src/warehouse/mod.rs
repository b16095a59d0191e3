mod models;
mod schema;
mod store;

pub use models::{Artist, Song, Songplay, TimeRow, User};
pub use store::{SqliteWarehouse, TableCounts};
