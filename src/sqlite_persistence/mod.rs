mod schema;

pub use schema::{Column, ForeignKey, Schema, SqlType, Table};
