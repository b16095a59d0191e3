use anyhow::{Context, Result};
use rusqlite::Connection;

#[macro_export]
macro_rules! sqlite_column {
    ($name:expr, $sql_type:expr $(, $field:ident = $value:expr)*) => {
        {
            // Allow unused_mut because the variable is only mutated when optional
            // field assignments are passed to the macro (e.g., `non_null = true`)
            #[allow(unused_mut)]
            let mut column = Column {
                name: $name,
                sql_type: $sql_type,
                is_primary_key: false,
                non_null: false,
                foreign_key: None,
            };
            $(
                column.$field = $value;
            )*
            column
        }
    };
}

#[derive(Debug, PartialEq, Eq)]
pub enum SqlType {
    Text,
    Integer,
    Real,
}

pub struct ForeignKey {
    pub foreign_table: &'static str,
    pub foreign_column: &'static str,
}

pub struct Column {
    pub name: &'static str,
    pub sql_type: &'static SqlType,
    pub is_primary_key: bool,
    pub non_null: bool,
    pub foreign_key: Option<&'static ForeignKey>,
}

pub struct Table {
    pub name: &'static str,
    pub columns: &'static [Column],
    /// Table-level composite primary key. Empty when a single column
    /// carries `is_primary_key` instead.
    pub primary_key: &'static [&'static str],
}

impl Table {
    fn create_sql(&self) -> String {
        let mut create_sql = format!("CREATE TABLE IF NOT EXISTS {} (", self.name);
        for (column_index, column) in self.columns.iter().enumerate() {
            if column_index > 0 {
                create_sql.push_str(", ");
            }
            create_sql.push_str(&format!(
                "{} {}",
                column.name,
                match column.sql_type {
                    SqlType::Text => "TEXT",
                    SqlType::Integer => "INTEGER",
                    SqlType::Real => "REAL",
                }
            ));
            if column.is_primary_key {
                create_sql.push_str(" PRIMARY KEY");
            }
            if column.non_null {
                create_sql.push_str(" NOT NULL");
            }
            if let Some(foreign_key) = column.foreign_key {
                create_sql.push_str(&format!(
                    " REFERENCES {}({})",
                    foreign_key.foreign_table, foreign_key.foreign_column
                ));
            }
        }
        if !self.primary_key.is_empty() {
            create_sql.push_str(&format!(", PRIMARY KEY ({})", self.primary_key.join(", ")));
        }
        create_sql.push_str(");");
        create_sql
    }

    pub fn create(&self, conn: &Connection) -> Result<()> {
        conn.execute(&self.create_sql(), [])?;
        Ok(())
    }

    pub fn drop(&self, conn: &Connection) -> Result<()> {
        conn.execute(&format!("DROP TABLE IF EXISTS {};", self.name), [])?;
        Ok(())
    }
}

pub struct Schema {
    pub tables: &'static [Table],
}

impl Schema {
    /// Create every table in declaration order. Parents must be listed
    /// before the tables whose foreign keys reference them.
    pub fn create_all(&self, conn: &Connection) -> Result<()> {
        for table in self.tables {
            table
                .create(conn)
                .with_context(|| format!("Failed to create table {}", table.name))?;
        }
        Ok(())
    }

    /// Drop every table, children first (reverse declaration order).
    pub fn drop_all(&self, conn: &Connection) -> Result<()> {
        for table in self.tables.iter().rev() {
            table
                .drop(conn)
                .with_context(|| format!("Failed to drop table {}", table.name))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PARENT_TABLE: Table = Table {
        name: "parent",
        columns: &[
            sqlite_column!("id", &SqlType::Text, is_primary_key = true),
            sqlite_column!("name", &SqlType::Text, non_null = true),
        ],
        primary_key: &[],
    };

    const PARENT_FK: ForeignKey = ForeignKey {
        foreign_table: "parent",
        foreign_column: "id",
    };

    const CHILD_TABLE: Table = Table {
        name: "child",
        columns: &[
            sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
            sqlite_column!("parent_id", &SqlType::Text, foreign_key = Some(&PARENT_FK)),
            sqlite_column!("score", &SqlType::Real),
        ],
        primary_key: &[],
    };

    const COMPOSITE_TABLE: Table = Table {
        name: "composite",
        columns: &[
            sqlite_column!("a", &SqlType::Integer, non_null = true),
            sqlite_column!("b", &SqlType::Text, non_null = true),
            sqlite_column!("note", &SqlType::Text),
        ],
        primary_key: &["a", "b"],
    };

    const TEST_SCHEMA: Schema = Schema {
        tables: &[PARENT_TABLE, CHILD_TABLE, COMPOSITE_TABLE],
    };

    #[test]
    fn creates_and_drops_all_tables() {
        let conn = Connection::open_in_memory().unwrap();
        TEST_SCHEMA.create_all(&conn).unwrap();

        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
                [],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(count, 3);

        TEST_SCHEMA.drop_all(&conn).unwrap();
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
                [],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn create_all_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        TEST_SCHEMA.create_all(&conn).unwrap();
        TEST_SCHEMA.create_all(&conn).unwrap();
    }

    #[test]
    fn composite_primary_key_rejects_duplicates() {
        let conn = Connection::open_in_memory().unwrap();
        TEST_SCHEMA.create_all(&conn).unwrap();

        conn.execute("INSERT INTO composite (a, b, note) VALUES (1, 'x', 'first')", [])
            .unwrap();
        let duplicate = conn.execute("INSERT INTO composite (a, b, note) VALUES (1, 'x', 'second')", []);
        assert!(duplicate.is_err());

        // A different composite key is a different row
        conn.execute("INSERT INTO composite (a, b, note) VALUES (1, 'y', 'third')", [])
            .unwrap();
    }

    #[test]
    fn foreign_key_enforced_when_pragma_on() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute("PRAGMA foreign_keys = ON;", []).unwrap();
        TEST_SCHEMA.create_all(&conn).unwrap();

        let orphan = conn.execute("INSERT INTO child (parent_id, score) VALUES ('missing', 1.0)", []);
        assert!(orphan.is_err());

        conn.execute("INSERT INTO parent (id, name) VALUES ('p1', 'Parent')", [])
            .unwrap();
        conn.execute("INSERT INTO child (parent_id, score) VALUES ('p1', 1.0)", [])
            .unwrap();

        // NULL foreign keys are allowed
        conn.execute("INSERT INTO child (parent_id, score) VALUES (NULL, 2.0)", [])
            .unwrap();
    }
}
