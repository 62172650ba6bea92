//! SQLite store for sheetwise.
//!
//! Every persistence and query operation goes through [`Store`]. Callers never
//! touch `rusqlite` directly.
//!
//! # Usage
//!
//! ```rust,ignore
//! use sheetwise_db::{ColumnDescriptor, CreateMode, SqlType, Store, Value};
//!
//! let mut store = Store::open("my_database.db")?;
//! let columns = vec![ColumnDescriptor::new("id", SqlType::Integer)];
//! store.create_table("orders", &columns, &[vec![Value::Integer(1)]], CreateMode::New)?;
//! let rows = store.execute("SELECT * FROM orders")?;
//! store.close()?;
//! ```

mod error;
pub mod sql;
mod store;
mod types;

pub use error::{DbError, Result};
pub use sql::quote_ident;
pub use store::{CreateMode, Store, DEFAULT_DB_PATH};
pub use types::{ColumnDescriptor, ColumnInfo, QueryResult, SqlType, Value};
