//! Shared database types. The pool itself is opened by `PgGameStore::connect`,
//! which also applies the migrations shipped in `migrations/`.

use sqlx::{Pool, Postgres};

/// The connection pool type used by the Postgres store.
pub type DbPool = Pool<Postgres>;
