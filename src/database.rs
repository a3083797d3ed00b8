use std::ops::Deref;

use sqlx::PgPool;

/// A handle to the application's Postgres database, cloneable and cheap to
/// pass into query objects.
#[derive(Clone)]
pub struct PostgresConnection(PgPool);

impl PostgresConnection {
    pub fn new(pool: PgPool) -> Self {
        Self(pool)
    }
}

impl Deref for PostgresConnection {
    type Target = PgPool;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
