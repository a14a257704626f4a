// III-IV
// Copyright 2023 Julio Merino
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not
// use this file except in compliance with the License.  You may obtain a copy
// of the License at:
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.  See the
// License for the specific language governing permissions and limitations
// under the License.

//! Database abstraction in terms of the operations needed by the server.
//!
//! The PostgreSQL backend is for production use and the SQLite backend is primarily intended to
//! support unit tests.  On top of either backend, customers can be accessed with raw SQL queries
//! or via an object-relational mapper, and both implementations must behave identically.

use crate::model::*;
use async_trait::async_trait;
use sqlx::postgres::PgPool;
use sqlx::sqlite::SqlitePool;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

mod entity;
mod orm;
pub(crate) use orm::OrmCustomerDao;
pub mod postgres;
mod sql;
pub(crate) use sql::SqlCustomerDao;
pub mod sqlite;

/// Database errors.  Any unexpected errors that come from the database are classified as
/// `BackendError`, but errors we know about have more specific types.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum DbError {
    /// Indicates that a request to create an entry failed because it already exists.
    #[error("Already exists")]
    AlreadyExists,

    /// Catch-all error type for unexpected database errors.
    #[error("Database error: {0}")]
    BackendError(String),

    /// Indicates a failure processing the data that already exists in the database.
    #[error("Data integrity error: {0}")]
    DataIntegrityError(String),

    /// Indicates that a requested entry does not exist.
    #[error("Entity not found")]
    NotFound,

    /// Indicates that the database is not available (maybe because of too many active concurrent
    /// connections).
    #[error("Unavailable")]
    Unavailable,
}

/// Result type for this module.
pub type DbResult<T> = Result<T, DbError>;

/// Operations to access the customers stored in the database.
///
/// None of these operations enforce business rules.  In particular, email uniqueness is expected
/// to be checked by the caller before inserting or updating a customer.
#[async_trait]
pub(crate) trait CustomerDao {
    /// Gets all existing customers ordered by their identifier.
    async fn list(&self) -> DbResult<Vec<Customer>>;

    /// Gets the customer identified by `id`, or `None` if it does not exist.
    async fn get_by_id(&self, id: CustomerId) -> DbResult<Option<Customer>>;

    /// Stores a new `customer` and returns the identifier assigned to it.
    async fn insert(&self, customer: &NewCustomer) -> DbResult<CustomerId>;

    /// Checks if any customer has the given `email` address.
    async fn exists_by_email(&self, email: &str) -> DbResult<bool>;

    /// Checks if a customer identified by `id` exists.
    async fn exists_by_id(&self, id: CustomerId) -> DbResult<bool>;

    /// Deletes the customer identified by `id`.  Deleting a missing customer is not an error.
    async fn delete_by_id(&self, id: CustomerId) -> DbResult<()>;

    /// Applies the non-empty fields in `changes` to the customer identified by `id`.
    async fn update(&self, id: CustomerId, changes: &CustomerChanges) -> DbResult<()>;
}

/// Connection pool to one of the supported database systems.
///
/// Users of this type are forced to destructure it and issue different calls for each database.
#[derive(Clone, Debug)]
pub enum SqlPool {
    /// A PostgreSQL connection pool.
    Postgres(PgPool),

    /// A SQLite connection pool.
    Sqlite(SqlitePool),
}

impl SqlPool {
    /// Creates the `customer` table if it does not exist yet.
    pub async fn init_schema(&self) -> DbResult<()> {
        match self {
            SqlPool::Postgres(pool) => {
                postgres::run_schema(pool, include_str!("postgres.sql")).await
            }
            SqlPool::Sqlite(pool) => sqlite::run_schema(pool, include_str!("sqlite.sql")).await,
        }
    }

    /// Closes all connections in the pool.
    pub async fn close(&self) {
        match self {
            SqlPool::Postgres(pool) => pool.close().await,
            SqlPool::Sqlite(pool) => pool.close().await,
        }
    }
}

/// Available implementations of the `CustomerDao`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum DaoKind {
    /// Raw SQL queries.
    #[default]
    Sql,

    /// Object-relational mapping.
    Orm,
}

impl fmt::Display for DaoKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DaoKind::Sql => write!(f, "sql"),
            DaoKind::Orm => write!(f, "orm"),
        }
    }
}

impl FromStr for DaoKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sql" => Ok(DaoKind::Sql),
            "orm" => Ok(DaoKind::Orm),
            s => Err(format!("Unknown data access implementation '{}'", s)),
        }
    }
}

/// Instantiates the `CustomerDao` of the given `kind` on top of `pool`.
pub(crate) fn new_dao(kind: DaoKind, pool: SqlPool) -> Arc<dyn CustomerDao + Send + Sync> {
    match kind {
        DaoKind::Sql => Arc::new(SqlCustomerDao::new(pool)),
        DaoKind::Orm => Arc::new(OrmCustomerDao::new(pool)),
    }
}
