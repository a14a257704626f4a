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

//! Implementation of the customer data access using raw SQL queries.
//!
//! Both PostgreSQL and SQLite accept `$N` placeholders so the queries are shared, but the
//! bindings have to be issued separately for each database to keep sqlx's type safety.

use crate::db::{postgres, sqlite, CustomerDao, DbError, DbResult, SqlPool};
use crate::model::*;
use async_trait::async_trait;
use futures::TryStreamExt;
use log::debug;
use sqlx::postgres::PgRow;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

impl TryFrom<PgRow> for Customer {
    type Error = DbError;

    fn try_from(row: PgRow) -> DbResult<Self> {
        let id: i64 = row.try_get("id").map_err(postgres::map_sqlx_error)?;
        let name: String = row.try_get("name").map_err(postgres::map_sqlx_error)?;
        let email: String = row.try_get("email").map_err(postgres::map_sqlx_error)?;
        let age: i32 = row.try_get("age").map_err(postgres::map_sqlx_error)?;

        Ok(Customer::new(CustomerId::new(id), name, email, age))
    }
}

impl TryFrom<SqliteRow> for Customer {
    type Error = DbError;

    fn try_from(row: SqliteRow) -> DbResult<Self> {
        let id: i64 = row.try_get("id").map_err(sqlite::map_sqlx_error)?;
        let name: String = row.try_get("name").map_err(sqlite::map_sqlx_error)?;
        let email: String = row.try_get("email").map_err(sqlite::map_sqlx_error)?;
        let age: i32 = row.try_get("age").map_err(sqlite::map_sqlx_error)?;

        Ok(Customer::new(CustomerId::new(id), name, email, age))
    }
}

/// Data access backed by handwritten SQL queries.
pub(crate) struct SqlCustomerDao {
    /// Pool to issue the queries against.
    pool: SqlPool,
}

impl SqlCustomerDao {
    /// Creates a new data access object on top of `pool`.
    pub(crate) fn new(pool: SqlPool) -> Self {
        Self { pool }
    }

    /// Runs a `query_str` that counts rows filtered by a single text `value`.
    async fn count_by_text(&self, query_str: &str, value: &str) -> DbResult<i64> {
        match &self.pool {
            SqlPool::Postgres(pool) => {
                let row = sqlx::query(query_str)
                    .bind(value)
                    .fetch_one(pool)
                    .await
                    .map_err(postgres::map_sqlx_error)?;
                row.try_get("count").map_err(postgres::map_sqlx_error)
            }

            SqlPool::Sqlite(pool) => {
                let row = sqlx::query(query_str)
                    .bind(value)
                    .fetch_one(pool)
                    .await
                    .map_err(sqlite::map_sqlx_error)?;
                row.try_get("count").map_err(sqlite::map_sqlx_error)
            }
        }
    }

    /// Runs an `UPDATE` `query_str` that sets a text `value` on the customer `id`.
    async fn update_text(&self, query_str: &str, value: &str, id: CustomerId) -> DbResult<u64> {
        let done = match &self.pool {
            SqlPool::Postgres(pool) => sqlx::query(query_str)
                .bind(value)
                .bind(id.as_i64())
                .execute(pool)
                .await
                .map_err(postgres::map_sqlx_error)?
                .rows_affected(),

            SqlPool::Sqlite(pool) => sqlx::query(query_str)
                .bind(value)
                .bind(id.as_i64())
                .execute(pool)
                .await
                .map_err(sqlite::map_sqlx_error)?
                .rows_affected(),
        };
        Ok(done)
    }

    /// Runs an `UPDATE` `query_str` that sets an integer `value` on the customer `id`.
    async fn update_int(&self, query_str: &str, value: i32, id: CustomerId) -> DbResult<u64> {
        let done = match &self.pool {
            SqlPool::Postgres(pool) => sqlx::query(query_str)
                .bind(value)
                .bind(id.as_i64())
                .execute(pool)
                .await
                .map_err(postgres::map_sqlx_error)?
                .rows_affected(),

            SqlPool::Sqlite(pool) => sqlx::query(query_str)
                .bind(value)
                .bind(id.as_i64())
                .execute(pool)
                .await
                .map_err(sqlite::map_sqlx_error)?
                .rows_affected(),
        };
        Ok(done)
    }
}

/// Checks that an `UPDATE` touched exactly one row.
fn check_updated(column: &str, rows_affected: u64) -> DbResult<()> {
    debug!("Update of customer {} affected {} rows", column, rows_affected);
    match rows_affected {
        0 => Err(DbError::NotFound),
        1 => Ok(()),
        _ => Err(DbError::BackendError("Update affected more than one row".to_owned())),
    }
}

#[async_trait]
impl CustomerDao for SqlCustomerDao {
    async fn list(&self) -> DbResult<Vec<Customer>> {
        let query_str = "SELECT id, name, email, age FROM customer ORDER BY id";

        let mut customers = vec![];
        match &self.pool {
            SqlPool::Postgres(pool) => {
                let mut rows = sqlx::query(query_str).fetch(pool);
                while let Some(row) = rows.try_next().await.map_err(postgres::map_sqlx_error)? {
                    customers.push(Customer::try_from(row)?);
                }
            }

            SqlPool::Sqlite(pool) => {
                let mut rows = sqlx::query(query_str).fetch(pool);
                while let Some(row) = rows.try_next().await.map_err(sqlite::map_sqlx_error)? {
                    customers.push(Customer::try_from(row)?);
                }
            }
        }
        Ok(customers)
    }

    async fn get_by_id(&self, id: CustomerId) -> DbResult<Option<Customer>> {
        let query_str = "SELECT id, name, email, age FROM customer WHERE id = $1";

        match &self.pool {
            SqlPool::Postgres(pool) => {
                let maybe_row = sqlx::query(query_str)
                    .bind(id.as_i64())
                    .fetch_optional(pool)
                    .await
                    .map_err(postgres::map_sqlx_error)?;
                maybe_row.map(Customer::try_from).transpose()
            }

            SqlPool::Sqlite(pool) => {
                let maybe_row = sqlx::query(query_str)
                    .bind(id.as_i64())
                    .fetch_optional(pool)
                    .await
                    .map_err(sqlite::map_sqlx_error)?;
                maybe_row.map(Customer::try_from).transpose()
            }
        }
    }

    async fn insert(&self, customer: &NewCustomer) -> DbResult<CustomerId> {
        let query_str = "INSERT INTO customer (name, email, age) VALUES ($1, $2, $3) RETURNING id";

        let id: i64 = match &self.pool {
            SqlPool::Postgres(pool) => {
                let row = sqlx::query(query_str)
                    .bind(customer.name().as_str())
                    .bind(customer.email().as_str())
                    .bind(*customer.age())
                    .fetch_one(pool)
                    .await
                    .map_err(postgres::map_sqlx_error)?;
                row.try_get("id").map_err(postgres::map_sqlx_error)?
            }

            SqlPool::Sqlite(pool) => {
                let row = sqlx::query(query_str)
                    .bind(customer.name().as_str())
                    .bind(customer.email().as_str())
                    .bind(*customer.age())
                    .fetch_one(pool)
                    .await
                    .map_err(sqlite::map_sqlx_error)?;
                row.try_get("id").map_err(sqlite::map_sqlx_error)?
            }
        };
        debug!("Inserted customer with id {}", id);
        Ok(CustomerId::new(id))
    }

    async fn exists_by_email(&self, email: &str) -> DbResult<bool> {
        let query_str = "SELECT COUNT(id) AS count FROM customer WHERE email = $1";
        Ok(self.count_by_text(query_str, email).await? > 0)
    }

    async fn exists_by_id(&self, id: CustomerId) -> DbResult<bool> {
        let query_str = "SELECT COUNT(id) AS count FROM customer WHERE id = $1";

        let count: i64 = match &self.pool {
            SqlPool::Postgres(pool) => {
                let row = sqlx::query(query_str)
                    .bind(id.as_i64())
                    .fetch_one(pool)
                    .await
                    .map_err(postgres::map_sqlx_error)?;
                row.try_get("count").map_err(postgres::map_sqlx_error)?
            }

            SqlPool::Sqlite(pool) => {
                let row = sqlx::query(query_str)
                    .bind(id.as_i64())
                    .fetch_one(pool)
                    .await
                    .map_err(sqlite::map_sqlx_error)?;
                row.try_get("count").map_err(sqlite::map_sqlx_error)?
            }
        };
        Ok(count > 0)
    }

    async fn delete_by_id(&self, id: CustomerId) -> DbResult<()> {
        let query_str = "DELETE FROM customer WHERE id = $1";

        let rows_affected = match &self.pool {
            SqlPool::Postgres(pool) => sqlx::query(query_str)
                .bind(id.as_i64())
                .execute(pool)
                .await
                .map_err(postgres::map_sqlx_error)?
                .rows_affected(),

            SqlPool::Sqlite(pool) => sqlx::query(query_str)
                .bind(id.as_i64())
                .execute(pool)
                .await
                .map_err(sqlite::map_sqlx_error)?
                .rows_affected(),
        };
        debug!("Deletion of customer {} affected {} rows", id, rows_affected);

        if rows_affected > 1 {
            return Err(DbError::BackendError("Deletion affected more than one row".to_owned()));
        }
        Ok(())
    }

    async fn update(&self, id: CustomerId, changes: &CustomerChanges) -> DbResult<()> {
        if let Some(name) = changes.name.as_ref() {
            let query_str = "UPDATE customer SET name = $1 WHERE id = $2";
            check_updated("name", self.update_text(query_str, name, id).await?)?;
        }
        if let Some(age) = changes.age {
            let query_str = "UPDATE customer SET age = $1 WHERE id = $2";
            check_updated("age", self.update_int(query_str, age, id).await?)?;
        }
        if let Some(email) = changes.email.as_ref() {
            let query_str = "UPDATE customer SET email = $1 WHERE id = $2";
            check_updated("email", self.update_text(query_str, email, id).await?)?;
        }
        Ok(())
    }
}
