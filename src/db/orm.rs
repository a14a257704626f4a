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

//! Implementation of the customer data access using the sea-orm object-relational mapper.

use crate::db::entity::{self, Column, Entity};
use crate::db::{CustomerDao, DbError, DbResult, SqlPool};
use crate::model::*;
use async_trait::async_trait;
use sea_orm::ActiveValue::{NotSet, Set, Unchanged};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, SqlErr, SqlxPostgresConnector, SqlxSqliteConnector,
};

/// Takes a raw sea-orm error `e` and converts it to our generic error type.
fn map_orm_error(e: DbErr) -> DbError {
    if let Some(SqlErr::UniqueConstraintViolation(_)) = e.sql_err() {
        return DbError::AlreadyExists;
    }
    match e {
        DbErr::ConnectionAcquire(_) => DbError::Unavailable,
        DbErr::RecordNotFound(_) | DbErr::RecordNotUpdated => DbError::NotFound,
        DbErr::Type(msg) => DbError::DataIntegrityError(msg),
        e => DbError::BackendError(e.to_string()),
    }
}

/// Data access that delegates query generation to sea-orm.
pub(crate) struct OrmCustomerDao {
    /// Connection wrapping the same pool used by the rest of the service.
    conn: DatabaseConnection,
}

impl OrmCustomerDao {
    /// Creates a new data access object on top of `pool`.
    pub(crate) fn new(pool: SqlPool) -> Self {
        let conn = match pool {
            SqlPool::Postgres(pool) => SqlxPostgresConnector::from_sqlx_postgres_pool(pool),
            SqlPool::Sqlite(pool) => SqlxSqliteConnector::from_sqlx_sqlite_pool(pool),
        };
        Self { conn }
    }
}

#[async_trait]
impl CustomerDao for OrmCustomerDao {
    async fn list(&self) -> DbResult<Vec<Customer>> {
        let models = Entity::find()
            .order_by_asc(Column::Id)
            .all(&self.conn)
            .await
            .map_err(map_orm_error)?;
        Ok(models.into_iter().map(Customer::from).collect())
    }

    async fn get_by_id(&self, id: CustomerId) -> DbResult<Option<Customer>> {
        let model = Entity::find_by_id(id.as_i64()).one(&self.conn).await.map_err(map_orm_error)?;
        Ok(model.map(Customer::from))
    }

    async fn insert(&self, customer: &NewCustomer) -> DbResult<CustomerId> {
        let active = entity::ActiveModel {
            id: NotSet,
            name: Set(customer.name().clone()),
            email: Set(customer.email().clone()),
            age: Set(*customer.age()),
        };
        let model = active.insert(&self.conn).await.map_err(map_orm_error)?;
        Ok(CustomerId::new(model.id))
    }

    async fn exists_by_email(&self, email: &str) -> DbResult<bool> {
        let count = Entity::find()
            .filter(Column::Email.eq(email))
            .count(&self.conn)
            .await
            .map_err(map_orm_error)?;
        Ok(count > 0)
    }

    async fn exists_by_id(&self, id: CustomerId) -> DbResult<bool> {
        let count = Entity::find()
            .filter(Column::Id.eq(id.as_i64()))
            .count(&self.conn)
            .await
            .map_err(map_orm_error)?;
        Ok(count > 0)
    }

    async fn delete_by_id(&self, id: CustomerId) -> DbResult<()> {
        let result =
            Entity::delete_by_id(id.as_i64()).exec(&self.conn).await.map_err(map_orm_error)?;
        if result.rows_affected > 1 {
            return Err(DbError::BackendError("Deletion affected more than one row".to_owned()));
        }
        Ok(())
    }

    async fn update(&self, id: CustomerId, changes: &CustomerChanges) -> DbResult<()> {
        if changes.is_empty() {
            return Ok(());
        }

        let active = entity::ActiveModel {
            id: Unchanged(id.as_i64()),
            name: changes.name.clone().map_or(NotSet, Set),
            email: changes.email.clone().map_or(NotSet, Set),
            age: changes.age.map_or(NotSet, Set),
        };
        active.update(&self.conn).await.map_err(map_orm_error)?;
        Ok(())
    }
}
