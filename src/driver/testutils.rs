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

//! Test utilities for the business logic.

use crate::db::{new_dao, sqlite, CustomerDao, DaoKind, DbResult, SqlPool};
use crate::driver::Driver;
use crate::model::*;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Data access wrapper that counts the number of mutating calls that go through it.
pub(crate) struct CountingDao {
    /// The wrapped data access object.
    inner: Arc<dyn CustomerDao + Send + Sync>,

    /// Number of `insert`, `delete_by_id` and `update` calls issued so far.
    writes: AtomicUsize,
}

impl CountingDao {
    /// Wraps `inner` with a zero write count.
    pub(crate) fn new(inner: Arc<dyn CustomerDao + Send + Sync>) -> Self {
        Self { inner, writes: AtomicUsize::new(0) }
    }

    /// Returns the number of writes issued so far.
    pub(crate) fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CustomerDao for CountingDao {
    async fn list(&self) -> DbResult<Vec<Customer>> {
        self.inner.list().await
    }

    async fn get_by_id(&self, id: CustomerId) -> DbResult<Option<Customer>> {
        self.inner.get_by_id(id).await
    }

    async fn insert(&self, customer: &NewCustomer) -> DbResult<CustomerId> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.insert(customer).await
    }

    async fn exists_by_email(&self, email: &str) -> DbResult<bool> {
        self.inner.exists_by_email(email).await
    }

    async fn exists_by_id(&self, id: CustomerId) -> DbResult<bool> {
        self.inner.exists_by_id(id).await
    }

    async fn delete_by_id(&self, id: CustomerId) -> DbResult<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.delete_by_id(id).await
    }

    async fn update(&self, id: CustomerId, changes: &CustomerChanges) -> DbResult<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.update(id, changes).await
    }
}

/// State of a running test.
pub(crate) struct TestContext {
    /// Direct access to the database, bypassing the write counter.
    dao: Arc<dyn CustomerDao + Send + Sync>,

    /// The data access object given to the driver.
    counting: Arc<CountingDao>,

    /// The driver under test.
    driver: Driver,
}

impl TestContext {
    /// Initializes the driver using an in-memory database and the raw SQL data access.
    pub(crate) async fn setup() -> Self {
        Self::setup_with(DaoKind::Sql).await
    }

    /// Initializes the driver using an in-memory database and the data access of `kind`.
    pub(crate) async fn setup_with(kind: DaoKind) -> Self {
        let pool = SqlPool::Sqlite(sqlite::testutils::setup().await);
        let dao = new_dao(kind, pool);
        let counting = Arc::new(CountingDao::new(dao.clone()));
        let driver = Driver::new(counting.clone());
        Self { dao, counting, driver }
    }

    /// Gets a copy of the driver in this test context.
    pub(crate) fn driver(&self) -> Driver {
        self.driver.clone()
    }

    /// Gets the data access object, bypassing the write counter.
    pub(crate) fn dao(&self) -> &(dyn CustomerDao + Send + Sync) {
        self.dao.as_ref()
    }

    /// Returns the number of writes the driver has issued so far.
    pub(crate) fn writes(&self) -> usize {
        self.counting.writes()
    }

    /// Syntactic sugar to store a customer directly in the database.
    pub(crate) async fn insert(&self, name: &str, email: &str, age: i32) -> CustomerId {
        self.dao.insert(&NewCustomer::new(name, email, age)).await.unwrap()
    }

    /// Syntactic sugar to fetch a customer that must exist.
    pub(crate) async fn get(&self, id: CustomerId) -> Customer {
        self.dao.get_by_id(id).await.unwrap().unwrap()
    }
}
