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

//! Test utilities for the REST API.

use crate::db::{new_dao, sqlite, CustomerDao, DaoKind, SqlPool};
use crate::driver::Driver;
use crate::model::*;
use crate::rest::app;
use axum::Router;
use std::sync::Arc;

pub(crate) struct TestContext {
    dao: Arc<dyn CustomerDao + Send + Sync>,
    app: Router,
}

impl TestContext {
    pub(crate) async fn setup() -> Self {
        let pool = SqlPool::Sqlite(sqlite::testutils::setup().await);
        let dao = new_dao(DaoKind::Sql, pool);
        let app = app(Driver::new(dao.clone()));
        Self { dao, app }
    }

    pub(crate) fn app(&self) -> Router {
        self.app.clone()
    }

    pub(crate) fn into_app(self) -> Router {
        self.app
    }

    pub(crate) async fn insert(&self, name: &str, email: &str, age: i32) -> CustomerId {
        self.dao.insert(&NewCustomer::new(name, email, age)).await.unwrap()
    }

    pub(crate) async fn get(&self, id: CustomerId) -> Option<Customer> {
        self.dao.get_by_id(id).await.unwrap()
    }

    pub(crate) async fn list(&self) -> Vec<Customer> {
        self.dao.list().await.unwrap()
    }
}
