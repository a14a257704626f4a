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

//! Extends the driver with the read-only queries.

use crate::driver::{customer_not_found, Driver, DriverResult};
use crate::model::{Customer, CustomerId};

impl Driver {
    /// Gets all existing customers.
    pub(crate) async fn get_all_customers(self) -> DriverResult<Vec<Customer>> {
        Ok(self.dao.list().await?)
    }

    /// Gets the customer identified by `id`.
    pub(crate) async fn get_customer(self, id: CustomerId) -> DriverResult<Customer> {
        match self.dao.get_by_id(id).await? {
            Some(customer) => Ok(customer),
            None => Err(customer_not_found(id)),
        }
    }
}
