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

//! Extends the driver with the `delete_customer` method.

use crate::driver::{customer_not_found, Driver, DriverResult};
use crate::model::CustomerId;
use log::info;

impl Driver {
    /// Deletes the customer identified by `id`, which must exist.
    pub(crate) async fn delete_customer(self, id: CustomerId) -> DriverResult<()> {
        if !self.dao.exists_by_id(id).await? {
            return Err(customer_not_found(id));
        }

        self.dao.delete_by_id(id).await?;
        info!("Deleted customer {}", id);
        Ok(())
    }
}
