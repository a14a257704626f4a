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

//! Extends the driver with the `update_customer` method.

use crate::db::DbError;
use crate::driver::{customer_not_found, Driver, DriverError, DriverResult};
use crate::model::{CustomerChanges, CustomerId, CustomerUpdateRequest};
use log::info;

/// Returns the requested text `value` if it is not blank and differs from `current`.
fn text_change(value: Option<String>, current: &str) -> Option<String> {
    value.filter(|v| !v.trim().is_empty() && v != current)
}

impl Driver {
    /// Applies the changes in `request` to the customer identified by `id`.
    ///
    /// Fields that are missing, blank, non-positive or equal to their current values are ignored,
    /// and at least one field must remain after this filtering.
    pub(crate) async fn update_customer(
        self,
        id: CustomerId,
        request: CustomerUpdateRequest,
    ) -> DriverResult<()> {
        let current = match self.dao.get_by_id(id).await? {
            Some(customer) => customer,
            None => return Err(customer_not_found(id)),
        };

        let mut changes = CustomerChanges::default();

        if let Some(email) = text_change(request.email, current.email()) {
            if self.dao.exists_by_email(&email).await? {
                return Err(DriverError::DuplicateResource("Email is already taken".to_owned()));
            }
            changes.email = Some(email);
        }

        changes.name = text_change(request.name, current.name());

        changes.age = request.age.filter(|age| *age > 0 && age != current.age());

        if changes.is_empty() {
            return Err(DriverError::InvalidState("No changes to update".to_owned()));
        }

        match self.dao.update(id, &changes).await {
            Ok(()) => (),
            Err(DbError::NotFound) => return Err(customer_not_found(id)),
            Err(e) => return Err(e.into()),
        }
        info!("Updated customer {}", id);
        Ok(())
    }
}
