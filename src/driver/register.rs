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

//! Extends the driver with the `add_customer` method.

use crate::driver::{Driver, DriverError, DriverResult};
use crate::model::{CustomerId, CustomerRegistrationRequest, NewCustomer};
use log::info;

impl Driver {
    /// Registers a new customer and returns the identifier assigned to it.
    ///
    /// The email must be present and not yet used by any other customer.
    pub(crate) async fn add_customer(
        self,
        request: CustomerRegistrationRequest,
    ) -> DriverResult<CustomerId> {
        let email = match request.email {
            Some(email) if !email.trim().is_empty() => email,
            _ => return Err(DriverError::InvalidArgument("Email cannot be null or blank".to_owned())),
        };
        if request.name.trim().is_empty() {
            return Err(DriverError::InvalidArgument("Name cannot be blank".to_owned()));
        }
        if request.age <= 0 {
            return Err(DriverError::InvalidArgument("Age must be positive".to_owned()));
        }

        if self.dao.exists_by_email(&email).await? {
            return Err(DriverError::DuplicateResource("Email is already taken".to_owned()));
        }

        let id = self.dao.insert(&NewCustomer::new(request.name, email, request.age)).await?;
        info!("Registered customer {}", id);
        Ok(id)
    }
}
