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

//! Extends the driver with the `seed_customers` method.

use crate::driver::{Driver, DriverError, DriverResult};
use crate::model::CustomerRegistrationRequest;
use log::{info, warn};
use rand::Rng;

/// First names to pick from when generating random customers.
const FIRST_NAMES: &[&str] =
    &["Alex", "Ana", "Bruno", "Chen", "Daria", "Emeka", "Farah", "Jamila", "Kenji", "Lucia"];

/// Last names to pick from when generating random customers.
const LAST_NAMES: &[&str] =
    &["Adeyemi", "Garcia", "Ivanova", "Kowalski", "Mendes", "Nakamura", "Okafor", "Smith"];

/// Minimum age, inclusive, of generated customers.
const MIN_AGE: i32 = 16;

/// Maximum age, exclusive, of generated customers.
const MAX_AGE: i32 = 99;

/// Generates `count` registration requests for random customers.
fn random_requests(count: usize) -> Vec<CustomerRegistrationRequest> {
    let mut rng = rand::rng();
    (0..count)
        .map(|_| {
            let first = FIRST_NAMES[rng.random_range(0..FIRST_NAMES.len())];
            let last = LAST_NAMES[rng.random_range(0..LAST_NAMES.len())];
            CustomerRegistrationRequest {
                name: format!("{} {}", first, last),
                email: Some(format!("{}.{}@example.com", first, last).to_lowercase()),
                age: rng.random_range(MIN_AGE..MAX_AGE),
            }
        })
        .collect()
}

impl Driver {
    /// Registers `count` random customers and returns how many were actually stored.
    ///
    /// Customers go through the same validations as any other registration, and those whose
    /// randomly-chosen email is already taken are skipped.
    pub(crate) async fn seed_customers(self, count: usize) -> DriverResult<usize> {
        let mut stored = 0;
        for request in random_requests(count) {
            match self.clone().add_customer(request).await {
                Ok(_) => stored += 1,
                Err(DriverError::DuplicateResource(msg)) => {
                    warn!("Skipping random customer: {}", msg)
                }
                Err(e) => return Err(e),
            }
        }
        info!("Seeded {} random customers", stored);
        Ok(stored)
    }
}
