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

//! High-level data types.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a customer, assigned by the database on insertion.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub(crate) struct CustomerId(i64);

impl CustomerId {
    /// Wraps a raw identifier as returned by the database.
    pub(crate) fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the identifier as an `i64` for storage purposes.
    pub(crate) fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A customer as stored in the database.
#[derive(Clone, Debug, Deserialize, Eq, Getters, PartialEq, Serialize)]
pub(crate) struct Customer {
    /// Identifier of the customer.
    id: CustomerId,

    /// Full name of the customer.
    name: String,

    /// Email address of the customer.  Unique across all customers.
    email: String,

    /// Age of the customer.
    age: i32,
}

impl Customer {
    /// Creates a new customer from its stored fields.
    pub(crate) fn new<N: Into<String>, E: Into<String>>(
        id: CustomerId,
        name: N,
        email: E,
        age: i32,
    ) -> Self {
        Self { id, name: name.into(), email: email.into(), age }
    }
}

/// A customer that has not been stored yet and thus lacks an identifier.
#[derive(Debug, Getters, PartialEq)]
pub(crate) struct NewCustomer {
    /// Full name of the customer.
    name: String,

    /// Email address of the customer.
    email: String,

    /// Age of the customer.
    age: i32,
}

impl NewCustomer {
    /// Creates a new customer that is pending insertion.
    pub(crate) fn new<N: Into<String>, E: Into<String>>(name: N, email: E, age: i32) -> Self {
        Self { name: name.into(), email: email.into(), age }
    }
}

/// Set of changes to apply to an existing customer.  Fields set to `None` are left untouched.
#[derive(Debug, Default, PartialEq)]
pub(crate) struct CustomerChanges {
    /// New full name, if any.
    pub(crate) name: Option<String>,

    /// New email address, if any.
    pub(crate) email: Option<String>,

    /// New age, if any.
    pub(crate) age: Option<i32>,
}

impl CustomerChanges {
    /// Returns true if there are no changes to apply.
    pub(crate) fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.age.is_none()
    }
}

/// Details provided by a client to register a new customer.
#[derive(Debug, Deserialize, Serialize)]
pub(crate) struct CustomerRegistrationRequest {
    /// Full name of the customer.
    pub(crate) name: String,

    /// Email address of the customer.  Optional here so that missing values are reported by the
    /// business logic with a meaningful error.
    pub(crate) email: Option<String>,

    /// Age of the customer.
    pub(crate) age: i32,
}

/// Details provided by a client to update an existing customer.
///
/// Fields that are missing, blank or non-positive are interpreted as "no change requested".
#[derive(Debug, Default, Deserialize, Serialize)]
pub(crate) struct CustomerUpdateRequest {
    /// New full name, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) name: Option<String>,

    /// New email address, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) email: Option<String>,

    /// New age, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) age: Option<i32>,
}
