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

//! Business logic for customer management.
//!
//! Every operation implemented in the `Driver` consumes `self`.  Each call maps to one logical
//! unit of work against the database, so issuing multiple operations requires an explicit clone
//! of the driver by the caller.

use crate::db::{CustomerDao, DbError};
use crate::model::CustomerId;
use std::sync::Arc;

mod delete;
mod query;
mod register;
mod seed;
#[cfg(test)]
pub(crate) mod testutils;
mod update;

/// Business logic errors.  These errors encompass backend and logical errors.
#[derive(Debug, PartialEq, thiserror::Error)]
pub(crate) enum DriverError {
    /// Catch-all error type for unexpected database errors.
    #[error("{0}")]
    BackendError(String),

    /// Indicates that a unique attribute of the resource is already in use.
    #[error("{0}")]
    DuplicateResource(String),

    /// Indicates an error in the input data.
    #[error("{0}")]
    InvalidArgument(String),

    /// Indicates that the request is valid but cannot be applied to the current state.
    #[error("{0}")]
    InvalidState(String),

    /// Indicates that a requested entry does not exist.
    #[error("{0}")]
    NotFound(String),
}

impl From<DbError> for DriverError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::AlreadyExists => DriverError::DuplicateResource(e.to_string()),
            DbError::BackendError(_) => DriverError::BackendError(e.to_string()),
            DbError::DataIntegrityError(_) => DriverError::BackendError(e.to_string()),
            DbError::NotFound => DriverError::NotFound(e.to_string()),
            DbError::Unavailable => DriverError::BackendError(e.to_string()),
        }
    }
}

/// Result type for this module.
pub(crate) type DriverResult<T> = Result<T, DriverError>;

/// Builds the error returned when the customer `id` does not exist.
fn customer_not_found(id: CustomerId) -> DriverError {
    DriverError::NotFound(format!("Customer with id {} not found", id))
}

/// Business logic.
#[derive(Clone)]
pub(crate) struct Driver {
    /// The data access object that the driver uses for persistence.
    dao: Arc<dyn CustomerDao + Send + Sync>,
}

impl Driver {
    /// Creates a new driver backed by the given data access object.
    pub(crate) fn new(dao: Arc<dyn CustomerDao + Send + Sync>) -> Self {
        Self { dao }
    }
}
