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

//! REST service to manage customer records.
//!
//! The service is structured in layers, from the leaves to the root:
//!
//! 1.  `model`: high-level data types that represent customers and the requests to manipulate
//!     them.  There is no logic in here.
//!
//! 1.  `db`: the persistence layer.  The `CustomerDao` trait describes the operations the service
//!     needs from storage and there are two interchangeable implementations of it: one that
//!     issues raw SQL and one that goes through an object-relational mapper.
//!
//! 1.  `driver`: the business logic layer, which enforces the rules that keep customer records
//!     consistent.
//!
//! 1.  `rest`: the HTTP layer, offering the REST APIs.
//!
//! Errors float to the top of the app using the `?` operator and are translated to HTTP status
//! codes once returned from the REST layer.

// Keep these in sync with other top-level files.
#![warn(anonymous_parameters, bad_style, clippy::missing_docs_in_private_items, missing_docs)]
#![warn(unused, unused_extern_crates, unused_import_braces, unused_qualifications)]
#![warn(unsafe_code)]

use log::info;
use std::error::Error;
use std::net::{Ipv4Addr, SocketAddr};

pub mod db;
use db::{new_dao, DaoKind, SqlPool};
mod driver;
use driver::Driver;
pub mod env;
use env::get_optional_var;
pub(crate) mod model;
mod rest;
use rest::app;

/// Default TCP port to listen on when none is configured.
const DEFAULT_PORT: u16 = 8080;

/// Configuration of the service itself, separate from the database connection details.
#[derive(Debug, PartialEq)]
pub struct ServiceOptions {
    /// TCP port to listen on.
    pub port: u16,

    /// Data access implementation to use.
    pub dao: DaoKind,

    /// Number of random customers to register at startup.
    pub seed: usize,
}

impl ServiceOptions {
    /// Initializes a set of options from environment variables whose name is prefixed with the
    /// given `prefix`.
    ///
    /// This will use variables such as `<prefix>_PORT`, `<prefix>_DAO` and `<prefix>_SEED`, all of
    /// which are optional.
    pub fn from_env(prefix: &str) -> Result<ServiceOptions, String> {
        Ok(ServiceOptions {
            port: get_optional_var::<u16>(prefix, "PORT")?.unwrap_or(DEFAULT_PORT),
            dao: get_optional_var::<DaoKind>(prefix, "DAO")?.unwrap_or_default(),
            seed: get_optional_var::<usize>(prefix, "SEED")?.unwrap_or(0),
        })
    }

    /// Returns the address to bind the server to.
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.port))
    }
}

/// Instantiates all resources to serve the application with the given `opts` and an already
/// connected `pool`.
///
/// While it'd be nice to push this responsibility to `main`, doing so would force us to expose many
/// crate-internal types to the public, which in turn would make dead code detection harder.
pub async fn serve(opts: ServiceOptions, pool: SqlPool) -> Result<(), Box<dyn Error>> {
    pool.init_schema().await?;

    let dao = new_dao(opts.dao, pool.clone());
    let driver = Driver::new(dao);
    if opts.seed > 0 {
        driver.clone().seed_customers(opts.seed).await?;
    }
    let app = app(driver);

    let bind_addr = opts.bind_addr();
    info!("Serving customers on {} with the {} data access", bind_addr, opts.dao);
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    let result = axum::serve(listener, app).await;

    pool.close().await;
    Ok(result?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_options_from_env_defaults() {
        temp_env::with_vars_unset(["CUSTOMERS_PORT", "CUSTOMERS_DAO", "CUSTOMERS_SEED"], || {
            let opts = ServiceOptions::from_env("CUSTOMERS").unwrap();
            assert_eq!(ServiceOptions { port: DEFAULT_PORT, dao: DaoKind::Sql, seed: 0 }, opts);
        });
    }

    #[test]
    fn test_service_options_from_env_all_present() {
        temp_env::with_vars(
            [
                ("CUSTOMERS_PORT", Some("1234")),
                ("CUSTOMERS_DAO", Some("orm")),
                ("CUSTOMERS_SEED", Some("3")),
            ],
            || {
                let opts = ServiceOptions::from_env("CUSTOMERS").unwrap();
                assert_eq!(ServiceOptions { port: 1234, dao: DaoKind::Orm, seed: 3 }, opts);
                assert_eq!(SocketAddr::from((Ipv4Addr::UNSPECIFIED, 1234)), opts.bind_addr());
            },
        );
    }

    #[test]
    fn test_service_options_from_env_bad_dao() {
        temp_env::with_var("CUSTOMERS_DAO", Some("jpa"), || {
            let err = ServiceOptions::from_env("CUSTOMERS").unwrap_err();
            assert!(err.contains("CUSTOMERS_DAO"));
            assert!(err.contains("Unknown data access implementation 'jpa'"));
        });
    }
}
