//! # jobly
//!
//! Companies and jobs over PostgreSQL.
//!
//! The interesting part is [`clause`]: request payloads arrive as loosely typed JSON
//! objects, and the builders there turn them into parameterized SQL fragments.
//!
//! - **Partial updates**: [`build_set_clause`] renders `"col"=$1, "col2"=$2` for whichever
//!   fields were sent, translating names through a [`FieldMap`]
//! - **Searches**: [`build_company_filter`] / [`build_job_filter`] render `AND`-joined
//!   predicates over a fixed set of filter keys and reject anything else
//! - **Placeholders stay aligned**: a [`Payload`] keeps its key order, so the Nth `$n`
//!   always binds the Nth value
//!
//! ```ignore
//! use jobly::{Company, Payload, create_pool};
//!
//! let pool = create_pool("postgres://localhost/jobly")?;
//! let client = pool.get().await?;
//!
//! let filter: Payload = serde_json::from_str(r#"{"name": "net", "minEmployees": 100}"#)?;
//! let companies = Company::find_all(&client, &filter).await?;
//!
//! let patch = Payload::new().with("numEmployees", 250);
//! let updated = Company::update(&client, "acme", &patch).await?;
//! ```

pub mod clause;
pub mod client;
pub mod config;
pub mod error;
pub mod ident;
pub mod models;
pub mod row;
pub mod value;

pub use clause::{
    Clause, ClauseBuilder, FieldMap, build_company_filter, build_job_filter, build_set_clause,
};
pub use client::GenericClient;
pub use config::DbConfig;
pub use error::{JoblyError, JoblyResult};
pub use ident::Ident;
pub use models::{Company, CompanyDetail, Job, NewJob};
pub use row::{FromRow, RowExt};
pub use value::{Payload, SqlValue};

#[cfg(feature = "pool")]
pub mod pool;

#[cfg(feature = "pool")]
pub use pool::{create_pool, create_pool_with_config};

#[cfg(feature = "migrate")]
pub mod migrate;
