//! Company and job persistence.
//!
//! Every function takes `&impl GenericClient`, so it runs the same on a plain connection,
//! a pooled client, or inside a transaction.

pub mod company;
pub mod job;

pub use company::{Company, CompanyDetail};
pub use job::{Job, NewJob};

fn trace_sql(tag: &str, sql: &str, param_count: usize) {
    tracing::debug!(target: "jobly.sql", tag, sql = %sql, param_count, "executing");
}
