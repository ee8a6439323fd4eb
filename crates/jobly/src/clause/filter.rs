//! WHERE clauses for company and job searches.
//!
//! Filter keys are fixed per entity; anything else is [`JoblyError::InvalidFilter`].
//! Predicates follow payload order and are joined with `AND`. An empty payload gives an
//! empty clause, and the caller leaves out `WHERE` entirely.

use super::{Clause, ClauseBuilder};
use crate::error::{JoblyError, JoblyResult};
use crate::value::{Payload, SqlValue};

const UNKNOWN_FILTER: &str = "incorrect filter data provided";

fn unknown_filter(key: &str) -> JoblyError {
    tracing::debug!(target: "jobly.clause", key, "rejected filter key");
    JoblyError::invalid_filter(UNKNOWN_FILTER)
}

/// Company search filter.
///
/// | key            | predicate               |
/// |----------------|-------------------------|
/// | `name`         | `LOWER(name) LIKE $n`   |
/// | `maxEmployees` | `num_employees < $n`    |
/// | `minEmployees` | `num_employees > $n`    |
///
/// `name` is wrapped in `%` wildcards. Every bound value is then sent as its lower-cased
/// string form; Postgres still compares the employee bounds numerically.
pub fn build_company_filter(payload: &Payload) -> JoblyResult<Clause> {
    let _span =
        tracing::debug_span!(target: "jobly.clause", "build_company_filter", keys = payload.len())
            .entered();

    let mut builder = ClauseBuilder::new(" AND ");
    for (key, value) in payload.iter() {
        match key {
            "name" => builder.push_bind("LOWER(name) LIKE ", value.wildcarded()),
            "maxEmployees" => builder.push_bind("num_employees < ", value.clone()),
            "minEmployees" => builder.push_bind("num_employees > ", value.clone()),
            _ => return Err(unknown_filter(key)),
        };
    }

    let clause = builder.finish().map_values(SqlValue::lowercased);
    tracing::debug!(
        target: "jobly.clause",
        clause = %clause.text(),
        param_count = clause.len(),
        "company filter built"
    );
    Ok(clause)
}

/// Job search filter.
///
/// | key                 | predicate              | value        |
/// |---------------------|------------------------|--------------|
/// | `title`             | `LOWER(title) LIKE $n` | `%title%`    |
/// | `minSalary`         | `salary > $n`          | as string    |
/// | `hasEquity = true`  | `equity > $n`          | `0`          |
/// | `hasEquity = false` | `equity = $n`          | `0`          |
///
/// `hasEquity` binds its `0` at its own placeholder, wherever it sits in the payload.
pub fn build_job_filter(payload: &Payload) -> JoblyResult<Clause> {
    let _span =
        tracing::debug_span!(target: "jobly.clause", "build_job_filter", keys = payload.len())
            .entered();

    let mut builder = ClauseBuilder::new(" AND ");
    for (key, value) in payload.iter() {
        match key {
            "title" => builder.push_bind("LOWER(title) LIKE ", value.wildcarded()),
            "minSalary" => builder.push_bind("salary > ", value.lowercased()),
            "hasEquity" => {
                let op = match value.as_bool() {
                    Some(true) => "equity > ",
                    Some(false) => "equity = ",
                    None => {
                        return Err(JoblyError::invalid_filter("hasEquity must be a boolean"));
                    }
                };
                builder.push_bind(op, SqlValue::from(0))
            }
            _ => return Err(unknown_filter(key)),
        };
    }

    let clause = builder.finish();
    tracing::debug!(
        target: "jobly.clause",
        clause = %clause.text(),
        param_count = clause.len(),
        "job filter built"
    );
    Ok(clause)
}
