//! Dynamic SET / WHERE clause building.
//!
//! Each builder turns a request [`Payload`](crate::Payload) into a [`Clause`]: a SQL
//! fragment with `$1, $2, ...` placeholders and the values they bind, in the same order.
//!
//! ```ignore
//! use jobly::{FieldMap, Payload, build_set_clause};
//!
//! const FIELDS: FieldMap = FieldMap::new(&[("numEmployees", "num_employees")]);
//!
//! let patch = Payload::new().with("numEmployees", 4).with("description", "a company");
//! let set = build_set_clause(&patch, &FIELDS)?;
//! assert_eq!(set.text(), r#""num_employees"=$1, "description"=$2"#);
//!
//! let sql = format!("UPDATE companies SET {} WHERE handle = ${}", set.text(), set.next_placeholder());
//! ```

mod filter;
mod update;


pub use filter::{build_company_filter, build_job_filter};
pub use update::build_set_clause;

use crate::value::SqlValue;
use serde::Serialize;
use tokio_postgres::types::ToSql;

/// A SQL fragment paired with its ordered bind values.
///
/// The Nth placeholder in [`text`](Clause::text) binds the Nth entry of
/// [`values`](Clause::values).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Clause {
    text: String,
    values: Vec<SqlValue>,
}

impl Clause {
    /// The fragment, without a leading `SET` / `WHERE`.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn values(&self) -> &[SqlValue] {
        &self.values
    }

    /// Number of bound values (and placeholders).
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// `true` when there is nothing to put after `WHERE`.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Index for the first placeholder a caller appends after this clause.
    pub fn next_placeholder(&self) -> usize {
        self.values.len() + 1
    }

    /// Values as driver parameters.
    pub fn params(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.values.iter().map(|v| v as &(dyn ToSql + Sync)).collect()
    }

    pub fn into_parts(self) -> (String, Vec<SqlValue>) {
        (self.text, self.values)
    }

    pub(crate) fn map_values(mut self, f: impl Fn(&SqlValue) -> SqlValue) -> Self {
        for v in &mut self.values {
            *v = f(v);
        }
        self
    }
}

/// Accumulates `<prefix>$n` fragments with a running placeholder counter.
#[derive(Debug, Clone)]
pub struct ClauseBuilder {
    separator: &'static str,
    fragments: Vec<String>,
    values: Vec<SqlValue>,
}

impl ClauseBuilder {
    /// Fragments will be joined with `separator` (`", "` for SET, `" AND "` for WHERE).
    pub fn new(separator: &'static str) -> Self {
        Self {
            separator,
            fragments: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Append `prefix` followed by the next placeholder, binding `value` to it.
    ///
    /// Returns the 1-based placeholder index.
    pub fn push_bind(&mut self, prefix: &str, value: SqlValue) -> usize {
        let idx = self.values.len() + 1;
        self.fragments.push(format!("{prefix}${idx}"));
        self.values.push(value);
        idx
    }

    pub fn param_count(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    pub fn finish(self) -> Clause {
        Clause {
            text: self.fragments.join(self.separator),
            values: self.values,
        }
    }
}

/// Application field name -> storage column name.
///
/// Fields without an entry map to a column of the same name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FieldMap {
    entries: &'static [(&'static str, &'static str)],
}

impl FieldMap {
    pub const fn new(entries: &'static [(&'static str, &'static str)]) -> Self {
        Self { entries }
    }

    /// A map where every field is its own column.
    pub const fn identity() -> Self {
        Self { entries: &[] }
    }

    /// Storage column for `field`.
    pub fn column<'a>(&self, field: &'a str) -> &'a str {
        self.entries
            .iter()
            .find(|(f, _)| *f == field)
            .map_or(field, |(_, c)| *c)
    }
}
