//! Quoted SQL column identifiers.
//!
//! Column names in a SET clause come from request keys (or a [`FieldMap`](crate::FieldMap)
//! lookup), so they are always emitted in quoted form: `"num_employees"`. Postgres does not
//! allow parameterizing identifiers, so quoting is what keeps an odd key from turning into
//! SQL.
//!
//! - Any character except NUL is allowed
//! - `"` is escaped as `""`

use crate::error::{JoblyError, JoblyResult};

/// A single quoted column identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    name: String,
}

impl Ident {
    /// Create a quoted identifier.
    pub fn quoted(name: &str) -> JoblyResult<Self> {
        if name.is_empty() {
            return Err(JoblyError::invalid_input("Empty column name"));
        }
        if name.contains('\0') {
            return Err(JoblyError::invalid_input(
                "Column name cannot contain NUL character",
            ));
        }
        Ok(Self {
            name: name.to_string(),
        })
    }

    /// The raw, unquoted name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Render the identifier as SQL.
    pub fn to_sql(&self) -> String {
        let mut out = String::with_capacity(self.name.len() + 2);
        self.write_sql(&mut out);
        out
    }

    pub(crate) fn write_sql(&self, out: &mut String) {
        out.push('"');
        for ch in self.name.chars() {
            if ch == '"' {
                out.push('"');
                out.push('"');
            } else {
                out.push(ch);
            }
        }
        out.push('"');
    }
}
