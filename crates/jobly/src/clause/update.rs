//! Partial-update SET clauses.

use super::{Clause, ClauseBuilder, FieldMap};
use crate::error::{JoblyError, JoblyResult};
use crate::ident::Ident;
use crate::value::Payload;

/// Build `"<column>"=$n, ...` for every field in `payload`, in order.
///
/// Columns come from `field_map`, falling back to the field name. Values are bound
/// unchanged. An empty payload is [`JoblyError::InvalidInput`].
pub fn build_set_clause(payload: &Payload, field_map: &FieldMap) -> JoblyResult<Clause> {
    let _span =
        tracing::debug_span!(target: "jobly.clause", "build_set_clause", fields = payload.len())
            .entered();

    if payload.is_empty() {
        return Err(JoblyError::invalid_input("no data supplied"));
    }

    let mut builder = ClauseBuilder::new(", ");
    for (field, value) in payload.iter() {
        let column = Ident::quoted(field_map.column(field))?;
        builder.push_bind(&format!("{}=", column.to_sql()), value.clone());
    }

    let clause = builder.finish();
    tracing::debug!(
        target: "jobly.clause",
        clause = %clause.text(),
        param_count = clause.len(),
        "set clause built"
    );
    Ok(clause)
}
