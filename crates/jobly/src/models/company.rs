//! Companies.

use super::job::Job;
use super::trace_sql;
use crate::clause::{FieldMap, build_company_filter, build_set_clause};
use crate::client::GenericClient;
use crate::error::{JoblyError, JoblyResult};
use crate::row::{FromRow, RowExt};
use crate::value::Payload;
use serde::{Deserialize, Serialize};
use tokio_postgres::Row;
use tokio_postgres::types::ToSql;

const COLUMNS: &str = "handle, name, description, num_employees, logo_url";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub handle: String,
    pub name: String,
    pub description: String,
    pub num_employees: Option<i32>,
    pub logo_url: Option<String>,
}

/// A company together with its jobs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanyDetail {
    #[serde(flatten)]
    pub company: Company,
    pub jobs: Vec<Job>,
}

impl FromRow for Company {
    fn from_row(row: &Row) -> JoblyResult<Self> {
        Ok(Self {
            handle: row.try_get_column("handle")?,
            name: row.try_get_column("name")?,
            description: row.try_get_column("description")?,
            num_employees: row.try_get_column("num_employees")?,
            logo_url: row.try_get_column("logo_url")?,
        })
    }
}

/// Rejects `minEmployees` above `maxEmployees` when both are numeric.
fn check_employee_range(filter: &Payload) -> JoblyResult<()> {
    let min = filter.get("minEmployees").and_then(|v| v.as_f64());
    let max = filter.get("maxEmployees").and_then(|v| v.as_f64());
    match (min, max) {
        (Some(min), Some(max)) if min > max => Err(JoblyError::invalid_filter(
            "minEmployees cannot exceed maxEmployees",
        )),
        _ => Ok(()),
    }
}

impl Company {
    /// Request field -> column names for partial updates.
    pub const FIELDS: FieldMap = FieldMap::new(&[
        ("numEmployees", "num_employees"),
        ("logoUrl", "logo_url"),
    ]);

    /// Insert a company.
    ///
    /// A company with the same handle is [`JoblyError::InvalidInput`].
    pub async fn create(conn: &impl GenericClient, company: &Company) -> JoblyResult<Company> {
        let sql = format!(
            "INSERT INTO companies ({COLUMNS}) VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (handle) DO NOTHING RETURNING {COLUMNS}"
        );
        trace_sql("companies.create", &sql, 5);
        let row = conn
            .query_opt(
                &sql,
                &[
                    &company.handle,
                    &company.name,
                    &company.description,
                    &company.num_employees,
                    &company.logo_url,
                ],
            )
            .await?
            .ok_or_else(|| {
                JoblyError::invalid_input(format!("Duplicate company: {}", company.handle))
            })?;
        Company::from_row(&row)
    }

    /// All companies matching `filter`, ordered by name.
    ///
    /// An empty filter lists every company.
    pub async fn find_all(conn: &impl GenericClient, filter: &Payload) -> JoblyResult<Vec<Company>> {
        check_employee_range(filter)?;
        let clause = build_company_filter(filter)?;

        let mut sql = format!("SELECT {COLUMNS} FROM companies");
        if !clause.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(clause.text());
        }
        sql.push_str(" ORDER BY name");

        trace_sql("companies.find_all", &sql, clause.len());
        let rows = conn.query(&sql, &clause.params()).await?;
        Company::from_rows(&rows)
    }

    /// A company and its jobs.
    pub async fn get(conn: &impl GenericClient, handle: &str) -> JoblyResult<CompanyDetail> {
        let sql = format!("SELECT {COLUMNS} FROM companies WHERE handle = $1");
        trace_sql("companies.get", &sql, 1);
        let row = conn
            .query_opt(&sql, &[&handle])
            .await?
            .ok_or_else(|| JoblyError::not_found(format!("No company: {handle}")))?;

        let company = Company::from_row(&row)?;
        let jobs = Job::find_for_company(conn, handle).await?;
        Ok(CompanyDetail { company, jobs })
    }

    /// Partial update: only the fields present in `data` change.
    pub async fn update(
        conn: &impl GenericClient,
        handle: &str,
        data: &Payload,
    ) -> JoblyResult<Company> {
        let set = build_set_clause(data, &Self::FIELDS)?;
        let sql = format!(
            "UPDATE companies SET {} WHERE handle = ${} RETURNING {COLUMNS}",
            set.text(),
            set.next_placeholder()
        );

        let mut params: Vec<&(dyn ToSql + Sync)> = set.params();
        params.push(&handle);
        trace_sql("companies.update", &sql, params.len());

        let row = conn
            .query_opt(&sql, &params)
            .await?
            .ok_or_else(|| JoblyError::not_found(format!("No company: {handle}")))?;
        Company::from_row(&row)
    }

    /// Delete a company (and, via the foreign key, its jobs).
    pub async fn remove(conn: &impl GenericClient, handle: &str) -> JoblyResult<()> {
        let sql = "DELETE FROM companies WHERE handle = $1";
        trace_sql("companies.remove", sql, 1);
        if conn.execute(sql, &[&handle]).await? == 0 {
            return Err(JoblyError::not_found(format!("No company: {handle}")));
        }
        Ok(())
    }
}
