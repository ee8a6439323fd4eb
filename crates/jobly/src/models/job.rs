//! Jobs.

use super::trace_sql;
use crate::clause::{FieldMap, build_job_filter, build_set_clause};
use crate::client::GenericClient;
use crate::error::{JoblyError, JoblyResult};
use crate::row::{FromRow, RowExt};
use crate::value::Payload;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio_postgres::Row;
use tokio_postgres::types::ToSql;

const COLUMNS: &str = "id, title, salary, equity, company_handle";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<Decimal>,
    pub company_handle: String,
}

/// Job data before the database assigns an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewJob {
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<Decimal>,
    pub company_handle: String,
}

impl FromRow for Job {
    fn from_row(row: &Row) -> JoblyResult<Self> {
        Ok(Self {
            id: row.try_get_column("id")?,
            title: row.try_get_column("title")?,
            salary: row.try_get_column("salary")?,
            equity: row.try_get_column("equity")?,
            company_handle: row.try_get_column("company_handle")?,
        })
    }
}

fn no_job(id: i32) -> JoblyError {
    JoblyError::not_found(format!("No job: {id}"))
}

impl Job {
    /// Request field -> column names for partial updates.
    pub const FIELDS: FieldMap = FieldMap::new(&[("companyHandle", "company_handle")]);

    /// Insert a job. An unknown company surfaces as a foreign key violation.
    pub async fn create(conn: &impl GenericClient, job: &NewJob) -> JoblyResult<Job> {
        let sql = format!(
            "INSERT INTO jobs (title, salary, equity, company_handle) \
             VALUES ($1, $2, $3, $4) RETURNING {COLUMNS}"
        );
        trace_sql("jobs.create", &sql, 4);
        let row = conn
            .query_one(
                &sql,
                &[&job.title, &job.salary, &job.equity, &job.company_handle],
            )
            .await?;
        Job::from_row(&row)
    }

    /// All jobs matching `filter`, ordered by title.
    pub async fn find_all(conn: &impl GenericClient, filter: &Payload) -> JoblyResult<Vec<Job>> {
        let clause = build_job_filter(filter)?;

        let mut sql = format!("SELECT {COLUMNS} FROM jobs");
        if !clause.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(clause.text());
        }
        sql.push_str(" ORDER BY title, id");

        trace_sql("jobs.find_all", &sql, clause.len());
        let rows = conn.query(&sql, &clause.params()).await?;
        Job::from_rows(&rows)
    }

    pub async fn get(conn: &impl GenericClient, id: i32) -> JoblyResult<Job> {
        let sql = format!("SELECT {COLUMNS} FROM jobs WHERE id = $1");
        trace_sql("jobs.get", &sql, 1);
        let row = conn
            .query_opt(&sql, &[&id])
            .await?
            .ok_or_else(|| no_job(id))?;
        Job::from_row(&row)
    }

    /// Jobs posted by one company, oldest first.
    pub async fn find_for_company(
        conn: &impl GenericClient,
        company_handle: &str,
    ) -> JoblyResult<Vec<Job>> {
        let sql = format!("SELECT {COLUMNS} FROM jobs WHERE company_handle = $1 ORDER BY id");
        trace_sql("jobs.find_for_company", &sql, 1);
        let rows = conn.query(&sql, &[&company_handle]).await?;
        Job::from_rows(&rows)
    }

    /// Partial update: only the fields present in `data` change.
    pub async fn update(conn: &impl GenericClient, id: i32, data: &Payload) -> JoblyResult<Job> {
        let set = build_set_clause(data, &Self::FIELDS)?;
        let sql = format!(
            "UPDATE jobs SET {} WHERE id = ${} RETURNING {COLUMNS}",
            set.text(),
            set.next_placeholder()
        );

        let mut params: Vec<&(dyn ToSql + Sync)> = set.params();
        params.push(&id);
        trace_sql("jobs.update", &sql, params.len());

        let row = conn
            .query_opt(&sql, &params)
            .await?
            .ok_or_else(|| no_job(id))?;
        Job::from_row(&row)
    }

    pub async fn remove(conn: &impl GenericClient, id: i32) -> JoblyResult<()> {
        let sql = "DELETE FROM jobs WHERE id = $1";
        trace_sql("jobs.remove", sql, 1);
        if conn.execute(sql, &[&id]).await? == 0 {
            return Err(no_job(id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::str::FromStr;

    #[test]
    fn new_job_reads_camel_case() {
        let job: NewJob = serde_json::from_value(json!({
            "title": "software engineer",
            "salary": 35000,
            "equity": "0.026",
            "companyHandle": "c1"
        }))
        .unwrap();
        assert_eq!(job.company_handle, "c1");
        assert_eq!(job.equity, Some(Decimal::from_str("0.026").unwrap()));
    }

    #[test]
    fn equity_serializes_as_string() {
        let job = Job {
            id: 1,
            title: "cook".into(),
            salary: None,
            equity: Some(Decimal::from_str("0.5").unwrap()),
            company_handle: "c2".into(),
        };
        let value = serde_json::to_value(&job).unwrap();
        assert_eq!(value["equity"], json!("0.5"));
        assert_eq!(value["companyHandle"], json!("c2"));
    }

    #[test]
    fn fields_translate_company_handle() {
        assert_eq!(Job::FIELDS.column("companyHandle"), "company_handle");
        assert_eq!(Job::FIELDS.column("salary"), "salary");
    }
}
