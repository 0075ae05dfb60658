//! Report queries, one function per report.
//!
//! Every function takes the connection explicitly and only issues `SELECT`.
//! Ranking reports break ties on the entity id (or group label) ascending so
//! repeated runs return identical rows.

pub mod analytics;
pub mod dashboard;
pub mod key_stats;
pub mod rankings;
pub mod summary;
pub mod timeline;

use rusqlite::{Params, Row};

use crate::db::DbConn;
use crate::error::ReportResult;

/// Run `sql` and map every row with `map`.
pub(crate) fn query_all<T, P, F>(
    conn: &DbConn,
    sql: &str,
    params: P,
    map: F,
) -> ReportResult<Vec<T>>
where
    P: Params,
    F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
{
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(params, map)?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}
