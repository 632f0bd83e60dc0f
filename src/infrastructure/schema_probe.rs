//! Startup-time probe for optional `orders` columns.
//!
//! The embedded migrations normally guarantee the full schema, so on a healthy
//! database every probe reports `Present`. Databases migrated out-of-band may
//! lack a column; the probe then attempts a one-shot `ALTER TABLE ... ADD
//! COLUMN IF NOT EXISTS` and re-checks. The result is resolved exactly once
//! and carried in app state; no per-request catalog queries happen.

use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::sql_query;
use diesel::sql_types::{BigInt, Text};

use crate::domain::capabilities::{ColumnStatus, SchemaCapabilities};

const ORDERS_TABLE: &str = "orders";

/// Optional columns and the definitions used when adding a missing one.
const OPTIONAL_COLUMNS: [(&str, &str); 4] = [
    ("delivery_address", "TEXT"),
    ("pickup_address", "TEXT"),
    ("customer_phone", "VARCHAR(50)"),
    ("original_status", "VARCHAR(50)"),
];

#[derive(QueryableByName)]
struct ColumnCount {
    #[diesel(sql_type = BigInt)]
    count: i64,
}

/// Probe the information schema for `column` on `table` (case-insensitive).
///
/// A failed probe yields `Unknown`, never an error: this is a capability
/// check, and callers treat `Unknown` exactly like `Absent`.
pub fn has_column(conn: &mut PgConnection, table: &str, column: &str) -> ColumnStatus {
    let result = sql_query(
        "SELECT COUNT(*) AS count FROM information_schema.columns \
         WHERE table_name = $1 AND lower(column_name) = lower($2)",
    )
    .bind::<Text, _>(table)
    .bind::<Text, _>(column)
    .get_result::<ColumnCount>(conn);

    match result {
        Ok(row) if row.count > 0 => ColumnStatus::Present,
        Ok(_) => ColumnStatus::Absent,
        Err(e) => {
            log::warn!("schema probe for {}.{} failed: {}", table, column, e);
            ColumnStatus::Unknown
        }
    }
}

/// Add `column` to `table` if it does not exist. Returns whether the
/// statement succeeded; failures are logged and non-fatal.
pub fn ensure_column(
    conn: &mut PgConnection,
    table: &str,
    column: &str,
    definition: &str,
) -> bool {
    // Identifiers come from the OPTIONAL_COLUMNS table, never client input.
    let stmt = format!(
        "ALTER TABLE {} ADD COLUMN IF NOT EXISTS {} {}",
        table, column, definition
    );
    match sql_query(stmt).execute(conn) {
        Ok(_) => true,
        Err(e) => {
            log::warn!("could not add column {}.{}: {}", table, column, e);
            false
        }
    }
}

/// Resolve the capability set for this database. Called once at startup,
/// after migrations.
pub fn resolve_capabilities(conn: &mut PgConnection) -> SchemaCapabilities {
    let mut statuses = [ColumnStatus::Unknown; OPTIONAL_COLUMNS.len()];

    for (i, (column, definition)) in OPTIONAL_COLUMNS.iter().enumerate() {
        let mut status = has_column(conn, ORDERS_TABLE, column);
        if !status.is_present() && ensure_column(conn, ORDERS_TABLE, column, definition) {
            status = has_column(conn, ORDERS_TABLE, column);
        }
        if !status.is_present() {
            // This silently disables persistence of the field, so say so.
            log::error!(
                "orders.{} unavailable ({:?}); its field will not be persisted",
                column,
                status
            );
        }
        statuses[i] = status;
    }

    SchemaCapabilities {
        delivery_address: statuses[0],
        pickup_address: statuses[1],
        customer_phone: statuses[2],
        original_status: statuses[3],
    }
}
