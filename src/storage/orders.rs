//! Order and loyalty-point queries.
//!
//! Orders and points are owned by the checkout pipeline; the read helpers here
//! back the profile page. The insert helpers exist for seeding and tests.

use chrono::{DateTime, TimeZone, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;
use strum::{AsRefStr, Display, EnumString};

use crate::core::error::AppResult;

/// Timestamps below this value are epoch seconds written by older releases.
const SECONDS_CUTOFF: i64 = 100_000_000_000;

/// `created_at` normalized to milliseconds, usable in SELECT and ORDER BY.
fn created_at_ms_sql() -> String {
    format!(
        "CASE WHEN created_at IS NULL THEN NULL WHEN created_at < {cutoff} THEN created_at * 1000 ELSE created_at END",
        cutoff = SECONDS_CUTOFF
    )
}

/// Order lifecycle status as written by the checkout pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum OrderStatus {
    Pending,
    Paid,
    Delivered,
    Failed,
    Refunded,
    Cancelled,
}

/// Aggregated order counts for one user.
///
/// `pending + delivered <= total`; other statuses only count toward `total`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OrderStats {
    pub total: i64,
    pub pending: i64,
    pub delivered: i64,
}

/// Projection of an order shown in the "recent orders" list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentOrder {
    pub order_id: String,
    pub product_name: String,
    /// Decimal amount, kept as the exact string the checkout stored
    pub amount: String,
    pub status: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl RecentOrder {
    /// Parsed status, `None` for NULL or values this service doesn't know.
    pub fn status_kind(&self) -> Option<OrderStatus> {
        self.status.as_deref().and_then(|s| s.parse().ok())
    }
}

/// Order row written by checkout (used for seeding and tests).
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub order_id: String,
    pub user_id: String,
    pub product_name: String,
    pub amount: String,
    pub status: OrderStatus,
    pub email: Option<String>,
    /// Epoch milliseconds (seconds are accepted for legacy rows)
    pub created_at: i64,
}

fn millis_to_datetime(ms: Option<i64>) -> Option<DateTime<Utc>> {
    ms.and_then(|ms| Utc.timestamp_millis_opt(ms).single())
}

/// Returns the user's loyalty points, `None` when the user has no row.
pub fn get_user_points(conn: &Connection, user_id: &str) -> AppResult<Option<i64>> {
    let points = conn
        .query_row(
            "SELECT points FROM login_users WHERE user_id = ?1 LIMIT 1",
            params![user_id],
            |row| row.get::<_, Option<i64>>(0),
        )
        .optional()?;

    Ok(points.flatten())
}

/// Creates or updates a login user row with the given points balance.
pub fn upsert_user_points(conn: &Connection, user_id: &str, username: Option<&str>, points: i64) -> AppResult<()> {
    conn.execute(
        "INSERT INTO login_users (user_id, username, points, created_at)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(user_id) DO UPDATE SET points = excluded.points,
             username = COALESCE(excluded.username, login_users.username)",
        params![user_id, username, points, crate::storage::db::now_millis()],
    )?;
    Ok(())
}

/// Counts all orders of a user plus the pending and delivered subsets in one query.
pub fn get_order_stats(conn: &Connection, user_id: &str) -> AppResult<OrderStats> {
    let stats = conn.query_row(
        "SELECT
            COUNT(*),
            COALESCE(SUM(CASE WHEN status = 'pending' THEN 1 ELSE 0 END), 0),
            COALESCE(SUM(CASE WHEN status = 'delivered' THEN 1 ELSE 0 END), 0)
         FROM orders
         WHERE user_id = ?1",
        params![user_id],
        |row| {
            Ok(OrderStats {
                total: row.get(0)?,
                pending: row.get(1)?,
                delivered: row.get(2)?,
            })
        },
    )?;

    Ok(stats)
}

/// Returns up to `limit` most recent orders, newest first.
///
/// Ties on the creation time fall back to insertion order (newest row first).
pub fn get_recent_orders(conn: &Connection, user_id: &str, limit: usize) -> AppResult<Vec<RecentOrder>> {
    let sql = format!(
        "SELECT order_id, product_name, amount, status, {created_ms} AS created_ms
         FROM orders
         WHERE user_id = ?1
         ORDER BY created_ms DESC, rowid DESC
         LIMIT ?2",
        created_ms = created_at_ms_sql()
    );
    let mut stmt = conn.prepare(&sql)?;

    let limit = i64::try_from(limit).unwrap_or(i64::MAX);
    let rows = stmt.query_map(params![user_id, limit], |row| {
        Ok(RecentOrder {
            order_id: row.get(0)?,
            product_name: row.get(1)?,
            amount: row.get(2)?,
            status: row.get(3)?,
            created_at: millis_to_datetime(row.get(4)?),
        })
    })?;

    let mut orders = Vec::new();
    for row in rows {
        orders.push(row?);
    }
    Ok(orders)
}

/// Inserts an order row.
pub fn insert_order(conn: &Connection, order: &NewOrder) -> AppResult<()> {
    conn.execute(
        "INSERT INTO orders (order_id, user_id, product_name, amount, email, status, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            order.order_id,
            order.user_id,
            order.product_name,
            order.amount,
            order.email,
            order.status.to_string(),
            order.created_at,
        ],
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::migrations::run_migrations;

    fn conn() -> Connection {
        let mut conn = Connection::open_in_memory().unwrap();
        run_migrations(&mut conn).unwrap();
        conn
    }

    fn order(id: &str, user: &str, status: OrderStatus, created_at: i64) -> NewOrder {
        NewOrder {
            order_id: id.to_string(),
            user_id: user.to_string(),
            product_name: format!("Product {}", id),
            amount: "9.90".to_string(),
            status,
            email: None,
            created_at,
        }
    }

    #[test]
    fn status_round_trips_through_strum() {
        assert_eq!(OrderStatus::Delivered.to_string(), "delivered");
        assert_eq!("PENDING".parse::<OrderStatus>().unwrap(), OrderStatus::Pending);
        assert!("shipped".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn seconds_cutoff_boundary() {
        let conn = conn();
        insert_order(&conn, &order("secs", "u1", OrderStatus::Paid, SECONDS_CUTOFF - 1)).unwrap();
        insert_order(&conn, &order("millis", "u1", OrderStatus::Paid, SECONDS_CUTOFF)).unwrap();

        let orders = get_recent_orders(&conn, "u1", 5).unwrap();
        let ms: Vec<_> = orders
            .iter()
            .map(|o| (o.order_id.as_str(), o.created_at.map(|t| t.timestamp_millis())))
            .collect();
        assert_eq!(
            ms,
            vec![
                ("secs", Some((SECONDS_CUTOFF - 1) * 1000)),
                ("millis", Some(SECONDS_CUTOFF)),
            ]
        );
    }

    #[test]
    fn points_absent_for_unknown_user() {
        let conn = conn();
        assert_eq!(get_user_points(&conn, "nobody").unwrap(), None);

        upsert_user_points(&conn, "u1", Some("alice"), 120).unwrap();
        assert_eq!(get_user_points(&conn, "u1").unwrap(), Some(120));

        upsert_user_points(&conn, "u1", None, 80).unwrap();
        assert_eq!(get_user_points(&conn, "u1").unwrap(), Some(80));
    }

    #[test]
    fn stats_count_other_statuses_in_total_only() {
        let conn = conn();
        insert_order(&conn, &order("a", "u1", OrderStatus::Pending, 1_000_000_000_000)).unwrap();
        insert_order(&conn, &order("b", "u1", OrderStatus::Paid, 1_000_000_000_001)).unwrap();
        insert_order(&conn, &order("c", "u1", OrderStatus::Delivered, 1_000_000_000_002)).unwrap();
        insert_order(&conn, &order("d", "u1", OrderStatus::Refunded, 1_000_000_000_003)).unwrap();
        insert_order(&conn, &order("e", "u2", OrderStatus::Pending, 1_000_000_000_004)).unwrap();

        let stats = get_order_stats(&conn, "u1").unwrap();
        assert_eq!(
            stats,
            OrderStats {
                total: 4,
                pending: 1,
                delivered: 1
            }
        );
    }

    #[test]
    fn stats_for_user_without_orders_are_zero() {
        let conn = conn();
        assert_eq!(get_order_stats(&conn, "ghost").unwrap(), OrderStats::default());
        assert!(get_recent_orders(&conn, "ghost", 5).unwrap().is_empty());
    }

    #[test]
    fn recent_orders_mix_second_and_millisecond_timestamps() {
        let conn = conn();
        // Legacy row in seconds, newer than the millisecond row below.
        insert_order(&conn, &order("legacy", "u1", OrderStatus::Delivered, 1_700_000_100)).unwrap();
        insert_order(&conn, &order("modern", "u1", OrderStatus::Pending, 1_700_000_000_000)).unwrap();

        let ids: Vec<String> = get_recent_orders(&conn, "u1", 5)
            .unwrap()
            .into_iter()
            .map(|o| o.order_id)
            .collect();
        assert_eq!(ids, vec!["legacy", "modern"]);
    }

    #[test]
    fn recent_orders_break_ties_by_insertion_order() {
        let conn = conn();
        for id in ["first", "second", "third"] {
            insert_order(&conn, &order(id, "u1", OrderStatus::Paid, 1_700_000_000_000)).unwrap();
        }

        let ids: Vec<String> = get_recent_orders(&conn, "u1", 5)
            .unwrap()
            .into_iter()
            .map(|o| o.order_id)
            .collect();
        assert_eq!(ids, vec!["third", "second", "first"]);
    }

    #[test]
    fn recent_orders_respect_limit_and_project_fields() {
        let conn = conn();
        for i in 0..8 {
            insert_order(
                &conn,
                &order(&format!("o{}", i), "u1", OrderStatus::Paid, 1_700_000_000_000 + i),
            )
            .unwrap();
        }

        let orders = get_recent_orders(&conn, "u1", 5).unwrap();
        assert_eq!(orders.len(), 5);
        assert_eq!(orders[0].order_id, "o7");
        assert_eq!(orders[0].amount, "9.90");
        assert_eq!(orders[0].status.as_deref(), Some("paid"));
        assert_eq!(orders[0].status_kind(), Some(OrderStatus::Paid));
        assert_eq!(
            orders[0].created_at.map(|t| t.timestamp_millis()),
            Some(1_700_000_000_007)
        );
    }
}
