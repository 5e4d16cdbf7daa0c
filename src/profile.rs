//! Shopper profile aggregation.
//!
//! Three independent reads (points, order statistics, recent orders) run
//! concurrently, each on its own pooled connection. Each read keeps its own
//! `Result` until the view is assembled, where failures collapse to zero or
//! empty values so one broken query degrades the page instead of blocking it.

use serde::Serialize;
use std::sync::Arc;

use crate::core::config;
use crate::core::error::AppResult;
use crate::storage::db::{self, DbPool};
use crate::storage::orders::{self, OrderStats, RecentOrder};

/// Identity of the signed-in shopper as shown on the profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileUser {
    pub id: String,
    pub name: String,
    pub username: Option<String>,
    pub avatar: Option<String>,
}

/// Everything the profile page renders.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileView {
    pub user: ProfileUser,
    pub points: i64,
    pub order_stats: OrderStats,
    pub recent_orders: Vec<RecentOrder>,
}

/// Raw results of the three profile reads.
#[derive(Debug)]
pub struct ProfileSnapshot {
    pub points: AppResult<Option<i64>>,
    pub order_stats: AppResult<OrderStats>,
    pub recent_orders: AppResult<Vec<RecentOrder>>,
}

impl ProfileSnapshot {
    /// Collapses failed reads to defaults and builds the view.
    ///
    /// Each collapsed failure is logged; a missing points row is not a failure.
    pub fn into_view(self, user: ProfileUser) -> ProfileView {
        let points = match self.points {
            Ok(points) => points.unwrap_or(0),
            Err(e) => {
                log::warn!("Points lookup failed for user {}: {}", user.id, e);
                0
            }
        };

        let order_stats = self.order_stats.unwrap_or_else(|e| {
            log::warn!("Order statistics failed for user {}: {}", user.id, e);
            OrderStats::default()
        });

        let recent_orders = self.recent_orders.unwrap_or_else(|e| {
            log::warn!("Recent orders failed for user {}: {}", user.id, e);
            Vec::new()
        });

        ProfileView {
            user,
            points,
            order_stats,
            recent_orders,
        }
    }
}

/// Issues the three profile reads concurrently.
pub async fn collect(pool: &Arc<DbPool>, user_id: &str) -> ProfileSnapshot {
    let (uid_points, uid_stats, uid_recent) = (user_id.to_string(), user_id.to_string(), user_id.to_string());

    let (points, order_stats, recent_orders) = tokio::join!(
        db::with_connection(pool, move |conn| orders::get_user_points(conn, &uid_points)),
        db::with_connection(pool, move |conn| orders::get_order_stats(conn, &uid_stats)),
        db::with_connection(pool, move |conn| orders::get_recent_orders(
            conn,
            &uid_recent,
            config::profile::RECENT_ORDERS_LIMIT
        )),
    );

    ProfileSnapshot {
        points,
        order_stats,
        recent_orders,
    }
}

/// Loads the full profile view for a signed-in user.
pub async fn load_profile(pool: &Arc<DbPool>, user: ProfileUser) -> ProfileView {
    collect(pool, &user.id).await.into_view(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::AppError;
    use pretty_assertions::assert_eq;

    fn user() -> ProfileUser {
        ProfileUser {
            id: "u1".to_string(),
            name: "Alice".to_string(),
            username: Some("alice".to_string()),
            avatar: None,
        }
    }

    #[test]
    fn failures_collapse_to_defaults() {
        let snapshot = ProfileSnapshot {
            points: Err(AppError::validation("boom")),
            order_stats: Err(AppError::validation("boom")),
            recent_orders: Err(AppError::validation("boom")),
        };

        let view = snapshot.into_view(user());
        assert_eq!(view.points, 0);
        assert_eq!(view.order_stats, OrderStats::default());
        assert!(view.recent_orders.is_empty());
    }

    #[test]
    fn missing_points_row_is_zero() {
        let snapshot = ProfileSnapshot {
            points: Ok(None),
            order_stats: Ok(OrderStats {
                total: 2,
                pending: 1,
                delivered: 1,
            }),
            recent_orders: Ok(Vec::new()),
        };

        let view = snapshot.into_view(user());
        assert_eq!(view.points, 0);
        assert_eq!(view.order_stats.total, 2);
    }

    #[test]
    fn view_serializes_with_camel_case_contract() {
        let view = ProfileView {
            user: user(),
            points: 15,
            order_stats: OrderStats::default(),
            recent_orders: Vec::new(),
        };

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "user": {"id": "u1", "name": "Alice", "username": "alice", "avatar": null},
                "points": 15,
                "orderStats": {"total": 0, "pending": 0, "delivered": 0},
                "recentOrders": []
            })
        );
    }
}
