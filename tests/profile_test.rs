//! Integration tests for shopper profile aggregation
//!
//! Run with: cargo test --test profile_test

mod common;

use common::TestEnvironment;
use shopdesk::profile::{self, ProfileUser};
use shopdesk::storage::orders::{OrderStats, OrderStatus};

fn shopper(id: &str) -> ProfileUser {
    ProfileUser {
        id: id.to_string(),
        name: "Shopper".to_string(),
        username: None,
        avatar: None,
    }
}

mod aggregation_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_three_orders_counted_and_sorted() {
        let env = TestEnvironment::new();
        let t1 = 1_735_000_000_000;
        let t2 = t1 + 60_000;
        let t3 = t2 + 60_000;

        env.set_points("u1", 120);
        env.insert_order("ORD-1", "u1", OrderStatus::Pending, t1);
        env.insert_order("ORD-2", "u1", OrderStatus::Delivered, t2);
        env.insert_order("ORD-3", "u1", OrderStatus::Pending, t3);

        let view = profile::load_profile(&env.pool, shopper("u1")).await;

        assert_eq!(view.points, 120);
        assert_eq!(
            view.order_stats,
            OrderStats {
                total: 3,
                pending: 2,
                delivered: 1
            }
        );
        let ids: Vec<&str> = view.recent_orders.iter().map(|o| o.order_id.as_str()).collect();
        assert_eq!(ids, vec!["ORD-3", "ORD-2", "ORD-1"]);
    }

    #[tokio::test]
    async fn test_user_without_orders_or_points() {
        let env = TestEnvironment::new();
        env.insert_order("OTHER-1", "someone-else", OrderStatus::Delivered, 1_735_000_000_000);

        let view = profile::load_profile(&env.pool, shopper("u1")).await;

        assert_eq!(view.points, 0);
        assert_eq!(view.order_stats, OrderStats::default());
        assert!(view.recent_orders.is_empty());
    }

    #[tokio::test]
    async fn test_recent_orders_capped_at_five_newest() {
        let env = TestEnvironment::new();
        let base = 1_735_000_000_000;
        for i in 0..8 {
            env.insert_order(&format!("ORD-{}", i), "u1", OrderStatus::Paid, base + i * 1_000);
        }

        let view = profile::load_profile(&env.pool, shopper("u1")).await;

        assert_eq!(view.order_stats.total, 8);
        assert_eq!(view.order_stats.pending + view.order_stats.delivered, 0);
        let ids: Vec<&str> = view.recent_orders.iter().map(|o| o.order_id.as_str()).collect();
        assert_eq!(ids, vec!["ORD-7", "ORD-6", "ORD-5", "ORD-4", "ORD-3"]);
    }

    #[tokio::test]
    async fn test_legacy_second_timestamps_sort_with_millis() {
        let env = TestEnvironment::new();
        // 2024-12-24 in seconds, then a millisecond row from the next day
        env.insert_order("LEGACY", "u1", OrderStatus::Delivered, 1_735_000_000);
        env.insert_order("MODERN", "u1", OrderStatus::Delivered, 1_735_086_400_000);
        env.insert_order("OLDER", "u1", OrderStatus::Delivered, 1_734_900_000_000);

        let view = profile::load_profile(&env.pool, shopper("u1")).await;

        let ids: Vec<&str> = view.recent_orders.iter().map(|o| o.order_id.as_str()).collect();
        assert_eq!(ids, vec!["MODERN", "LEGACY", "OLDER"]);
        assert_eq!(
            view.recent_orders[1].created_at.map(|at| at.timestamp_millis()),
            Some(1_735_000_000_000)
        );
    }
}

mod degraded_read_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_missing_points_table_degrades_points_only() {
        let env = TestEnvironment::new();
        env.insert_order("ORD-1", "u1", OrderStatus::Pending, 1_735_000_000_000);
        env.insert_order("ORD-2", "u1", OrderStatus::Delivered, 1_735_000_100_000);
        env.conn()
            .execute_batch("DROP TABLE login_users")
            .expect("Failed to drop table");

        let snapshot = profile::collect(&env.pool, "u1").await;
        assert!(snapshot.points.is_err());
        assert!(snapshot.order_stats.is_ok());
        assert!(snapshot.recent_orders.is_ok());

        let view = snapshot.into_view(shopper("u1"));
        assert_eq!(view.points, 0);
        assert_eq!(view.order_stats.total, 2);
        assert_eq!(view.recent_orders.len(), 2);
    }

    #[tokio::test]
    async fn test_missing_orders_table_keeps_points() {
        let env = TestEnvironment::new();
        env.set_points("u1", 7);
        env.conn()
            .execute_batch("DROP TABLE orders")
            .expect("Failed to drop table");

        let view = profile::load_profile(&env.pool, shopper("u1")).await;

        assert_eq!(view.points, 7);
        assert_eq!(view.order_stats, OrderStats::default());
        assert!(view.recent_orders.is_empty());
    }
}
