use serde::Serialize;
use sqlx::PgPool;

/// Point-in-time view of the connection pool.
///
/// Read from the live pool on every call; all zero when there is no pool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ConnectionStats {
    /// Pool ceiling on open connections.
    pub max_open_connections: u32,
    /// Connections currently open, idle or in use.
    pub open_connections: u32,
    /// Connections checked out by callers.
    pub in_use: u32,
    /// Connections waiting in the pool.
    pub idle: u32,
}

impl ConnectionStats {
    pub fn from_pool(pool: &PgPool) -> Self {
        let open = pool.size();
        let idle = u32::try_from(pool.num_idle()).unwrap_or(u32::MAX);

        Self {
            max_open_connections: pool.options().get_max_connections(),
            open_connections: open,
            in_use: open.saturating_sub(idle),
            idle,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_all_zero() {
        let stats = ConnectionStats::default();
        assert_eq!(stats.max_open_connections, 0);
        assert_eq!(stats.open_connections, 0);
        assert_eq!(stats.in_use, 0);
        assert_eq!(stats.idle, 0);
    }

    #[test]
    fn test_serializes_field_names() {
        let stats = ConnectionStats {
            max_open_connections: 25,
            open_connections: 3,
            in_use: 1,
            idle: 2,
        };

        let json = serde_json::to_value(stats).unwrap();
        assert_eq!(json["max_open_connections"], 25);
        assert_eq!(json["open_connections"], 3);
        assert_eq!(json["in_use"], 1);
        assert_eq!(json["idle"], 2);
    }
}
