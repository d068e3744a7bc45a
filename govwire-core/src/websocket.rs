//! WebSocket message types for real-time feed updates
//!
//! These types define the protocol for WebSocket communication between
//! the server and clients.

use serde::{Deserialize, Serialize};

use crate::article::{AnalyticsSnapshot, Article, TrendingSnapshot};

// ============================================================================
// Client -> Server Messages
// ============================================================================

/// Messages sent from client to server
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Ping to keep connection alive
    Ping {
        /// Client timestamp
        timestamp: i64,
    },
}

// ============================================================================
// Server -> Client Messages
// ============================================================================

/// Messages sent from server to client
///
/// Each payload is self-contained: articles are the newly inserted batch,
/// trending and analytics are full replacement snapshots. Clients connecting
/// after a publish do not receive past messages.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServerMessage {
    /// Newly ingested articles
    #[serde(rename = "articles:new")]
    ArticlesNew { articles: Vec<Article> },

    /// New full trending ranking
    #[serde(rename = "trending:update")]
    TrendingUpdate { trending: TrendingSnapshot },

    /// New full analytics snapshot
    #[serde(rename = "analytics:update")]
    AnalyticsUpdate { analytics: AnalyticsSnapshot },

    /// Pong response to client ping
    #[serde(rename = "pong")]
    Pong {
        /// Echo back client timestamp
        client_timestamp: i64,
        /// Server timestamp
        server_timestamp: i64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_message_uses_event_kind_tags() {
        let msg = ServerMessage::TrendingUpdate {
            trending: TrendingSnapshot { officials: vec![] },
        };
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "trending:update");

        let msg = ServerMessage::ArticlesNew { articles: vec![] };
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "articles:new");
    }

    #[test]
    fn client_ping_round_trips() {
        let parsed: ClientMessage =
            serde_json::from_str(r#"{"type":"ping","timestamp":42}"#).unwrap();
        match parsed {
            ClientMessage::Ping { timestamp } => assert_eq!(timestamp, 42),
        }
    }
}
