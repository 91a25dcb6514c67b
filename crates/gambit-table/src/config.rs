//! Table configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the table actor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableConfig {
    /// Capacity of the command queue. Senders wait when it is full.
    pub command_channel_size: usize,

    /// Longest chat line relayed, in characters. Longer lines are cut.
    pub max_chat_len: usize,

    /// Whether to post a system notice when a move ends the game.
    pub announce_outcome: bool,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            command_channel_size: 64,
            max_chat_len: 500,
            announce_outcome: true,
        }
    }
}
