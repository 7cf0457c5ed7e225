//! Chat room entity model.

use serde::Serialize;
use sqlx::FromRow;
use worklane_core::lifecycle::CloseRole;
use worklane_core::status::{ChatStatus, StatusId};
use worklane_core::types::{DbId, Timestamp};

/// A chat row from the `chats` table. A project has at most one Active
/// chat; Closed chats from withdrawn confirmations are retained.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Chat {
    pub id: DbId,
    pub project_id: DbId,
    pub client_id: DbId,
    pub freelancer_id: DbId,
    pub client_close_flag: bool,
    pub freelancer_close_flag: bool,
    pub status_id: StatusId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Chat {
    pub fn is_closed(&self) -> bool {
        self.status_id == ChatStatus::Closed.id()
    }

    /// True if the user is one of the two chat parties.
    pub fn is_participant(&self, user_id: DbId) -> bool {
        self.client_id == user_id || self.freelancer_id == user_id
    }

    /// Which side of the chat the user is on, if any.
    pub fn role_of(&self, user_id: DbId) -> Option<CloseRole> {
        if user_id == self.client_id {
            Some(CloseRole::Client)
        } else if user_id == self.freelancer_id {
            Some(CloseRole::Freelancer)
        } else {
            None
        }
    }
}
