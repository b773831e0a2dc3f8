// SPDX-License-Identifier: MIT

//! Friend request model.

use serde::{Deserialize, Serialize};

/// Lifecycle of a friend request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FriendRequestStatus {
    Pending,
    Accepted,
}

/// A friend request stored in Firestore.
///
/// At most one pending request may exist between two users, in either
/// direction. Accepting links both users' `friend_ids`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FriendRequest {
    /// UUID v4, also used as document ID
    pub id: String,
    pub sender_id: String,
    pub recipient_id: String,
    pub status: FriendRequestStatus,
    /// When the request was sent (RFC 3339)
    pub created_at: String,
}
