// SPDX-License-Identifier: MIT

//! Data models for the application.

pub mod friend_request;
pub mod user;

pub use friend_request::{FriendRequest, FriendRequestStatus};
pub use user::{User, UserResponse};
