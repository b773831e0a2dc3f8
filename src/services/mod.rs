// SPDX-License-Identifier: MIT

//! Service modules.

pub mod avatar;
pub mod chat;

pub use chat::ChatTokenService;
