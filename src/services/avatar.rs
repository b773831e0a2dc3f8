// SPDX-License-Identifier: MIT

//! Random avatar assignment.
//!
//! New accounts get a picture from the public avatar service so profiles
//! are never faceless. The service hosts exactly 100 images.

use rand::Rng;

const AVATAR_BASE_URL: &str = "https://avatar.iran.liara.run/public";
const AVATAR_COUNT: u32 = 100;

/// Pick a random avatar URL. The index is always in [1, 100].
pub fn random_avatar_url() -> String {
    let idx = rand::thread_rng().gen_range(1..=AVATAR_COUNT);
    avatar_url(idx)
}

fn avatar_url(idx: u32) -> String {
    format!("{}/{}.png", AVATAR_BASE_URL, idx)
}
