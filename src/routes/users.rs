// SPDX-License-Identifier: MIT

//! User routes: onboarding, recommended partners, and the friend graph.
//!
//! Everything here sits behind the auth gate.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{FriendRequest, FriendRequestStatus, User, UserResponse};
use crate::routes::auth::missing_fields;
use crate::AppState;

const RECOMMENDED_QUERY_LIMIT: u32 = 50;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/users", get(recommended_users))
        .route("/api/users/onboarding", put(complete_onboarding))
        .route("/api/users/friends", get(friends))
        .route("/api/users/friend-request/{id}", post(send_friend_request))
        .route(
            "/api/users/friend-request/{id}/accept",
            put(accept_friend_request),
        )
        .route("/api/users/friend-requests", get(friend_requests))
        .route(
            "/api/users/outgoing-friend-requests",
            get(outgoing_friend_requests),
        )
}

// ─── Onboarding ──────────────────────────────────────────────

#[derive(Deserialize)]
pub struct OnboardingRequest {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub native_language: String,
    #[serde(default)]
    pub learning_language: String,
    #[serde(default)]
    pub location: String,
    /// Optional: keeps the signup avatar when absent.
    #[serde(default)]
    pub profile_pic: Option<String>,
}

#[derive(Serialize)]
pub struct OnboardingResponse {
    pub success: bool,
    pub user: UserResponse,
}

/// Persist the full profile and flip `is_onboarded`.
///
/// The frontend invalidates its cached identity on success, which makes
/// the router re-evaluate access and admit the user to the home view.
async fn complete_onboarding(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Json(payload): Json<OnboardingRequest>,
) -> Result<Json<OnboardingResponse>> {
    let missing = missing_fields(&[
        ("full_name", &payload.full_name),
        ("bio", &payload.bio),
        ("native_language", &payload.native_language),
        ("learning_language", &payload.learning_language),
        ("location", &payload.location),
    ]);
    if !missing.is_empty() {
        return Err(AppError::MissingFields(missing));
    }

    let mut user = state
        .db
        .get_user(&auth.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    user.full_name = payload.full_name.trim().to_string();
    user.bio = payload.bio.trim().to_string();
    user.native_language = payload.native_language.trim().to_lowercase();
    user.learning_language = payload.learning_language.trim().to_lowercase();
    user.location = payload.location.trim().to_string();
    if let Some(profile_pic) = payload.profile_pic.filter(|p| !p.trim().is_empty()) {
        user.profile_pic = profile_pic;
    }
    user.is_onboarded = true;
    user.updated_at = chrono::Utc::now().to_rfc3339();

    state.db.upsert_user(&user).await?;

    tracing::info!(user_id = %user.id, "Onboarding completed");

    Ok(Json(OnboardingResponse {
        success: true,
        user: user.into(),
    }))
}

// ─── Recommendations & Friends ───────────────────────────────

#[derive(Serialize)]
pub struct UsersResponse {
    pub success: bool,
    pub users: Vec<UserResponse>,
}

/// Recommended language partners: onboarded users who are neither the
/// requester nor already friends.
async fn recommended_users(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<UsersResponse>> {
    let user = state
        .db
        .get_user(&auth.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let recommended = state
        .db
        .get_recommended_users(&user, RECOMMENDED_QUERY_LIMIT)
        .await?;

    Ok(Json(UsersResponse {
        success: true,
        users: recommended.into_iter().map(UserResponse::from).collect(),
    }))
}

/// The requester's friends list.
async fn friends(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<UsersResponse>> {
    let user = state
        .db
        .get_user(&auth.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let friends = state.db.get_users_by_ids(&user.friend_ids).await?;

    Ok(Json(UsersResponse {
        success: true,
        users: friends.into_iter().map(UserResponse::from).collect(),
    }))
}

// ─── Friend Requests ─────────────────────────────────────────

#[derive(Serialize)]
pub struct FriendRequestResponse {
    pub success: bool,
    pub request: FriendRequest,
}

/// Send a friend request to another user.
async fn send_friend_request(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(recipient_id): Path<String>,
) -> Result<(StatusCode, Json<FriendRequestResponse>)> {
    if recipient_id == auth.user_id {
        return Err(AppError::BadRequest(
            "You can't send a friend request to yourself".to_string(),
        ));
    }

    let sender = state
        .db
        .get_user(&auth.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let recipient = state
        .db
        .get_user(&recipient_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Recipient not found".to_string()))?;

    if sender.friend_ids.contains(&recipient.id) {
        return Err(AppError::BadRequest(
            "You are already friends with this user".to_string(),
        ));
    }

    if state
        .db
        .find_request_between(&sender.id, &recipient.id)
        .await?
        .is_some()
    {
        return Err(AppError::BadRequest(
            "A friend request already exists between you and this user".to_string(),
        ));
    }

    let request = FriendRequest {
        id: Uuid::new_v4().to_string(),
        sender_id: sender.id.clone(),
        recipient_id: recipient.id.clone(),
        status: FriendRequestStatus::Pending,
        created_at: chrono::Utc::now().to_rfc3339(),
    };

    state.db.upsert_friend_request(&request).await?;

    tracing::info!(
        sender_id = %sender.id,
        recipient_id = %recipient.id,
        "Friend request sent"
    );

    Ok((
        StatusCode::CREATED,
        Json(FriendRequestResponse {
            success: true,
            request,
        }),
    ))
}

/// Accept a friend request addressed to the requester.
///
/// Links both users' friend lists; last write wins if the two profiles
/// are mutated concurrently, matching the rest of the profile model.
async fn accept_friend_request(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(request_id): Path<String>,
) -> Result<Json<FriendRequestResponse>> {
    let mut request = state
        .db
        .get_friend_request(&request_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Friend request not found".to_string()))?;

    if request.recipient_id != auth.user_id {
        return Err(AppError::Unauthorized);
    }

    if request.status == FriendRequestStatus::Accepted {
        return Err(AppError::BadRequest(
            "This friend request was already accepted".to_string(),
        ));
    }

    request.status = FriendRequestStatus::Accepted;
    state.db.upsert_friend_request(&request).await?;

    // Link both sides of the friendship.
    for (owner_id, other_id) in [
        (&request.sender_id, &request.recipient_id),
        (&request.recipient_id, &request.sender_id),
    ] {
        if let Some(mut user) = state.db.get_user(owner_id).await? {
            if !user.friend_ids.contains(other_id) {
                user.friend_ids.push(other_id.clone());
                user.updated_at = chrono::Utc::now().to_rfc3339();
                state.db.upsert_user(&user).await?;
            }
        }
    }

    tracing::info!(request_id = %request.id, "Friend request accepted");

    Ok(Json(FriendRequestResponse {
        success: true,
        request,
    }))
}

/// A friend request with the counterpart profile embedded, for the
/// notifications view.
#[derive(Serialize)]
pub struct FriendRequestWithUser {
    #[serde(flatten)]
    pub request: FriendRequest,
    pub user: UserResponse,
}

#[derive(Serialize)]
pub struct FriendRequestsResponse {
    pub success: bool,
    pub incoming: Vec<FriendRequestWithUser>,
    pub accepted: Vec<FriendRequestWithUser>,
}

/// Incoming pending requests plus sent requests that were accepted.
async fn friend_requests(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<FriendRequestsResponse>> {
    let incoming = state.db.get_incoming_requests(&auth.user_id).await?;
    let accepted = state
        .db
        .get_accepted_requests_sent_by(&auth.user_id)
        .await?;

    let incoming = embed_users(&state, incoming, |r| r.sender_id.clone()).await?;
    let accepted = embed_users(&state, accepted, |r| r.recipient_id.clone()).await?;

    Ok(Json(FriendRequestsResponse {
        success: true,
        incoming,
        accepted,
    }))
}

#[derive(Serialize)]
pub struct OutgoingRequestsResponse {
    pub success: bool,
    pub outgoing: Vec<FriendRequestWithUser>,
}

/// Pending requests the requester has sent.
async fn outgoing_friend_requests(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<OutgoingRequestsResponse>> {
    let outgoing = state.db.get_outgoing_requests(&auth.user_id).await?;
    let outgoing = embed_users(&state, outgoing, |r| r.recipient_id.clone()).await?;

    Ok(Json(OutgoingRequestsResponse {
        success: true,
        outgoing,
    }))
}

/// Resolve the counterpart profile for each request, dropping requests
/// whose counterpart account no longer exists.
async fn embed_users(
    state: &Arc<AppState>,
    requests: Vec<FriendRequest>,
    counterpart_id: impl Fn(&FriendRequest) -> String,
) -> Result<Vec<FriendRequestWithUser>> {
    let ids: Vec<String> = requests.iter().map(&counterpart_id).collect();
    let users = state.db.get_users_by_ids(&ids).await?;

    let by_id: std::collections::HashMap<String, User> =
        users.into_iter().map(|u| (u.id.clone(), u)).collect();

    Ok(requests
        .into_iter()
        .filter_map(|request| {
            by_id.get(&counterpart_id(&request)).map(|user| {
                FriendRequestWithUser {
                    request,
                    user: user.clone().into(),
                }
            })
        })
        .collect())
}
