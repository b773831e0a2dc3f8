// SPDX-License-Identifier: MIT

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Users (accounts, profiles, friend links)
//! - Friend requests (pending/accepted join documents)

use crate::db::collections;
use crate::error::AppError;
use crate::models::{FriendRequest, FriendRequestStatus, User};
use futures_util::{stream, StreamExt};

const MAX_CONCURRENT_DB_OPS: usize = 50;

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Get a user by ID.
    pub async fn get_user(&self, user_id: &str) -> Result<Option<User>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(user_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Look up a user by (lowercased) email address.
    ///
    /// Email uniqueness is enforced at signup by checking here first.
    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let email = email.to_string();
        let matches: Vec<User> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::USERS)
            .filter(move |q| q.field("email").eq(email.clone()))
            .limit(1)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(matches.into_iter().next())
    }

    /// Create or update a user.
    pub async fn upsert_user(&self, user: &User) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::USERS)
            .document_id(&user.id)
            .object(user)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Get onboarded users eligible as recommended partners.
    ///
    /// Excludes the requesting user and their existing friends. Firestore
    /// has no efficient "not-in" over arrays, so the exclusion happens in
    /// memory after a bounded query.
    pub async fn get_recommended_users(
        &self,
        for_user: &User,
        limit: u32,
    ) -> Result<Vec<User>, AppError> {
        let candidates: Vec<User> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::USERS)
            .filter(|q| q.field("is_onboarded").eq(true))
            .limit(limit)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let user_id = for_user.id.clone();
        Ok(candidates
            .into_iter()
            .filter(|u| u.id != user_id && !for_user.friend_ids.contains(&u.id))
            .collect())
    }

    /// Fetch several users by ID concurrently, skipping any that no
    /// longer exist.
    pub async fn get_users_by_ids(&self, user_ids: &[String]) -> Result<Vec<User>, AppError> {
        let client = self.get_client()?;

        let results: Vec<Result<Option<User>, AppError>> = stream::iter(user_ids.to_vec())
            .map(|id| async move {
                client
                    .fluent()
                    .select()
                    .by_id_in(collections::USERS)
                    .obj()
                    .one(&id)
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))
            })
            .buffer_unordered(MAX_CONCURRENT_DB_OPS)
            .collect()
            .await;

        let mut users = Vec::with_capacity(user_ids.len());
        for result in results {
            if let Some(user) = result? {
                users.push(user);
            }
        }
        Ok(users)
    }

    // ─── Friend Request Operations ───────────────────────────────

    /// Get a friend request by ID.
    pub async fn get_friend_request(
        &self,
        request_id: &str,
    ) -> Result<Option<FriendRequest>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::FRIEND_REQUESTS)
            .obj()
            .one(request_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create or update a friend request.
    pub async fn upsert_friend_request(&self, request: &FriendRequest) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::FRIEND_REQUESTS)
            .document_id(&request.id)
            .object(request)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Find any request between two users, in either direction.
    ///
    /// Used to reject duplicate requests before creating a new one.
    pub async fn find_request_between(
        &self,
        user_a: &str,
        user_b: &str,
    ) -> Result<Option<FriendRequest>, AppError> {
        if let Some(req) = self.find_request_directed(user_a, user_b).await? {
            return Ok(Some(req));
        }
        self.find_request_directed(user_b, user_a).await
    }

    async fn find_request_directed(
        &self,
        sender_id: &str,
        recipient_id: &str,
    ) -> Result<Option<FriendRequest>, AppError> {
        let sender_id = sender_id.to_string();
        let recipient_id = recipient_id.to_string();
        let matches: Vec<FriendRequest> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::FRIEND_REQUESTS)
            .filter(move |q| {
                q.for_all([
                    q.field("sender_id").eq(sender_id.clone()),
                    q.field("recipient_id").eq(recipient_id.clone()),
                ])
            })
            .limit(1)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(matches.into_iter().next())
    }

    /// Pending requests addressed to a user (incoming).
    pub async fn get_incoming_requests(
        &self,
        recipient_id: &str,
    ) -> Result<Vec<FriendRequest>, AppError> {
        self.query_requests("recipient_id", recipient_id, FriendRequestStatus::Pending)
            .await
    }

    /// Requests a user sent that have since been accepted (notifications).
    pub async fn get_accepted_requests_sent_by(
        &self,
        sender_id: &str,
    ) -> Result<Vec<FriendRequest>, AppError> {
        self.query_requests("sender_id", sender_id, FriendRequestStatus::Accepted)
            .await
    }

    /// Pending requests a user has sent (outgoing).
    pub async fn get_outgoing_requests(
        &self,
        sender_id: &str,
    ) -> Result<Vec<FriendRequest>, AppError> {
        self.query_requests("sender_id", sender_id, FriendRequestStatus::Pending)
            .await
    }

    async fn query_requests(
        &self,
        user_field: &str,
        user_id: &str,
        status: FriendRequestStatus,
    ) -> Result<Vec<FriendRequest>, AppError> {
        let user_field = user_field.to_string();
        let user_id = user_id.to_string();
        let status_str = match status {
            FriendRequestStatus::Pending => "pending",
            FriendRequestStatus::Accepted => "accepted",
        };

        self.get_client()?
            .fluent()
            .select()
            .from(collections::FRIEND_REQUESTS)
            .filter(move |q| {
                q.for_all([
                    q.field(user_field.clone()).eq(user_id.clone()),
                    q.field("status").eq(status_str.to_string()),
                ])
            })
            .order_by([(
                "created_at",
                firestore::FirestoreQueryDirection::Descending,
            )])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
