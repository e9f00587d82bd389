//! User service implementation
//!
//! Identity lookups for the core. Users are owned by the identity
//! collaborator; this service resolves who is calling and registers users
//! for seeding and tests.

use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;
use crate::database::Store;
use crate::models::user::{Actor, CreateUserRequest, User};
use crate::services::clock::Clock;
use crate::utils::errors::{Result, SeminarHubError};
use crate::utils::helpers::normalize_whitespace;

/// User service for identity lookups
#[derive(Clone)]
pub struct UserService<S: Store> {
    store: S,
    clock: Arc<dyn Clock>,
}

impl<S: Store> UserService<S> {
    /// Create a new UserService instance
    pub fn new(store: S, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Resolve the caller of a core operation
    pub async fn actor(&self, user_id: Uuid) -> Result<Actor> {
        let user = self.get_user(user_id).await?;
        Ok(Actor::from(&user))
    }

    /// Get user by ID
    pub async fn get_user(&self, user_id: Uuid) -> Result<User> {
        debug!(user_id = %user_id, "Getting user by ID");
        self.store
            .find_user(user_id)
            .await?
            .ok_or_else(|| SeminarHubError::not_found("User", user_id))
    }

    /// Get user by username
    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.store.find_user_by_username(username.trim()).await
    }

    /// Register a new user or get the existing one with the same username
    pub async fn register_or_get_user(&self, request: CreateUserRequest) -> Result<User> {
        let username = request.username.trim().to_string();
        if username.is_empty() {
            return Err(SeminarHubError::InvalidInput("Username is required".to_string()));
        }

        if let Some(existing) = self.store.find_user_by_username(&username).await? {
            debug!(user_id = %existing.id, username = %username, "User already exists, returning existing user");
            return Ok(existing);
        }

        let full_name = normalize_whitespace(&request.full_name);
        if full_name.is_empty() {
            return Err(SeminarHubError::InvalidInput("Full name is required".to_string()));
        }

        let user = self
            .store
            .create_user(User {
                id: Uuid::new_v4(),
                username,
                full_name,
                email: request.email,
                department: request.department,
                role: request.role,
                created_at: self.clock.now(),
            })
            .await?;

        info!(user_id = %user.id, role = %user.role, "New user registered successfully");
        Ok(user)
    }
}
