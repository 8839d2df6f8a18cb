use async_trait::async_trait;

use super::users_model::{NewUser, User};
use crate::errors::Result;

/// Trait for user repository operations
#[async_trait]
pub trait UserRepositoryTrait: Send + Sync {
    fn find_by_username(&self, username: &str) -> Result<Option<User>>;
    fn get_by_id(&self, user_id: &str) -> Result<Option<User>>;
    async fn upsert(&self, user: User) -> Result<User>;
}

/// Trait for user service operations
#[async_trait]
pub trait UserServiceTrait: Send + Sync {
    /// Active user by name; inactive and unknown users are both `None`.
    fn find_active_by_username(&self, username: &str) -> Result<Option<User>>;
    fn find_active_by_id(&self, user_id: &str) -> Result<Option<User>>;
    async fn upsert_user(&self, new_user: NewUser) -> Result<User>;
}
