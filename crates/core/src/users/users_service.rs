use std::sync::Arc;

use async_trait::async_trait;
use log::info;
use uuid::Uuid;

use super::users_model::{NewUser, User};
use super::users_traits::{UserRepositoryTrait, UserServiceTrait};
use crate::errors::{Result, ValidationError};

pub struct UserService {
    repository: Arc<dyn UserRepositoryTrait>,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepositoryTrait>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl UserServiceTrait for UserService {
    fn find_active_by_username(&self, username: &str) -> Result<Option<User>> {
        Ok(self
            .repository
            .find_by_username(username.trim())?
            .filter(|u| u.is_active))
    }

    fn find_active_by_id(&self, user_id: &str) -> Result<Option<User>> {
        Ok(self.repository.get_by_id(user_id)?.filter(|u| u.is_active))
    }

    async fn upsert_user(&self, new_user: NewUser) -> Result<User> {
        let username = new_user.username.trim().to_string();
        if username.is_empty() {
            return Err(ValidationError::MissingField("username".to_string()).into());
        }
        if new_user.password_hash.trim().is_empty() {
            return Err(ValidationError::MissingField("password_hash".to_string()).into());
        }
        // Replacing a user keeps its id so existing purchases stay attached.
        let id = match self.repository.find_by_username(&username)? {
            Some(existing) => existing.id,
            None => new_user.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
        };
        let user = self
            .repository
            .upsert(User {
                id,
                username,
                password_hash: new_user.password_hash,
                is_active: new_user.is_active,
            })
            .await?;
        info!("Upserted user {}", user.username);
        Ok(user)
    }
}
