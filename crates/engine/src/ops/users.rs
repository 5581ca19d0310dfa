use sea_orm::prelude::*;

use crate::{EngineError, ResultEngine, User, users};

use super::Engine;

impl Engine {
    /// Record a new marketplace account.
    pub async fn register_user(&self, user: User) -> ResultEngine<()> {
        if user.id.trim().is_empty() {
            return Err(EngineError::Validation(
                "user id must not be empty".to_string(),
            ));
        }
        let model: users::ActiveModel = (&user).into();
        model.insert(&self.database).await?;
        Ok(())
    }

    /// Look up an account by id.
    pub async fn user(&self, user_id: &str) -> ResultEngine<User> {
        let model = users::Entity::find_by_id(user_id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::NotFound(format!("user {user_id}")))?;
        User::try_from(model)
    }
}
