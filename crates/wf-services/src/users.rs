//! Account administration and self-service password change

use wf_auth::{Action, CredentialStore};
use wf_core::result::WfResult;
use wf_core::traits::Id;
use wf_db::UserRepository;
use wf_models::{Role, User};

use crate::context::ServiceContext;

/// User account operations for one session
pub struct UserService<'a> {
    ctx: &'a ServiceContext,
    credentials: CredentialStore<UserRepository>,
}

impl<'a> UserService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self {
            ctx,
            credentials: ctx.credentials(),
        }
    }

    pub async fn create_user(
        &self,
        username: &str,
        password: &str,
        role: Role,
        email: Option<&str>,
    ) -> WfResult<User> {
        self.ctx.require(Action::ManageUsers)?;
        self.credentials.create_user(username, password, role, email).await
    }

    pub async fn list_users(&self) -> WfResult<Vec<User>> {
        self.ctx.require(Action::ManageUsers)?;
        self.credentials.list_users().await
    }

    pub async fn deactivate(&self, user_id: Id) -> WfResult<()> {
        self.ctx.require(Action::ManageUsers)?;
        self.credentials.deactivate(user_id).await
    }

    pub async fn unlock(&self, user_id: Id) -> WfResult<()> {
        self.ctx.require(Action::ManageUsers)?;
        self.credentials.unlock(user_id).await
    }

    /// Change the logged-in user's own password
    pub async fn change_password(&self, current: &str, new: &str) -> WfResult<()> {
        self.ctx.require(Action::ChangePassword)?;
        self.credentials
            .change_password(self.ctx.access().user_id(), current, new)
            .await
    }
}
