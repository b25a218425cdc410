//! Access control for an authenticated session

use wf_core::error::WfError;
use wf_core::result::WfResult;
use wf_core::traits::Id;
use wf_models::{Identity, Role};

use crate::policy::{allows, permitted_actions, Action};

/// The logged-in identity together with its permission checks
#[derive(Debug, Clone)]
pub struct AccessControl {
    identity: Identity,
}

impl AccessControl {
    pub fn new(identity: Identity) -> Self {
        Self { identity }
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn user_id(&self) -> Id {
        self.identity.id
    }

    pub fn role(&self) -> Role {
        self.identity.role
    }

    pub fn is_admin(&self) -> bool {
        self.identity.role == Role::Admin
    }

    pub fn can(&self, action: Action) -> bool {
        allows(self.identity.role, action)
    }

    /// `Forbidden` unless the role grants `action`
    pub fn require(&self, action: Action) -> WfResult<()> {
        if self.can(action) {
            return Ok(());
        }

        tracing::warn!(
            user = %self.identity.username,
            role = %self.identity.role,
            action = %action,
            "Permission denied"
        );
        Err(WfError::Forbidden {
            role: self.identity.role.to_string(),
            action: action.to_string(),
        })
    }

    pub fn permitted_actions(&self) -> Vec<Action> {
        permitted_actions(self.identity.role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(role: Role) -> AccessControl {
        AccessControl::new(Identity {
            id: 7,
            username: "ana".to_string(),
            role,
            email: None,
        })
    }

    #[test]
    fn test_require() {
        let employee = session(Role::Employee);
        assert!(employee.require(Action::LogTime).is_ok());

        let err = employee.require(Action::DeleteEmployee).unwrap_err();
        assert_eq!(err.error_code(), "forbidden");
        assert_eq!(err.to_string(), "Forbidden: role 'employee' may not delete_employee");
    }

    #[test]
    fn test_admin() {
        let admin = session(Role::Admin);
        assert!(admin.is_admin());
        assert!(admin.require(Action::ManageUsers).is_ok());
        assert_eq!(admin.user_id(), 7);
        assert!(!session(Role::Supervisor).is_admin());
    }
}
