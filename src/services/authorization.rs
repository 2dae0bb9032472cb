use crate::database::entities::{JourneyPlan, Role};
use crate::errors::{AuthError, AuthResult};

/// An already-authenticated caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Identity {
    pub id: i64,
    pub role: Role,
}

impl Identity {
    pub fn new(id: i64, role: Role) -> Self {
        Self { id, role }
    }

    pub fn require_role(&self, role: Role) -> AuthResult<()> {
        if self.role == role {
            Ok(())
        } else {
            Err(AuthError::forbidden())
        }
    }

    /// Administrators see every plan; supervisors only their own.
    pub fn can_view_plan(&self, plan: &JourneyPlan) -> bool {
        match self.role {
            Role::Admin => true,
            Role::Supervisor => plan.is_owned_by(self.id),
            Role::Employee => false,
        }
    }
}
