use serde::Serialize;
use tracing::info;

use crate::database::entities::users::UserSummary;
use crate::database::entities::Role;
use crate::database::Database;
use crate::errors::{UserError, UserResult};

/// Counts shown on the administrator dashboard.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub pending: usize,
    pub employees: usize,
    pub supervisors: usize,
    pub cities: usize,
    pub locations: usize,
    pub products: usize,
}

#[derive(Clone)]
pub struct UserService {
    db: Database,
}

impl UserService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Public view of every user, or only employees awaiting approval.
    pub async fn list_users(&self, pending_only: bool) -> UserResult<Vec<UserSummary>> {
        let users = self
            .db
            .read(|snapshot| {
                snapshot
                    .users
                    .iter()
                    .filter(|u| !pending_only || u.is_pending())
                    .map(|u| u.public_view())
                    .collect()
            })
            .await?;
        Ok(users)
    }

    pub async fn approve_user(&self, id: i64) -> UserResult<UserSummary> {
        let approved = self
            .db
            .transact(|snapshot| -> UserResult<UserSummary> {
                let user = snapshot.user_mut(id).ok_or(UserError::NotFound(id))?;
                if user.role != Role::Employee {
                    return Err(UserError::NotAnEmployee(id));
                }
                user.is_approved = true;
                Ok(user.public_view())
            })
            .await?;
        info!("Approved employee {}", id);
        Ok(approved)
    }

    pub async fn stats(&self) -> UserResult<DashboardStats> {
        let stats = self
            .db
            .read(|snapshot| {
                let count = |role: Role| snapshot.users.iter().filter(|u| u.role == role).count();
                DashboardStats {
                    pending: snapshot.users.iter().filter(|u| u.is_pending()).count(),
                    employees: count(Role::Employee),
                    supervisors: count(Role::Supervisor),
                    cities: snapshot.cities.len(),
                    locations: snapshot.locations.len(),
                    products: snapshot.products.len(),
                }
            })
            .await?;
        Ok(stats)
    }
}
