use std::sync::Arc;

use tracing::{debug, warn};

use shared_database::SupabaseClient;
use shared_models::auth::{AdminRole, AdminUser, User, UserRecord};
use shared_models::error::AppError;

/// Confirms that an authenticated caller may use the admin console.
pub struct AdminAuthService {
    supabase: Arc<SupabaseClient>,
}

impl AdminAuthService {
    pub fn new(supabase: Arc<SupabaseClient>) -> Self {
        Self { supabase }
    }

    /// Requires an active `users` row with the admin or support role.
    pub async fn require_admin(&self, user: &User) -> Result<AdminUser, AppError> {
        let path = format!(
            "/rest/v1/users?id=eq.{}&select=id,email,role,account_status",
            user.id
        );

        let record: Option<UserRecord> = self.supabase.select_one(&path).await.map_err(|e| {
            warn!(user_id = %user.id, "Admin lookup failed: {}", e);
            AppError::Forbidden("Unauthorized: User not found".to_string())
        })?;

        let record = record.ok_or_else(|| {
            debug!(user_id = %user.id, "No users row for caller");
            AppError::Forbidden("Unauthorized: User not found".to_string())
        })?;

        let account_status = record.account_status.as_deref().unwrap_or("unknown");
        if account_status != "active" {
            return Err(AppError::Forbidden(format!(
                "Unauthorized: Account is {}",
                account_status
            )));
        }

        let role = record
            .role
            .as_deref()
            .and_then(AdminRole::parse)
            .ok_or_else(|| AppError::Forbidden("Forbidden: Admin or support role required".to_string()))?;

        Ok(AdminUser {
            id: record.id,
            email: record.email,
            role,
        })
    }
}
