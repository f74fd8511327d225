use crate::core::security;
use crate::core::state::AppState;
use crate::db::types::Role;
use crate::repositories;
use crate::repositories::accounts::AccountFields;

/// Seeds the first admin from `FIRST_ADMIN_EMAIL`/`FIRST_ADMIN_PASSWORD` and
/// resets its password when the configured one no longer verifies.
pub(crate) async fn ensure_first_admin(state: &AppState) -> anyhow::Result<()> {
    let admin = state.settings().admin();
    if admin.first_admin_email.is_empty() || admin.first_admin_password.is_empty() {
        tracing::warn!("FIRST_ADMIN_EMAIL or FIRST_ADMIN_PASSWORD not configured; skipping");
        return Ok(());
    }

    let email = admin.first_admin_email.trim();
    let existing = repositories::accounts::find_by_email(state.db(), Role::Admin, email).await?;

    if let Some(account) = existing {
        let verified =
            security::verify_password(&admin.first_admin_password, &account.hashed_password)
                .unwrap_or(false);
        if verified {
            tracing::info!("First admin already up to date");
            return Ok(());
        }

        let hashed_password = security::hash_password(&admin.first_admin_password)?;
        repositories::accounts::set_password(state.db(), Role::Admin, account.id, &hashed_password)
            .await?;
        tracing::info!(admin_id = account.id, "Reset first admin password");
        return Ok(());
    }

    let hashed_password = security::hash_password(&admin.first_admin_password)?;
    let account = repositories::accounts::create(
        state.db(),
        Role::Admin,
        AccountFields {
            f_name: "First",
            m_name: None,
            l_name: "Admin",
            email,
            phone: "0000000000",
            dob: None,
            age: None,
            hashed_password,
        },
    )
    .await?;

    tracing::info!(admin_id = account.id, "Created first admin");
    Ok(())
}
