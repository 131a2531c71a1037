use std::sync::Arc;

use crate::errors::StoreError;
use crate::services::crypto;
use crate::stores::credential_store::NewUser;
use crate::stores::{CredentialStore, DirectoryStore};

const DEFAULT_GROUPS: &[(&str, &str, &str, bool)] = &[
    ("Administrators", "Full access to the console", "#EF4444", true),
    ("Marketing", "Marketing team", "#3B82F6", false),
    ("Development", "Engineering team", "#8B5CF6", false),
    ("Finance", "Finance team", "#10B981", false),
];

const DEFAULT_PERMISSIONS: &[(&str, &str)] = &[
    ("user_create", "Create user accounts"),
    ("user_edit", "Edit user accounts"),
    ("user_delete", "Delete user accounts"),
    ("user_block", "Block and unblock user accounts"),
    ("group_manage", "Create, edit and delete groups"),
    ("permission_manage", "Create, edit and assign permissions"),
];

const ADMIN_USERNAME: &str = "admin";

/// Seed the directory with the default groups, permissions, and the initial
/// administrator account. Safe to run on every startup: existing rows are
/// left alone and only the gaps are filled.
pub async fn seed(
    directory: &Arc<DirectoryStore>,
    users: &Arc<CredentialStore>,
    admin_password: Option<&str>,
) -> Result<(), StoreError> {
    for (name, description, color, is_admin) in DEFAULT_GROUPS {
        if directory.find_group_by_name(name).await?.is_none() {
            directory
                .create_group(name, Some(description.to_string()), color, *is_admin)
                .await?;
            tracing::info!(group = name, "Seeded default group");
        }
    }

    let existing: Vec<String> = directory
        .list_permissions()
        .await?
        .into_iter()
        .map(|p| p.name)
        .collect();
    for (name, description) in DEFAULT_PERMISSIONS {
        if !existing.iter().any(|n| n == name) {
            directory.create_permission(name, description).await?;
            tracing::info!(permission = name, "Seeded default permission");
        }
    }

    // The admin group holds every permission. Duplicate grants are refused
    // by the store, which is exactly the idempotence we want here.
    let admins = directory
        .find_group_by_name("Administrators")
        .await?
        .ok_or(StoreError::NotFound("group"))?;
    for permission in directory.list_permissions().await? {
        match directory.assign_permission(admins.id, permission.id).await {
            Ok(_) | Err(StoreError::Conflict(_)) => {}
            Err(e) => return Err(e),
        }
    }

    if users.find_by_username(ADMIN_USERNAME).await?.is_none() {
        let generated;
        let password = match admin_password {
            Some(configured) => configured,
            None => {
                generated = crypto::generate_secure_password();
                tracing::warn!(
                    username = ADMIN_USERNAME,
                    password = %generated,
                    "Generated initial administrator password; change it after first login"
                );
                &generated
            }
        };

        users
            .create_user(NewUser {
                username: ADMIN_USERNAME.to_string(),
                email: "admin@example.com".to_string(),
                password_hash: crypto::hash_password(password)?,
                first_name: "System".to_string(),
                last_name: "Administrator".to_string(),
                avatar_url: None,
                group_id: admins.id,
            })
            .await?;
        tracing::info!(username = ADMIN_USERNAME, "Seeded initial administrator account");
    }

    Ok(())
}
