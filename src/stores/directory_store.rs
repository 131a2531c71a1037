use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};

use crate::errors::StoreError;
use crate::types::db::group::{self, Entity as Group};
use crate::types::db::group_permission::{self, Entity as GroupPermission};
use crate::types::db::permission::{self, Entity as Permission};
use crate::types::db::user::{self, Entity as User};

/// Partial update of a group. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct GroupPatch {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub color: Option<String>,
}

/// Partial update of a permission.
#[derive(Debug, Clone, Default)]
pub struct PermissionPatch {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Repository for groups, permissions, and group-permission grants.
///
/// Deletion invariants live here, at the store boundary: admin groups are
/// never deletable, and a group with member users cannot be removed.
pub struct DirectoryStore {
    db: DatabaseConnection,
}

impl DirectoryStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    // --- Groups ---

    pub async fn get_group(&self, id: i32) -> Result<Option<group::Model>, StoreError> {
        Ok(Group::find_by_id(id).one(&self.db).await?)
    }

    pub async fn find_group_by_name(&self, name: &str) -> Result<Option<group::Model>, StoreError> {
        Ok(Group::find()
            .filter(group::Column::Name.eq(name))
            .one(&self.db)
            .await?)
    }

    pub async fn list_groups(&self) -> Result<Vec<group::Model>, StoreError> {
        Ok(Group::find().order_by_asc(group::Column::Id).all(&self.db).await?)
    }

    pub async fn create_group(
        &self,
        name: &str,
        description: Option<String>,
        color: &str,
        is_admin: bool,
    ) -> Result<group::Model, StoreError> {
        if self.find_group_by_name(name).await?.is_some() {
            return Err(StoreError::conflict("Group name already exists"));
        }

        let model = group::ActiveModel {
            id: sea_orm::ActiveValue::NotSet,
            name: Set(name.to_string()),
            description: Set(description),
            color: Set(color.to_string()),
            is_admin: Set(is_admin),
        };

        model.insert(&self.db).await.map_err(|e| {
            if e.to_string().contains("UNIQUE") {
                StoreError::conflict("Group name already exists")
            } else {
                StoreError::Database(e)
            }
        })
    }

    pub async fn update_group(&self, id: i32, patch: GroupPatch) -> Result<group::Model, StoreError> {
        let existing = self
            .get_group(id)
            .await?
            .ok_or(StoreError::NotFound("group"))?;

        if let Some(name) = &patch.name {
            if let Some(other) = self.find_group_by_name(name).await? {
                if other.id != id {
                    return Err(StoreError::conflict("Group name already exists"));
                }
            }
        }

        let mut model = existing.into_active_model();
        if let Some(name) = patch.name {
            model.name = Set(name);
        }
        if let Some(description) = patch.description {
            model.description = Set(description);
        }
        if let Some(color) = patch.color {
            model.color = Set(color);
        }

        Ok(model.update(&self.db).await?)
    }

    /// Remove a group.
    ///
    /// # Errors
    /// - `GroupReserved` for admin groups, regardless of membership
    /// - `GroupNotEmpty` when any user still references the group; the
    ///   surviving member count is reported
    pub async fn delete_group(&self, id: i32) -> Result<(), StoreError> {
        let group = self
            .get_group(id)
            .await?
            .ok_or(StoreError::NotFound("group"))?;

        if group.is_admin {
            return Err(StoreError::GroupReserved);
        }

        let members = User::find()
            .filter(user::Column::GroupId.eq(id))
            .count(&self.db)
            .await?;
        if members > 0 {
            return Err(StoreError::GroupNotEmpty { members });
        }

        Group::delete_by_id(id).exec(&self.db).await?;
        Ok(())
    }

    // --- Permissions ---

    pub async fn get_permission(&self, id: i32) -> Result<Option<permission::Model>, StoreError> {
        Ok(Permission::find_by_id(id).one(&self.db).await?)
    }

    pub async fn list_permissions(&self) -> Result<Vec<permission::Model>, StoreError> {
        Ok(Permission::find()
            .order_by_asc(permission::Column::Id)
            .all(&self.db)
            .await?)
    }

    pub async fn create_permission(
        &self,
        name: &str,
        description: &str,
    ) -> Result<permission::Model, StoreError> {
        let existing = Permission::find()
            .filter(permission::Column::Name.eq(name))
            .one(&self.db)
            .await?;
        if existing.is_some() {
            return Err(StoreError::conflict("Permission name already exists"));
        }

        let model = permission::ActiveModel {
            id: sea_orm::ActiveValue::NotSet,
            name: Set(name.to_string()),
            description: Set(description.to_string()),
        };

        model.insert(&self.db).await.map_err(|e| {
            if e.to_string().contains("UNIQUE") {
                StoreError::conflict("Permission name already exists")
            } else {
                StoreError::Database(e)
            }
        })
    }

    pub async fn update_permission(
        &self,
        id: i32,
        patch: PermissionPatch,
    ) -> Result<permission::Model, StoreError> {
        let existing = self
            .get_permission(id)
            .await?
            .ok_or(StoreError::NotFound("permission"))?;

        let mut model = existing.into_active_model();
        if let Some(name) = patch.name {
            model.name = Set(name);
        }
        if let Some(description) = patch.description {
            model.description = Set(description);
        }

        model.update(&self.db).await.map_err(|e| {
            if e.to_string().contains("UNIQUE") {
                StoreError::conflict("Permission name already exists")
            } else {
                StoreError::Database(e)
            }
        })
    }

    pub async fn delete_permission(&self, id: i32) -> Result<(), StoreError> {
        let result = Permission::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(StoreError::NotFound("permission"));
        }
        Ok(())
    }

    // --- Group-permission grants ---

    pub async fn list_group_permissions(
        &self,
        group_id: i32,
    ) -> Result<Vec<group_permission::Model>, StoreError> {
        Ok(GroupPermission::find()
            .filter(group_permission::Column::GroupId.eq(group_id))
            .order_by_asc(group_permission::Column::Id)
            .all(&self.db)
            .await?)
    }

    /// Grant a permission to a group. At most one grant may exist per
    /// (group, permission) pair; the unique index backstops the check.
    pub async fn assign_permission(
        &self,
        group_id: i32,
        permission_id: i32,
    ) -> Result<group_permission::Model, StoreError> {
        let existing = GroupPermission::find()
            .filter(group_permission::Column::GroupId.eq(group_id))
            .filter(group_permission::Column::PermissionId.eq(permission_id))
            .one(&self.db)
            .await?;
        if existing.is_some() {
            return Err(StoreError::conflict("Permission already granted to group"));
        }

        let model = group_permission::ActiveModel {
            id: sea_orm::ActiveValue::NotSet,
            group_id: Set(group_id),
            permission_id: Set(permission_id),
        };

        model.insert(&self.db).await.map_err(|e| {
            if e.to_string().contains("UNIQUE") {
                StoreError::conflict("Permission already granted to group")
            } else {
                StoreError::Database(e)
            }
        })
    }

    pub async fn remove_permission(
        &self,
        group_id: i32,
        permission_id: i32,
    ) -> Result<(), StoreError> {
        let result = GroupPermission::delete_many()
            .filter(group_permission::Column::GroupId.eq(group_id))
            .filter(group_permission::Column::PermissionId.eq(permission_id))
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(StoreError::NotFound("grant"));
        }
        Ok(())
    }
}

impl std::fmt::Debug for DirectoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectoryStore")
            .field("db", &"<connection>")
            .finish()
    }
}
