use std::sync::Arc;

use poem_openapi::{param::Path, payload::Json, ApiResponse, OpenApi};

use crate::api::{ApiTags, SessionAuth};
use crate::app_data::AppData;
use crate::errors::ApiError;
use crate::stores::directory_store::GroupPatch;
use crate::types::dto::group::{CreateGroupRequest, GroupResponse, UpdateGroupRequest};
use crate::types::dto::permission::{AssignPermissionRequest, GroupPermissionResponse};
use crate::types::internal::Action;

/// Group administration endpoints, including the per-group permission grants
pub struct GroupsApi {
    data: Arc<AppData>,
}

impl GroupsApi {
    pub fn new(data: Arc<AppData>) -> Self {
        Self { data }
    }
}

#[derive(ApiResponse)]
pub enum GroupCreatedResponse {
    #[oai(status = 201)]
    Created(Json<GroupResponse>),
}

#[derive(ApiResponse)]
pub enum GrantCreatedResponse {
    #[oai(status = 201)]
    Created(Json<GroupPermissionResponse>),
}

#[derive(ApiResponse)]
pub enum DeleteGroupResponse {
    #[oai(status = 204)]
    Deleted,
}

#[OpenApi(prefix_path = "/groups")]
impl GroupsApi {
    /// List all groups
    #[oai(path = "/", method = "get", tag = "ApiTags::Groups")]
    pub async fn list(&self, auth: SessionAuth) -> Result<Json<Vec<GroupResponse>>, ApiError> {
        self.data.guard.require_user(&auth.0.key).await?;
        let groups = self.data.directory.list_groups().await?;
        Ok(Json(groups.into_iter().map(Into::into).collect()))
    }

    /// Fetch one group by id
    #[oai(path = "/:id", method = "get", tag = "ApiTags::Groups")]
    pub async fn get(&self, auth: SessionAuth, id: Path<i32>) -> Result<Json<GroupResponse>, ApiError> {
        self.data.guard.require_user(&auth.0.key).await?;
        let group = self
            .data
            .directory
            .get_group(id.0)
            .await?
            .ok_or_else(|| ApiError::not_found("Group not found"))?;
        Ok(Json(group.into()))
    }

    /// Create a group. Groups created here are never admin groups.
    #[oai(path = "/", method = "post", tag = "ApiTags::Groups")]
    pub async fn create(
        &self,
        auth: SessionAuth,
        body: Json<CreateGroupRequest>,
    ) -> Result<GroupCreatedResponse, ApiError> {
        let actor = self.data.guard.require_admin(&auth.0.key).await?;

        let body = body.0;
        let group = self
            .data
            .directory
            .create_group(&body.name, body.description, &body.color, false)
            .await?;

        self.data
            .audit
            .log(
                actor.id,
                Action::GroupCreate,
                format!("Created group {}", group.name),
            )
            .await;

        Ok(GroupCreatedResponse::Created(Json(group.into())))
    }

    /// Update a group
    #[oai(path = "/:id", method = "patch", tag = "ApiTags::Groups")]
    pub async fn update(
        &self,
        auth: SessionAuth,
        id: Path<i32>,
        body: Json<UpdateGroupRequest>,
    ) -> Result<Json<GroupResponse>, ApiError> {
        let actor = self.data.guard.require_admin(&auth.0.key).await?;

        let body = body.0;
        let group = self
            .data
            .directory
            .update_group(
                id.0,
                GroupPatch {
                    name: body.name,
                    description: body.description.map(|text| (!text.is_empty()).then_some(text)),
                    color: body.color,
                },
            )
            .await?;

        self.data
            .audit
            .log(
                actor.id,
                Action::GroupUpdate,
                format!("Updated group {}", group.name),
            )
            .await;

        Ok(Json(group.into()))
    }

    /// Delete a group. Refused for admin groups and for groups that still
    /// have members; the latter reports the member count.
    #[oai(path = "/:id", method = "delete", tag = "ApiTags::Groups")]
    pub async fn delete(&self, auth: SessionAuth, id: Path<i32>) -> Result<DeleteGroupResponse, ApiError> {
        let actor = self.data.guard.require_admin(&auth.0.key).await?;

        let group = self
            .data
            .directory
            .get_group(id.0)
            .await?
            .ok_or_else(|| ApiError::not_found("Group not found"))?;
        self.data.directory.delete_group(id.0).await?;

        self.data
            .audit
            .log(
                actor.id,
                Action::GroupDelete,
                format!("Deleted group {}", group.name),
            )
            .await;

        Ok(DeleteGroupResponse::Deleted)
    }

    /// List the permissions granted to a group
    #[oai(path = "/:id/permissions", method = "get", tag = "ApiTags::Groups")]
    pub async fn list_permissions(
        &self,
        auth: SessionAuth,
        id: Path<i32>,
    ) -> Result<Json<Vec<GroupPermissionResponse>>, ApiError> {
        self.data.guard.require_user(&auth.0.key).await?;

        if self.data.directory.get_group(id.0).await?.is_none() {
            return Err(ApiError::not_found("Group not found"));
        }

        let grants = self.data.directory.list_group_permissions(id.0).await?;
        Ok(Json(grants.into_iter().map(Into::into).collect()))
    }

    /// Grant a permission to a group
    #[oai(path = "/:id/permissions", method = "post", tag = "ApiTags::Groups")]
    pub async fn assign_permission(
        &self,
        auth: SessionAuth,
        id: Path<i32>,
        body: Json<AssignPermissionRequest>,
    ) -> Result<GrantCreatedResponse, ApiError> {
        let actor = self.data.guard.require_admin(&auth.0.key).await?;

        let group = self
            .data
            .directory
            .get_group(id.0)
            .await?
            .ok_or_else(|| ApiError::not_found("Group not found"))?;
        let permission = self
            .data
            .directory
            .get_permission(body.permission_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Permission not found"))?;

        let grant = self
            .data
            .directory
            .assign_permission(group.id, permission.id)
            .await?;

        self.data
            .audit
            .log(
                actor.id,
                Action::PermissionAssign,
                format!("Granted {} to group {}", permission.name, group.name),
            )
            .await;

        Ok(GrantCreatedResponse::Created(Json(grant.into())))
    }

    /// Revoke a permission from a group
    #[oai(
        path = "/:id/permissions/:permission_id",
        method = "delete",
        tag = "ApiTags::Groups"
    )]
    pub async fn remove_permission(
        &self,
        auth: SessionAuth,
        id: Path<i32>,
        permission_id: Path<i32>,
    ) -> Result<DeleteGroupResponse, ApiError> {
        let actor = self.data.guard.require_admin(&auth.0.key).await?;

        self.data
            .directory
            .remove_permission(id.0, permission_id.0)
            .await?;

        self.data
            .audit
            .log(
                actor.id,
                Action::PermissionRemove,
                format!("Revoked permission {} from group {}", permission_id.0, id.0),
            )
            .await;

        Ok(DeleteGroupResponse::Deleted)
    }
}
