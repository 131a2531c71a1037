use std::sync::Arc;

use poem_openapi::{param::Path, payload::Json, ApiResponse, OpenApi};

use crate::api::{ApiTags, SessionAuth};
use crate::app_data::AppData;
use crate::errors::ApiError;
use crate::stores::directory_store::PermissionPatch;
use crate::types::dto::permission::{
    CreatePermissionRequest, PermissionResponse, UpdatePermissionRequest,
};
use crate::types::internal::Action;

/// Permission administration endpoints
pub struct PermissionsApi {
    data: Arc<AppData>,
}

impl PermissionsApi {
    pub fn new(data: Arc<AppData>) -> Self {
        Self { data }
    }
}

#[derive(ApiResponse)]
pub enum PermissionCreatedResponse {
    #[oai(status = 201)]
    Created(Json<PermissionResponse>),
}

#[derive(ApiResponse)]
pub enum DeletePermissionResponse {
    /// Permission removed; its grants cascade away
    #[oai(status = 204)]
    Deleted,
}

#[OpenApi(prefix_path = "/permissions")]
impl PermissionsApi {
    /// List all permissions
    #[oai(path = "/", method = "get", tag = "ApiTags::Permissions")]
    pub async fn list(&self, auth: SessionAuth) -> Result<Json<Vec<PermissionResponse>>, ApiError> {
        self.data.guard.require_user(&auth.0.key).await?;
        let permissions = self.data.directory.list_permissions().await?;
        Ok(Json(permissions.into_iter().map(Into::into).collect()))
    }

    /// Create a permission
    #[oai(path = "/", method = "post", tag = "ApiTags::Permissions")]
    pub async fn create(
        &self,
        auth: SessionAuth,
        body: Json<CreatePermissionRequest>,
    ) -> Result<PermissionCreatedResponse, ApiError> {
        let actor = self.data.guard.require_admin(&auth.0.key).await?;

        let permission = self
            .data
            .directory
            .create_permission(&body.name, &body.description)
            .await?;

        self.data
            .audit
            .log(
                actor.id,
                Action::PermissionCreate,
                format!("Created permission {}", permission.name),
            )
            .await;

        Ok(PermissionCreatedResponse::Created(Json(permission.into())))
    }

    /// Update a permission
    #[oai(path = "/:id", method = "patch", tag = "ApiTags::Permissions")]
    pub async fn update(
        &self,
        auth: SessionAuth,
        id: Path<i32>,
        body: Json<UpdatePermissionRequest>,
    ) -> Result<Json<PermissionResponse>, ApiError> {
        let actor = self.data.guard.require_admin(&auth.0.key).await?;

        let body = body.0;
        let permission = self
            .data
            .directory
            .update_permission(
                id.0,
                PermissionPatch {
                    name: body.name,
                    description: body.description,
                },
            )
            .await?;

        self.data
            .audit
            .log(
                actor.id,
                Action::PermissionUpdate,
                format!("Updated permission {}", permission.name),
            )
            .await;

        Ok(Json(permission.into()))
    }

    /// Delete a permission
    #[oai(path = "/:id", method = "delete", tag = "ApiTags::Permissions")]
    pub async fn delete(
        &self,
        auth: SessionAuth,
        id: Path<i32>,
    ) -> Result<DeletePermissionResponse, ApiError> {
        let actor = self.data.guard.require_admin(&auth.0.key).await?;

        let permission = self
            .data
            .directory
            .get_permission(id.0)
            .await?
            .ok_or_else(|| ApiError::not_found("Permission not found"))?;
        self.data.directory.delete_permission(id.0).await?;

        self.data
            .audit
            .log(
                actor.id,
                Action::PermissionDelete,
                format!("Deleted permission {}", permission.name),
            )
            .await;

        Ok(DeletePermissionResponse::Deleted)
    }
}
