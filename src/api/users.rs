use std::sync::Arc;

use poem_openapi::{param::Path, payload::Json, ApiResponse, OpenApi};

use crate::api::{is_valid_email, ApiTags, SessionAuth};
use crate::app_data::AppData;
use crate::errors::ApiError;
use crate::stores::credential_store::UserPatch;
use crate::types::dto::user::{UpdateUserRequest, UserResponse};
use crate::types::internal::Action;

/// User administration endpoints
pub struct UsersApi {
    data: Arc<AppData>,
}

impl UsersApi {
    pub fn new(data: Arc<AppData>) -> Self {
        Self { data }
    }
}

#[derive(ApiResponse)]
pub enum DeleteUserResponse {
    /// User removed; their sessions are gone with them
    #[oai(status = 204)]
    Deleted,
}

#[OpenApi(prefix_path = "/users")]
impl UsersApi {
    /// List all users
    #[oai(path = "/", method = "get", tag = "ApiTags::Users")]
    pub async fn list(&self, auth: SessionAuth) -> Result<Json<Vec<UserResponse>>, ApiError> {
        self.data.guard.require_user(&auth.0.key).await?;
        let users = self.data.users.list_users().await?;
        Ok(Json(users.into_iter().map(Into::into).collect()))
    }

    /// Fetch one user by id
    #[oai(path = "/:id", method = "get", tag = "ApiTags::Users")]
    pub async fn get(&self, auth: SessionAuth, id: Path<i32>) -> Result<Json<UserResponse>, ApiError> {
        self.data.guard.require_user(&auth.0.key).await?;
        let user = self
            .data
            .users
            .get_user(id.0)
            .await?
            .ok_or_else(|| ApiError::not_found("User not found"))?;
        Ok(Json(user.into()))
    }

    /// Update a user.
    ///
    /// Users may edit their own name, email, and avatar. `is_active` and
    /// `group_id` require the administrator role, as does editing anyone
    /// else's record.
    #[oai(path = "/:id", method = "patch", tag = "ApiTags::Users")]
    pub async fn update(
        &self,
        auth: SessionAuth,
        id: Path<i32>,
        body: Json<UpdateUserRequest>,
    ) -> Result<Json<UserResponse>, ApiError> {
        let actor = self.data.guard.require_user(&auth.0.key).await?;
        let actor_is_admin = self.data.guard.is_admin(&actor).await?;

        if actor.id != id.0 && !actor_is_admin {
            return Err(ApiError::forbidden("Cannot edit another user's record"));
        }
        if !actor_is_admin && (body.is_active.is_some() || body.group_id.is_some()) {
            return Err(ApiError::forbidden(
                "Changing is_active or group_id requires the administrator role",
            ));
        }
        if let Some(group_id) = body.group_id {
            if self.data.directory.get_group(group_id).await?.is_none() {
                return Err(ApiError::validation("Target group does not exist"));
            }
        }
        if let Some(email) = &body.email {
            if !is_valid_email(email) {
                return Err(ApiError::validation("Email address is not valid"));
            }
        }

        let body = body.0;
        let user = self
            .data
            .users
            .update_user(
                id.0,
                UserPatch {
                    first_name: body.first_name,
                    last_name: body.last_name,
                    email: body.email,
                    avatar_url: body.avatar_url.map(|url| (!url.is_empty()).then_some(url)),
                    is_active: body.is_active,
                    group_id: body.group_id,
                },
            )
            .await?;

        self.data
            .audit
            .log(
                actor.id,
                Action::UserUpdate,
                format!("Updated user {}", user.username),
            )
            .await;

        Ok(Json(user.into()))
    }

    /// Block a user from logging in
    #[oai(path = "/:id/block", method = "post", tag = "ApiTags::Users")]
    pub async fn block(&self, auth: SessionAuth, id: Path<i32>) -> Result<Json<UserResponse>, ApiError> {
        let actor = self.data.guard.require_admin(&auth.0.key).await?;
        if actor.id == id.0 {
            return Err(ApiError::forbidden("Cannot block your own account"));
        }

        let user = self.data.users.block_user(id.0).await?;

        self.data
            .audit
            .log(
                actor.id,
                Action::UserBlock,
                format!("Blocked user {}", user.username),
            )
            .await;

        Ok(Json(user.into()))
    }

    /// Lift a block
    #[oai(path = "/:id/unblock", method = "post", tag = "ApiTags::Users")]
    pub async fn unblock(
        &self,
        auth: SessionAuth,
        id: Path<i32>,
    ) -> Result<Json<UserResponse>, ApiError> {
        let actor = self.data.guard.require_admin(&auth.0.key).await?;

        let user = self.data.users.unblock_user(id.0).await?;

        self.data
            .audit
            .log(
                actor.id,
                Action::UserUnblock,
                format!("Unblocked user {}", user.username),
            )
            .await;

        Ok(Json(user.into()))
    }

    /// Delete a user
    #[oai(path = "/:id", method = "delete", tag = "ApiTags::Users")]
    pub async fn delete(&self, auth: SessionAuth, id: Path<i32>) -> Result<DeleteUserResponse, ApiError> {
        let actor = self.data.guard.require_admin(&auth.0.key).await?;
        if actor.id == id.0 {
            return Err(ApiError::forbidden("Cannot delete your own account"));
        }

        let user = self
            .data
            .users
            .get_user(id.0)
            .await?
            .ok_or_else(|| ApiError::not_found("User not found"))?;
        self.data.users.delete_user(id.0).await?;

        self.data
            .audit
            .log(
                actor.id,
                Action::UserDelete,
                format!("Deleted user {}", user.username),
            )
            .await;

        Ok(DeleteUserResponse::Deleted)
    }
}
