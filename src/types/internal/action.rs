use std::fmt;

/// Tag attached to every audit-log entry. One variant per security-relevant
/// or mutating operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Login,
    Logout,
    Register,
    UserUpdate,
    UserBlock,
    UserUnblock,
    UserDelete,
    GroupCreate,
    GroupUpdate,
    GroupDelete,
    PermissionCreate,
    PermissionUpdate,
    PermissionDelete,
    PermissionAssign,
    PermissionRemove,
    PasswordRecovery,
}

impl Action {
    /// Wire/storage form of the tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Login => "login",
            Action::Logout => "logout",
            Action::Register => "register",
            Action::UserUpdate => "user_update",
            Action::UserBlock => "user_block",
            Action::UserUnblock => "user_unblock",
            Action::UserDelete => "user_delete",
            Action::GroupCreate => "group_create",
            Action::GroupUpdate => "group_update",
            Action::GroupDelete => "group_delete",
            Action::PermissionCreate => "permission_create",
            Action::PermissionUpdate => "permission_update",
            Action::PermissionDelete => "permission_delete",
            Action::PermissionAssign => "permission_assign",
            Action::PermissionRemove => "permission_remove",
            Action::PasswordRecovery => "password_recovery",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
