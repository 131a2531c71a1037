use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create groups table
        manager
            .create_table(
                Table::create()
                    .table(Groups::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Groups::Id).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(Groups::Name).string().not_null().unique_key())
                    .col(ColumnDef::new(Groups::Description).string())
                    .col(ColumnDef::new(Groups::Color).string().not_null())
                    .col(ColumnDef::new(Groups::IsAdmin).boolean().not_null().default(false))
                    .to_owned(),
            )
            .await?;

        // Create users table
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(Users::Username).string().not_null().unique_key())
                    .col(ColumnDef::new(Users::Email).string().not_null().unique_key())
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Users::FirstName).string().not_null())
                    .col(ColumnDef::new(Users::LastName).string().not_null())
                    .col(ColumnDef::new(Users::AvatarUrl).string())
                    .col(ColumnDef::new(Users::IsActive).boolean().not_null().default(true))
                    .col(ColumnDef::new(Users::IsBlocked).boolean().not_null().default(false))
                    .col(ColumnDef::new(Users::GroupId).integer().not_null())
                    .col(ColumnDef::new(Users::LastLogin).big_integer())
                    .col(ColumnDef::new(Users::CreatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_users_group_id")
                            .from(Users::Table, Users::GroupId)
                            .to(Groups::Table, Groups::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_users_group_id")
                    .table(Users::Table)
                    .col(Users::GroupId)
                    .to_owned(),
            )
            .await?;

        // Create permissions table
        manager
            .create_table(
                Table::create()
                    .table(Permissions::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Permissions::Id).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(Permissions::Name).string().not_null().unique_key())
                    .col(ColumnDef::new(Permissions::Description).string().not_null())
                    .to_owned(),
            )
            .await?;

        // Create group_permissions table with a uniqueness constraint per
        // (group, permission) pair so a grant can exist at most once
        manager
            .create_table(
                Table::create()
                    .table(GroupPermissions::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(GroupPermissions::Id).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(GroupPermissions::GroupId).integer().not_null())
                    .col(ColumnDef::new(GroupPermissions::PermissionId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_group_permissions_group_id")
                            .from(GroupPermissions::Table, GroupPermissions::GroupId)
                            .to(Groups::Table, Groups::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_group_permissions_permission_id")
                            .from(GroupPermissions::Table, GroupPermissions::PermissionId)
                            .to(Permissions::Table, Permissions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_group_permissions_pair")
                    .table(GroupPermissions::Table)
                    .col(GroupPermissions::GroupId)
                    .col(GroupPermissions::PermissionId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Create activities table (append-only audit trail)
        manager
            .create_table(
                Table::create()
                    .table(Activities::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Activities::Id).big_integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(Activities::UserId).integer().not_null())
                    .col(ColumnDef::new(Activities::Action).string().not_null())
                    .col(ColumnDef::new(Activities::Description).string().not_null())
                    .col(ColumnDef::new(Activities::Timestamp).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_activities_user_id")
                    .table(Activities::Table)
                    .col(Activities::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_activities_timestamp")
                    .table(Activities::Table)
                    .col(Activities::Timestamp)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Activities::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(GroupPermissions::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Permissions::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Users::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Groups::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Username,
    Email,
    PasswordHash,
    FirstName,
    LastName,
    AvatarUrl,
    IsActive,
    IsBlocked,
    GroupId,
    LastLogin,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Groups {
    Table,
    Id,
    Name,
    Description,
    Color,
    IsAdmin,
}

#[derive(DeriveIden)]
enum Permissions {
    Table,
    Id,
    Name,
    Description,
}

#[derive(DeriveIden)]
enum GroupPermissions {
    Table,
    Id,
    GroupId,
    PermissionId,
}

#[derive(DeriveIden)]
enum Activities {
    Table,
    Id,
    UserId,
    Action,
    Description,
    Timestamp,
}
