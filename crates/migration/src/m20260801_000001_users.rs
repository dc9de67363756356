use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
pub enum Users {
    Table,
    Id,
    Email,
    Password,
    Name,
    Image,
    Providers,
    DefaultCurrency,
    PreferredDateFormat,
    CustomName,
    PreferredTheme,
    Language,
    NotifyPush,
    NotifyEmail,
    NotifyBudgetAlerts,
    BudgetMonthlyLimit,
    DataRetention,
    CreatedAt,
    UpdatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Users::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::Password).string())
                    .col(ColumnDef::new(Users::Name).string())
                    .col(ColumnDef::new(Users::Image).string())
                    .col(ColumnDef::new(Users::Providers).json().not_null())
                    // Preference columns stay nullable: an unset column
                    // means "use the documented default".
                    .col(ColumnDef::new(Users::DefaultCurrency).string())
                    .col(ColumnDef::new(Users::PreferredDateFormat).string())
                    .col(ColumnDef::new(Users::CustomName).string())
                    .col(ColumnDef::new(Users::PreferredTheme).string())
                    .col(ColumnDef::new(Users::Language).string())
                    .col(ColumnDef::new(Users::NotifyPush).boolean())
                    .col(ColumnDef::new(Users::NotifyEmail).boolean())
                    .col(ColumnDef::new(Users::NotifyBudgetAlerts).boolean())
                    .col(ColumnDef::new(Users::BudgetMonthlyLimit).decimal_len(16, 2))
                    .col(ColumnDef::new(Users::DataRetention).string())
                    .col(ColumnDef::new(Users::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Users::UpdatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await
    }
}
