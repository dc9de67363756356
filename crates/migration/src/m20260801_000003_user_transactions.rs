use sea_orm_migration::prelude::*;

use crate::m20260801_000001_users::Users;
use crate::m20260801_000002_transactions::Transactions;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum UserTransactions {
    Table,
    UserId,
    TransactionId,
    CreatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserTransactions::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(UserTransactions::UserId).uuid().not_null())
                    .col(
                        ColumnDef::new(UserTransactions::TransactionId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserTransactions::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .name("pk-user_transactions")
                            .col(UserTransactions::UserId)
                            .col(UserTransactions::TransactionId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-user_transactions-user_id")
                            .from(UserTransactions::Table, UserTransactions::UserId)
                            .to(Users::Table, Users::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-user_transactions-transaction_id")
                            .from(UserTransactions::Table, UserTransactions::TransactionId)
                            .to(Transactions::Table, Transactions::Id),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserTransactions::Table).to_owned())
            .await
    }
}
