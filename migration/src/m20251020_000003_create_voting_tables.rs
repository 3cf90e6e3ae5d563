use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_query::Expr;

use super::m20251020_000001_create_account_tables::UserAccounts;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Bills::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Bills::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Bills::Title).string_len(255).not_null())
                    .col(ColumnDef::new(Bills::Author).string_len(255).null())
                    .col(
                        ColumnDef::new(Bills::Kind)
                            .string_len(16)
                            .not_null()
                            .default("ordinary"),
                    )
                    .col(ColumnDef::new(Bills::Description).text().not_null())
                    .col(
                        ColumnDef::new(Bills::Status)
                            .string_len(20)
                            .not_null()
                            .default("preparation"),
                    )
                    .col(
                        ColumnDef::new(Bills::QuorumKind)
                            .string_len(20)
                            .not_null()
                            .default("simple_majority"),
                    )
                    .col(
                        ColumnDef::new(Bills::TimeLimitSeconds)
                            .integer()
                            .not_null()
                            .default(60),
                    )
                    .col(
                        ColumnDef::new(Bills::OpenedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(Bills::FinalResult).string_len(16).null())
                    .col(
                        ColumnDef::new(Bills::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_bills_status")
                    .table(Bills::Table)
                    .col(Bills::Status)
                    .to_owned(),
            )
            .await?;

        // Composite key: one vote per (bill, member)
        manager
            .create_table(
                Table::create()
                    .table(Votes::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Votes::BillId).integer().not_null())
                    .col(ColumnDef::new(Votes::UserId).integer().not_null())
                    .col(ColumnDef::new(Votes::Choice).string_len(10).not_null())
                    .col(
                        ColumnDef::new(Votes::CastAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .name("pk_votes")
                            .col(Votes::BillId)
                            .col(Votes::UserId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_votes_bill")
                            .from(Votes::Table, Votes::BillId)
                            .to(Bills::Table, Bills::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_votes_account")
                            .from(Votes::Table, Votes::UserId)
                            .to(UserAccounts::Table, UserAccounts::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Votes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Bills::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Bills {
    Table,
    Id,
    Title,
    Author,
    Kind,
    Description,
    Status,
    QuorumKind,
    TimeLimitSeconds,
    OpenedAt,
    FinalResult,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Votes {
    Table,
    BillId,
    UserId,
    Choice,
    CastAt,
}
