use sea_orm_migration::prelude::*;

use super::m20251020_000001_create_account_tables::UserAccounts;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(BoardSeats::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BoardSeats::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(BoardSeats::Name)
                            .string_len(50)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(BoardSeats::VoteWeight)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MemberProfiles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MemberProfiles::UserId)
                            .integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(MemberProfiles::FullName)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MemberProfiles::CandidacyName)
                            .string_len(100)
                            .null(),
                    )
                    .col(ColumnDef::new(MemberProfiles::Party).string_len(10).null())
                    .col(
                        ColumnDef::new(MemberProfiles::PhotoUrl)
                            .string_len(512)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(MemberProfiles::InaugurationDocumentUrl)
                            .string_len(512)
                            .null(),
                    )
                    .col(ColumnDef::new(MemberProfiles::BoardSeatId).integer().null())
                    .col(
                        ColumnDef::new(MemberProfiles::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(MemberProfiles::AbsentThisSession)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_member_profiles_account")
                            .from(MemberProfiles::Table, MemberProfiles::UserId)
                            .to(UserAccounts::Table, UserAccounts::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_member_profiles_board_seat")
                            .from(MemberProfiles::Table, MemberProfiles::BoardSeatId)
                            .to(BoardSeats::Table, BoardSeats::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_member_profiles_full_name")
                    .table(MemberProfiles::Table)
                    .col(MemberProfiles::FullName)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MemberProfiles::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(BoardSeats::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum BoardSeats {
    Table,
    Id,
    Name,
    VoteWeight,
}

#[derive(DeriveIden)]
enum MemberProfiles {
    Table,
    UserId,
    FullName,
    CandidacyName,
    Party,
    PhotoUrl,
    InaugurationDocumentUrl,
    BoardSeatId,
    Active,
    AbsentThisSession,
}
