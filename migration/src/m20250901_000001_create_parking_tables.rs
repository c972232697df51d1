use sea_orm_migration::prelude::extension::postgres::Type;
use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum Owners {
    Table,
    Id,
    Name,
    ContactNumber,
    Email,
}

#[derive(DeriveIden)]
enum Vehicles {
    Table,
    Id,
    OwnerId,
    PlateNumber,
    VehicleType,
}

#[derive(DeriveIden)]
enum Passes {
    Table,
    Id,
    VehicleId,
    PassType,
    IssuedAt,
    ExpiresAt,
    IsActive,
}

#[derive(DeriveIden)]
enum ParkingSessions {
    Table,
    Id,
    VehicleId,
    EntryTime,
    ExitTime,
    Fee,
    Status,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // enums
        manager
            .create_type(
                Type::create()
                    .as_enum(Alias::new("vehicle_type"))
                    .values(vec![
                        Alias::new("car"),
                        Alias::new("bike"),
                        Alias::new("truck"),
                        Alias::new("other"),
                    ])
                    .to_owned(),
            )
            .await?;
        manager
            .create_type(
                Type::create()
                    .as_enum(Alias::new("pass_type"))
                    .values(vec![
                        Alias::new("daily"),
                        Alias::new("weekly"),
                        Alias::new("monthly"),
                        Alias::new("yearly"),
                    ])
                    .to_owned(),
            )
            .await?;
        manager
            .create_type(
                Type::create()
                    .as_enum(Alias::new("parking_session_status"))
                    .values(vec![Alias::new("parked"), Alias::new("exited")])
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Owners::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Owners::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Owners::Name).string_len(100).not_null())
                    .col(ColumnDef::new(Owners::ContactNumber).string_len(15).null())
                    .col(ColumnDef::new(Owners::Email).string_len(255).null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Vehicles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Vehicles::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Vehicles::OwnerId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Vehicles::PlateNumber)
                            .string_len(20)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Vehicles::VehicleType)
                            .custom(Alias::new("vehicle_type"))
                            .not_null()
                            .default(Expr::cust("'car'::vehicle_type")),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_vehicles_owner")
                            .from(Vehicles::Table, Vehicles::OwnerId)
                            .to(Owners::Table, Owners::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Passes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Passes::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Passes::VehicleId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Passes::PassType)
                            .custom(Alias::new("pass_type"))
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Passes::IssuedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Passes::ExpiresAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Passes::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_passes_vehicle")
                            .from(Passes::Table, Passes::VehicleId)
                            .to(Vehicles::Table, Vehicles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ParkingSessions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ParkingSessions::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ParkingSessions::VehicleId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ParkingSessions::EntryTime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ParkingSessions::ExitTime)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(ParkingSessions::Fee).double().null())
                    .col(
                        ColumnDef::new(ParkingSessions::Status)
                            .custom(Alias::new("parking_session_status"))
                            .not_null()
                            .default(Expr::cust("'parked'::parking_session_status")),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_parking_sessions_vehicle")
                            .from(ParkingSessions::Table, ParkingSessions::VehicleId)
                            .to(Vehicles::Table, Vehicles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_owners_name")
                    .table(Owners::Table)
                    .col(Owners::Name)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_vehicles_owner")
                    .table(Vehicles::Table)
                    .col(Vehicles::OwnerId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_passes_vehicle")
                    .table(Passes::Table)
                    .col(Passes::VehicleId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_passes_active_expiry")
                    .table(Passes::Table)
                    .col(Passes::IsActive)
                    .col(Passes::ExpiresAt)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_parking_sessions_vehicle")
                    .table(ParkingSessions::Table)
                    .col(ParkingSessions::VehicleId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_parking_sessions_entry")
                    .table(ParkingSessions::Table)
                    .col(ParkingSessions::EntryTime)
                    .to_owned(),
            )
            .await?;

        // At most one open session per vehicle, enforced at the database.
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX IF NOT EXISTS uq_parking_sessions_open_vehicle \
                 ON parking_sessions (vehicle_id) WHERE exit_time IS NULL",
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .if_exists()
                    .table(ParkingSessions::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().if_exists().table(Passes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().if_exists().table(Vehicles::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().if_exists().table(Owners::Table).to_owned())
            .await?;
        manager
            .drop_type(
                Type::drop()
                    .name(Alias::new("parking_session_status"))
                    .to_owned(),
            )
            .await?;
        manager
            .drop_type(Type::drop().name(Alias::new("pass_type")).to_owned())
            .await?;
        manager
            .drop_type(Type::drop().name(Alias::new("vehicle_type")).to_owned())
            .await?;
        Ok(())
    }
}
