use crate::entities::{
    notification_entity, owner_entity, parking_session_entity, pass_entity, user_entity,
    vehicle_entity,
};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};

/// In-memory database with the full schema, for service tests.
pub(crate) async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("connect sqlite");
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    let statements = [
        schema.create_table_from_entity(owner_entity::Entity),
        schema.create_table_from_entity(vehicle_entity::Entity),
        schema.create_table_from_entity(pass_entity::Entity),
        schema.create_table_from_entity(parking_session_entity::Entity),
        schema.create_table_from_entity(notification_entity::Entity),
        schema.create_table_from_entity(user_entity::Entity),
    ];
    for statement in statements {
        db.execute(backend.build(&statement))
            .await
            .expect("create table");
    }

    db
}
