use crate::entities::owner_entity;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OwnerResponse {
    pub id: i64,
    pub name: String,
    pub contact_number: Option<String>,
    pub email: Option<String>,
}

impl From<owner_entity::Model> for OwnerResponse {
    fn from(m: owner_entity::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            contact_number: m.contact_number,
            email: m.email,
        }
    }
}
