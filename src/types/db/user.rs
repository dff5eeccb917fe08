use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub username: String,
    #[sea_orm(unique)]
    pub email: String,
    pub password_hash: String,

    pub is_admin: bool,
    pub is_verified: bool,

    // HMAC-SHA256 fingerprint of the only live refresh token
    pub refresh_token_hash: Option<String>,

    // Display profile
    pub bio: String,
    pub image_uri: String,
    pub contact: String,

    pub joined_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
