use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "identities")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Human-facing display id, `user` + 3-digit zero-padded sequence
    #[sea_orm(unique)]
    pub user_id: String,

    pub name: String,
    pub email: String,
    pub username: String,
    pub phone: String,

    /// References Role.name by value, not by id
    pub role: String,

    pub status: String,
    pub created: i64,
    pub last_login: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
