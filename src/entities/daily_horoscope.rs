use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "daily_horoscope")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub sign: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub day: String,
    pub date: String,
    #[sea_orm(column_type = "Text")]
    pub data: String,
    pub last_updated: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
