use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "monthly_horoscope")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub sign: String,
    pub month: String,
    #[sea_orm(column_type = "Text")]
    pub data: String,
    pub standout_days: String,
    pub challenging_days: String,
    pub last_updated: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
