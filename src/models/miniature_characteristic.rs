use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "miniature_characteristics")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub miniature_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub characteristic: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::miniature::Entity",
        from = "Column::MiniatureId",
        to = "super::miniature::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Miniature,
}

impl Related<super::miniature::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Miniature.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
