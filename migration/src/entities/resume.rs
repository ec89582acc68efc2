//! Resume entity: the tracked document and its beacon token

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "resumes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub original_filename: Option<String>,
    /// 嵌入追踪像素 URL 的不透明 token，不暴露主键
    #[sea_orm(unique)]
    pub tracking_token: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::tracking_log::Entity")]
    TrackingLog,
}

impl Related<super::tracking_log::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TrackingLog.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
