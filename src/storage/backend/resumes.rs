//! Resume operations for SeaOrmStorage
//!
//! 简历行的创建与查询。追踪 token 在创建时生成，贯穿简历整个生命周期。

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use tracing::info;
use uuid::Uuid;

use super::SeaOrmStorage;
use crate::errors::{Result, SpyglassError};

use migration::entities::resume;

impl SeaOrmStorage {
    /// 创建一份简历，自动分配 id 和追踪 token
    pub async fn create_resume(&self, original_filename: Option<String>) -> Result<resume::Model> {
        let active = resume::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            original_filename: Set(original_filename),
            tracking_token: Set(Uuid::new_v4().to_string()),
            created_at: Set(Utc::now()),
        };

        let model = active
            .insert(&self.db)
            .await
            .map_err(|e| SpyglassError::database_operation(format!("创建简历失败: {}", e)))?;

        info!("Resume created: {}", model.id);
        Ok(model)
    }

    /// 按主键查询简历
    pub async fn find_resume_by_id(&self, resume_id: &str) -> Result<Option<resume::Model>> {
        resume::Entity::find_by_id(resume_id)
            .one(&self.db)
            .await
            .map_err(|e| SpyglassError::database_operation(format!("查询简历失败: {}", e)))
    }

    /// 按追踪 token 查询简历
    pub async fn find_resume_by_token(&self, token: &str) -> Result<Option<resume::Model>> {
        resume::Entity::find()
            .filter(resume::Column::TrackingToken.eq(token))
            .one(&self.db)
            .await
            .map_err(|e| SpyglassError::database_operation(format!("按 token 查询简历失败: {}", e)))
    }
}
