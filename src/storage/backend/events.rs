//! Tracking event operations for SeaOrmStorage
//!
//! 每次命中一条独立插入，没有批量缓冲——事件量级由简历浏览行为
//! 决定，单条写入足够，且保证 worker 崩溃最多丢一条。

use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use super::SeaOrmStorage;
use crate::errors::{Result, SpyglassError};
use crate::tracking::ViewDetail;

use migration::entities::tracking_log;

impl SeaOrmStorage {
    /// 插入一条追踪事件
    pub async fn insert_tracking_event(&self, detail: &ViewDetail) -> Result<tracking_log::Model> {
        let geo = &detail.geo;

        let active = tracking_log::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            resume_id: Set(detail.resume_id.clone()),
            event_type: Set(detail.event_type.as_str().to_string()),
            ip_address: Set(detail.ip_address.clone()),
            user_agent: Set(detail.user_agent.clone()),
            referer: Set(detail.referer.clone()),
            country: Set(Some(geo.country.clone())),
            city: Set(Some(geo.city.clone())),
            region: Set(Some(geo.region.clone())),
            latitude: Set(geo.latitude),
            longitude: Set(geo.longitude),
            company_hint: Set(Some(geo.company_hint.clone())),
            viewed_at: Set(detail.viewed_at),
        };

        active
            .insert(&self.db)
            .await
            .map_err(|e| SpyglassError::database_operation(format!("写入追踪事件失败: {}", e)))
    }

    /// 查询一份简历的全部事件（按时间升序）
    pub async fn events_for_resume(&self, resume_id: &str) -> Result<Vec<tracking_log::Model>> {
        tracking_log::Entity::find()
            .filter(tracking_log::Column::ResumeId.eq(resume_id))
            .order_by_asc(tracking_log::Column::ViewedAt)
            .all(&self.db)
            .await
            .map_err(|e| SpyglassError::database_operation(format!("查询追踪事件失败: {}", e)))
    }

    /// 统计一份简历的事件总数
    pub async fn count_events_for_resume(&self, resume_id: &str) -> Result<u64> {
        use sea_orm::PaginatorTrait;

        tracking_log::Entity::find()
            .filter(tracking_log::Column::ResumeId.eq(resume_id))
            .count(&self.db)
            .await
            .map_err(|e| SpyglassError::database_operation(format!("统计追踪事件失败: {}", e)))
    }
}
