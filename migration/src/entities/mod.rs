pub mod resume;
pub mod tracking_log;

pub use resume::Entity as ResumeEntity;
pub use tracking_log::Entity as TrackingLogEntity;
