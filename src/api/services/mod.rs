pub mod health;
pub mod resumes;
pub mod stats;
pub mod track;

pub use health::{AppStartTime, HealthService, health_routes};
pub use resumes::{ResumeService, resume_routes};
pub use stats::{SpyglassService, spyglass_routes};
pub use track::{TrackService, track_routes};
