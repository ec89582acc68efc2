pub mod geoip;
pub mod stats;

pub use geoip::GeoResolver;
pub use stats::TrackingStats;
