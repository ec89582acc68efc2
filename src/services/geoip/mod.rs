pub mod ipinfo;
pub mod provider;

pub use ipinfo::IpinfoProvider;
pub use provider::{GeoInfo, GeoLookup, GeoResolver};
