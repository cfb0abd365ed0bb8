pub mod fixed;
pub mod ip_api;
pub mod nominatim;
pub mod osrm;

pub use fixed::FixedLocationSource;
pub use ip_api::IpLocationSource;
pub use nominatim::NominatimPlaceSearch;
pub use osrm::OsrmDirections;
