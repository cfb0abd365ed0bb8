pub mod provider;
pub mod providers;

pub use provider::{Directions, LocationSource, PlaceSearch, ServiceError};
pub use providers::{FixedLocationSource, IpLocationSource, NominatimPlaceSearch, OsrmDirections};
