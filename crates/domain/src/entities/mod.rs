//! Domain entities - geocoder results and their normalized form

mod location_record;
mod map_location;

pub use location_record::LocationRecord;
pub use map_location::MapLocation;
