//! Application services - Use case implementations

mod location_search;
mod navigation_search;

pub use location_search::LocationSearch;
pub use navigation_search::NavigationSearch;
