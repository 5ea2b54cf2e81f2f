// Core modules implementing the property-path codec and error modeling.
pub mod coerce;
pub mod error;
pub mod flatten;
pub mod path;
pub mod tree;
