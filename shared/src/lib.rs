pub mod colors;
pub mod county;
pub mod geo;
pub mod message;
pub mod scale;

pub use county::*;
pub use geo::{LngLat, LngLatBounds};
pub use message::*;
