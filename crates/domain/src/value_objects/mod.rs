pub mod address;
pub mod percentage;
pub mod price;
pub mod price_range;

pub use address::{Address, AddressError};
pub use percentage::Percentage;
pub use price::Price;
pub use price_range::PriceRange;
