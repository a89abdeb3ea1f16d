//! Domain types shared by every fxlens crate.

pub mod error;
pub mod pair;
pub mod series;

pub use error::{CoreError, CoreResult};
pub use pair::CurrencyPair;
pub use series::{PricePoint, PriceSeries};
