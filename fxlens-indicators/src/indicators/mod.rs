//! Streaming indicator building blocks used by the engine.

pub mod bollinger;
pub mod directional;
pub mod ema;
pub mod macd;
pub mod returns;
pub mod rsi;
pub mod sma;
pub mod stochastic;

pub use bollinger::{BollingerBands, BollingerBandsOutput, RollingStdDev};
pub use directional::{Directional, DirectionalOutput};
pub use ema::Ema;
pub use macd::{Macd, MacdOutput};
pub use returns::SimpleReturn;
pub use rsi::Rsi;
pub use sma::Sma;
pub use stochastic::{Stochastic, StochasticOutput};
