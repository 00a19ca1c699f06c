pub mod backtest;
pub mod boundary;
pub mod candle;
pub mod direction;
pub mod entry;
pub mod error;
pub mod instrument;
pub mod pivot;
pub mod rounding;
pub mod session;
pub mod settings;
pub mod sma;
pub mod ticks;
pub mod trade;
pub mod tradelog;
pub mod window;
