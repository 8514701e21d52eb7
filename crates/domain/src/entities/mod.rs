pub mod pool;
pub mod position;
pub mod price_candle;
pub mod protocol_stats;
pub mod token;
pub mod trade;
pub mod transaction;

// Re-export for easier access
pub use pool::{Pool, PoolId};
pub use position::{Position, PositionId, Withdrawal};
pub use price_candle::PriceCandle;
pub use protocol_stats::ProtocolStats;
pub use token::Token;
pub use trade::Trade;
pub use transaction::Transaction;
