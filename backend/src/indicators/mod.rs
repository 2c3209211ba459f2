// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free implementations of the indicators reported by the
// analysis endpoint. Each function returns the value at the most recent close.
//
// Insufficient history is never an error: it degrades to a fallback value
// (mean-of-available for the SMA, NaN otherwise). `Err` is reserved for
// numerical failures such as overflow or a zero price.

pub mod rsi;
pub mod sma;
pub mod volatility;
