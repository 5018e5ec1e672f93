pub mod registry;
pub mod traits;

// Feed implementations
pub mod fmp;
#[cfg(not(target_arch = "wasm32"))]
pub mod yahoo_finance;
