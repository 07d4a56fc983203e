#![forbid(unsafe_code)]

pub mod calculation;
pub mod calculator;
pub mod config;
pub mod error;
pub mod history;
pub mod logging;
pub mod mcp;
pub mod repl;
pub mod tools;

pub use calculation::{Calculation, Operator};
pub use calculator::{Calculator, SharedCalculator};
pub use error::CalcError;
pub use history::{CalculationHistory, HistoryEntry};
