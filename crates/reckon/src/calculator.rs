#![forbid(unsafe_code)]

//! Session facade: compute a calculation and record it on success.

use std::sync::{Arc, Mutex};

use crate::calculation::Calculation;
use crate::error::CalcError;
use crate::history::CalculationHistory;

/// Calculator state for one session. Hosts that share a session across
/// threads wrap it in a [`SharedCalculator`].
pub type SharedCalculator = Arc<Mutex<Calculator>>;

#[derive(Debug, Default)]
pub struct Calculator {
    history: CalculationHistory,
}

impl Calculator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedCalculator {
        Arc::new(Mutex::new(Self::new()))
    }

    /// Construct, compute and record one calculation.
    ///
    /// Nothing is recorded when computation fails; the error is returned as is.
    pub fn calculate(
        &mut self,
        operand1: f64,
        operand2: f64,
        operator: &str,
    ) -> Result<Calculation, CalcError> {
        let mut calculation = Calculation::new(operand1, operand2, operator);
        if let Err(err) = calculation.compute() {
            tracing::warn!(operand1, operand2, operator, kind = err.kind(), "calculation rejected");
            return Err(err);
        }

        self.history.add_entry(calculation.clone());
        Ok(calculation)
    }

    pub const fn history(&self) -> &CalculationHistory {
        &self.history
    }

    /// Clear the history, returning the number of entries removed.
    pub fn clear_history(&mut self) -> usize {
        self.history.clear()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::HistoryEntry;

    #[test]
    fn test_calculate_records_entry() {
        let mut calculator = Calculator::new();
        let calc = calculator.calculate(10.0, 5.0, "+").unwrap();
        assert_eq!(calc.result(), Some(15.0));
        assert_eq!(calculator.history().len(), 1);
        assert_eq!(
            calculator.history().last().map(HistoryEntry::calculation),
            Some(&calc)
        );
    }

    #[test]
    fn test_failed_calculation_is_not_recorded() {
        let mut calculator = Calculator::new();
        calculator.calculate(1.0, 2.0, "*").unwrap();

        let err = calculator.calculate(10.0, 0.0, "/").unwrap_err();
        assert_eq!(err, CalcError::division_by_zero(10.0, 0.0));

        let err = calculator.calculate(5.0, 3.0, "%").unwrap_err();
        assert_eq!(err.message(), "Unsupported operation: %");

        assert_eq!(calculator.history().len(), 1);
    }

    #[test]
    fn test_clear_history() {
        let mut calculator = Calculator::new();
        calculator.calculate(10.0, 5.0, "+").unwrap();
        calculator.calculate(10.0, 5.0, "-").unwrap();
        assert_eq!(calculator.clear_history(), 2);
        assert!(calculator.history().is_empty());
    }
}
