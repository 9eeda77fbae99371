//! Trailing window statistics
//!
//! Windows here never include the value they are reported against: the
//! statistics attached to position `i` of a series are computed over the
//! `period` values strictly before it.

use crate::{MathError, Result};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Mean and sample standard deviation of one full window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowStats {
    /// Arithmetic mean of the window
    pub mean: f64,
    /// Sample standard deviation (n - 1 denominator); `None` below two values
    pub std_dev: Option<f64>,
}

/// Fixed-size window over the most recent values of a series
#[derive(Debug, Clone)]
pub struct TrailingWindow {
    period: usize,
    values: VecDeque<f64>,
}

impl TrailingWindow {
    /// Create a new window holding at most `period` values
    pub fn new(period: usize) -> Result<Self> {
        if period == 0 {
            return Err(MathError::InvalidInput(
                "Period must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            period,
            values: VecDeque::with_capacity(period),
        })
    }

    /// Push a value, evicting the oldest one once the window is full
    pub fn update(&mut self, value: f64) {
        self.values.push_back(value);
        if self.values.len() > self.period {
            self.values.pop_front();
        }
    }

    /// Whether `period` values have been seen
    pub fn is_full(&self) -> bool {
        self.values.len() == self.period
    }

    /// Mean of the current window
    pub fn mean(&self) -> Result<f64> {
        if !self.is_full() {
            return Err(MathError::InsufficientData(format!(
                "Not enough data for window mean. Need {} values, have {}.",
                self.period,
                self.values.len()
            )));
        }

        Ok(self.sum() / self.period as f64)
    }

    /// Sample standard deviation of the current window
    pub fn sample_std_dev(&self) -> Result<f64> {
        if !self.is_full() || self.values.len() < 2 {
            return Err(MathError::InsufficientData(format!(
                "Not enough data for sample standard deviation. Need {} values, have {}.",
                self.period,
                self.values.len()
            )));
        }

        let mean = self.mean()?;
        let variance = self
            .values
            .iter()
            .map(|&value| {
                let diff = value - mean;
                diff * diff
            })
            .sum::<f64>()
            / (self.values.len() - 1) as f64;

        Ok(variance.sqrt())
    }

    /// Mean and standard deviation, or `None` while the window is filling
    pub fn stats(&self) -> Option<WindowStats> {
        let mean = self.mean().ok()?;
        Some(WindowStats {
            mean,
            std_dev: self.sample_std_dev().ok(),
        })
    }

    /// Sum of the values currently held
    pub fn sum(&self) -> f64 {
        self.values.iter().sum()
    }
}

/// Statistics of the `period` values preceding each position of `values`.
///
/// Equivalent to shifting the series by one and taking a rolling window of
/// `period`: position `i` gets the stats of `values[i - period..i]`, and
/// `None` while fewer than `period` earlier values exist.
pub fn trailing_window_stats(values: &[f64], period: usize) -> Result<Vec<Option<WindowStats>>> {
    let mut window = TrailingWindow::new(period)?;
    let mut stats = Vec::with_capacity(values.len());

    for &value in values {
        stats.push(window.stats());
        window.update(value);
    }

    Ok(stats)
}
