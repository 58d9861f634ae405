//! Running hour pools.
//!
//! A pool holds the hours still available within one calculator invocation:
//! the fortnightly subsidised hours, or one week's program hours. Pools are
//! drawn in schedule order, never refilled, and never go below zero.

use rust_decimal::Decimal;

/// A budget of hours consumed session by session.
///
/// # Example
///
/// ```
/// use childcare_fee_estimator::calculation::HourPool;
/// use rust_decimal::Decimal;
///
/// let mut pool = HourPool::new(Decimal::new(72, 0));
/// assert_eq!(pool.draw(Decimal::new(50, 0)), Decimal::new(50, 0));
/// assert_eq!(pool.draw(Decimal::new(50, 0)), Decimal::new(22, 0));
/// assert!(pool.is_exhausted());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HourPool {
    capacity: Decimal,
    remaining: Decimal,
}

impl HourPool {
    /// Creates a pool holding `hours` (negative budgets hold nothing).
    pub fn new(hours: Decimal) -> Self {
        let capacity = hours.max(Decimal::ZERO);
        Self {
            capacity,
            remaining: capacity,
        }
    }

    /// Hours still available.
    pub fn remaining(&self) -> Decimal {
        self.remaining
    }

    /// Hours drawn so far.
    pub fn used(&self) -> Decimal {
        self.capacity - self.remaining
    }

    /// True once nothing is left.
    pub fn is_exhausted(&self) -> bool {
        self.remaining <= Decimal::ZERO
    }

    /// Takes up to `requested` hours and returns how many were granted.
    pub fn draw(&mut self, requested: Decimal) -> Decimal {
        let granted = requested.max(Decimal::ZERO).min(self.remaining);
        self.remaining -= granted;
        granted
    }
}
