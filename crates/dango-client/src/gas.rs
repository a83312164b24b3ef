//! Gas limit selection

/// How the pipeline picks the gas limit of a transaction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GasOption {
    /// Dry-run the messages, then scale the gas they used.
    Simulate {
        /// Multiplier applied to the simulated gas.
        scale: f64,
        /// Added after scaling.
        flat_increase: u64,
    },
    /// Use the given limit and skip the dry run.
    Predefined { gas_limit: u64 },
}

impl Default for GasOption {
    fn default() -> Self {
        Self::Simulate { scale: 1.0, flat_increase: 0 }
    }
}

impl GasOption {
    pub const fn predefined(gas_limit: u64) -> Self {
        Self::Predefined { gas_limit }
    }

    pub const fn simulate(scale: f64, flat_increase: u64) -> Self {
        Self::Simulate { scale, flat_increase }
    }
}

/// `ceil(gas_used * scale) + flat_increase`, saturating at `u64::MAX`.
pub(crate) fn scaled_gas_limit(gas_used: u64, scale: f64, flat_increase: u64) -> u64 {
    let scaled = (gas_used as f64 * scale).ceil();
    // Float to int casts saturate; NaN becomes 0.
    let scaled = if scaled.is_finite() { scaled as u64 } else { u64::MAX };
    scaled.saturating_add(flat_increase)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_plain_simulation() {
        assert_eq!(GasOption::default(), GasOption::simulate(1.0, 0));
        assert_eq!(scaled_gas_limit(123_456, 1.0, 0), 123_456);
    }

    #[test]
    fn test_scaling_rounds_up() {
        assert_eq!(scaled_gas_limit(100, 1.25, 0), 125);
        assert_eq!(scaled_gas_limit(101, 1.5, 0), 152);
        assert_eq!(scaled_gas_limit(3, 1.25, 70_000), 70_004);
        assert_eq!(scaled_gas_limit(0, 2.0, 5), 5);
    }

    #[test]
    fn test_scaling_saturates() {
        assert_eq!(scaled_gas_limit(u64::MAX, 2.0, 0), u64::MAX);
        assert_eq!(scaled_gas_limit(u64::MAX - 1, 1.0, 10), u64::MAX);
        assert_eq!(scaled_gas_limit(10, f64::INFINITY, 0), u64::MAX);
    }
}
