use super::types::RiskLevel;

pub const HIGH_PROBABILITY: f64 = 1e-4;
pub const HIGH_RANGE_KM: f64 = 1.0;
pub const MEDIUM_PROBABILITY: f64 = 1e-5;
pub const MEDIUM_RANGE_KM: f64 = 5.0;

/// Three-tier risk from minimum range and collision probability.
///
/// Each tier triggers on either input; tiers are checked from high to low.
/// Inputs are not range-checked, out-of-range values classify as they fall.
pub fn classify(min_range_km: f64, probability: f64) -> RiskLevel {
    if probability > HIGH_PROBABILITY || min_range_km < HIGH_RANGE_KM {
        RiskLevel::High
    } else if probability > MEDIUM_PROBABILITY || min_range_km < MEDIUM_RANGE_KM {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_alone_triggers_high() {
        assert_eq!(classify(0.5, 0.00005), RiskLevel::High);
    }

    #[test]
    fn probability_alone_triggers_high() {
        assert_eq!(classify(10.0, 0.0002), RiskLevel::High);
    }

    #[test]
    fn distant_and_unlikely_is_low() {
        assert_eq!(classify(6.0, 0.000005), RiskLevel::Low);
    }

    #[test]
    fn thresholds_are_strict() {
        assert_eq!(classify(1.0, 1e-4), RiskLevel::Medium);
        assert_eq!(classify(5.0, 1e-5), RiskLevel::Low);
        assert_eq!(classify(4.99, 0.0), RiskLevel::Medium);
    }

    #[test]
    fn out_of_range_inputs_pass_through() {
        assert_eq!(classify(-3.0, 0.0), RiskLevel::High);
        assert_eq!(classify(20.0, 1.5), RiskLevel::High);
        assert_eq!(classify(20.0, -0.5), RiskLevel::Low);
    }

    #[test]
    fn ranks_order_tiers() {
        assert!(RiskLevel::High.rank() > RiskLevel::Medium.rank());
        assert!(RiskLevel::Medium.rank() > RiskLevel::Low.rank());
        assert_eq!("HIGH".parse::<RiskLevel>().unwrap(), RiskLevel::High);
        assert_eq!(RiskLevel::Medium.to_string(), "medium");
    }
}
