//! General functions related to finance.

/// Calculates the annuity (capital recovery) factor for a depreciation period and interest rate.
///
/// Multiplying an investment by this factor gives the equal annual payment which repays it, with
/// interest, over `depreciation` years.
pub fn annuity_factor(depreciation: u32, wacc: f64) -> f64 {
    if depreciation == 0 {
        return 0.0;
    }
    let years = f64::from(depreciation);
    if wacc.abs() < f64::EPSILON {
        return 1.0 / years;
    }
    let factor = (1.0 + wacc).powf(years);
    (wacc * factor) / (factor - 1.0)
}

/// Weighting applied to costs incurred in support time frame `stf`.
///
/// Costs are discounted to the first support time frame `stf_min`, which is weighted by
/// `1 + discount_rate`.
pub fn discount_factor(stf: u32, stf_min: u32, discount_rate: f64) -> f64 {
    let exponent = 1.0 - (f64::from(stf) - f64::from(stf_min));
    (1.0 + discount_rate).powf(exponent)
}

/// The share of an investment's depreciation period which falls after `horizon_end`.
///
/// This is positive exactly when the unit has a rest value, i.e. when
/// `built + depreciation > horizon_end`.
pub fn rest_value_fraction(built: u32, depreciation: u32, horizon_end: u32) -> f64 {
    if depreciation == 0 {
        return 0.0;
    }
    let remaining = f64::from(built) + f64::from(depreciation) - f64::from(horizon_end);
    (remaining / f64::from(depreciation)).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::assert_approx_eq;
    use rstest::rstest;

    #[rstest]
    #[case(0, 0.05, 0.0)] // Edge case: depreciation==0
    #[case(10, 0.0, 0.1)] // Other edge case: wacc==0
    #[case(10, 0.05, 0.1295045749654567)]
    #[case(5, 0.03, 0.2183545714005762)]
    fn test_annuity_factor(#[case] depreciation: u32, #[case] wacc: f64, #[case] expected: f64) {
        let result = annuity_factor(depreciation, wacc);
        assert_approx_eq!(f64, result, expected, epsilon = 1e-10);
    }

    #[rstest]
    #[case(2020, 2020, 0.03, 1.03)]
    #[case(2021, 2020, 0.03, 1.0)]
    #[case(2030, 2020, 0.0, 1.0)]
    #[case(2030, 2020, 0.05, 0.6446089162)] // 1.05^-9
    fn test_discount_factor(
        #[case] stf: u32,
        #[case] stf_min: u32,
        #[case] discount_rate: f64,
        #[case] expected: f64,
    ) {
        let result = discount_factor(stf, stf_min, discount_rate);
        assert_approx_eq!(f64, result, expected, epsilon = 1e-9);
    }

    #[rstest]
    #[case(2020, 30, 2040, 1.0 / 3.0)]
    #[case(2020, 20, 2040, 0.0)] // Ends exactly at the horizon
    #[case(2040, 10, 2040, 1.0)]
    #[case(2040, 0, 2040, 0.0)]
    #[case(2000, 10, 2040, 0.0)]
    fn test_rest_value_fraction(
        #[case] built: u32,
        #[case] depreciation: u32,
        #[case] horizon_end: u32,
        #[case] expected: f64,
    ) {
        let result = rest_value_fraction(built, depreciation, horizon_end);
        assert_approx_eq!(f64, result, expected);
    }
}
