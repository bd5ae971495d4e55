use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ScaleError {
    #[error("scale has no brackets")]
    Empty,
    #[error("bracket threshold {0} is negative")]
    NegativeThreshold(Decimal),
    #[error("bracket thresholds must be strictly increasing: {previous} then {next}")]
    ThresholdsNotIncreasing { previous: Decimal, next: Decimal },
    #[error("bracket rate {0} is negative")]
    NegativeRate(Decimal),
}

/// One slice of a marginal scale: `rate` applies to the part of the amount
/// above `threshold` and below the next bracket's threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Bracket {
    pub threshold: Decimal,
    pub rate: Decimal,
}

/// Progressive scale with marginal rates.
///
/// Construction guarantees non-negative, strictly increasing thresholds and
/// non-negative rates, so [`MarginalRateScale::calc`] is monotonic
/// non-decreasing in the amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarginalRateScale {
    brackets: Vec<Bracket>,
}

impl MarginalRateScale {
    pub fn new(brackets: Vec<Bracket>) -> Result<Self, ScaleError> {
        let first = brackets.first().ok_or(ScaleError::Empty)?;
        if first.threshold < Decimal::ZERO {
            return Err(ScaleError::NegativeThreshold(first.threshold));
        }
        for pair in brackets.windows(2) {
            if pair[1].threshold <= pair[0].threshold {
                return Err(ScaleError::ThresholdsNotIncreasing {
                    previous: pair[0].threshold,
                    next: pair[1].threshold,
                });
            }
        }
        if let Some(b) = brackets.iter().find(|b| b.rate < Decimal::ZERO) {
            return Err(ScaleError::NegativeRate(b.rate));
        }
        Ok(MarginalRateScale { brackets })
    }

    pub fn brackets(&self) -> &[Bracket] {
        &self.brackets
    }

    /// Apply the scale to `amount`, summing each bracket's rate over the
    /// slice of the amount that falls inside it.
    ///
    /// Returns `None` when the result does not fit in a `Decimal`.
    pub fn calc(&self, amount: Decimal) -> Option<Decimal> {
        let uppers = self
            .brackets
            .iter()
            .skip(1)
            .map(|b| Some(b.threshold))
            .chain(std::iter::once(None));

        self.brackets
            .iter()
            .zip(uppers)
            .try_fold(Decimal::ZERO, |total, (bracket, upper)| {
                let top = upper.map_or(amount, |u| amount.min(u));
                if top <= bracket.threshold {
                    return Some(total);
                }
                // top > threshold >= 0, so the subtraction cannot overflow
                let slice = top - bracket.threshold;
                total.checked_add(slice.checked_mul(bracket.rate)?)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn bracket(threshold: Decimal, rate: Decimal) -> Bracket {
        Bracket { threshold, rate }
    }

    fn contribution_scale() -> MarginalRateScale {
        MarginalRateScale::new(vec![
            bracket(dec!(0), dec!(0.02)),
            bracket(dec!(12000), dec!(0.12)),
        ])
        .unwrap()
    }

    #[test]
    fn single_bracket_is_flat() {
        let scale = MarginalRateScale::new(vec![bracket(dec!(0), dec!(0.1))]).unwrap();
        assert_eq!(scale.calc(dec!(2500)).unwrap(), dec!(250));
    }

    #[test]
    fn marginal_rates_apply_per_slice() {
        let scale = contribution_scale();
        assert_eq!(scale.calc(dec!(10000)).unwrap(), dec!(200));
        assert_eq!(scale.calc(dec!(12000)).unwrap(), dec!(240));
        // 12000 * 0.02 + 3000 * 0.12
        assert_eq!(scale.calc(dec!(15000)).unwrap(), dec!(600));
    }

    #[test]
    fn non_positive_amounts_yield_zero() {
        let scale = contribution_scale();
        assert_eq!(scale.calc(Decimal::ZERO).unwrap(), Decimal::ZERO);
        assert_eq!(scale.calc(dec!(-500)).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn amounts_below_first_threshold_are_untaxed() {
        let scale = MarginalRateScale::new(vec![bracket(dec!(1000), dec!(0.5))]).unwrap();
        assert_eq!(scale.calc(dec!(800)).unwrap(), Decimal::ZERO);
        assert_eq!(scale.calc(dec!(1200)).unwrap(), dec!(100));
    }

    #[test]
    fn calc_is_monotonic() {
        let scale = MarginalRateScale::new(vec![
            bracket(dec!(0), dec!(0)),
            bracket(dec!(5000), dec!(0.1)),
            bracket(dec!(20000), dec!(0.3)),
            bracket(dec!(50000), dec!(0.05)),
        ])
        .unwrap();

        let mut previous = scale.calc(dec!(-1000)).unwrap();
        let mut amount = dec!(-1000);
        while amount <= dec!(80000) {
            let current = scale.calc(amount).unwrap();
            assert!(current >= previous, "calc({amount}) decreased");
            previous = current;
            amount += dec!(750);
        }
    }

    #[test]
    fn calc_reports_overflow() {
        let scale = MarginalRateScale::new(vec![bracket(dec!(0), dec!(20))]).unwrap();
        assert_eq!(scale.calc(Decimal::MAX), None);
        assert_eq!(scale.calc(Decimal::MIN), Some(Decimal::ZERO));
    }

    #[test]
    fn rejects_empty_scale() {
        assert_eq!(MarginalRateScale::new(vec![]), Err(ScaleError::Empty));
    }

    #[test]
    fn rejects_unordered_thresholds() {
        let result = MarginalRateScale::new(vec![
            bracket(dec!(0), dec!(0.1)),
            bracket(dec!(1000), dec!(0.2)),
            bracket(dec!(1000), dec!(0.3)),
        ]);
        assert_eq!(
            result,
            Err(ScaleError::ThresholdsNotIncreasing {
                previous: dec!(1000),
                next: dec!(1000)
            })
        );
    }

    #[test]
    fn rejects_negative_values() {
        assert_eq!(
            MarginalRateScale::new(vec![bracket(dec!(-1), dec!(0.1))]),
            Err(ScaleError::NegativeThreshold(dec!(-1)))
        );
        assert_eq!(
            MarginalRateScale::new(vec![bracket(dec!(0), dec!(-0.1))]),
            Err(ScaleError::NegativeRate(dec!(-0.1)))
        );
    }
}
