//! Derived stock values.
//!
//! All of these are recomputed from the current quantities on every render and
//! never stored: quantities change between renders.

use serde::{Deserialize, Serialize};

/// Stock band of a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockStatus {
    Out,
    Low,
    In,
}

impl StockStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StockStatus::Out => "out",
            StockStatus::Low => "low",
            StockStatus::In => "in",
        }
    }
}

/// `Out` iff stock is zero, `Low` iff `0 < current <= min`, `In` otherwise.
///
/// Negative stock (bad upstream data) is treated like zero.
pub fn stock_status(current: i64, min: i64) -> StockStatus {
    if current <= 0 {
        StockStatus::Out
    } else if current <= min {
        StockStatus::Low
    } else {
        StockStatus::In
    }
}

/// Fill gauge: `current / (2 * min)` as a percentage, clamped to `0..=100`.
///
/// A zero (or negative) minimum yields `0` instead of dividing by zero.
pub fn stock_percentage(current: i64, min: i64) -> f64 {
    if min <= 0 {
        return 0.0;
    }
    let pct = current as f64 / (min as f64 * 2.0) * 100.0;
    pct.clamp(0.0, 100.0)
}

/// Stock expressed as full boxes plus loose units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoxBreakdown {
    pub boxes: i64,
    pub remainder: i64,
    pub units_per_box: i64,
}

/// `None` when the product has no (or a zero) box size.
pub fn box_breakdown(current: i64, units_per_box: Option<i64>) -> Option<BoxBreakdown> {
    let units = units_per_box.filter(|u| *u > 0)?;
    Some(BoxBreakdown {
        boxes: current.div_euclid(units),
        remainder: current.rem_euclid(units),
        units_per_box: units,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bands() {
        assert_eq!(stock_status(0, 5), StockStatus::Out);
        assert_eq!(stock_status(3, 5), StockStatus::Low);
        assert_eq!(stock_status(5, 5), StockStatus::Low);
        assert_eq!(stock_status(6, 5), StockStatus::In);
        assert_eq!(stock_status(1, 0), StockStatus::In);
    }

    #[test]
    fn percentage_examples() {
        assert_eq!(stock_percentage(5, 5), 50.0);
        assert_eq!(stock_percentage(50, 5), 100.0);
        assert_eq!(stock_percentage(0, 5), 0.0);
        assert_eq!(stock_percentage(7, 0), 0.0);
    }

    #[test]
    fn boxes_and_loose_units() {
        let b = box_breakdown(27, Some(12)).unwrap();
        assert_eq!((b.boxes, b.remainder), (2, 3));
        assert!(box_breakdown(27, Some(0)).is_none());
        assert!(box_breakdown(27, None).is_none());
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 1000,
                ..ProptestConfig::default()
            })]

            #[test]
            fn out_iff_zero(current in 0i64..10_000, min in 1i64..1_000) {
                let status = stock_status(current, min);
                prop_assert_eq!(status == StockStatus::Out, current == 0);
                if current > 0 && current <= min {
                    prop_assert_eq!(status, StockStatus::Low);
                }
                if current > min {
                    prop_assert_eq!(status, StockStatus::In);
                }
            }

            #[test]
            fn percentage_is_zero_without_minimum(current in any::<i64>()) {
                prop_assert_eq!(stock_percentage(current, 0), 0.0);
            }

            #[test]
            fn percentage_is_clamped(current in -10_000i64..10_000, min in 1i64..1_000) {
                let pct = stock_percentage(current, min);
                prop_assert!((0.0..=100.0).contains(&pct));
            }

            #[test]
            fn boxes_recombine(current in 0i64..1_000_000, units in 1i64..500) {
                let b = box_breakdown(current, Some(units)).unwrap();
                prop_assert_eq!(b.boxes * units + b.remainder, current);
                prop_assert!(b.remainder >= 0 && b.remainder < units);
            }
        }
    }
}
