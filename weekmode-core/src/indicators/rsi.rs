//! Relative Strength Index (RSI).
//!
//! RSI = 100 - 100 / (1 + avg_gain / avg_loss)
//! Lookback: period. Index `period` is the first defined value; the seed
//! averages are the mean gain and mean loss over the first `period` changes
//! (sum divided by `period`, so windows without gains average to 0).
//!
//! Smoothing after the seed is fixed per series by [`RsiSmoothing`]:
//! - `Wilder` (default): avg = (avg * (period - 1) + x) / period
//! - `Simple`: plain mean over the trailing `period` changes
//!
//! Edge cases: avg_loss == 0 → RSI = 100 (flat windows included);
//! avg_gain == 0 with losses → RSI = 0.
//! A NaN close inside the seed window leaves the whole series undefined; a NaN
//! after the seed leaves every later value undefined.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{Indicator, RsiPoint};
use crate::domain::PriceBar;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RsiError {
    #[error("RSI period must be >= 1")]
    ZeroPeriod,
}

/// How gains and losses are averaged after the seed window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RsiSmoothing {
    #[default]
    Wilder,
    Simple,
}

#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
    smoothing: RsiSmoothing,
    name: String,
}

impl Rsi {
    pub fn new(period: usize) -> Result<Self, RsiError> {
        Self::with_smoothing(period, RsiSmoothing::Wilder)
    }

    pub fn with_smoothing(period: usize, smoothing: RsiSmoothing) -> Result<Self, RsiError> {
        if period == 0 {
            return Err(RsiError::ZeroPeriod);
        }
        let prefix = match smoothing {
            RsiSmoothing::Wilder => "rsi",
            RsiSmoothing::Simple => "rsi_sma",
        };
        Ok(Self {
            period,
            smoothing,
            name: format!("{prefix}_{period}"),
        })
    }

    pub fn period(&self) -> usize {
        self.period
    }

    pub fn smoothing(&self) -> RsiSmoothing {
        self.smoothing
    }

    /// RSI over a raw value series. Same length as `values`; undefined entries are NaN.
    pub fn compute_values(&self, values: &[f64]) -> Vec<f64> {
        let n = values.len();
        let p = self.period;
        let mut result = vec![f64::NAN; n];

        if n < p + 1 {
            return result;
        }

        // Split changes into gains and losses; index 0 has no change.
        let mut gains = vec![0.0; n];
        let mut losses = vec![0.0; n];
        let mut valid_until = n;
        for i in 1..n {
            let change = values[i] - values[i - 1];
            if !change.is_finite() {
                valid_until = i;
                break;
            }
            if change > 0.0 {
                gains[i] = change;
            } else {
                losses[i] = -change;
            }
        }

        // NaN inside the seed window
        if valid_until <= p {
            return result;
        }

        let mut avg_gain = gains[1..=p].iter().sum::<f64>() / p as f64;
        let mut avg_loss = losses[1..=p].iter().sum::<f64>() / p as f64;
        result[p] = compute_rsi(avg_gain, avg_loss);

        for i in (p + 1)..valid_until {
            match self.smoothing {
                RsiSmoothing::Wilder => {
                    let w = (p - 1) as f64;
                    avg_gain = (avg_gain * w + gains[i]) / p as f64;
                    avg_loss = (avg_loss * w + losses[i]) / p as f64;
                }
                RsiSmoothing::Simple => {
                    let window = (i + 1 - p)..=i;
                    avg_gain = gains[window.clone()].iter().sum::<f64>() / p as f64;
                    avg_loss = losses[window].iter().sum::<f64>() / p as f64;
                }
            }
            result[i] = compute_rsi(avg_gain, avg_loss);
        }

        result
    }

    /// Defined RSI points for a bar series, dated by their bar.
    ///
    /// The look-back prefix (and anything after a NaN close) is omitted.
    pub fn series(&self, bars: &[PriceBar]) -> Vec<RsiPoint> {
        self.compute(bars)
            .into_iter()
            .zip(bars)
            .filter(|(value, _)| !value.is_nan())
            .map(|(value, bar)| RsiPoint {
                date: bar.date,
                value,
            })
            .collect()
    }
}

impl Indicator for Rsi {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn compute(&self, bars: &[PriceBar]) -> Vec<f64> {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        self.compute_values(&closes)
    }
}

fn compute_rsi(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        100.0
    } else if avg_gain == 0.0 {
        0.0
    } else {
        100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars, DEFAULT_EPSILON};

    fn wilder(period: usize) -> Rsi {
        Rsi::new(period).unwrap()
    }

    fn simple(period: usize) -> Rsi {
        Rsi::with_smoothing(period, RsiSmoothing::Simple).unwrap()
    }

    #[test]
    fn rsi_all_gains() {
        let bars = make_bars(&[100.0, 101.0, 102.0, 103.0, 104.0, 105.0]);
        let result = wilder(3).compute(&bars);
        for v in &result[3..] {
            assert_approx(*v, 100.0, DEFAULT_EPSILON);
        }
    }

    #[test]
    fn rsi_all_losses() {
        let bars = make_bars(&[105.0, 104.0, 103.0, 102.0, 101.0, 100.0]);
        let result = wilder(3).compute(&bars);
        for v in &result[3..] {
            assert_approx(*v, 0.0, DEFAULT_EPSILON);
        }
    }

    #[test]
    fn rsi_period_two_two_gains() {
        // changes [+2, +2] → avg_loss = 0 → 100
        let result = wilder(2).compute_values(&[10.0, 12.0, 14.0]);
        assert!(result[0].is_nan());
        assert!(result[1].is_nan());
        assert_eq!(result[2], 100.0);
    }

    #[test]
    fn rsi_flat_window_is_100() {
        let result = wilder(2).compute_values(&[10.0, 10.0, 10.0]);
        assert_eq!(result[2], 100.0);
    }

    #[test]
    fn rsi_mixed_hand_computed() {
        // Closes: 44, 44.34, 44.09, 43.61, 44.33
        // Changes: +0.34, -0.25, -0.48, +0.72
        // Seed (period 3): gain 0.34/3, loss 0.73/3 → RSI[3] = 100 * 0.34 / 1.07
        // Wilder: gain (0.68/3 + 0.72)/3 = 2.84/9, loss 1.46/9 → RSI[4] = 100 * 2.84 / 4.30
        let closes = [44.0, 44.34, 44.09, 43.61, 44.33];
        let result = wilder(3).compute_values(&closes);

        assert!(result[0].is_nan());
        assert!(result[1].is_nan());
        assert!(result[2].is_nan());
        assert_approx(result[3], 100.0 * 0.34 / 1.07, 1e-9);
        assert_approx(result[4], 100.0 * 2.84 / 4.30, 1e-9);
    }

    #[test]
    fn rsi_simple_uses_trailing_window() {
        // Window for index 4: -0.25, -0.48, +0.72 → 100 * 0.72 / 1.45
        let closes = [44.0, 44.34, 44.09, 43.61, 44.33];
        let result = simple(3).compute_values(&closes);
        assert_approx(result[3], 100.0 * 0.34 / 1.07, 1e-9);
        assert_approx(result[4], 100.0 * 0.72 / 1.45, 1e-9);
    }

    #[test]
    fn rsi_bounds() {
        let bars = make_bars(&[100.0, 105.0, 98.0, 110.0, 95.0, 115.0, 90.0, 120.0]);
        for rsi in [wilder(3), simple(3)] {
            let result = rsi.compute(&bars);
            for (i, &v) in result.iter().enumerate() {
                if !v.is_nan() {
                    assert!(
                        (0.0..=100.0).contains(&v),
                        "{} out of bounds at bar {i}: {v}",
                        rsi.name()
                    );
                }
            }
        }
    }

    #[test]
    fn rsi_nan_in_seed() {
        let mut bars = make_bars(&[100.0, 101.0, 102.0, 103.0, 104.0]);
        bars[2].close = f64::NAN;
        let result = wilder(3).compute(&bars);
        assert!(result.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn rsi_nan_after_seed_truncates() {
        let mut bars = make_bars(&[100.0, 101.0, 102.0, 103.0, 104.0, 105.0]);
        bars[4].close = f64::NAN;
        let result = wilder(3).compute(&bars);
        assert_eq!(result[3], 100.0);
        assert!(result[4].is_nan());
        assert!(result[5].is_nan());
    }

    #[test]
    fn rsi_too_short() {
        let result = wilder(14).compute_values(&[1.0; 14]);
        assert_eq!(result.len(), 14);
        assert!(result.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn rsi_series_drops_prefix_and_keeps_dates() {
        let bars = make_bars(&[10.0, 12.0, 14.0, 13.0]);
        let series = wilder(2).series(&bars);
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].date, bars[2].date);
        assert_eq!(series[1].date, bars[3].date);
    }

    #[test]
    fn rsi_zero_period_rejected() {
        assert_eq!(Rsi::new(0).unwrap_err(), RsiError::ZeroPeriod);
    }

    #[test]
    fn rsi_lookback_and_name() {
        assert_eq!(wilder(14).lookback(), 14);
        assert_eq!(wilder(14).name(), "rsi_14");
        assert_eq!(simple(14).name(), "rsi_sma_14");
    }
}
