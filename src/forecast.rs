//! Naive constant-rate revenue forecast.
//!
//! The projection is `mean(daily revenue) * horizon`. No smoothing, no trend.

use serde::Serialize;

use crate::models::DailyRevenue;

/// Days projected forward.
pub const FORECAST_HORIZON_DAYS: i64 = 7;

/// Days of history considered before falling back to the full history.
pub const LOOKBACK_DAYS: i64 = 30;

/// Minimum distinct days of revenue needed to forecast.
pub const MIN_DAYS: usize = 2;

/// Which history the average was taken over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryWindow {
    Trailing30Days,
    AllHistory,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum RevenueForecast {
    Insufficient {
        days: usize,
        window: HistoryWindow,
    },
    Projected {
        window: HistoryWindow,
        daily: Vec<DailyRevenue>,
        daily_average: f64,
        next_7_days: f64,
    },
}

impl RevenueForecast {
    /// Forecast from already-bucketed daily totals.
    pub fn from_daily(daily: Vec<DailyRevenue>, window: HistoryWindow) -> Self {
        let revenues: Vec<f64> = daily.iter().map(|d| d.revenue).collect();
        match project(&revenues) {
            Some((daily_average, next_7_days)) => RevenueForecast::Projected {
                window,
                daily,
                daily_average,
                next_7_days,
            },
            None => RevenueForecast::Insufficient {
                days: daily.len(),
                window,
            },
        }
    }

    pub fn next_7_days(&self) -> Option<f64> {
        match self {
            RevenueForecast::Projected { next_7_days, .. } => Some(*next_7_days),
            RevenueForecast::Insufficient { .. } => None,
        }
    }
}

/// `(mean, mean * 7)`, or `None` below [`MIN_DAYS`] data points.
pub fn project(daily_revenue: &[f64]) -> Option<(f64, f64)> {
    if daily_revenue.len() < MIN_DAYS {
        return None;
    }
    let mean = daily_revenue.iter().sum::<f64>() / daily_revenue.len() as f64;
    Some((mean, mean * FORECAST_HORIZON_DAYS as f64))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(date: &str, revenue: f64) -> DailyRevenue {
        DailyRevenue {
            date: date.to_string(),
            revenue,
        }
    }

    #[test]
    fn test_mean_times_seven() {
        assert_eq!(project(&[10.0, 20.0, 30.0]), Some((20.0, 140.0)));
    }

    #[test]
    fn test_single_day_is_insufficient() {
        assert_eq!(project(&[55.0]), None);
        assert_eq!(project(&[]), None);
    }

    #[test]
    fn test_from_daily() {
        let forecast = RevenueForecast::from_daily(
            vec![day("2024-03-01", 10.0), day("2024-03-02", 20.0), day("2024-03-03", 30.0)],
            HistoryWindow::Trailing30Days,
        );
        assert_eq!(forecast.next_7_days(), Some(140.0));

        let forecast =
            RevenueForecast::from_daily(vec![day("2024-03-01", 10.0)], HistoryWindow::AllHistory);
        assert_eq!(
            forecast,
            RevenueForecast::Insufficient {
                days: 1,
                window: HistoryWindow::AllHistory
            }
        );
    }
}
