//! Chart Specs
//!
//! Plain data descriptions of the two dashboard charts. They are rebuilt
//! from current state on every render pass and can be serialized for API
//! clients or drawn server-side by [`svg`].

pub mod svg;

use chrono::NaiveDate;
use serde::Serialize;

use crate::dataset::MealRecord;
use crate::tally::VoteTally;

pub use svg::{render_bar_chart, render_line_chart};

pub const TREND_TITLE: &str = "일별 급식 칼로리 변화";
pub const TREND_X_LABEL: &str = "날짜";
pub const TREND_Y_LABEL: &str = "칼로리 (Kcal)";

pub const TALLY_TITLE: &str = "실시간 메뉴 투표 현황";
pub const TALLY_X_LABEL: &str = "급식 메뉴";
pub const TALLY_Y_LABEL: &str = "투표 수";

/// One point on the calorie trend
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub dish: String,
    /// `None` is drawn as a gap
    pub calories: Option<f64>,
}

/// Calories over date, in dataset order
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LineChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub points: Vec<TrendPoint>,
}

/// One bar of the tally chart
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Bar {
    pub label: String,
    pub value: u64,
}

/// Vote counts, highest first
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct BarChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub bars: Vec<Bar>,
}

/// Build the calorie trend from loaded records.
///
/// Points follow the record order. Repeated dish names on different dates
/// stay separate points.
pub fn trend_chart(records: &[MealRecord]) -> LineChart {
    LineChart {
        title: TREND_TITLE.to_string(),
        x_label: TREND_X_LABEL.to_string(),
        y_label: TREND_Y_LABEL.to_string(),
        points: records
            .iter()
            .map(|r| TrendPoint {
                date: r.date,
                dish: r.dish_name.clone(),
                calories: r.calories,
            })
            .collect(),
    }
}

/// Build the tally chart, sorted by count descending
pub fn tally_chart(tally: &VoteTally) -> BarChart {
    BarChart {
        title: TALLY_TITLE.to_string(),
        x_label: TALLY_X_LABEL.to_string(),
        y_label: TALLY_Y_LABEL.to_string(),
        bars: tally
            .sorted()
            .into_iter()
            .map(|e| Bar {
                label: e.dish,
                value: e.count,
            })
            .collect(),
    }
}
