//! Dashboard Render Pass
//!
//! One request recomputes the whole page from the cached dataset and the
//! caller's tally: notices first, then the trend chart, the vote form and
//! the tally chart. Without a loaded dataset only the notices are produced.

pub mod page;

use serde::Serialize;

use crate::charts::{tally_chart, trend_chart, BarChart, LineChart};
use crate::dataset::LoadOutcome;
use crate::tally::{TallyError, VoteReceipt, VoteTally};

pub use page::render_html;

pub const PAGE_TITLE: &str = "🍽️ 맛있는 급식 투표소 🗳️";
pub const PAGE_SUBTITLE: &str =
    "오늘의 급식 메뉴에 투표하고, 다음 급식 메뉴를 정하는 데 참여해 보세요!";

const LOAD_WARNING: &str = "데이터를 로드하는 데 실패했습니다. 파일 경로를 확인해주세요.";

/// User-visible message above the sections
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "level", content = "message", rename_all = "snake_case")]
pub enum Notice {
    Success(String),
    Warning(String),
    Error(String),
}

/// One block of the page
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Section {
    Trend {
        chart: LineChart,
    },
    VoteForm {
        choices: Vec<String>,
        selected: Option<String>,
    },
    Tally {
        chart: BarChart,
    },
}

/// Everything needed to draw the page once
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DashboardView {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub notices: Vec<Notice>,
    pub sections: Vec<Section>,
}

impl DashboardView {
    pub fn is_loaded(&self) -> bool {
        !self.sections.is_empty()
    }
}

/// Seed the tally from the dataset's dish names, once per session
pub fn seed_tally(outcome: &LoadOutcome, tally: &mut VoteTally) {
    if let Some(table) = outcome.table().filter(|_| outcome.is_loaded()) {
        tally.initialize(table.distinct_dishes());
    }
}

/// Build the page for the current dataset and tally.
///
/// `receipt` is the acknowledgment of a vote recorded in this request.
pub fn render_pass(
    outcome: &LoadOutcome,
    tally: &mut VoteTally,
    receipt: Option<&VoteReceipt>,
) -> DashboardView {
    let mut notices = Vec::new();
    let mut sections = Vec::new();

    match outcome {
        LoadOutcome::Missing { path } => {
            notices.push(Notice::Error(format!(
                "`{}` 파일을 찾을 수 없습니다. 파일이 있는지 확인해주세요.",
                path.display()
            )));
            notices.push(Notice::Warning(LOAD_WARNING.to_string()));
        }
        LoadOutcome::Failed { reason, .. } => {
            notices.push(Notice::Error(reason.clone()));
            notices.push(Notice::Warning(LOAD_WARNING.to_string()));
        }
        LoadOutcome::Loaded(_) if !outcome.is_loaded() => {
            notices.push(Notice::Warning(LOAD_WARNING.to_string()));
        }
        LoadOutcome::Loaded(table) => {
            seed_tally(outcome, tally);

            if let Some(receipt) = receipt {
                notices.push(Notice::Success(receipt.message.to_string()));
            }

            let choices: Vec<String> = tally.choices().map(str::to_string).collect();
            let selected = receipt
                .map(|r| r.dish.clone())
                .or_else(|| choices.first().cloned());

            sections.push(Section::Trend {
                chart: trend_chart(&table.records),
            });
            sections.push(Section::VoteForm { choices, selected });
            sections.push(Section::Tally {
                chart: tally_chart(tally),
            });
        }
    }

    DashboardView {
        title: PAGE_TITLE,
        subtitle: PAGE_SUBTITLE,
        notices,
        sections,
    }
}

/// Record a vote submitted from the form or the API
pub fn cast_vote(
    outcome: &LoadOutcome,
    tally: &mut VoteTally,
    dish: &str,
) -> Result<VoteReceipt, TallyError> {
    seed_tally(outcome, tally);
    tally.record_vote(dish)
}
