//! Dashboard HTML
//!
//! Server-rendered page for a [`DashboardView`]. The vote form posts back to
//! `/vote` and the response is the re-rendered page.

use std::fmt::Write;

use super::{DashboardView, Notice, Section};
use crate::charts::svg::escape;
use crate::charts::{render_bar_chart, render_line_chart};

const TREND_HEADER: &str = "📈 급식 칼로리 추이";
const VOTE_HEADER: &str = "🗳️ 메뉴 투표하기";
const TALLY_HEADER: &str = "📊 실시간 투표 현황";
const VOTE_PROMPT: &str = "마음에 드는 급식 메뉴에 투표해 주세요.";
const VOTE_LABEL: &str = "메뉴를 선택하세요:";
const VOTE_BUTTON: &str = "투표하기";

const STYLE: &str = "body{font-family:sans-serif;max-width:1100px;margin:0 auto;padding:1rem}\
h1,h3.sub{text-align:center}\
.notice{padding:.75rem 1rem;border-radius:.5rem;margin:.5rem 0}\
.success{background:#e8f5e9;color:#1b5e20}\
.warning{background:#fff8e1;color:#8d6e00}\
.error{background:#ffebee;color:#b71c1c}\
fieldset{border:1px solid #ddd;border-radius:.5rem;padding:1rem}\
label{display:block;margin:.25rem 0}";

/// Render the full HTML document
pub fn render_html(view: &DashboardView) -> String {
    let mut out = String::with_capacity(16 * 1024);

    let _ = write!(
        out,
        "<!DOCTYPE html><html lang=\"ko\"><head><meta charset=\"utf-8\">\
<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\
<title>{title}</title><style>{style}</style></head><body>",
        title = escape(view.title),
        style = STYLE
    );
    let _ = write!(
        out,
        "<h1>{}</h1><h3 class=\"sub\">{}</h3><hr>",
        escape(view.title),
        escape(view.subtitle)
    );

    for notice in &view.notices {
        let (class, message) = match notice {
            Notice::Success(m) => ("success", m),
            Notice::Warning(m) => ("warning", m),
            Notice::Error(m) => ("error", m),
        };
        let _ = write!(
            out,
            "<div class=\"notice {}\" role=\"status\">{}</div>",
            class,
            escape(message)
        );
    }

    for section in &view.sections {
        match section {
            Section::Trend { chart } => {
                let _ = write!(
                    out,
                    "<section id=\"trend\"><h2>{}</h2>{}</section><hr>",
                    TREND_HEADER,
                    render_line_chart(chart)
                );
            }
            Section::VoteForm { choices, selected } => {
                vote_form(&mut out, choices, selected.as_deref());
            }
            Section::Tally { chart } => {
                let _ = write!(
                    out,
                    "<section id=\"tally\"><h2>{}</h2>{}</section>",
                    TALLY_HEADER,
                    render_bar_chart(chart)
                );
            }
        }
    }

    out.push_str("</body></html>");
    out
}

fn vote_form(out: &mut String, choices: &[String], selected: Option<&str>) {
    let _ = write!(
        out,
        "<section id=\"vote\"><h2>{}</h2><form method=\"post\" action=\"/vote\"><fieldset>\
<legend>{}</legend><p>{}</p>",
        VOTE_HEADER, VOTE_LABEL, VOTE_PROMPT
    );

    for choice in choices {
        let checked = if Some(choice.as_str()) == selected {
            " checked"
        } else {
            ""
        };
        let _ = write!(
            out,
            "<label><input type=\"radio\" name=\"dish\" value=\"{v}\"{checked}> {v}</label>",
            v = escape(choice),
            checked = checked
        );
    }

    let _ = write!(
        out,
        "</fieldset><button type=\"submit\">{}</button></form></section><hr>",
        VOTE_BUTTON
    );
}
