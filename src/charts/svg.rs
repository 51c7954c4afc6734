//! SVG Chart Rendering
//!
//! Draws chart specs as standalone SVG documents for the server-rendered
//! dashboard page.

use std::fmt::Write;

use super::{BarChart, LineChart};

const WIDTH: f64 = 800.0;
const HEIGHT: f64 = 400.0;

const MARGIN_LEFT: f64 = 60.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_TOP: f64 = 40.0;
const MARGIN_BOTTOM: f64 = 60.0;

const GRID_LINES: usize = 5;
const DATE_LABELS: i64 = 5;

const LINE_COLOR: &str = "#4CAF50";
const GRID_COLOR: &str = "#e5e7eb";
const LABEL_COLOR: &str = "#6b7280";

/// Viridis stops, low to high
const BAR_COLORS: [&str; 5] = ["#440154", "#3b528b", "#21918c", "#5ec962", "#fde725"];

/// Escape text for inclusion in SVG or HTML
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn chart_width() -> f64 {
    WIDTH - MARGIN_LEFT - MARGIN_RIGHT
}

fn chart_height() -> f64 {
    HEIGHT - MARGIN_TOP - MARGIN_BOTTOM
}

fn open_svg(out: &mut String, title: &str) {
    let _ = write!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {w} {h}" width="100%" role="img" font-family="sans-serif">"#,
        w = WIDTH,
        h = HEIGHT
    );
    let _ = write!(
        out,
        r#"<text x="{x}" y="24" text-anchor="middle" font-size="20">{t}</text>"#,
        x = WIDTH / 2.0,
        t = escape(title)
    );
}

fn axis_labels(out: &mut String, x_label: &str, y_label: &str) {
    let _ = write!(
        out,
        r#"<text x="{x}" y="{y}" text-anchor="middle" font-size="13" fill="{c}">{t}</text>"#,
        x = MARGIN_LEFT + chart_width() / 2.0,
        y = HEIGHT - 8.0,
        c = LABEL_COLOR,
        t = escape(x_label)
    );
    let _ = write!(
        out,
        r#"<text x="14" y="{y}" text-anchor="middle" font-size="13" fill="{c}" transform="rotate(-90 14 {y})">{t}</text>"#,
        y = MARGIN_TOP + chart_height() / 2.0,
        c = LABEL_COLOR,
        t = escape(y_label)
    );
}

/// Horizontal grid with value labels between `min` and `max`
fn grid(out: &mut String, min: f64, max: f64, lines: usize) {
    for i in 0..=lines {
        let y = MARGIN_TOP + (i as f64 / lines as f64) * chart_height();
        let value = max - (i as f64 / lines as f64) * (max - min);
        let _ = write!(
            out,
            r#"<line x1="{x1}" y1="{y:.1}" x2="{x2}" y2="{y:.1}" stroke="{c}"/>"#,
            x1 = MARGIN_LEFT,
            x2 = WIDTH - MARGIN_RIGHT,
            c = GRID_COLOR
        );
        let _ = write!(
            out,
            r#"<text x="{x}" y="{ty:.1}" text-anchor="end" font-size="12" fill="{c}">{v:.0}</text>"#,
            x = MARGIN_LEFT - 6.0,
            ty = y + 4.0,
            c = LABEL_COLOR,
            v = value
        );
    }
}

fn no_data(out: &mut String) {
    let _ = write!(
        out,
        r#"<text x="{x}" y="{y}" text-anchor="middle" font-size="16" fill="{c}">No data</text>"#,
        x = WIDTH / 2.0,
        y = HEIGHT / 2.0,
        c = LABEL_COLOR
    );
}

fn empty_chart(mut out: String, chart: &LineChart) -> String {
    no_data(&mut out);
    axis_labels(&mut out, &chart.x_label, &chart.y_label);
    out.push_str("</svg>");
    out
}

/// Render the calorie trend.
///
/// X positions come from the date, but the line is drawn in point order, so
/// an unsorted source draws back and forth. Points without calories break
/// the line.
pub fn render_line_chart(chart: &LineChart) -> String {
    let mut out = String::new();
    open_svg(&mut out, &chart.title);

    let values: Vec<f64> = chart.points.iter().filter_map(|p| p.calories).collect();
    let first_day = chart.points.iter().map(|p| p.date).min();
    let last_day = chart.points.iter().map(|p| p.date).max();
    let (Some(start), Some(end)) = (first_day, last_day) else {
        return empty_chart(out, chart);
    };
    if values.is_empty() {
        return empty_chart(out, chart);
    }

    let mut min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let mut max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;
    let padding = if range > 0.0 { range * 0.1 } else { 1.0 };
    min -= padding;
    max += padding;

    grid(&mut out, min, max, GRID_LINES);

    // Date axis; the span is at least one day
    let span_days = (end - start).num_days().max(1) as f64;

    let x_of = |date: chrono::NaiveDate| {
        MARGIN_LEFT + ((date - start).num_days() as f64 / span_days) * chart_width()
    };
    let y_of = |value: f64| MARGIN_TOP + ((max - value) / (max - min)) * chart_height();

    let mut path = String::new();
    let mut pen_down = false;
    for point in &chart.points {
        match point.calories {
            Some(value) => {
                let cmd = if pen_down { 'L' } else { 'M' };
                let _ = write!(path, "{}{:.1},{:.1} ", cmd, x_of(point.date), y_of(value));
                pen_down = true;
            }
            None => pen_down = false,
        }
    }
    let _ = write!(
        out,
        r#"<path d="{d}" fill="none" stroke="{c}" stroke-width="2"/>"#,
        d = path.trim_end(),
        c = LINE_COLOR
    );

    for point in &chart.points {
        if let Some(value) = point.calories {
            let _ = write!(
                out,
                r#"<circle cx="{x:.1}" cy="{y:.1}" r="3" fill="{c}"><title>{date} {dish}: {v} kcal</title></circle>"#,
                x = x_of(point.date),
                y = y_of(value),
                c = LINE_COLOR,
                date = point.date,
                dish = escape(&point.dish),
                v = value
            );
        }
    }

    for i in 0..=DATE_LABELS {
        let offset = (end - start).num_days() * i / DATE_LABELS;
        let date = start + chrono::Duration::days(offset);
        let x = MARGIN_LEFT + (i as f64 / DATE_LABELS as f64) * chart_width();
        let _ = write!(
            out,
            r#"<text x="{x:.1}" y="{y}" text-anchor="middle" font-size="12" fill="{c}">{d}</text>"#,
            y = HEIGHT - MARGIN_BOTTOM + 18.0,
            c = LABEL_COLOR,
            d = date.format("%m/%d")
        );
    }

    axis_labels(&mut out, &chart.x_label, &chart.y_label);
    out.push_str("</svg>");
    out
}

/// Render the tally bars left to right in the given order
pub fn render_bar_chart(chart: &BarChart) -> String {
    let mut out = String::new();
    open_svg(&mut out, &chart.title);

    if chart.bars.is_empty() {
        no_data(&mut out);
        axis_labels(&mut out, &chart.x_label, &chart.y_label);
        out.push_str("</svg>");
        return out;
    }

    // Whole-vote ticks: at most GRID_LINES steps, axis top rounded up to a step
    let peak = chart.bars.iter().map(|b| b.value).max().unwrap_or(0).max(1);
    let step = peak.div_ceil(GRID_LINES as u64);
    let lines = peak.div_ceil(step);
    let max = (step * lines) as f64;
    grid(&mut out, 0.0, max, lines as usize);

    let slot = chart_width() / chart.bars.len() as f64;
    let bar_width = slot * 0.7;

    for (i, bar) in chart.bars.iter().enumerate() {
        let ratio = bar.value as f64 / max;
        let height = ratio * chart_height();
        let x = MARGIN_LEFT + i as f64 * slot + (slot - bar_width) / 2.0;
        let y = MARGIN_TOP + chart_height() - height;
        let color_idx = ((ratio * (BAR_COLORS.len() - 1) as f64).round() as usize)
            .min(BAR_COLORS.len() - 1);

        let _ = write!(
            out,
            r#"<rect x="{x:.1}" y="{y:.1}" width="{w:.1}" height="{h:.1}" fill="{c}"><title>{l}: {v}</title></rect>"#,
            w = bar_width,
            h = height,
            c = BAR_COLORS[color_idx],
            l = escape(&bar.label),
            v = bar.value
        );
        let _ = write!(
            out,
            r#"<text x="{cx:.1}" y="{ly}" text-anchor="middle" font-size="12" fill="{c}">{l}</text>"#,
            cx = x + bar_width / 2.0,
            ly = HEIGHT - MARGIN_BOTTOM + 18.0,
            c = LABEL_COLOR,
            l = escape(&bar.label)
        );
    }

    axis_labels(&mut out, &chart.x_label, &chart.y_label);
    out.push_str("</svg>");
    out
}
