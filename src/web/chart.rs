// SVG bar chart of events per day.

use std::collections::BTreeMap;
use std::fmt::Write;

use chrono::NaiveDate;

use super::html::escape;

const WIDTH: usize = 720;
const HEIGHT: usize = 240;
const MARGIN: usize = 40;
const BAR_GAP: usize = 4;

/// Render per-day counts as a standalone SVG document.
pub fn render_chart(title: &str, counts: &BTreeMap<NaiveDate, usize>) -> String {
    let mut svg = String::new();
    let _ = write!(
        svg,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" \
         viewBox=\"0 0 {w} {h}\" font-family=\"sans-serif\" font-size=\"11\">",
        w = WIDTH,
        h = HEIGHT
    );
    let _ = write!(
        svg,
        "<text x=\"{}\" y=\"20\" font-size=\"14\">{}</text>",
        MARGIN,
        escape(title)
    );

    let max = counts.values().copied().max().unwrap_or(0);
    if max == 0 {
        let _ = write!(
            svg,
            "<text x=\"{}\" y=\"{}\" fill=\"#777\">No events</text></svg>",
            MARGIN,
            HEIGHT / 2
        );
        return svg;
    }

    let plot_width = WIDTH - 2 * MARGIN;
    let plot_height = HEIGHT - 2 * MARGIN;
    let slot = plot_width / counts.len();
    let bar_width = slot.saturating_sub(BAR_GAP).max(1);
    let baseline = HEIGHT - MARGIN;

    let _ = write!(
        svg,
        "<line x1=\"{m}\" y1=\"{b}\" x2=\"{x2}\" y2=\"{b}\" stroke=\"#999\"/>",
        m = MARGIN,
        b = baseline,
        x2 = WIDTH - MARGIN
    );

    for (i, (date, count)) in counts.iter().enumerate() {
        let bar_height = (count * plot_height / max).max(1);
        let x = MARGIN + i * slot;
        let y = baseline - bar_height;
        let _ = write!(
            svg,
            "<rect x=\"{x}\" y=\"{y}\" width=\"{bar_width}\" height=\"{bar_height}\" fill=\"#2da44e\">\
             <title>{date}: {count}</title></rect>\
             <text x=\"{tx}\" y=\"{ty}\" text-anchor=\"middle\">{count}</text>\
             <text x=\"{tx}\" y=\"{ly}\" text-anchor=\"middle\" fill=\"#555\">{label}</text>",
            tx = x + bar_width / 2,
            ty = y.saturating_sub(3),
            ly = baseline + 14,
            label = date.format("%m-%d"),
        );
    }

    svg.push_str("</svg>");
    svg
}
