pub(crate) mod dashboard;
pub(crate) mod details;
pub(crate) mod explorer;

use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::theme;

pub(crate) fn panel<'a>(title: impl Into<String>) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY))
        .title(Span::styled(format!(" {} ", title.into()), theme::title_style()))
}

/// Centered dim message inside a titled panel, for empty states.
pub(crate) fn render_message(f: &mut Frame, area: Rect, title: &str, lines: &[&str]) {
    let mut text = vec![Line::from("")];
    text.extend(
        lines
            .iter()
            .map(|l| Line::from(Span::styled(l.to_string(), theme::dim_style()))),
    );
    f.render_widget(Paragraph::new(text).centered().block(panel(title)), area);
}

pub(crate) fn render_accounts_unavailable(f: &mut Frame, area: Rect, title: &str) {
    render_message(
        f,
        area,
        title,
        &[
            "The Accounts table is not available in this database.",
            "",
            "See :tables for what it does contain, or :r to retry.",
        ],
    );
}
