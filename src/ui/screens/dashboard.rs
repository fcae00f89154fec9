use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Cell, Paragraph, Row, Table},
    Frame,
};
use rust_decimal::prelude::ToPrimitive;

use super::{panel, render_accounts_unavailable};
use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{format_amount, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    if !app.accounts_available {
        render_accounts_unavailable(f, area, "Dashboard");
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // Metric cards
            Constraint::Min(10),   // Type chart + summary
            Constraint::Length(9), // Distribution + top accounts
        ])
        .split(area);

    render_metric_cards(f, chunks[0], app);

    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(chunks[1]);
    render_type_chart(f, middle[0], app);
    render_summary_table(f, middle[1], app);

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(chunks[2]);
    render_distribution(f, bottom[0], app);
    render_top_accounts(f, bottom[1], app);
}

fn render_metric_cards(f: &mut Frame, area: Rect, app: &App) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    let m = &app.overview;
    render_card(
        f,
        cards[0],
        "Total Accounts",
        m.total_accounts.to_string(),
        format!("{} types", m.count_by_type.len()),
    );
    render_card(
        f,
        cards[1],
        "Total Balance",
        format_amount(m.total_balance),
        String::new(),
    );
    render_card(
        f,
        cards[2],
        "Average Balance",
        format_amount(m.average_balance),
        String::new(),
    );
}

fn render_card(f: &mut Frame, area: Rect, title: &str, value: String, subtitle: String) {
    let text = Paragraph::new(vec![
        Line::from(Span::styled(
            value,
            Style::default()
                .fg(theme::SECONDARY)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(subtitle, theme::dim_style())),
    ])
    .centered()
    .block(panel(title));

    f.render_widget(text, area);
}

fn render_type_chart(f: &mut Frame, area: Rect, app: &App) {
    let palette = [theme::PRIMARY, theme::SECONDARY, theme::LIGHT];
    let bars: Vec<Bar> = app
        .breakdown
        .iter()
        .enumerate()
        .map(|(i, b)| {
            Bar::default()
                .value(b.total_balance.to_u64().unwrap_or(0))
                .text_value(format_amount(b.total_balance))
                .label(Line::from(truncate(b.account_type.as_str(), 12)))
                .style(Style::default().fg(palette[i % palette.len()]))
                .value_style(Style::default().fg(theme::HEADER_BG).bg(palette[i % palette.len()]))
        })
        .collect();

    let chart = BarChart::default()
        .block(panel("Balance by Type"))
        .data(BarGroup::default().bars(&bars))
        .bar_width(12)
        .bar_gap(2);

    f.render_widget(chart, area);
}

fn render_summary_table(f: &mut Frame, area: Rect, app: &App) {
    let header = Row::new(
        ["Type", "Count", "Total", "Average", "Min", "Max"]
            .iter()
            .map(|h| Cell::from(*h).style(theme::header_style())),
    );

    let rows: Vec<Row> = app
        .summaries
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let style = if i % 2 == 1 {
                theme::alt_row_style()
            } else {
                theme::normal_style()
            };
            Row::new(vec![
                Cell::from(truncate(s.account_type.as_str(), 12)),
                Cell::from(s.count.to_string()),
                Cell::from(format_amount(s.total_balance)),
                Cell::from(format_amount(s.average_balance)),
                Cell::from(format_amount(s.min_balance)),
                Cell::from(format_amount(s.max_balance)),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(12),
        Constraint::Length(5),
        Constraint::Fill(1),
        Constraint::Fill(1),
        Constraint::Fill(1),
        Constraint::Fill(1),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .block(panel("Summary by Type"));
    f.render_widget(table, area);
}

fn render_distribution(f: &mut Frame, area: Rect, app: &App) {
    let Some(d) = &app.distribution else {
        super::render_message(f, area, "Balance Distribution", &["No accounts"]);
        return;
    };

    let line = |label: &str, value| {
        Line::from(vec![
            Span::styled(format!("  {label:<8}"), theme::dim_style()),
            Span::styled(format_amount(value), theme::normal_style()),
        ])
    };
    let text = vec![
        line("Max", d.max),
        line("Q3", d.q3),
        line("Median", d.median),
        line("Q1", d.q1),
        line("Min", d.min),
    ];
    f.render_widget(
        Paragraph::new(text).block(panel("Balance Distribution")),
        area,
    );
}

fn render_top_accounts(f: &mut Frame, area: Rect, app: &App) {
    let header = Row::new(
        ["Account", "Type", "Balance"]
            .iter()
            .map(|h| Cell::from(*h).style(theme::header_style())),
    );
    let rows: Vec<Row> = app
        .top_accounts
        .iter()
        .map(|a| {
            Row::new(vec![
                Cell::from(a.number.clone()),
                Cell::from(a.account_type.to_string()),
                Cell::from(format_amount(a.balance)),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(14),
        Constraint::Length(12),
        Constraint::Fill(1),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .block(panel(format!("Top {} Accounts", app.top_accounts.len())));
    f.render_widget(table, area);
}
