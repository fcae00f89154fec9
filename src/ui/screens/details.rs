use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Gauge, Paragraph},
    Frame,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use super::{panel, render_accounts_unavailable, render_message};
use crate::models::TIMESTAMP_FORMAT;
use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{format_amount, format_percent};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    if !app.accounts_available {
        render_accounts_unavailable(f, area, "Account Details");
        return;
    }

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(20), Constraint::Min(30)])
        .split(area);

    render_selector(f, columns[0], app);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(8), // Account info
            Constraint::Min(8),    // Comparison chart
            Constraint::Length(3), // Percentile gauge
        ])
        .split(columns[1]);

    let (Some(account), Some(cmp)) = (&app.selected_account, &app.comparison) else {
        render_message(f, columns[1], "Account", &["No account selected"]);
        return;
    };

    let field = |label: &str, value: String| {
        Line::from(vec![
            Span::styled(format!("  {label:<14}"), theme::dim_style()),
            Span::styled(value, theme::normal_style()),
        ])
    };
    let info = vec![
        field("Number", account.number.clone()),
        field("Type", account.account_type.to_string()),
        field("Balance", format_amount(account.balance)),
        field("Created", account.created.format(TIMESTAMP_FORMAT).to_string()),
        field(
            "Last Updated",
            account.last_updated.format(TIMESTAMP_FORMAT).to_string(),
        ),
        field("Account ID", account.id.to_string()),
    ];
    f.render_widget(
        Paragraph::new(info).block(panel(format!("Account {}", account.number))),
        right[0],
    );

    let bar = |label: &str, value: Decimal, color| {
        Bar::default()
            .value(value.to_u64().unwrap_or(0))
            .text_value(format_amount(value))
            .label(Line::from(label.to_string()))
            .style(Style::default().fg(color))
            .value_style(Style::default().fg(theme::HEADER_BG).bg(color))
    };
    let bars = [
        bar("This Account", cmp.balance, theme::PRIMARY),
        bar(
            &format!("{} Avg", account.account_type),
            cmp.type_average,
            theme::SECONDARY,
        ),
        bar("Overall Avg", cmp.overall_average, theme::LIGHT),
    ];
    let chart = BarChart::default()
        .block(panel("Balance Comparison"))
        .data(BarGroup::default().bars(&bars))
        .bar_width(16)
        .bar_gap(3);
    f.render_widget(chart, right[1]);

    let gauge = Gauge::default()
        .block(panel(format!("Percentile among {} accounts", account.account_type)))
        .gauge_style(Style::default().fg(theme::PRIMARY).bg(theme::SURFACE))
        .ratio(cmp.percentile.clamp(0.0, 1.0))
        .label(format!(
            "{} have a lower balance",
            format_percent(cmp.percentile)
        ));
    f.render_widget(gauge, right[2]);
}

fn render_selector(f: &mut Frame, area: Rect, app: &App) {
    let page = area.height.saturating_sub(2) as usize;
    let lines: Vec<Line> = app
        .account_numbers
        .iter()
        .enumerate()
        .skip(app.details_scroll)
        .take(page)
        .map(|(i, number)| {
            if i == app.details_index {
                Line::from(Span::styled(
                    format!(" {number} "),
                    theme::selected_style().add_modifier(Modifier::BOLD),
                ))
            } else {
                Line::from(Span::styled(format!(" {number} "), theme::normal_style()))
            }
        })
        .collect();

    f.render_widget(
        Paragraph::new(lines).block(panel(format!("Accounts ({})", app.account_numbers.len()))),
        area,
    );
}
