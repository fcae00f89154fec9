use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table},
    Frame,
};

use super::{panel, render_accounts_unavailable, render_message};
use crate::models::TIMESTAMP_FORMAT;
use crate::ui::app::{App, ExplorerView};
use crate::ui::theme;
use crate::ui::util::{format_amount, format_cell, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(3)])
        .split(area);

    render_filter_line(f, chunks[0], app);

    match app.explorer_view {
        ExplorerView::Accounts if !app.accounts_available => {
            render_accounts_unavailable(f, chunks[1], "Accounts");
        }
        ExplorerView::Accounts => render_accounts(f, chunks[1], app),
        ExplorerView::Query => render_query(f, chunks[1], app),
        ExplorerView::Tables => render_tables(f, chunks[1], app),
    }
}

fn render_filter_line(f: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![Span::styled(
        format!(" {} ", app.explorer_view),
        theme::selected_style(),
    )];

    let mut push = |label: &str, value: String| {
        spans.push(Span::styled(format!("  {label}: "), theme::dim_style()));
        spans.push(Span::styled(value, theme::normal_style()));
    };
    match app.explorer_view {
        ExplorerView::Accounts => {
            let type_label = app
                .type_filter
                .as_ref()
                .map_or_else(|| "All".to_string(), |t| t.to_string());
            push("Type", type_label);
            if let Some((low, high)) = app.balance_range {
                push(
                    "Balance",
                    format!("{} - {}", format_amount(low), format_amount(high)),
                );
            }
            if let Some(spec) = &app.custom_filter {
                push("Filter", spec.to_string());
            }
        }
        ExplorerView::Query if !app.last_query.is_empty() => {
            push("SQL", truncate(&app.last_query, area.width.saturating_sub(14) as usize));
        }
        ExplorerView::Query | ExplorerView::Tables => {}
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn row_style(i: usize, app: &App) -> ratatui::style::Style {
    if i == app.explorer_index {
        theme::selected_style()
    } else if i % 2 == 1 {
        theme::alt_row_style()
    } else {
        theme::normal_style()
    }
}

fn render_accounts(f: &mut Frame, area: Rect, app: &App) {
    let title = format!("Accounts ({} of {})", app.filtered.len(), app.accounts.len());
    if app.filtered.is_empty() {
        render_message(
            f,
            area,
            &title,
            &["No accounts match the current filters", "", "Press c to clear them"],
        );
        return;
    }

    let header = Row::new(
        ["ID", "Number", "Type", "Balance", "Created", "Last Updated"]
            .iter()
            .map(|h| Cell::from(*h).style(theme::header_style())),
    );
    let rows: Vec<Row> = app
        .filtered
        .iter()
        .enumerate()
        .skip(app.explorer_scroll)
        .take(area.height.saturating_sub(3) as usize)
        .map(|(i, a)| {
            Row::new(vec![
                Cell::from(a.id.to_string()),
                Cell::from(a.number.clone()),
                Cell::from(a.account_type.to_string()),
                Cell::from(Line::from(format_amount(a.balance)).right_aligned()),
                Cell::from(a.created.format(TIMESTAMP_FORMAT).to_string()),
                Cell::from(a.last_updated.format(TIMESTAMP_FORMAT).to_string()),
            ])
            .style(row_style(i, app))
        })
        .collect();

    let widths = [
        Constraint::Length(6),
        Constraint::Length(12),
        Constraint::Length(12),
        Constraint::Length(16),
        Constraint::Length(20),
        Constraint::Length(20),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .column_spacing(2)
        .block(panel(title));
    f.render_widget(table, area);
}

fn render_query(f: &mut Frame, area: Rect, app: &App) {
    let Some(result) = &app.query_result else {
        render_message(
            f,
            area,
            "Query",
            &[
                "No query yet",
                "",
                ":sql SELECT * FROM Accounts WHERE Balance > 5000",
            ],
        );
        return;
    };

    let title = format!("Query ({} rows)", result.len());
    if result.columns.is_empty() {
        render_message(f, area, &title, &["The query returned no columns"]);
        return;
    }

    let header = Row::new(
        result
            .columns
            .iter()
            .map(|c| Cell::from(c.clone()).style(theme::header_style())),
    );
    let rows: Vec<Row> = result
        .records()
        .enumerate()
        .skip(app.explorer_scroll)
        .take(area.height.saturating_sub(3) as usize)
        .map(|(i, record)| {
            Row::new(
                record
                    .iter()
                    .map(|(column, value)| Cell::from(format_cell(column, value))),
            )
            .style(row_style(i, app))
        })
        .collect();

    let widths = vec![Constraint::Fill(1); result.columns.len()];
    let table = Table::new(rows, widths).header(header).block(panel(title));
    f.render_widget(table, area);
}

fn render_tables(f: &mut Frame, area: Rect, app: &App) {
    let title = format!("Tables ({})", app.tables.len());
    if app.tables.is_empty() {
        render_message(f, area, &title, &["This database has no tables"]);
        return;
    }

    let header = Row::new(
        ["Table", "Columns"]
            .iter()
            .map(|h| Cell::from(*h).style(theme::header_style())),
    );
    let rows: Vec<Row> = app
        .tables
        .iter()
        .enumerate()
        .skip(app.explorer_scroll)
        .take(area.height.saturating_sub(3) as usize)
        .map(|(i, (name, columns))| {
            Row::new(vec![Cell::from(name.clone()), Cell::from(columns.join(", "))])
                .style(row_style(i, app))
        })
        .collect();

    let widths = [Constraint::Length(24), Constraint::Fill(1)];
    let table = Table::new(rows, widths).header(header).block(panel(title));
    f.render_widget(table, area);
}
