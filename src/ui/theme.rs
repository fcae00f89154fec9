use ratatui::style::{Color, Modifier, Style};

// Blue palette: primary #1E88E5, secondary #42A5F5, light #90CAF9
pub(crate) const PRIMARY: Color = Color::Rgb(30, 136, 229);
pub(crate) const SECONDARY: Color = Color::Rgb(66, 165, 245);
pub(crate) const LIGHT: Color = Color::Rgb(144, 202, 249);

pub(crate) const HEADER_BG: Color = Color::Rgb(16, 24, 40);
pub(crate) const SURFACE: Color = Color::Rgb(33, 44, 66);
pub(crate) const OVERLAY: Color = Color::Rgb(58, 74, 102);
pub(crate) const COMMAND_BG: Color = Color::Rgb(12, 18, 30);
pub(crate) const TEXT: Color = Color::Rgb(225, 232, 244);
pub(crate) const TEXT_DIM: Color = Color::Rgb(130, 142, 166);
pub(crate) const GREEN: Color = Color::Rgb(129, 199, 132);
pub(crate) const RED: Color = Color::Rgb(239, 154, 154);
pub(crate) const YELLOW: Color = Color::Rgb(255, 224, 130);

pub(crate) fn header_style() -> Style {
    Style::default()
        .fg(LIGHT)
        .bg(HEADER_BG)
        .add_modifier(Modifier::BOLD)
}

pub(crate) fn selected_style() -> Style {
    Style::default().fg(HEADER_BG).bg(SECONDARY)
}

pub(crate) fn normal_style() -> Style {
    Style::default().fg(TEXT)
}

pub(crate) fn dim_style() -> Style {
    Style::default().fg(TEXT_DIM)
}

pub(crate) fn alt_row_style() -> Style {
    Style::default().fg(TEXT).bg(SURFACE)
}

pub(crate) fn title_style() -> Style {
    Style::default().fg(TEXT_DIM).add_modifier(Modifier::BOLD)
}

pub(crate) fn command_bar_style() -> Style {
    Style::default().fg(TEXT).bg(COMMAND_BG)
}

pub(crate) fn status_bar_style() -> Style {
    Style::default().fg(TEXT_DIM).bg(SURFACE)
}

pub(crate) fn error_style() -> Style {
    Style::default().fg(RED).bg(COMMAND_BG)
}
