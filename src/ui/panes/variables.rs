//! Variables pane: all 28 values, with the ones the last run changed highlighted

use crate::memory::format::format_number;
use crate::memory::variables::Var;
use crate::snapshot::VariablePanel;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Render the variables pane
pub fn render_variables_pane(
    frame: &mut Frame,
    area: Rect,
    panel: &VariablePanel,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    let block = Block::default()
        .title(format!(" Variables ({} writes) ", panel.writes()))
        .borders(Borders::ALL)
        .border_style(border_style);

    let visible_height = area.height.saturating_sub(2).max(1) as usize;
    let total = Var::ALL.len();
    if total > visible_height {
        *scroll_offset = (*scroll_offset).min(total - visible_height);
    } else {
        *scroll_offset = 0;
    }

    let lines: Vec<Line> = Var::ALL
        .iter()
        .skip(*scroll_offset)
        .take(visible_height)
        .map(|&var| {
            let value_style = if panel.changed(var) {
                Style::default()
                    .fg(DEFAULT_THEME.success)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(DEFAULT_THEME.fg)
            };
            Line::from(vec![
                Span::styled(
                    format!(" {:>5} ", var.name()),
                    Style::default().fg(DEFAULT_THEME.variable),
                ),
                Span::styled("= ", Style::default().fg(DEFAULT_THEME.comment)),
                Span::styled(format_number(panel.value(var)), value_style),
            ])
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
