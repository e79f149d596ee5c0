//! Source code pane rendering with syntax highlighting
//!
//! Shows the program with line numbers. `For(`, `Disp` and `End` are keywords,
//! numeric literals (including the `~` sign) and variable names get their own
//! colors, and `//` comment lines are greyed out. The line a parse error points
//! at is drawn on a red background.

use crate::memory::variables::Var;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Syntax highlighting for one line of source
fn highlight_source_code(line: &str) -> Line<'_> {
    if line.trim_start().starts_with("//") {
        return Line::from(Span::styled(line, Style::default().fg(DEFAULT_THEME.comment)));
    }

    let mut spans = Vec::new();
    let chars: Vec<char> = line.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if c.is_ascii_digit() || c == '.' || c == '~' {
            let start = i;
            i += 1;
            while i < chars.len()
                && (chars[i].is_ascii_digit() || chars[i] == '.' || chars[i] == 'e' || chars[i] == '~')
            {
                i += 1;
            }
            let text: String = chars[start..i].iter().collect();
            spans.push(Span::styled(text, Style::default().fg(DEFAULT_THEME.number)));
            continue;
        }

        if c.is_alphabetic() {
            let start = i;
            while i < chars.len() && chars[i].is_alphabetic() {
                i += 1;
            }
            let word: String = chars[start..i].iter().collect();
            let is_call = chars.get(i) == Some(&'(');
            spans.extend(word_spans(word, is_call));
            continue;
        }

        let style = match c {
            '(' | ')' => Style::default().fg(DEFAULT_THEME.primary),
            ':' => Style::default().fg(DEFAULT_THEME.secondary),
            _ => Style::default().fg(DEFAULT_THEME.fg),
        };
        spans.push(Span::styled(c.to_string(), style));
        i += 1;
    }

    Line::from(spans)
}

/// Style a run of letters. Adjacent variable names are split apart so
/// `AB` shows as two references.
fn word_spans(word: String, is_call: bool) -> Vec<Span<'static>> {
    if let Some(style) = get_keyword_style(&word, is_call) {
        return vec![Span::styled(word, style)];
    }

    let mut spans = Vec::new();
    let mut rest = word.as_str();
    while !rest.is_empty() {
        let matched = Var::ALL
            .iter()
            .map(|v| v.name())
            .filter(|name| rest.starts_with(name))
            .max_by_key(|name| name.len());
        let (text, style) = match matched {
            Some(name) => (name, Style::default().fg(DEFAULT_THEME.variable)),
            None => {
                let len = rest.chars().next().map_or(1, char::len_utf8);
                (&rest[..len], Style::default().fg(DEFAULT_THEME.fg))
            }
        };
        spans.push(Span::styled(text.to_string(), style));
        rest = &rest[text.len()..];
    }
    spans
}

fn get_keyword_style(word: &str, is_call: bool) -> Option<Style> {
    match word {
        "For" if is_call => Some(
            Style::default()
                .fg(DEFAULT_THEME.keyword)
                .add_modifier(Modifier::BOLD),
        ),
        "Disp" | "End" => Some(
            Style::default()
                .fg(DEFAULT_THEME.keyword)
                .add_modifier(Modifier::BOLD),
        ),
        _ => None,
    }
}

/// Render the source code pane
pub fn render_source_pane(
    frame: &mut Frame,
    area: Rect,
    source_code: &str,
    error_line: Option<usize>,
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
        .title(" Source Code ")
        .borders(Borders::ALL)
        .border_style(border_style);

    let lines: Vec<&str> = source_code.split('\n').collect();
    let total_lines = lines.len();
    let visible_height = area.height.saturating_sub(2).max(1) as usize; // Account for borders (2), min 1

    if total_lines > visible_height {
        *scroll_offset = (*scroll_offset).min(total_lines - visible_height);
    } else {
        *scroll_offset = 0;
    }

    let visible_lines: Vec<Line> = lines
        .iter()
        .enumerate()
        .skip(*scroll_offset)
        .take(visible_height)
        .map(|(idx, line)| {
            let line_num = idx + 1;
            let is_error = error_line == Some(line_num);
            let line_num_str = format!("{:4} ", line_num);

            let mut content_line = highlight_source_code(line);
            let num_style = if is_error {
                for span in &mut content_line.spans {
                    span.style = Style::default()
                        .bg(DEFAULT_THEME.error)
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD);
                }
                Style::default()
                    .fg(DEFAULT_THEME.error)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(DEFAULT_THEME.comment)
            };

            let mut final_spans = vec![Span::styled(line_num_str, num_style)];
            final_spans.extend(content_line.spans);
            Line::from(final_spans)
        })
        .collect();

    let paragraph = Paragraph::new(visible_lines).block(block);
    frame.render_widget(paragraph, area);
}
