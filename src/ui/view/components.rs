//! 通用 UI 组件
//!
//! 对话框、输入框、漫画卡片等通用组件

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::models::Webtoon;

pub const ACCENT: Color = Color::Magenta;

/// [组件] 弹窗基础框架
pub fn render_dialog_framework(frame: &mut Frame, area: Rect, title: &str) -> Rect {
    frame.render_widget(Clear, area);
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .style(Style::default().fg(ACCENT));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    inner
}

/// [组件] 带有标题和样式的输入框
pub fn render_input_widget(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    value: &str,
    is_focused: bool,
    active_color: Color,
) {
    let style = if is_focused {
        Style::default()
            .fg(active_color)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };

    let input = Paragraph::new(value)
        .style(style)
        .wrap(Wrap { trim: false })
        .block(Block::default().title(title).borders(Borders::ALL));
    frame.render_widget(input, area);
}

/// 类型徽标 + 话数
pub fn meta_line(item: &Webtoon) -> Line<'_> {
    let mut spans = Vec::new();
    if let Some(genre) = item.genre_label() {
        spans.push(Span::styled(
            format!(" {genre} "),
            Style::default()
                .fg(Color::White)
                .bg(ACCENT)
                .add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::raw("  "));
    }
    spans.push(Span::styled(
        format!("{} 话", item.episodes()),
        Style::default().fg(Color::Gray),
    ));
    Line::from(spans)
}

/// 按字符数截断，超出部分以 … 结尾
pub fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}

/// [组件] 网格模式下的漫画卡片
pub fn render_card(frame: &mut Frame, area: Rect, item: &Webtoon, is_selected: bool) {
    let border_style = if is_selected {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let block = Block::default().borders(Borders::ALL).border_style(border_style);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // 标题
            Constraint::Length(1), // 类型/话数
            Constraint::Min(1),    // 简介
            Constraint::Length(1), // 阅读
        ])
        .split(inner);

    let title = Paragraph::new(Span::styled(
        item.title.as_str(),
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
    ));
    frame.render_widget(title, chunks[0]);
    frame.render_widget(Paragraph::new(meta_line(item)), chunks[1]);

    let description = Paragraph::new(item.description_or_default())
        .style(Style::default().fg(Color::Gray))
        .wrap(Wrap { trim: true });
    frame.render_widget(description, chunks[2]);

    let read = Paragraph::new(Span::styled(
        "[o] 阅读 →",
        Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
    ))
    .alignment(ratatui::layout::Alignment::Right);
    frame.render_widget(read, chunks[3]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("short", 10), "short");
        assert_eq!(truncate_chars("abcdefghij", 5), "abcd…");
        assert_eq!(truncate_chars("漫画画廊很好看", 4), "漫画画…");
    }
}
