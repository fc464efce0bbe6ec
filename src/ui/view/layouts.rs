//! 布局辅助函数

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// 按百分比取居中的矩形
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

/// 网格滚动窗口，返回 (首行, 可见行数)，保证选中行可见
pub fn grid_window(selected_row: usize, total_rows: usize, visible_rows: usize) -> (usize, usize) {
    let visible = visible_rows.max(1).min(total_rows.max(1));
    let first = selected_row.saturating_sub(visible - 1);
    (first, visible)
}
