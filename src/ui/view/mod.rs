//! 视图层模块
//!
//! 包含主渲染入口和各种视图组件

pub mod components;
pub mod layouts;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};

use super::state::{App, AppMode, LoadState, ViewMode};
use components::{
    ACCENT, meta_line, render_card, render_dialog_framework, render_input_widget, truncate_chars,
};
use layouts::{centered_rect, grid_window};

const CARD_HEIGHT: u16 = 7;

/// 渲染 UI
pub fn render(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // 标题 + 统计
            Constraint::Length(3), // 筛选条件
            Constraint::Min(8),    // 列表
            Constraint::Length(1), // 分页
            Constraint::Length(3), // 帮助
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);
    render_filters(frame, app, chunks[1]);
    render_body(frame, app, chunks[2]);
    render_pagination(frame, app, chunks[3]);
    render_help(frame, app, chunks[4]);

    // 渲染弹窗
    match app.mode {
        AppMode::Searching => render_search_dialog(frame, app),
        AppMode::PickingGenre => render_genre_dialog(frame, app),
        AppMode::Detail => render_detail_dialog(frame, app),
        AppMode::Normal => {}
    }
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![Span::styled(
        "📚 漫画画廊",
        Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
    )];
    match &app.stats {
        Some(stats) => spans.push(Span::styled(
            format!(
                "   共 {} 部作品 · {} 话",
                stats.total_webtoons, stats.total_episodes
            ),
            Style::default().fg(Color::White),
        )),
        None => spans.push(Span::styled(
            "   发现精彩漫画",
            Style::default().fg(Color::Gray),
        )),
    }

    let header = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
    frame.render_widget(header, area);
}

fn render_filters(frame: &mut Frame, app: &App, area: Rect) {
    let search = if app.search_term.is_empty() {
        Span::styled("(无)", Style::default().fg(Color::DarkGray))
    } else {
        Span::styled(app.search_term.as_str(), Style::default().fg(Color::Yellow))
    };
    let genre = app.selected_genre.as_deref().unwrap_or("全部类型");
    let view = match app.view_mode {
        ViewMode::Grid => "网格",
        ViewMode::List => "列表",
    };

    let line = Line::from(vec![
        Span::raw("🔍 搜索: "),
        search,
        Span::raw("   类型: "),
        Span::styled(genre, Style::default().fg(Color::Cyan)),
        Span::raw("   视图: "),
        Span::styled(view, Style::default().fg(Color::Cyan)),
    ]);
    let filters = Paragraph::new(line).block(Block::default().title("筛选").borders(Borders::ALL));
    frame.render_widget(filters, area);
}

fn render_body(frame: &mut Frame, app: &App, area: Rect) {
    match &app.load_state {
        LoadState::Errored(msg) => {
            let text = vec![
                Line::from(Span::styled(
                    "错误:",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(msg.as_str(), Style::default().fg(Color::Red))),
                Line::from(""),
                Line::from(Span::styled("按 [r] 重试", Style::default().fg(Color::Gray))),
            ];
            let block = Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red));
            let error = Paragraph::new(text).wrap(Wrap { trim: true }).block(block);
            frame.render_widget(error, area);
        }
        LoadState::Loading { .. } | LoadState::Idle => {
            let loading = Paragraph::new("加载中…")
                .alignment(Alignment::Center)
                .style(Style::default().fg(ACCENT))
                .block(Block::default().borders(Borders::ALL));
            frame.render_widget(loading, centered_vertically(area, 3));
        }
        LoadState::Loaded if app.webtoons.is_empty() => {
            let text = vec![
                Line::from(Span::styled("没有找到漫画", Style::default().fg(Color::Gray))),
                Line::from(Span::styled(
                    "试试调整筛选条件，或先运行爬虫导入数据",
                    Style::default().fg(Color::DarkGray),
                )),
            ];
            let empty = Paragraph::new(text)
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL));
            frame.render_widget(empty, area);
        }
        LoadState::Loaded => match app.view_mode {
            ViewMode::Grid => render_grid(frame, app, area),
            ViewMode::List => render_list(frame, app, area),
        },
    }
}

fn centered_vertically(area: Rect, height: u16) -> Rect {
    let height = height.min(area.height);
    Rect {
        y: area.y + (area.height - height) / 2,
        height,
        ..area
    }
}

fn render_grid(frame: &mut Frame, app: &App, area: Rect) {
    let columns = usize::from(app.grid_columns.max(1));
    let total_rows = app.webtoons.len().div_ceil(columns);
    let selected_row = app.selected_index / columns;
    let (first_row, visible_rows) =
        grid_window(selected_row, total_rows, usize::from(area.height / CARD_HEIGHT));

    let row_areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(CARD_HEIGHT); visible_rows])
        .split(area);

    for (slot, row) in (first_row..total_rows).take(visible_rows).enumerate() {
        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Ratio(1, columns as u32); columns])
            .split(row_areas[slot]);

        for col in 0..columns {
            let index = row * columns + col;
            if let Some(item) = app.webtoons.get(index) {
                render_card(frame, cells[col], item, index == app.selected_index);
            }
        }
    }
}

fn render_list(frame: &mut Frame, app: &App, area: Rect) {
    let desc_width = usize::from(area.width.saturating_sub(6));
    let items: Vec<ListItem> = app
        .webtoons
        .iter()
        .map(|item| {
            let mut first = vec![Span::styled(
                item.title.as_str(),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            )];
            first.push(Span::raw("  "));
            first.extend(meta_line(item).spans);

            let second = Line::from(Span::styled(
                truncate_chars(item.description_or_default(), desc_width),
                Style::default().fg(Color::Gray),
            ));
            ListItem::new(vec![Line::from(first), second])
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().title("漫画列表").borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::REVERSED),
        )
        .highlight_symbol("▶ ");

    let mut state = ListState::default();
    state.select(Some(app.selected_index));

    frame.render_stateful_widget(list, area, &mut state);
}

fn render_pagination(frame: &mut Frame, app: &App, area: Rect) {
    if !app.pagination_visible() {
        return;
    }
    let total = app.total_pages().unwrap_or(1);

    let button = |label: &'static str, enabled: bool| {
        if enabled {
            Span::styled(label, Style::default().fg(Color::White).add_modifier(Modifier::BOLD))
        } else {
            Span::styled(label, Style::default().fg(Color::DarkGray))
        }
    };

    let line = Line::from(vec![
        button("[p] 上一页", app.can_go_prev()),
        Span::raw(format!("   第 {} / {} 页   ", app.current_page, total)),
        button("[n] 下一页", app.can_go_next()),
    ]);
    frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}

fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let help_text = match app.mode {
        AppMode::Normal => {
            "[/] 搜索  [g] 类型  [v] 切换视图  [p/n] 翻页  [Enter] 详情  [o] 阅读  [r] 刷新  [q] 退出"
        }
        AppMode::Searching => "输入关键词后按 [Enter] 搜索  [Esc] 取消",
        AppMode::PickingGenre => "[j/k] 选择  [Enter] 确认  [Esc] 取消",
        AppMode::Detail => "[o] 在浏览器中阅读  [Esc] 关闭",
    };

    let status = match (&app.message, app.last_loaded_at) {
        (Some(msg), _) => msg.clone(),
        (None, Some(at)) => format!("更新于 {}", at.format("%H:%M:%S")),
        (None, None) => String::new(),
    };
    let text = if status.is_empty() {
        help_text.to_string()
    } else {
        format!("{}  |  {}", help_text, status)
    };

    let help = Paragraph::new(text)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(help, area);
}

fn render_search_dialog(frame: &mut Frame, app: &App) {
    let area = centered_rect(60, 30, frame.area());
    let inner = render_dialog_framework(frame, area, "搜索漫画");

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1)])
        .split(inner);

    render_input_widget(
        frame,
        chunks[0],
        "关键词（标题或简介）",
        &app.input_buffer,
        true,
        Color::Yellow,
    );

    let hint = Paragraph::new("按 Enter 搜索，留空则显示全部").style(Style::default().fg(Color::Gray));
    frame.render_widget(hint, chunks[1]);
}

fn render_genre_dialog(frame: &mut Frame, app: &App) {
    let area = centered_rect(40, 60, frame.area());
    let inner = render_dialog_framework(frame, area, "选择类型");

    let items: Vec<ListItem> = app
        .genre_options()
        .into_iter()
        .map(|option| {
            let label = match option {
                None => "全部类型".to_string(),
                Some(genre) => match app.stats.as_ref().and_then(|s| s.count_for(genre)) {
                    Some(count) => format!("{genre} ({count})"),
                    None => genre.to_string(),
                },
            };
            let style = if option == app.selected_genre.as_deref() {
                Style::default().fg(Color::Cyan)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(Line::from(Span::styled(label, style)))
        })
        .collect();

    let list = List::new(items)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("▶ ");

    let mut state = ListState::default();
    state.select(Some(app.genre_cursor));

    frame.render_stateful_widget(list, inner, &mut state);
}

fn render_detail_dialog(frame: &mut Frame, app: &App) {
    let Some(item) = &app.detail else {
        return;
    };
    let area = centered_rect(70, 60, frame.area());
    let inner = render_dialog_framework(frame, area, &item.title);

    let label = |text: &'static str| Span::styled(text, Style::default().fg(Color::Gray));
    let lines = vec![
        meta_line(item),
        Line::from(""),
        Line::from(Span::styled(
            item.description_or_default(),
            Style::default().fg(Color::White),
        )),
        Line::from(""),
        Line::from(vec![
            label("封面: "),
            Span::raw(item.cover_url.as_deref().unwrap_or("(无)")),
        ]),
        Line::from(vec![
            label("链接: "),
            Span::raw(item.detail_link().unwrap_or("(无)")),
        ]),
    ];

    let detail = Paragraph::new(lines).wrap(Wrap { trim: true });
    frame.render_widget(detail, inner);
}

#[cfg(test)]
mod tests {
    use ratatui::{Terminal, backend::TestBackend, buffer::Buffer};

    use super::*;
    use crate::api::{ApiError, CONNECT_ERROR_MESSAGE};
    use crate::models::{Pagination, Webtoon, WebtoonPage};
    use crate::ui::actions::Action;
    use crate::ui::state::Outcome;

    fn comic(id: i64) -> Webtoon {
        Webtoon {
            id,
            title: format!("Comic{id:02}"),
            cover_url: None,
            description: None,
            genre: Some("Action".to_string()),
            num_episodes: Some(12),
            detail_url: Some(format!("https://example.com/{id}")),
        }
    }

    fn mounted_app() -> (App, u64) {
        let mut app = App::new(2);
        app.mount();
        let seq = app
            .take_effects()
            .into_iter()
            .find_map(|e| match e {
                crate::ui::actions::Effect::FetchWebtoons { seq, .. } => Some(seq),
                _ => None,
            })
            .unwrap();
        (app, seq)
    }

    fn loaded(count: i64, total_pages: u32) -> App {
        let (mut app, seq) = mounted_app();
        app.apply(Outcome::Webtoons {
            seq,
            result: Ok(WebtoonPage {
                items: (0..count).map(comic).collect(),
                pagination: Pagination {
                    page: 1,
                    per_page: 12,
                    total: 60,
                    total_pages,
                },
            }),
        });
        app
    }

    /// 宽字符会占用多个单元格，比较前去掉空白
    fn screen_text(buffer: &Buffer) -> String {
        buffer
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect::<String>()
            .split_whitespace()
            .collect()
    }

    fn draw(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 60)).unwrap();
        terminal.draw(|f| render(f, app)).unwrap();
        screen_text(terminal.backend().buffer())
    }

    fn contains(screen: &str, needle: &str) -> bool {
        let needle: String = needle.split_whitespace().collect();
        screen.contains(&needle)
    }

    #[test]
    fn test_grid_shows_twelve_cards_and_pagination() {
        let mut app = loaded(12, 5);
        let screen = draw(&mut app);
        for id in 0..12 {
            assert!(contains(&screen, &format!("Comic{id:02}")), "missing card {id}");
        }
        assert!(contains(&screen, "第 1 / 5 页"));
        assert!(contains(&screen, "[n] 下一页"));
        assert!(contains(&screen, "暂无简介"));
    }

    #[test]
    fn test_list_view_renders_same_collection() {
        let mut app = loaded(12, 5);
        app.dispatch(Action::ToggleViewMode);
        let screen = draw(&mut app);
        assert!(contains(&screen, "漫画列表"));
        for id in 0..12 {
            assert!(contains(&screen, &format!("Comic{id:02}")));
        }
    }

    #[test]
    fn test_error_screen_has_no_cards_or_pagination() {
        let (mut app, seq) = mounted_app();
        app.apply(Outcome::Webtoons {
            seq,
            result: Err(ApiError::Server(Some("Invalid genre".to_string()))),
        });
        let screen = draw(&mut app);
        assert!(contains(&screen, "Invalid genre"));
        assert!(!contains(&screen, "Comic"));
        assert!(!contains(&screen, "下一页"));
    }

    #[test]
    fn test_connect_error_screen() {
        let (mut app, seq) = mounted_app();
        app.apply(Outcome::Webtoons {
            seq,
            result: Err(ApiError::HttpClientBuild("tls".to_string())),
        });
        let screen = draw(&mut app);
        assert!(contains(&screen, CONNECT_ERROR_MESSAGE));
    }

    #[test]
    fn test_single_page_hides_pagination() {
        let mut app = loaded(3, 1);
        let screen = draw(&mut app);
        assert!(contains(&screen, "Comic02"));
        assert!(!contains(&screen, "下一页"));
    }

    #[test]
    fn test_empty_result() {
        let mut app = loaded(0, 0);
        let screen = draw(&mut app);
        assert!(contains(&screen, "没有找到漫画"));
    }

    #[test]
    fn test_loading_screen() {
        let (mut app, _) = mounted_app();
        let screen = draw(&mut app);
        assert!(contains(&screen, "加载中"));
    }

    #[test]
    fn test_genre_dialog_lists_all_option() {
        let mut app = loaded(3, 1);
        app.apply(Outcome::Genres(Ok(vec!["Romance".to_string()])));
        app.dispatch(Action::StartPickGenre);
        let screen = draw(&mut app);
        assert!(contains(&screen, "全部类型"));
        assert!(contains(&screen, "Romance"));
    }

    #[test]
    fn test_detail_dialog() {
        let mut app = loaded(3, 1);
        app.dispatch(Action::Submit);
        let screen = draw(&mut app);
        assert!(contains(&screen, "https://example.com/0"));
    }
}
