//! Drawing of the form application

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    prelude::*,
    widgets::{
        Block, Borders, Clear, List, ListItem, ListState, Paragraph, Scrollbar,
        ScrollbarOrientation, ScrollbarState, Tabs, Wrap,
    },
};

use super::app::{App, PickerOverlay, ResultPane, Tab};
use super::model::{Field, FieldKind, Focus, Form, Section};
use super::picker::FileEntry;

const CURSOR: &str = "▌";
const MIN_AREA_LINES: usize = 3;

/// Render the complete form UI. Drawing clamps the active tab's result scroll.
pub fn draw(f: &mut Frame, app: &mut App) {
    let area = f.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tab bar
            Constraint::Length(2), // Converter help
            Constraint::Min(6),    // Form and result
            Constraint::Length(1), // Help bar
        ])
        .split(area);

    render_tab_bar(f, chunks[0], app);

    let tab = app.active_tab();
    let help = Paragraph::new(Line::from(vec![
        Span::styled("  ", Style::default()),
        Span::styled(tab.help.as_str(), Style::default().fg(Color::DarkGray).italic()),
    ]));
    f.render_widget(help, chunks[1]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(chunks[2]);
    render_form(f, body[0], tab);
    let active = app.active;
    render_result(f, body[1], &mut app.tabs[active]);

    render_help_bar(f, chunks[3], app);

    if let Some(overlay) = &app.picker {
        render_file_picker(f, overlay);
    }
    if app.show_quit_confirm {
        render_quit_confirm_overlay(f);
    }
}

fn render_tab_bar(f: &mut Frame, area: Rect, app: &App) {
    let titles: Vec<Line> = app
        .tabs
        .iter()
        .map(|tab| {
            let marker = if tab.is_running() { " …" } else { "" };
            Line::from(format!(" {}{} ", tab.title(), marker))
        })
        .collect();

    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Uniconv ")
                .title_style(Style::default().fg(Color::Cyan).bold()),
        )
        .select(app.active)
        .style(Style::default().fg(Color::DarkGray))
        .highlight_style(Style::default().fg(Color::Black).bg(Color::Cyan).bold());
    f.render_widget(tabs, area);
}

fn render_form(f: &mut Frame, area: Rect, tab: &Tab) {
    let color = if tab.is_running() {
        Color::DarkGray
    } else {
        Color::Cyan
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
        .title(format!(" {} ", tab.title()))
        .title_style(Style::default().fg(color).bold());
    let inner = block.inner(area);
    f.render_widget(block, area);

    let (lines, focused_line) = form_lines(&tab.form, !tab.is_running());
    // Keep the focused control on screen
    let height = inner.height as usize;
    let scroll = focused_line.saturating_sub(height.saturating_sub(2));
    let paragraph = Paragraph::new(lines).scroll((scroll as u16, 0));
    f.render_widget(paragraph, inner);
}

/// Lines of the form and the index of the line holding focus.
fn form_lines(form: &Form, enabled: bool) -> (Vec<Line<'static>>, usize) {
    let mut lines = Vec::new();
    let mut focused_line = 0;
    let focus = enabled.then_some(form.focus);

    for (section_index, section) in form.sections.iter().enumerate() {
        match section {
            Section::Choice(choice) => {
                lines.push(section_title("Mode"));
                if !choice.required {
                    let target = Focus::Radio {
                        section: section_index,
                        option: None,
                    };
                    if focus == Some(target) {
                        focused_line = lines.len();
                    }
                    lines.push(radio_line(
                        "(none)",
                        "",
                        choice.selected.is_none(),
                        focus == Some(target),
                    ));
                }
                for (option_index, option) in choice.options.iter().enumerate() {
                    let target = Focus::Radio {
                        section: section_index,
                        option: Some(option_index),
                    };
                    if focus == Some(target) {
                        focused_line = lines.len();
                    }
                    lines.push(radio_line(
                        &option.label,
                        &option.help,
                        choice.selected == Some(option_index),
                        focus == Some(target),
                    ));
                }
                if let Some(index) = choice.selected {
                    if let Some(field) = choice.options.get(index).filter(|f| f.has_input()) {
                        lines.push(Line::from(""));
                        let target = Focus::Field {
                            section: section_index,
                            field: index,
                        };
                        if focus == Some(target) {
                            focused_line = lines.len();
                        }
                        push_field(&mut lines, field, focus == Some(target));
                    }
                }
            }
            Section::Plain(fields) => {
                lines.push(section_title("Options"));
                for (field_index, field) in fields.iter().enumerate() {
                    let target = Focus::Field {
                        section: section_index,
                        field: field_index,
                    };
                    if focus == Some(target) {
                        focused_line = lines.len();
                    }
                    push_field(&mut lines, field, focus == Some(target));
                }
            }
        }
        lines.push(Line::from(""));
    }

    if focus == Some(Focus::Execute) {
        focused_line = lines.len();
    }
    let button_style = if focus == Some(Focus::Execute) {
        Style::default().fg(Color::Black).bg(Color::Green).bold()
    } else if enabled {
        Style::default().fg(Color::Green).bold()
    } else {
        Style::default().fg(Color::DarkGray)
    };
    lines.push(Line::from(vec![
        Span::raw("  "),
        Span::styled("[ Execute ]", button_style),
    ]));

    (lines, focused_line)
}

fn section_title(title: &str) -> Line<'static> {
    Line::from(Span::styled(
        format!(" {}", title),
        Style::default().fg(Color::Yellow).bold(),
    ))
}

fn radio_line(label: &str, help: &str, selected: bool, focused: bool) -> Line<'static> {
    let marker = if selected { "(•)" } else { "( )" };
    let style = if focused {
        Style::default().fg(Color::Black).bg(Color::Cyan).bold()
    } else if selected {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::White)
    };
    Line::from(vec![
        Span::raw("  "),
        Span::styled(format!("{} {}", marker, label), style),
        Span::styled(format!("  {}", help), Style::default().fg(Color::DarkGray)),
    ])
}

fn push_field(lines: &mut Vec<Line<'static>>, field: &Field, focused: bool) {
    let label_style = if focused {
        Style::default().fg(Color::Black).bg(Color::Cyan).bold()
    } else {
        Style::default().fg(Color::White).bold()
    };
    let cursor = if focused { CURSOR } else { "" };

    match field.kind {
        FieldKind::Check => {
            let marker = if field.checked { "[x]" } else { "[ ]" };
            lines.push(Line::from(vec![
                Span::raw("  "),
                Span::styled(format!("{} {}", marker, field.label), label_style),
                Span::styled(format!("  {}", field.help), Style::default().fg(Color::DarkGray)),
            ]));
        }
        FieldKind::Line | FieldKind::SavePath => {
            let mut spans = vec![
                Span::raw("  "),
                Span::styled(format!("{}:", field.label), label_style),
                Span::raw(" "),
                Span::styled(field.text.clone(), Style::default().fg(Color::White)),
                Span::styled(cursor, Style::default().fg(Color::Cyan)),
            ];
            if field.kind == FieldKind::SavePath && focused {
                spans.push(Span::styled(
                    "  Ctrl+O browse",
                    Style::default().fg(Color::DarkGray),
                ));
            }
            lines.push(Line::from(spans));
            if field.text.is_empty() {
                lines.push(Line::from(Span::styled(
                    format!("    {}", field.help),
                    Style::default().fg(Color::DarkGray),
                )));
            }
        }
        FieldKind::Area => {
            lines.push(Line::from(vec![
                Span::raw("  "),
                Span::styled(format!("{}:", field.label), label_style),
                Span::styled(format!("  {}", field.help), Style::default().fg(Color::DarkGray)),
            ]));
            let mut rows: Vec<&str> = field.text.split('\n').collect();
            while rows.len() < MIN_AREA_LINES {
                rows.push("");
            }
            let last = field.text.split('\n').count() - 1;
            for (index, row) in rows.iter().enumerate() {
                let mut spans = vec![
                    Span::styled("  │ ", Style::default().fg(Color::DarkGray)),
                    Span::styled(row.to_string(), Style::default().fg(Color::White)),
                ];
                if index == last {
                    spans.push(Span::styled(cursor, Style::default().fg(Color::Cyan)));
                }
                lines.push(Line::from(spans));
            }
        }
    }
}

fn render_result(f: &mut Frame, area: Rect, tab: &mut Tab) {
    let (text, style, border) = match &tab.result {
        ResultPane::Empty => (
            "Press F5 or [ Execute ] to convert".to_string(),
            Style::default().fg(Color::DarkGray).italic(),
            Color::DarkGray,
        ),
        ResultPane::Running => (
            "Running…".to_string(),
            Style::default().fg(Color::Yellow),
            Color::Yellow,
        ),
        ResultPane::Success(output) => (
            output.clone(),
            Style::default().fg(Color::White),
            Color::Green,
        ),
        ResultPane::Failure(message) => (
            message.clone(),
            Style::default().fg(Color::Red),
            Color::Red,
        ),
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(" Result ")
        .title_style(Style::default().fg(border).bold());
    let inner = block.inner(area);

    let width = inner.width as usize;
    let content_height: usize = text.lines().map(|line| wrapped_rows(line, width)).sum();
    let visible_height = inner.height as usize;
    let max_scroll = u16::try_from(content_height.saturating_sub(visible_height)).unwrap_or(u16::MAX);
    if tab.result_scroll > max_scroll {
        tab.result_scroll = max_scroll;
    }

    let paragraph = Paragraph::new(text)
        .style(style)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((tab.result_scroll, 0));
    f.render_widget(paragraph, area);

    if max_scroll > 0 {
        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .begin_symbol(Some("▲"))
            .end_symbol(Some("▼"));
        let mut scrollbar_state =
            ScrollbarState::new(max_scroll as usize).position(tab.result_scroll as usize);
        let scrollbar_area = Rect::new(
            area.x + area.width.saturating_sub(1),
            inner.y,
            1,
            inner.height,
        );
        f.render_stateful_widget(scrollbar, scrollbar_area, &mut scrollbar_state);
    }
}

/// Rows `line` takes when word-wrapped to `width` columns. Words longer
/// than a row are broken across rows.
fn wrapped_rows(line: &str, width: usize) -> usize {
    if width == 0 {
        return 1;
    }

    let mut rows = 1;
    let mut column = 0;
    for word in line.split(' ') {
        let len = word.chars().count();
        let needed = if column == 0 { len } else { column + 1 + len };
        if needed <= width {
            column = needed;
            continue;
        }
        if column > 0 {
            rows += 1;
        }
        rows += len.saturating_sub(1) / width;
        column = match len % width {
            0 => width,
            rest => rest,
        };
    }
    rows
}

fn render_help_bar(f: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![
        Span::styled("  Tab", Style::default().fg(Color::Cyan)),
        Span::styled(" next  ", Style::default().fg(Color::DarkGray)),
        Span::styled("Space", Style::default().fg(Color::Cyan)),
        Span::styled(" select  ", Style::default().fg(Color::DarkGray)),
        Span::styled("F5", Style::default().fg(Color::Cyan)),
        Span::styled(" execute  ", Style::default().fg(Color::DarkGray)),
        Span::styled("PgUp/PgDn", Style::default().fg(Color::Cyan)),
        Span::styled(" converter  ", Style::default().fg(Color::DarkGray)),
        Span::styled("Shift+↑/↓", Style::default().fg(Color::Cyan)),
        Span::styled(" result  ", Style::default().fg(Color::DarkGray)),
    ];

    let focused_kind = app.active_tab().form.focused_field().map(|field| field.kind);
    if focused_kind == Some(FieldKind::SavePath) {
        spans.push(Span::styled("Ctrl+O", Style::default().fg(Color::Cyan)));
        spans.push(Span::styled(" browse  ", Style::default().fg(Color::DarkGray)));
    }
    if matches!(
        focused_kind,
        Some(FieldKind::Line | FieldKind::Area | FieldKind::SavePath)
    ) {
        spans.push(Span::styled("Ctrl+U", Style::default().fg(Color::Cyan)));
        spans.push(Span::styled(" clear  ", Style::default().fg(Color::DarkGray)));
    }

    spans.push(Span::styled("Esc", Style::default().fg(Color::Cyan)));
    spans.push(Span::styled(" quit", Style::default().fg(Color::DarkGray)));

    let paragraph = Paragraph::new(Line::from(spans)).alignment(Alignment::Center);
    f.render_widget(paragraph, area);
}

fn popup_rect(width: u16, height: u16, area: Rect) -> Rect {
    let [_, column, _] = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Length(width.min(area.width)),
        Constraint::Fill(1),
    ])
    .areas(area);
    let [_, popup, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(height.min(area.height)),
        Constraint::Fill(1),
    ])
    .areas(column);
    popup
}

fn key_hint(key: &'static str, action: &'static str) -> [Span<'static>; 2] {
    [
        Span::styled(key, Style::default().fg(Color::Cyan)),
        Span::styled(action, Style::default().fg(Color::DarkGray)),
    ]
}

fn render_quit_confirm_overlay(f: &mut Frame) {
    let popup = popup_rect(40, 7, f.area());
    f.render_widget(Clear, popup);

    let block = Block::bordered()
        .border_style(Style::default().fg(Color::Red))
        .title(Line::from(" Quit Uniconv? ").red().bold())
        .style(Style::default().bg(Color::Black));

    let hints: Vec<Span> = key_hint("Y", " yes   ")
        .into_iter()
        .chain(key_hint("N", " no"))
        .collect();
    let text = Text::from(vec![
        Line::from(""),
        Line::from("Are you sure you want to quit?").white(),
        Line::from(""),
        Line::from(hints),
    ]);

    f.render_widget(
        Paragraph::new(text).alignment(Alignment::Center).block(block),
        popup,
    );
}

/// Keep the last `max_len` characters of `path`, marking the cut with `...`.
fn truncate_path_start(path: &str, max_len: usize) -> String {
    let count = path.chars().count();
    if count <= max_len {
        return path.to_string();
    }
    if max_len <= 3 {
        return "...".to_string();
    }
    let tail: String = path.chars().skip(count - (max_len - 3)).collect();
    format!("...{}", tail)
}

fn picker_item(entry: &FileEntry) -> ListItem<'static> {
    if entry.is_dir {
        let suffix = if entry.name == ".." { "" } else { "/" };
        ListItem::new(format!(" ▸ {}{}", entry.name, suffix)).cyan()
    } else {
        ListItem::new(format!("   {}", entry.name)).white()
    }
}

fn render_file_picker(f: &mut Frame, overlay: &PickerOverlay) {
    let picker = &overlay.picker;
    let popup = popup_rect(66, 22, f.area());
    f.render_widget(Clear, popup);

    let hints: Vec<Span> = key_hint(" Enter", " pick  ")
        .into_iter()
        .chain(key_hint("Backspace", " up  "))
        .chain(key_hint("Esc", " cancel "))
        .collect();
    let block = Block::bordered()
        .border_style(Style::default().fg(Color::Cyan))
        .title(Line::from(format!(" Save {} ", overlay.field)).cyan().bold().centered())
        .title_bottom(Line::from(hints).centered())
        .style(Style::default().bg(Color::Black));
    let inner = block.inner(popup);
    f.render_widget(block, popup);

    let [location_area, filter_area, list_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(3),
        Constraint::Min(1),
    ])
    .areas(inner);

    let directory = picker.current_dir.display().to_string();
    let location = Line::from(vec![
        Span::styled(" in ", Style::default().fg(Color::DarkGray)),
        Span::raw(truncate_path_start(
            &directory,
            (location_area.width as usize).saturating_sub(5),
        )),
    ]);
    f.render_widget(Paragraph::new(location), location_area);

    let filter = if picker.search.is_empty() {
        Span::styled("type to filter, or a new file name", Style::default().fg(Color::DarkGray))
    } else {
        Span::raw(picker.search.clone())
    };
    f.render_widget(
        Paragraph::new(Line::from(vec![filter, Span::raw(CURSOR).cyan()])).block(
            Block::bordered().border_style(Style::default().fg(Color::DarkGray)),
        ),
        filter_area,
    );

    if picker.filtered.is_empty() {
        let hint = if picker.search.trim().is_empty() {
            "Empty directory".to_string()
        } else {
            format!("Enter saves as new file '{}'", picker.search.trim())
        };
        f.render_widget(
            Paragraph::new(Span::styled(
                hint,
                Style::default().fg(Color::DarkGray).italic(),
            )).alignment(Alignment::Center),
            list_area,
        );
        return;
    }

    let items: Vec<ListItem> = picker
        .filtered
        .iter()
        .filter_map(|&index| picker.entries.get(index))
        .map(picker_item)
        .collect();
    let list = List::new(items).highlight_style(
        Style::default().fg(Color::Black).bg(Color::Cyan).bold(),
    );
    let mut list_state = ListState::default().with_selected(Some(picker.selected));
    f.render_stateful_widget(list, list_area, &mut list_state);
}
