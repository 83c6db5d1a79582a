use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    symbols::border,
    text::{Line, Span, Text},
    widgets::{
        Bar, BarChart, BarGroup, Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState,
        Wrap,
    },
};
use tracing::trace;

use crate::dashboard::{CONTENT_CREATION, PAGE_VIEWS, RECENT_ACTIVITY, peak_page_views};
use crate::datatable::{NO_RESULTS, TableFrame};
use crate::domain::{CMSConfig, HELP_TEXT, Screen, ToastKind};
use crate::form::{FieldKind, FieldValue, Form};
use crate::model::{Model, Modus};

pub const SIDEBAR_WIDTH: u16 = 22;
pub const SIDEBAR_WIDTH_COLLAPSED: u16 = 5;
pub const STATUSLINE_HEIGHT: u16 = 1;
const PAGE_HEADER_HEIGHT: u16 = 3;
const SEARCH_HEIGHT: u16 = 3;

const DIM: Color = Color::DarkGray;

pub struct AppUI {
    site_name: String,
    accent: Color,
}

impl AppUI {
    pub fn new(cfg: &CMSConfig) -> Self {
        Self {
            site_name: cfg.site_name.clone(),
            accent: cfg.accent,
        }
    }

    pub fn draw(&mut self, model: &Model, frame: &mut Frame) {
        let [body, statusline] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(STATUSLINE_HEIGHT)])
                .areas(frame.area());

        let sidebar_width = if model.sidebar_collapsed() {
            SIDEBAR_WIDTH_COLLAPSED
        } else {
            SIDEBAR_WIDTH
        };
        let [sidebar, content] =
            Layout::horizontal([Constraint::Length(sidebar_width), Constraint::Min(1)]).areas(body);

        self.draw_sidebar(model, frame, sidebar);
        self.draw_content(model, frame, content);
        self.draw_statusline(model, frame, statusline);

        match model.modus() {
            Modus::Dialog => {
                if let Some(form) = model.form() {
                    draw_dialog(form, self.accent, frame);
                }
            }
            Modus::Popup => draw_help(self.accent, frame),
            _ => {}
        }
    }

    fn draw_sidebar(&self, model: &Model, frame: &mut Frame, area: Rect) {
        let collapsed = model.sidebar_collapsed();
        let title = if collapsed {
            Line::from(" ≡ ".bold())
        } else {
            Line::from(format!(" {} ", self.site_name).bold())
        };
        let block = Block::new()
            .borders(Borders::RIGHT)
            .border_style(Style::new().fg(DIM))
            .title(title);

        let lines = model
            .screens()
            .into_iter()
            .map(|screen| {
                let key = format!(" {} ", screen.index() + 1);
                let label = if collapsed {
                    String::new()
                } else {
                    format!("{} ", screen.title())
                };
                let line = Line::from(vec![Span::from(key).fg(DIM), Span::from(label)]);
                if screen == model.screen() {
                    line.style(
                        Style::new()
                            .fg(Color::Black)
                            .bg(self.accent)
                            .add_modifier(Modifier::BOLD),
                    )
                } else {
                    line
                }
            })
            .collect::<Vec<Line>>();

        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn draw_content(&self, model: &Model, frame: &mut Frame, area: Rect) {
        let area = area.inner(ratatui::layout::Margin::new(1, 0));
        let (_, tab_idx) = model.tabs();
        let has_tabs = !model.tabs().0.is_empty();

        let [header, tabs, main] = Layout::vertical([
            Constraint::Length(PAGE_HEADER_HEIGHT),
            Constraint::Length(if has_tabs { 2 } else { 0 }),
            Constraint::Min(1),
        ])
        .areas(area);

        draw_page_header(model, self.accent, frame, header);
        if has_tabs {
            draw_tabs(model.tabs().0, tab_idx, self.accent, frame, tabs);
        }

        match model.screen() {
            Screen::Dashboard => draw_dashboard(model, self.accent, frame, main),
            Screen::Settings => {
                let [title, table] =
                    Layout::vertical([Constraint::Length(1), Constraint::Min(1)]).areas(main);
                frame.render_widget(
                    Paragraph::new(Line::from(model.settings_section().title().bold())),
                    title,
                );
                if let Some(table_frame) = model.table_frame() {
                    draw_table(model, &table_frame, self.accent, frame, table);
                }
            }
            _ => {
                if let Some(table_frame) = model.table_frame() {
                    draw_table(model, &table_frame, self.accent, frame, main);
                }
            }
        }
    }

    fn draw_statusline(&self, model: &Model, frame: &mut Frame, area: Rect) {
        let line = match model.toast() {
            Some(toast) => {
                let style = match toast.kind {
                    ToastKind::Info => Style::new().fg(Color::Black).bg(Color::Green),
                    ToastKind::Error => Style::new().fg(Color::White).bg(Color::Red),
                };
                Line::from(vec![
                    Span::styled(
                        format!(" {} ", toast.title),
                        style.add_modifier(Modifier::BOLD),
                    ),
                    Span::from(format!(" {}", toast.description)),
                ])
            }
            None => key_hints(model),
        };
        frame.render_widget(Paragraph::new(line), area);
    }
}

fn key_hints(model: &Model) -> Line<'static> {
    let hints: &[(&str, &str)] = match (model.modus(), model.screen()) {
        (Modus::Search, _) => &[("Enter", "keep"), ("Esc", "clear")],
        (Modus::Edit, _) => &[("Enter", "apply"), ("Esc", "cancel")],
        (Modus::Dialog, _) => &[("Tab", "next field"), ("Enter", "submit"), ("Esc", "cancel")],
        (Modus::Popup, _) => &[("Esc", "close")],
        (Modus::Table, Screen::Dashboard) => &[("Tab", "screen"), ("?", "help"), ("q", "quit")],
        (Modus::Table, Screen::Settings) => &[
            ("Enter", "edit"),
            ("Space", "toggle"),
            ("s", "save"),
            ("[ ]", "section"),
            ("?", "help"),
            ("q", "quit"),
        ],
        (Modus::Table, _) => &[
            ("/", "search"),
            ("c", "create"),
            ("d", "delete"),
            ("n p", "page"),
            ("?", "help"),
            ("q", "quit"),
        ],
    };
    let mut spans = Vec::new();
    for (key, label) in hints {
        spans.push(format!(" {key}").blue().bold());
        spans.push(Span::from(format!(" {label} ")));
    }
    Line::from(spans)
}

fn draw_page_header(model: &Model, accent: Color, frame: &mut Frame, area: Rect) {
    let (title, description, action) = model.header();
    let mut title_line = vec![Span::from(title).bold().fg(accent)];
    if let Some(action) = action {
        title_line.push(Span::from("   "));
        title_line.push(Span::from(" c ").fg(Color::Black).bg(accent));
        title_line.push(Span::from(format!(" {action}")));
    }
    let text = Text::from(vec![Line::from(title_line), Line::from(description.fg(DIM))]);
    frame.render_widget(Paragraph::new(text), area);
}

fn draw_tabs(tabs: &[&str], active: usize, accent: Color, frame: &mut Frame, area: Rect) {
    let mut spans = vec![Span::from("[ ").fg(DIM)];
    for (idx, tab) in tabs.iter().enumerate() {
        let span = Span::from(format!(" {tab} "));
        spans.push(if idx == active {
            span.fg(Color::Black).bg(accent).bold()
        } else {
            span
        });
    }
    spans.push(Span::from(" ]").fg(DIM));
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn column_widths(table: &TableFrame) -> Vec<Constraint> {
    table
        .headers
        .iter()
        .enumerate()
        .map(|(idx, header)| {
            let cells = table
                .rows
                .iter()
                .filter_map(|r| r.get(idx))
                .map(|l| l.width())
                .max()
                .unwrap_or(0);
            Constraint::Min(std::cmp::max(header.chars().count(), cells) as u16)
        })
        .collect()
}

fn draw_table(model: &Model, table: &TableFrame, accent: Color, frame: &mut Frame, area: Rect) {
    let [search, body, pager] = Layout::vertical([
        Constraint::Length(if table.show_search { SEARCH_HEIGHT } else { 0 }),
        Constraint::Min(3),
        Constraint::Length(if table.show_pager { 1 } else { 0 }),
    ])
    .areas(area);

    if table.show_search {
        draw_search(model, table, accent, frame, search);
    }

    let block = Block::bordered()
        .border_set(border::ROUNDED)
        .border_style(Style::new().fg(DIM));
    let inner = block.inner(body);
    frame.render_widget(block, body);

    let header = Row::new(
        table
            .headers
            .iter()
            .map(|h| Cell::from(h.clone()))
            .collect::<Vec<Cell>>(),
    )
    .style(Style::new().add_modifier(Modifier::BOLD))
    .bottom_margin(1);

    let rows = table
        .rows
        .iter()
        .map(|cells| Row::new(cells.iter().cloned().map(Cell::from).collect::<Vec<Cell>>()))
        .collect::<Vec<Row>>();

    let widget = Table::new(rows, column_widths(table))
        .header(header)
        .column_spacing(2)
        .row_highlight_style(Style::new().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");
    let mut state = TableState::default().with_selected(if table.is_empty() {
        None
    } else {
        Some(table.selected)
    });
    frame.render_stateful_widget(widget, inner, &mut state);

    if table.is_empty() {
        // Full width placeholder below the header row
        let header_rows = if table.headers.is_empty() { 0 } else { 2 };
        let placeholder = Rect {
            y: inner.y + header_rows,
            height: inner.height.saturating_sub(header_rows).min(1),
            ..inner
        };
        frame.render_widget(
            Paragraph::new(NO_RESULTS.fg(DIM)).alignment(Alignment::Center),
            placeholder,
        );
    }

    if table.show_pager {
        let enabled = |on: bool| if on { Style::new().bold() } else { Style::new().fg(DIM) };
        let line = Line::from(vec![
            Span::styled("< Previous", enabled(table.has_previous())),
            Span::from(format!("   {}   ", table.pager_label())),
            Span::styled("Next >", enabled(table.has_next())),
        ]);
        frame.render_widget(Paragraph::new(line).alignment(Alignment::Right), pager);
    }
}

fn draw_search(model: &Model, table: &TableFrame, accent: Color, frame: &mut Frame, area: Rect) {
    let active = model.modus() == Modus::Search;
    let block = Block::bordered()
        .border_set(border::ROUNDED)
        .border_style(if active {
            Style::new().fg(accent)
        } else {
            Style::new().fg(DIM)
        })
        .title(" / Search ");
    let inner = block.inner(area);
    let line = if table.search_query.is_empty() && !active {
        Line::from("Search...".fg(DIM))
    } else {
        Line::from(table.search_query.clone())
    };
    frame.render_widget(Paragraph::new(line).block(block), area);

    if active {
        let cursor = model.input().cursor as u16;
        frame.set_cursor_position((inner.x + cursor.min(inner.width.saturating_sub(1)), inner.y));
    }
}

fn draw_dashboard(model: &Model, accent: Color, frame: &mut Frame, area: Rect) {
    let [cards, charts, activity] = Layout::vertical([
        Constraint::Length(5),
        Constraint::Min(10),
        Constraint::Length(RECENT_ACTIVITY.len() as u16 * 2 + 2),
    ])
    .areas(area);

    let stats = model.stat_cards();
    let card_areas = Layout::horizontal(vec![Constraint::Ratio(1, stats.len() as u32); stats.len()])
        .spacing(1)
        .split(cards);
    for (card, area) in stats.iter().zip(card_areas.iter()) {
        let text = Text::from(vec![
            Line::from(card.value.to_string().bold()),
            Line::from(card.change.fg(DIM)),
        ]);
        let block = Block::bordered()
            .border_set(border::ROUNDED)
            .title(format!(" {} ", card.title));
        frame.render_widget(Paragraph::new(text).block(block), *area);
    }

    let [views, creation] =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
            .spacing(1)
            .areas(charts);

    let view_bars = PAGE_VIEWS
        .iter()
        .map(|(day, value)| Bar::default().value(*value).label(Line::from(*day)))
        .collect::<Vec<Bar>>();
    frame.render_widget(
        BarChart::default()
            .block(Block::bordered().border_set(border::ROUNDED).title(" Page Views "))
            .data(BarGroup::default().bars(&view_bars))
            .max(peak_page_views())
            .bar_width(4)
            .bar_gap(1)
            .bar_style(Style::new().fg(accent)),
        views,
    );

    let mut creation_chart = BarChart::default()
        .block(
            Block::bordered()
                .border_set(border::ROUNDED)
                .title(" Content Creation ")
                .title_bottom(Line::from(vec![
                    " Pages ".fg(accent),
                    " Blog Posts ".fg(Color::Magenta),
                ])),
        )
        .bar_width(2)
        .bar_gap(0)
        .group_gap(2);
    for month in CONTENT_CREATION.iter() {
        let bars = [
            Bar::default().value(month.pages).style(Style::new().fg(accent)),
            Bar::default().value(month.posts).style(Style::new().fg(Color::Magenta)),
        ];
        creation_chart = creation_chart.data(
            BarGroup::default()
                .label(Line::from(month.month))
                .bars(&bars),
        );
    }
    frame.render_widget(creation_chart, creation);

    let mut lines = Vec::new();
    for item in RECENT_ACTIVITY.iter() {
        lines.push(Line::from(vec![
            "● ".fg(accent),
            item.title.bold(),
            Span::from(format!("  {}", item.time)).fg(DIM),
        ]));
        lines.push(Line::from(vec![
            Span::from(format!("  {}", item.description)),
            Span::from(format!("  By: {}", item.user)).fg(DIM),
        ]));
    }
    frame.render_widget(
        Paragraph::new(lines).block(
            Block::bordered()
                .border_set(border::ROUNDED)
                .title(" Recent Activity "),
        ),
        activity,
    );
}

/// Centered rectangle of at most `width` x `height` inside `area`.
fn popup_area(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(2));
    Rect::new(
        area.x + (area.width.saturating_sub(width)) / 2,
        area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    )
}

fn field_value_line(kind: &FieldKind, value: &FieldValue, placeholder: &str) -> Line<'static> {
    match (kind, value) {
        (FieldKind::Password, FieldValue::Text(input)) if !input.value().is_empty() => {
            Line::from("*".repeat(input.value().chars().count()))
        }
        (_, FieldValue::Text(input)) if input.value().is_empty() => {
            Line::from(placeholder.to_string().fg(DIM))
        }
        (_, FieldValue::Text(input)) => Line::from(input.value().to_string()),
        (_, FieldValue::Flag(on)) => Line::from(if *on { "[x]" } else { "[ ]" }),
        (FieldKind::Select { options, .. }, FieldValue::Choice(idx)) => Line::from(format!(
            "< {} >",
            options.get(*idx).copied().unwrap_or_default()
        )),
        (_, FieldValue::Choice(_)) => Line::default(),
    }
}

fn draw_dialog(form: &Form, accent: Color, frame: &mut Frame) {
    let spec = form.spec();
    let height = spec.fields.len() as u16 * 3 + 6;
    let area = popup_area(frame.area(), 64, height);
    frame.render_widget(Clear, area);

    let block = Block::bordered()
        .border_set(border::ROUNDED)
        .border_style(Style::new().fg(accent))
        .title(Line::from(format!(" {} ", spec.title).bold()))
        .title_bottom(
            Line::from(vec![
                " Enter ".blue().bold(),
                Span::from(format!("{} ", spec.submit_label)),
                " Esc ".blue().bold(),
                Span::from("Cancel "),
            ])
            .right_aligned(),
        );
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines = vec![Line::from(spec.description.fg(DIM)), Line::default()];
    let mut cursor = None;
    for (idx, (field, value)) in form.fields().enumerate() {
        let focused = idx == form.focus();
        let marker = if focused { "> ".fg(accent).bold() } else { Span::from("  ") };
        let label = match field.kind {
            FieldKind::Checkbox(_) => format!("{} (Space)", field.label),
            FieldKind::Select { .. } => format!("{} (Left/Right)", field.label),
            _ => field.label.to_string(),
        };
        lines.push(Line::from(vec![marker, Span::from(label).bold()]));

        let mut value_line = field_value_line(&field.kind, value, field.placeholder);
        value_line.spans.insert(0, Span::from("  "));
        if focused
            && let FieldValue::Text(input) = value
        {
            cursor = Some((2 + input.get().cursor as u16, lines.len() as u16));
        }
        lines.push(value_line);
        lines.push(match field.hint {
            Some(hint) => Line::from(format!("  {hint}").fg(DIM).italic()),
            None => Line::default(),
        });
    }
    frame.render_widget(Paragraph::new(lines), inner);

    if let Some((x, y)) = cursor
        && y < inner.height
    {
        frame.set_cursor_position((inner.x + x.min(inner.width.saturating_sub(1)), inner.y + y));
    }
}

fn draw_help(accent: Color, frame: &mut Frame) {
    let lines = HELP_TEXT.lines().count() as u16;
    let area = popup_area(frame.area(), 56, lines + 2);
    trace!("Help popup at {:?}", area);
    frame.render_widget(Clear, area);
    let block = Block::bordered()
        .border_set(border::ROUNDED)
        .border_style(Style::new().fg(accent))
        .title(" Help ");
    frame.render_widget(
        Paragraph::new(HELP_TEXT)
            .wrap(Wrap { trim: false })
            .block(block),
        area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Message;
    use ratatui::{Terminal, backend::TestBackend, buffer::Buffer};

    fn screen_text(buffer: &Buffer) -> String {
        let area = buffer.area;
        let mut out = String::new();
        for y in 0..area.height {
            for x in 0..area.width {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    fn render(model: &Model) -> String {
        let mut terminal = Terminal::new(TestBackend::new(140, 48)).unwrap();
        let mut ui = AppUI::new(model.config());
        terminal.draw(|f| ui.draw(model, f)).unwrap();
        screen_text(terminal.backend().buffer())
    }

    #[test]
    fn dashboard_shows_live_counts() {
        let model = Model::init(&CMSConfig::default());
        let text = render(&model);
        assert!(text.contains("Admin CMS"));
        assert!(text.contains("Welcome to your CMS dashboard overview."));
        assert!(text.contains("Total Pages"));
        assert!(text.contains("Recent Activity"));
    }

    #[test]
    fn pages_table_renders_rows_and_search() {
        let mut model = Model::init(&CMSConfig::default());
        model.update(Some(Message::GotoScreen(Screen::Pages))).unwrap();
        let text = render(&model);
        assert!(text.contains("Search..."));
        assert!(text.contains("Last Updated"));
        assert!(text.contains("Privacy Policy"));
        assert!(text.contains("Create Page"));
        // Seven pages fit on one page
        assert!(!text.contains("Page 1 of"));
    }

    #[test]
    fn empty_search_shows_placeholder() {
        let mut model = Model::init(&CMSConfig::default());
        model.update(Some(Message::GotoScreen(Screen::Users))).unwrap();
        model.update(Some(Message::Search)).unwrap();
        for c in "zzz".chars() {
            model
                .update(Some(Message::RawKey(ratatui::crossterm::event::KeyEvent::from(
                    ratatui::crossterm::event::KeyCode::Char(c),
                ))))
                .unwrap();
        }
        let text = render(&model);
        assert!(text.contains(NO_RESULTS));
        assert!(text.contains("Email"));
    }

    #[test]
    fn dialog_and_help_overlay() {
        let mut model = Model::init(&CMSConfig::default());
        model.update(Some(Message::GotoScreen(Screen::Blog))).unwrap();
        model.update(Some(Message::Create)).unwrap();
        let text = render(&model);
        assert!(text.contains("Create New Blog Post"));
        assert!(text.contains("< News >"));

        let mut model = Model::init(&CMSConfig::default());
        model.update(Some(Message::Help)).unwrap();
        assert!(render(&model).contains("regenerate API key"));
    }

    #[test]
    fn active_screen_uses_configured_accent() {
        let cfg = CMSConfig::default().accent(Color::Magenta);
        let model = Model::init(&cfg);
        let mut terminal = Terminal::new(TestBackend::new(140, 48)).unwrap();
        let mut ui = AppUI::new(&cfg);
        terminal.draw(|f| ui.draw(&model, f)).unwrap();
        let buffer = terminal.backend().buffer();
        // Dashboard is the first sidebar entry, right below the title
        assert_eq!(buffer[(1, 1)].bg, Color::Magenta);
        assert_ne!(buffer[(1, 2)].bg, Color::Magenta);
    }

    #[test]
    fn collapsed_sidebar_hides_labels() {
        let mut model = Model::init(&CMSConfig::default().site_name("Acme"));
        assert!(render(&model).contains("Media Library"));
        model.update(Some(Message::ToggleSidebar)).unwrap();
        model.update(Some(Message::GotoScreen(Screen::Users))).unwrap();
        let text = render(&model);
        assert!(!text.contains("Acme"));
        assert!(!text.contains("Media Library"));
    }
}
