use ratatui::{prelude::*, widgets::*};

use crate::app::{App, Mode, PRE_ROLL_STEPS};
use crate::settings::{Settings, SettingsField};

const SETTINGS_BUTTON: &str = "[ Settings ]";
const MARK: &str = "X";
/// Lines above the first field row on the settings screen.
const SETTINGS_HEADER_LINES: u16 = 5;

#[derive(Clone, Copy)]
pub struct Theme {
    work_color: Color,
    rest_color: Color,
    long_break_color: Color,
    settings_color: Color,
    text_color: Color,
    highlight_color: Color,
    /// Paint the phase color as the background instead of the text color.
    fill: bool,
}

pub fn get_theme(name: &str) -> Theme {
    match name {
        "dark" => Theme {
            work_color: Color::Rgb(100, 149, 237),
            rest_color: Color::Rgb(0, 255, 255),
            long_break_color: Color::Rgb(0, 255, 150),
            settings_color: Color::Gray,
            text_color: Color::White,
            highlight_color: Color::Yellow,
            fill: false,
        },
        _ => Theme {
            work_color: Color::Rgb(100, 149, 237),
            rest_color: Color::Rgb(0, 200, 200),
            long_break_color: Color::Rgb(0, 170, 110),
            settings_color: Color::Rgb(51, 51, 51),
            text_color: Color::Rgb(224, 255, 255),
            highlight_color: Color::Yellow,
            fill: true,
        },
    }
}

impl Theme {
    fn base(&self, color: Color) -> Style {
        if self.fill {
            Style::default().bg(color).fg(self.text_color)
        } else {
            Style::default().fg(color)
        }
    }
}

// ============================================================================
// Layout (shared with mouse hit-testing)
// ============================================================================

fn timer_layout(area: Rect) -> (Rect, Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1), Constraint::Length(3)])
        .split(area);
    (chunks[0], chunks[1], chunks[2])
}

/// Clickable settings button in the timer header.
pub fn settings_button(area: Rect) -> Rect {
    let (header, _, _) = timer_layout(area);
    let width = (SETTINGS_BUTTON.len() as u16).min(header.width.saturating_sub(2));
    Rect {
        x: header.right().saturating_sub(width + 2),
        y: header.y + 1,
        width,
        height: header.height.min(1),
    }
}

fn settings_panel(area: Rect) -> Rect {
    centered_rect(60, 80, area)
}

/// Screen row of a settings field, for highlighting and clicks.
pub fn settings_row(area: Rect, field: SettingsField) -> Rect {
    let inner = Block::default().borders(Borders::ALL).inner(settings_panel(area));
    let index = SettingsField::ALL.iter().position(|&f| f == field).unwrap_or(0) as u16;
    Rect {
        x: inner.x,
        y: inner.y + SETTINGS_HEADER_LINES + index * 2,
        width: inner.width,
        height: 1,
    }
}

pub fn field_at(area: Rect, column: u16, row: u16) -> Option<SettingsField> {
    SettingsField::ALL.into_iter().find(|&field| {
        let r = settings_row(area, field);
        row == r.y && column >= r.x && column < r.right()
    })
}

pub fn contains(rect: Rect, column: u16, row: u16) -> bool {
    column >= rect.x && column < rect.right() && row >= rect.y && row < rect.bottom()
}

fn centered_rect(w: u16, h: u16, r: Rect) -> Rect {
    let v = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - h) / 2),
            Constraint::Percentage(h),
            Constraint::Percentage((100 - h) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - w) / 2),
            Constraint::Percentage(w),
            Constraint::Percentage((100 - w) / 2),
        ])
        .split(v[1])[1]
}

// ============================================================================
// Rendering
// ============================================================================

pub fn render_ui(f: &mut Frame, app: &App, theme: &Theme) {
    match app.mode() {
        Mode::Timer => render_timer(f, app, theme),
        Mode::PreRoll { step } => render_pre_roll(f, app, theme, *step),
        Mode::Settings { selected, draft } => render_settings(f, theme, *selected, draft),
    }
}

fn phase_color(app: &App, theme: &Theme) -> Color {
    let engine = app.engine();
    if engine.is_working() {
        theme.work_color
    } else if engine.is_long_break() {
        theme.long_break_color
    } else {
        theme.rest_color
    }
}

fn phase_name(app: &App) -> &'static str {
    let engine = app.engine();
    if engine.is_working() {
        "WORK"
    } else if engine.is_long_break() {
        "LONG BREAK"
    } else {
        "REST"
    }
}

fn format_time(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

fn render_header(f: &mut Frame, area: Rect, style: Style, theme: &Theme) {
    let (header, _, _) = timer_layout(area);
    let now = chrono::Local::now();
    f.render_widget(
        Paragraph::new(now.format(" %H:%M").to_string()).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .title(Span::styled(" HIIT TIMER ", style.add_modifier(Modifier::BOLD))),
        ),
        header,
    );
    f.render_widget(
        Paragraph::new(SETTINGS_BUTTON)
            .style(style.fg(theme.highlight_color).add_modifier(Modifier::BOLD)),
        settings_button(area),
    );
}

fn render_timer(f: &mut Frame, app: &App, theme: &Theme) {
    let area = f.size();
    let engine = app.engine();
    let color = phase_color(app, theme);
    let style = theme.base(color);

    f.render_widget(Block::default().style(style), area);
    render_header(f, area, style, theme);

    let (_, body, footer) = timer_layout(area);
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(10),
            Constraint::Length(1), Constraint::Length(1),
            Constraint::Length(5), Constraint::Length(1),
            Constraint::Length(1), Constraint::Length(1),
            Constraint::Length(3), Constraint::Length(1),
            Constraint::Length(1), Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(body);

    f.render_widget(
        Paragraph::new(phase_name(app))
            .style(style.add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center),
        sections[1],
    );

    f.render_widget(
        Paragraph::new(big_text(&format_time(engine.time_left())))
            .style(style.add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center),
        sections[3],
    );

    let status = if engine.running() { "RUNNING" } else { "PAUSED" };
    f.render_widget(
        Paragraph::new(status).style(style).alignment(Alignment::Center),
        sections[5],
    );

    let gauge_fg = if theme.fill { theme.text_color } else { color };
    f.render_widget(
        Gauge::default()
            .block(Block::default().borders(Borders::ALL).border_type(BorderType::Rounded))
            .gauge_style(Style::default().fg(gauge_fg).bg(Color::Black))
            .percent((engine.progress() * 100.0) as u16),
        centered_rect(60, 100, sections[7]),
    );

    let total = app.settings().total_rounds;
    let done = engine.rounds_completed();
    f.render_widget(
        Paragraph::new(MARK.repeat(done as usize))
            .style(style.add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center),
        sections[9],
    );
    f.render_widget(
        Paragraph::new(format!("Round {} of {}", (done + 1).min(total), total))
            .style(style)
            .alignment(Alignment::Center),
        sections[10],
    );

    f.render_widget(
        Paragraph::new("SPACE: Start/Pause  •  R: Reset  •  S: Settings  •  Q: Quit")
            .style(style)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::TOP)),
        footer,
    );
}

fn render_pre_roll(f: &mut Frame, app: &App, theme: &Theme, step: usize) {
    let area = f.size();
    let style = theme.base(phase_color(app, theme));
    f.render_widget(Block::default().style(style), area);
    render_header(f, area, style, theme);

    let word = PRE_ROLL_STEPS.get(step).copied().unwrap_or("GO");
    let middle = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(40), Constraint::Length(5), Constraint::Min(0)])
        .split(area)[1];
    f.render_widget(
        Paragraph::new(big_text(word))
            .style(style.fg(theme.highlight_color).add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center),
        middle,
    );
}

fn render_settings(f: &mut Frame, theme: &Theme, selected: SettingsField, draft: &Settings) {
    let area = f.size();
    let style = theme.base(theme.settings_color);
    f.render_widget(Block::default().style(style), area);

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled("SETTINGS", style.add_modifier(Modifier::BOLD))),
        Line::from(""),
        Line::from(Span::styled(
            "↑↓: Adjust  •  Tab: Next  •  Enter: Save  •  Esc: Cancel",
            style.add_modifier(Modifier::ITALIC),
        )),
        Line::from(""),
    ];
    debug_assert_eq!(lines.len() as u16, SETTINGS_HEADER_LINES);

    for field in SettingsField::ALL {
        let value = format!("{}{}", draft.get(field), field.unit());
        let (prefix, row_style) = if field == selected {
            ("> ", style.fg(theme.highlight_color).add_modifier(Modifier::BOLD))
        } else {
            ("  ", style)
        };
        lines.push(Line::from(Span::styled(
            format!("{}{}: {}", prefix, field.label(), value),
            row_style,
        )));
        lines.push(Line::from(""));
    }

    f.render_widget(
        Paragraph::new(lines).alignment(Alignment::Left).block(
            Block::default()
                .title(" Settings ")
                .title_alignment(Alignment::Center)
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .style(style),
        ),
        settings_panel(area),
    );
}

// ============================================================================
// Big digits
// ============================================================================

fn glyph(c: char) -> [&'static str; 5] {
    match c {
        '0' => ["███", "█ █", "█ █", "█ █", "███"],
        '1' => ["  █", "  █", "  █", "  █", "  █"],
        '2' => ["███", "  █", "███", "█  ", "███"],
        '3' => ["███", "  █", "███", "  █", "███"],
        '4' => ["█ █", "█ █", "███", "  █", "  █"],
        '5' => ["███", "█  ", "███", "  █", "███"],
        '6' => ["███", "█  ", "███", "█ █", "███"],
        '7' => ["███", "  █", "  █", "  █", "  █"],
        '8' => ["███", "█ █", "███", "█ █", "███"],
        '9' => ["███", "█ █", "███", "  █", "███"],
        ':' => [" ", "█", " ", "█", " "],
        _ => ["", "", "", "", ""],
    }
}

/// Five-line block rendering of digits and `:`. Anything else is kept as a
/// single line of plain text.
fn big_text(text: &str) -> Text<'static> {
    if !text.chars().all(|c| c.is_ascii_digit() || c == ':') {
        return Text::from(vec![
            Line::from(""),
            Line::from(""),
            Line::from(text.to_string()),
        ]);
    }

    let rows: Vec<Line> = (0..5)
        .map(|row| {
            let line = text
                .chars()
                .map(|c| glyph(c)[row])
                .collect::<Vec<_>>()
                .join(" ");
            Line::from(line)
        })
        .collect();
    Text::from(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::Command;
    use crate::settings::SettingsStore;
    use ratatui::backend::TestBackend;
    use tempfile::TempDir;

    fn area() -> Rect {
        Rect::new(0, 0, 80, 30)
    }

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        buffer.content.iter().map(|c| c.symbol()).collect()
    }

    fn draw(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        let theme = get_theme("classic");
        terminal.draw(|f| render_ui(f, app, &theme)).unwrap();
        buffer_text(&terminal)
    }

    #[test]
    fn format_time_pads_minutes_and_seconds() {
        assert_eq!(format_time(0), "00:00");
        assert_eq!(format_time(75), "01:15");
        assert_eq!(format_time(1800), "30:00");
    }

    #[test]
    fn big_text_has_five_rows_for_digits() {
        assert_eq!(big_text("00:40").lines.len(), 5);
        assert_eq!(big_text("READY").lines.len(), 3);
    }

    #[test]
    fn settings_button_sits_inside_header() {
        let button = settings_button(area());
        let (header, _, _) = timer_layout(area());
        assert!(contains(header, button.x, button.y));
        assert!(contains(button, button.x, button.y));
        assert!(!contains(button, 0, 0));
    }

    #[test]
    fn field_at_maps_rows_back_to_fields() {
        for field in SettingsField::ALL {
            let row = settings_row(area(), field);
            assert_eq!(field_at(area(), row.x + 1, row.y), Some(field));
        }
        let last = settings_row(area(), SettingsField::LongBreakEvery);
        assert_eq!(field_at(area(), last.x, last.y + 1), None);
    }

    #[test]
    fn timer_view_shows_phase_and_controls() {
        let dir = TempDir::new().unwrap();
        let app = App::new(SettingsStore::new(dir.path().join("s.json")), true);
        let text = draw(&app);
        assert!(text.contains("WORK"));
        assert!(text.contains("Round 1 of 10"));
        assert!(text.contains("Settings"));
    }

    #[test]
    fn settings_view_lists_every_field() {
        let dir = TempDir::new().unwrap();
        let mut app = App::new(SettingsStore::new(dir.path().join("s.json")), true);
        app.handle(Command::OpenSettings);
        let text = draw(&app);
        for field in SettingsField::ALL {
            assert!(text.contains(field.label()), "missing {}", field.label());
        }
        assert!(text.contains("> Work Time: 40s"));
    }

    #[test]
    fn pre_roll_view_shows_step_word() {
        let dir = TempDir::new().unwrap();
        let mut app = App::new(SettingsStore::new(dir.path().join("s.json")), true);
        app.handle(Command::ToggleRun);
        assert!(draw(&app).contains("READY"));
        app.tick();
        assert!(draw(&app).contains("SET"));
    }
}
