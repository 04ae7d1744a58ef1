use std::io;

use chrono::FixedOffset;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use log::warn;
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Position},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Cell, List, ListItem, Paragraph, Row, Table},
    Frame, Terminal,
};

use crate::daily::latest_per_day;
use crate::owm::forecast::Entry;
use crate::owm::{OwmError, WeatherReport};
use crate::units::temperature;

const MISSING: &str = "--";

#[derive(Default)]
pub struct App {
    input: String,
    report: Option<WeatherReport>,
    daily: Vec<Entry>,
    error: Option<String>,
    selected: usize,
}

impl App {
    fn search<F>(&mut self, fetch: &F)
    where
        F: Fn(&str) -> Result<WeatherReport, OwmError>,
    {
        let query = self.input.trim().to_string();
        if query.is_empty() {
            return;
        }
        match fetch(&query) {
            Ok(report) => {
                self.daily = latest_per_day(&report.forecast.list, report.forecast.utc_offset());
                self.report = Some(report);
                self.error = None;
                self.selected = 0;
            }
            Err(err) => {
                // Previously displayed data stays on screen.
                warn!("search for {query:?} failed: {err}");
                self.error = Some(match err {
                    OwmError::UnknownLocation(_) => {
                        "Please enter a correct district name!".to_string()
                    }
                    OwmError::Http(_) => format!("Weather lookup failed: {err}"),
                });
            }
        }
    }

    fn utc_offset(&self) -> FixedOffset {
        self.report
            .as_ref()
            .map(|r| r.forecast.utc_offset())
            .unwrap_or_else(|| FixedOffset::east_opt(0).unwrap())
    }

    /// Upcoming days, one entry each. The current day is left out since the
    /// current-weather panel already covers it.
    fn daily_view(&self) -> Vec<&Entry> {
        let Some(report) = &self.report else {
            return Vec::new();
        };
        let offset = report.forecast.utc_offset();
        let today = report
            .forecast
            .list
            .first()
            .and_then(|e| e.local_date(offset));
        self.daily
            .iter()
            .filter(|e| e.local_date(offset) != today)
            .collect()
    }

    fn select_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    fn select_down(&mut self) {
        let len = self.daily_view().len();
        if len > 0 && self.selected + 1 < len {
            self.selected += 1;
        }
    }
}

pub fn run_app<B, F>(
    terminal: &mut Terminal<B>,
    initial: Option<String>,
    fetch: F,
) -> io::Result<()>
where
    B: Backend,
    F: Fn(&str) -> Result<WeatherReport, OwmError>,
{
    let mut app = App::default();
    if let Some(district) = initial {
        app.input = district;
        app.search(&fetch);
    }

    loop {
        terminal.draw(|f| ui(f, &app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Release {
                continue;
            }
            match key.code {
                KeyCode::Esc => return Ok(()),
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    return Ok(())
                }
                KeyCode::Enter => app.search(&fetch),
                KeyCode::Backspace => {
                    app.input.pop();
                }
                KeyCode::Up => app.select_up(),
                KeyCode::Down => app.select_down(),
                KeyCode::Char(c) => app.input.push(c),
                _ => {}
            }
        }
    }
}

fn display_headline(report: Option<&WeatherReport>) -> Paragraph<'static> {
    let lines = match report {
        Some(report) => {
            let country = report
                .place
                .country
                .clone()
                .unwrap_or_else(|| MISSING.to_string());
            let observed = report
                .forecast
                .list
                .first()
                .and_then(|e| e.local_datetime(report.forecast.utc_offset()))
                .map(|dt| dt.format("%d-%m-%Y %H:%M").to_string())
                .unwrap_or_else(|| MISSING.to_string());
            vec![
                Line::from(vec![
                    Span::raw(" "),
                    Span::styled(
                        report.forecast.city.name.clone(),
                        Style::default().fg(Color::Yellow),
                    ),
                    Span::raw(" : "),
                    Span::styled(country, Style::default().fg(Color::Blue)),
                ]),
                Line::from(format!(" {observed}")),
            ]
        }
        None => vec![
            Line::from(" No forecast loaded"),
            Line::from(" Type a district name and press Enter"),
        ],
    };
    Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .border_type(BorderType::Rounded),
    )
}

fn display_current_conditions(report: Option<&WeatherReport>) -> Table<'static> {
    let current_block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(
            " Current Weather ",
            Style::default().fg(Color::Yellow),
        ))
        .title_alignment(Alignment::Left)
        .border_style(Style::default().fg(Color::Cyan))
        .border_type(BorderType::Rounded);

    let entry = report.and_then(|r| r.forecast.list.first());

    let mut rows = vec![Row::new(vec![Cell::from("")])];

    let temp = entry
        .map(|e| format!("{:.1} C", temperature::k2c(e.main.temp)))
        .unwrap_or_else(|| MISSING.to_string());
    rows.push(Row::new(vec![
        Cell::from(" Temperature"),
        Cell::from(temp).style(Style::default().fg(Color::Green)),
    ]));

    let humid = entry
        .map(|e| format!("{}%", e.main.humidity))
        .unwrap_or_else(|| MISSING.to_string());
    rows.push(Row::new(vec![
        Cell::from(" Humidity"),
        Cell::from(humid).style(Style::default().fg(Color::Green)),
    ]));

    let wind = entry
        .map(|e| format!("{:.1} m/s", e.wind.speed))
        .unwrap_or_else(|| MISSING.to_string());
    rows.push(Row::new(vec![
        Cell::from(" Wind"),
        Cell::from(wind).style(Style::default().fg(Color::Green)),
    ]));

    let cloud = entry
        .map(|e| format!("{}%", e.clouds.all))
        .unwrap_or_else(|| MISSING.to_string());
    rows.push(Row::new(vec![
        Cell::from(" Cloud"),
        Cell::from(cloud).style(Style::default().fg(Color::Green)),
    ]));

    let text = entry
        .and_then(|e| e.description())
        .unwrap_or(MISSING)
        .to_string();
    rows.push(Row::new(vec![
        Cell::from(" Conditions"),
        Cell::from(text).style(Style::default().fg(Color::Green)),
    ]));

    Table::new(rows, [Constraint::Length(12), Constraint::Length(25)]).block(current_block)
}

fn display_daily(entry: &Entry, offset: FixedOffset, expanded: bool) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from("")];

    let weekday = entry
        .local_datetime(offset)
        .map(|dt| dt.format("%A").to_string())
        .unwrap_or_else(|| MISSING.to_string());
    lines.push(Line::from(vec![
        Span::raw(" "),
        Span::styled(
            weekday,
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
    ]));

    lines.push(Line::from(vec![
        Span::raw(format!(" {:13}", "Temperature")),
        Span::styled(
            format!("{:.1} C", temperature::k2c(entry.main.temp)),
            Style::default().fg(Color::Green),
        ),
    ]));

    let text = entry.description().unwrap_or(MISSING).to_string();
    lines.push(Line::from(vec![
        Span::raw(format!(" {:13}", "Conditions")),
        Span::styled(text, Style::default().fg(Color::Green)),
    ]));

    if expanded {
        lines.push(Line::from(vec![
            Span::raw(format!(" {:13}", "Humidity")),
            Span::styled(
                format!("{}%", entry.main.humidity),
                Style::default().fg(Color::Green),
            ),
        ]));
        lines.push(Line::from(vec![
            Span::raw(format!(" {:13}", "Wind")),
            Span::styled(
                format!("{:.1} m/s", entry.wind.speed),
                Style::default().fg(Color::Green),
            ),
        ]));
        lines.push(Line::from(vec![
            Span::raw(format!(" {:13}", "Cloud")),
            Span::styled(
                format!("{}%", entry.clouds.all),
                Style::default().fg(Color::Green),
            ),
        ]));
    }

    lines
}

fn ui(f: &mut Frame, app: &App) {
    let vert_layout = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(4),
            Constraint::Min(0),
        ])
        .split(f.area());

    let input_block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(
            " District ",
            Style::default().fg(Color::Yellow),
        ))
        .title_alignment(Alignment::Left)
        .border_style(Style::default().fg(Color::Cyan))
        .border_type(BorderType::Rounded);
    f.render_widget(
        Paragraph::new(app.input.as_str()).block(input_block),
        vert_layout[0],
    );
    f.set_cursor_position(Position::new(
        vert_layout[0].x + app.input.chars().count() as u16 + 1,
        vert_layout[0].y + 1,
    ));

    let message = match &app.error {
        Some(err) => Line::from(Span::styled(
            format!(" {err}"),
            Style::default().fg(Color::Red),
        )),
        None => Line::from(Span::styled(
            " Enter searches, Up/Down browse days, Esc quits",
            Style::default().fg(Color::DarkGray),
        )),
    };
    f.render_widget(Paragraph::new(message), vert_layout[1]);

    f.render_widget(display_headline(app.report.as_ref()), vert_layout[2]);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)].as_ref())
        .split(vert_layout[3]);

    f.render_widget(display_current_conditions(app.report.as_ref()), chunks[0]);

    let forecast_block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(
            " Daily Forecast ",
            Style::default().fg(Color::Yellow),
        ))
        .title_alignment(Alignment::Left)
        .border_style(Style::default().fg(Color::Cyan))
        .border_type(BorderType::Rounded);

    let offset = app.utc_offset();
    let view = app.daily_view();
    let mut list_items = vec![];
    if view.is_empty() {
        list_items.push(ListItem::new(format!("\n  {MISSING}")));
    } else {
        for (i, entry) in view.iter().enumerate() {
            list_items.push(ListItem::new(display_daily(entry, offset, i == app.selected)));
        }
    }
    let list = List::new(list_items).block(forecast_block);

    f.render_widget(list, chunks[1]);
}
