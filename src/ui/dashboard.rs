//! Dashboard screen UI
//!
//! Renders the single dashboard screen: header, current conditions, details,
//! hourly strip with temperature trend, 5-day outlook, air quality and the
//! daylight arc, plus a status line at the bottom.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::palette::{background_accent, token_color, Palette};
use super::widgets::{SunArc, TrendSparkline};
use crate::app::{App, InputMode};
use crate::classify::{self, Band};
use crate::dashboard::{
    AirQualityPanel, AirQualitySource, CurrentPanel, DailyOutlook, DashboardSnapshot, DetailsPanel,
    HourlySlot, SunPanel,
};

/// Renders the dashboard screen
///
/// # Arguments
/// * `frame` - The ratatui frame to render into
/// * `app` - The application state
pub fn render(frame: &mut Frame, app: &App) {
    let palette = Palette::for_theme(app.theme());
    let area = frame.area();

    frame.render_widget(
        Block::default().style(Style::default().bg(palette.background).fg(palette.primary)),
        area,
    );

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0), Constraint::Length(1)])
        .split(area);

    render_header(frame, chunks[0], app, &palette);
    match app.snapshot() {
        Some(snapshot) => render_body(frame, chunks[1], snapshot, &palette),
        None => render_no_data(frame, chunks[1], &palette),
    }
    render_status_line(frame, chunks[2], app, &palette);
}

fn render_header(frame: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let snapshot = app.snapshot();
    let accent = snapshot
        .map(|s| background_accent(s.background))
        .unwrap_or(palette.header);

    let mut spans = vec![Span::styled(
        " skydash ",
        Style::default().fg(accent).add_modifier(Modifier::BOLD),
    )];

    if let Some(snapshot) = snapshot {
        spans.push(Span::styled("│ ", Style::default().fg(palette.secondary)));
        spans.push(Span::styled(
            snapshot.location.name.clone(),
            Style::default().fg(palette.primary).add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled(
            format!("  {}", snapshot.updated),
            Style::default().fg(palette.secondary),
        ));
    }
    if app.is_demo() {
        spans.push(Span::styled(
            "  DEMO: set OPENWEATHER_API_KEY for live data",
            Style::default().fg(palette.error),
        ));
    }
    spans.push(Span::styled(
        format!("  {} theme", app.theme().name()),
        Style::default().fg(palette.secondary),
    ));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_body(frame: &mut Frame, area: Rect, snapshot: &DashboardSnapshot, palette: &Palette) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(8),
            Constraint::Length(7),
            Constraint::Length(8),
            Constraint::Min(5),
        ])
        .split(area);

    let top = split_columns(rows[0], 40);
    render_current(frame, top[0], &snapshot.current, palette);
    render_details(frame, top[1], &snapshot.details, palette);

    render_hourly(frame, rows[1], &snapshot.hourly, palette);

    let middle = split_columns(rows[2], 50);
    render_daily(frame, middle[0], &snapshot.daily, palette);
    render_air_quality(frame, middle[1], &snapshot.air_quality, palette);

    render_sun(frame, rows[3], snapshot.sun.as_ref(), palette);
}

/// Splits an area horizontally, giving `left_percent` to the left column
fn split_columns(area: Rect, left_percent: u16) -> std::rc::Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(left_percent),
            Constraint::Percentage(100 - left_percent),
        ])
        .split(area)
}

fn section_block<'a>(title: &'a str, palette: &Palette) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.header))
        .title(Span::styled(
            format!(" {} ", title),
            Style::default().fg(palette.header).add_modifier(Modifier::BOLD),
        ))
}

/// Label padded to a fixed width, followed by a value
fn labeled(label: &str, value: Span<'static>, palette: &Palette) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{:<12}", label), Style::default().fg(palette.secondary)),
        value,
    ])
}

fn band_span(text: String, band: &Band) -> Span<'static> {
    Span::styled(text, Style::default().fg(token_color(band.color)))
}

fn render_current(frame: &mut Frame, area: Rect, current: &CurrentPanel, palette: &Palette) {
    let lines = vec![
        Line::from(Span::styled(
            format!("{}  {}°C", current.icon, current.temperature),
            Style::default().fg(palette.primary).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            current.description.clone(),
            Style::default().fg(palette.primary),
        )),
        Line::from(Span::styled(
            format!("Feels like {}°C", current.feels_like),
            Style::default().fg(palette.secondary),
        )),
        Line::from(vec![
            Span::styled(format!("H: {}°", current.high), Style::default().fg(palette.highlight)),
            Span::raw("  "),
            Span::styled(format!("L: {}°", current.low), Style::default().fg(palette.header)),
        ]),
    ];

    let paragraph = Paragraph::new(lines).block(section_block("Now", palette));
    frame.render_widget(paragraph, area);
}

fn render_details(frame: &mut Frame, area: Rect, details: &DetailsPanel, palette: &Palette) {
    let plain = |text: String| Span::styled(text, Style::default().fg(palette.primary));
    let visibility = details
        .visibility_km
        .map_or_else(|| "N/A".to_string(), |km| format!("{:.1} km", km));

    let lines = vec![
        labeled("Feels like", plain(format!("{}°C", details.feels_like)), palette),
        labeled(
            "Wind",
            plain(format!("{} {} m/s", details.wind_direction, details.wind_speed)),
            palette,
        ),
        labeled("Humidity", plain(format!("{}%", details.humidity)), palette),
        labeled(
            "UV index",
            band_span(format!("{} ({})", details.uv_index, details.uv_band.label), &details.uv_band),
            palette,
        ),
        labeled("Visibility", plain(visibility), palette),
        labeled("Pressure", plain(format!("{} hPa", details.pressure)), palette),
    ];

    let paragraph = Paragraph::new(lines).block(section_block("Details", palette));
    frame.render_widget(paragraph, area);
}

fn render_hourly(frame: &mut Frame, area: Rect, slots: &[HourlySlot], palette: &Palette) {
    let block = section_block("Next 24 hours", palette);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if slots.is_empty() {
        frame.render_widget(
            Paragraph::new("No forecast available").style(Style::default().fg(palette.secondary)),
            inner,
        );
        return;
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Length(1)])
        .split(inner);

    let count = slots.len() as u32;
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(slots.iter().map(|_| Constraint::Ratio(1, count)))
        .split(rows[0]);

    for (slot, column) in slots.iter().zip(columns.iter()) {
        let lines = vec![
            Line::from(Span::styled(slot.label.clone(), Style::default().fg(palette.secondary))),
            Line::from(Span::styled(
                format!("{} {}°", slot.icon, crate::format::whole_degrees(slot.temperature)),
                Style::default().fg(palette.primary),
            )),
            Line::from(Span::styled(
                format!("F{}", slot.wind.force),
                Style::default().fg(palette.secondary),
            )),
            Line::from(band_span(format!("UV {}", slot.uv_index), &slot.uv_band)),
        ];
        frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), *column);
    }

    let temperatures: Vec<f64> = slots.iter().map(|slot| slot.temperature).collect();
    frame.render_widget(
        TrendSparkline::new(&temperatures)
            .style(Style::default().fg(palette.header))
            .peak_style(Style::default().fg(palette.highlight)),
        rows[1],
    );
}

fn render_daily(frame: &mut Frame, area: Rect, days: &[DailyOutlook], palette: &Palette) {
    let lines: Vec<Line> = if days.is_empty() {
        vec![Line::from(Span::styled(
            "No outlook available",
            Style::default().fg(palette.secondary),
        ))]
    } else {
        days.iter()
            .map(|day| {
                Line::from(vec![
                    Span::styled(
                        format!("{} {:<7}", day.day_name, day.short_date),
                        Style::default().fg(palette.secondary),
                    ),
                    Span::raw(format!("{}  ", day.icon)),
                    Span::styled(format!("{:>3}°", day.high), Style::default().fg(palette.highlight)),
                    Span::styled(" / ", Style::default().fg(palette.secondary)),
                    Span::styled(format!("{:>3}°", day.low), Style::default().fg(palette.header)),
                    Span::styled(
                        format!("  rain {:>3}%", day.rain_chance),
                        Style::default().fg(palette.secondary),
                    ),
                ])
            })
            .collect()
    };

    let paragraph = Paragraph::new(lines).block(section_block("5-day outlook", palette));
    frame.render_widget(paragraph, area);
}

fn render_air_quality(frame: &mut Frame, area: Rect, air: &AirQualityPanel, palette: &Palette) {
    let source = match air.source {
        AirQualitySource::Live => "",
        AirQualitySource::Simulated => "  (estimated)",
    };

    let mut lines = vec![
        Line::from(vec![
            Span::styled(
                format!("AQI {}  ", air.index),
                Style::default()
                    .fg(token_color(air.band.color))
                    .add_modifier(Modifier::BOLD),
            ),
            band_span(air.band.label.to_string(), &air.band),
            Span::styled(source, Style::default().fg(palette.secondary)),
        ]),
        aqi_scale_line(air.scale_segments, palette),
    ];

    lines.extend(air.pollutants.iter().map(|level| {
        let value = match &level.band {
            Some(band) => band_span(level.display_value(), band),
            None => Span::styled(level.display_value(), Style::default().fg(palette.secondary)),
        };
        labeled(level.pollutant.label(), value, palette)
    }));

    let paragraph = Paragraph::new(lines).block(section_block("Air quality", palette));
    frame.render_widget(paragraph, area);
}

/// Six segments colored by AQI band, lit up to `segments`
fn aqi_scale_line(segments: u8, palette: &Palette) -> Line<'static> {
    let spans = classify::AQI
        .bands()
        .enumerate()
        .map(|(i, band)| {
            if i < usize::from(segments) {
                Span::styled("■■ ", Style::default().fg(token_color(band.color)))
            } else {
                Span::styled("□□ ", Style::default().fg(palette.secondary))
            }
        })
        .collect::<Vec<_>>();
    Line::from(spans)
}

fn render_sun(frame: &mut Frame, area: Rect, sun: Option<&SunPanel>, palette: &Palette) {
    let block = section_block("Daylight", palette);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(sun) = sun else {
        frame.render_widget(
            Paragraph::new("Sunrise and sunset unavailable").style(Style::default().fg(palette.secondary)),
            inner,
        );
        return;
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(inner);

    frame.render_widget(
        SunArc::new(sun.fraction).path_style(Style::default().fg(palette.secondary)),
        rows[0],
    );

    let labels = split_columns(rows[1], 50);
    frame.render_widget(
        Paragraph::new(format!("Sunrise {}", sun.sunrise)).style(Style::default().fg(palette.highlight)),
        labels[0],
    );
    frame.render_widget(
        Paragraph::new(format!("Sunset {}", sun.sunset))
            .style(Style::default().fg(palette.highlight))
            .alignment(Alignment::Right),
        labels[1],
    );
}

fn render_no_data(frame: &mut Frame, area: Rect, palette: &Palette) {
    let paragraph = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            "No weather data yet",
            Style::default().fg(palette.primary).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Press / to search for a city or r to retry",
            Style::default().fg(palette.secondary),
        )),
    ])
    .alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

fn render_status_line(frame: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let line = if app.input_mode == InputMode::Search {
        Line::from(vec![
            Span::styled(" City: ", Style::default().fg(palette.highlight)),
            Span::styled(format!("{}█", app.search_input), Style::default().fg(palette.primary)),
            Span::styled("  Enter search  Esc cancel", Style::default().fg(palette.secondary)),
        ])
    } else if let Some(status) = &app.status {
        Line::from(Span::styled(format!(" {}", status), Style::default().fg(palette.error)))
    } else {
        Line::from(Span::styled(
            " q quit  r refresh  t theme  / search  ? help",
            Style::default().fg(palette.secondary),
        ))
    };

    frame.render_widget(Paragraph::new(line), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{AppState, LoadRequest};
    use crate::cli::StartLocation;
    use crate::dashboard::Dashboard;
    use crate::prefs::PreferenceStore;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::{backend::TestBackend, Terminal};

    fn render_to_string(app: &App, width: u16, height: u16) -> String {
        let backend = TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|frame| render(frame, app)).unwrap();

        let buffer = terminal.backend().buffer();
        buffer.content().iter().map(|cell| cell.symbol()).collect()
    }

    async fn loaded_demo_app() -> App {
        let mut app = App::new(Dashboard::demo(PreferenceStore::in_memory()), StartLocation::Saved);
        let request = app.take_pending_load().unwrap();
        app.run_load(request).await;
        app
    }

    #[tokio::test]
    async fn test_renders_all_sections() {
        let app = loaded_demo_app().await;
        let content = render_to_string(&app, 110, 40);

        assert!(content.contains("Sample City"));
        assert!(content.contains("DEMO"));
        assert!(content.contains("Now"));
        assert!(content.contains("Details"));
        assert!(content.contains("Next 24 hours"));
        assert!(content.contains("5-day outlook"));
        assert!(content.contains("Air quality"));
        assert!(content.contains("Daylight"));
        assert!(content.contains("1015 hPa"));
        assert!(content.contains("AQI 45"));
        assert!(content.contains("Sunrise"));
    }

    #[test]
    fn test_renders_placeholder_without_data() {
        let mut app = App::new(Dashboard::demo(PreferenceStore::in_memory()), StartLocation::Saved);
        app.state = AppState::Dashboard;
        app.status = Some("Location not found: Atlantis".to_string());

        let content = render_to_string(&app, 80, 20);
        assert!(content.contains("No weather data yet"));
        assert!(content.contains("Location not found: Atlantis"));
    }

    #[tokio::test]
    async fn test_status_line_shows_search_input() {
        let mut app = loaded_demo_app().await;
        app.handle_key(KeyEvent::new(KeyCode::Char('/'), KeyModifiers::NONE));
        for c in "Lima".chars() {
            app.handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
        }

        let content = render_to_string(&app, 110, 40);
        assert!(content.contains("City: Lima"));
        assert_eq!(app.take_pending_load(), None::<LoadRequest>);
    }

    #[test]
    fn test_small_terminal_does_not_panic() {
        let app = App::new(Dashboard::demo(PreferenceStore::in_memory()), StartLocation::Saved);
        render_to_string(&app, 20, 5);
    }
}
