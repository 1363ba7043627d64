use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{
        Axis, Bar, BarChart, BarGroup, Block, BorderType, Borders, Chart, Dataset, GraphType,
        LegendPosition, Paragraph, Row, Table, Tabs, Wrap,
    },
    Frame,
};

use crate::app::{App, Tab};
use crate::charts::{self, BarPanel, ScatterPanel};
use crate::export;
use crate::filter::{Notice, Summary};
use crate::weather::WeatherRecord;

const TITLE: &str = "Global Weather Intelligence Dashboard";
const SIDEBAR_WIDTH: u16 = 32;

const COLUMNS: [&str; 7] = [
    "date",
    "region",
    "temperature",
    "humidity",
    "wind_speed",
    "air_quality_index",
    "precipitation",
];

const KEYS: [(&str, &str); 9] = [
    ("←/→", "date"),
    ("↑/↓", "region"),
    ("tab 1-3", "view"),
    ("a", "auto refresh"),
    ("+/-", "interval"),
    ("u", "units"),
    ("r", "refresh"),
    ("e", "export csv"),
    ("q", "quit"),
];

fn panel(title: &str) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(
            format!(" {title} "),
            Style::default().fg(Color::Yellow),
        ))
        .title_alignment(Alignment::Left)
        .border_style(Style::default().fg(Color::Cyan))
        .border_type(BorderType::Rounded)
}

pub fn draw(f: &mut Frame, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(10),
            Constraint::Length(2),
        ])
        .split(f.area());

    let header = Paragraph::new(Line::from(Span::styled(
        TITLE,
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .border_type(BorderType::Rounded),
    );
    f.render_widget(header, rows[0]);

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(20)])
        .split(rows[1]);

    f.render_widget(display_controls(app), cols[0]);
    draw_main(f, cols[1], app);
    f.render_widget(display_footer(app), rows[2]);
}

fn display_controls(app: &App) -> Paragraph<'_> {
    let label = |text: &'static str| {
        Line::from(Span::styled(
            text,
            Style::default().add_modifier(Modifier::BOLD),
        ))
    };
    let value = |text: String| {
        Line::from(vec![
            Span::raw("  "),
            Span::styled(text, Style::default().fg(Color::Green)),
        ])
    };

    let auto = if app.refresh.enabled { "[x]" } else { "[ ]" };
    let mut lines = vec![
        label("Date Selection"),
        value(app.filter.date.format("%Y-%m-%d").to_string()),
        Line::from(""),
        label("Region Filter"),
        value(app.filter.region.to_string()),
        Line::from(""),
        label("Refresh Settings"),
        value(format!("{auto} Auto Refresh")),
        value(format!("Interval {}s", app.refresh.interval())),
        Line::from(""),
        label("Units"),
        value(app.units.to_string()),
        Line::from(""),
    ];
    lines.extend(KEYS.iter().map(|(key, action)| {
        Line::from(vec![
            Span::styled(format!(" {key:8}"), Style::default().fg(Color::Blue)),
            Span::raw(*action),
        ])
    }));

    Paragraph::new(lines).block(panel("Dashboard Controls"))
}

fn display_footer(app: &App) -> Paragraph<'_> {
    let mut lines = vec![Line::from(format!(
        "{TITLE} | Last Updated: {}",
        app.last_updated.format("%Y-%m-%d %H:%M:%S")
    ))
    .alignment(Alignment::Center)];
    if let Some(status) = &app.status {
        lines.push(Line::from(Span::styled(
            status.as_str(),
            Style::default().fg(Color::Green),
        )));
    }
    Paragraph::new(lines).style(Style::default().fg(Color::DarkGray))
}

fn draw_main(f: &mut Frame, area: Rect, app: &App) {
    let Some(summary) = app.loaded.summary() else {
        f.render_widget(display_notice(app.loaded.notice.as_ref()), area);
        return;
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),
            Constraint::Length(3),
            Constraint::Min(8),
        ])
        .split(area);

    draw_cards(f, rows[0], app, &summary);

    let titles: Vec<&str> = Tab::ALL.iter().map(|t| t.title()).collect();
    let tabs = Tabs::new(titles)
        .select(app.tab.index())
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .border_type(BorderType::Rounded),
        );
    f.render_widget(tabs, rows[1]);

    let records = &app.loaded.records;
    match app.tab {
        Tab::Temperature => draw_pair(
            f,
            rows[2],
            &charts::temperature_bars(records),
            &charts::temperature_vs_humidity(records),
        ),
        Tab::Metrics => draw_pair(
            f,
            rows[2],
            &charts::wind_bars(records),
            &charts::air_quality(records),
        ),
        Tab::Data => draw_data_view(f, rows[2], app),
    }
}

fn display_notice(notice: Option<&Notice>) -> Paragraph<'_> {
    let (text, color) = match notice {
        Some(Notice::Error(msg)) => (msg.as_str(), Color::Red),
        Some(Notice::Warning(msg)) => (msg.as_str(), Color::Yellow),
        None => (crate::filter::NO_DATA, Color::Yellow),
    };
    Paragraph::new(Line::from(Span::styled(
        text,
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )))
    .wrap(Wrap { trim: true })
    .block(panel("Notice"))
}

fn draw_cards(f: &mut Frame, area: Rect, app: &App, summary: &Summary) {
    let cards = [
        ("Average Temperature", app.units.temperature(summary.temperature)),
        ("Average Humidity", format!("{:.1}%", summary.humidity)),
        ("Average Wind Speed", app.units.speed(summary.wind_speed)),
        ("Average AQI", format!("{:.1}", summary.air_quality_index)),
    ];
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(area);

    for ((title, value), chunk) in cards.into_iter().zip(chunks.iter()) {
        let card = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                value,
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )),
        ])
        .alignment(Alignment::Center)
        .block(panel(title));
        f.render_widget(card, *chunk);
    }
}

fn draw_pair(f: &mut Frame, area: Rect, bars: &BarPanel, scatter: &ScatterPanel) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);
    draw_bars(f, chunks[0], bars);
    draw_scatter(f, chunks[1], scatter);
}

fn draw_bars(f: &mut Frame, area: Rect, panel_data: &BarPanel) {
    let bars: Vec<Bar> = panel_data
        .bars
        .iter()
        .map(|b| {
            // BarChart only takes integers; keep one decimal of resolution.
            Bar::default()
                .label(Line::from(b.label))
                .value((b.value * 10.0).round().max(0.0) as u64)
                .text_value(format!("{:.1}", b.value))
                .style(Style::default().fg(b.color))
                .value_style(Style::default().fg(Color::Black).bg(b.color))
        })
        .collect();

    let count = bars.len().max(1) as u16;
    let label_width = panel_data
        .bars
        .iter()
        .map(|b| b.label.chars().count() as u16)
        .max()
        .unwrap_or(0);
    let inner_width = area.width.saturating_sub(2);
    let inner_height = area.height.saturating_sub(2);

    // Lay bars out sideways so region names keep their full width; fall back
    // to columns when the panel is too narrow for the labels.
    let (direction, bar_width) = if inner_width > label_width + 2 {
        let rows = ((inner_height + 1) / count).saturating_sub(1).clamp(1, 3);
        (Direction::Horizontal, rows)
    } else {
        (Direction::Vertical, (inner_width / count).saturating_sub(1).max(1))
    };

    let chart = BarChart::default()
        .block(panel(&format!("{} ({})", panel_data.title, panel_data.unit)))
        .direction(direction)
        .data(BarGroup::default().bars(&bars))
        .bar_width(bar_width)
        .bar_gap(1);
    f.render_widget(chart, area);
}

fn draw_scatter(f: &mut Frame, area: Rect, panel_data: &ScatterPanel) {
    let datasets: Vec<Dataset> = panel_data
        .series
        .iter()
        .map(|s| {
            Dataset::default()
                .name(s.name.as_str())
                .marker(symbols::Marker::Dot)
                .graph_type(GraphType::Scatter)
                .style(Style::default().fg(s.color))
                .data(&s.points)
        })
        .collect();

    let axis_labels = |[lo, hi]: [f64; 2]| {
        vec![
            Line::from(format!("{lo:.0}")),
            Line::from(format!("{:.0}", (lo + hi) / 2.0)),
            Line::from(format!("{hi:.0}")),
        ]
    };
    let dim = Style::default().fg(Color::DarkGray);

    let chart = Chart::new(datasets)
        .block(panel(panel_data.title))
        .x_axis(
            Axis::default()
                .title(Span::styled(panel_data.x_title, dim))
                .bounds(panel_data.x_bounds)
                .labels(axis_labels(panel_data.x_bounds)),
        )
        .y_axis(
            Axis::default()
                .title(Span::styled(panel_data.y_title, dim))
                .bounds(panel_data.y_bounds)
                .labels(axis_labels(panel_data.y_bounds)),
        )
        .legend_position(Some(LegendPosition::TopRight))
        .hidden_legend_constraints((Constraint::Ratio(1, 1), Constraint::Ratio(1, 1)));
    f.render_widget(chart, area);
}

fn record_row(r: &WeatherRecord) -> Row<'static> {
    Row::new(vec![
        r.date.format("%Y-%m-%d").to_string(),
        r.region.to_string(),
        format!("{:.1}", r.temperature),
        r.humidity.to_string(),
        format!("{:.1}", r.wind_speed),
        r.air_quality_index.to_string(),
        format!("{:.2}", r.precipitation),
    ])
}

fn draw_data_view(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(area);

    let header = Row::new(COLUMNS).style(
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    );
    let widths = [
        Constraint::Length(11),
        Constraint::Length(10),
        Constraint::Length(12),
        Constraint::Length(9),
        Constraint::Length(11),
        Constraint::Length(18),
        Constraint::Length(14),
    ];
    let table = Table::new(app.loaded.records.iter().map(record_row), widths)
        .header(header)
        .block(panel("Raw Data View"));
    f.render_widget(table, chunks[0]);

    let hint = Line::from(vec![
        Span::styled(" e ", Style::default().fg(Color::Blue)),
        Span::raw(format!(
            "Download Data as CSV ({})",
            export::file_name(app.filter.date)
        )),
    ]);
    f.render_widget(Paragraph::new(hint), chunks[1]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::{app_with, settings, today};
    use crate::app::Settings;
    use crate::data;
    use crate::filter::RegionFilter;
    use crate::units::UnitSystem;
    use crate::weather::Region;
    use ratatui::{backend::TestBackend, Terminal};

    fn render(app: &App) -> String {
        render_with(160, 48, |f| draw(f, app))
    }

    fn render_with(width: u16, height: u16, paint: impl FnOnce(&mut Frame)) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(paint).unwrap();
        let buffer = terminal.backend().buffer();
        let width = buffer.area.width as usize;
        buffer
            .content()
            .chunks(width)
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_renders_summary_cards() {
        let screen = render(&app_with(settings()));
        assert!(screen.contains(TITLE));
        for card in [
            "Average Temperature",
            "Average Humidity",
            "Average Wind Speed",
            "Average AQI",
        ] {
            assert!(screen.contains(card), "missing {card}");
        }
        assert!(screen.contains("Temperature Distribution by Region"));
        assert!(screen.contains("Last Updated:"));
    }

    #[test]
    fn test_renders_single_region_value() {
        let app = app_with(Settings {
            region: RegionFilter::Only(Region::London),
            ..settings()
        });
        let expected = format!("{:.1}°C", app.loaded.records[0].temperature);
        let screen = render(&app);
        assert!(screen.contains(&expected), "missing {expected}");
        assert!(screen.contains("London"));
    }

    #[test]
    fn test_renders_imperial_units() {
        let app = app_with(Settings {
            units: UnitSystem::Imperial,
            ..settings()
        });
        let screen = render(&app);
        assert!(screen.contains("°F"));
        assert!(screen.contains("mph"));
    }

    #[test]
    fn test_renders_warning_when_empty() {
        let app = app_with(Settings {
            date: *data::window(today()).start(),
            ..settings()
        });
        let screen = render(&app);
        assert!(screen.contains("No data found for the selected filters."));
        assert!(!screen.contains("Average Temperature"));
    }

    #[test]
    fn test_renders_data_view() {
        let mut app = app_with(settings());
        app.tab = Tab::Data;
        let screen = render(&app);
        assert!(screen.contains("air_quality_index"));
        assert!(screen.contains("weather_data_2024-03-15.csv"));
        for region in Region::ALL {
            assert!(screen.contains(region.name()), "missing {region}");
        }
    }

    #[test]
    fn test_renders_metrics_tab() {
        let mut app = app_with(settings());
        app.tab = Tab::Metrics;
        let screen = render(&app);
        assert!(screen.contains("Wind Speed by Region"));
        assert!(screen.contains("Air Quality Index by Region"));
    }

    #[test]
    fn test_bar_labels_show_full_region_names() {
        let app = app_with(settings());
        // Size of one chart panel on a 160x48 screen.
        let screen = render_with(64, 35, |f| {
            draw_bars(f, f.area(), &charts::temperature_bars(&app.loaded.records))
        });
        for region in Region::ALL {
            assert!(screen.contains(region.name()), "missing {region}");
        }
    }

    #[test]
    fn test_bars_in_narrow_panel_do_not_panic() {
        let app = app_with(settings());
        let screen = render_with(10, 12, |f| {
            draw_bars(f, f.area(), &charts::wind_bars(&app.loaded.records))
        });
        assert!(!screen.trim().is_empty());
    }
}
