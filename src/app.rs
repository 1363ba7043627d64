use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use std::io;
use std::path::PathBuf;
use std::{time::Duration, time::Instant};

use chrono::{DateTime, Local, NaiveDate};
use ratatui::{backend::Backend, Terminal};
use tracing::{debug, info};

use crate::data;
use crate::error::Result;
use crate::export;
use crate::filter::{load_weather_data, Filter, Loaded, RegionFilter};
use crate::ui;
use crate::units::UnitSystem;
use crate::weather::WeatherRecord;

const TICK: Duration = Duration::from_millis(250);

pub const MIN_INTERVAL: u64 = 5;
pub const MAX_INTERVAL: u64 = 60;
pub const DEFAULT_INTERVAL: u64 = 30;
const INTERVAL_STEP: i64 = 5;

pub type DataSource = Box<dyn Fn() -> Result<&'static [WeatherRecord]>>;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Tab {
    #[default]
    Temperature,
    Metrics,
    Data,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Temperature, Tab::Metrics, Tab::Data];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Temperature => "Temperature Analysis",
            Tab::Metrics => "Weather Metrics",
            Tab::Data => "Data View",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    fn next(self) -> Tab {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    fn prev(self) -> Tab {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Re-run the view once `interval` has elapsed since the last refresh.
#[derive(Clone, Copy, Debug)]
pub struct AutoRefresh {
    pub enabled: bool,
    interval: u64,
    last_refresh: Instant,
}

impl AutoRefresh {
    pub fn new(enabled: bool, interval: u64, now: Instant) -> Self {
        Self {
            enabled,
            interval: interval.clamp(MIN_INTERVAL, MAX_INTERVAL),
            last_refresh: now,
        }
    }

    pub fn interval(&self) -> u64 {
        self.interval
    }

    pub fn due(&self, now: Instant) -> bool {
        self.enabled
            && now.saturating_duration_since(self.last_refresh) > Duration::from_secs(self.interval)
    }

    pub fn mark(&mut self, now: Instant) {
        self.last_refresh = now;
    }

    pub fn adjust(&mut self, delta: i64) {
        let secs = (self.interval as i64 + delta).clamp(MIN_INTERVAL as i64, MAX_INTERVAL as i64);
        self.interval = secs as u64;
    }
}

/// Startup choices, usually from the command line.
#[derive(Clone, Debug)]
pub struct Settings {
    pub today: NaiveDate,
    pub date: NaiveDate,
    pub region: RegionFilter,
    pub auto_refresh: bool,
    pub refresh_interval: u64,
    pub units: UnitSystem,
    pub out_dir: PathBuf,
}

pub struct App {
    pub today: NaiveDate,
    pub filter: Filter,
    pub tab: Tab,
    pub units: UnitSystem,
    pub refresh: AutoRefresh,
    pub loaded: Loaded,
    pub last_updated: DateTime<Local>,
    pub status: Option<String>,
    out_dir: PathBuf,
    source: DataSource,
    should_quit: bool,
}

impl App {
    pub fn new(settings: Settings, source: DataSource) -> Self {
        let mut app = Self {
            today: settings.today,
            filter: Filter {
                date: settings.date,
                region: settings.region,
            },
            tab: Tab::default(),
            units: settings.units,
            refresh: AutoRefresh::new(
                settings.auto_refresh,
                settings.refresh_interval,
                Instant::now(),
            ),
            loaded: Loaded::default(),
            last_updated: Local::now(),
            status: None,
            out_dir: settings.out_dir,
            source,
            should_quit: false,
        };
        app.reload();
        app
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn reload(&mut self) {
        self.loaded = load_weather_data(|| (self.source)(), &self.filter);
        self.last_updated = Local::now();
    }

    /// Move the selected date, staying inside the selectable window.
    pub fn shift_date(&mut self, days: i64) {
        let window = data::window(self.today);
        let date = self.filter.date + chrono::Duration::days(days);
        let date = date.clamp(*window.start(), *window.end());
        if date != self.filter.date {
            self.filter.date = date;
            self.reload();
        }
    }

    pub fn cycle_region(&mut self, forward: bool) {
        self.filter.region = self.filter.region.cycle(forward);
        self.reload();
    }

    pub fn export(&mut self) {
        if self.loaded.records.is_empty() {
            self.status = Some("Nothing to export".to_string());
            return;
        }
        self.status = Some(
            match export::write_csv(&self.out_dir, self.filter.date, &self.loaded.records) {
                Ok(path) => format!("Saved {}", path.display()),
                Err(e) => format!("Export failed: {e}"),
            },
        );
    }

    pub fn tick(&mut self, now: Instant) {
        if self.refresh.due(now) {
            self.refresh.mark(now);
            info!(interval = self.refresh.interval(), "auto refresh");
            self.reload();
        }
    }

    pub fn on_key(&mut self, key: KeyEvent) {
        debug!(code = ?key.code, "key pressed");
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Left | KeyCode::Char('h') => self.shift_date(-1),
            KeyCode::Right | KeyCode::Char('l') => self.shift_date(1),
            KeyCode::Up | KeyCode::Char('k') => self.cycle_region(false),
            KeyCode::Down | KeyCode::Char('j') => self.cycle_region(true),
            KeyCode::Tab => self.tab = self.tab.next(),
            KeyCode::BackTab => self.tab = self.tab.prev(),
            KeyCode::Char(c @ '1'..='3') => self.tab = Tab::ALL[c as usize - '1' as usize],
            KeyCode::Char('a') => {
                self.refresh.enabled = !self.refresh.enabled;
                self.refresh.mark(Instant::now());
            }
            KeyCode::Char('+') | KeyCode::Char('=') => self.refresh.adjust(INTERVAL_STEP),
            KeyCode::Char('-') => self.refresh.adjust(-INTERVAL_STEP),
            KeyCode::Char('u') => self.units = self.units.toggle(),
            KeyCode::Char('r') => {
                self.refresh.mark(Instant::now());
                self.reload();
            }
            KeyCode::Char('e') => self.export(),
            _ => {}
        }
    }
}

pub fn run_app<B: Backend>(terminal: &mut Terminal<B>, mut app: App) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, &app))?;

        if event::poll(TICK)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if app.should_quit() {
            return Ok(());
        }
        app.tick(Instant::now());
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::data::generate_sample_data;
    use crate::error::DashError;
    use crate::filter::Notice;
    use crate::weather::Region;
    use crossterm::event::KeyModifiers;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::OnceLock;

    pub(crate) fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    fn fixture() -> &'static [WeatherRecord] {
        static DATA: OnceLock<Vec<WeatherRecord>> = OnceLock::new();
        DATA.get_or_init(|| generate_sample_data(today(), &mut StdRng::seed_from_u64(5)))
    }

    pub(crate) fn settings() -> Settings {
        Settings {
            today: today(),
            date: today(),
            region: RegionFilter::All,
            auto_refresh: false,
            refresh_interval: DEFAULT_INTERVAL,
            units: UnitSystem::Metric,
            out_dir: PathBuf::from("."),
        }
    }

    pub(crate) fn app_with(settings: Settings) -> App {
        App::new(settings, Box::new(|| Ok::<_, DashError>(fixture())))
    }

    fn press(app: &mut App, code: KeyCode) {
        app.on_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn test_initial_load() {
        let app = app_with(settings());
        assert_eq!(app.loaded.records.len(), 8);
        assert_eq!(app.loaded.notice, None);
    }

    #[test]
    fn test_region_keys_cycle_filter() {
        let mut app = app_with(settings());
        press(&mut app, KeyCode::Down);
        assert_eq!(app.filter.region, RegionFilter::Only(Region::Dubai));
        assert_eq!(app.loaded.records.len(), 1);
        press(&mut app, KeyCode::Up);
        press(&mut app, KeyCode::Up);
        assert_eq!(app.filter.region, RegionFilter::Only(Region::Tokyo));
    }

    #[test]
    fn test_date_is_clamped_to_window() {
        let mut app = app_with(settings());
        press(&mut app, KeyCode::Right);
        assert_eq!(app.filter.date, today());

        for _ in 0..40 {
            press(&mut app, KeyCode::Left);
        }
        assert_eq!(app.filter.date, *data::window(today()).start());
        assert!(app.loaded.records.is_empty());
        assert!(matches!(app.loaded.notice, Some(Notice::Warning(_))));
    }

    #[test]
    fn test_tab_keys() {
        let mut app = app_with(settings());
        press(&mut app, KeyCode::Char('3'));
        assert_eq!(app.tab, Tab::Data);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.tab, Tab::Temperature);
        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.tab, Tab::Data);
    }

    #[test]
    fn test_quit_keys() {
        let mut app = app_with(settings());
        assert!(!app.should_quit());
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit());
    }

    #[test]
    fn test_interval_keys_are_clamped() {
        let mut app = app_with(settings());
        for _ in 0..20 {
            press(&mut app, KeyCode::Char('+'));
        }
        assert_eq!(app.refresh.interval(), MAX_INTERVAL);
        for _ in 0..20 {
            press(&mut app, KeyCode::Char('-'));
        }
        assert_eq!(app.refresh.interval(), MIN_INTERVAL);
    }

    #[test]
    fn test_auto_refresh_threshold() {
        let start = Instant::now();
        let mut refresh = AutoRefresh::new(true, 10, start);
        assert!(!refresh.due(start + Duration::from_secs(10)));
        assert!(refresh.due(start + Duration::from_millis(10_001)));

        refresh.mark(start + Duration::from_secs(11));
        assert!(!refresh.due(start + Duration::from_secs(20)));

        refresh.enabled = false;
        assert!(!refresh.due(start + Duration::from_secs(600)));
    }

    #[test]
    fn test_auto_refresh_interval_clamped_on_creation() {
        let now = Instant::now();
        assert_eq!(AutoRefresh::new(true, 1, now).interval(), MIN_INTERVAL);
        assert_eq!(AutoRefresh::new(true, 600, now).interval(), MAX_INTERVAL);
    }

    #[test]
    fn test_tick_reloads_only_after_interval() {
        let mut app = app_with(settings());
        let start = Instant::now();
        let interval = Duration::from_secs(MIN_INTERVAL);
        let just_over = Duration::from_millis(1);
        app.refresh = AutoRefresh::new(true, MIN_INTERVAL, start);
        app.loaded = Loaded::default();

        // At the threshold: no reload and the refresh clock is untouched.
        app.tick(start + interval);
        assert!(app.loaded.records.is_empty());
        assert!(app.refresh.due(start + interval + just_over));

        let now = start + interval + Duration::from_secs(1);
        app.tick(now);
        assert_eq!(app.loaded.records.len(), 8);
        assert!(!app.refresh.due(now + interval));
        assert!(app.refresh.due(now + interval + just_over));
    }

    #[test]
    fn test_tick_ignored_when_disabled() {
        let mut app = app_with(settings());
        let start = Instant::now();
        app.refresh = AutoRefresh::new(false, MIN_INTERVAL, start);
        app.loaded = Loaded::default();

        app.tick(start + Duration::from_secs(MAX_INTERVAL * 2));
        assert!(app.loaded.records.is_empty());
    }

    #[test]
    fn test_source_failure_shows_error() {
        let app = App::new(
            settings(),
            Box::new(|| {
                Err::<&'static [WeatherRecord], _>(DashError::UnknownRegion {
                    name: "Nowhere".into(),
                })
            }),
        );
        assert!(app.loaded.records.is_empty());
        assert!(matches!(app.loaded.notice, Some(Notice::Error(_))));
    }

    #[test]
    fn test_export_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_with(Settings {
            out_dir: dir.path().to_path_buf(),
            ..settings()
        });
        press(&mut app, KeyCode::Char('e'));
        let path = dir.path().join("weather_data_2024-03-15.csv");
        assert!(path.exists());
        assert_eq!(app.status, Some(format!("Saved {}", path.display())));
    }

    #[test]
    fn test_export_with_no_rows() {
        let mut app = app_with(Settings {
            date: *data::window(today()).start(),
            ..settings()
        });
        app.export();
        assert_eq!(app.status.as_deref(), Some("Nothing to export"));
    }
}
