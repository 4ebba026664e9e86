//! Dashboard application state
//!
//! Owns the loaded snapshot plus the derived view state (search text,
//! category filter, highlighted card, popup). Every frame re-derives the
//! visible cards from `(signals, search, filter)`; nothing is patched in
//! place.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::{Position, Rect};
use tracing::debug;

use crate::shared::chart::{ChartContainer, ChartWidget};
use crate::shared::detail::SignalDetail;
use crate::shared::filter::{filter_signals, SignalFilter};
use crate::shared::metrics::SignalMetrics;
use crate::shared::types::{Dataset, Signal};

/// Dataset load progress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Loaded,
}

/// Keyboard focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
}

/// Detail popup state machine: closed -> open on card activation,
/// open -> closed only through the close control
#[derive(Debug, Clone, PartialEq)]
pub enum Modal {
    Closed,
    Open(SignalDetail),
}

/// Clickable regions recorded by the last draw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    /// Index into the current filtered view
    Card(usize),
    Filter(SignalFilter),
    CloseModal,
    SearchBar,
}

pub struct App {
    signals: Vec<Signal>,
    last_scan: Option<String>,
    metrics: SignalMetrics,
    load_state: LoadState,
    loaded_at: Option<DateTime<Utc>>,
    search: String,
    input_mode: InputMode,
    filter: SignalFilter,
    selected: usize,
    columns: usize,
    modal: Modal,
    chart: Arc<dyn ChartWidget>,
    chart_container: ChartContainer,
    hit_regions: Vec<(Rect, HitTarget)>,
    should_quit: bool,
}

impl App {
    pub fn new(chart: Arc<dyn ChartWidget>, chart_container: ChartContainer) -> Self {
        Self {
            signals: Vec::new(),
            last_scan: None,
            metrics: SignalMetrics::default(),
            load_state: LoadState::Loading,
            loaded_at: None,
            search: String::new(),
            input_mode: InputMode::Normal,
            filter: SignalFilter::All,
            selected: 0,
            columns: 1,
            modal: Modal::Closed,
            chart,
            chart_container,
            hit_regions: Vec::new(),
            should_quit: false,
        }
    }

    /// Install the loaded snapshot and compute metrics once
    pub fn set_dataset(&mut self, dataset: Dataset) {
        self.metrics = SignalMetrics::summarize(&dataset.signals);
        self.signals = dataset.signals;
        self.last_scan = dataset.last_scan;
        self.load_state = LoadState::Loaded;
        self.loaded_at = Some(Utc::now());
        self.selected = 0;
    }

    pub fn signals(&self) -> &[Signal] {
        &self.signals
    }

    pub fn metrics(&self) -> &SignalMetrics {
        &self.metrics
    }

    pub fn last_scan(&self) -> Option<&str> {
        self.last_scan.as_deref()
    }

    pub fn load_state(&self) -> LoadState {
        self.load_state
    }

    pub fn loaded_at(&self) -> Option<DateTime<Utc>> {
        self.loaded_at
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn input_mode(&self) -> InputMode {
        self.input_mode
    }

    pub fn filter(&self) -> SignalFilter {
        self.filter
    }

    pub fn modal(&self) -> &Modal {
        &self.modal
    }

    pub fn chart_container(&self) -> &ChartContainer {
        &self.chart_container
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Cards to draw, in input order
    pub fn visible(&self) -> Vec<&Signal> {
        filter_signals(&self.signals, &self.search, self.filter)
    }

    /// Highlighted card index, clamped to the current view
    pub fn selected(&self) -> usize {
        let len = self.visible().len();
        self.selected.min(len.saturating_sub(1))
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
        self.selected = 0;
    }

    pub fn set_filter(&mut self, filter: SignalFilter) {
        if self.filter != filter {
            debug!("Filter changed to {}", filter);
        }
        self.filter = filter;
        self.selected = 0;
    }

    /// Record clickable regions and the card grid width from the last draw
    pub fn set_layout(&mut self, hit_regions: Vec<(Rect, HitTarget)>, columns: usize) {
        self.hit_regions = hit_regions;
        self.columns = columns.max(1);
    }

    /// Open the popup for the card at `index` in the current view
    pub fn open_card(&mut self, index: usize) {
        let signal = match self.visible().get(index) {
            Some(signal) => (*signal).clone(),
            None => return,
        };
        self.selected = index;
        self.open_detail(&signal);
    }

    pub fn open_detail(&mut self, signal: &Signal) {
        debug!("Opening detail for {}", signal.ticker);
        self.modal = Modal::Open(SignalDetail::from_signal(signal));
        self.chart.render(&signal.ticker, &self.chart_container);
    }

    pub fn close_detail(&mut self) {
        self.modal = Modal::Closed;
    }

    fn move_selection(&mut self, delta: isize) {
        let len = self.visible().len();
        if len == 0 {
            return;
        }
        let current = self.selected() as isize;
        self.selected = (current + delta).clamp(0, len as isize - 1) as usize;
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        // Raw mode swallows SIGINT, so Ctrl+C quits from any state. Other
        // chords are not text and never reach the search buffer.
        if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
            if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                self.should_quit = true;
            }
            return;
        }

        if let Modal::Open(_) = self.modal {
            match key.code {
                KeyCode::Char('x') | KeyCode::Char('X') => self.close_detail(),
                KeyCode::Char('q') => self.should_quit = true,
                _ => {}
            }
            return;
        }

        match self.input_mode {
            InputMode::Search => match key.code {
                KeyCode::Char(c) => {
                    self.search.push(c);
                    self.selected = 0;
                }
                KeyCode::Backspace => {
                    self.search.pop();
                    self.selected = 0;
                }
                KeyCode::Enter | KeyCode::Esc => self.input_mode = InputMode::Normal,
                _ => {}
            },
            InputMode::Normal => match key.code {
                KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
                KeyCode::Char('/') => self.input_mode = InputMode::Search,
                KeyCode::Char('1') => self.set_filter(SignalFilter::All),
                KeyCode::Char('2') => self.set_filter(SignalFilter::HighVelocity),
                KeyCode::Char('3') => self.set_filter(SignalFilter::BlindSpot),
                KeyCode::Tab | KeyCode::Char('f') => self.set_filter(self.filter.next()),
                KeyCode::Left | KeyCode::Char('h') => self.move_selection(-1),
                KeyCode::Right | KeyCode::Char('l') => self.move_selection(1),
                KeyCode::Up | KeyCode::Char('k') => self.move_selection(-(self.columns as isize)),
                KeyCode::Down | KeyCode::Char('j') => self.move_selection(self.columns as isize),
                KeyCode::Enter => self.open_card(self.selected()),
                _ => {}
            },
        }
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return;
        }

        let position = Position::new(mouse.column, mouse.row);
        let target = self
            .hit_regions
            .iter()
            .rev()
            .find(|(area, _)| area.contains(position))
            .map(|(_, target)| *target);

        if let Modal::Open(_) = self.modal {
            if target == Some(HitTarget::CloseModal) {
                self.close_detail();
            }
            return;
        }

        match target {
            Some(HitTarget::Card(index)) => self.open_card(index),
            Some(HitTarget::Filter(filter)) => self.set_filter(filter),
            Some(HitTarget::SearchBar) => self.input_mode = InputMode::Search,
            Some(HitTarget::CloseModal) | None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use serde_json::json;

    use crate::shared::detail::SourcePlatform;
    use crate::shared::loader::parse_dataset;

    #[derive(Default)]
    struct RecordingChart {
        calls: Mutex<Vec<String>>,
    }

    impl ChartWidget for RecordingChart {
        fn render(&self, symbol: &str, container: &ChartContainer) {
            container.clear(None);
            self.calls.lock().push(symbol.to_string());
        }
    }

    fn app_with(chart: Arc<RecordingChart>, dataset: Dataset) -> App {
        let mut app = App::new(chart, ChartContainer::new("price_chart"));
        app.set_dataset(dataset);
        app
    }

    fn scenario_dataset() -> Dataset {
        let body = json!({
            "metadata": {"last_scan": "2024-01-01"},
            "signals": [{
                "ticker": "ABC", "avg_sentiment": 0.1, "signal_strength": 5, "velocity": 2,
                "blind_spot": false, "sources": ["Reddit post"],
                "bullish_search_vol": 80, "bearish_search_vol": 20
            }]
        });
        parse_dataset(body.to_string().as_bytes()).unwrap()
    }

    fn multi_dataset() -> Dataset {
        serde_json::from_value::<Vec<Signal>>(json!([
            {"ticker": "AAA", "velocity": 1, "blind_spot": true},
            {"ticker": "BBB", "velocity": -1},
            {"ticker": "CCC", "velocity": 3},
        ]))
        .map(|signals| Dataset { signals, last_scan: None })
        .unwrap()
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn click(app: &mut App, column: u16, row: u16) {
        app.handle_mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        });
    }

    fn tickers(app: &App) -> Vec<String> {
        app.visible().iter().map(|s| s.ticker.clone()).collect()
    }

    #[test]
    fn test_end_to_end_scenario() {
        let chart = Arc::new(RecordingChart::default());
        let mut app = app_with(Arc::clone(&chart), scenario_dataset());

        assert_eq!(app.metrics().total, 1);
        assert_eq!(app.metrics().blind_spots, 0);
        assert_eq!(app.metrics().mean_sentiment_label(), "0.100");
        assert_eq!(app.last_scan(), Some("2024-01-01"));

        press(&mut app, KeyCode::Char('2'));
        assert_eq!(app.filter(), SignalFilter::HighVelocity);
        assert_eq!(tickers(&app), vec!["ABC"]);

        press(&mut app, KeyCode::Enter);
        let Modal::Open(detail) = app.modal() else {
            panic!("detail popup should be open");
        };
        assert_eq!(detail.ticker, "ABC");
        assert_eq!(detail.split.bullish_pct, 80.0);
        assert_eq!(detail.split.bearish_pct, 20.0);
        assert_eq!(detail.sources.len(), 1);
        assert_eq!(detail.sources[0].platform, SourcePlatform::Reddit);
        assert_eq!(*chart.calls.lock(), vec!["ABC".to_string()]);
    }

    #[test]
    fn test_modal_closes_only_via_close_control() {
        let chart = Arc::new(RecordingChart::default());
        let mut app = app_with(chart, scenario_dataset());
        app.set_layout(vec![(Rect::new(10, 2, 9, 1), HitTarget::CloseModal)], 1);

        app.open_card(0);
        press(&mut app, KeyCode::Esc);
        assert!(matches!(app.modal(), Modal::Open(_)));
        assert!(!app.should_quit());

        click(&mut app, 0, 0);
        assert!(matches!(app.modal(), Modal::Open(_)));

        click(&mut app, 12, 2);
        assert_eq!(*app.modal(), Modal::Closed);

        app.open_card(0);
        press(&mut app, KeyCode::Char('x'));
        assert_eq!(*app.modal(), Modal::Closed);
    }

    #[test]
    fn test_reopen_delegates_chart_again() {
        let chart = Arc::new(RecordingChart::default());
        let mut app = app_with(Arc::clone(&chart), multi_dataset());

        app.open_card(0);
        press(&mut app, KeyCode::Char('x'));
        app.open_card(2);

        assert_eq!(*chart.calls.lock(), vec!["AAA".to_string(), "CCC".to_string()]);
        let Modal::Open(detail) = app.modal() else {
            panic!("detail popup should be open");
        };
        assert_eq!(detail.ticker, "CCC");
    }

    #[test]
    fn test_search_mode_typing() {
        let chart = Arc::new(RecordingChart::default());
        let mut app = app_with(chart, multi_dataset());

        press(&mut app, KeyCode::Char('/'));
        assert_eq!(app.input_mode(), InputMode::Search);
        press(&mut app, KeyCode::Char('b'));
        assert_eq!(tickers(&app), vec!["BBB"]);

        // 'q' is text while searching
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.should_quit());
        assert!(app.visible().is_empty());

        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.input_mode(), InputMode::Normal);
        assert_eq!(app.search(), "b");
        assert_eq!(tickers(&app), vec!["BBB"]);
    }

    #[test]
    fn test_control_chords_skip_search_text() {
        let chart = Arc::new(RecordingChart::default());
        let mut app = app_with(chart, multi_dataset());

        press(&mut app, KeyCode::Char('/'));
        press(&mut app, KeyCode::Char('b'));
        app.handle_key(KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL));
        app.handle_key(KeyEvent::new(KeyCode::Char('x'), KeyModifiers::ALT));
        assert_eq!(app.search(), "b");
        assert!(!app.should_quit());

        // Shifted letters are still text
        app.handle_key(KeyEvent::new(KeyCode::Char('B'), KeyModifiers::SHIFT));
        assert_eq!(app.search(), "bB");

        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert_eq!(app.search(), "bB");
        assert!(app.should_quit());
    }

    #[test]
    fn test_ctrl_c_quits_with_popup_open() {
        let chart = Arc::new(RecordingChart::default());
        let mut app = app_with(chart, multi_dataset());
        app.open_card(0);

        app.handle_key(KeyEvent::new(KeyCode::Char('x'), KeyModifiers::CONTROL));
        assert!(matches!(app.modal(), Modal::Open(_)));

        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit());
    }

    #[test]
    fn test_filter_keys_and_mouse() {
        let chart = Arc::new(RecordingChart::default());
        let mut app = app_with(chart, multi_dataset());

        press(&mut app, KeyCode::Char('3'));
        assert_eq!(tickers(&app), vec!["AAA"]);

        press(&mut app, KeyCode::Tab);
        assert_eq!(app.filter(), SignalFilter::All);
        assert_eq!(tickers(&app), vec!["AAA", "BBB", "CCC"]);

        app.set_layout(
            vec![(Rect::new(0, 0, 10, 1), HitTarget::Filter(SignalFilter::HighVelocity))],
            1,
        );
        click(&mut app, 3, 0);
        assert_eq!(tickers(&app), vec!["AAA", "CCC"]);
    }

    #[test]
    fn test_card_click_opens_detail() {
        let chart = Arc::new(RecordingChart::default());
        let mut app = app_with(Arc::clone(&chart), multi_dataset());
        app.set_layout(
            vec![
                (Rect::new(0, 5, 20, 6), HitTarget::Card(0)),
                (Rect::new(20, 5, 20, 6), HitTarget::Card(1)),
            ],
            2,
        );

        click(&mut app, 25, 7);
        let Modal::Open(detail) = app.modal() else {
            panic!("detail popup should be open");
        };
        assert_eq!(detail.ticker, "BBB");
        assert_eq!(app.selected(), 1);
    }

    #[test]
    fn test_selection_moves_and_clamps() {
        let chart = Arc::new(RecordingChart::default());
        let mut app = app_with(chart, multi_dataset());
        app.set_layout(Vec::new(), 2);

        press(&mut app, KeyCode::Right);
        assert_eq!(app.selected(), 1);
        press(&mut app, KeyCode::Down);
        assert_eq!(app.selected(), 2);
        press(&mut app, KeyCode::Down);
        assert_eq!(app.selected(), 2);
        press(&mut app, KeyCode::Up);
        assert_eq!(app.selected(), 0);

        app.set_search("zzz");
        assert_eq!(app.selected(), 0);
        press(&mut app, KeyCode::Enter);
        assert_eq!(*app.modal(), Modal::Closed);
    }

    #[test]
    fn test_empty_dataset_after_failed_load() {
        let chart = Arc::new(RecordingChart::default());
        let app = app_with(chart, Dataset::default());
        assert_eq!(app.load_state(), LoadState::Loaded);
        assert_eq!(app.metrics().total, 0);
        assert_eq!(app.metrics().mean_sentiment_label(), "0.000");
        assert!(app.visible().is_empty());
    }
}
