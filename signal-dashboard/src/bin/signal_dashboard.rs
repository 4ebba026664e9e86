/// Signal Dashboard TUI
///
/// Loads the scan engine's signal dataset once at startup and renders it as
/// a card grid with live search, category filters and a per-ticker detail
/// popup (sources, bullish/bearish split, price chart).
use std::{
    error::Error,
    fs::OpenOptions,
    io,
    path::Path,
    sync::{Arc, Mutex},
    time::Duration,
};

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use signal_dashboard::{
    load_or_empty, render_dashboard, App, ChartContainer, DashboardConfig, Dataset, DrawnLayout,
    LoadState, SpawnedChartWidget, YahooChartSource,
};
use tokio::sync::oneshot::{self, error::TryRecvError};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Route tracing output to a file so it never lands on the alternate screen
fn init_tracing(path: &Path) -> io::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = DashboardConfig::from_env()?;
    init_tracing(&config.log_file)?;
    info!("Starting signal dashboard, data source {}", config.data_source);

    // Setup panic hook to restore terminal on crash
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic_info);
    }));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Single dataset read, off the UI loop
    let (dataset_tx, dataset_rx) = oneshot::channel();
    {
        let source = config.data_source.clone();
        tokio::spawn(async move {
            let _ = dataset_tx.send(load_or_empty(&source).await);
        });
    }

    let chart = Arc::new(SpawnedChartWidget::new(
        YahooChartSource::new(&config.chart),
        config.chart.clone(),
    ));
    let mut app = App::new(chart, ChartContainer::new(config.chart.container_id.clone()));
    app.set_filter(config.filter);

    let result = run_app(&mut terminal, &mut app, dataset_rx);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    result?;
    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    mut dataset_rx: oneshot::Receiver<Dataset>,
) -> io::Result<()> {
    let tick_rate = Duration::from_millis(50);

    loop {
        if app.load_state() == LoadState::Loading {
            match dataset_rx.try_recv() {
                Ok(dataset) => app.set_dataset(dataset),
                Err(TryRecvError::Empty) => {}
                Err(TryRecvError::Closed) => {
                    warn!("Dataset loader exited without a result");
                    app.set_dataset(Dataset::default());
                }
            }
        }

        let mut drawn = DrawnLayout::default();
        terminal.draw(|f| drawn = render_dashboard(f, app))?;
        app.set_layout(drawn.hit_regions, drawn.columns);

        if event::poll(tick_rate)? {
            match event::read()? {
                Event::Key(key) => app.handle_key(key),
                Event::Mouse(mouse) => app.handle_mouse(mouse),
                _ => {}
            }
        }

        if app.should_quit() {
            return Ok(());
        }
    }
}
