use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout},
    Terminal,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

use upwatch::app::{App, View};
use upwatch::data::duration::{format_elapsed, format_timestamp, parse_days};
use upwatch::data::timeline::monitor_timeline;
use upwatch::data::uptime::monitor_sla;
use upwatch::data::{find_monitor, Filter, StatusPage};
use upwatch::source::{decode_state, DataSource, FileSource, StreamSource};
use upwatch::viewstate::{FileViewStore, MemoryViewStore, ViewStateStore};
use upwatch::{events, export, ui, MonitorState, PageConfig};

#[derive(Parser, Debug)]
#[command(name = "upwatch")]
#[command(about = "Terminal status page for a fleet of uptime monitors")]
struct Args {
    /// Path to the state.json written by the checker
    #[arg(short, long, default_value = "state.json", conflicts_with_all = ["connect"])]
    state: PathBuf,

    /// Connect to a TCP endpoint streaming newline-delimited states (host:port)
    #[arg(short, long, conflicts_with_all = ["state"])]
    connect: Option<String>,

    /// Page configuration (monitors, groups, maintenance windows)
    #[arg(long, env = "UPWATCH_CONFIG")]
    config: Option<PathBuf>,

    /// Refresh interval in seconds (only used with --state)
    #[arg(short, long, default_value = "1")]
    refresh: u64,

    /// Incident timeline window in whole days (e.g. "30d", "48h"; a bare number is days)
    #[arg(long)]
    timeline: Option<String>,

    /// Print the detail of one monitor and exit
    #[arg(short, long, conflicts_with_all = ["connect", "export"])]
    monitor: Option<String>,

    /// Export the computed status page to a JSON file and exit
    #[arg(short, long, conflicts_with_all = ["connect"])]
    export: Option<PathBuf>,

    /// Write logs to this file (filtered by RUST_LOG)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Remember expanded groups in this file between runs
    #[arg(long)]
    view_state: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(path) = &args.log_file {
        init_logging(path)?;
    }

    let mut config = match &args.config {
        Some(path) => PageConfig::load(path)?,
        None => PageConfig::default(),
    };
    if let Some(window) = &args.timeline {
        config.settings.timeline_days = parse_days(window)?;
    }

    if let Some(export_path) = &args.export {
        return export_to_file(&args.state, export_path, &config);
    }

    if let Some(id) = &args.monitor {
        return print_monitor(&args.state, &config, id);
    }

    let view_store: Box<dyn ViewStateStore> = match &args.view_state {
        Some(path) => Box::new(FileViewStore::open(path)),
        None => Box::new(MemoryViewStore::new()),
    };

    if let Some(ref addr) = args.connect {
        return run_with_tcp(addr, config, view_store);
    }

    let source = Box::new(FileSource::new(&args.state));
    run_tui(source, config, view_store, Duration::from_secs(args.refresh))
}

/// Install a file subscriber. The terminal belongs to the TUI.
fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Failed to create log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("upwatch=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

fn read_state(path: &Path) -> Result<MonitorState> {
    let bytes = std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    decode_state(&bytes).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Run with a TCP stream data source
fn run_with_tcp(addr: &str, config: PageConfig, view_store: Box<dyn ViewStateStore>) -> Result<()> {
    let rt = tokio::runtime::Runtime::new()?;

    let source = rt.block_on(async {
        use tokio::net::TcpStream;

        println!("Connecting to {}...", addr);
        match TcpStream::connect(addr).await {
            Ok(stream) => {
                println!("Connected!");
                Ok(Box::new(StreamSource::spawn(stream, addr)) as Box<dyn DataSource>)
            }
            Err(e) => Err(anyhow::anyhow!("Failed to connect to {}: {}", addr, e)),
        }
    })?;

    // Streamed states arrive on their own schedule; poll often
    run_tui(source, config, view_store, Duration::from_millis(100))
}

/// Run the TUI with the given data source
fn run_tui(
    source: Box<dyn DataSource>,
    config: PageConfig,
    view_store: Box<dyn ViewStateStore>,
    refresh_interval: Duration,
) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, EnableFocusChange)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Restore the terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic);
    }));

    info!(source = source.description(), "starting status page");
    let mut app = App::new(source, config, view_store, now());
    let _ = app.reload_data();

    let result = run_app(&mut terminal, &mut app, refresh_interval);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableFocusChange
    )?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    refresh_interval: Duration,
) -> Result<()> {
    let mut last_refresh = Instant::now();

    // Minimum terminal size for usable display
    const MIN_WIDTH: u16 = 60;
    const MIN_HEIGHT: u16 = 16;

    while app.running {
        terminal.draw(|frame| {
            let area = frame.area();

            if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
                let msg = format!(
                    "Terminal too small: {}x{}\nMinimum: {}x{}\n\nResize to continue",
                    area.width, area.height, MIN_WIDTH, MIN_HEIGHT
                );
                let paragraph = ratatui::widgets::Paragraph::new(msg)
                    .alignment(ratatui::layout::Alignment::Center)
                    .style(ratatui::style::Style::default().fg(ratatui::style::Color::Yellow));
                let centered = ratatui::layout::Rect::new(0, (area.height / 2).saturating_sub(2), area.width, 5);
                frame.render_widget(paragraph, centered);
                return;
            }

            let chunks = Layout::vertical([
                Constraint::Length(1), // Header bar
                Constraint::Length(1), // Tabs
                Constraint::Min(8),    // Content
                Constraint::Length(1), // Status bar
            ])
            .split(area);

            let page = app.page();

            ui::common::render_header(frame, app, &page, chunks[0]);
            ui::common::render_tabs(frame, app, &page, chunks[1]);

            match app.current_view {
                View::Status => ui::status::render(frame, app, &page, chunks[2]),
                View::Maintenance => ui::maintenance::render(frame, app, &page, chunks[2]),
            }

            ui::common::render_status_bar(frame, app, chunks[3]);

            if app.show_detail_overlay {
                ui::detail::render_overlay(frame, app, &page, area);
            }

            if app.show_help {
                ui::common::render_help(frame, app, area);
            }
        })?;

        if let Some(event) = events::poll_event(Duration::from_millis(100))? {
            match event {
                Event::Key(key) => events::handle_key_event(app, key),
                Event::Mouse(mouse) => {
                    // Header, tabs, banner, SLA cards and the list border sit above the table header
                    events::handle_mouse_event(app, mouse, 9);
                }
                Event::FocusGained => events::handle_focus_event(app, true),
                Event::FocusLost => events::handle_focus_event(app, false),
                _ => {}
            }
        }

        if last_refresh.elapsed() >= refresh_interval {
            app.tick(now());
            last_refresh = Instant::now();
        }
    }

    Ok(())
}

/// Export the computed status page to a JSON file
fn export_to_file(state_path: &Path, export_path: &Path, config: &PageConfig) -> Result<()> {
    let state = read_state(state_path)?;
    let page = StatusPage::compute(Some(&state), config, &Filter::default(), now());
    export::write_page(&page, Some(&state), config, export_path)?;

    println!("Exported status page to: {}", export_path.display());
    Ok(())
}

/// Print one monitor's status, SLA and incident timeline
fn print_monitor(state_path: &Path, config: &PageConfig, id: &str) -> Result<()> {
    if find_monitor(&config.monitors, id).is_err() {
        bail!("Monitor not found: {}", id);
    }

    let state = read_state(state_path)?;
    let now = now();
    let page = StatusPage::compute(Some(&state), config, &Filter::default(), now);
    let Some(row) = page.row(id) else {
        bail!("Monitor not found: {}", id);
    };

    println!("{} ({})", row.monitor.name, row.monitor.id);
    println!("  Status:  {}", row.status.label());
    match row.overall {
        Some(uptime) => println!("  Overall: {}%", uptime),
        None => println!("  Overall: -"),
    }
    for &days in &config.settings.sla_windows {
        println!("  {}d SLA: {}%", days, monitor_sla(&state, id, days, now));
    }
    if let Some(latency) = &row.latency {
        println!(
            "  Latency: avg {:.0}ms, last {}ms ({})",
            latency.average_ms, latency.latest_ms, latency.location
        );
    }
    for window in page.maintenance.windows_for(id) {
        println!("  Maintenance: {}", window.title);
    }

    let timeline = monitor_timeline(&state, &config.monitors, id, config.settings.timeline_days, now)?;
    println!();
    if timeline.is_empty() {
        println!("No incidents in the last {} days", timeline.window_days);
        return Ok(());
    }
    println!("Incidents, last {} days:", timeline.window_days);
    for entry in &timeline.entries {
        let started = entry.start().map(format_timestamp).unwrap_or_else(|| "-".to_string());
        let ongoing = if entry.is_open() { " (ongoing)" } else { "" };
        println!(
            "  {}  {}{}  {}",
            started,
            format_elapsed(entry.duration_secs()),
            ongoing,
            entry.error()
        );
    }

    Ok(())
}
