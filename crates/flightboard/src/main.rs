//! `fboard` - CLI for flightboard
//!
//! This binary signs in to the flight backend and prints the arrival and
//! departure boards, the analytics digest and the date picker, or keeps one
//! of them on screen with `watch`.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::io::{self, Write};
use std::sync::Arc;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::time::{interval_at, Instant, Interval};
use tracing::{debug, info};

use flightboard::board::{self, listed_count, Pager};
use flightboard::calendar::MonthView;
use flightboard::cli::{
    resolve_date, resolve_month, AnalyticsCommand, BoardCommand, CalendarCommand, Cli, Command,
    ConfigCommand, LoginCommand, OutputFormat, WatchCommand, WatchInput, WatchView,
};
use flightboard::clock::{now_ist, parse_date, today_ist, IstDateTime};
use flightboard::flight::Direction;
use flightboard::render::{board_plain, board_table, calendar_text, dashboard_text, watch_hint};
use flightboard::state::{spawn_fetch, FetchToken, Fetched};
use flightboard::{
    init_logging, ApiClient, BoardState, Config, Dashboard, Feed, FlightSource, Session, Ticker,
};

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone())?;

    // Execute the command
    match &cli.command {
        Command::Login(cmd) => handle_login(&cli, &config, cmd).await,
        Command::Arrivals(cmd) => handle_board(&cli, &config, Direction::Arrival, cmd).await,
        Command::Departures(cmd) => handle_board(&cli, &config, Direction::Departure, cmd).await,
        Command::Analytics(cmd) => handle_analytics(&cli, &config, cmd).await,
        Command::Watch(cmd) => handle_watch(&cli, &config, cmd).await,
        Command::Calendar(cmd) => handle_calendar(cmd),
        Command::Config(cmd) => handle_config(&config, cmd),
    }
}

fn feed_for(direction: Direction) -> Feed {
    match direction {
        Direction::Arrival => Feed::Arrivals,
        Direction::Departure => Feed::Departures,
    }
}

async fn sign_in(cli: &Cli, config: &Config, client: &ApiClient) -> anyhow::Result<Session> {
    let (username, password) = cli.credentials(config)?;
    match client.login(&username, &password).await {
        Ok(session) => Ok(session),
        Err(e) if e.is_backend_unavailable() => Err(anyhow::Error::new(e).context(format!(
            "flight backend at {} is unreachable, check [api] base_url",
            client.base_url()
        ))),
        Err(e) if e.is_auth_error() => Err(anyhow::Error::new(e).context(format!(
            "signing in as {username} was rejected, check --username/--password or [auth]"
        ))),
        Err(e) => Err(anyhow::Error::new(e).context(format!("signing in to {}", client.base_url()))),
    }
}

async fn handle_login(cli: &Cli, config: &Config, cmd: &LoginCommand) -> anyhow::Result<()> {
    let client = ApiClient::new(config)?;
    let session = sign_in(cli, config, &client).await?;

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&session)?);
    } else {
        println!("Signed in as {} ({})", session.username, session.role);
    }
    Ok(())
}

async fn handle_board(
    cli: &Cli,
    config: &Config,
    direction: Direction,
    cmd: &BoardCommand,
) -> anyhow::Result<()> {
    let date = resolve_date(cmd.date.as_deref())?;
    let client = ApiClient::new(config)?;
    sign_in(cli, config, &client).await?;

    let flights = client.fetch(feed_for(direction), date).await;
    let rows = listed_count(&flights);
    let mut pager = Pager::new(config.board.page_size);
    pager.go_to(cmd.page, rows);

    let now = now_ist();
    let page = board::page(
        &pager,
        &flights,
        &now,
        config.analytics.status_thresholds(),
    );

    match cmd.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&page)?),
        OutputFormat::Plain => println!("{}", board_plain(&page)),
        OutputFormat::Table => println!(
            "{}",
            board_table(
                direction,
                date,
                &page,
                pager.current(),
                pager.total_pages(rows),
                &now
            )
        ),
    }
    Ok(())
}

async fn handle_analytics(
    cli: &Cli,
    config: &Config,
    cmd: &AnalyticsCommand,
) -> anyhow::Result<()> {
    let date = resolve_date(cmd.date.as_deref())?;
    let client = ApiClient::new(config)?;
    sign_in(cli, config, &client).await?;

    let flights = client.fetch(Feed::AllFlights, date).await;
    let dashboard = Dashboard::compute_for_day(&flights, date, &now_ist(), &config.analytics);

    match cmd.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&dashboard)?),
        OutputFormat::Plain | OutputFormat::Table => println!("{}", dashboard_text(&dashboard)),
    }
    Ok(())
}

async fn next_refresh(refresh: &mut Option<Interval>) {
    match refresh {
        Some(ticks) => {
            ticks.tick().await;
        }
        None => std::future::pending().await,
    }
}

fn draw(
    view: WatchView,
    state: &BoardState,
    pager: &Pager,
    now: &IstDateTime,
    config: &Config,
) -> String {
    let date = state.selected_date();
    let direction = match view {
        WatchView::Arrivals => Direction::Arrival,
        WatchView::Departures => Direction::Departure,
        WatchView::Analytics => {
            let flights = state.flights(Feed::AllFlights);
            let dashboard = Dashboard::compute_for_day(flights, date, now, &config.analytics);
            return dashboard_text(&dashboard);
        }
    };

    let feed = feed_for(direction);
    let flights = state.flights(feed);
    let rows = listed_count(flights);
    let page = board::page(pager, flights, now, config.analytics.status_thresholds());
    let mut screen = board_table(
        direction,
        date,
        &page,
        pager.current(),
        pager.total_pages(rows),
        now,
    );
    if state.is_loading(feed) {
        screen.push_str("\nLoading...");
    }
    screen.push('\n');
    screen.push_str(&watch_hint(pager, rows));
    screen
}

fn spawn_all(
    source: &Arc<dyn FlightSource>,
    tokens: Vec<FetchToken>,
    results: &mpsc::Sender<Fetched>,
) {
    for token in tokens {
        spawn_fetch(Arc::clone(source), token, results.clone());
    }
}

async fn handle_watch(cli: &Cli, config: &Config, cmd: &WatchCommand) -> anyhow::Result<()> {
    let date = resolve_date(cmd.date.as_deref())?;
    let client = ApiClient::new(config)?;
    let session = sign_in(cli, config, &client).await?;
    let source: Arc<dyn FlightSource> = Arc::new(client);

    let feed = match cmd.view {
        WatchView::Arrivals => Feed::Arrivals,
        WatchView::Departures => Feed::Departures,
        WatchView::Analytics => Feed::AllFlights,
    };

    let mut state = BoardState::new(session, date);
    let (results_tx, mut results) = mpsc::channel(Feed::ALL.len() * 2);
    spawn_all(&source, state.refresh(), &results_tx);

    let ticker = Ticker::new(config.tick_interval());
    debug!(period = ?ticker.period(), "starting clock");
    let (mut now_rx, ticker) = ticker.spawn();
    let mut pager = Pager::new(config.board.page_size);
    let cycle_period = config.cycle_interval();
    let mut cycle = interval_at(Instant::now() + cycle_period, cycle_period);
    let mut refresh = config
        .refresh_interval()
        .map(|period| interval_at(Instant::now() + period, period));

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    let mut input = BufReader::new(tokio::io::stdin()).lines();
    let mut input_open = true;

    info!(view = ?cmd.view, %date, "watching, press Ctrl-C or q to stop");
    let mut stdout = io::stdout();

    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            changed = now_rx.changed() => {
                if changed.is_err() {
                    break;
                }
            }
            _ = cycle.tick() => pager.advance(listed_count(state.flights(feed))),
            () = next_refresh(&mut refresh) => spawn_all(&source, state.refresh(), &results_tx),
            line = input.next_line(), if input_open => {
                let Ok(Some(line)) = line else {
                    input_open = false;
                    continue;
                };
                let rows = listed_count(state.flights(feed));
                match WatchInput::parse(&line) {
                    Some(WatchInput::Quit) => break,
                    Some(WatchInput::NextPage) => pager.next(rows),
                    Some(WatchInput::PreviousPage) => pager.previous(),
                    Some(WatchInput::FirstPage) => pager.first(),
                    Some(WatchInput::LastPage) => pager.last(rows),
                    Some(WatchInput::Refresh) => spawn_all(&source, state.refresh(), &results_tx),
                    Some(other) => {
                        if let Some(date) = other.target_date(state.selected_date(), today_ist()) {
                            debug!(%date, "date selected");
                            spawn_all(&source, state.select_date(date), &results_tx);
                            pager.first();
                        }
                    }
                    None => debug!(input = %line.trim(), "unrecognized watch input"),
                }
            }
            Some((token, flights)) = results.recv() => {
                if !state.complete(token, flights) {
                    continue;
                }
                pager.clamp(listed_count(state.flights(feed)));
            }
        }

        let now = *now_rx.borrow();
        write!(
            stdout,
            "{CLEAR_SCREEN}{}",
            draw(cmd.view, &state, &pager, &now, config)
        )?;
        stdout.flush()?;
    }

    ticker.shutdown().await;
    writeln!(stdout)?;
    Ok(())
}

fn handle_calendar(cmd: &CalendarCommand) -> anyhow::Result<()> {
    let today = today_ist();
    let selected = cmd.date.as_deref().map(parse_date).transpose()?;
    let month = resolve_month(cmd.month.as_deref(), selected.unwrap_or(today))?;

    println!(
        "{}",
        calendar_text(&MonthView::containing(month), today, selected)
    );
    Ok(())
}

fn handle_config(config: &Config, cmd: &ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if *json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                let refresh = config
                    .refresh_interval()
                    .map_or_else(|| "off".to_string(), |d| format!("{}s", d.as_secs()));

                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[API]");
                println!("  Base URL:           {}", config.api.base_url);
                println!("  Timeout (secs):     {}", config.api.timeout_secs);
                println!();
                println!("[Auth]");
                println!(
                    "  Username:           {}",
                    config.auth.username.as_deref().unwrap_or("(not set)")
                );
                println!(
                    "  Password:           {}",
                    if config.auth.password.is_some() {
                        "(set)"
                    } else {
                        "(not set)"
                    }
                );
                println!();
                println!("[Board]");
                println!("  Page size:          {}", config.board.page_size);
                println!("  Cycle (secs):       {}", config.board.cycle_interval_secs);
                println!("  Tick (ms):          {}", config.board.tick_interval_ms);
                println!("  Refresh:            {refresh}");
                println!();
                println!("[Analytics]");
                println!(
                    "  Max capacity/hour:  {}",
                    config.analytics.theoretical_max_capacity
                );
                println!(
                    "  Delay threshold:    {} min",
                    config.analytics.delay_threshold_minutes
                );
                println!(
                    "  Boarding window:    {} min",
                    config.analytics.boarding_window_minutes
                );
                println!("  Top routes:         {}", config.analytics.top_routes);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.clone().unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
