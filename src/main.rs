use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{Event, KeyEventKind};
use ratatui::DefaultTerminal;

use ma_signal_board::config::Config;
use ma_signal_board::input::{parse_form_command, FormCommand};
use ma_signal_board::market_data::YahooChartClient;
use ma_signal_board::pipeline;
use ma_signal_board::ui::{self, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {:#}", e);
            eprintln!("Make sure config/default.toml exists and its [defaults] are valid");
            std::process::exit(1);
        }
    };

    // Log to file so it doesn't interfere with the TUI
    let log_file = std::fs::File::create("ma-signal-board.log")?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                config
                    .logging
                    .level
                    .parse()
                    .unwrap_or_else(|_| "info".into())
            }),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .json()
        .init();

    let params = config
        .defaults
        .to_params()
        .context("validated [defaults] became invalid at runtime")?;
    tracing::info!(
        base_url = %config.market_data.base_url,
        symbol = %params.symbol,
        frequency = params.frequency.code(),
        "Starting ma-signal-board"
    );

    let client = YahooChartClient::from_config(&config.market_data)
        .context("failed to build market data client")?;
    let mut app_state = AppState::new(params, config.ui.table_rows);

    let mut terminal = ratatui::init();
    let result = run(&mut terminal, &mut app_state, &client, &config).await;
    ratatui::restore();

    tracing::info!("Shutdown complete");
    result
}

async fn run(
    terminal: &mut DefaultTerminal,
    app_state: &mut AppState,
    client: &YahooChartClient,
    config: &Config,
) -> Result<()> {
    let mut needs_run = true;

    loop {
        if needs_run {
            needs_run = false;
            app_state.begin_run();
            terminal.draw(|frame| ui::render(frame, app_state))?;

            // The whole dashboard waits on this; there is nothing else to draw meanwhile.
            let outcome = pipeline::render(&app_state.params, client, app_state.table_rows).await;
            if let Err(e) = &outcome {
                tracing::error!(error = %e, symbol = %app_state.params.symbol, "Pipeline failed");
            }
            app_state.finish_run(outcome);
        }

        terminal.draw(|frame| ui::render(frame, app_state))?;

        if crossterm::event::poll(Duration::from_millis(config.ui.refresh_rate_ms))? {
            if let Event::Key(key) = crossterm::event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match parse_form_command(&key.code) {
                    Some(FormCommand::Quit) => {
                        tracing::info!("User quit");
                        break;
                    }
                    Some(FormCommand::Rerun) => needs_run = true,
                    Some(cmd) => needs_run = app_state.apply(cmd),
                    None => {}
                }
            }
        }
    }

    Ok(())
}
