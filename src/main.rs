use std::time::Duration;

use clap::Parser;
use color_eyre::Result;
use color_eyre::eyre::WrapErr;

use vitals::app::App;
use vitals::event::{Event, EventHandler};
use vitals::system::collector::Collector;
use vitals::system::sampler::Sampler;
use vitals::ui;
use vitals::ui::theme::Theme;

#[derive(Parser)]
#[command(
    name = "vitals",
    about = "Live terminal dashboard for host resource usage"
)]
struct Cli {
    /// Sampling period in milliseconds (floor 250)
    #[arg(long, default_value_t = 1000)]
    refresh_rate: u64,

    /// Top processes carried in each snapshot
    #[arg(long, default_value_t = 25)]
    limit: usize,

    /// Initial palette: dark or light
    #[arg(long, default_value = "dark")]
    theme: String,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    #[cfg(feature = "debug-tracing")]
    init_tracing()?;

    let period = Duration::from_millis(cli.refresh_rate.max(250));

    // The first snapshot is read synchronously: with no baseline there is
    // nothing to render, so failure here ends the process.
    let mut collector = Collector::new(cli.limit.max(1));
    let first = collector
        .collect()
        .wrap_err("failed to read the first snapshot")?;

    let mut terminal = ratatui::init();
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        ratatui::restore();
        original_hook(panic_info);
    }));

    let theme = Theme::from_name(&cli.theme);
    let result = run(&mut terminal, App::new(first, theme, period), collector, period).await;

    ratatui::restore();
    result
}

async fn run(
    terminal: &mut ratatui::DefaultTerminal,
    mut app: App,
    collector: Collector,
    period: Duration,
) -> Result<()> {
    let mut events = EventHandler::new();
    let sampler = Sampler::spawn(collector, period, events.sender())
        .wrap_err("failed to start the sampler thread")?;

    terminal.draw(|frame| ui::draw(frame, &mut app))?;

    while app.running {
        let Some(event) = events.next().await else {
            break;
        };
        match event {
            Event::Key(key) => {
                if key.kind == crossterm::event::KeyEventKind::Press {
                    let action = app.map_key(key);
                    app.dispatch(action);
                }
            }
            Event::Resize => app.on_resize(),
            Event::Sample(snapshot) => app.apply_sample(Ok(*snapshot)),
            Event::SampleFailed(message) => app.apply_sample(Err(message)),
        }
        terminal.draw(|frame| ui::draw(frame, &mut app))?;
    }

    sampler.stop();
    Ok(())
}

#[cfg(feature = "debug-tracing")]
fn init_tracing() -> Result<()> {
    let file = std::fs::File::create("vitals-trace.jsonl")?;
    let subscriber = tracing_subscriber::fmt()
        .json()
        .with_writer(std::sync::Mutex::new(file))
        .with_max_level(tracing::Level::DEBUG)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
