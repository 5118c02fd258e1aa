use std::collections::HashSet;
use std::io;
use std::thread;
use std::time::Duration;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use crossterm::terminal;
use tracing::info;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use lifeview::Cell;
use lifeview::config::Config;
use lifeview::life;
use lifeview::parse_rle;
use lifeview::parse_rle::Pattern;
use lifeview::render::RenderError;
use lifeview::render::Renderer;
use lifeview::sink::GifRecorder;
use lifeview::sink::TerminalSink;
use lifeview::viewport::ViewportError;

/// Sleeps away whatever is left of each frame time.
struct Pacer {
    frametime: Duration,
    last: Instant,
}

impl Pacer {
    fn new(fps: u32) -> Self {
        Self {
            frametime: Duration::from_secs(1) / fps,
            last: Instant::now(),
        }
    }

    fn tick(&mut self) {
        let dt = self.last.elapsed();
        thread::sleep(self.frametime.saturating_sub(dt));

        self.last = Instant::now();
    }
}

fn load_pattern(config: &Config) -> anyhow::Result<Pattern> {
    let Some(path) = &config.pattern else {
        return Ok(Pattern::acorn());
    };

    let bytes = std::fs::read(path).with_context(|| format!("Failed to read {path:?}"))?;
    let pattern =
        parse_rle::read_rle(&bytes).with_context(|| format!("Failed to parse {path:?}"))?;

    Ok(pattern)
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so they stay out of the way of the display
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let config = Config::parse();
    let pattern = load_pattern(&config)?;

    info!(
        name = pattern.name.as_deref().unwrap_or("unnamed"),
        rule = %pattern.rule,
        cells = pattern.cells.len(),
        "loaded pattern"
    );

    let mut renderer = Renderer::new(config.width, config.height, config.palette(), config.margin);

    if !config.headless {
        let (cols, rows) = terminal::size().context("Failed to get the terminal size")?;

        // Leave the last row free so the cursor never scrolls the display
        renderer.add_sink(Box::new(TerminalSink::new(
            io::stdout(),
            cols,
            rows.saturating_sub(1),
        )));
    }

    if let Some(path) = &config.record {
        renderer.add_sink(Box::new(GifRecorder::new(path, config.gif_options())));
    }

    let mut cells: HashSet<Cell> = pattern.cells.into_iter().collect();
    let mut pacer = Pacer::new(config.fps);

    for generation in 0..config.generations {
        match renderer.draw(&cells) {
            Ok(_) => {}
            Err(RenderError::Viewport(ViewportError::InvalidInput)) => {
                info!(generation, "population died out");
                break;
            }
            Err(e) => return Err(e).context("Failed to draw frame"),
        }

        cells = life::step(&cells, pattern.rule);

        if !config.headless {
            pacer.tick();
        }
    }

    if renderer.frames() == 0 {
        warn!("nothing was drawn");
        return Ok(());
    }

    renderer.finish().context("Failed to finish output")?;

    Ok(())
}
