use std::path::PathBuf;

use clap::Parser;

use crate::bound::DEFAULT_MARGIN;
use crate::frame::Palette;
use crate::frame::Rgb;
use crate::sink::GifOptions;

/// Plays a life pattern on the terminal, zooming to fit its live cells, and optionally records it
/// as an animated GIF.
#[derive(Debug, Parser)]
#[command(name = "lifeview", version)]
pub struct Config {
    /// RLE pattern to play. Defaults to the acorn.
    #[arg(long)]
    pub pattern: Option<PathBuf>,

    /// Canvas width in pixels
    #[arg(long, default_value_t = 800)]
    pub width: u32,

    /// Canvas height in pixels
    #[arg(long, default_value_t = 450)]
    pub height: u32,

    /// How far, in cells, the live area may move back inward before the view follows it
    #[arg(long, default_value_t = DEFAULT_MARGIN)]
    pub margin: u32,

    /// Color of dead space, as `r,g,b`
    #[arg(long, default_value = "200,200,200")]
    pub background: Rgb,

    /// Color of live cells, as `r,g,b`
    #[arg(long, default_value = "0,0,0")]
    pub foreground: Rgb,

    /// Frames per second
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u32).range(1..))]
    pub fps: u32,

    /// Number of generations to show
    #[arg(long, default_value_t = 300)]
    pub generations: u64,

    /// Record the run as an animated GIF at this path
    #[arg(long)]
    pub record: Option<PathBuf>,

    /// Delay between GIF frames in milliseconds. Defaults to one frame time.
    #[arg(long)]
    pub gif_delay: Option<u32>,

    /// Number of times the GIF plays. Loops forever when omitted.
    #[arg(long)]
    pub gif_loop: Option<u16>,

    /// GIF color quantization speed, 1 (best) to 30 (fastest)
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(i32).range(1..=30))]
    pub gif_speed: i32,

    /// Don't draw to the terminal, only record
    #[arg(long)]
    pub headless: bool,
}

impl Config {
    pub fn palette(&self) -> Palette {
        Palette {
            background: self.background,
            foreground: self.foreground,
        }
    }

    pub fn gif_options(&self) -> GifOptions {
        GifOptions {
            delay_ms: self.gif_delay.unwrap_or(1000 / self.fps),
            repeat: self.gif_loop,
            speed: self.gif_speed,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn verify_cli() {
        Config::command().debug_assert();
    }

    #[test]
    fn defaults() {
        let config = Config::parse_from(["lifeview"]);

        assert_eq!((config.width, config.height), (800, 450));
        assert_eq!(config.margin, 10);
        assert_eq!(config.palette(), Palette::default());
        assert_eq!(
            config.gif_options(),
            GifOptions {
                delay_ms: 33,
                repeat: None,
                speed: 10
            }
        );
        assert!(!config.headless);
    }

    #[test]
    fn overrides() {
        let config = Config::parse_from([
            "lifeview",
            "--foreground",
            "255,0,0",
            "--fps",
            "10",
            "--gif-loop",
            "2",
            "--record",
            "out.gif",
            "--headless",
        ]);

        assert_eq!(config.foreground, Rgb(255, 0, 0));
        assert_eq!(config.gif_options().delay_ms, 100);
        assert_eq!(config.gif_options().repeat, Some(2));
        assert_eq!(config.record, Some(PathBuf::from("out.gif")));
        assert!(config.headless);
    }

    #[test]
    fn rejects_bad_color() {
        assert!(Config::try_parse_from(["lifeview", "--background", "1,2"]).is_err());
        assert!(Config::try_parse_from(["lifeview", "--fps", "0"]).is_err());
    }
}
