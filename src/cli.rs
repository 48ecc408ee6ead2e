//! Command-line argument parsing.

use clap::Parser;

use crate::app::AppConfig;
use crate::color::Color;
use crate::config::SceneConfig;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "wavewall")]
#[command(about = "A wall of boxes rippling around a moving sphere", long_about = None)]
pub struct Args {
    /// Number of walls: 1 (centered) or 2 (mirrored, sphere sweeps between them)
    #[arg(long, value_name = "COUNT", default_value_t = 1, value_parser = clap::value_parser!(u8).range(1..=2))]
    pub walls: u8,

    /// Color boxes by distance as well as moving them
    #[arg(long)]
    pub color_lerp: bool,

    /// Window width in logical pixels
    #[arg(long, value_name = "PIXELS", default_value_t = 1280)]
    pub width: u32,

    /// Window height in logical pixels
    #[arg(long, value_name = "PIXELS", default_value_t = 720)]
    pub height: u32,

    /// Show the axes helper
    #[arg(long)]
    pub debug: bool,

    /// Clear color as #rrggbb
    #[arg(long, value_name = "HEX", value_parser = parse_color)]
    pub background: Option<Color>,
}

fn parse_color(text: &str) -> Result<Color, String> {
    Color::from_hex(text).ok_or_else(|| format!("expected #rrggbb, got '{text}'"))
}

impl Args {
    pub fn app_config(&self) -> AppConfig {
        AppConfig::new()
            .title("Wave Wall")
            .size(self.width, self.height)
    }

    /// Scene defaults with the command line applied on top.
    pub fn scene_config(&self) -> SceneConfig {
        let mut config = SceneConfig {
            walls: self.walls as usize,
            debug: self.debug,
            ..SceneConfig::default()
        };
        config.params.color_lerp = self.color_lerp;
        if let Some(background) = self.background {
            config.palette.background = background;
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_give_a_single_wall() {
        let args = Args::try_parse_from(["wavewall"]).unwrap();
        let scene = args.scene_config();
        assert_eq!(scene.walls, 1);
        assert!(!scene.params.color_lerp);
        assert!(!scene.debug);
        assert_eq!(args.app_config().width, 1280);
    }

    #[test]
    fn flags_override_scene() {
        let args = Args::try_parse_from([
            "wavewall",
            "--walls",
            "2",
            "--color-lerp",
            "--debug",
            "--background",
            "#102030",
            "--width",
            "800",
            "--height",
            "600",
        ])
        .unwrap();
        let scene = args.scene_config();
        assert_eq!(scene.walls, 2);
        assert!(scene.params.color_lerp);
        assert!(scene.debug);
        assert_eq!(scene.palette.background.to_hex(), "#102030");
        let app = args.app_config();
        assert_eq!((app.width, app.height), (800, 600));
    }

    #[test]
    fn rejects_bad_values() {
        assert!(Args::try_parse_from(["wavewall", "--walls", "3"]).is_err());
        assert!(Args::try_parse_from(["wavewall", "--background", "red"]).is_err());
    }
}
