use std::path::PathBuf;

use clap::Parser;
use log::LevelFilter;
use rand::SeedableRng;
use rand::rngs::StdRng;

#[derive(Parser, Debug, Clone)]
#[command(name = "mouse-asteroids", version, about = "Mouse-aimed Asteroids for the terminal")]
pub struct Config {
    /// Run against a scripted input and an in-memory screen dumped to the log.
    #[arg(long)]
    pub debug: bool,

    /// Screen width in cells for --debug.
    #[arg(long, default_value_t = 80)]
    pub width: u16,

    /// Screen height in cells for --debug.
    #[arg(long, default_value_t = 24)]
    pub height: u16,

    /// Stop after this many frames.
    #[arg(long)]
    pub max_frames: Option<u64>,

    /// JSON file holding the top ten scores.
    #[arg(long, default_value = "high_scores.json")]
    pub high_scores: PathBuf,

    /// Music played on game over. Also looked up next to the executable.
    #[arg(long, default_value = "Game Over (8-Bit Music).mp3")]
    pub music: PathBuf,

    /// Log output goes here so it never draws over the game.
    #[arg(long, default_value = "mouse-asteroids.log")]
    pub log_file: PathBuf,

    /// off, error, warn, info, debug or trace.
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Play without sound.
    #[arg(long)]
    pub mute: bool,

    /// Seed for a reproducible asteroid field.
    #[arg(long)]
    pub seed: Option<u64>,
}

impl Config {
    /// `None` when the level name is not recognised.
    pub fn log_level(&self) -> Option<LevelFilter> {
        self.log_level.parse().ok()
    }

    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use rand::Rng;

    #[test]
    fn defaults() {
        let config = Config::try_parse_from(["mouse-asteroids"]).unwrap();
        assert!(!config.debug);
        assert_eq!((config.width, config.height), (80, 24));
        assert_eq!(config.max_frames, None);
        assert_eq!(config.high_scores, PathBuf::from("high_scores.json"));
        assert_eq!(config.log_level(), Some(LevelFilter::Info));
    }

    #[test]
    fn debug_flags() {
        let config = Config::try_parse_from([
            "mouse-asteroids", "--debug", "--width", "100", "--height", "30", "--max-frames", "90", "--mute",
        ])
        .unwrap();
        assert!(config.debug && config.mute);
        assert_eq!((config.width, config.height), (100, 30));
        assert_eq!(config.max_frames, Some(90));
    }

    #[test]
    fn unknown_log_level_is_reported() {
        let config = Config::try_parse_from(["mouse-asteroids", "--log-level", "chatty"]).unwrap();
        assert_eq!(config.log_level(), None);
        let config = Config::try_parse_from(["mouse-asteroids", "--log-level", "DEBUG"]).unwrap();
        assert_eq!(config.log_level(), Some(LevelFilter::Debug));
    }

    #[test]
    fn seed_makes_rng_reproducible() {
        let config = Config::try_parse_from(["mouse-asteroids", "--seed", "7"]).unwrap();
        let a: u64 = config.rng().gen_range(0..u64::MAX);
        let b: u64 = config.rng().gen_range(0..u64::MAX);
        assert_eq!(a, b);
    }

    #[test]
    fn every_flag_has_help_text() {
        let mut command = Config::command();
        let help = command.render_long_help().to_string();
        assert!(help.contains("JSON file holding the top ten scores"));
        assert!(help.contains("Log output goes here"));
        assert!(help.contains("Play without sound"));
        for arg in command.get_arguments() {
            let id = arg.get_id().as_str();
            if id == "help" || id == "version" {
                continue;
            }
            assert!(arg.get_help().is_some(), "--{id} has no help");
        }
    }

    #[test]
    fn bad_numbers_are_rejected() {
        assert!(Config::try_parse_from(["mouse-asteroids", "--width", "wide"]).is_err());
    }
}
