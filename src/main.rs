mod audio;
mod collision;
mod config;
mod constants;
mod entities;
mod game;
mod high_scores;
mod input;
mod rendering;
mod spawn;
mod terminal_io;
mod types;

use std::io::{self, Write};
use std::thread;
use std::time::{Duration, Instant};

use clap::Parser;
use crossterm::terminal::size;
use log::{error, info, warn, LevelFilter};

use crate::audio::{AudioSink, open_audio};
use crate::config::Config;
use crate::constants::FPS;
use crate::game::Game;
use crate::high_scores::{HighScoreBoard, JsonFileStore};
use crate::input::InputSource;
use crate::rendering::{GameGrid, OutputTarget, ScreenBuffer, draw_frame};
use crate::terminal_io::{SimulatedInput, TerminalInput, TerminalSession};

const DEBUG_DUMP_INTERVAL: u64 = 60; // Frames between screen dumps in debug mode

struct FrameLoop<'a> {
    input: &'a mut dyn InputSource,
    audio: &'a mut dyn AudioSink,
    output: &'a mut OutputTarget,
    grid: GameGrid,
    max_frames: Option<u64>,
    paced: bool,
}

impl FrameLoop<'_> {
    fn run(&mut self, game: &mut Game) -> io::Result<u64> {
        let frame_time = Duration::from_micros(1_000_000 / FPS);
        let mut frame_count = 0;

        while self.max_frames.is_none_or(|max| frame_count < max) {
            let started = Instant::now();

            let input = self.input.poll(frame_count)?;
            if input.quit {
                info!("Quit requested at frame {}.", frame_count);
                break;
            }
            if let Some((width, height)) = input.resized {
                info!("Terminal resized to {}x{}", width, height);
                self.grid.resize(width, height);
            }

            for intent in game.step(&input) {
                self.audio.apply(intent);
            }
            self.audio.maintain();

            self.grid.clear();
            draw_frame(game, &mut self.grid);
            self.grid.render(self.output)?;
            self.output.flush()?;

            if let OutputTarget::ScreenBuffer(sb) = &*self.output {
                if frame_count % DEBUG_DUMP_INTERVAL == 0 {
                    sb.print_to_log();
                }
            }

            frame_count += 1;
            if self.paced {
                if let Some(rest) = frame_time.checked_sub(started.elapsed()) {
                    thread::sleep(rest);
                }
            }
        }
        Ok(frame_count)
    }
}

fn run_debug(config: &Config, game: &mut Game, audio: &mut dyn AudioSink) -> io::Result<u64> {
    info!("Debug mode enabled.");
    info!("Debug resolution set to {}x{}", config.width, config.height);
    let mut input = SimulatedInput::demo(config.width, config.height);
    let mut output = OutputTarget::ScreenBuffer(ScreenBuffer::new(config.width, config.height));
    FrameLoop {
        input: &mut input,
        audio,
        output: &mut output,
        grid: GameGrid::new(config.width, config.height),
        max_frames: config.max_frames,
        paced: false,
    }
    .run(game)
}

fn run_terminal(config: &Config, game: &mut Game, audio: &mut dyn AudioSink) -> io::Result<u64> {
    let session = TerminalSession::start()?;
    let (width, height) = size().map_err(|e| { error!("Failed to get terminal size: {}", e); e })?;
    info!("Terminal size: {}x{}", width, height);

    let mut input = TerminalInput::new(width, height, session.key_release_events());
    let mut output = OutputTarget::Stdout(io::stdout());
    FrameLoop {
        input: &mut input,
        audio,
        output: &mut output,
        grid: GameGrid::new(width, height),
        max_frames: config.max_frames,
        paced: true,
    }
    .run(game)
}

fn main() -> io::Result<()> {
    let config = Config::parse();
    let level = config.log_level();
    simple_logging::log_to_file(&config.log_file, level.unwrap_or(LevelFilter::Info))?;
    info!("Starting mouse-asteroids.");
    if level.is_none() {
        warn!("Unknown log level '{}', logging at info.", config.log_level);
    }

    let store = JsonFileStore::new(&config.high_scores);
    info!("High scores kept in {}", store.path().display());
    let board = HighScoreBoard::load(Box::new(store));
    let mut game = Game::new(board, config.rng());
    let mut audio = open_audio(config.mute || config.debug, &config.music);

    let frames = if config.debug {
        run_debug(&config, &mut game, audio.as_mut())?
    } else {
        run_terminal(&config, &mut game, audio.as_mut())?
    };

    info!("Exiting after {} frames with score {}.", frames, game.score);
    Ok(())
}
