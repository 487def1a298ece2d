use std::{fmt::Display, path::PathBuf};

use argh::FromArgs;
use log::{debug, error, info};
use serde::Serialize;

use crate::{
    config::{Config, ConfigError},
    data_mappers::{Mapper, SteeringMapper, ThrottleMapper},
    data_parser::{self, FrameFormat, ParseError},
    evaluation::{AttemptRecorder, DetectionEvaluator},
    extractor::GestureExtractor,
    model::LipPosition,
    scorer::Scorer,
    signal::GesturePipeline,
};

/// Frame interval assumed for recordings without timestamps.
const DEFAULT_FRAME_INTERVAL_S: f32 = 1.0 / 30.0;

#[derive(Debug)]
pub enum CliError {
    ParseFailure(argh::EarlyExit),
    Io { path: PathBuf, error: std::io::Error },
    Config(ConfigError),
    Frames(ParseError),
    Json(serde_json::Error),
}

impl Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ParseFailure(e) => write!(f, "{}", e.output),
            Self::Io { path, error } => write!(f, "Unable to read {}: {error}", path.display()),
            Self::Config(e) => write!(f, "{e}"),
            Self::Frames(e) => write!(f, "{e}"),
            Self::Json(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for CliError {}

impl From<ConfigError> for CliError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<ParseError> for CliError {
    fn from(value: ParseError) -> Self {
        Self::Frames(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

type Result<T> = std::result::Result<T, CliError>;

fn read_file(path: &PathBuf) -> Result<String> {
    std::fs::read_to_string(path).map_err(|error| CliError::Io {
        path: path.clone(),
        error,
    })
}

fn load_config(path: &Option<PathBuf>) -> Result<Config> {
    match path {
        Some(v) => Ok(Config::from_path(v)?),
        None => Ok(Config::default()),
    }
}

/// oro gesture and speech tooling
#[derive(Debug, FromArgs)]
pub struct Args {
    /// enable verbose logging, overridden by "quiet" if passed
    #[argh(switch, short = 'v', long = "verbose")]
    pub verbose: bool,
    /// disable all logging, overrides verbose
    #[argh(switch, short = 'q', long = "quiet")]
    pub quiet: bool,
    #[argh(subcommand)]
    commands: Option<Commands>,
}

impl Args {
    /// Parse `args`, excluding the program name.
    pub fn parse(args: &[&str]) -> std::result::Result<Self, CliError> {
        Self::from_args(&[env!("CARGO_PKG_NAME")], args).map_err(CliError::ParseFailure)
    }

    pub fn run(self) -> Result<()> {
        match self.commands {
            Some(Commands::Replay(c)) => c.run(),
            Some(Commands::Score(c)) => c.run(),
            Some(Commands::Evaluate(c)) => c.run(),
            Some(Commands::Info(c)) => c.run(),
            None => {
                info!("No command given, try --help");
                Ok(())
            }
        }
    }
}

#[derive(Debug, FromArgs)]
#[argh(subcommand)]
pub enum Commands {
    Replay(ReplayCommand),
    Score(ScoreCommand),
    Evaluate(EvaluateCommand),
    Info(InfoCommand),
}

/// Run a recorded landmark stream through the gesture pipeline
#[derive(Debug, FromArgs)]
#[argh(subcommand, name = "replay")]
pub struct ReplayCommand {
    /// path to the recorded frames
    #[argh(positional)]
    path: PathBuf,
    /// frame layout, json or pipe
    #[argh(option, default = "FrameFormat::Json")]
    format: FrameFormat,
    /// path to a json config
    #[argh(option)]
    config: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct FrameOutput {
    frame: usize,
    timestamp_ms: Option<u64>,
    detected: bool,
    mouth_opening: f32,
    lip_position: LipPosition,
    speed: f32,
    steering: f32,
}

impl ReplayCommand {
    fn run(self) -> Result<()> {
        let config = load_config(&self.config)?;
        let frames = data_parser::parse(&read_file(&self.path)?, self.format)?;

        info!(
            "Replaying {} frames from {}",
            frames.len(),
            self.path.display()
        );

        let mut pipeline = GesturePipeline::new(GestureExtractor::new(config.extractor));
        let throttle = ThrottleMapper::new(config.throttle);
        let steering = SteeringMapper::default();
        let mut recorder = AttemptRecorder::new();

        let mut distance = 0.0;
        let mut elapsed = 0.0;
        let mut last_timestamp = None;

        for (idx, frame) in frames.iter().enumerate() {
            let state = pipeline.process(frame.landmarks.as_ref());
            let speed = throttle.map(&state);

            let interval = match (last_timestamp, frame.timestamp_ms) {
                (Some(prev), Some(now)) if now >= prev => (now - prev) as f32 / 1000.0,
                _ => DEFAULT_FRAME_INTERVAL_S,
            };
            if idx > 0 {
                elapsed += interval;
                distance += speed * interval;
            }
            last_timestamp = frame.timestamp_ms;

            recorder.record(state.mouth_opening, speed);

            let output = FrameOutput {
                frame: idx,
                timestamp_ms: frame.timestamp_ms,
                detected: frame.landmarks.is_some(),
                mouth_opening: state.mouth_opening,
                lip_position: state.lip_position,
                speed,
                steering: steering.map(&state),
            };
            println!("{}", serde_json::to_string(&output)?);
        }

        debug!(
            "Processed {} frames, {} without a face",
            pipeline.frames(),
            pipeline.missed()
        );

        let summary = recorder.finish(distance, elapsed);
        println!("{}", serde_json::to_string_pretty(&summary)?);

        Ok(())
    }
}

/// Score a spoken transcript against the expected prompt
#[derive(Debug, FromArgs)]
#[argh(subcommand, name = "score")]
pub struct ScoreCommand {
    /// what was recognized
    #[argh(positional)]
    spoken: String,
    /// what should have been said
    #[argh(positional)]
    expected: String,
    /// path to a json config
    #[argh(option)]
    config: Option<PathBuf>,
}

impl ScoreCommand {
    fn run(self) -> Result<()> {
        let config = load_config(&self.config)?;
        let accuracy = Scorer::new(config.scorer).score(&self.spoken, &self.expected);

        println!("Accuracy: {accuracy:.1}%");

        Ok(())
    }
}

/// Compare predicted mouth openings against ground truth
#[derive(Debug, FromArgs)]
#[argh(subcommand, name = "evaluate")]
pub struct EvaluateCommand {
    /// path to a json array of [predicted, actual] pairs
    #[argh(positional)]
    path: PathBuf,
}

impl EvaluateCommand {
    fn run(self) -> Result<()> {
        let pairs = serde_json::from_str::<Vec<(f32, f32)>>(&read_file(&self.path)?)
            .map_err(|e| {
                error!("Expected a list of [predicted, actual] pairs");
                CliError::from(e)
            })?;

        let mut evaluator = DetectionEvaluator::new();
        for (predicted, actual) in pairs {
            evaluator.evaluate(predicted, actual);
        }

        println!("Precision: {}", evaluator.precision());
        println!("Recall: {}", evaluator.recall());
        println!("F1 Score: {}", evaluator.f1());

        Ok(())
    }
}

/// Print library metadata
#[derive(Debug, FromArgs)]
#[argh(subcommand, name = "info")]
pub struct InfoCommand {}

impl InfoCommand {
    fn run(self) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(&crate::metadata())?);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse() {
        let args = Args::parse(&["--verbose"]).unwrap();

        assert_eq!(args.verbose, true);
        assert_eq!(args.quiet, false);
    }

    #[test]
    fn empty() {
        let args = Args::from_args(&["oro"], &[]).unwrap();

        assert_eq!(args.verbose, false);
        assert_eq!(args.quiet, false);
        assert!(args.commands.is_none());
    }

    #[test]
    fn no_command_quiet_verbose() {
        let args = Args::from_args(&["oro"], &["-q", "-v"]).unwrap();

        assert_eq!(args.verbose, true);
        assert_eq!(args.quiet, true);
    }

    #[test]
    fn parse_failure_shows_argh_message() {
        let err = Args::parse(&["--bogus"]).unwrap_err();
        let message = err.to_string();

        assert!(message.contains("--bogus"));
        assert!(!message.contains("EarlyExit"));
    }

    #[test]
    fn unknown_command() {
        assert!(Args::parse(&["drive"]).is_err());
    }

    mod replay {
        use super::*;

        #[test]
        fn path_only() {
            let args = Args::from_args(&["oro"], &["replay", "frames.json"]).unwrap();

            match args.commands.unwrap() {
                Commands::Replay(v) => {
                    assert_eq!(v.path, PathBuf::from("frames.json"));
                    assert_eq!(v.format, FrameFormat::Json);
                    assert!(v.config.is_none());
                }
                _ => assert!(false),
            }
        }

        #[test]
        fn format_ignore_case() {
            let args =
                Args::from_args(&["oro"], &["replay", "frames.txt", "--format", "PiPe"]).unwrap();

            match args.commands.unwrap() {
                Commands::Replay(v) => assert_eq!(v.format, FrameFormat::Pipe),
                _ => assert!(false),
            }
        }

        #[test]
        fn with_config() {
            let args = Args::from_args(
                &["oro"],
                &["replay", "frames.json", "--config", "oro.json"],
            )
            .unwrap();

            match args.commands.unwrap() {
                Commands::Replay(v) => {
                    assert_eq!(v.config.unwrap(), PathBuf::from("oro.json"));
                }
                _ => assert!(false),
            }
        }

        #[test]
        fn unknown_format() {
            let args = Args::from_args(&["oro"], &["replay", "frames.csv", "--format", "csv"]);

            assert!(args.is_err());
        }

        #[test]
        fn missing_path() {
            assert!(Args::from_args(&["oro"], &["replay"]).is_err());
        }

        #[test]
        fn missing_file() {
            let args = Args::parse(&["replay", "/nonexistent/frames.json"]).unwrap();

            assert!(matches!(args.run(), Err(CliError::Io { .. })));
        }
    }

    mod score {
        use super::*;

        #[test]
        fn positionals() {
            let args = Args::from_args(&["oro"], &["score", "helo wrld", "hello world"]).unwrap();

            match args.commands.unwrap() {
                Commands::Score(v) => {
                    assert_eq!(v.spoken, "helo wrld");
                    assert_eq!(v.expected, "hello world");
                }
                _ => assert!(false),
            }
        }

        #[test]
        fn missing_expected() {
            assert!(Args::from_args(&["oro"], &["score", "hello"]).is_err());
        }

        #[test]
        fn runs() {
            let args = Args::parse(&["score", "hello world", "hello world"]).unwrap();

            assert!(args.run().is_ok());
        }
    }

    mod evaluate {
        use super::*;

        #[test]
        fn path() {
            let args = Args::from_args(&["oro"], &["evaluate", "pairs.json"]).unwrap();

            match args.commands.unwrap() {
                Commands::Evaluate(v) => assert_eq!(v.path, PathBuf::from("pairs.json")),
                _ => assert!(false),
            }
        }
    }

    #[test]
    fn info() {
        let args = Args::from_args(&["oro"], &["info"]).unwrap();

        assert!(matches!(args.commands, Some(Commands::Info(_))));
        assert!(args.run().is_ok());
    }
}
