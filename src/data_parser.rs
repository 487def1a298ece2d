/*!
Readers for recorded landmark detector output.

Two layouts are understood:
- JSON, either one array of frames or one frame object per line
- a compact pipe layout with one frame per line, `x,y[,z]|x,y[,z]|...`

A frame without a detected face is kept as a miss so replays keep their timing.
*/

use std::{fmt::Display, str::FromStr};

use log::debug;
use serde::Deserialize;

use crate::model::{Landmark, LandmarkSet};

#[derive(Debug)]
pub enum ParseError {
    Json {
        line: usize,
        error: serde_json::Error,
    },
    Number {
        line: usize,
        token: String,
    },
    Point {
        line: usize,
        point: String,
    },
    UnknownFormat {
        input: String,
    },
}

impl Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json { line, error } => write!(f, "Invalid frame on line {line}: {error}"),
            Self::Number { line, token } => {
                write!(f, "Invalid number on line {line}: {token}")
            }
            Self::Point { line, point } => {
                write!(f, "Expected 2 or 3 coordinates on line {line}, found: {point}")
            }
            Self::UnknownFormat { input } => write!(f, "Unknown frame format: {input}"),
        }
    }
}

impl std::error::Error for ParseError {}

type Result<T> = std::result::Result<T, ParseError>;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum FrameFormat {
    #[default]
    Json,
    Pipe,
}

impl FromStr for FrameFormat {
    type Err = ParseError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" | "jsonl" => Ok(Self::Json),
            "pipe" | "txt" => Ok(Self::Pipe),
            _ => Err(ParseError::UnknownFormat {
                input: s.to_string(),
            }),
        }
    }
}

impl AsRef<str> for FrameFormat {
    fn as_ref(&self) -> &str {
        match self {
            Self::Json => "json",
            Self::Pipe => "pipe",
        }
    }
}

/// One recorded detector frame. `landmarks` is `None` when no face was found.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Frame {
    pub timestamp_ms: Option<u64>,
    pub landmarks: Option<LandmarkSet>,
}

#[derive(Debug, Deserialize)]
struct InFrame {
    timestamp_ms: Option<u64>,
    #[serde(default)]
    faces: Vec<InFace>,
}

#[derive(Debug, Deserialize)]
struct InFace {
    landmarks: LandmarkSet,
}

impl From<InFrame> for Frame {
    fn from(value: InFrame) -> Self {
        Self {
            timestamp_ms: value.timestamp_ms,
            // Only the first face drives the game.
            landmarks: value.faces.into_iter().next().map(|v| v.landmarks),
        }
    }
}

pub fn parse(data: &str, format: FrameFormat) -> Result<Vec<Frame>> {
    match format {
        FrameFormat::Json => parse_json(data),
        FrameFormat::Pipe => parse_pipe(data),
    }
}

pub fn parse_json(data: &str) -> Result<Vec<Frame>> {
    if data.trim_start().starts_with('[') {
        let frames = serde_json::from_str::<Vec<InFrame>>(data)
            .map_err(|error| ParseError::Json {
                line: error.line(),
                error,
            })?;

        return Ok(frames.into_iter().map(Frame::from).collect());
    }

    let mut frames = vec![];
    for (idx, line) in data.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        let frame = serde_json::from_str::<InFrame>(line).map_err(|error| ParseError::Json {
            line: idx + 1,
            error,
        })?;
        frames.push(Frame::from(frame));
    }

    debug!("Parsed {} json frames", frames.len());

    Ok(frames)
}

fn parse_number(token: &str, line: usize) -> Result<f32> {
    token.trim().parse::<f32>().map_err(|_| ParseError::Number {
        line,
        token: token.to_string(),
    })
}

pub fn parse_pipe(data: &str) -> Result<Vec<Frame>> {
    let mut frames = vec![];

    for (idx, line) in data.lines().enumerate() {
        let line_number = idx + 1;
        let line = line.trim();
        if line.is_empty() {
            frames.push(Frame::default());
            continue;
        }

        let mut points = vec![];
        for point in line.split('|').filter(|v| !v.trim().is_empty()) {
            let vals = point.split(',').collect::<Vec<&str>>();
            let landmark = match vals.as_slice() {
                [x, y] => Landmark::new(
                    parse_number(x, line_number)?,
                    parse_number(y, line_number)?,
                ),
                [x, y, z] => Landmark::with_depth(
                    parse_number(x, line_number)?,
                    parse_number(y, line_number)?,
                    parse_number(z, line_number)?,
                ),
                _ => {
                    return Err(ParseError::Point {
                        line: line_number,
                        point: point.to_string(),
                    })
                }
            };
            points.push(landmark);
        }

        frames.push(Frame {
            timestamp_ms: None,
            landmarks: Some(LandmarkSet::from(points)),
        });
    }

    debug!("Parsed {} pipe frames", frames.len());

    Ok(frames)
}
