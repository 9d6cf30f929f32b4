//! Score to JSON converter.

use clap::Parser;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

use pianoroll::score::Tick;
use pianoroll::sequencer::{self, Event};
use pianoroll::reader;

#[derive(Parser, Debug)]
#[command(name = "roll2json")]
#[command(version = "0.1.0")]
#[command(about = "Convert score files to a JSON event stream", long_about = None)]
struct Args {
    /// Input score file
    input: PathBuf,

    /// Output JSON file (writes to stdout if not specified)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output compact JSON (default is pretty-printed)
    #[arg(short, long)]
    compact: bool,
}

/// Top-level JSON structure for a lowered score.
#[derive(Debug, Serialize)]
struct ScoreJson {
    /// Tempo in microseconds per beat
    tempo: u32,
    /// Composition length in ticks
    length: Tick,
    /// The time-ordered event stream
    events: Vec<Event>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let builder = reader::parse(File::open(&args.input)?)?;
    let tempo = builder.tempo();
    let composition = builder.build();

    let score_json = ScoreJson {
        tempo,
        length: composition.length(),
        events: sequencer::lower(&composition),
    };

    let json_string = if args.compact {
        serde_json::to_string(&score_json)?
    } else {
        serde_json::to_string_pretty(&score_json)?
    };

    match args.output {
        Some(path) => {
            let mut file = File::create(path)?;
            file.write_all(json_string.as_bytes())?;
            file.write_all(b"\n")?;
        }
        None => {
            println!("{}", json_string);
        }
    }

    Ok(())
}
