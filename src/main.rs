use clap::Parser;
use std::fs::File;
use std::path::PathBuf;

use pianoroll::{reader, sequencer, Editor};

#[derive(Parser, Debug)]
#[command(name = "pianoroll")]
#[command(version = "0.1.0")]
#[command(about = "Inspect piano-roll score files", long_about = None)]
struct Args {
    /// Input score file (reads from stdin if not specified)
    input: Option<PathBuf>,

    /// Print the lowered note-on/note-off event stream
    #[arg(short, long)]
    events: bool,

    /// Print the chromatic pitch range of one instrument
    #[arg(short, long, value_name = "TIMBRE")]
    range: Option<u8>,
}

fn main() -> Result<(), pianoroll::Error> {
    let args = Args::parse();

    let builder = match &args.input {
        Some(path) => reader::parse(File::open(path)?)?,
        None => reader::parse(std::io::stdin())?,
    };

    let tempo = builder.tempo();
    let mut editor = Editor::with_composition(builder.build());
    editor.set_tempo(tempo);

    if let Some(timbre) = args.range {
        for pitch in editor.composition().range(timbre) {
            println!("{}", pitch);
        }
        return Ok(());
    }

    println!("tempo: {} us/beat", editor.tempo());
    println!("length: {} ticks", editor.length());
    println!("instruments: {}", editor.composition().sheets().count());

    if args.events {
        for event in sequencer::lower(editor.composition()) {
            println!("{}", event);
        }
    }

    Ok(())
}
