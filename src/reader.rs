//! Score text format reader.
//!
//! The format is line oriented. Blank lines and lines starting with `#` are
//! skipped. Records:
//!
//! ```text
//! tempo TEMPO
//! note START END TIMBRE PITCH VOLUME
//! repeat TICK REWIND LOOPS
//! ```
//!
//! `note` adds one tone spanning `[START, END)` with `PITCH` as a linear
//! pitch code; `repeat` places a repeat feature at `TICK`. Records build the
//! composition through [`Builder`], so every model invariant applies to
//! file input too.

use std::io::{BufRead, BufReader, Read};
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::score::Builder;

/// Parses score text into a builder, leaving the caller to `build()`.
pub fn parse<R: Read>(input: R) -> Result<Builder> {
    let mut builder = Builder::new();
    parse_into(input, &mut builder)?;
    Ok(builder)
}

/// Parses score text into an existing builder.
pub fn parse_into<R: Read>(input: R, builder: &mut Builder) -> Result<()> {
    let reader = BufReader::new(input);

    for (index, line) in reader.lines().enumerate() {
        let line_no = index + 1;
        let line = line?;
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut fields = Fields::new(line, line_no);
        let record = fields.next_word()?;
        match record {
            "tempo" => {
                let tempo = fields.next_num("tempo")?;
                fields.finish()?;
                builder.set_tempo(tempo);
            }
            "note" => {
                let start = fields.next_num("start tick")?;
                let end = fields.next_num("end tick")?;
                let timbre = fields.next_num("timbre")?;
                let pitch = fields.next_num("pitch code")?;
                let volume = fields.next_num("volume")?;
                fields.finish()?;
                builder
                    .add_note(start, end, timbre, pitch, volume)
                    .map_err(|e| at_line(line_no, e))?;
            }
            "repeat" => {
                let tick = fields.next_num("tick")?;
                let rewind = fields.next_num("rewind")?;
                let loops = fields.next_num("loop count")?;
                fields.finish()?;
                builder
                    .add_repeat(tick, rewind, loops)
                    .map_err(|e| at_line(line_no, e))?;
            }
            other => {
                return Err(Error::Parse {
                    line: line_no,
                    message: format!("unknown record '{}'", other),
                });
            }
        }
    }

    Ok(())
}

/// Wraps a model error with the line it came from.
fn at_line(line: usize, error: Error) -> Error {
    Error::Parse {
        line,
        message: error.to_string(),
    }
}

/// Whitespace-separated fields of one record line.
struct Fields<'a> {
    words: std::str::SplitWhitespace<'a>,
    line: usize,
}

impl<'a> Fields<'a> {
    fn new(line: &'a str, line_no: usize) -> Fields<'a> {
        Fields {
            words: line.split_whitespace(),
            line: line_no,
        }
    }

    fn next_word(&mut self) -> Result<&'a str> {
        self.words.next().ok_or_else(|| Error::Parse {
            line: self.line,
            message: "missing field".to_string(),
        })
    }

    fn next_num<T: FromStr>(&mut self, name: &str) -> Result<T> {
        let word = self.next_word().map_err(|_| Error::Parse {
            line: self.line,
            message: format!("missing {}", name),
        })?;
        word.parse().map_err(|_| Error::Parse {
            line: self.line,
            message: format!("invalid {} '{}'", name, word),
        })
    }

    fn finish(&mut self) -> Result<()> {
        match self.words.next() {
            Some(extra) => Err(Error::Parse {
                line: self.line,
                message: format!("unexpected field '{}'", extra),
            }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_parses_tempo_notes_and_repeats() {
        let text = "\
# a short phrase
tempo 500000

note 0 4 1 60 80
note 4 6 1 60 80
repeat 8 4 2
";
        let builder = parse(Cursor::new(text)).unwrap();
        assert_eq!(builder.tempo(), 500_000);
        let comp = builder.build();
        assert_eq!(comp.length(), 8);
        assert!(comp.get_feature(8).is_some());
    }

    #[test]
    fn test_unknown_record() {
        let err = parse(Cursor::new("chord 0 4 1\n")).unwrap_err();
        assert!(matches!(err, Error::Parse { line: 1, .. }));
    }

    #[test]
    fn test_missing_and_extra_fields() {
        assert!(matches!(
            parse(Cursor::new("note 0 4 1 60\n")).unwrap_err(),
            Error::Parse { line: 1, .. }
        ));
        assert!(matches!(
            parse(Cursor::new("tempo 100 200\n")).unwrap_err(),
            Error::Parse { line: 1, .. }
        ));
    }

    #[test]
    fn test_model_errors_carry_line_numbers() {
        let text = "note 0 4 1 60 80\nnote 2 3 1 60 80\n";
        let err = parse(Cursor::new(text)).unwrap_err();
        match err {
            Error::Parse { line, message } => {
                assert_eq!(line, 2);
                assert!(message.contains("overlaps"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_invalid_number() {
        let err = parse(Cursor::new("note 0 four 1 60 80\n")).unwrap_err();
        match err {
            Error::Parse { line: 1, message } => assert!(message.contains("end tick")),
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
