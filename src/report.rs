//! CSV tables of a trunk trait walk.
//!
//! Two comma-separated tables with a header row are written:
//! - the switch log, one row per walked edge:
//!   `FROM-ID,TO-ID,F-AGE,T-AGE,DURATION,VFROM,VTO,C`
//! - the permanence summary, one row per trait value: `VFROM,VTO,DURATION`
//!
//! Fields holding a comma, a double quote or a line break are enclosed in
//! double quotes, inner quotes doubled.

use crate::walker::{TraitDurations, TransitionRecord};
use std::borrow::Cow;
use std::io;
use std::io::{BufWriter, Write};

/// Header of the switch log.
pub const SWITCHES_HEADER: [&str; 8] = [
    "FROM-ID", "TO-ID", "F-AGE", "T-AGE", "DURATION", "VFROM", "VTO", "C",
];

/// Header of the permanence summary.
pub const SUMMARY_HEADER: [&str; 3] = ["VFROM", "VTO", "DURATION"];

/// Writes the switch log, rows in traversal order.
///
/// # Errors
/// Returns an I/O error if writing fails.
pub fn write_switches_csv<W: Write>(writer: W, transitions: &[TransitionRecord]) -> io::Result<()> {
    let mut csv = CsvWriter::new(writer);
    csv.row(&SWITCHES_HEADER)?;
    for t in transitions {
        csv.row(&[
            t.from_id.to_string(),
            t.to_id.to_string(),
            decimal(t.from_age),
            decimal(t.to_age),
            decimal(t.duration),
            t.from_value.clone(),
            t.to_value.clone(),
            t.switch_flag.to_string(),
        ])?;
    }
    csv.finish()
}

/// Writes the permanence summary, one row per trait value that was kept
/// along at least one walked edge, ordered by value.
///
/// # Errors
/// Returns an I/O error if writing fails.
pub fn write_summary_csv<W: Write>(writer: W, durations: &TraitDurations) -> io::Result<()> {
    let mut csv = CsvWriter::new(writer);
    csv.row(&SUMMARY_HEADER)?;
    for (value, duration) in durations.permanence() {
        csv.row(&[value, value, decimal(duration).as_str()])?;
    }
    csv.finish()
}

// ============================================================================
// CSV Writing (private)
// ============================================================================
struct CsvWriter<W: Write> {
    bw: BufWriter<W>,
}

impl<W: Write> CsvWriter<W> {
    fn new(inner: W) -> Self {
        CsvWriter {
            bw: BufWriter::new(inner),
        }
    }

    fn row<S: AsRef<str>>(&mut self, fields: &[S]) -> io::Result<()> {
        for (i, field) in fields.iter().enumerate() {
            if i > 0 {
                self.bw.write_all(b",")?;
            }
            self.bw.write_all(quote_field(field.as_ref()).as_bytes())?;
        }
        self.bw.write_all(b"\n")
    }

    fn finish(mut self) -> io::Result<()> {
        self.bw.flush()
    }
}

/// Numbers keep a decimal point, `7.0` rather than `7`.
fn decimal(value: f64) -> String {
    format!("{value:?}")
}

fn quote_field(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}
