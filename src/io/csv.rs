use std::io::{self, Write};

use crate::sim::runner::Sample;

/// Write sampled trajectory data to CSV format.
///
/// Columns: time, x0, x1, ... one per state element. The column count
/// follows the first sample.
pub fn write_samples<W: Write>(writer: &mut W, samples: &[Sample]) -> io::Result<()> {
    let width = samples.first().map_or(0, |s| s.state.len());

    write!(writer, "time")?;
    for i in 0..width {
        write!(writer, ",x{i}")?;
    }
    writeln!(writer)?;

    for s in samples {
        write!(writer, "{:.6}", s.time)?;
        for v in &s.state {
            write!(writer, ",{v:.12e}")?;
        }
        writeln!(writer)?;
    }

    Ok(())
}

/// Write samples to a CSV file at the given path.
pub fn write_samples_file(path: &str, samples: &[Sample]) -> io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    write_samples(&mut file, samples)
}
