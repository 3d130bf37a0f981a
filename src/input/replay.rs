//! Pointer trace replay
//!
//! Loads a recorded gesture from CSV and feeds it through a controller.
//!
//! ```text
//! phase,x,y
//! down,130,100
//! move,200,100
//! up,,
//! ```

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::io;
use std::path::Path;
use tracing::{debug, info, warn};

use super::pointer::{PointerPhase, PointerSample};
use crate::joystick::{JoystickController, Point2D};

/// One CSV row
#[derive(Debug, Deserialize)]
struct TraceRecord {
    phase: PointerPhase,
    x: Option<f32>,
    y: Option<f32>,
}

impl TraceRecord {
    fn into_sample(self, line: usize) -> Result<PointerSample> {
        let position = match (self.x, self.y) {
            (Some(x), Some(y)) => Some(Point2D::new(x, y)),
            (None, None) => None,
            _ => return Err(anyhow!("line {}: x and y must be given together", line)),
        };

        match self.phase {
            PointerPhase::Down | PointerPhase::Move if position.is_none() => Err(anyhow!(
                "line {}: '{}' needs a position",
                line,
                self.phase
            )),
            PointerPhase::Cancel => Ok(PointerSample::cancel()),
            phase => Ok(PointerSample { phase, position }),
        }
    }
}

/// Result of replaying a trace
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    pub accepted: usize,
    pub rejected: usize,
}

/// Parse a trace from any reader
pub fn read_trace<R: io::Read>(reader: R) -> Result<Vec<PointerSample>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .comment(Some(b'#'))
        .from_reader(reader);

    let mut samples = Vec::new();
    for (idx, record) in csv_reader.deserialize::<TraceRecord>().enumerate() {
        // Header is line 1
        let line = idx + 2;
        let record = record.with_context(|| format!("Malformed trace row at line {}", line))?;
        samples.push(record.into_sample(line)?);
    }

    debug!("Parsed {} pointer samples", samples.len());
    Ok(samples)
}

/// Load a trace file
pub fn load_trace(path: impl AsRef<Path>) -> Result<Vec<PointerSample>> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open trace file: {}", path.display()))?;
    read_trace(file).with_context(|| format!("Failed to parse trace file: {}", path.display()))
}

/// Feed samples through the controller in order.
///
/// Rejected samples are logged and skipped; they never stop the replay.
pub fn replay_trace(controller: &mut JoystickController, samples: &[PointerSample]) -> ReplaySummary {
    let mut summary = ReplaySummary::default();

    for (idx, sample) in samples.iter().enumerate() {
        match controller.handle(*sample) {
            Ok(_) => summary.accepted += 1,
            Err(e) => {
                warn!("Sample #{} ({}) rejected: {}", idx + 1, sample.phase, e);
                summary.rejected += 1;
            }
        }
    }

    info!(
        "Replay finished: {} accepted, {} rejected",
        summary.accepted, summary.rejected
    );
    summary
}
