use crate::error::{SaResult, SteadyError};
use crate::geometry::speed;
use crate::history::{CursorHistory, CursorSample};
use crate::stats::TremorProfile;
use crate::tremor::TremorAnalyzer;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

/// Reads `x,y,timestamp_ms` rows. A header row is expected; rows that do not
/// parse are skipped. Timestamps must never go backwards.
pub fn load_trace<P: AsRef<Path>>(path: P) -> SaResult<Vec<CursorSample>> {
    let file = File::open(path.as_ref())?;
    let samples = read_trace(file)?;
    info!("Loaded {} samples from {:?}", samples.len(), path.as_ref());
    Ok(samples)
}

pub fn read_trace<R: Read>(reader: R) -> SaResult<Vec<CursorSample>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut samples = Vec::new();
    let mut skipped = 0usize;

    for record in rdr.records().flatten() {
        if record.len() < 3 {
            skipped += 1;
            continue;
        }
        let parsed = (
            record[0].parse::<f64>(),
            record[1].parse::<f64>(),
            record[2].parse::<u64>(),
        );
        match parsed {
            (Ok(x), Ok(y), Ok(t)) if x.is_finite() && y.is_finite() => {
                samples.push(CursorSample::new(x, y, t));
            }
            _ => skipped += 1,
        }
    }

    if skipped > 0 {
        debug!("Skipped {} malformed trace rows", skipped);
    }
    if samples.is_empty() {
        return Err(SteadyError::Validation("trace contains no samples".into()));
    }
    if let Some(i) = samples
        .windows(2)
        .position(|w| w[1].timestamp_ms < w[0].timestamp_ms)
    {
        return Err(SteadyError::Validation(format!(
            "timestamps go backwards at row {}",
            i + 2
        )));
    }
    Ok(samples)
}

#[derive(Debug, Clone, PartialEq)]
pub struct WindowReport {
    /// Index (0-based) of the sample that closed this window.
    pub end_index: usize,
    pub start_ms: u64,
    pub end_ms: u64,
    pub speed_px_s: f64,
    pub profile: TremorProfile,
}

/// Replays samples through a rolling history of `history_length`, analysing
/// every `stride` samples the way a live session does.
pub fn analyze_windows(
    samples: &[CursorSample],
    history_length: usize,
    stride: usize,
    analyzer: &TremorAnalyzer,
) -> Vec<WindowReport> {
    let stride = stride.max(1);
    let mut history = CursorHistory::new(history_length);
    let mut reports = Vec::new();

    for (i, s) in samples.iter().enumerate() {
        history.record(*s);
        if (i + 1) % stride != 0 {
            continue;
        }
        let window = history.to_vec();
        let (Some(first), Some(last)) = (window.first(), window.last()) else {
            continue;
        };
        reports.push(WindowReport {
            end_index: i,
            start_ms: first.timestamp_ms,
            end_ms: last.timestamp_ms,
            speed_px_s: speed(&window),
            profile: analyzer.analyze(&history),
        });
    }
    reports
}

/// The most severe known profile among the windows.
pub fn worst_profile(reports: &[WindowReport]) -> TremorProfile {
    reports
        .iter()
        .map(|r| r.profile)
        .filter(TremorProfile::is_known)
        .max_by(|a, b| {
            a.severity
                .cmp(&b.severity)
                .then(a.amplitude_px.total_cmp(&b.amplitude_px))
        })
        .unwrap_or(TremorProfile::UNKNOWN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::Severity;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_reads_and_skips_bad_rows() {
        let raw = "x,y,timestamp_ms\n1,2,0\nnope,2,10\n3, 4 ,20\n5,6\n";
        let samples = read_trace(raw.as_bytes()).unwrap();
        assert_eq!(
            samples,
            vec![CursorSample::new(1.0, 2.0, 0), CursorSample::new(3.0, 4.0, 20)]
        );
    }

    #[test]
    fn test_rejects_empty_and_backwards() {
        assert!(matches!(
            read_trace("x,y,timestamp_ms\n".as_bytes()),
            Err(SteadyError::Validation(_))
        ));
        let raw = "x,y,timestamp_ms\n0,0,100\n1,1,50\n";
        assert!(matches!(read_trace(raw.as_bytes()), Err(SteadyError::Validation(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "x,y,timestamp_ms").unwrap();
        for i in 0..20u64 {
            writeln!(file, "{},{},{}", (i % 2) * 6, 0, i * 30).unwrap();
        }
        let samples = load_trace(file.path()).unwrap();
        assert_eq!(samples.len(), 20);

        let reports = analyze_windows(&samples, 10, 5, &TremorAnalyzer::default());
        assert_eq!(reports.len(), 4);
        assert_eq!(reports[0].profile, TremorProfile::UNKNOWN);
        assert_eq!(reports[1].profile.severity, Severity::Severe);
        assert_eq!(worst_profile(&reports).severity, Severity::Severe);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        assert!(matches!(
            load_trace("/definitely/not/here.csv"),
            Err(SteadyError::Io(_))
        ));
    }
}
