//! Parser for the module-statistics table basf2 prints at the end of a run.
//!
//! The table looks like:
//!
//! ```text
//! =================================================================================
//! Name                      |      Calls | Memory(MB) |    Time(s) | Time(ms)/Call
//! =================================================================================
//! EventInfoSetter           |         50 |          0 |       0.00 |   0.05 +- 0.01
//! EvtGenInput               |         50 |          4 |       0.93 |  18.57 +- 3.41
//! ...
//! Sum_Simulation            |         50 |        102 |      41.55 | 831.00 +- 41.2
//! ...
//! SoftwareTrigger           |         50 |          1 |       0.88 |  17.60 +- 2.05
//! Total                     |         50 |        151 |      68.21 | 1364.2 +- 80.7
//! =================================================================================
//! ```
//!
//! Data rows start two lines below the header (the `====` separator sits in
//! between). The 4th pipe-delimited field is the cumulative time in seconds.
//! Rows not named `Sum_*` accumulate into a running subtotal; four sentinel
//! rows commit it:
//!
//! - `EvtGenInput` commits its own time as the generation phase,
//! - `Sum_Simulation` commits the subtotal as the simulation phase,
//! - `Sum_TriggerSimulation` commits the subtotal as the trigger-simulation
//!   phase,
//! - `SoftwareTrigger` commits the subtotal (its own time included) as the
//!   reconstruction phase and ends the scan.
//!
//! The grand total comes from any line containing `Total`, matched
//! independently of the table scan; when several match, the last one wins.

use crate::error::{Error, Result};

/// Cumulative per-phase wall time for one worker, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PhaseTiming {
    pub gen: f64,
    pub sim: f64,
    pub trig_sim: f64,
    pub reco: f64,
    pub total: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    SeekHeader,
    SeekDataStart,
    Accumulating,
    Done,
}

/// 4th pipe-delimited field of a table row, parsed as seconds.
fn time_field(line: &str, lineno: usize) -> Result<f64> {
    let field = line.split('|').nth(3).ok_or_else(|| Error::MalformedRow {
        line: lineno,
        message: "expected at least 4 pipe-delimited fields".to_string(),
    })?;
    let field = field.trim();
    field.parse::<f64>().map_err(|_| Error::MalformedRow {
        line: lineno,
        message: format!("bad time field {field:?}"),
    })
}

fn row_name(line: &str) -> &str {
    line.split('|').next().unwrap_or("").trim()
}

/// Scan one worker log and extract the five phase durations.
pub fn parse_profile(text: &str) -> Result<PhaseTiming> {
    let mut state = State::SeekHeader;
    let mut subtotal = 0.0;
    let mut timing = PhaseTiming::default();

    for (idx, line) in text.lines().enumerate() {
        let lineno = idx + 1;

        // The grand-total row is matched independently of the table scan.
        if line.contains("Total") {
            timing.total = time_field(line, lineno)?;
        }

        match state {
            State::SeekHeader => {
                if line.contains("Name") && line.contains("Calls") {
                    state = State::SeekDataStart;
                }
            }
            // Separator row under the header.
            State::SeekDataStart => state = State::Accumulating,
            State::Accumulating => {
                // The closing separator means the table ended without a
                // SoftwareTrigger row.
                if !line.contains('|') {
                    return Err(Error::TruncatedTable(
                        "table ended before the SoftwareTrigger row",
                    ));
                }
                let seconds = time_field(line, lineno)?;
                if !line.contains("Sum_") {
                    subtotal += seconds;
                }
                match row_name(line) {
                    "EvtGenInput" => {
                        timing.gen = seconds;
                        subtotal = 0.0;
                    }
                    "Sum_Simulation" => {
                        timing.sim = subtotal;
                        subtotal = 0.0;
                    }
                    "Sum_TriggerSimulation" => {
                        timing.trig_sim = subtotal;
                        subtotal = 0.0;
                    }
                    "SoftwareTrigger" => {
                        timing.reco = subtotal;
                        subtotal = 0.0;
                        state = State::Done;
                    }
                    _ => {}
                }
            }
            State::Done => {}
        }
    }

    match state {
        State::Done => Ok(timing),
        State::SeekHeader | State::SeekDataStart => {
            Err(Error::TruncatedTable("statistics header not found"))
        }
        State::Accumulating => Err(Error::TruncatedTable(
            "table ended before the SoftwareTrigger row",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEP: &str = "====================================================================";

    fn table(rows: &[&str]) -> String {
        let mut log = String::new();
        log.push_str("[INFO] Starting event processing, random seed is 12345\n");
        log.push_str(SEP);
        log.push('\n');
        log.push_str("Name                |      Calls | Memory(MB) |    Time(s) | Time(ms)/Call\n");
        log.push_str(SEP);
        log.push('\n');
        for row in rows {
            log.push_str(row);
            log.push('\n');
        }
        log.push_str(SEP);
        log.push('\n');
        log
    }

    #[test]
    fn well_formed_table() {
        let log = table(&[
            "EventInfoSetter     | 50 | 0 |   0.10 | 2.0 +- 0.1",
            "EvtGenInput         | 50 | 4 |   1.00 | 20.0 +- 1.0",
            "FullSim             | 50 | 90 |  30.00 | 600.0 +- 20.0",
            "PXDDigitizer        | 50 | 10 |  10.00 | 200.0 +- 5.0",
            "Sum_Simulation      | 50 | 100 | 40.00 | 800.0 +- 25.0",
            "TRGCDC              | 50 | 2 |   5.00 | 100.0 +- 3.0",
            "Sum_TriggerSimulation | 50 | 2 | 5.00 | 100.0 +- 3.0",
            "CDCHitFinder        | 50 | 20 |  12.00 | 240.0 +- 8.0",
            "SoftwareTrigger     | 50 | 1 |   3.00 | 60.0 +- 2.0",
            "Total               | 50 | 150 | 61.10 | 1222.0 +- 40.0",
        ]);

        let t = parse_profile(&log).unwrap();
        assert_eq!(t.gen, 1.0);
        assert_eq!(t.sim, 40.0);
        assert_eq!(t.trig_sim, 5.0);
        assert_eq!(t.reco, 15.0);
        assert_eq!(t.total, 61.1);
    }

    #[test]
    fn rows_before_evtgen_do_not_leak_into_sim() {
        let log = table(&[
            "EventInfoSetter     | 10 | 0 | 99.00 | 0.0 +- 0.0",
            "EvtGenInput         | 10 | 4 |  2.00 | 0.0 +- 0.0",
            "FullSim             | 10 | 90 | 6.00 | 0.0 +- 0.0",
            "Sum_Simulation      | 10 | 90 | 6.00 | 0.0 +- 0.0",
            "TRGCDC              | 10 | 2 |  1.00 | 0.0 +- 0.0",
            "Sum_TriggerSimulation | 10 | 2 | 1.00 | 0.0 +- 0.0",
            "SoftwareTrigger     | 10 | 1 |  0.50 | 0.0 +- 0.0",
            "Total               | 10 | 99 | 9.50 | 0.0 +- 0.0",
        ]);

        let t = parse_profile(&log).unwrap();
        // The 99s setup row is discarded when EvtGenInput commits.
        assert_eq!(t.gen, 2.0);
        assert_eq!(t.sim, 6.0);
        assert_eq!(t.reco, 0.5);
    }

    #[test]
    fn trailing_rows_after_software_trigger_are_ignored() {
        let log = table(&[
            "EvtGenInput         | 10 | 4 | 1.00 | 0.0 +- 0.0",
            "Sum_Simulation      | 10 | 9 | 0.00 | 0.0 +- 0.0",
            "Sum_TriggerSimulation | 10 | 2 | 0.00 | 0.0 +- 0.0",
            "SoftwareTrigger     | 10 | 1 | 0.50 | 0.0 +- 0.0",
            "RootOutput          | 10 | 5 | 7.00 | 0.0 +- 0.0",
            "Total               | 10 | 99 | 8.50 | 0.0 +- 0.0",
        ]);

        let t = parse_profile(&log).unwrap();
        assert_eq!(t.reco, 0.5);
        assert_eq!(t.total, 8.5);
    }

    #[test]
    fn last_total_line_wins() {
        let log = table(&[
            "EvtGenInput         | 10 | 4 | 1.00 | 0.0 +- 0.0",
            "Sum_Simulation      | 10 | 9 | 0.00 | 0.0 +- 0.0",
            "Sum_TriggerSimulation | 10 | 2 | 0.00 | 0.0 +- 0.0",
            "SoftwareTrigger     | 10 | 1 | 0.50 | 0.0 +- 0.0",
            "Total               | 10 | 99 | 4.00 | 0.0 +- 0.0",
            "Total               | 10 | 99 | 8.00 | 0.0 +- 0.0",
        ]);

        assert_eq!(parse_profile(&log).unwrap().total, 8.0);
    }

    #[test]
    fn missing_header_is_an_error() {
        let err = parse_profile("no table here\njust chatter\n").unwrap_err();
        assert!(matches!(err, Error::TruncatedTable(_)));
    }

    #[test]
    fn truncated_table_is_an_error() {
        let log = table(&[
            "EvtGenInput         | 10 | 4 | 1.00 | 0.0 +- 0.0",
            "Sum_Simulation      | 10 | 9 | 0.00 | 0.0 +- 0.0",
        ]);
        let err = parse_profile(&log).unwrap_err();
        assert!(matches!(err, Error::TruncatedTable(_)));
    }

    #[test]
    fn short_row_is_an_error() {
        let log = table(&[
            "EvtGenInput         | 10 | 4 | 1.00 | 0.0 +- 0.0",
            "FullSim | 10",
        ]);
        match parse_profile(&log).unwrap_err() {
            Error::MalformedRow { line, .. } => assert_eq!(line, 6),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unparseable_time_is_an_error() {
        let log = table(&["EvtGenInput | 10 | 4 | n/a | 0.0 +- 0.0"]);
        assert!(matches!(
            parse_profile(&log).unwrap_err(),
            Error::MalformedRow { .. }
        ));
    }

    #[test]
    fn absent_phase_keyword_leaves_duration_zero() {
        // No Sum_TriggerSimulation row: trig_sim stays 0 and its subtotal
        // rolls into reco. Detected downstream when the throughput is taken.
        let log = table(&[
            "EvtGenInput         | 10 | 4 | 1.00 | 0.0 +- 0.0",
            "Sum_Simulation      | 10 | 9 | 0.00 | 0.0 +- 0.0",
            "SoftwareTrigger     | 10 | 1 | 0.50 | 0.0 +- 0.0",
            "Total               | 10 | 99 | 1.50 | 0.0 +- 0.0",
        ]);

        let t = parse_profile(&log).unwrap();
        assert_eq!(t.trig_sim, 0.0);
        assert_eq!(t.reco, 0.5);
    }
}
