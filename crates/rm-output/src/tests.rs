//! Integration tests for rm-output.

use rm_core::{ResourceId, SimConfig, TaskId};
use rm_sim::{ManagerKind, NoopObserver, RunReport, run_simulation};
use rm_workload::{Step, Workload};

/// Two tasks on one unit; the FIFO run aborts task 1.
fn workload() -> Workload {
    let (t1, t2, r) = (TaskId(0), TaskId(1), ResourceId(0));
    Workload::new(
        vec![1],
        2,
        vec![
            Step::initiate(t1, r, 1),
            Step::initiate(t2, r, 1),
            Step::request(t1, r, 1),
            Step::request(t2, r, 1),
            Step::request(t1, r, 1),
            Step::release(t2, r, 1),
            Step::release(t1, r, 2),
            Step::terminate(t2),
            Step::terminate(t1),
        ],
    )
    .unwrap()
}

fn fifo_report() -> RunReport {
    run_simulation(ManagerKind::Opportunistic, &workload(), &SimConfig::default(), &mut NoopObserver).unwrap()
}

// ── Text ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod text_tests {
    use super::*;

    use crate::text::TextWriter;
    use crate::writer::ReportWriter;

    #[test]
    fn table_layout() {
        let mut w = TextWriter::new(Vec::new());
        w.write_report(&fifo_report()).unwrap();
        w.finish().unwrap();
        let text = String::from_utf8(w.into_inner()).unwrap();

        let expected = "\t\tFIFO\n\
                        \tTask 1  \taborted\n\
                        \tTask 2  \t5\t1\t20.000000%\n\
                        \tTotal\t\t5\t1\t20.000000%\n\
                        \n";
        assert_eq!(text, expected);
    }

    #[test]
    fn banker_heading_without_waits() {
        let workload = Workload::new(
            vec![1],
            1,
            vec![Step::initiate(TaskId(0), ResourceId(0), 1), Step::terminate(TaskId(0))],
        )
        .unwrap();
        let report = run_simulation(ManagerKind::Banker, &workload, &SimConfig::default(), &mut NoopObserver).unwrap();
        let mut w = TextWriter::new(Vec::new());
        w.write_report(&report).unwrap();
        let text = String::from_utf8(w.into_inner()).unwrap();
        assert!(text.starts_with("\t\tBANKER'S\n"));
        assert!(text.contains("\tTask 1  \t1\t0\t0.000000%\n"));
    }
}

// ── CSV ───────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod csv_tests {
    use super::*;
    use tempfile::TempDir;

    use crate::csv::CsvWriter;
    use crate::observer::ReportObserver;
    use crate::writer::ReportWriter;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    fn read(dir: &TempDir, name: &str) -> (Vec<String>, Vec<csv::StringRecord>) {
        let mut rdr = csv::Reader::from_path(dir.path().join(name)).unwrap();
        let headers = rdr.headers().unwrap().iter().map(str::to_owned).collect();
        let rows = rdr.records().map(|r| r.unwrap()).collect();
        (headers, rows)
    }

    #[test]
    fn csv_files_created_with_headers() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();

        let (headers, rows) = read(&dir, "task_stats.csv");
        assert_eq!(headers, ["manager", "task", "outcome", "turnaround", "wait", "wait_percent"]);
        assert!(rows.is_empty());
        assert!(dir.path().join("cycle_summaries.csv").exists());
        assert!(dir.path().join("resource_snapshots.csv").exists());
    }

    #[test]
    fn task_rows_include_totals() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_report(&fifo_report()).unwrap();
        w.finish().unwrap();

        let (_, rows) = read(&dir, "task_stats.csv");
        assert_eq!(rows.len(), 3);
        assert_eq!(&rows[0][1], "1");
        assert_eq!(&rows[0][2], "aborted");
        assert_eq!(&rows[0][3], ""); // no turnaround for an aborted task
        assert_eq!(&rows[1][2], "finished");
        assert_eq!(&rows[1][3], "5");
        assert_eq!(&rows[2][1], "");
        assert_eq!(&rows[2][2], "total");
    }

    #[test]
    fn csv_finish_idempotent() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();
    }

    #[test]
    fn observer_records_both_runs() {
        let dir = tmp();
        let workload = workload();
        let config = SimConfig { snapshot_interval_cycles: 2, ..SimConfig::default() };
        let mut writer = CsvWriter::new(dir.path()).unwrap();

        for kind in ManagerKind::ALL {
            let mut obs = ReportObserver::new(&mut writer, kind);
            run_simulation(kind, &workload, &config, &mut obs).unwrap();
            assert!(obs.take_error().is_none());
        }
        writer.finish().unwrap();

        let (_, summaries) = read(&dir, "cycle_summaries.csv");
        let fifo: Vec<_> = summaries.iter().filter(|r| &r[0] == "FIFO").collect();
        assert_eq!(fifo.len(), 6);
        assert_eq!(&fifo[2][6], "1"); // cycle 2 aborted one task
        assert!(summaries.iter().any(|r| &r[0] == "BANKER'S"));

        let (_, snapshots) = read(&dir, "resource_snapshots.csv");
        assert_eq!(snapshots.iter().filter(|r| &r[0] == "FIFO").count(), 3);
        assert_eq!(&snapshots[0][1], "1");

        let (_, tasks) = read(&dir, "task_stats.csv");
        assert_eq!(tasks.len(), 6);
    }
}

// ── Observer ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod observer_tests {
    use super::*;

    use crate::observer::ReportObserver;
    use crate::writer::ReportWriter;
    use crate::{OutputError, OutputResult};

    /// Fails every write.
    struct Broken {
        attempts: usize,
    }

    impl ReportWriter for Broken {
        fn write_report(&mut self, _report: &RunReport) -> OutputResult<()> {
            self.attempts += 1;
            Err(OutputError::Io(std::io::Error::other("disk full")))
        }

        fn write_cycle_summary(&mut self, _row: &crate::CycleSummaryRow) -> OutputResult<()> {
            self.attempts += 1;
            Err(OutputError::Io(std::io::Error::other("first failure")))
        }

        fn finish(&mut self) -> OutputResult<()> {
            Ok(())
        }
    }

    #[test]
    fn first_error_is_kept() {
        let mut writer = Broken { attempts: 0 };
        let mut obs = ReportObserver::new(&mut writer, ManagerKind::Opportunistic);
        run_simulation(ManagerKind::Opportunistic, &workload(), &SimConfig::default(), &mut obs).unwrap();

        let err = obs.take_error().expect("error stored");
        assert!(err.to_string().contains("first failure"));
        assert!(obs.take_error().is_none());
        assert_eq!(writer.attempts, 7);
    }
}
