use crate::domain::model::{DoseReport, DoseRow};
use crate::domain::ports::{ResultReporter, Storage};
use crate::utils::error::{DoseError, Result};

pub const DEFAULT_DOSE_FILE: &str = "dose.txt";

/// Space separated `dose flow_rate sample_volume exposure_time tier` rows, three decimals each.
pub fn dose_file_contents(rows: &[DoseRow]) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b' ')
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    for row in rows {
        writer.write_record([
            format!("{:.3}", row.dose.gray()),
            format!("{:.3}", row.result.flow_rate),
            format!("{:.3}", row.result.sample_volume),
            format!("{:.3}", row.result.exposure_time),
            format!("{:.3}", f64::from(row.result.attenuator_tier.index())),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|e| DoseError::IoError(e.into_error()))
}

pub struct DoseFileReporter<S: Storage> {
    storage: S,
    file_name: String,
}

impl<S: Storage> DoseFileReporter<S> {
    pub fn new(storage: S, file_name: impl Into<String>) -> Self {
        Self {
            storage,
            file_name: file_name.into(),
        }
    }
}

impl<S: Storage> ResultReporter for DoseFileReporter<S> {
    fn report(&mut self, report: &DoseReport) -> Result<()> {
        let data = dose_file_contents(&report.rows)?;
        self.storage.write_file(&self.file_name, &data)?;
        tracing::info!(
            "Wrote {} row(s) to {}",
            report.rows.len(),
            self.file_name
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::profile::Profile;
    use crate::core::calculator::DoseCalculator;
    use crate::domain::model::{AttenuatorTier, DoseResult, DoseTarget};
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct MemoryStorage(Rc<RefCell<HashMap<String, Vec<u8>>>>);

    impl Storage for MemoryStorage {
        fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            self.0.borrow_mut().insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    fn row(dose: f64, flow: f64, volume: f64, time: f64, tier: AttenuatorTier) -> DoseRow {
        DoseRow {
            dose: DoseTarget(dose),
            result: DoseResult {
                flow_rate: flow,
                exposure_time: time,
                sample_volume: volume,
                attenuator_tier: tier,
            },
        }
    }

    #[test]
    fn test_rows_use_three_decimals() {
        let rows = vec![
            row(
                100.0,
                2.2370490000000003,
                2.2370490000000007,
                1.0000000000000002,
                AttenuatorTier::Open,
            ),
            row(
                1.0,
                2.237049,
                223.70489999999998,
                100.0,
                AttenuatorTier::Second,
            ),
        ];

        let contents = String::from_utf8(dose_file_contents(&rows).unwrap()).unwrap();
        assert_eq!(
            contents,
            "100.000 2.237 2.237 1.000 0.000\n1.000 2.237 223.705 100.000 2.000\n"
        );
    }

    #[test]
    fn test_empty_rows_write_empty_file() {
        assert!(dose_file_contents(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_reporter_writes_through_storage() {
        let storage = MemoryStorage::default();
        let mut reporter = DoseFileReporter::new(storage.clone(), DEFAULT_DOSE_FILE);
        let rows = vec![row(
            10.0,
            2.237049,
            22.370489999999993,
            9.999999999999998,
            AttenuatorTier::First,
        )];
        let parameters = Profile::ChessG1.defaults().into_plan("test").unwrap().parameters;
        let report = DoseReport {
            parameters,
            summary: DoseCalculator::new(parameters).summarize(&rows),
            rows,
        };

        reporter.report(&report).unwrap();
        let files = storage.0.borrow();
        assert_eq!(files["dose.txt"], b"10.000 2.237 22.370 10.000 1.000\n");
    }
}
