//! CSV and text report writers
//!
//! Each experiment produces two parallel reports under the output
//! directory, named after the worker count:
//! - `eratosthenes_<W>workers.csv` - one row per trial plus an AVERAGE row
//!   per size, for spreadsheet analysis
//! - `eratosthenes_<W>workers.txt` - the same figures in a human-readable
//!   layout, with the explicit prime list for small sizes

use crate::error::ReportError;
use crate::measure::{Measurement, SizeSummary};
use chrono::Utc;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

const CSV_HEADER: &str =
    "size,trial,total_us,parallel_us,sequential_us,prime_count,parallel_fraction_pct,max_speedup,workers";

/// Writes the paired CSV and text reports for one experiment run
pub struct ReportWriter {
    csv: BufWriter<File>,
    txt: BufWriter<File>,
    csv_path: PathBuf,
    txt_path: PathBuf,
}

impl ReportWriter {
    /// Create both report files under `output_dir`, creating the directory
    /// if needed, and write their headers.
    pub fn create(output_dir: &Path, worker_count: usize) -> Result<Self, ReportError> {
        fs::create_dir_all(output_dir).map_err(|source| ReportError::CreateDir {
            path: output_dir.to_path_buf(),
            source,
        })?;

        let base = format!("eratosthenes_{}workers", worker_count);
        let csv_path = output_dir.join(format!("{base}.csv"));
        let txt_path = output_dir.join(format!("{base}.txt"));

        let csv_file = File::create(&csv_path).map_err(|source| ReportError::Write {
            path: csv_path.clone(),
            source,
        })?;
        let txt_file = File::create(&txt_path).map_err(|source| ReportError::Write {
            path: txt_path.clone(),
            source,
        })?;

        let mut writer = Self {
            csv: BufWriter::new(csv_file),
            txt: BufWriter::new(txt_file),
            csv_path,
            txt_path,
        };

        writer.write_csv(format_args!("{CSV_HEADER}\n"))?;
        writer.write_txt(format_args!(
            "SIEVE OF ERATOSTHENES - AMDAHL ANALYSIS\n\
             Generated: {}\n\
             Workers: {}\n\n",
            Utc::now().format("%Y-%m-%d %H:%M:%S UTC"),
            worker_count
        ))?;

        Ok(writer)
    }

    /// Path of the CSV report
    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }

    /// Path of the text report
    pub fn txt_path(&self) -> &Path {
        &self.txt_path
    }

    /// Open a new per-size section in the text report
    pub fn begin_size(&mut self, size: u64) -> Result<(), ReportError> {
        self.write_txt(format_args!("INPUT SIZE: {size}\n"))
    }

    /// Record one trial in both reports; `trial` is 1-indexed.
    pub fn record_trial(
        &mut self,
        size: u64,
        trial: usize,
        m: &Measurement,
    ) -> Result<(), ReportError> {
        self.write_csv(format_args!(
            "{},{},{},{},{},{},{:.2},{:.4},{}\n",
            size,
            trial,
            m.total_us,
            m.parallel_us,
            m.sequential_us,
            m.prime_count,
            m.parallel_fraction() * 100.0,
            m.max_speedup(),
            m.worker_count
        ))?;
        self.write_txt(format_args!(
            "Trial #{trial}: total_us: {}, parallel_us: {}, sequential_us: {}, prime_count: {}\n",
            m.total_us, m.parallel_us, m.sequential_us, m.prime_count
        ))
    }

    /// Record the per-size AVERAGE row and summary block; the prime list is
    /// included in the text report when it was gathered.
    pub fn record_average(
        &mut self,
        summary: &SizeSummary,
        primes: &[u64],
    ) -> Result<(), ReportError> {
        self.write_csv(format_args!(
            "{},AVERAGE,{:.2},{:.2},{:.2},{},{:.2},{:.4},{}\n\n",
            summary.size,
            summary.mean_total_us,
            summary.mean_parallel_us,
            summary.mean_sequential_us,
            summary.prime_count,
            summary.parallel_fraction() * 100.0,
            summary.max_speedup(),
            summary.worker_count
        ))?;

        self.write_txt(format_args!(
            "AVERAGE over {} trials:\n\
             {{\n  \
               size: {},\n  \
               workers: {},\n  \
               mean_total_us: {:.2},\n  \
               mean_parallel_us: {:.2},\n  \
               mean_sequential_us: {:.2},\n  \
               prime_count: {},\n  \
               parallel_fraction_pct: {:.2},\n  \
               max_theoretical_speedup: {:.4}\n\
             }}\n",
            summary.trials,
            summary.size,
            summary.worker_count,
            summary.mean_total_us,
            summary.mean_parallel_us,
            summary.mean_sequential_us,
            summary.prime_count,
            summary.parallel_fraction() * 100.0,
            summary.max_speedup()
        ))?;

        if !primes.is_empty() {
            let list = primes
                .iter()
                .map(u64::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            self.write_txt(format_args!("Primes: [{list}]\n"))?;
        }
        self.write_txt(format_args!("\n"))
    }

    /// Flush both reports and return their paths
    pub fn finish(mut self) -> Result<(PathBuf, PathBuf), ReportError> {
        self.write_txt(format_args!("END OF ANALYSIS\n"))?;

        let txt_path = self.txt_path.clone();
        self.csv
            .flush()
            .map_err(|source| Self::write_error(&self.csv_path, source))?;
        self.txt
            .flush()
            .map_err(|source| Self::write_error(&txt_path, source))?;
        Ok((self.csv_path, self.txt_path))
    }

    fn write_csv(&mut self, args: std::fmt::Arguments<'_>) -> Result<(), ReportError> {
        self.csv
            .write_fmt(args)
            .map_err(|source| Self::write_error(&self.csv_path, source))
    }

    fn write_txt(&mut self, args: std::fmt::Arguments<'_>) -> Result<(), ReportError> {
        self.txt
            .write_fmt(args)
            .map_err(|source| Self::write_error(&self.txt_path, source))
    }

    fn write_error(path: &Path, source: std::io::Error) -> ReportError {
        ReportError::Write {
            path: path.to_path_buf(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn measurement() -> Measurement {
        Measurement {
            total_us: 100,
            sequential_us: 20,
            parallel_us: 80,
            prime_count: 4,
            primes: vec![2, 3, 5, 7],
            worker_count: 2,
        }
    }

    #[test]
    fn test_reports_written() {
        let dir = tempdir().unwrap();
        let mut writer = ReportWriter::create(dir.path(), 2).unwrap();

        let m = measurement();
        writer.begin_size(10).unwrap();
        writer.record_trial(10, 1, &m).unwrap();
        writer.record_trial(10, 2, &m).unwrap();
        let summary = SizeSummary::from_trials(10, &[m.clone(), m.clone()]);
        writer.record_average(&summary, &m.primes).unwrap();
        let (csv_path, txt_path) = writer.finish().unwrap();

        let csv = fs::read_to_string(&csv_path).unwrap();
        assert!(csv.starts_with(CSV_HEADER));
        assert!(csv.contains("10,1,100,80,20,4,80.00,5.0000,2"));
        assert!(csv.contains("10,AVERAGE,100.00,80.00,20.00,4,80.00,5.0000,2"));

        let txt = fs::read_to_string(&txt_path).unwrap();
        assert!(txt.contains("Workers: 2"));
        assert!(txt.contains("INPUT SIZE: 10"));
        assert!(txt.contains("Primes: [2, 3, 5, 7]"));
        assert!(txt.contains("END OF ANALYSIS"));
    }

    #[test]
    fn test_creates_missing_output_dir() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let writer = ReportWriter::create(&nested, 4).unwrap();
        assert!(writer.csv_path().exists());
        assert!(writer.txt_path().exists());
    }
}
