use std::path::{Path, PathBuf};

use anyhow::Result;
use footy_models::MatchRecord;

use crate::loader::load_csv;

/// Supplier of the historical match table.
pub trait HistorySource {
    fn matches(&self) -> Result<Vec<MatchRecord>>;
}

/// Results file on disk, re-read on every call.
#[derive(Debug, Clone)]
pub struct CsvHistory {
    path: PathBuf,
}

impl CsvHistory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HistorySource for CsvHistory {
    fn matches(&self) -> Result<Vec<MatchRecord>> {
        load_csv(&self.path)
    }
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryHistory {
    records: Vec<MatchRecord>,
}

impl InMemoryHistory {
    pub fn new(records: Vec<MatchRecord>) -> Self {
        Self { records }
    }
}

impl HistorySource for InMemoryHistory {
    fn matches(&self) -> Result<Vec<MatchRecord>> {
        Ok(self.records.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::io::Write;

    #[test]
    fn test_csv_source() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Date,HomeTeam,AwayTeam,FTHG,FTAG,FTR").unwrap();
        writeln!(file, "2023-08-12,Genk,Gent,2,1,H").unwrap();

        let source = CsvHistory::new(file.path());
        let matches = source.matches().unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(source.path(), file.path());
    }

    #[test]
    fn test_in_memory_source() {
        let date = NaiveDate::from_ymd_opt(2023, 8, 12).unwrap();
        let source = InMemoryHistory::new(vec![MatchRecord::new(date, "Genk", "Gent", 0, 0)]);
        let boxed: Box<dyn HistorySource> = Box::new(source);
        assert_eq!(boxed.matches().unwrap()[0].away_team, "Gent");
    }
}
