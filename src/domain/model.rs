/// 輸入表格中的一列，`position` 為從 1 開始的資料列序號
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputRow {
    pub position: usize,
    pub address: String,
}

impl InputRow {
    pub fn is_blank(&self) -> bool {
        self.address.trim().is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Per-row geocoding result. Everything except `Resolved` is written with
/// empty coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum GeocodeOutcome {
    Resolved(Coordinates),
    NoMatch,
    Skipped,
    Failed { reason: String },
}

impl GeocodeOutcome {
    pub fn coordinates(&self) -> Option<Coordinates> {
        match self {
            GeocodeOutcome::Resolved(coords) => Some(*coords),
            _ => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, GeocodeOutcome::Resolved(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutputRow {
    pub address: String,
    pub outcome: GeocodeOutcome,
}

impl OutputRow {
    pub fn latitude(&self) -> Option<f64> {
        self.outcome.coordinates().map(|c| c.latitude)
    }

    pub fn longitude(&self) -> Option<f64> {
        self.outcome.coordinates().map(|c| c.longitude)
    }
}

/// 輸出檔的三個欄位名稱，順序固定為 地址、緯度、經度
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputColumns {
    pub address: String,
    pub latitude: String,
    pub longitude: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutcomeCounts {
    pub resolved: usize,
    pub no_match: usize,
    pub skipped: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Default)]
pub struct EnrichmentResult {
    pub rows: Vec<OutputRow>,
}

impl EnrichmentResult {
    pub fn counts(&self) -> OutcomeCounts {
        self.rows
            .iter()
            .fold(OutcomeCounts::default(), |mut counts, row| {
                match row.outcome {
                    GeocodeOutcome::Resolved(_) => counts.resolved += 1,
                    GeocodeOutcome::NoMatch => counts.no_match += 1,
                    GeocodeOutcome::Skipped => counts.skipped += 1,
                    GeocodeOutcome::Failed { .. } => counts.failed += 1,
                }
                counts
            })
    }
}
