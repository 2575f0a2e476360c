use std::collections::HashMap;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Total,
    Profile,
    Alignment,
    CellDiff,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct DiffMetrics {
    pub profile_time_ms: u64,
    pub alignment_time_ms: u64,
    pub cell_diff_time_ms: u64,
    pub total_time_ms: u64,
    pub rows_processed: u64,
    pub cells_compared: u64,
    pub similarity_evaluations: u64,
    pub checkpoints: u64,
    #[serde(skip)]
    phase_start: HashMap<Phase, Instant>,
}

impl DiffMetrics {
    pub fn start_phase(&mut self, phase: Phase) {
        self.phase_start.insert(phase, Instant::now());
    }

    pub fn end_phase(&mut self, phase: Phase) {
        if let Some(start) = self.phase_start.remove(&phase) {
            let elapsed = start.elapsed().as_millis() as u64;
            match phase {
                Phase::Profile => self.profile_time_ms += elapsed,
                Phase::Alignment => self.alignment_time_ms += elapsed,
                Phase::CellDiff => self.cell_diff_time_ms += elapsed,
                Phase::Total => self.total_time_ms += elapsed,
            }
        }
    }

    pub fn add_rows_processed(&mut self, count: u64) {
        self.rows_processed = self.rows_processed.saturating_add(count);
    }

    pub fn add_cells_compared(&mut self, count: u64) {
        self.cells_compared = self.cells_compared.saturating_add(count);
    }

    pub fn add_similarity_evaluations(&mut self, count: u64) {
        self.similarity_evaluations = self.similarity_evaluations.saturating_add(count);
    }

    pub fn add_checkpoint(&mut self) {
        self.checkpoints = self.checkpoints.saturating_add(1);
    }
}
