//! Jobs of the day and their start-time ordering.
//!
//! Job は固定データ（セッション中は不変）。ワークフローの状態は
//! `workflow.rs` の JobWorkflow が job id をキーに持つ。

use serde::{Deserialize, Serialize};

use super::ids::JobId;

/// A scheduled field job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub title: String,
    /// `HH:MM`
    pub start: String,
    /// `HH:MM`
    pub end: String,
    /// "lat, long"
    pub location: String,
    pub materials: Vec<String>,
    pub dependencies: Vec<String>,
}

impl Job {
    pub fn start_minutes(&self) -> u32 {
        parse_time_to_minutes(&self.start)
    }
}

/// `HH:MM` を 0 時からの分に変換する。
///
/// 数値にならない部分は 0 として扱う（"7:xx" → 420）。
pub fn parse_time_to_minutes(raw: &str) -> u32 {
    let mut parts = raw.trim().splitn(2, ':');
    let hours = parts
        .next()
        .and_then(|h| h.trim().parse::<u32>().ok())
        .unwrap_or(0);
    let minutes = parts
        .next()
        .and_then(|m| m.trim().parse::<u32>().ok())
        .unwrap_or(0);
    hours.saturating_mul(60).saturating_add(minutes)
}

/// The day's jobs in ascending start-time order.
///
/// Sorting is stable: jobs sharing a start time keep their declaration order.
#[derive(Debug, Clone)]
pub struct DayPlan {
    jobs: Vec<Job>,
}

impl DayPlan {
    pub fn new(mut jobs: Vec<Job>) -> Self {
        jobs.sort_by_key(Job::start_minutes);
        Self { jobs }
    }

    /// Crew's fixed demo day.
    pub fn sample() -> Self {
        Self::new(sample_jobs())
    }

    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    pub fn get(&self, id: JobId) -> Option<&Job> {
        self.jobs.iter().find(|j| j.id == id)
    }

    /// Next job after `id` in start-time order. `None` for the last job or
    /// an unknown id.
    pub fn next_after(&self, id: JobId) -> Option<&Job> {
        let idx = self.jobs.iter().position(|j| j.id == id)?;
        self.jobs.get(idx + 1)
    }

    /// Union of every job's materials, first-seen order, no duplicates.
    pub fn staged_materials(&self) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        self.jobs
            .iter()
            .flat_map(|j| j.materials.iter())
            .filter(|m| seen.insert(m.as_str()))
            .cloned()
            .collect()
    }
}

fn job(
    id: u32,
    title: &str,
    start: &str,
    end: &str,
    location: &str,
    materials: &[&str],
    dependencies: &[&str],
) -> Job {
    Job {
        id: JobId::new(id),
        title: title.to_string(),
        start: start.to_string(),
        end: end.to_string(),
        location: location.to_string(),
        materials: materials.iter().map(|s| s.to_string()).collect(),
        dependencies: dependencies.iter().map(|s| s.to_string()).collect(),
    }
}

pub fn sample_jobs() -> Vec<Job> {
    vec![
        job(
            1,
            "Pole Replacement • Sector 3",
            "07:30",
            "09:45",
            "45.5120, -122.6580",
            &["Pole 45ft Composite", "Crossarm Kit", "Hardware Set A"],
            &["Flaggers", "Bucket Truck"],
        ),
        job(
            2,
            "Transformer Swap • Oak Ridge",
            "10:15",
            "12:00",
            "45.5199, -122.6740",
            &["25kVA Transformer", "Grounding Kit", "Lugs Set"],
            &["Civil Crew"],
        ),
        job(
            3,
            "Line Inspection • Substation 7",
            "13:00",
            "15:30",
            "45.5301, -122.6802",
            &["Inspection Forms", "Seal Tags"],
            &["Drone", "Thermal Camera"],
        ),
    ]
}
