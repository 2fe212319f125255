//! Common types and data structures

use crate::constants::REQUEST_LOG_CAP;
use chrono::{DateTime, Local};

/// Status of a single fetch request
#[derive(Clone, PartialEq)]
pub enum RequestStatus {
    InFlight,
    Done,
    Failed(String),
}

/// One row in the request log
#[derive(Clone)]
pub struct FetchRecord {
    pub id: u64,
    pub status: RequestStatus,
    pub started_at: DateTime<Local>,
    pub finished_at: Option<DateTime<Local>>,
}

/// Shared state written by fetch tasks and read by the UI each frame
#[derive(Clone)]
pub struct FetchState {
    /// Display text for the output region. None until the first request
    /// completes; never written at startup.
    pub output: Option<String>,
    pub active_count: usize,
    pub completed_count: usize,
    pub failed_count: usize,
    pub last_finished: Option<DateTime<Local>>,
    pub records: Vec<FetchRecord>,
    next_request_id: u64,
}

impl Default for FetchState {
    fn default() -> Self {
        Self {
            output: None,
            active_count: 0,
            completed_count: 0,
            failed_count: 0,
            last_finished: None,
            records: Vec::new(),
            next_request_id: 1,
        }
    }
}

impl FetchState {
    /// Register a new in-flight request and return its id.
    pub fn begin_request(&mut self) -> u64 {
        let id = self.next_request_id;
        self.next_request_id += 1;
        self.active_count += 1;
        self.records.push(FetchRecord {
            id,
            status: RequestStatus::InFlight,
            started_at: Local::now(),
            finished_at: None,
        });
        if self.records.len() > REQUEST_LOG_CAP {
            let excess = self.records.len() - REQUEST_LOG_CAP;
            self.records.drain(..excess);
        }
        id
    }

    /// Record a completed request. The output is overwritten unconditionally:
    /// whichever request finishes last owns the visible text.
    pub fn finish_request(&mut self, id: u64, text: String, ok: bool) {
        self.output = Some(text.clone());
        self.active_count = self.active_count.saturating_sub(1);
        if ok {
            self.completed_count += 1;
        } else {
            self.failed_count += 1;
        }
        let now = Local::now();
        self.last_finished = Some(now);
        if let Some(rec) = self.records.iter_mut().find(|r| r.id == id) {
            rec.status = if ok {
                RequestStatus::Done
            } else {
                RequestStatus::Failed(text)
            };
            rec.finished_at = Some(now);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_output_before_first_completion() {
        let state = FetchState::default();
        assert!(state.output.is_none());
        assert_eq!(state.active_count, 0);
        assert!(state.records.is_empty());
    }

    #[test]
    fn last_completion_wins_regardless_of_start_order() {
        let mut state = FetchState::default();
        let first = state.begin_request();
        let second = state.begin_request();
        assert_eq!(state.active_count, 2);

        // Second request resolves before the first one
        state.finish_request(second, "{\n  \"b\": 2\n}".into(), true);
        state.finish_request(first, "{\n  \"a\": 1\n}".into(), true);

        assert_eq!(state.output.as_deref(), Some("{\n  \"a\": 1\n}"));
        assert_eq!(state.active_count, 0);
        assert_eq!(state.completed_count, 2);
        assert_eq!(state.failed_count, 0);
    }

    #[test]
    fn failure_overwrites_the_output_like_any_completion() {
        let mut state = FetchState::default();
        let ok_id = state.begin_request();
        let bad_id = state.begin_request();
        state.finish_request(ok_id, "{\n  \"a\": 1\n}".into(), true);
        state.finish_request(bad_id, "Error fetching data: boom".into(), false);

        assert_eq!(state.output.as_deref(), Some("Error fetching data: boom"));
        assert_eq!(state.completed_count, 1);
        assert_eq!(state.failed_count, 1);
        assert!(matches!(
            state.records.iter().find(|r| r.id == bad_id).unwrap().status,
            RequestStatus::Failed(_)
        ));
    }

    #[test]
    fn request_log_drops_oldest_rows_past_cap() {
        let mut state = FetchState::default();
        for _ in 0..REQUEST_LOG_CAP + 10 {
            let id = state.begin_request();
            state.finish_request(id, "{}".into(), true);
        }
        assert_eq!(state.records.len(), REQUEST_LOG_CAP);
        // ids start at 1, so the first surviving row is id 11
        assert_eq!(state.records.first().unwrap().id, 11);
    }
}
