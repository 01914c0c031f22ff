//! Attempt records and end-of-session totals.

use std::fmt;

use maze_chase_core::AttemptStatus;

/// Outcome of one settled attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AttemptRecord {
    /// Zero-based index of the maze attempted.
    pub maze: usize,
    /// Terminal status the attempt settled on.
    pub status: AttemptStatus,
    /// Steps the player committed.
    pub steps: u32,
    /// Score the attempt ended with.
    pub score: i64,
}

/// Aggregate totals across every settled attempt.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SessionSummary {
    /// Attempts that settled either way.
    pub attempts: usize,
    /// Attempts the player won.
    pub wins: usize,
    /// Attempts a chaser ended.
    pub losses: usize,
    /// Steps committed across all attempts.
    pub total_steps: u64,
    /// Scores summed across all attempts.
    pub total_score: i64,
}

/// Folds every record into aggregate totals.
#[must_use]
pub fn summarize(records: &[AttemptRecord]) -> SessionSummary {
    let mut summary = SessionSummary::default();
    for record in records {
        summary.attempts += 1;
        match record.status {
            AttemptStatus::Won => summary.wins += 1,
            AttemptStatus::Lost => summary.losses += 1,
            AttemptStatus::Ongoing => {}
        }
        summary.total_steps += u64::from(record.steps);
        summary.total_score += record.score;
    }
    summary
}

impl fmt::Display for SessionSummary {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "attempts: {}, wins: {}, losses: {}, steps: {}, score: {}",
            self.attempts, self.wins, self.losses, self.total_steps, self.total_score
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn totals_accumulate_across_records() {
        let records = [
            AttemptRecord {
                maze: 0,
                status: AttemptStatus::Won,
                steps: 10,
                score: 10900,
            },
            AttemptRecord {
                maze: 0,
                status: AttemptStatus::Lost,
                steps: 4,
                score: 960,
            },
            AttemptRecord {
                maze: 1,
                status: AttemptStatus::Won,
                steps: 25,
                score: 750,
            },
        ];
        let summary = summarize(&records);
        assert_eq!(summary.attempts, 3);
        assert_eq!(summary.wins, 2);
        assert_eq!(summary.losses, 1);
        assert_eq!(summary.total_steps, 39);
        assert_eq!(summary.total_score, 12610);
    }

    #[test]
    fn empty_sessions_summarize_to_zeroes() {
        assert_eq!(summarize(&[]), SessionSummary::default());
    }

    #[test]
    fn summaries_print_their_totals() {
        let summary = SessionSummary {
            attempts: 2,
            wins: 1,
            losses: 1,
            total_steps: 13,
            total_score: 11870,
        };
        assert_eq!(
            summary.to_string(),
            "attempts: 2, wins: 1, losses: 1, steps: 13, score: 11870"
        );
    }
}
