//! The job status state machine.
//!
//! Jobs move forward through `RECEIVED -> WORK_STARTED -> COMPLETED ->
//! DELIVERED`; cancellation is reachable from any non-terminal status.
//! The machine validates everything before touching the job: an illegal
//! request leaves status and history exactly as they were, and it is
//! always reported to the caller, never coerced into something legal.

use chrono::{DateTime, Utc};
use washbay_core::job::{Job, JobStatus};
use washbay_core::{Error, Result};

/// Whether `requested` is a legal next status for a job at `current`.
///
/// Forward moves may skip statuses and may repeat the current one; the
/// rule is ordering, not adjacency. Terminal statuses (delivered,
/// cancelled) admit nothing, including themselves.
pub fn is_valid_transition(current: JobStatus, requested: JobStatus) -> bool {
    if current.is_terminal() {
        return false;
    }
    if requested == JobStatus::Cancelled {
        return true;
    }
    match (current.forward_position(), requested.forward_position()) {
        (Some(cur), Some(req)) => req >= cur,
        _ => false,
    }
}

/// Move a job to `requested`, appending a history entry.
///
/// On transition to delivered the job must already carry at least
/// `min_after_images` after-photos, and `actual_delivery` is stamped. All
/// checks run before any mutation; an error return means the job is
/// untouched.
pub fn apply_transition(
    job: &mut Job,
    requested: JobStatus,
    note: Option<String>,
    now: DateTime<Utc>,
    min_after_images: usize,
) -> Result<()> {
    if !is_valid_transition(job.status, requested) {
        return Err(Error::InvalidTransition(format!(
            "job {} cannot move from {} to {}",
            job.token_number, job.status, requested
        )));
    }

    if requested == JobStatus::Delivered && job.after_images.len() < min_after_images {
        return Err(Error::Validation(format!(
            "delivery requires at least {} after images, found {}",
            min_after_images,
            job.after_images.len()
        )));
    }

    job.record_status(requested, note, now);
    if requested == JobStatus::Delivered {
        job.actual_delivery = Some(now);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::job_with_status;
    use washbay_core::ResourceId;

    const ALL: [JobStatus; 5] = [
        JobStatus::Received,
        JobStatus::WorkStarted,
        JobStatus::Completed,
        JobStatus::Delivered,
        JobStatus::Cancelled,
    ];

    #[test]
    fn forward_and_self_moves_are_legal() {
        assert!(is_valid_transition(JobStatus::Received, JobStatus::WorkStarted));
        assert!(is_valid_transition(JobStatus::WorkStarted, JobStatus::Completed));
        assert!(is_valid_transition(JobStatus::Completed, JobStatus::Delivered));
        // Self-transition is a legal no-op forward move for every
        // non-terminal status.
        for status in [JobStatus::Received, JobStatus::WorkStarted, JobStatus::Completed] {
            assert!(is_valid_transition(status, status), "{status} -> {status}");
        }
    }

    #[test]
    fn backward_moves_are_rejected() {
        assert!(!is_valid_transition(JobStatus::WorkStarted, JobStatus::Received));
        assert!(!is_valid_transition(JobStatus::Completed, JobStatus::WorkStarted));
        assert!(!is_valid_transition(JobStatus::Completed, JobStatus::Received));
    }

    #[test]
    fn terminal_statuses_admit_nothing() {
        for requested in ALL {
            assert!(!is_valid_transition(JobStatus::Delivered, requested));
            assert!(!is_valid_transition(JobStatus::Cancelled, requested));
        }
    }

    #[test]
    fn cancellation_is_reachable_from_every_non_terminal_status() {
        for current in [JobStatus::Received, JobStatus::WorkStarted, JobStatus::Completed] {
            assert!(is_valid_transition(current, JobStatus::Cancelled));
        }
    }

    #[test]
    fn forward_jumps_may_skip_statuses() {
        // The rule is "forward or equal", deliberately not "one step":
        // a job can go straight from received to delivered. Tightening
        // this to single-step progression is a product decision that
        // should land here as an explicit change.
        assert!(is_valid_transition(JobStatus::Received, JobStatus::Completed));
        assert!(is_valid_transition(JobStatus::Received, JobStatus::Delivered));
        assert!(is_valid_transition(JobStatus::WorkStarted, JobStatus::Delivered));
    }

    #[test]
    fn legal_transition_appends_history_and_updates_status() {
        let mut job = job_with_status(ResourceId::new(), JobStatus::Received);
        let now = Utc::now();

        apply_transition(&mut job, JobStatus::WorkStarted, Some("bay 2".into()), now, 2)
            .unwrap();

        assert_eq!(job.status, JobStatus::WorkStarted);
        assert_eq!(job.status_history.len(), 2);
        let last = job.status_history.last().unwrap();
        assert_eq!(last.status, "WORK_STARTED");
        assert_eq!(last.note.as_deref(), Some("bay 2"));
        assert_eq!(last.at, now);
    }

    #[test]
    fn illegal_transition_leaves_the_job_untouched() {
        let mut job = job_with_status(ResourceId::new(), JobStatus::Completed);
        let before = job.clone();

        let err =
            apply_transition(&mut job, JobStatus::Received, None, Utc::now(), 2).unwrap_err();

        assert!(matches!(err, Error::InvalidTransition(_)));
        assert_eq!(job.status, before.status);
        assert_eq!(job.status_history.len(), before.status_history.len());
    }

    #[test]
    fn delivery_requires_the_after_image_minimum() {
        let mut job = job_with_status(ResourceId::new(), JobStatus::Completed);
        job.after_images = vec!["https://img/1.jpg".into()];
        let before_history = job.status_history.len();

        let err =
            apply_transition(&mut job, JobStatus::Delivered, None, Utc::now(), 2).unwrap_err();

        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(job.status, JobStatus::Completed);
        assert_eq!(job.status_history.len(), before_history);
        assert!(job.actual_delivery.is_none());
    }

    #[test]
    fn delivery_stamps_actual_delivery_once() {
        let mut job = job_with_status(ResourceId::new(), JobStatus::Completed);
        job.after_images = vec!["https://img/1.jpg".into(), "https://img/2.jpg".into()];
        let now = Utc::now();

        apply_transition(&mut job, JobStatus::Delivered, None, now, 2).unwrap();

        assert_eq!(job.status, JobStatus::Delivered);
        assert_eq!(job.actual_delivery, Some(now));
        // Delivered is terminal, so nothing can restamp it.
        assert!(
            apply_transition(&mut job, JobStatus::Delivered, None, Utc::now(), 2).is_err()
        );
        assert_eq!(job.actual_delivery, Some(now));
    }

    #[test]
    fn history_tail_always_matches_current_status() {
        let mut job = job_with_status(ResourceId::new(), JobStatus::Received);
        for requested in [JobStatus::WorkStarted, JobStatus::Completed, JobStatus::Cancelled] {
            apply_transition(&mut job, requested, None, Utc::now(), 2).unwrap();
            assert_eq!(
                job.status_history.last().unwrap().status,
                job.status.as_label()
            );
        }
    }
}
