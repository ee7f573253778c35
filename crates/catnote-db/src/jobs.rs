//! In-process job queue.
//!
//! Jobs live only as long as the process; a restart drops anything pending.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value as JsonValue;
use tokio::sync::{Mutex, Notify};
use tracing::{debug, warn};
use uuid::Uuid;

use catnote_core::{Error, Job, JobRepository, JobStatus, JobType, Result};

#[derive(Default)]
struct JobTable {
    jobs: HashMap<Uuid, Job>,
    /// Pending job ids in FIFO order.
    pending: VecDeque<Uuid>,
    /// Every job id in submission order.
    submitted: Vec<Uuid>,
    /// Completed or failed job ids, oldest finish first.
    finished: VecDeque<Uuid>,
}

/// In-memory implementation of [`JobRepository`].
///
/// Queueing a job wakes one waiter on the shared [`Notify`], which is how the
/// worker learns about new work without waiting out its poll interval.
pub struct MemoryJobRepository {
    table: Mutex<JobTable>,
    notify: Arc<Notify>,
}

impl Default for MemoryJobRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryJobRepository {
    pub fn new() -> Self {
        Self::with_notify(Arc::new(Notify::new()))
    }

    pub fn with_notify(notify: Arc<Notify>) -> Self {
        Self {
            table: Mutex::new(JobTable::default()),
            notify,
        }
    }

    /// Wake signal raised whenever a job becomes pending.
    pub fn job_notify(&self) -> Arc<Notify> {
        self.notify.clone()
    }
}

#[async_trait]
impl JobRepository for MemoryJobRepository {
    async fn queue(
        &self,
        job_type: JobType,
        payload: Option<JsonValue>,
        max_retries: i32,
    ) -> Result<Uuid> {
        let job = Job::pending(job_type, payload, max_retries.max(0));
        let id = job.id;
        {
            let mut table = self.table.lock().await;
            table.jobs.insert(id, job);
            table.pending.push_back(id);
            table.submitted.push(id);
        }
        self.notify.notify_one();

        debug!(
            subsystem = "jobs",
            component = "queue",
            job_id = %id,
            job_type = job_type.as_str(),
            max_retries,
            "Job queued"
        );
        Ok(id)
    }

    async fn claim_next_for_types(&self, job_types: &[JobType]) -> Result<Option<Job>> {
        let mut table = self.table.lock().await;
        let JobTable { jobs, pending, .. } = &mut *table;

        let position = pending.iter().position(|id| {
            jobs.get(id)
                .is_some_and(|job| job_types.is_empty() || job_types.contains(&job.job_type))
        });
        let Some(position) = position else {
            return Ok(None);
        };
        let Some(id) = pending.remove(position) else {
            return Ok(None);
        };
        let Some(job) = jobs.get_mut(&id) else {
            return Ok(None);
        };

        job.status = JobStatus::Running;
        job.started_at = Some(Utc::now());
        Ok(Some(job.clone()))
    }

    async fn complete(&self, job_id: Uuid, result: Option<JsonValue>) -> Result<()> {
        let mut table = self.table.lock().await;
        let job = table
            .jobs
            .get_mut(&job_id)
            .ok_or_else(|| Error::NotFound(format!("job {}", job_id)))?;
        job.status = JobStatus::Completed;
        job.result = result;
        job.completed_at = Some(Utc::now());
        table.finished.push_back(job_id);
        Ok(())
    }

    async fn fail(&self, job_id: Uuid, error: &str) -> Result<()> {
        let requeued = {
            let mut guard = self.table.lock().await;
            let table = &mut *guard;
            let job = table
                .jobs
                .get_mut(&job_id)
                .ok_or_else(|| Error::NotFound(format!("job {}", job_id)))?;

            job.error_message = Some(error.to_string());
            if job.retry_count < job.max_retries {
                job.retry_count += 1;
                job.status = JobStatus::Pending;
                job.started_at = None;
                table.pending.push_back(job_id);
                true
            } else {
                job.status = JobStatus::Failed;
                job.completed_at = Some(Utc::now());
                table.finished.push_back(job_id);
                false
            }
        };

        if requeued {
            self.notify.notify_one();
            debug!(
                subsystem = "jobs",
                component = "queue",
                job_id = %job_id,
                "Job requeued for retry"
            );
        } else {
            warn!(
                subsystem = "jobs",
                component = "queue",
                job_id = %job_id,
                error = error,
                "Job failed permanently"
            );
        }
        Ok(())
    }

    async fn get(&self, job_id: Uuid) -> Result<Option<Job>> {
        Ok(self.table.lock().await.jobs.get(&job_id).cloned())
    }

    async fn pending_count(&self) -> Result<i64> {
        Ok(self.table.lock().await.pending.len() as i64)
    }

    async fn list_recent(&self, limit: i64) -> Result<Vec<Job>> {
        let table = self.table.lock().await;
        Ok(table
            .submitted
            .iter()
            .rev()
            .take(limit.max(0) as usize)
            .filter_map(|id| table.jobs.get(id).cloned())
            .collect())
    }

    async fn cleanup(&self, keep_count: i64) -> Result<i64> {
        let mut table = self.table.lock().await;
        let keep = keep_count.max(0) as usize;
        if table.finished.len() <= keep {
            return Ok(0);
        }

        let excess = table.finished.len() - keep;
        let pruned: HashSet<Uuid> = table.finished.drain(..excess).collect();
        for id in &pruned {
            table.jobs.remove(id);
        }
        table.submitted.retain(|id| !pruned.contains(id));

        debug!(
            subsystem = "jobs",
            component = "queue",
            op = "cleanup",
            pruned = pruned.len(),
            keep_count,
            "Pruned finished jobs"
        );
        Ok(pruned.len() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;

    #[tokio::test]
    async fn test_queue_and_claim_fifo() {
        let repo = MemoryJobRepository::new();
        let first = repo
            .queue(JobType::NotesCleanup, Some(json!({"category_id": 1})), 0)
            .await
            .unwrap();
        let second = repo.queue(JobType::NotesCleanup, None, 0).await.unwrap();
        assert_eq!(repo.pending_count().await.unwrap(), 2);

        let claimed = repo.claim_next_for_types(&[]).await.unwrap().unwrap();
        assert_eq!(claimed.id, first);
        assert_eq!(claimed.status, JobStatus::Running);
        assert!(claimed.started_at.is_some());
        assert_eq!(claimed.payload, Some(json!({"category_id": 1})));

        let claimed = repo
            .claim_next_for_types(&[JobType::NotesCleanup])
            .await
            .unwrap()
            .unwrap();
        assert_eq!(claimed.id, second);
        assert!(repo.claim_next_for_types(&[]).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_complete_records_result() {
        let repo = MemoryJobRepository::new();
        let id = repo.queue(JobType::NotesCleanup, None, 0).await.unwrap();
        repo.claim_next_for_types(&[]).await.unwrap();
        repo.complete(id, Some(json!({"removed": 2}))).await.unwrap();

        let job = repo.get(id).await.unwrap().unwrap();
        assert_eq!(job.status, JobStatus::Completed);
        assert_eq!(job.result, Some(json!({"removed": 2})));
        assert!(job.completed_at.is_some());
    }

    #[tokio::test]
    async fn test_fail_without_retries_is_final() {
        let repo = MemoryJobRepository::new();
        let id = repo.queue(JobType::NotesCleanup, None, 0).await.unwrap();
        repo.claim_next_for_types(&[]).await.unwrap();
        repo.fail(id, "boom").await.unwrap();

        let job = repo.get(id).await.unwrap().unwrap();
        assert_eq!(job.status, JobStatus::Failed);
        assert_eq!(job.retry_count, 0);
        assert_eq!(job.error_message.as_deref(), Some("boom"));
        assert_eq!(repo.pending_count().await.unwrap(), 0);
        assert!(repo.claim_next_for_types(&[]).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_fail_requeues_within_budget() {
        let repo = MemoryJobRepository::new();
        let id = repo.queue(JobType::NotesCleanup, None, 1).await.unwrap();

        repo.claim_next_for_types(&[]).await.unwrap();
        repo.fail(id, "first").await.unwrap();
        let job = repo.get(id).await.unwrap().unwrap();
        assert_eq!(job.status, JobStatus::Pending);
        assert_eq!(job.retry_count, 1);

        repo.claim_next_for_types(&[]).await.unwrap().unwrap();
        repo.fail(id, "second").await.unwrap();
        let job = repo.get(id).await.unwrap().unwrap();
        assert_eq!(job.status, JobStatus::Failed);
        assert_eq!(job.error_message.as_deref(), Some("second"));
    }

    #[tokio::test]
    async fn test_unknown_job_is_not_found() {
        let repo = MemoryJobRepository::new();
        assert!(repo.get(Uuid::now_v7()).await.unwrap().is_none());
        assert!(matches!(
            repo.complete(Uuid::now_v7(), None).await,
            Err(Error::NotFound(_))
        ));
        assert!(matches!(
            repo.fail(Uuid::now_v7(), "x").await,
            Err(Error::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_queue_wakes_waiter() {
        let repo = MemoryJobRepository::new();
        let notify = repo.job_notify();
        let waiter = tokio::spawn(async move { notify.notified().await });

        tokio::time::sleep(Duration::from_millis(10)).await;
        repo.queue(JobType::NotesCleanup, None, 0).await.unwrap();

        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("waiter should be woken")
            .unwrap();
    }

    #[tokio::test]
    async fn test_list_recent_newest_first() {
        let repo = MemoryJobRepository::new();
        let a = repo.queue(JobType::NotesCleanup, None, 0).await.unwrap();
        let b = repo.queue(JobType::NotesCleanup, None, 0).await.unwrap();
        let c = repo.queue(JobType::NotesCleanup, None, 0).await.unwrap();

        let recent: Vec<Uuid> = repo
            .list_recent(2)
            .await
            .unwrap()
            .into_iter()
            .map(|j| j.id)
            .collect();
        assert_eq!(recent, vec![c, b]);
        assert!(!recent.contains(&a));
    }

    async fn finish_one(repo: &MemoryJobRepository) -> Uuid {
        let id = repo.queue(JobType::NotesCleanup, None, 0).await.unwrap();
        repo.claim_next_for_types(&[]).await.unwrap().unwrap();
        repo.complete(id, None).await.unwrap();
        id
    }

    #[tokio::test]
    async fn test_cleanup_bounds_finished_history() {
        let repo = MemoryJobRepository::new();
        for _ in 0..1000 {
            finish_one(&repo).await;
        }

        assert_eq!(repo.cleanup(10).await.unwrap(), 990);
        assert_eq!(repo.list_recent(i64::MAX).await.unwrap().len(), 10);
        assert_eq!(repo.cleanup(10).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_cleanup_keeps_active_and_newest_finished() {
        let repo = MemoryJobRepository::new();
        let old = finish_one(&repo).await;

        let failed = repo.queue(JobType::NotesCleanup, None, 0).await.unwrap();
        repo.claim_next_for_types(&[]).await.unwrap();
        repo.fail(failed, "boom").await.unwrap();

        let running = repo.queue(JobType::NotesCleanup, None, 0).await.unwrap();
        repo.claim_next_for_types(&[]).await.unwrap();
        let pending = repo.queue(JobType::NotesCleanup, None, 0).await.unwrap();

        assert_eq!(repo.cleanup(1).await.unwrap(), 1);
        assert!(repo.get(old).await.unwrap().is_none());
        assert!(repo.get(failed).await.unwrap().is_some());
        assert!(repo.get(running).await.unwrap().is_some());
        assert!(repo.get(pending).await.unwrap().is_some());

        assert_eq!(repo.cleanup(0).await.unwrap(), 1);
        assert!(repo.get(failed).await.unwrap().is_none());
        assert_eq!(repo.pending_count().await.unwrap(), 1);
        assert_eq!(repo.list_recent(10).await.unwrap().len(), 2);
    }
}
