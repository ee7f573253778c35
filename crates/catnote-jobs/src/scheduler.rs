//! Typed submission of background work.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use catnote_core::{JobRepository, JobType, Result, RetryPolicy};

/// A kind of background work with its submission-time contract.
///
/// `Args` is captured by value into the job payload when the work is
/// enqueued, so the job never depends on state from the submitting context.
pub trait UnitOfWork: Send + Sync + 'static {
    /// Queue discriminator of this work.
    const JOB_TYPE: JobType;
    /// Retry policy recorded on every submitted job.
    const RETRY_POLICY: RetryPolicy;
    /// Arguments captured at submission.
    type Args: Serialize + DeserializeOwned + Send + Sync;
}

/// Fire-and-forget submission front for the job queue.
#[derive(Clone)]
pub struct JobScheduler {
    jobs: Arc<dyn JobRepository>,
}

impl JobScheduler {
    pub fn new(jobs: Arc<dyn JobRepository>) -> Self {
        Self { jobs }
    }

    /// Queue `W` with `args` and return its job id without waiting for it to
    /// run. Queueing wakes an idle worker.
    pub async fn enqueue<W: UnitOfWork>(&self, args: W::Args) -> Result<Uuid> {
        let payload = serde_json::to_value(&args)?;
        let job_id = self
            .jobs
            .queue(W::JOB_TYPE, Some(payload), W::RETRY_POLICY.max_retries)
            .await?;

        info!(
            subsystem = "jobs",
            component = "scheduler",
            op = "enqueue",
            job_id = %job_id,
            job_type = W::JOB_TYPE.as_str(),
            max_retries = W::RETRY_POLICY.max_retries,
            "Job enqueued"
        );
        Ok(job_id)
    }

    /// Pending jobs across all types.
    pub async fn pending_count(&self) -> Result<i64> {
        self.jobs.pending_count().await
    }

    /// The underlying repository, for status lookups.
    pub fn jobs(&self) -> &Arc<dyn JobRepository> {
        &self.jobs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catnote_core::JobStatus;
    use catnote_db::MemoryJobRepository;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Serialize, Deserialize)]
    struct EchoArgs {
        value: String,
    }

    struct EchoWork;

    impl UnitOfWork for EchoWork {
        const JOB_TYPE: JobType = JobType::NotesCleanup;
        const RETRY_POLICY: RetryPolicy = RetryPolicy::with_max_retries(2);
        type Args = EchoArgs;
    }

    #[tokio::test]
    async fn test_enqueue_captures_args_and_policy() {
        let repo = Arc::new(MemoryJobRepository::new());
        let scheduler = JobScheduler::new(repo.clone());

        let id = scheduler
            .enqueue::<EchoWork>(EchoArgs {
                value: "hello".into(),
            })
            .await
            .unwrap();

        let job = repo.get(id).await.unwrap().unwrap();
        assert_eq!(job.status, JobStatus::Pending);
        assert_eq!(job.job_type, JobType::NotesCleanup);
        assert_eq!(job.max_retries, 2);
        assert_eq!(job.payload, Some(json!({"value": "hello"})));
        assert_eq!(scheduler.pending_count().await.unwrap(), 1);
    }
}
