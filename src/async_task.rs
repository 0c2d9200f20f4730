use crate::fuzzy::{self, FuzzyMatch};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone)]
pub enum Task {
    FuzzySearch {
        generation: u64,
        query: String,
        candidates: Arc<Vec<String>>,
        cancellation_token: CancellationToken,
    },
}

impl Task {
    pub fn generation(&self) -> u64 {
        match self {
            Task::FuzzySearch { generation, .. } => *generation,
        }
    }
}

#[derive(Debug, Clone)]
pub enum TaskResult {
    SearchFinished {
        generation: u64,
        matches: Vec<FuzzyMatch>,
    },
    SearchCancelled {
        generation: u64,
    },
    Error {
        message: String,
    },
}

pub async fn run_worker(
    mut task_receiver: mpsc::Receiver<Task>,
    result_sender: mpsc::Sender<TaskResult>,
) {
    while let Some(mut task) = task_receiver.recv().await {
        // Only the newest queued search is worth running
        while let Ok(newer) = task_receiver.try_recv() {
            if newer.generation() >= task.generation() {
                log::debug!(
                    "worker: skipping generation {} for {}",
                    task.generation(),
                    newer.generation()
                );
                task = newer;
            }
        }

        let result = match task {
            Task::FuzzySearch {
                generation,
                query,
                candidates,
                cancellation_token,
            } => run_search(generation, query, candidates, cancellation_token).await,
        };

        if result_sender.send(result).await.is_err() {
            // Main thread has dropped the receiver, exit worker
            break;
        }
    }
}

async fn run_search(
    generation: u64,
    query: String,
    candidates: Arc<Vec<String>>,
    cancellation_token: CancellationToken,
) -> TaskResult {
    let start = std::time::Instant::now();
    let outcome = tokio::task::spawn_blocking(move || {
        fuzzy::search_cancellable(&query, &candidates, &cancellation_token)
    })
    .await;

    match outcome {
        Ok(Some(matches)) => {
            log::debug!(
                "worker: generation {} matched {} in {:?}",
                generation,
                matches.len(),
                start.elapsed()
            );
            TaskResult::SearchFinished {
                generation,
                matches,
            }
        }
        Ok(None) => TaskResult::SearchCancelled { generation },
        Err(e) => TaskResult::Error {
            message: e.to_string(),
        },
    }
}
