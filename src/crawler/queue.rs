//! Work queue shared by the scheduler and page processors
//!
//! The queue is many-producer (every worker enqueues the children it
//! discovers) and single-consumer (the scheduler's take loop). Alongside the
//! channel it keeps an outstanding-work counter: a task counts from the
//! moment it is pushed until its [`OutstandingGuard`] is dropped, which the
//! scheduler does only once the task is terminal. Because a worker pushes its
//! children before releasing its own guard, the counter reaches zero only when
//! no task is queued or in flight.

use crate::crawler::task::CrawlTask;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Creates a connected producer handle and consumer
pub fn work_queue() -> (WorkQueue, TaskReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    let outstanding = Arc::new(AtomicUsize::new(0));

    (
        WorkQueue {
            tx,
            outstanding: Arc::clone(&outstanding),
        },
        TaskReceiver { rx, outstanding },
    )
}

/// Cloneable producer side of the work queue
#[derive(Debug, Clone)]
pub struct WorkQueue {
    tx: UnboundedSender<CrawlTask>,
    outstanding: Arc<AtomicUsize>,
}

impl WorkQueue {
    /// Adds a task; returns `false` if the consumer is gone
    pub fn push(&self, task: CrawlTask) -> bool {
        self.outstanding.fetch_add(1, Ordering::SeqCst);

        if self.tx.send(task).is_err() {
            self.outstanding.fetch_sub(1, Ordering::SeqCst);
            return false;
        }
        true
    }

    pub fn outstanding(&self) -> usize {
        self.outstanding.load(Ordering::SeqCst)
    }
}

/// Outcome of one bounded-wait take
#[derive(Debug)]
pub enum Take {
    /// A task, plus the guard that keeps it counted as outstanding
    Task(CrawlTask, OutstandingGuard),
    /// Nothing arrived within the wait
    Idle,
    /// Every producer handle has been dropped
    Closed,
}

/// Consumer side of the work queue
#[derive(Debug)]
pub struct TaskReceiver {
    rx: UnboundedReceiver<CrawlTask>,
    outstanding: Arc<AtomicUsize>,
}

impl TaskReceiver {
    /// Waits up to `wait` for the next task
    pub async fn take(&mut self, wait: Duration) -> Take {
        match tokio::time::timeout(wait, self.rx.recv()).await {
            Ok(Some(task)) => Take::Task(
                task,
                OutstandingGuard {
                    outstanding: Arc::clone(&self.outstanding),
                },
            ),
            Ok(None) => Take::Closed,
            Err(_) => Take::Idle,
        }
    }

    /// Tasks pushed but not yet released
    pub fn outstanding(&self) -> usize {
        self.outstanding.load(Ordering::SeqCst)
    }
}

/// Releases one unit of outstanding work when dropped
///
/// Dropping also happens during unwinding, so a panicking worker still
/// releases its task.
#[derive(Debug)]
pub struct OutstandingGuard {
    outstanding: Arc<AtomicUsize>,
}

impl Drop for OutstandingGuard {
    fn drop(&mut self) {
        self.outstanding.fetch_sub(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use url::Url;

    fn task(path: &str) -> CrawlTask {
        CrawlTask::seed(
            Url::parse(&format!("http://a.com/{}", path)).unwrap(),
            Arc::new(PathBuf::from("out.json")),
        )
    }

    #[tokio::test]
    async fn test_take_in_push_order() {
        let (queue, mut receiver) = work_queue();
        assert!(queue.push(task("1")));
        assert!(queue.push(task("2")));

        let Take::Task(first, _g1) = receiver.take(Duration::from_millis(10)).await else {
            panic!("expected a task");
        };
        let Take::Task(second, _g2) = receiver.take(Duration::from_millis(10)).await else {
            panic!("expected a task");
        };

        assert_eq!(first.uri.path(), "/1");
        assert_eq!(second.uri.path(), "/2");
    }

    #[tokio::test]
    async fn test_outstanding_until_guard_dropped() {
        let (queue, mut receiver) = work_queue();
        queue.push(task("1"));
        assert_eq!(receiver.outstanding(), 1);

        let Take::Task(_task, guard) = receiver.take(Duration::from_millis(10)).await else {
            panic!("expected a task");
        };
        assert_eq!(receiver.outstanding(), 1);

        // A worker pushes a child before its own task is released.
        queue.push(task("child"));
        assert_eq!(queue.outstanding(), 2);

        drop(guard);
        assert_eq!(receiver.outstanding(), 1);
    }

    #[tokio::test]
    async fn test_empty_take_is_idle() {
        let (_queue, mut receiver) = work_queue();
        assert!(matches!(
            receiver.take(Duration::from_millis(5)).await,
            Take::Idle
        ));
    }

    #[tokio::test]
    async fn test_closed_when_producers_dropped() {
        let (queue, mut receiver) = work_queue();
        drop(queue);
        assert!(matches!(
            receiver.take(Duration::from_millis(5)).await,
            Take::Closed
        ));
    }

    #[tokio::test]
    async fn test_push_after_receiver_dropped() {
        let (queue, receiver) = work_queue();
        drop(receiver);
        assert!(!queue.push(task("1")));
        assert_eq!(queue.outstanding(), 0);
    }

    #[tokio::test]
    async fn test_guard_released_on_panic() {
        let (queue, mut receiver) = work_queue();
        queue.push(task("1"));
        let Take::Task(_task, guard) = receiver.take(Duration::from_millis(10)).await else {
            panic!("expected a task");
        };

        let handle = tokio::spawn(async move {
            let _guard = guard;
            panic!("worker failed");
        });
        assert!(handle.await.unwrap_err().is_panic());
        assert_eq!(receiver.outstanding(), 0);
    }
}
