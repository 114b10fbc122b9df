// gitrun: git command automation layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::{PendingQueue, ProgressState, QueueError};
use crate::error::GitError;
use crate::logging::Logger;
use crate::task::test_utils::{capture_logs, task_id};

#[test]
fn test_enqueue_names_and_channels() {
    let queue = PendingQueue::new(Logger::new("gitrun"));
    let a = queue.enqueue(task_id(), "status").expect("enqueue");
    let b = queue.enqueue(task_id(), "commit").expect("enqueue");

    assert_eq!(a.name(), "status:1");
    assert_eq!(b.name(), "commit:2");
    assert_eq!(b.logger().channel(), "gitrun/commit:2");
    assert_eq!(queue.names(), vec!["status:1", "commit:2"]);
}

#[test]
fn test_duplicate_enqueue_is_rejected() {
    let queue = PendingQueue::new(Logger::disabled());
    let id = task_id();
    queue.enqueue(id, "add").expect("first");
    assert_eq!(queue.enqueue(id, "add").expect_err("dup"), QueueError::Duplicate(id));
    assert_eq!(queue.len(), 1);
}

#[test]
fn test_lifecycle() {
    let queue = PendingQueue::new(Logger::disabled());
    let id = task_id();
    queue.enqueue(id, "push").expect("enqueue");
    assert_eq!(queue.state(id), Some(ProgressState::Pending));

    queue.mark_attempting(id).expect("attempt");
    assert_eq!(queue.state(id), Some(ProgressState::Attempting));

    queue.complete(id);
    assert!(queue.is_empty());
    assert_eq!(queue.mark_attempting(id), Err(QueueError::Unknown(id)));
}

#[tokio::test]
async fn test_purge_abandons_everything_but_the_failed_task() {
    let queue = PendingQueue::new(Logger::new("gitrun"));
    let (first, second, third) = (task_id(), task_id(), task_id());
    queue.enqueue(first, "add").expect("enqueue");
    queue.enqueue(second, "commit").expect("enqueue");
    queue.enqueue(third, "push").expect("enqueue");

    let err = GitError::configuration("boom");
    let logs = capture_logs(|| async {
        let purged = queue.purge_on_fatal(first, &err);
        assert_eq!(purged, vec!["commit:2", "push:3"]);
    })
    .await;

    assert!(logs.contains("abandoned: configuration error: boom"), "{logs}");
    assert_eq!(queue.names(), vec!["add:1"]);
    assert_eq!(
        queue.mark_attempting(third),
        Err(QueueError::Abandoned {
            cause: "configuration error: boom".to_string(),
        })
    );
    // The abandonment is reported once.
    assert_eq!(queue.mark_attempting(third), Err(QueueError::Unknown(third)));
}
