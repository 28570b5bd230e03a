//! 共享协调状态与终止检测
//!
//! 所有计数器和工作队列都由同一把锁保护。终止检测没有中心协调者：
//! 某个工作线程在 `dequeue` 中把 `waiting` 加一后发现队列为空，
//! 且 `waiting == active`，就说明没有任何线程还能产生新任务。

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

use log::debug;

use super::queue::{PathTask, WorkQueue};
use crate::errors::FindResult;

/// 一次 `dequeue` 的结果
#[derive(Debug, PartialEq, Eq)]
pub enum Dequeued {
    /// 取到了一个待搜索的目录
    Task(PathTask),
    /// 队列已耗尽且所有活跃线程都在等待，调用者应正常退出
    Terminate,
}

#[derive(Debug, Default)]
struct SearchState {
    queue: WorkQueue,
    active: usize,
    waiting: usize,
    found: usize,
    failed: bool,
    errors: usize,
    dirs_searched: usize,
    denied: usize,
}

/// Point-in-time copy of the coordination counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CoordinatorSnapshot {
    pub active: usize,
    pub waiting: usize,
    pub queued: usize,
    pub found: usize,
    pub failed: bool,
    pub errors: usize,
    pub dirs_searched: usize,
    pub denied: usize,
}

/// Shared state of one search run
///
/// Constructed once by the controller and borrowed by every worker.
#[derive(Debug, Default)]
pub struct Coordinator {
    state: Mutex<SearchState>,
    not_empty: Condvar,
}

impl Coordinator {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, SearchState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// 工作线程登记为活跃
    pub fn register(&self) {
        self.lock().active += 1;
    }

    /// 将任务放到队尾并唤醒所有等待者
    ///
    /// 必须广播：只唤醒一个线程时，被唤醒但没抢到任务的线程会把信号吞掉。
    pub fn enqueue(&self, task: PathTask) -> FindResult<()> {
        self.lock().queue.push(task)?;
        self.not_empty.notify_all();
        Ok(())
    }

    /// 取出队首任务，队列为空时阻塞
    ///
    /// 返回 [`Dequeued::Terminate`] 时调用者已经从 `active` 中注销。
    pub fn dequeue(&self) -> Dequeued {
        let mut state = self.lock();
        state.waiting += 1;
        loop {
            if let Some(task) = state.queue.pop() {
                state.waiting -= 1;
                return Dequeued::Task(task);
            }
            if state.waiting == state.active {
                state.waiting -= 1;
                state.active -= 1;
                debug!("queue exhausted, {} workers still active", state.active);
                drop(state);
                // 其余等待者醒来后会看到同样的条件并依次退出
                self.not_empty.notify_all();
                return Dequeued::Terminate;
            }
            state = self
                .not_empty
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    pub fn record_match(&self) {
        self.lock().found += 1;
    }

    pub fn record_listing(&self) {
        self.lock().dirs_searched += 1;
    }

    pub fn record_denied(&self) {
        self.lock().denied += 1;
    }

    /// 工作线程异常退出：设置错误标志并注销
    ///
    /// 退出后 `waiting == active` 可能刚好成立，所以要唤醒等待者重新检查。
    pub fn fail(&self) {
        {
            let mut state = self.lock();
            state.failed = true;
            state.errors += 1;
            state.active -= 1;
        }
        self.not_empty.notify_all();
    }

    pub fn snapshot(&self) -> CoordinatorSnapshot {
        let state = self.lock();
        CoordinatorSnapshot {
            active: state.active,
            waiting: state.waiting,
            queued: state.queue.len(),
            found: state.found,
            failed: state.failed,
            errors: state.errors,
            dirs_searched: state.dirs_searched,
            denied: state.denied,
        }
    }
}
