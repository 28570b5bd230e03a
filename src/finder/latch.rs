//! 倒计数门闩
//!
//! 启动屏障由两个门闩组成：控制器等待所有工作线程登记完毕（计数 N），
//! 然后打开一次性的起跑门闩（计数 1），工作线程才开始取任务。

use std::sync::{Condvar, Mutex, PoisonError};

/// Blocks waiters until `count_down` has been called `count` times
#[derive(Debug)]
pub struct CountDownLatch {
    remaining: Mutex<usize>,
    zero: Condvar,
}

impl CountDownLatch {
    /// 创建计数为 `count` 的门闩，计数为 0 的门闩一开始就是打开的
    pub fn new(count: usize) -> Self {
        Self {
            remaining: Mutex::new(count),
            zero: Condvar::new(),
        }
    }

    /// 计数减一，归零时唤醒所有等待者；已归零时不做任何事
    pub fn count_down(&self) {
        let mut remaining = self.remaining.lock().unwrap_or_else(PoisonError::into_inner);
        if *remaining == 0 {
            return;
        }
        *remaining -= 1;
        if *remaining == 0 {
            self.zero.notify_all();
        }
    }

    /// 阻塞直到计数归零
    pub fn wait(&self) {
        let remaining = self.remaining.lock().unwrap_or_else(PoisonError::into_inner);
        let _open = self
            .zero
            .wait_while(remaining, |remaining| *remaining > 0)
            .unwrap_or_else(PoisonError::into_inner);
    }

    /// 当前剩余计数
    pub fn remaining(&self) -> usize {
        *self.remaining.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
