use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::thread;
use std::time::Duration;

use super::Registration;

/// Manages the collection of connection worker threads.
///
/// A new thread is created whenever all existing threads are busy.
/// Idle threads above the minimum die after a few seconds.
pub(crate) struct TaskPool {
    shared: Arc<Shared>,
}

pub(crate) type TaskFn = Box<dyn FnMut() + Send>;

struct Shared {
    // tasks waiting for a worker thread
    queue: Mutex<VecDeque<TaskFn>>,

    // notified whenever a task is pushed to `queue`
    condvar: Condvar,

    // cleared on drop so workers exit after their current task
    run: AtomicBool,

    // number of idle worker threads
    threads_idle: AtomicUsize,

    // number of worker threads alive
    threads_total: AtomicUsize,
}

/// Number of threads kept alive even when idle
pub(crate) const MIN_THREADS: usize = 4;

/// Idle threads above this stay around for `IDLE_TIME`
const MIN_IDLE_THREADS: usize = 1;

/// Time an idle surplus thread waits for work before exiting
const IDLE_TIME: Duration = Duration::from_millis(5000);

impl TaskPool {
    pub(crate) fn new() -> TaskPool {
        let pool = TaskPool {
            shared: Arc::new(Shared {
                queue: Mutex::new(VecDeque::new()),
                condvar: Condvar::new(),
                run: AtomicBool::from(true),
                threads_idle: AtomicUsize::default(),
                threads_total: AtomicUsize::default(),
            }),
        };

        for _ in 0..MIN_THREADS {
            pool.add_thread(None);
        }

        pool
    }

    /// Executes a task on a worker thread.
    ///
    /// Spawns a new thread when no worker is idle.
    pub(crate) fn spawn_task(&self, task: TaskFn) {
        let mut queue = self.shared.queue.lock().unwrap();

        if self.shared.threads_idle.load(Ordering::Acquire) == 0
            || queue.len() > self.shared.threads_total.load(Ordering::Acquire)
        {
            self.add_thread(Some(task));
        } else {
            queue.push_back(task);
            self.shared.condvar.notify_one();
        }
    }

    fn add_thread(&self, initial_task: Option<TaskFn>) {
        let shared = Arc::clone(&self.shared);

        let _ = thread::spawn(move || {
            let _alive_guard = Registration::new(&shared.threads_total);

            if let Some(mut task) = initial_task {
                task();
            }

            while shared.run.load(Ordering::Acquire) {
                let mut task: TaskFn = {
                    let mut queue = shared.queue.lock().unwrap();

                    loop {
                        if let Some(task) = queue.pop_front() {
                            break task;
                        }

                        let _idle_guard = Registration::new(&shared.threads_idle);

                        let notified =
                            if shared.threads_total.load(Ordering::Acquire) <= MIN_THREADS {
                                queue = shared.condvar.wait(queue).unwrap();
                                true
                            } else {
                                let (lock, wait_res) =
                                    shared.condvar.wait_timeout(queue, IDLE_TIME).unwrap();
                                queue = lock;
                                !wait_res.timed_out()
                            };

                        if !notified {
                            if !shared.run.load(Ordering::Acquire) {
                                return;
                            } else if shared.threads_idle.load(Ordering::Acquire)
                                <= MIN_IDLE_THREADS
                                || shared.threads_total.load(Ordering::Acquire) <= MIN_THREADS
                            {
                                continue;
                            } else if queue.is_empty() {
                                // surplus idle thread, let it die
                                return;
                            }
                        }
                    }
                };

                task();
            }
        });
    }

    /// Number of worker threads alive
    #[inline]
    pub(crate) fn threads_total(&self) -> usize {
        self.shared.threads_total.load(Ordering::Relaxed)
    }
}

impl Drop for TaskPool {
    fn drop(&mut self) {
        // workers finish their current task and exit
        self.shared.run.store(false, Ordering::Release);
        self.shared.condvar.notify_all();
    }
}
