//! Next-frame task queue.
//!
//! Work queued while handling an event runs at the start of the following
//! frame. Tasks queued while a batch is being run land in the next batch.

#[derive(Debug)]
pub struct TaskQueue<T> {
    pending: Vec<T>,
}

impl<T> TaskQueue<T> {
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
        }
    }

    pub fn invoke_later(&mut self, task: T) {
        self.pending.push(task);
    }

    /// Takes every task queued so far, in submission order.
    pub fn take_ready(&mut self) -> Vec<T> {
        std::mem::take(&mut self.pending)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl<T> Default for TaskQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tasks_run_in_submission_order() {
        let mut queue = TaskQueue::new();
        queue.invoke_later(1);
        queue.invoke_later(2);
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.take_ready(), vec![1, 2]);
        assert!(queue.is_empty());
    }

    #[test]
    fn tasks_queued_while_running_wait_a_frame() {
        let mut queue = TaskQueue::new();
        queue.invoke_later("first");
        let batch = queue.take_ready();
        for _ in batch {
            queue.invoke_later("second");
        }
        assert_eq!(queue.take_ready(), vec!["second"]);
        assert!(queue.take_ready().is_empty());
    }
}
