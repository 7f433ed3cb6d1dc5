//! Transient notifications. Each toast is removed by its own timer, so ids keep
//! a late timer from dismissing a newer message.

use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: Uuid,
    pub message: String,
}

#[derive(Debug, Clone, Default)]
pub struct ToastQueue {
    toasts: Vec<Toast>,
}

impl ToastQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a message and returns the id its dismiss timer should use.
    pub fn push(&mut self, message: impl Into<String>) -> Uuid {
        let id = Uuid::new_v4();
        self.toasts.push(Toast {
            id,
            message: message.into(),
        });
        id
    }

    pub fn dismiss(&mut self, id: Uuid) {
        self.toasts.retain(|toast| toast.id != id);
    }

    #[must_use]
    pub fn visible(&self) -> &[Toast] {
        &self.toasts
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dismiss_only_removes_matching_toast() {
        let mut queue = ToastQueue::new();
        let first = queue.push("Task deleted");
        let second = queue.push("Role updated");

        queue.dismiss(first);
        assert_eq!(queue.visible().len(), 1);
        assert_eq!(queue.visible()[0].id, second);

        queue.dismiss(first);
        assert_eq!(queue.visible().len(), 1);

        queue.dismiss(second);
        assert!(queue.is_empty());
    }
}
