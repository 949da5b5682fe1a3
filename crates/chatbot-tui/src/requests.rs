//! Backend requests running in the background.
//!
//! Each request gets its own task so the UI keeps drawing while it waits.
//! Finished tasks are folded back into the [`App`] in the order they are
//! noticed, which is completion order rather than issue order.

use std::sync::Arc;

use chatbot_engine::{Backend, BackendError, Reply, Request};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::app::App;

type Pending = (Request, JoinHandle<Result<Reply, BackendError>>);

/// Requests in flight against one backend.
pub struct PendingRequests {
    backend: Arc<dyn Backend>,
    handles: Vec<Pending>,
}

impl PendingRequests {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            backend,
            handles: Vec::new(),
        }
    }

    /// Number of requests still running.
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Issue `request` on a new task.
    pub fn spawn(&mut self, request: Request) {
        debug!(endpoint = request.endpoint(), in_flight = self.handles.len(), "Spawning request");
        let backend = Arc::clone(&self.backend);
        let task_request = request.clone();
        let handle = tokio::spawn(async move { backend.dispatch(&task_request).await });
        self.handles.push((request, handle));
    }

    /// Settle every finished request into `app`, returning how many settled.
    pub async fn settle_finished(&mut self, app: &mut App) -> usize {
        let mut finished = Vec::new();
        let mut i = 0;
        while i < self.handles.len() {
            if self.handles[i].1.is_finished() {
                finished.push(self.handles.remove(i));
            } else {
                i += 1;
            }
        }

        let count = finished.len();
        for (request, handle) in finished {
            let result = handle.await.unwrap_or_else(|e| {
                warn!(endpoint = request.endpoint(), error = %e, "Request task failed");
                Err(BackendError::Task(e.to_string()))
            });
            app.settle(&request, result);
        }
        count
    }

    /// Abort everything still running.
    pub fn abort_all(self) {
        for (_, handle) in self.handles {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Action;
    use crate::test_utils::{create_empty_app, create_test_app, test_messages};
    use chatbot_engine::testing::{unavailable, MockBackend};
    use chatbot_engine::{InputMode, Message, MessageId};
    use std::time::Duration;

    async fn drain(pending: &mut PendingRequests, app: &mut App) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while !pending.is_empty() {
                pending.settle_finished(app).await;
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("requests did not finish");
    }

    #[tokio::test]
    async fn test_start_settles_session() {
        let mock = Arc::new(MockBackend::new());
        mock.queue_start("conv-1");
        let mut pending = PendingRequests::new(mock.clone());
        let mut app = create_empty_app();

        let request = app.handle_action(Action::Reset).unwrap();
        pending.spawn(request);
        assert_eq!(pending.len(), 1);
        drain(&mut pending, &mut app).await;

        assert_eq!(app.conversation.conversation_id(), Some("conv-1"));
        assert_eq!(mock.recorded_requests(), vec![Request::Start]);
    }

    #[tokio::test]
    async fn test_send_round_trip() {
        let mock = Arc::new(MockBackend::new());
        let mut reply = test_messages();
        reply.push(Message::user(4, "again"));
        reply.push(Message::bot(5, "Sure."));
        mock.queue_messages(reply.clone());

        let mut pending = PendingRequests::new(mock.clone());
        let mut app = create_test_app();
        for c in "again".chars() {
            app.handle_action(Action::Insert(c));
        }
        pending.spawn(app.handle_action(Action::Submit).unwrap());
        assert_eq!(app.input_mode(), InputMode::Busy);

        drain(&mut pending, &mut app).await;

        assert_eq!(app.conversation.messages(), reply.as_slice());
        assert_eq!(app.input_mode(), InputMode::Composing);
        assert!(app.input.is_empty());
    }

    #[tokio::test]
    async fn test_failed_send_keeps_optimistic_message() {
        let mock = Arc::new(MockBackend::new());
        mock.queue_error(unavailable("send_message"));

        let mut pending = PendingRequests::new(mock);
        let mut app = create_test_app();
        for c in "lost".chars() {
            app.handle_action(Action::Insert(c));
        }
        pending.spawn(app.handle_action(Action::Submit).unwrap());
        drain(&mut pending, &mut app).await;

        let last = app.conversation.messages().last().unwrap();
        assert_eq!(last.text, "lost");
        assert!(!app.conversation.is_busy());
    }

    /// Backend whose every call panics inside the request task.
    struct PanickingBackend;

    #[async_trait::async_trait]
    impl Backend for PanickingBackend {
        async fn start_conversation(&self) -> Result<String, BackendError> {
            panic!("start blew up")
        }

        async fn send_message(&self, _: &str, _: &str) -> Result<Vec<Message>, BackendError> {
            panic!("send blew up")
        }

        async fn update_message(
            &self,
            _: &str,
            _: MessageId,
            _: &str,
        ) -> Result<Vec<Message>, BackendError> {
            panic!("update blew up")
        }

        async fn delete_message(
            &self,
            _: &str,
            _: MessageId,
        ) -> Result<Vec<Message>, BackendError> {
            panic!("delete blew up")
        }
    }

    #[tokio::test]
    async fn test_panicked_send_unlocks_input() {
        let mut pending = PendingRequests::new(Arc::new(PanickingBackend));
        let mut app = create_test_app();
        app.handle_action(Action::Insert('x'));
        pending.spawn(app.handle_action(Action::Submit).unwrap());
        assert_eq!(app.input_mode(), InputMode::Busy);

        drain(&mut pending, &mut app).await;

        assert!(!app.conversation.is_busy());
        assert_eq!(app.input_mode(), InputMode::Composing);
        // The optimistic message stays, as with any failed send.
        assert_eq!(app.conversation.messages().last().unwrap().text, "x");

        app.handle_action(Action::Insert('y'));
        assert!(app.handle_action(Action::Submit).is_some());
    }

    #[tokio::test]
    async fn test_abort_all() {
        let mock = Arc::new(MockBackend::new());
        let mut pending = PendingRequests::new(mock);
        pending.spawn(Request::Start);
        pending.abort_all();
    }
}
