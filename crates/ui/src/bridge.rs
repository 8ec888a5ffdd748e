use std::sync::mpsc;
use std::thread;

use engine::{Completion, HttpQaBackend, QaBackend, Request, execute};
use iced::futures::{SinkExt, StreamExt, channel::mpsc as futures_mpsc, executor};
use iced::{Subscription, stream};
use tracing::{info, warn};

const REQUEST_CHANNEL_CAPACITY: usize = 8;
const COMPLETION_CHANNEL_CAPACITY: usize = 8;
const SUBSCRIPTION_CHANNEL_CAPACITY: usize = 32;

/// Sender used by the UI thread to dispatch requests to the service worker.
pub type RequestSender = mpsc::SyncSender<Request>;

/// Receiver used by the UI thread to read completions from the service worker.
pub type CompletionReceiver = mpsc::Receiver<Completion>;

/// Spawns a worker, or explains why it could not be started.
pub type BridgeSpawner = fn() -> Result<(RequestSender, CompletionReceiver), String>;

/// Messages emitted by the service bridge subscription.
#[derive(Debug, Clone)]
pub enum BridgeEvent {
    Ready(RequestSender),
    Completed(Completion),
    Unavailable(String),
    Disconnected,
}

/// Builds a subscription that starts the service bridge and forwards completions.
pub fn service_subscription() -> Subscription<BridgeEvent> {
    Subscription::run(bridge_worker_stream)
}

fn bridge_worker_stream() -> impl iced::futures::Stream<Item = BridgeEvent> {
    bridge_worker_stream_with(spawn_http_bridge)
}

fn bridge_worker_stream_with(
    spawn_bridge: BridgeSpawner,
) -> impl iced::futures::Stream<Item = BridgeEvent> {
    stream::channel(
        SUBSCRIPTION_CHANNEL_CAPACITY,
        move |mut output| async move {
            let (request_tx, completion_rx) = match spawn_bridge() {
                Ok(channels) => channels,
                Err(reason) => {
                    let _ = output.send(BridgeEvent::Unavailable(reason)).await;
                    return;
                }
            };
            let _ = output.send(BridgeEvent::Ready(request_tx)).await;

            let (forward_tx, mut forward_rx) =
                futures_mpsc::channel::<BridgeEvent>(SUBSCRIPTION_CHANNEL_CAPACITY);

            thread::spawn(move || {
                let mut forward_tx = forward_tx;
                while let Ok(completion) = completion_rx.recv() {
                    if executor::block_on(forward_tx.send(BridgeEvent::Completed(completion)))
                        .is_err()
                    {
                        return;
                    }
                }
                let _ = executor::block_on(forward_tx.send(BridgeEvent::Disconnected));
            });

            while let Some(event) = forward_rx.next().await {
                if output.send(event).await.is_err() {
                    break;
                }
            }
        },
    )
}

/// Spawns the production bridge around the HTTP service configured in the
/// environment.
pub fn spawn_http_bridge() -> Result<(RequestSender, CompletionReceiver), String> {
    let backend = HttpQaBackend::from_env().map_err(|error| error.to_string())?;
    info!(base_url = %backend.config().base_url, "service bridge starting");
    Ok(spawn_backend_bridge(backend))
}

/// Spawns a bridge around any backend.
///
/// Requests run one at a time in arrival order; each produces exactly one
/// completion.
pub fn spawn_backend_bridge<B>(backend: B) -> (RequestSender, CompletionReceiver)
where
    B: QaBackend + Send + 'static,
{
    let (request_tx, request_rx) = mpsc::sync_channel::<Request>(REQUEST_CHANNEL_CAPACITY);
    let (completion_tx, completion_rx) =
        mpsc::sync_channel::<Completion>(COMPLETION_CHANNEL_CAPACITY);

    thread::spawn(move || {
        while let Ok(request) = request_rx.recv() {
            let completion = execute(&backend, request);
            if completion_tx.send(completion).is_err() {
                warn!("completion receiver dropped; stopping service worker");
                return;
            }
        }
    });

    (request_tx, completion_rx)
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;
    use std::thread;
    use std::time::Duration;

    use iced::futures::{StreamExt, executor, pin_mut};

    use engine::{
        Answer, BackendError, Completion, IngestReply, IngestStatus, Outcome, QaBackend, Session,
        VideoId,
    };

    use super::{
        BridgeEvent, CompletionReceiver, RequestSender, bridge_worker_stream_with,
        spawn_backend_bridge,
    };

    #[test]
    fn bridge_answers_each_request_with_matching_ticket() {
        let (request_tx, completion_rx) = spawn_backend_bridge(MockBackend);
        let mut session = Session::new();
        let request = session.submit("https://youtu.be/abc123").expect("submit");
        let ticket = request.ticket;

        request_tx.send(request).expect("send request");

        let completion = completion_rx
            .recv_timeout(Duration::from_secs(1))
            .expect("completion");
        assert_eq!(completion.ticket, ticket);
        assert!(matches!(completion.outcome, Outcome::Ingested(Ok(_))));
    }

    #[test]
    fn bridge_reports_backend_failures_as_completions() {
        let (request_tx, completion_rx) = spawn_backend_bridge(MockBackend);
        let mut session = Session::new();
        let request = session.submit("https://youtu.be/broken").expect("submit");

        request_tx.send(request).expect("send request");

        let completion = completion_rx
            .recv_timeout(Duration::from_secs(1))
            .expect("completion");
        assert!(matches!(
            completion.outcome,
            Outcome::Ingested(Err(BackendError::Transport { .. }))
        ));
    }

    #[test]
    fn bridge_worker_stream_emits_ready_forwards_completions_and_disconnected() {
        let (bridge_tx, bridge_rx) = mpsc::channel::<BridgeEvent>();

        thread::spawn(move || {
            let stream = bridge_worker_stream_with(spawn_mock_bridge);
            executor::block_on(async move {
                pin_mut!(stream);
                for _ in 0..3 {
                    let Some(event) = stream.next().await else {
                        break;
                    };
                    if bridge_tx.send(event).is_err() {
                        break;
                    }
                }
            });
        });

        let ready = bridge_rx
            .recv_timeout(Duration::from_secs(1))
            .expect("ready event");
        let BridgeEvent::Ready(request_tx) = ready else {
            panic!("expected BridgeEvent::Ready");
        };

        let mut session = Session::new();
        let request = session.submit("https://youtu.be/abc123").expect("submit");
        request_tx.send(request).expect("send request");

        let completed = bridge_rx
            .recv_timeout(Duration::from_secs(1))
            .expect("forwarded completion");
        assert!(matches!(completed, BridgeEvent::Completed(Completion { .. })));

        drop(request_tx);

        let disconnected = bridge_rx
            .recv_timeout(Duration::from_secs(1))
            .expect("disconnected event");
        assert!(matches!(disconnected, BridgeEvent::Disconnected));
    }

    #[test]
    fn bridge_worker_stream_reports_unavailable_backend() {
        let stream = bridge_worker_stream_with(|| Err("invalid SEEKTUBE_TIMEOUT_SECS".to_owned()));

        let first = executor::block_on(async move {
            pin_mut!(stream);
            stream.next().await
        });

        let Some(BridgeEvent::Unavailable(reason)) = first else {
            panic!("expected BridgeEvent::Unavailable");
        };
        assert!(reason.contains("SEEKTUBE_TIMEOUT_SECS"));
    }

    fn spawn_mock_bridge() -> Result<(RequestSender, CompletionReceiver), String> {
        Ok(spawn_backend_bridge(MockBackend))
    }

    #[derive(Debug, Clone, Copy)]
    struct MockBackend;

    impl QaBackend for MockBackend {
        fn ingest(&self, url: &str) -> Result<IngestReply, BackendError> {
            if url.contains("broken") {
                return Err(BackendError::Transport {
                    message: "connection refused".to_owned(),
                });
            }
            Ok(IngestReply {
                video_id: VideoId::new("abc123"),
                status: IngestStatus::Processed,
            })
        }

        fn ask(&self, _question: &str, _video_id: &VideoId) -> Result<Answer, BackendError> {
            Ok(Answer {
                text: "X happens".to_owned(),
                timestamps: Vec::new(),
            })
        }
    }
}
