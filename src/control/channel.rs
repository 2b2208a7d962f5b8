//! In-process transport over crossbeam channels
//!
//! The engine owns the [`ChannelTransport`]; whoever drives it (the
//! stdin console, tests) holds the matching [`ControlHandle`].

use crossbeam_channel::{unbounded, Receiver, Sender, TryRecvError};
use serde::Serialize;

use super::snapshot::StateSnapshot;
use super::{ControlError, ControlRequest, ControlStatus, ControlTransport};

/// Everything the engine sends back to the editor
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ControlEvent {
    Opened,
    Snapshot(StateSnapshot),
    SpawnError { error: String },
    Click { x: i32, y: i32 },
    Closed,
}

pub struct ChannelTransport {
    requests: Receiver<ControlRequest>,
    statuses: Receiver<ControlStatus>,
    events: Sender<ControlEvent>,
    status: ControlStatus,
}

/// Editor end of a [`ChannelTransport`]
#[derive(Clone)]
pub struct ControlHandle {
    requests: Sender<ControlRequest>,
    statuses: Sender<ControlStatus>,
    events: Receiver<ControlEvent>,
}

impl ChannelTransport {
    pub fn pair() -> (ChannelTransport, ControlHandle) {
        let (request_tx, request_rx) = unbounded::<ControlRequest>();
        let (status_tx, status_rx) = unbounded::<ControlStatus>();
        let (event_tx, event_rx) = unbounded::<ControlEvent>();
        (
            ChannelTransport {
                requests: request_rx,
                statuses: status_rx,
                events: event_tx,
                status: ControlStatus::default(),
            },
            ControlHandle {
                requests: request_tx,
                statuses: status_tx,
                events: event_rx,
            },
        )
    }

    fn send(&self, event: ControlEvent) -> Result<(), ControlError> {
        self.events.send(event).map_err(|_| ControlError::Disconnected)
    }
}

impl ControlTransport for ChannelTransport {
    fn open(&mut self) -> Result<(), ControlError> {
        self.send(ControlEvent::Opened)
    }

    fn poll(&mut self) -> Vec<Result<ControlRequest, ControlError>> {
        let mut out = Vec::new();
        loop {
            match self.requests.try_recv() {
                Ok(request) => out.push(Ok(request)),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    // Requests sent before the handle dropped are still delivered
                    if out.is_empty() {
                        out.push(Err(ControlError::Disconnected));
                    }
                    break;
                }
            }
        }
        out
    }

    fn publish(&mut self, snapshot: &StateSnapshot) -> Result<(), ControlError> {
        self.send(ControlEvent::Snapshot(snapshot.clone()))
    }

    fn report_spawn_error(&mut self, message: &str) -> Result<(), ControlError> {
        self.send(ControlEvent::SpawnError {
            error: message.to_string(),
        })
    }

    fn status(&mut self) -> ControlStatus {
        while let Ok(status) = self.statuses.try_recv() {
            self.status = status;
        }
        self.status
    }

    fn publish_click(&mut self, x: i32, y: i32) -> Result<(), ControlError> {
        self.send(ControlEvent::Click { x, y })
    }

    fn close(&mut self) -> Result<(), ControlError> {
        self.send(ControlEvent::Closed)
    }
}

impl ControlHandle {
    pub fn send(&self, request: ControlRequest) -> Result<(), ControlError> {
        self.requests.send(request).map_err(|_| ControlError::Disconnected)
    }

    pub fn set_status(&self, status: ControlStatus) -> Result<(), ControlError> {
        self.statuses.send(status).map_err(|_| ControlError::Disconnected)
    }

    /// Events published by the engine, in order
    pub fn events(&self) -> &Receiver<ControlEvent> {
        &self.events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requests_delivered_in_order() {
        let (mut transport, handle) = ChannelTransport::pair();
        handle.send(ControlRequest::RequestScenes).unwrap();
        handle.send(ControlRequest::SetMode7(true)).unwrap();

        let got: Vec<_> = transport.poll().into_iter().map(|r| r.unwrap()).collect();
        assert_eq!(got, vec![ControlRequest::RequestScenes, ControlRequest::SetMode7(true)]);
        assert!(transport.poll().is_empty());
    }

    #[test]
    fn test_events_reach_handle() {
        let (mut transport, handle) = ChannelTransport::pair();
        transport.open().unwrap();
        transport.report_spawn_error("bad texture").unwrap();
        transport.publish_click(3, 4).unwrap();
        assert_eq!(
            handle.events().try_iter().collect::<Vec<_>>(),
            vec![
                ControlEvent::Opened,
                ControlEvent::SpawnError { error: "bad texture".into() },
                ControlEvent::Click { x: 3, y: 4 },
            ]
        );
    }

    #[test]
    fn test_events_serialize_with_tag() {
        let json = serde_json::to_value(ControlEvent::SpawnError { error: "bad".into() }).unwrap();
        assert_eq!(json, serde_json::json!({"event": "spawn_error", "error": "bad"}));
        let json = serde_json::to_value(ControlEvent::Click { x: 1, y: 2 }).unwrap();
        assert_eq!(json, serde_json::json!({"event": "click", "x": 1, "y": 2}));
    }

    #[test]
    fn test_status_keeps_latest() {
        let (mut transport, handle) = ChannelTransport::pair();
        assert_eq!(transport.status(), ControlStatus::default());
        handle
            .set_status(ControlStatus { placement_mode: true, show_colliders: false })
            .unwrap();
        handle
            .set_status(ControlStatus { placement_mode: true, show_colliders: true })
            .unwrap();
        assert!(transport.status().show_colliders);
        assert!(transport.status().placement_mode);
    }

    #[test]
    fn test_dropped_handle_reports_disconnect() {
        let (mut transport, handle) = ChannelTransport::pair();
        handle.send(ControlRequest::RequestNodes).unwrap();
        drop(handle);
        assert_eq!(transport.poll().len(), 1);
        let polled = transport.poll();
        assert!(matches!(polled.as_slice(), [Err(ControlError::Disconnected)]));
        assert!(matches!(transport.close(), Err(ControlError::Disconnected)));
    }
}
