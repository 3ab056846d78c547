use msgbus_rs::adapter::{EndpointId, Envelope, ThreadedAdapter};
use msgbus_rs::sequence::message::{PropertyQuery, PropertyReply, SessionMessage};
use msgbus_rs::sequence::user_info::{get_user_id, load_user_info};
use msgbus_rs::sequence::{
    MessageType, Properties, SequenceRunner, Transport, TransportError, property,
};
use serde::{Deserialize, Serialize};

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::mpsc;
    use std::sync::{Arc, Mutex};
    use std::time::{Duration, Instant};

    /// What the socket thread would hand to the adapter: a response frame
    /// tagged with the correlation id of the owning sequence.
    #[derive(Serialize, Deserialize)]
    struct Frame {
        correlation_id: String,
        reply: PropertyReply,
    }

    #[derive(Clone, Default)]
    struct RecordingTransport {
        sent: Arc<Mutex<Vec<(String, SessionMessage)>>>,
    }

    impl Transport for RecordingTransport {
        fn send(
            &self,
            correlation_id: &str,
            message: &SessionMessage,
        ) -> Result<(), TransportError> {
            self.sent
                .lock()
                .unwrap()
                .push((correlation_id.to_string(), message.clone()));
            Ok(())
        }
    }

    fn service_value(query: &PropertyQuery) -> String {
        match query.key.as_str() {
            property::USER_ID => format!("id-{}", query.user),
            key => format!("{key}-value"),
        }
    }

    fn frame_envelope(correlation_id: &str, request: &SessionMessage) -> Envelope {
        let query: PropertyQuery = request.decode().unwrap();
        let frame = Frame {
            correlation_id: correlation_id.to_string(),
            reply: PropertyReply {
                value: service_value(&query),
                key: query.key,
                request_id: query.request_id,
            },
        };
        Envelope::new(
            EndpointId(3),
            Some(EndpointId(1)),
            serde_json::to_vec(&frame).unwrap(),
        )
    }

    fn init_tracing() {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    }

    /// Full wiring: session responses arrive as envelopes on the adapter,
    /// whose worker thread feeds them into the runner, which emits each
    /// follow-up request until the bootstrap sequence completes.
    #[test]
    fn test_bootstrap_through_adapter() {
        init_tracing();

        let transport = RecordingTransport::default();
        let (done_tx, done_rx) = mpsc::channel::<Properties>();

        let runner = SequenceRunner::new(transport.clone());
        runner
            .launch(
                load_user_info("alice")
                    .on_complete(move |properties| done_tx.send(properties).unwrap()),
            )
            .unwrap();

        let mut adapter = ThreadedAdapter::spawn(move |envelope| {
            let Ok(frame) = serde_json::from_slice::<Frame>(envelope.payload()) else {
                return false;
            };
            let response =
                SessionMessage::encode(MessageType::PropertyResponse, &frame.reply).unwrap();
            runner.deliver(&frame.correlation_id, &response)
        });

        let mut replied = 0usize;
        let deadline = Instant::now() + Duration::from_secs(5);
        let properties = loop {
            assert!(Instant::now() < deadline, "bootstrap did not complete");

            let outstanding: Vec<(String, SessionMessage)> = transport
                .sent
                .lock()
                .unwrap()
                .iter()
                .skip(replied)
                .cloned()
                .collect();
            for (correlation_id, request) in outstanding {
                replied += 1;
                assert!(adapter.submit(frame_envelope(&correlation_id, &request)));
            }

            match done_rx.recv_timeout(Duration::from_millis(10)) {
                Ok(properties) => break properties,
                Err(mpsc::RecvTimeoutError::Timeout) => continue,
                Err(e) => panic!("completion channel closed: {e}"),
            }
        };

        assert_eq!(replied, 5);
        assert_eq!(properties.len(), 5);
        assert_eq!(properties.get(property::USER_ID), Some("id-alice"));
        assert!(properties.contains(property::BITCOIN_DEALER));

        adapter.stop();
    }

    /// A processing callback that fails its first delivery attempt still
    /// completes the sequence once the envelope is redelivered.
    #[test]
    fn test_redelivered_envelope_completes_sequence() {
        init_tracing();

        let transport = RecordingTransport::default();
        let (done_tx, done_rx) = mpsc::channel::<Properties>();

        let runner = SequenceRunner::new(transport.clone());
        runner
            .launch(
                get_user_id("bob").on_complete(move |properties| done_tx.send(properties).unwrap()),
            )
            .unwrap();

        let failed_once = AtomicBool::new(false);
        let mut adapter = ThreadedAdapter::spawn(move |envelope| {
            // simulate a transient consumer failure before touching the
            // runner, so redelivery replays the whole attempt
            if !failed_once.swap(true, Ordering::SeqCst) {
                return false;
            }
            let Ok(frame) = serde_json::from_slice::<Frame>(envelope.payload()) else {
                return false;
            };
            let response =
                SessionMessage::encode(MessageType::PropertyResponse, &frame.reply).unwrap();
            runner.deliver(&frame.correlation_id, &response)
        });

        let (correlation_id, request) = transport.sent.lock().unwrap()[0].clone();
        assert!(adapter.submit(frame_envelope(&correlation_id, &request)));

        let properties = done_rx
            .recv_timeout(Duration::from_secs(5))
            .expect("sequence did not complete after redelivery");
        assert_eq!(properties.get(property::USER_ID), Some("id-bob"));

        adapter.stop();
    }
}
