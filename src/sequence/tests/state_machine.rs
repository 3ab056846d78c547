/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/2/26
******************************************************************************/

//! Tests for the CommandSequence state machine.

#[cfg(test)]
mod tests {
    use crate::sequence::{
        CommandSequence, MessageType, SequenceError, SequenceOutcome, SequenceState, SequenceStep,
        SessionMessage, StepError,
    };
    use std::sync::{Arc, Mutex};

    /// A step that records build order and accepts any response whose
    /// payload is `b"ok"`, storing `<name> = "done"`.
    fn recording_step(name: &'static str, built: Arc<Mutex<Vec<&'static str>>>) -> SequenceStep {
        SequenceStep::new(
            name,
            move |_ctx, _properties| {
                built.lock().unwrap().push(name);
                Ok(SessionMessage {
                    message_type: MessageType::PropertyRequest,
                    payload: name.as_bytes().to_vec(),
                })
            },
            move |_ctx, message, properties| {
                if message.payload == b"ok" {
                    properties.insert(name, "done");
                    Ok(())
                } else {
                    Err(StepError::Malformed("unexpected payload".to_string()))
                }
            },
        )
    }

    fn ok_response() -> SessionMessage {
        SessionMessage {
            message_type: MessageType::PropertyResponse,
            payload: b"ok".to_vec(),
        }
    }

    fn bad_response() -> SessionMessage {
        SessionMessage {
            message_type: MessageType::PropertyResponse,
            payload: b"garbage".to_vec(),
        }
    }

    fn make_sequence(
        steps: usize,
        built: &Arc<Mutex<Vec<&'static str>>>,
    ) -> CommandSequence {
        const NAMES: [&str; 5] = ["one", "two", "three", "four", "five"];
        let steps = NAMES[..steps]
            .iter()
            .map(|&name| recording_step(name, built.clone()))
            .collect();
        CommandSequence::new("test-sequence", steps)
    }

    #[test]
    fn test_start_emits_first_request() {
        let built = Arc::new(Mutex::new(Vec::new()));
        let mut sequence = make_sequence(3, &built);

        assert_eq!(sequence.state(), SequenceState::Created);

        let request = sequence.start().unwrap();
        assert_eq!(request.payload, b"one");
        assert_eq!(sequence.state(), SequenceState::Running { step: 0 });
        assert_eq!(sequence.current_step_name(), Some("one"));
    }

    #[test]
    fn test_steps_advance_in_order() {
        let built = Arc::new(Mutex::new(Vec::new()));
        let mut sequence = make_sequence(3, &built);

        sequence.start().unwrap();

        let outcome = sequence.on_response(&ok_response()).unwrap();
        assert!(matches!(outcome, SequenceOutcome::Next(ref m) if m.payload == b"two"));
        assert_eq!(sequence.current_step(), Some(1));

        let outcome = sequence.on_response(&ok_response()).unwrap();
        assert!(matches!(outcome, SequenceOutcome::Next(ref m) if m.payload == b"three"));
        assert_eq!(sequence.current_step(), Some(2));

        let outcome = sequence.on_response(&ok_response()).unwrap();
        assert!(matches!(outcome, SequenceOutcome::Completed));

        assert_eq!(*built.lock().unwrap(), vec!["one", "two", "three"]);
    }

    #[test]
    fn test_completion_fires_once_with_properties() {
        let built = Arc::new(Mutex::new(Vec::new()));
        let delivered = Arc::new(Mutex::new(Vec::new()));
        let delivered_clone = delivered.clone();

        let mut sequence = make_sequence(2, &built).on_complete(move |properties| {
            delivered_clone.lock().unwrap().push(properties);
        });

        sequence.start().unwrap();
        sequence.on_response(&ok_response()).unwrap();
        sequence.on_response(&ok_response()).unwrap();

        assert_eq!(sequence.state(), SequenceState::Completed);

        let delivered = delivered.lock().unwrap();
        assert_eq!(delivered.len(), 1);
        assert_eq!(delivered[0].get("one"), Some("done"));
        assert_eq!(delivered[0].get("two"), Some("done"));
    }

    #[test]
    fn test_failure_stops_sequence() {
        let built = Arc::new(Mutex::new(Vec::new()));
        let completed = Arc::new(Mutex::new(0u32));
        let failures = Arc::new(Mutex::new(Vec::new()));

        let completed_clone = completed.clone();
        let failures_clone = failures.clone();

        let mut sequence = make_sequence(5, &built)
            .on_complete(move |_properties| *completed_clone.lock().unwrap() += 1)
            .on_failure(move |error| failures_clone.lock().unwrap().push(error));

        sequence.start().unwrap();
        sequence.on_response(&ok_response()).unwrap();
        sequence.on_response(&ok_response()).unwrap();

        // step 3 receives a malformed response
        let err = sequence.on_response(&bad_response()).unwrap_err();
        assert!(matches!(
            err,
            SequenceError::MalformedResponse { step: 3, name: "three", .. }
        ));
        assert_eq!(sequence.state(), SequenceState::Failed);

        // steps 4 and 5 were never built
        assert_eq!(*built.lock().unwrap(), vec!["one", "two", "three"]);

        // failure callback fired exactly once, success never
        assert_eq!(*completed.lock().unwrap(), 0);
        assert_eq!(failures.lock().unwrap().len(), 1);

        // the sequence is terminal and rejects further responses without
        // firing anything
        let err = sequence.on_response(&ok_response()).unwrap_err();
        assert!(matches!(err, SequenceError::InvalidState));
        assert_eq!(failures.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_remote_rejection() {
        let rejecting = SequenceStep::new(
            "rejected-step",
            |_ctx, _properties| {
                Ok(SessionMessage {
                    message_type: MessageType::PropertyRequest,
                    payload: Vec::new(),
                })
            },
            |_ctx, _message, _properties| Err(StepError::Rejected("no access".to_string())),
        );

        let mut sequence = CommandSequence::new("reject-test", vec![rejecting]);
        sequence.start().unwrap();

        let err = sequence.on_response(&ok_response()).unwrap_err();
        assert!(matches!(
            err,
            SequenceError::RemoteRejected { step: 1, name: "rejected-step", ref reason }
                if reason == "no access"
        ));
    }

    #[test]
    fn test_cancel_silences_callbacks() {
        let built = Arc::new(Mutex::new(Vec::new()));
        let failures = Arc::new(Mutex::new(Vec::new()));
        let failures_clone = failures.clone();

        let mut sequence = make_sequence(3, &built)
            .on_failure(move |error| failures_clone.lock().unwrap().push(error));

        sequence.start().unwrap();
        sequence.cancel();

        assert_eq!(sequence.state(), SequenceState::Failed);
        {
            let failures = failures.lock().unwrap();
            assert_eq!(failures.len(), 1);
            assert!(matches!(failures[0], SequenceError::Cancelled));
        }

        // cancelling again or delivering a response fires nothing further
        sequence.cancel();
        assert!(sequence.on_response(&ok_response()).is_err());
        assert_eq!(failures.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_start_twice_rejected() {
        let built = Arc::new(Mutex::new(Vec::new()));
        let mut sequence = make_sequence(2, &built);

        sequence.start().unwrap();
        let err = sequence.start().unwrap_err();
        assert!(matches!(err, SequenceError::InvalidState));

        // the failed second start must not have disturbed the sequence
        assert_eq!(sequence.current_step(), Some(0));
    }

    #[test]
    fn test_empty_sequence_fails() {
        let failures = Arc::new(Mutex::new(Vec::new()));
        let failures_clone = failures.clone();

        let mut sequence = CommandSequence::new("empty", Vec::new())
            .on_failure(move |error| failures_clone.lock().unwrap().push(error));

        let err = sequence.start().unwrap_err();
        assert!(matches!(err, SequenceError::Empty));
        assert_eq!(sequence.state(), SequenceState::Failed);
        assert_eq!(failures.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_build_failure_fails_sequence() {
        let step = SequenceStep::new(
            "unbuildable",
            |_ctx, _properties| Err(StepError::Malformed("missing input".to_string())),
            |_ctx, _message, _properties| Ok(()),
        );

        let mut sequence = CommandSequence::new("build-fail", vec![step]);
        let err = sequence.start().unwrap_err();
        assert!(matches!(
            err,
            SequenceError::RequestBuild { step: 1, name: "unbuildable", .. }
        ));
        assert_eq!(sequence.state(), SequenceState::Failed);
    }

    #[test]
    fn test_sequence_ids_unique() {
        let a = CommandSequence::new("a", Vec::new());
        let b = CommandSequence::new("b", Vec::new());
        assert_ne!(a.sequence_id(), b.sequence_id());
    }
}
