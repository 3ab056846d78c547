use criterion::Criterion;
use msgbus_rs::sequence::message::{MessageType, PropertyQuery, PropertyReply, SessionMessage};
use msgbus_rs::sequence::user_info::load_user_info;
use msgbus_rs::sequence::SequenceOutcome;
use std::hint::black_box;

fn answer(request: &SessionMessage) -> SessionMessage {
    let query: PropertyQuery = request.decode().unwrap();
    SessionMessage::encode(
        MessageType::PropertyResponse,
        &PropertyReply {
            value: format!("{}-value", query.key),
            key: query.key,
            request_id: query.request_id,
        },
    )
    .unwrap()
}

pub fn bench_bootstrap_sequence(c: &mut Criterion) {
    c.bench_function("bootstrap_sequence_drive", |b| {
        b.iter(|| {
            let mut sequence = load_user_info("bench-user");
            let mut request = sequence.start().unwrap();
            loop {
                match sequence.on_response(&answer(&request)).unwrap() {
                    SequenceOutcome::Next(next) => request = next,
                    SequenceOutcome::Completed => break,
                }
            }
            black_box(sequence.state());
        });
    });
}
