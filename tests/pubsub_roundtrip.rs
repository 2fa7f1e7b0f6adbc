use std::thread;
use std::time::Duration;

use psynth::pubsub::{Publisher, PublisherConfig, Readiness, StopCondition, Subscriber};
use psynth::synth::{ToneGenerator, Waveform};

const RECV_TIMEOUT: Duration = Duration::from_secs(10);

/// Channel indices away from the defaults so concurrent runs of the CLI
/// (or another test process) don't share endpoints with us.
fn test_channel(offset: u16) -> u16 {
    1000 + (std::process::id() % 1000) as u16 * 16 + offset
}

fn config(frequency: f32) -> PublisherConfig {
    PublisherConfig {
        frequency,
        sample_rate: 48000,
        buffer_samples: 2048,
        waveform: Waveform::Sine,
        readiness: Readiness::AwaitSubscriber {
            timeout: Duration::from_secs(10),
        },
    }
}

#[test]
fn handshake_delivers_the_first_buffer() {
    let channel = test_channel(0);
    let publisher = Publisher::bind(channel, config(440.0)).expect("bind");

    let worker = thread::spawn(move || publisher.run(StopCondition::Buffers(3), None, |_| {}));

    let subscriber = Subscriber::connect(channel).expect("connect");
    subscriber.set_timeout(RECV_TIMEOUT).expect("set timeout");

    let bytes = subscriber.recv_bytes().expect("first buffer");
    assert_eq!(bytes.len(), 2048 * 4);

    // The publisher blocked on the subscription handshake, so this must be
    // buffer one: bit-identical to a fresh generator's first buffer.
    let mut expected = ToneGenerator::new(Waveform::Sine, 440.0, 48000);
    assert_eq!(bytes, expected.generate_bytes(2048));

    let sent = worker.join().unwrap().expect("publish loop");
    assert_eq!(sent, 3);
}

#[test]
fn concurrent_channels_stay_independent() {
    let channel_a = test_channel(1);
    let channel_b = test_channel(2);

    let publisher_a = Publisher::bind(channel_a, config(440.0)).expect("bind a");
    let publisher_b = Publisher::bind(channel_b, config(330.0)).expect("bind b");

    let worker_a =
        thread::spawn(move || publisher_a.run(StopCondition::Buffers(2), None, |_| {}));
    let worker_b =
        thread::spawn(move || publisher_b.run(StopCondition::Buffers(2), None, |_| {}));

    let subscriber_a = Subscriber::connect(channel_a).expect("connect a");
    let subscriber_b = Subscriber::connect(channel_b).expect("connect b");
    subscriber_a.set_timeout(RECV_TIMEOUT).expect("set timeout");
    subscriber_b.set_timeout(RECV_TIMEOUT).expect("set timeout");

    let bytes_a = subscriber_a.recv_bytes().expect("buffer on a");
    let bytes_b = subscriber_b.recv_bytes().expect("buffer on b");

    let mut expected_a = ToneGenerator::new(Waveform::Sine, 440.0, 48000);
    let mut expected_b = ToneGenerator::new(Waveform::Sine, 330.0, 48000);
    assert_eq!(bytes_a, expected_a.generate_bytes(2048));
    assert_eq!(bytes_b, expected_b.generate_bytes(2048));
    assert_ne!(bytes_a, bytes_b);

    worker_a.join().unwrap().expect("publish loop a");
    worker_b.join().unwrap().expect("publish loop b");
}

#[test]
fn warmup_sleep_covers_a_slow_subscription() {
    let channel = test_channel(3);

    // Connect before the publisher binds; zmq reconnects in the background
    // well inside the 250 ms warm-up window.
    let subscriber = Subscriber::connect(channel).expect("connect");
    subscriber.set_timeout(RECV_TIMEOUT).expect("set timeout");

    let publisher = Publisher::bind(
        channel,
        PublisherConfig {
            frequency: 440.0,
            sample_rate: 48000,
            buffer_samples: 512,
            waveform: Waveform::Sine,
            readiness: Readiness::WarmupSleep(Duration::from_millis(250)),
        },
    )
    .expect("bind");

    let sent = publisher
        .run(StopCondition::Once, None, |_| {})
        .expect("publish once");
    assert_eq!(sent, 1);

    let samples = subscriber.recv_samples().expect("decode buffer");
    assert_eq!(samples.len(), 512);
    assert!(samples.iter().all(|s| (-1.0..=1.0).contains(s)));
}

#[test]
fn phase_ramp_publishes_raw_phase_values() {
    let channel = test_channel(4);
    let publisher = Publisher::bind(
        channel,
        PublisherConfig {
            waveform: Waveform::PhaseRamp,
            ..config(440.0)
        },
    )
    .expect("bind");

    let worker = thread::spawn(move || publisher.run(StopCondition::Once, None, |_| {}));

    let subscriber = Subscriber::connect(channel).expect("connect");
    subscriber.set_timeout(RECV_TIMEOUT).expect("set timeout");

    let samples = subscriber.recv_samples().expect("decode buffer");
    assert_eq!(samples.len(), 2048);
    assert!(samples.iter().all(|s| (0.0..48000.0).contains(s)));

    worker.join().unwrap().expect("publish loop");
}
