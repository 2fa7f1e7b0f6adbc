use std::error::Error;
use std::thread;
use std::time::Duration;

use clap::builder::TypedValueParser;
use clap::{Parser, Subcommand};
use crossbeam_channel::bounded;
use tracing::{error, info};

use psynth::pubsub::{Publisher, PublisherConfig, Readiness, StopCondition, Subscriber};
use psynth::synth::{ToneGenerator, Waveform};
use psynth::ui::ProgressManager;
use psynth::utils::consts::{BUFFER_SAMPLES, SAMPLE_RATE, SUBSCRIBE_WAIT_MS, WARMUP_MS};
use psynth::utils::logging::init_logging;

#[derive(Parser)]
#[command(version, about = "Fixed-tone pub/sub publisher", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Publish a tone on one or more channels
    Send {
        /// Frequency of tone to play (Hz)
        #[arg(long, default_value_t = 440.0)]
        frequency: f32,
        /// Number of seconds to play
        #[arg(long, default_value_t = 1.0)]
        duration: f32,
        /// Channel to send tone on (repeatable for concurrent channels)
        #[arg(long, default_values_t = [0u16])]
        channel: Vec<u16>,
        #[arg(long, default_value_t = SAMPLE_RATE, value_parser = clap::value_parser!(u32).range(1..))]
        sample_rate: u32,
        #[arg(long, default_value_t = BUFFER_SAMPLES, value_parser = clap::value_parser!(u64).range(1..).map(|v| v as usize))]
        buffer_samples: usize,
        #[arg(long, value_enum, default_value_t = Waveform::Sine)]
        waveform: Waveform,
        /// Stop after this many buffers instead of a duration
        #[arg(long, conflicts_with = "duration")]
        buffers: Option<u64>,
        /// Publish a single buffer and exit
        #[arg(long, conflicts_with_all = ["duration", "buffers"])]
        once: bool,
        /// Skip the subscriber handshake, only sleep the fixed warm-up
        #[arg(long)]
        no_handshake: bool,
    },
    /// Subscribe to a channel and log received buffers
    Listen {
        #[arg(long, default_value_t = 0)]
        channel: u16,
        /// Stop after this many buffers
        #[arg(long)]
        buffers: Option<u64>,
    },
    /// Render a tone to a 32-bit float WAV file
    Dump {
        #[arg(short, long)]
        output: String,
        #[arg(long, default_value_t = 440.0)]
        frequency: f32,
        #[arg(long, default_value_t = 1.0)]
        duration: f32,
        #[arg(long, default_value_t = SAMPLE_RATE, value_parser = clap::value_parser!(u32).range(1..))]
        sample_rate: u32,
        #[arg(long, value_enum, default_value_t = Waveform::Sine)]
        waveform: Waveform,
    },
}

fn main() -> Result<(), Box<dyn Error>> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Send {
            frequency,
            duration,
            channel,
            sample_rate,
            buffer_samples,
            waveform,
            buffers,
            once,
            no_handshake,
        } => {
            let stop = if once {
                StopCondition::Once
            } else if let Some(n) = buffers {
                StopCondition::Buffers(n)
            } else {
                StopCondition::Duration(Duration::from_secs_f32(duration))
            };
            let readiness = if no_handshake {
                Readiness::WarmupSleep(Duration::from_millis(WARMUP_MS))
            } else {
                Readiness::AwaitSubscriber {
                    timeout: Duration::from_millis(SUBSCRIBE_WAIT_MS),
                }
            };
            run_send(
                frequency,
                channel,
                sample_rate,
                buffer_samples,
                waveform,
                stop,
                readiness,
            )
        }
        Commands::Listen { channel, buffers } => run_listen(channel, buffers),
        Commands::Dump {
            output,
            frequency,
            duration,
            sample_rate,
            waveform,
        } => run_dump(&output, frequency, duration, sample_rate, waveform),
    }
}

fn run_send(
    frequency: f32,
    channels: Vec<u16>,
    sample_rate: u32,
    buffer_samples: usize,
    waveform: Waveform,
    stop: StopCondition,
    readiness: Readiness,
) -> Result<(), Box<dyn Error>> {
    let (shutdown_tx, shutdown_rx) = bounded::<()>(channels.len());
    let n_workers = channels.len();
    ctrlc::set_handler(move || {
        for _ in 0..n_workers {
            let _ = shutdown_tx.try_send(());
        }
    })?;

    let progress = ProgressManager::new();
    let mut workers = Vec::with_capacity(channels.len());
    for channel in channels {
        let config = PublisherConfig {
            frequency,
            sample_rate,
            buffer_samples,
            waveform,
            readiness,
        };
        // Bind before spawning so endpoint errors surface immediately
        let publisher = Publisher::bind(channel, config)?;
        progress.create_bar(
            channel,
            publisher.planned_buffers(stop),
            &format!("{} Hz @ ch {}", frequency, channel),
        )?;

        let shutdown = shutdown_rx.clone();
        let bars = progress.clone();
        workers.push(thread::spawn(move || {
            let result = publisher.run(stop, Some(&shutdown), |sent| {
                let _ = bars.set_position(channel, sent);
            });
            match result {
                Ok(sent) => info!("channel {}: done after {} buffers", channel, sent),
                Err(e) => error!("channel {}: publish failed: {}", channel, e),
            }
        }));
    }

    for worker in workers {
        let _ = worker.join();
    }
    progress.finish_all();
    Ok(())
}

fn run_listen(channel: u16, buffers: Option<u64>) -> Result<(), Box<dyn Error>> {
    let subscriber = Subscriber::connect(channel)?;
    let mut received = 0u64;
    loop {
        let samples = subscriber.recv_samples()?;
        received += 1;
        let (min, max) = samples
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &s| {
                (lo.min(s), hi.max(s))
            });
        info!(
            "channel {}: buffer {} ({} samples, min {:.4}, max {:.4})",
            channel,
            received,
            samples.len(),
            min,
            max
        );
        if let Some(n) = buffers {
            if received >= n {
                break;
            }
        }
    }
    Ok(())
}

fn run_dump(
    output: &str,
    frequency: f32,
    duration: f32,
    sample_rate: u32,
    waveform: Waveform,
) -> Result<(), Box<dyn Error>> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    let mut writer = hound::WavWriter::create(output, spec)?;

    let mut generator = ToneGenerator::new(waveform, frequency, sample_rate);
    let total_samples = (duration * sample_rate as f32) as usize;
    for sample in generator.generate(total_samples) {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;

    info!("wrote {} samples to {}", total_samples, output);
    Ok(())
}
