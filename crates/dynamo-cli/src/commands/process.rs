//! File-based processing command.

use super::common::{apply_assignment, load_preset};
use anyhow::Context;
use clap::Args;
use dynamo_config::{EffectChain, EffectConfig, Preset, build_processor, validate_preset};
use dynamo_core::{MeterBallistics, Metered, Stereo, StereoProcessor, linear_to_db};
use dynamo_io::{BitDepth, read_wav_stereo, write_wav_stereo};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use tracing::{debug, info, trace};

#[derive(Args)]
pub struct ProcessArgs {
    /// Input WAV file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output WAV file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Unit to append to the chain (repeatable; prefix with ! to bypass)
    #[arg(short, long, value_name = "EFFECT")]
    effect: Vec<String>,

    /// Parameter as [effect:]key=value (e.g. "threshold=-18dB", "gain:gain=-3dB")
    #[arg(long, value_name = "ASSIGNMENT")]
    param: Vec<String>,

    /// Preset file or factory preset name; --effect units are appended to it
    #[arg(short, long)]
    preset: Option<String>,

    /// Oversampling mode (disable, fir_2x_lq ... fir_8x_hq)
    #[arg(short, long)]
    oversampling: Option<String>,

    /// Host tempo in BPM for tempo-synced units
    #[arg(short, long)]
    tempo: Option<f32>,

    /// Seconds of silence processed after the input, for echo tails
    #[arg(long, default_value = "0")]
    tail: f32,

    /// Meter refresh rate in Hz
    #[arg(long, default_value = "30")]
    meter_rate: f32,

    /// Output bit depth (16, 24, or 32)
    #[arg(long, default_value = "32")]
    bit_depth: u16,
}

pub fn run(args: ProcessArgs) -> anyhow::Result<()> {
    let preset = assemble_preset(&args)?;
    let depth = BitDepth::from_bits(args.bit_depth)?;
    anyhow::ensure!(
        args.tail.is_finite() && args.tail >= 0.0,
        "--tail must be a non-negative number of seconds"
    );
    anyhow::ensure!(
        args.meter_rate.is_finite() && args.meter_rate > 0.0,
        "--meter-rate must be positive"
    );

    info!(path = %args.input.display(), "reading");
    let (mut frames, spec) = read_wav_stereo(&args.input)?;
    let sample_rate = spec.sample_rate as f32;
    info!(
        frames = frames.len(),
        sample_rate = spec.sample_rate,
        channels = spec.channels,
        seconds = %format!("{:.2}", frames.len() as f32 / sample_rate),
        "loaded"
    );

    let mut processor = build_processor(&preset, sample_rate)?;
    let latency = processor.latency_samples();
    info!(
        chain = %processor.inner().effect_types().join(" > "),
        oversampling = %processor.mode(),
        latency,
        "processing"
    );

    let input_stats = Stats::measure(&frames);
    let n_out = frames.len() + (args.tail * sample_rate).round() as usize;
    frames.resize(n_out + latency, Stereo::ZERO);

    let pb = ProgressBar::new(frames.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("##-"),
    );

    // One block per meter refresh, as a display-driven host would poll
    let block = ((sample_rate / args.meter_rate).round() as usize).max(1);
    let mut meters = MeterMonitor::new(processor.inner(), args.meter_rate);
    for chunk in frames.chunks_mut(block) {
        processor.process_block(chunk);
        meters.poll(processor.inner_mut());
        pb.inc(chunk.len() as u64);
    }
    pb.finish_and_clear();

    // Drop the oversampler delay so output lines up with input
    frames.drain(..latency);
    debug!(latency, frames = frames.len(), "latency compensated");

    let output_stats = Stats::measure(&frames);
    println!("Stats:");
    println!("  Input:  {input_stats}");
    println!("  Output: {output_stats}");
    meters.report();

    info!(path = %args.output.display(), bits = depth.bits(), "writing");
    write_wav_stereo(&args.output, &frames, spec.sample_rate, depth)?;
    info!("done");
    Ok(())
}

/// Combine the preset and command-line units, parameters and overrides.
fn assemble_preset(args: &ProcessArgs) -> anyhow::Result<Preset> {
    let mut preset = match &args.preset {
        Some(name) => load_preset(name)?,
        None => Preset::new("command line"),
    };
    for effect in &args.effect {
        preset.effects.push(EffectConfig::new(effect.as_str()));
    }
    if preset.is_empty() {
        anyhow::bail!("no units to process; use --effect or --preset");
    }
    for assignment in &args.param {
        apply_assignment(&mut preset, assignment)?;
    }
    if let Some(mode) = &args.oversampling {
        preset.oversampling.clone_from(mode);
    }
    if let Some(bpm) = args.tempo {
        preset.tempo = Some(bpm);
    }

    validate_preset(&preset).context("invalid processing setup")?;
    Ok(preset)
}

/// Peak and RMS of a buffer, over both channels.
struct Stats {
    peak: f32,
    rms: f32,
}

impl Stats {
    fn measure(frames: &[Stereo<f32>]) -> Self {
        if frames.is_empty() {
            return Self { peak: 0.0, rms: 0.0 };
        }
        let peak = frames
            .iter()
            .map(|f| f.l.abs().max(f.r.abs()))
            .fold(0.0, f32::max);
        let sum: f64 = frames
            .iter()
            .map(|f| f64::from(f.l * f.l + f.r * f.r))
            .sum();
        let rms = (sum / (2 * frames.len()) as f64).sqrt() as f32;
        Self { peak, rms }
    }
}

impl std::fmt::Display for Stats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "RMS {:.1} dB, Peak {:.1} dB",
            linear_to_db(self.rms),
            linear_to_db(self.peak)
        )
    }
}

/// Display-rate meter polling for every unit in a chain.
struct MeterMonitor {
    tracks: Vec<MeterTrack>,
}

struct MeterTrack {
    unit: usize,
    meter: usize,
    label: String,
    inverted: bool,
    ballistics: MeterBallistics,
    extreme: f32,
}

impl MeterMonitor {
    const MIN_DB: f32 = -60.0;
    const MAX_DB: f32 = 0.0;
    const DOTS: usize = 20;

    fn new(chain: &EffectChain, refresh_hz: f32) -> Self {
        let mut tracks = Vec::new();
        for unit in 0..chain.len() {
            let Some(effect) = chain.get(unit) else {
                continue;
            };
            for meter in 0..effect.meter_count() {
                let Some(spec) = effect.meter_spec(meter) else {
                    continue;
                };
                let mut ballistics = MeterBallistics::new(Self::MIN_DB, Self::MAX_DB, Self::DOTS);
                ballistics.set_inverted(spec.inverted);
                ballistics.set_decay(1.5, refresh_hz);
                ballistics.set_peak_hold(1.0, refresh_hz);
                tracks.push(MeterTrack {
                    unit,
                    meter,
                    label: format!("{}.{}", effect.kind().id(), spec.label),
                    inverted: spec.inverted,
                    ballistics,
                    extreme: spec.rest_value(),
                });
            }
        }
        Self { tracks }
    }

    /// Drain every meter once and advance its ballistics.
    fn poll(&mut self, chain: &mut EffectChain) {
        for track in &mut self.tracks {
            let Some(effect) = chain.get_mut(track.unit) else {
                continue;
            };
            let level = effect.get_and_reset_peak_level(track.meter);
            let lin = if track.inverted {
                level.l.abs().min(level.r.abs())
            } else {
                level.l.abs().max(level.r.abs())
            };
            track.ballistics.refresh(lin);
            track.extreme = if track.inverted {
                track.extreme.min(lin)
            } else {
                track.extreme.max(lin)
            };
            trace!(
                meter = %track.label,
                level_db = track.ballistics.level_db(),
                hold_db = track.ballistics.hold_db(),
                dots = track.ballistics.active_dots(),
                "meter"
            );
        }
    }

    fn report(&self) {
        if self.tracks.is_empty() {
            return;
        }
        println!("Meters:");
        for track in &self.tracks {
            let what = if track.inverted { "max reduction" } else { "peak" };
            println!(
                "  {:18} {:14} {:7.1} dB",
                track.label,
                what,
                linear_to_db(track.extreme)
            );
        }
    }
}
