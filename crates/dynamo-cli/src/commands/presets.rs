//! Preset listing and validation command.

use super::common::load_preset;
use anyhow::Context;
use clap::Args;
use dynamo_config::{factory_presets, validate_preset};
use dynamo_config::factory_presets::factory_preset_names;

#[derive(Args)]
pub struct PresetsArgs {
    /// Preset file or factory preset name to validate and print
    #[arg(value_name = "PRESET")]
    preset: Option<String>,

    /// Print the preset as TOML instead of a summary
    #[arg(long)]
    toml: bool,
}

pub fn run(args: PresetsArgs) -> anyhow::Result<()> {
    let Some(name) = &args.preset else {
        list_factory();
        return Ok(());
    };

    let preset = load_preset(name)?;
    validate_preset(&preset).with_context(|| format!("preset '{}' is invalid", preset.name))?;

    if args.toml {
        print!("{}", preset.to_toml()?);
        return Ok(());
    }

    println!("{}", preset.name);
    println!("{}", "=".repeat(preset.name.len()));
    if let Some(description) = &preset.description {
        println!();
        println!("{description}");
    }
    println!();
    println!("  Sample rate:   {} Hz", preset.sample_rate);
    println!("  Oversampling:  {}", preset.oversampling_mode()?);
    match preset.tempo {
        Some(bpm) => println!("  Tempo:         {bpm} BPM"),
        None => println!("  Tempo:         (none)"),
    }
    println!();
    println!("Chain:");
    for (i, effect) in preset.iter().enumerate() {
        println!("  {}. {}", i + 1, effect.display_type());
        for (key, value) in &effect.params {
            println!("       {key} = {value}");
        }
    }
    println!();
    println!("Preset is valid.");
    Ok(())
}

fn list_factory() {
    println!("Factory Presets");
    println!("===============");
    println!();
    for (id, preset) in factory_preset_names().into_iter().zip(factory_presets()) {
        println!(
            "  {:14}  {:16}  {}",
            id,
            preset.effect_types().join(" > "),
            preset.description.as_deref().unwrap_or("")
        );
    }
    println!();
    println!("Use 'dynamo process in.wav out.wav --preset <name>' to apply one.");
}
