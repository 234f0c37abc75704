//! Unit listing and parameter table command.

#![allow(clippy::print_literal)] // Table headers use literal strings intentionally

use super::common::format_value;
use clap::Args;
use dynamo_core::{Metered, ParamKind, ParameterInfo};
use dynamo_effects::EffectKind;

#[derive(Args)]
pub struct InfoArgs {
    /// Show the parameter table of one unit
    #[arg(value_name = "EFFECT")]
    effect: Option<String>,
}

pub fn run(args: InfoArgs) -> anyhow::Result<()> {
    let Some(name) = &args.effect else {
        list_units();
        return Ok(());
    };

    let kind = EffectKind::from_id(name).ok_or_else(|| {
        anyhow::anyhow!(
            "unknown effect '{}' (available: {})",
            name,
            EffectKind::ALL.map(|k| k.id()).join(", ")
        )
    })?;
    show_unit(kind);
    Ok(())
}

fn list_units() {
    println!("Available Units");
    println!("===============");
    println!();
    for kind in EffectKind::ALL {
        println!("  {:12}  {:12}  {}", kind.id(), kind.category().name(), kind.description());
    }
    println!();
    println!("Use 'dynamo info <effect>' for the parameter table.");
}

fn show_unit(kind: EffectKind) {
    let unit = kind.create(48000.0);

    println!("{}", kind.name());
    println!("{}", "=".repeat(kind.name().len()));
    println!();
    println!("{}", kind.description());
    println!();

    println!("Parameters:");
    println!();
    println!("  {:14}  {:18}  {:12}  {}", "Name", "ID", "Default", "Range");
    println!("  {:14}  {:18}  {:12}  {}", "----", "--", "-------", "-----");
    for i in 0..unit.param_count() {
        let Some(desc) = unit.param_info(i) else {
            continue;
        };
        let range = match desc.kind {
            ParamKind::Toggle => "on | off".to_string(),
            ParamKind::Dropdown(options) => options.join(" | "),
            ParamKind::Knob => format!(
                "{} to {}",
                format_value(&desc, desc.min),
                format_value(&desc, desc.max)
            ),
        };
        println!(
            "  {:14}  {:18}  {:12}  {}",
            desc.name,
            desc.string_id,
            format_value(&desc, desc.default),
            range
        );
    }

    println!();
    println!("Meters:");
    for i in 0..unit.meter_count() {
        if let Some(spec) = unit.meter_spec(i) {
            let kind_label = if spec.inverted { "gain reduction" } else { "peak" };
            println!("  {:6}  {}", spec.label, kind_label);
        }
    }

    let examples: Vec<String> = (0..unit.param_count().min(2))
        .filter_map(|i| unit.param_info(i))
        .map(|desc| format!("{}={}", desc.name.to_lowercase(), desc.default))
        .collect();
    println!();
    println!("Example usage:");
    println!();
    println!(
        "  dynamo process input.wav output.wav --effect {} --param {}",
        kind.id(),
        examples.join(" --param ")
    );
}
