//! Configuration management for pcb_easy
//!
//! This module handles CLI argument parsing and logging setup.

use crate::geometry::Point;
use anyhow::{anyhow, Result};
use clap::builder::styling;
use clap::{value_parser, Arg, ArgMatches, ColorChoice, Command};
use std::str::FromStr;
use tracing::info;

/// Length units accepted by `convert`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Mm,
    Inch,
    /// Internal units (nanometres)
    Iu,
}

impl FromStr for Unit {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "mm" => Ok(Unit::Mm),
            "inch" | "in" => Ok(Unit::Inch),
            "iu" => Ok(Unit::Iu),
            other => Err(anyhow!("Unknown unit: {}", other)),
        }
    }
}

/// The action selected on the command line
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Convert {
        from: Unit,
        to: Unit,
        values: Vec<String>,
    },
    Rotate {
        point: Point,
        angle: f64,
    },
    Arc {
        center: Point,
        radius: f64,
        start: f64,
        stop: f64,
    },
    LayersList,
    LayersEncode {
        layers: Vec<String>,
    },
    LayersDecode {
        hex: String,
    },
    Demo,
}

/// Build the CLI command
pub fn build_cli() -> Command {
    let styles = styling::Styles::styled()
        .header(styling::AnsiColor::Green.on_default() | styling::Effects::BOLD)
        .usage(styling::AnsiColor::Green.on_default() | styling::Effects::BOLD)
        .literal(styling::AnsiColor::Blue.on_default() | styling::Effects::BOLD)
        .placeholder(styling::AnsiColor::Cyan.on_default());

    let unit_arg = |name: &'static str, help: &'static str| {
        Arg::new(name)
            .long(name)
            .help(help)
            .value_parser(["mm", "inch", "iu"])
            .required(true)
    };

    Command::new("pcb-easy")
        .about("pcb-easy - Unit, layer and board helpers for PCB design")
        .color(ColorChoice::Auto)
        .styles(styles)
        .subcommand_required(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging output")
                .global(true)
                .action(clap::ArgAction::SetTrue),
        )
        .subcommand(
            Command::new("convert")
                .about("Convert lengths between mm, inch and internal units")
                .arg(unit_arg("from", "Unit of the input values"))
                .arg(unit_arg("to", "Unit of the output values"))
                .arg(
                    Arg::new("values")
                        .help("Values, or nested lists such as [[1,2],[3,4]] for mm/inch")
                        .num_args(1..)
                        .required(true)
                        .allow_negative_numbers(true),
                ),
        )
        .subcommand(
            Command::new("rotate")
                .about("Rotate a point counter-clockwise around the origin")
                .arg(
                    Arg::new("angle")
                        .short('a')
                        .long("angle")
                        .help("Rotation in degrees")
                        .value_parser(value_parser!(f64))
                        .allow_negative_numbers(true)
                        .required(true),
                )
                .arg(Arg::new("point").help("Point as x,y").required(true)),
        )
        .subcommand(
            Command::new("arc")
                .about("Compute the start point and included angle of an arc")
                .arg(
                    Arg::new("center")
                        .short('c')
                        .long("center")
                        .help("Arc center as x,y")
                        .default_value("0,0"),
                )
                .arg(
                    Arg::new("radius")
                        .short('r')
                        .long("radius")
                        .value_parser(value_parser!(f64))
                        .required(true),
                )
                .arg(
                    Arg::new("start")
                        .long("start")
                        .help("Start angle in degrees, 0 pointing up")
                        .value_parser(value_parser!(f64))
                        .allow_negative_numbers(true)
                        .required(true),
                )
                .arg(
                    Arg::new("stop")
                        .long("stop")
                        .help("Stop angle in degrees")
                        .value_parser(value_parser!(f64))
                        .allow_negative_numbers(true)
                        .required(true),
                ),
        )
        .subcommand(
            Command::new("layers")
                .about("Layer table and layer-set hex codec")
                .subcommand_required(true)
                .subcommand(Command::new("list").about("List the standard layer table"))
                .subcommand(
                    Command::new("encode")
                        .about("Encode layer names or indices as a hex layer set")
                        .arg(Arg::new("layers").num_args(0..)),
                )
                .subcommand(
                    Command::new("decode")
                        .about("Decode a hex layer set into layer names")
                        .arg(Arg::new("hex").required(true)),
                ),
        )
        .subcommand(Command::new("demo").about("Build the demo board and print a summary"))
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Selected action
    pub action: Action,

    /// Enable verbose logging
    pub verbose: bool,
}

impl Config {
    /// Parse process arguments and set up logging
    pub fn from_args() -> Result<Self> {
        let config = Self::from_matches(&build_cli().get_matches())?;

        // RUST_LOG takes precedence over the verbose flag
        let default_level = if config.verbose { "debug" } else { "warn" };
        let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

        tracing_subscriber::fmt().with_env_filter(env_filter).init();

        if config.verbose {
            info!("Configuration: {:?}", config);
        }

        Ok(config)
    }

    /// Build a configuration from already parsed matches
    pub fn from_matches(matches: &ArgMatches) -> Result<Self> {
        let verbose = matches.get_flag("verbose");

        let action = match matches.subcommand() {
            Some(("convert", sub)) => Action::Convert {
                from: required_str(sub, "from")?.parse()?,
                to: required_str(sub, "to")?.parse()?,
                values: sub
                    .get_many::<String>("values")
                    .map(|v| v.cloned().collect())
                    .unwrap_or_default(),
            },
            Some(("rotate", sub)) => Action::Rotate {
                point: Point::parse(required_str(sub, "point")?)?,
                angle: required_f64(sub, "angle")?,
            },
            Some(("arc", sub)) => Action::Arc {
                center: Point::parse(required_str(sub, "center")?)?,
                radius: required_f64(sub, "radius")?,
                start: required_f64(sub, "start")?,
                stop: required_f64(sub, "stop")?,
            },
            Some(("layers", sub)) => match sub.subcommand() {
                Some(("list", _)) => Action::LayersList,
                Some(("encode", enc)) => Action::LayersEncode {
                    layers: enc
                        .get_many::<String>("layers")
                        .map(|v| v.cloned().collect())
                        .unwrap_or_default(),
                },
                Some(("decode", dec)) => Action::LayersDecode {
                    hex: required_str(dec, "hex")?.to_string(),
                },
                _ => return Err(anyhow!("A layers subcommand is required")),
            },
            Some(("demo", _)) => Action::Demo,
            _ => return Err(anyhow!("A subcommand is required")),
        };

        Ok(Config { action, verbose })
    }
}

fn required_str<'a>(matches: &'a ArgMatches, name: &str) -> Result<&'a str> {
    matches
        .get_one::<String>(name)
        .map(String::as_str)
        .ok_or_else(|| anyhow!("Missing argument: {}", name))
}

fn required_f64(matches: &ArgMatches, name: &str) -> Result<f64> {
    matches
        .get_one::<f64>(name)
        .copied()
        .ok_or_else(|| anyhow!("Missing argument: {}", name))
}
