//! pcb-easy - command line front-end for the pcb_easy helpers

use anyhow::Context;
use pcb_easy::{
    config::{Action, Config, Unit},
    demo::demo_board,
    error::Result,
    geometry::{arc_angle, arc_start, rotate},
    layers::standard_layers,
    layerset::{decode, encode},
    units::{inch_to_mm, internal_to_mm, mm_to_inch, try_mm_to_internal, Length},
};
use tracing::{debug, error, info};

fn convert(from: Unit, to: Unit, value: &str) -> Result<String> {
    if from == Unit::Iu {
        let iu: i64 = value
            .trim()
            .parse()
            .with_context(|| format!("Internal units must be integers: {}", value))?;
        let mm = internal_to_mm(iu);
        return Ok(match to {
            Unit::Iu => iu.to_string(),
            Unit::Mm => mm.to_string(),
            Unit::Inch => mm_to_inch(&mm).to_string(),
        });
    }

    let length = Length::parse(value)?;
    let mm = match from {
        Unit::Inch => inch_to_mm(&length),
        _ => length,
    };
    Ok(match to {
        Unit::Mm => mm.to_string(),
        Unit::Inch => mm_to_inch(&mm).to_string(),
        Unit::Iu => match mm {
            Length::Scalar(v) => try_mm_to_internal(v)?.to_string(),
            Length::List(_) => anyhow::bail!("Only single values convert to internal units"),
        },
    })
}

fn run(config: &Config) -> Result<()> {
    match &config.action {
        Action::Convert { from, to, values } => {
            for value in values {
                println!("{}", convert(*from, *to, value)?);
            }
        }
        Action::Rotate { point, angle } => {
            let p = rotate(*point, *angle);
            println!("{},{}", p.x, p.y);
        }
        Action::Arc {
            center,
            radius,
            start,
            stop,
        } => {
            let p = arc_start(*center, *radius, *start);
            println!("start: {},{}", p.x, p.y);
            println!("angle: {} (tenths of a degree)", arc_angle(*start, *stop));
        }
        Action::LayersList => {
            for (index, name) in standard_layers().iter() {
                println!("{:>2} {}", index, name);
            }
        }
        Action::LayersEncode { layers } => {
            // Numeric arguments are layer indices
            let refs: Vec<pcb_easy::LayerRef> = layers
                .iter()
                .map(|l| match l.parse::<usize>() {
                    Ok(index) => index.into(),
                    Err(_) => l.into(),
                })
                .collect();
            println!("{}", encode(refs)?);
        }
        Action::LayersDecode { hex } => {
            let names = decode(hex).with_context(|| format!("Failed to decode layer set {}", hex))?;
            println!("{}", names.join(" "));
        }
        Action::Demo => {
            let board = demo_board()?;
            for module in board.modules() {
                println!(
                    "module {} at {:?}: {} pads, {} graphics",
                    module.footprint_id(),
                    module.position().to_mm(),
                    module.pads().count(),
                    module.graphics().count()
                );
            }
            println!(
                "{} tracks, {} vias, {} drawings",
                board.tracks().len(),
                board.vias().len(),
                board.drawings().len()
            );
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    // Parse configuration and initialize logging
    let config = Config::from_args().unwrap_or_else(|e| {
        eprintln!("Configuration error: {}", e);
        std::process::exit(1);
    });

    debug!("Running {:?}", config.action);

    match run(&config) {
        Ok(()) => {
            info!("Done");
            Ok(())
        }
        Err(e) => {
            error!("Command failed: {:#}", e);
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_between_units() {
        assert_eq!(convert(Unit::Mm, Unit::Iu, "1.5").unwrap(), "1500000");
        assert_eq!(convert(Unit::Iu, Unit::Mm, "-250000").unwrap(), "-0.25");
        assert_eq!(convert(Unit::Iu, Unit::Inch, "25400000").unwrap(), "1");
        assert_eq!(convert(Unit::Iu, Unit::Iu, "42").unwrap(), "42");
        assert_eq!(convert(Unit::Inch, Unit::Mm, "[1, [2]]").unwrap(), "[25.4, [50.8]]");
        assert_eq!(convert(Unit::Inch, Unit::Iu, "0.5").unwrap(), "12700000");
    }

    #[test]
    fn test_convert_rejects_bad_input() {
        let err = convert(Unit::Mm, Unit::Iu, "[1, 2]").unwrap_err();
        assert!(err.to_string().contains("Only single values"));

        assert!(convert(Unit::Iu, Unit::Mm, "1.5").is_err());
        assert!(convert(Unit::Mm, Unit::Iu, "nan").is_err());
        assert!(convert(Unit::Mm, Unit::Iu, "1e13").is_err());
        assert!(convert(Unit::Mm, Unit::Inch, "[1, abc]").is_err());
    }
}
