use std::path::Path;

use anyhow::{bail, Result};
use mapcmp::app::{load_config, run_compare, run_distance, CompareConfig, DistanceConfig};

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let (command, config) = match (args.next(), args.next()) {
        (Some(c), Some(p)) => (c, p),
        _ => bail!("usage: mapcmp <compare|distance> <config.json>"),
    };

    match command.as_str() {
        "compare" => {
            let cfg: CompareConfig = load_config(Path::new(&config))?;
            mapcmp::logger::init(cfg.log_level.as_deref());
            let result = run_compare(cfg)?;
            println!(
                "fuzzy kappa: {}{}",
                result.fuzzy_kappa,
                if result.comparable {
                    ""
                } else {
                    " (degenerate comparison)"
                }
            );
            Ok(())
        }
        "distance" => {
            let cfg: DistanceConfig = load_config(Path::new(&config))?;
            mapcmp::logger::init(cfg.log_level.as_deref());
            run_distance(cfg)
        }
        other => bail!("unknown command '{other}', expected compare|distance"),
    }
}
