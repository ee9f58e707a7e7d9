//! Builds a ROA from a configuration file.

use std::{env, process};
use std::path::PathBuf;
use log::error;
use rpki_roa::format::{self, Format};


fn main() {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info")
    ).init();

    let mut args = env::args().skip(1);
    let (conf, output) = match (args.next(), args.next()) {
        (Some(conf), Some(output)) => (PathBuf::from(conf), output),
        _ => {
            println!("Usage: mkroa <conf-file> <output> [der|pem]");
            process::exit(1)
        }
    };
    let format = match args.next().map(|arg| arg.parse::<Format>()) {
        None => Format::Der,
        Some(Ok(Format::Conf)) => {
            error!("Cannot store a ROA as configuration");
            process::exit(1)
        }
        Some(Ok(format)) => format,
        Some(Err(err)) => {
            error!("{}", err);
            process::exit(1)
        }
    };

    let roa = match format::load(&conf, Format::Conf, true) {
        Ok(roa) => roa,
        Err(err) => {
            error!("Can’t build ROA from {}: {}", conf.display(), err);
            process::exit(1)
        }
    };
    if let Err(err) = format::store(&roa, &output, format) {
        error!("Can’t write {}: {}", output, err);
        process::exit(1)
    }
}
