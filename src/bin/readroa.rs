//! Prints the content of a ROA.

use std::{env, process};
use log::error;
use rpki_roa::format::{self, Format};
use rpki_roa::roa::RoaObject;


fn main() {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("warn")
    ).init();

    let mut args = env::args().skip(1);
    let (format, path) = match (args.next(), args.next()) {
        (Some(format), Some(path)) => (format, path),
        _ => {
            println!("Usage: readroa <der|pem|conf> <path> [--validate]");
            process::exit(1)
        }
    };
    let validate = match args.next() {
        Some(ref arg) if arg == "--validate" => true,
        None => false,
        Some(arg) => {
            error!("Unexpected argument '{}'", arg);
            process::exit(1)
        }
    };
    let format: Format = match format.parse() {
        Ok(format) => format,
        Err(err) => {
            error!("{}", err);
            process::exit(1)
        }
    };

    match format::load(&path, format, validate) {
        Ok(roa) => print_roa(&roa),
        Err(err) => {
            error!("Can’t load ROA from {}: {}", path, err);
            process::exit(1)
        }
    }
}

fn print_roa(roa: &RoaObject) {
    println!("Version: {}", roa.version());
    println!("AS: AS{}", roa.attestation().as_id());
    for (family, entry) in roa.attestation().iter() {
        println!("{}: {}", family, entry);
    }
    if let Some(cert) = roa.cert() {
        println!("EE certificate key: {}", cert.subject_key_identifier());
    }
    match roa.signer_info() {
        Some(info) => println!("Signed by: {}", info.sid()),
        None => println!("Unsigned"),
    }
}
