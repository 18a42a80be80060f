use std::io::{self, BufRead, Write};
use std::process;

use clap::{Arg, ArgAction, ArgMatches, Command};
use log::debug;
use thiserror::Error;

use h02_protocol::{H02Error, LocationRecord, PacketDecoder};

mod input;

use input::InputError;

const JSON_ARG_ID: &str = "json";
const TRANSMISSIONS_ARG_ID: &str = "transmissions";

#[derive(Debug, Error)]
enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("bad input: {0}")]
    Input(#[from] InputError),

    #[error("{0}")]
    Decode(#[from] H02Error),

    #[error("JSON output failed: {0}")]
    Json(#[from] serde_json::Error),
}

fn cli() -> Command {
    Command::new(clap::crate_name!())
        .version(clap::crate_version!())
        .about("Decodes H02 tracker transmissions")
        .arg(
            Arg::new(JSON_ARG_ID)
                .long("json")
                .action(ArgAction::SetTrue)
                .help("Print each record as JSON"),
        )
        .arg(
            Arg::new(TRANSMISSIONS_ARG_ID)
                .num_args(0..)
                .value_name("TRANSMISSION")
                .help(
                    "Text frames as-is (`*HQ,...#`), binary frames as a hex dump (`24 41 06 ...`). \
                     Read one per line from stdin when none are given",
                ),
        )
}

fn decode_line(decoder: &PacketDecoder, line: &str) -> Result<LocationRecord, CliError> {
    let raw = input::parse_line(line)?;
    Ok(decoder.decode(&raw)?)
}

fn render(record: &LocationRecord, json: bool) -> Result<String, CliError> {
    if json {
        Ok(serde_json::to_string(record)?)
    } else {
        Ok(record.to_string())
    }
}

/// Decode every line, printing records to `out` and failures to `err`.
///
/// A failed line does not stop the run. Returns `false` if any line failed.
fn decode_all<I, S>(
    decoder: &PacketDecoder,
    lines: I,
    json: bool,
    out: &mut impl Write,
    err: &mut impl Write,
) -> Result<bool, CliError>
where
    I: IntoIterator<Item = io::Result<S>>,
    S: AsRef<str>,
{
    let mut all_ok = true;
    for line in lines {
        let line = line?;
        let line = line.as_ref();
        if line.trim().is_empty() {
            continue;
        }
        match decode_line(decoder, line).and_then(|record| render(&record, json)) {
            Ok(output) => writeln!(out, "{output}")?,
            Err(e) => {
                debug!("failed to decode {line:?}");
                writeln!(err, "error: {e}")?;
                all_ok = false;
            }
        }
    }
    Ok(all_ok)
}

fn run(matches: &ArgMatches) -> Result<bool, CliError> {
    let decoder = PacketDecoder::default();
    let json = matches.get_flag(JSON_ARG_ID);
    let mut out = io::stdout().lock();
    let mut err = io::stderr().lock();

    match matches.get_many::<String>(TRANSMISSIONS_ARG_ID) {
        Some(args) => decode_all(&decoder, args.map(Ok), json, &mut out, &mut err),
        None => {
            debug!("reading transmissions from stdin");
            decode_all(&decoder, io::stdin().lock().lines(), json, &mut out, &mut err)
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let matches = cli().get_matches();
    match run(&matches) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}
