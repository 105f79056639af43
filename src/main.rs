use crate::airport::{AirportDirectory, TimeResolver};
use crate::crew::RestSectors;
use crate::duty::{DutyInputs, InFlightRest, SplitDuty, StandbyType};
use crate::error::FtlError;
use crate::fdp::FdpCalculator;
use crate::tables::UkFtlTables;
use crate::time::Hours;
use chrono::{DateTime, NaiveDateTime, Utc};
use clap::Parser;
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::{Context, Editor, Helper, Highlighter, Hinter, Validator};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use tabled::settings::Style;
use tracing_subscriber::EnvFilter;

mod acclimatisation;
mod airport;
mod crew;
mod duty;
mod error;
mod fdp;
mod tables;
mod time;

type Calculator = FdpCalculator<UkFtlTables, AirportDirectory>;

#[derive(Parser)]
struct Args {
    /// Path to the JSON airport directory
    #[arg(short, long, value_name = "FILE", default_value = "data/airports.json")]
    airports: PathBuf,

    /// Path to a JSON duty scenario
    #[arg(short, long, value_name = "FILE")]
    duty: Option<PathBuf>,

    /// Print the evaluation and exit instead of starting the prompt
    #[arg(long)]
    eval: bool,

    /// With --eval, print the result as JSON
    #[arg(long, requires = "eval")]
    json: bool,
}

#[derive(Helper, Hinter, Highlighter, Validator)]
pub struct CompleteHelper {
    pub commands: Vec<String>,
}

impl Completer for CompleteHelper {
    type Candidate = Pair;

    fn complete(&self, line: &str, _pos: usize, _ctx: &Context<'_>) -> rustyline::Result<(usize, Vec<Pair>)> {
        let mut candidates = Vec::new();

        for cmd in &self.commands {
            if cmd.starts_with(line) {
                candidates.push(Pair {
                    display: cmd.clone(),
                    replacement: format!("{} ", cmd),
                });
            }
        }

        Ok((0, candidates))
    }
}

/// Either an RFC 3339 UTC instant or `YYYY-MM-DDTHH:MM@AIRPORT` in airport local time.
fn parse_instant(calc: &Calculator, value: &str) -> Result<DateTime<Utc>, FtlError> {
    match value.split_once('@') {
        Some((local, airport)) => {
            let local = NaiveDateTime::parse_from_str(local, "%Y-%m-%dT%H:%M")
                .map_err(|_| FtlError::InvalidTime(value.to_string()))?;
            calc.clock().utc_time(local, airport)
        }
        None => value
            .parse::<DateTime<Utc>>()
            .map_err(|_| FtlError::InvalidTime(value.to_string())),
    }
}

fn parse_number<N: FromStr>(field: &'static str, value: &str) -> Result<N, FtlError> {
    value.parse::<N>().map_err(|_| FtlError::InvalidValue {
        field,
        value: value.to_string(),
    })
}

fn apply_set(calc: &mut Calculator, field: &str, value: &str) -> Result<(), FtlError> {
    match field {
        "home" => calc.set_home_base(Arc::from(value)),
        "secondary" => calc.set_secondary_home_base((value != "none").then(|| Arc::from(value))),
        "location" => calc.set_report_location(Arc::from(value)),
        "report" => {
            let report = parse_instant(calc, value)?;
            calc.set_report(report);
        }
        "sectors" => calc.set_sectors(parse_number("sectors", value)?),
        "tz" => calc.set_timezone_difference(parse_number("timezone difference", value)?),
        "elapsed" => calc.set_elapsed_since_first_report(value.parse()?),
        "crew" => calc.set_crew_type(value.parse()?),
        "standby" => {
            let kind = value.parse::<StandbyType>()?;
            calc.set_standby_type(kind);
            calc.set_standby_enabled(kind != StandbyType::None);
        }
        "standby-start" => {
            let start = parse_instant(calc, value)?;
            calc.set_standby_start(start);
        }
        "duty-start" => {
            let start = parse_instant(calc, value)?;
            calc.set_airport_duty_start(start);
        }
        "contact" => {
            let contact = match value {
                "none" => None,
                _ => Some(parse_instant(calc, value)?),
            };
            calc.set_standby_contact(contact);
        }
        "block" => calc.set_estimated_block_time(value.parse()?),
        _ => {
            return Err(FtlError::InvalidValue {
                field: "field",
                value: field.to_string(),
            });
        }
    }
    Ok(())
}

/// `ifr <facility> <crew> [long] [three] [rest=HH:MM]`
fn apply_in_flight_rest(calc: &mut Calculator, args: &[&str]) -> Result<(), FtlError> {
    let (Some(facility), Some(crew)) = (args.first(), args.get(1)) else {
        println!("Usage: ifr <1|2|3> <1|2> [long] [three] [rest=HH:MM]");
        return Ok(());
    };
    let mut rest = InFlightRest {
        facility: facility.parse()?,
        additional_crew: crew.parse()?,
        long_flight: false,
        sectors: RestSectors::OneOrTwo,
        cabin_rest_available: Hours::ZERO,
    };
    for option in &args[2..] {
        match *option {
            "long" => rest.long_flight = true,
            "three" => rest.sectors = RestSectors::Three,
            other => match other.strip_prefix("rest=") {
                Some(hours) => rest.cabin_rest_available = hours.parse()?,
                None => {
                    return Err(FtlError::InvalidValue {
                        field: "in-flight rest option",
                        value: other.to_string(),
                    });
                }
            },
        }
    }
    calc.set_in_flight_rest(rest);
    Ok(())
}

/// `split <hours> <begin> <acc|suitable>`
fn apply_split_duty(calc: &mut Calculator, args: &[&str]) -> Result<(), FtlError> {
    let (Some(hours), Some(begin), Some(accommodation)) = (args.first(), args.get(1), args.get(2)) else {
        println!("Usage: split <hours> <begin> <acc|suitable>");
        return Ok(());
    };
    let split = SplitDuty {
        break_duration: hours.parse()?,
        break_begin: parse_instant(calc, begin)?,
        accommodation: accommodation.parse()?,
    };
    calc.set_split_duty(split);
    Ok(())
}

fn show(calc: &mut Calculator) {
    match calc.result() {
        Ok(result) => {
            let mut table = tabled::Table::new(result.breakdown());
            table.with(Style::rounded());
            table.with(tabled::settings::Alignment::left());
            println!("{}", table);
            println!("{}", result.acclimatisation.reason.dimmed());
            for warning in &result.warnings {
                println!("{} {}", "warning:".yellow().bold(), warning);
            }
        }
        Err(e) => println!("{} {}", "error:".red().bold(), e),
    }
}

fn show_inputs(inputs: &DutyInputs) {
    println!("  home base       {}", inputs.home_base);
    if let Some(secondary) = &inputs.secondary_home_base {
        println!("  secondary base  {}", secondary);
    }
    println!("  report          {} at {}", inputs.report.format("%Y-%m-%d %H:%MZ"), inputs.report_location);
    println!("  sectors         {}", inputs.sectors);
    println!("  tz difference   {}h, {} since first report", inputs.timezone_difference, inputs.elapsed_since_first_report);
    println!("  crew            {}", inputs.crew_type);
    println!("  standby         {:?}", inputs.standby.active());
    println!("  modifier        {}", inputs.modifier);
    println!("  block time      {}", inputs.estimated_block_time);
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("ftlcalc=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let directory = AirportDirectory::load_from_file(&args.airports.to_string_lossy())?;
    tracing::info!("Loaded airports from {}", args.airports.display());

    let inputs = match &args.duty {
        Some(path) => DutyInputs::load_from_file(&path.to_string_lossy())?,
        None => {
            let home = directory
                .airports()
                .first()
                .map(|a| a.code.clone())
                .ok_or_else(|| FtlError::InvalidValue {
                    field: "airports",
                    value: "empty directory".to_string(),
                })?;
            DutyInputs::new(home.clone(), home, Utc::now(), 2, Hours(2.0))
        }
    };

    let mut calc = FdpCalculator::new(inputs, UkFtlTables, directory);

    if args.eval {
        if args.json {
            println!("{}", serde_json::to_string_pretty(calc.result()?)?);
        } else {
            show(&mut calc);
        }
        return Ok(());
    }

    let config = rustyline::Config::builder()
        .history_ignore_space(true)
        .completion_type(rustyline::CompletionType::List)
        .build();

    let helper = CompleteHelper {
        commands: [
            "show", "inputs", "airports", "set", "ifr", "split", "extended", "clear", "help", "exit",
        ]
        .iter()
        .map(|c| c.to_string())
        .collect(),
    };

    let mut rl = Editor::with_config(config)?;
    rl.set_helper(Some(helper));

    loop {
        let readline = rl.readline(">> ");
        match readline {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() { continue; }

                rl.add_history_entry(trimmed)?;

                let parts: Vec<&str> = trimmed.split_whitespace().collect();
                let outcome = match parts[0] {
                    "show" => {
                        show(&mut calc);
                        Ok(())
                    }
                    "inputs" => {
                        show_inputs(calc.inputs());
                        Ok(())
                    }
                    "airports" => {
                        let mut table = tabled::Table::new(calc.clock().airports());
                        table.with(Style::rounded());
                        println!("{}", table);
                        Ok(())
                    }
                    "set" => {
                        if let (Some(field), Some(value)) = (parts.get(1), parts.get(2)) {
                            apply_set(&mut calc, field, value)
                        } else {
                            println!("Usage: set <field> <value>");
                            Ok(())
                        }
                    }
                    "ifr" => apply_in_flight_rest(&mut calc, &parts[1..]),
                    "split" => apply_split_duty(&mut calc, &parts[1..]),
                    "extended" => {
                        calc.set_extended_fdp();
                        Ok(())
                    }
                    "clear" => {
                        calc.clear_modifier();
                        Ok(())
                    }
                    "help" | "?" => {
                        println!("\nAvailable Commands:");
                        println!("  show                      - Evaluate the duty and show the FDP breakdown");
                        println!("  inputs                    - Show the current duty inputs");
                        println!("  airports                  - List known airports and their time zones");
                        println!("  set <field> <value>       - Change an input: home, secondary, location, report, sectors, tz,");
                        println!("                              elapsed, crew, standby, standby-start, duty-start, contact, block");
                        println!("  ifr <class> <crew> [opts] - In-flight rest: class 1-3, 1 or 2 additional crew, [long] [three] [rest=HH:MM]");
                        println!("  split <h> <begin> <acc>   - Split duty break of <h> hours from <begin>, acc or suitable accommodation");
                        println!("  extended                  - Use the extended FDP table");
                        println!("  clear                     - Remove the active FDP modifier");
                        println!("  help / ?                  - Show this help menu");
                        println!("  exit / quit               - Exit\n");
                        println!("  Times are RFC 3339 UTC (2026-01-15T07:00:00Z) or local (2026-01-15T07:00@LHR).\n");
                        Ok(())
                    }
                    "exit" | "quit" => break,
                    _ => {
                        println!("Unknown command: {}", parts[0]);
                        Ok(())
                    }
                };
                if let Err(e) = outcome {
                    println!("{} {}", "error:".red().bold(), e);
                }
            },
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            },
            Err(ReadlineError::Eof) => {
                println!("CTRL-D");
                break;
            },
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }
    Ok(())
}
