use std::env;
use std::io::{self, BufRead, Write};
use std::sync::Arc;

use getopts::Options;

use patternzone::dns::context::{PatternConfig, PatternContext, DEFAULT_ZONES_FILE};
use patternzone::dns::query_type::QueryType;

fn print_usage(program: &str, opts: Options) {
    let brief = format!("Usage: {} [options] [NAME...]", program);
    print!("{}", opts.usage(&brief));
}

/// Resolve names against a zones file. Names come from the command line or,
/// when none are given, one per stdin line as `NAME [TYPE]`.
fn main() {
    let args: Vec<String> = env::args().collect();
    let program = args[0].clone();

    let mut opts = Options::new();
    opts.optflag("h", "help", "print this help menu");
    opts.optopt(
        "f",
        "config",
        "TOML configuration file; command line options override it",
        "FILE",
    );
    opts.optopt(
        "c",
        "zones-file",
        &format!("The zones file to load (default {})", DEFAULT_ZONES_FILE),
        "FILE",
    );
    opts.optopt(
        "t",
        "type",
        "Record type for names given on the command line (default A)",
        "TYPE",
    );
    opts.optopt(
        "i",
        "reload-interval",
        "Reload the zones file every SECONDS",
        "SECONDS",
    );
    opts.optflag("v", "verbose", "enable debug logging");

    let matches = match opts.parse(&args[1..]) {
        Ok(m) => m,
        Err(f) => {
            eprintln!("{}", f);
            print_usage(&program, opts);
            std::process::exit(2);
        }
    };

    if matches.opt_present("h") {
        print_usage(&program, opts);
        return;
    }

    let level = if matches.opt_present("v") {
        log::Level::Debug
    } else {
        log::Level::Info
    };
    if let Err(e) = simple_logger::init_with_level(level) {
        eprintln!("Failed to initialize logger: {}", e);
    }

    let mut config = match matches.opt_str("f") {
        Some(path) => match PatternConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("Failed to read configuration {}: {}", path, e);
                std::process::exit(2);
            }
        },
        None => PatternConfig::default(),
    };

    if let Some(path) = matches.opt_str("c") {
        config.zones_file = Arc::from(path);
    }

    if let Some(secs) = matches.opt_str("i") {
        match secs.parse::<u64>() {
            Ok(secs) if secs > 0 => config.reload_interval_secs = Some(secs),
            _ => {
                log::error!("Invalid reload interval: {}", secs);
                std::process::exit(2);
            }
        }
    }

    let default_type = match matches.opt_str("t") {
        Some(t) => match t.parse::<QueryType>() {
            Ok(qtype) => qtype,
            Err(e) => {
                log::error!("{}", e);
                std::process::exit(2);
            }
        },
        None => QueryType::A,
    };

    let context = PatternContext::new(config);

    // Held until main returns; dropping it stops the reload thread
    let _reloader = match context.spawn_reloader() {
        Ok(reloader) => reloader,
        Err(e) => {
            log::error!("Failed to start reload thread: {}", e);
            None
        }
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if !matches.free.is_empty() {
        for name in &matches.free {
            print_answer(&mut out, &context, name, default_type);
        }
        return;
    }

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                log::error!("Failed to read from stdin: {}", e);
                break;
            }
        };

        let mut items = line.split_whitespace();
        let name = match items.next() {
            Some(name) => name,
            None => continue,
        };

        let qtype = match items.next().map(|t| t.parse::<QueryType>()) {
            Some(Ok(qtype)) => qtype,
            Some(Err(e)) => {
                log::warn!("{}", e);
                continue;
            }
            None => default_type,
        };

        print_answer(&mut out, &context, name, qtype);
    }
}

fn print_answer<W: Write>(out: &mut W, context: &PatternContext, name: &str, qtype: QueryType) {
    let answer = context.resolver.resolve(name, qtype);
    let result = match answer {
        Some(answer) => writeln!(out, "{}\t{}\t{}", name, qtype, answer),
        None => writeln!(out, "{}\t{}\t-", name, qtype),
    };

    if let Err(e) = result {
        log::error!("Failed to write answer: {}", e);
    }
}
