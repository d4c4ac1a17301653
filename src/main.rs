use std::ffi::CString;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use log::info;
use rustc_hash::FxHashMap;

use nss_dontstalkme::error::LookupError;
use nss_dontstalkme::filter::{Pattern, stalkers};
use nss_dontstalkme::resolver::Resolver;
use nss_dontstalkme::response::{HostRecord, TupleList};

#[derive(Parser)]
#[command(name = "dontstalkme")]
#[command(about = "Inspect the tracker blocklist and the answers it produces", long_about = None)]
struct Args {
    /// Log filter (error, warn, info, debug, trace)
    #[arg(short, long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Report whether each name is answered locally
    Check {
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// Run a lookup the way the NSS host would and print the answer
    Resolve {
        name: String,

        /// Entry point to emulate
        #[arg(short, long, value_enum, default_value_t = FamilyArg::Dual)]
        family: FamilyArg,

        /// Size of the scratch buffer handed to the lookup
        #[arg(short, long, default_value_t = 1024)]
        buffer: usize,
    },
    /// Print the compiled-in patterns
    List,
    /// Count blocklist hits in a file of host names, one per line
    Scan {
        /// Read from this file instead of stdin
        file: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum FamilyArg {
    /// gethostbyname_r (no family, answers IPv4)
    Unspec,
    /// gethostbyname2_r with AF_INET
    Inet,
    /// gethostbyname2_r with AF_INET6
    Inet6,
    /// gethostbyname4_r (IPv4 and IPv6)
    Dual,
}

fn pattern_kind(pattern: Pattern<'_>) -> &'static str {
    match pattern {
        Pattern::Suffix(_) => "suffix",
        Pattern::Exact(_) => "exact",
    }
}

fn check(names: &[String]) {
    for name in names {
        match stalkers().matching_pattern(name) {
            Some(pattern) => println!("{name}\tblocked\t{}", pattern.as_str()),
            None => println!("{name}\tallowed"),
        }
    }
}

fn print_failure(err: LookupError) {
    println!(
        "status={:?} errno={} h_errno={} ({err})",
        err.status(),
        err.errno(),
        err.h_errno()
    );
}

fn print_record(record: &HostRecord<'_>) {
    println!("name:    {}", record.name().to_string_lossy());
    println!("family:  {}", record.family());
    println!("aliases: {}", record.alias_count());
    for address in record.addresses() {
        println!("address: {address}");
    }
    println!("ttl:     {}", record.ttl());
    println!("bytes:   {}", record.written());
}

fn print_tuples(list: &TupleList<'_>) {
    println!("name:    {}", list.name().to_string_lossy());
    for tuple in list.iter() {
        if let Some(address) = tuple.address() {
            println!("address: {address} (scope {})", tuple.scopeid);
        }
    }
    println!("ttl:     {}", list.ttl());
    println!("bytes:   {}", list.written());
}

fn resolve(name: &str, family: FamilyArg, capacity: usize) -> Result<()> {
    let name = CString::new(name).context("host name contains a NUL byte")?;
    let resolver = Resolver::default();
    let mut buf = vec![0u8; capacity];

    info!("resolving {name:?} into a {capacity} byte buffer");

    let result = match family {
        FamilyArg::Dual => resolver
            .resolve_dual(&name, &mut buf)
            .map(|list| print_tuples(&list)),
        FamilyArg::Unspec => resolver
            .resolve_default(&name, &mut buf)
            .map(|record| print_record(&record)),
        FamilyArg::Inet => resolver
            .resolve_family(&name, libc::AF_INET, &mut buf)
            .map(|record| print_record(&record)),
        FamilyArg::Inet6 => resolver
            .resolve_family(&name, libc::AF_INET6, &mut buf)
            .map(|record| print_record(&record)),
    };

    if let Err(err) = result {
        print_failure(err);
    }
    Ok(())
}

fn list() {
    for pattern in stalkers().patterns() {
        println!("{}\t{}", pattern_kind(pattern), pattern.as_str());
    }
}

fn scan(reader: impl BufRead) -> Result<()> {
    let mut hits: FxHashMap<&'static str, u64> = FxHashMap::default();
    let mut total = 0u64;

    for line in reader.lines() {
        let line = line.context("failed to read host names")?;
        let name = line.trim();
        if name.is_empty() {
            continue;
        }
        total += 1;
        if let Some(pattern) = stalkers().matching_pattern(name) {
            *hits.entry(pattern.as_str()).or_default() += 1;
        }
    }

    let blocked: u64 = hits.values().sum();
    for pattern in stalkers().patterns() {
        let count = hits.get(pattern.as_str()).copied().unwrap_or(0);
        println!("{count}\t{}", pattern.as_str());
    }
    println!("[scan] names={total} blocked={blocked} allowed={}", total - blocked);
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&args.log_level))
        .init();

    match args.command {
        Command::Check { names } => check(&names),
        Command::Resolve {
            name,
            family,
            buffer,
        } => resolve(&name, family, buffer)?,
        Command::List => list(),
        Command::Scan { file } => match file {
            Some(path) => {
                let file = File::open(&path)
                    .with_context(|| format!("failed to open {}", path.display()))?;
                scan(BufReader::new(file))?
            }
            None => scan(io::stdin().lock())?,
        },
    }

    Ok(())
}
