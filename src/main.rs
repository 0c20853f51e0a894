use clap::{Parser, Subcommand, ValueEnum};
use log::LevelFilter;
use versionprobe::{NullPolicy, VersionProbe};

/// CLI for reading versions of shared libraries
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// More logging (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Call `GetVersion` of each library and print the result
    Probe {
        /// What to do when `GetVersion` returns a null pointer
        #[arg(long, value_enum, default_value_t = OnNull::Fail)]
        on_null: OnNull,
        /// Library paths or names resolvable by the system loader
        #[arg(required = true)]
        libs: Vec<String>,
    },
    /// Only verify that each library can be loaded
    Check {
        #[arg(required = true)]
        libs: Vec<String>,
    },
    /// Print the platform specific file name for a library name
    Filename {
        name: String,
    },
}

#[derive(Copy, Clone, ValueEnum)]
enum OnNull {
    Fail,
    Empty,
}

impl From<OnNull> for NullPolicy {
    fn from(value: OnNull) -> Self {
        match value {
            OnNull::Fail => NullPolicy::Fail,
            OnNull::Empty => NullPolicy::Empty,
        }
    }
}

fn main() {
    match run() {
        Ok(0) => {}
        Ok(code) => {
            log::error!("Exiting with code={code}");
            std::process::exit(code);
        }
        Err(e) => {
            log::error!("ERROR: {e:?}");
            std::process::exit(1)
        }
    }
}

fn run() -> anyhow::Result<i32> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    let mut logger = pretty_env_logger::formatted_timed_builder();
    logger.format_timestamp_millis().filter_level(level);
    if let Ok(filters) = std::env::var("RUST_LOG") {
        logger.parse_filters(&filters);
    }
    logger.init();

    match cli.command {
        Commands::Probe { on_null, libs } => {
            Ok(probe_libraries(VersionProbe::new().null_policy(on_null.into()), &libs))
        }
        Commands::Check { libs } => {
            versionprobe::check_all(&libs)?;
            println!("all {} libraries can be loaded", libs.len());
            Ok(0)
        }
        Commands::Filename { name } => {
            println!("{}", versionprobe::library_file_name(&name).to_string_lossy());
            Ok(0)
        }
    }
}

fn probe_libraries(probe: VersionProbe, libs: &[String]) -> i32 {
    let mut failures = 0;
    for lib in libs {
        match probe.probe(lib) {
            Ok(version) => println!("{lib}: {version}"),
            Err(e) => {
                log::error!("{e}");
                failures += 1;
            }
        }
    }
    if failures > 0 { 1 } else { 0 }
}
