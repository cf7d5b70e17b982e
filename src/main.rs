use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use postkit::config::{self, ToolConfig};
use postkit::imaging::{self, Background, CoverParams, RustBackend};
use postkit::output;
use postkit::publish::{self, PublishConfig};
use postkit::schedule::{DateError, ScheduleDate};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "postkit")]
#[command(about = "Cover images and scheduled publishing for markdown articles")]
#[command(long_about = "\
Cover images and scheduled publishing for markdown articles

Article layout:

  articles/
  ├── 2024-launch.md      # published: false + past date → flipped to true
  ├── next-week.md        # published: false + future date → left pending
  └── about.md            # no `published` key → never touched

Frontmatter the scheduler acts on:

  ---
  title: Launch day
  date: 2024-05-01 09:00   # date, naive datetime (UTC) or with offset
  published: false
  ---

Settings are read from ./postkit.toml when present. Run
'postkit gen-config' to print a documented default.")]
#[command(version)]
struct Cli {
    /// Config file (default: ./postkit.toml if it exists)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Letterbox an image into a fixed-size PNG cover
    Cover {
        /// Source image
        input: PathBuf,
        /// Output path; always written as PNG
        output: PathBuf,
        /// Background colour for the bands
        #[arg(long, num_args = 3, value_names = ["R", "G", "B"])]
        bg: Option<Vec<u8>>,
        /// Canvas width in pixels
        #[arg(long)]
        width: Option<u32>,
        /// Canvas height in pixels
        #[arg(long)]
        height: Option<u32>,
    },
    /// Flip `published: false` to true for articles whose date has passed
    Publish {
        /// Articles directory (scanned non-recursively)
        #[arg(long)]
        dir: Option<PathBuf>,
        /// Evaluate as if it were this instant instead of the current time
        #[arg(long, value_parser = parse_now)]
        now: Option<DateTime<Utc>>,
        /// Report what would be published without writing anything
        #[arg(long)]
        dry_run: bool,
    },
    /// Print a stock postkit.toml with all options documented
    GenConfig,
}

fn parse_now(text: &str) -> Result<DateTime<Utc>, DateError> {
    ScheduleDate::parse(text).map(|d| d.to_utc())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Command::Cover {
            input,
            output: out,
            bg,
            width,
            height,
        } => {
            let tool = load_tool_config(cli.config.as_deref())?;
            let mut params = CoverParams::new(input, out);
            params.width = width.unwrap_or(tool.cover.width);
            params.height = height.unwrap_or(tool.cover.height);
            params.background = match bg {
                Some(rgb) => background_from_args(&rgb)?,
                None => tool.cover.background,
            };
            if params.width == 0 || params.height == 0 {
                return Err("--width and --height must be non-zero".into());
            }

            match imaging::create_cover(&RustBackend::new(), &params) {
                Ok(layout) => println!("{}", output::format_cover_success(&params.output, &layout)),
                Err(e) => {
                    println!("{}", output::format_cover_error(&e));
                    std::process::exit(1);
                }
            }
        }
        Command::Publish { dir, now, dry_run } => {
            let tool = load_tool_config(cli.config.as_deref())?;
            let mut config = PublishConfig::from_tool_config(&tool);
            if let Some(dir) = dir {
                config.articles_dir = dir;
            }
            config.dry_run = dry_run;

            let now = now.unwrap_or_else(Utc::now);
            output::print_publish_header(&now);
            let report = publish::run(&config, now, output::print_article)?;
            output::print_publish_summary(&report);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Diagnostics go to stderr, filtered by `POSTKIT_LOG` (default: warn).
fn init_logging() {
    let log_environ = env_logger::Env::new()
        .filter("POSTKIT_LOG")
        .write_style("POSTKIT_LOG_STYLE");
    let mut log_builder = env_logger::Builder::new();

    log_builder.filter_level(log::LevelFilter::Warn);
    log_builder.parse_env(log_environ);
    log_builder.init();
}

/// Explicit `--config` must exist; the implicit `./postkit.toml` may not.
fn load_tool_config(path: Option<&Path>) -> Result<ToolConfig, config::ConfigError> {
    match path {
        Some(path) => config::load_config_file(path),
        None => config::load_config(Path::new(".")),
    }
}

fn background_from_args(rgb: &[u8]) -> Result<Background, Box<dyn std::error::Error>> {
    let rgb: [u8; 3] = rgb
        .try_into()
        .map_err(|_| "--bg takes exactly three values: R G B")?;
    Ok(Background::from(rgb))
}
