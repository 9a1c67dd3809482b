use batch_resize::config::{self, Preset, ResizeConfig};
use batch_resize::imaging::ResizePolicy;
use batch_resize::{output, process};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup, called exactly once
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "batch-resize")]
#[command(about = "Resize every image in a directory to a fixed width, saved as JPEG")]
#[command(long_about = "\
Resize every image in a directory to a fixed width, saved as JPEG

Aspect ratio is preserved; height is rounded to the nearest pixel. Images
that cannot be encoded as JPEG directly (alpha, 16-bit) are converted to RGB
once and saved again. A file that fails is reported and the batch moves on.

Presets:
  blog       width 1400, every file, writes <stem>.jpg next to the source
  thumbnail  width 720, .jpg/.jpeg only, writes 3_<stem>.jpg

Settings resolve preset → <source>/resize.toml → command-line flags.
Run 'batch-resize gen-config' to generate a documented resize.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Directory holding the images (not searched recursively)
    #[arg(long, default_value = ".", global = true)]
    source: PathBuf,

    /// Starting point for settings
    #[arg(long, value_enum, default_value_t = Preset::Blog, global = true)]
    preset: Preset,

    /// Output width in pixels (overrides preset and resize.toml)
    #[arg(long, global = true)]
    width: Option<u32>,

    /// Resample every image, including ones already narrower than the width
    #[arg(long, global = true)]
    always: bool,

    /// Write outputs here instead of next to each source
    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the files a run would touch and their output names
    Scan,
    /// Resize every selected file
    Run,
    /// Print a stock resize.toml with all options documented
    GenConfig,
}

impl Cli {
    /// Resolve preset and `resize.toml`, then apply flag overrides.
    fn resolve_config(&self) -> Result<ResizeConfig, config::ConfigError> {
        let mut config = config::load_config(&self.source, self.preset)?;
        if let Some(width) = self.width {
            config.target_width = width;
        }
        if self.always {
            config.policy = ResizePolicy::Always;
        }
        if let Some(dir) = &self.output_dir {
            config.output.directory = Some(dir.clone());
        }
        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match cli.command {
        Command::Scan => {
            let config = cli.resolve_config()?;
            let planned = process::plan(&cli.source, &config)?;
            output::print_plan(&planned);
        }
        Command::Run => {
            let config = cli.resolve_config()?;
            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    for line in output::format_process_event(&event) {
                        println!("{}", line);
                    }
                }
            });
            let result = process::process(&cli.source, &config, Some(tx));
            printer
                .join()
                .map_err(|_| "progress printer thread panicked")?;
            let summary = result?;
            output::print_summary(&summary);
            if !summary.is_success() {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(ExitCode::SUCCESS)
}
