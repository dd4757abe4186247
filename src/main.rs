use clap::Parser;
use std::path::PathBuf;
use yagikit::{init_logging, run, RunOptions};

#[derive(Parser, Debug)]
#[command(author, version, about = "Generate 3D-printable Yagi element housings")]
struct Args {
    /// Configuration file (.toml or .json); built-in defaults when omitted
    #[arg(long)]
    config: Option<PathBuf>,
    /// Directory receiving the STL files
    #[arg(long)]
    output: Option<PathBuf>,
    /// Suffix of every file name, e.g. `7R-<variant>.stl`
    #[arg(long)]
    variant: Option<String>,
    /// Also dump every scene entry and a scene.json manifest here
    #[arg(long)]
    preview: Option<PathBuf>,
    /// Write the effective configuration to this file
    #[arg(long)]
    write_config: Option<PathBuf>,
    /// Log and skip housings that fail instead of stopping
    #[arg(long)]
    skip_failed: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    init_logging()?;

    let options = RunOptions {
        config: args.config,
        output: args.output,
        variant: args.variant,
        preview: args.preview,
        write_config: args.write_config,
        skip_failed: args.skip_failed,
    };
    let reports = run(&options)?;
    for report in &reports {
        println!(
            "{}: {} triangles, {:.1} mm³",
            report.path.display(),
            report.triangles,
            report.volume
        );
    }

    Ok(())
}
