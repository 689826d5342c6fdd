mod app;
mod commands;
mod render;

use std::path::PathBuf;

use clap::Parser;

use apkg_convert_lib::ExportFormat;

use commands::convert::ConvertArgs;

#[derive(Parser)]
#[command(
    name = "apkg-convert",
    about = "Convert .apkg Anki deck files to .csv or .xlsx",
    version
)]
struct Cli {
    /// Path to the .apkg file
    input_file: PathBuf,

    /// Path to the output file (e.g., filename.csv or filename.xlsx)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format (overrides file extension)
    #[arg(long)]
    format: Option<FormatArg>,

    /// Filter by Note Type (model name)
    #[arg(long, value_name = "NOTE_TYPE")]
    filter: Option<String>,

    /// Filter by Card Type (template name)
    #[arg(long, value_name = "TEMPLATE")]
    card_type: Option<String>,

    /// List available Note Types and exit
    #[arg(long)]
    list_types: bool,

    /// Extract media files and link them in the output
    #[arg(long)]
    media: bool,

    /// CSV field delimiter
    #[arg(long)]
    delimiter: Option<char>,

    /// Configuration file (default: <config dir>/apkg-convert/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Disable ANSI colors
    #[arg(long)]
    no_color: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum FormatArg {
    Csv,
    Xlsx,
}

impl From<FormatArg> for ExportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Csv => ExportFormat::Csv,
            FormatArg::Xlsx => ExportFormat::Xlsx,
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let app = app::App::new(cli.config.as_deref(), cli.no_color)?;

    if cli.list_types {
        return commands::list_types::run(&app, &cli.input_file);
    }

    commands::convert::run(
        &app,
        ConvertArgs {
            input: &cli.input_file,
            output: cli.output.as_deref(),
            format: cli.format.map(ExportFormat::from),
            note_type: cli.filter,
            card_type: cli.card_type,
            media: cli.media,
            delimiter: cli.delimiter,
        },
    )
}
