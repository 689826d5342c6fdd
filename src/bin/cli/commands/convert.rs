use std::path::Path;

use anyhow::{Context, Result};

use apkg_convert_lib::config::parse_delimiter;
use apkg_convert_lib::export::resolve_output_path;
use apkg_convert_lib::{ConvertOptions, ExportFormat};

use crate::app::App;
use crate::render::terminal;

/// Flags that shape a single conversion
pub struct ConvertArgs<'a> {
    pub input: &'a Path,
    pub output: Option<&'a Path>,
    pub format: Option<ExportFormat>,
    pub note_type: Option<String>,
    pub card_type: Option<String>,
    pub media: bool,
    pub delimiter: Option<char>,
}

pub fn run(app: &App, args: ConvertArgs<'_>) -> Result<()> {
    let format = args.format.or(app.config.format);
    let output = resolve_output_path(args.input, args.output, format);

    let delimiter = match args.delimiter {
        Some(c) => parse_delimiter(c)?,
        None => app.config.delimiter_byte()?,
    };

    let options = ConvertOptions {
        note_type: args.note_type,
        card_type: args.card_type,
        extract_media: args.media || app.config.media,
        format,
        delimiter,
    };

    let converter = app.converter(args.input)?;
    let summary = converter
        .convert(&output, &options)
        .with_context(|| format!("Failed to convert '{}'", args.input.display()))?;

    println!(
        "{}",
        terminal::render_summary(&args.input.display().to_string(), &summary, app.use_color)
    );
    Ok(())
}
