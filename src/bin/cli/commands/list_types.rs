use std::path::Path;

use anyhow::{Context, Result};

use crate::app::App;
use crate::render::terminal;

pub fn run(app: &App, input: &Path) -> Result<()> {
    let converter = app.converter(input)?;
    let names = converter
        .note_type_names()
        .context("Error listing types")?;

    println!(
        "{}",
        terminal::render_note_types(&input.display().to_string(), &names, app.use_color)
    );
    Ok(())
}
