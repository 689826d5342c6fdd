use apkg_convert_lib::ExportSummary;

/// ANSI color codes
pub struct Color;

impl Color {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const CYAN: &str = "\x1b[36m";
}

fn paint(text: &str, color: &str, use_color: bool) -> String {
    if use_color {
        format!("{}{}{}", color, text, Color::RESET)
    } else {
        text.to_string()
    }
}

/// Render the note type listing printed by `--list-types`
pub fn render_note_types(input: &str, names: &[String], use_color: bool) -> String {
    let mut lines = vec![format!("Available Note Types in '{}':", input)];

    if names.is_empty() {
        lines.push(paint("  (none)", Color::DIM, use_color));
    }
    for name in names {
        lines.push(format!("- {}", paint(name, Color::BOLD, use_color)));
    }

    lines.join("\n")
}

/// Render the outcome of a conversion
pub fn render_summary(input: &str, summary: &ExportSummary, use_color: bool) -> String {
    let output = summary.output.display().to_string();
    let mut lines = vec![format!(
        "{} '{}' to '{}' ({} rows, {})",
        paint("Successfully converted", Color::GREEN, use_color),
        input,
        paint(&output, Color::CYAN, use_color),
        summary.rows,
        summary.format,
    )];

    if summary.media_files > 0 {
        lines.push(format!("  {} media files extracted", summary.media_files));
    }
    for warning in &summary.warnings {
        lines.push(format!("  {} {}", paint("warning:", Color::YELLOW, use_color), warning));
    }

    lines.join("\n")
}
