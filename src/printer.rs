use colored::{Color, Colorize};

use crate::env::LoadReport;

pub fn print_load_report(report: &LoadReport) {
    print!("{}", render_load_report(report));
}

pub fn render_load_report(report: &LoadReport) -> String {
    let malformed_color = if report.malformed > 0 {
        Color::Yellow
    } else {
        Color::Green
    };

    let mut out = String::new();
    out.push_str(&format!(
        "{} {}\n",
        "Env:".bold(),
        report.path.display().to_string().cyan()
    ));
    out.push_str(&format!(
        "{} {}\n",
        "Loaded:".bold(),
        format!("{}", report.loaded.len()).color(Color::Green)
    ));
    for key in &report.loaded {
        out.push_str(&format!("  {}\n", key.cyan()));
    }

    if !report.preserved.is_empty() {
        out.push_str(&format!(
            "{} {} {}\n",
            "Preserved:".bold(),
            report.preserved.len(),
            "(already set)".dimmed()
        ));
        for key in &report.preserved {
            out.push_str(&format!("  {}\n", key.dimmed()));
        }
    }

    out.push_str(&format!(
        "{} {}\n",
        "Malformed lines:".bold(),
        format!("{}", report.malformed).color(malformed_color)
    ));
    out
}
