//! Presentation helpers: plain-text tables and on-disk artifacts for an [`AnalysisReport`].

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::PipelineResult;
use crate::pipeline::AnalysisReport;
use crate::processing::STATISTIC_NAMES;

/// Number of raw rows shown in the data overview.
pub const OVERVIEW_ROWS: usize = 5;

/// Render every table of the report as aligned plain text.
pub fn render_text(report: &AnalysisReport) -> String {
    let mut out = String::new();

    section(&mut out, "Data Overview");
    let head = report.table.head(OVERVIEW_ROWS);
    let rows: Vec<Vec<String>> = head
        .rows
        .iter()
        .map(|r| r.iter().map(ToString::to_string).collect())
        .collect();
    out.push_str(&format_table(&head.columns, &rows));

    section(&mut out, "Basic Statistics");
    if report.statistics.is_empty() {
        out.push_str("(no rows)\n");
    } else {
        let mut headers = vec![String::new()];
        headers.extend(report.statistics.columns.iter().map(|c| c.column.clone()));
        let rows: Vec<Vec<String>> = STATISTIC_NAMES
            .iter()
            .map(|name| {
                let mut row = vec![(*name).to_string()];
                row.extend(
                    report
                        .statistics
                        .columns
                        .iter()
                        .map(|c| format_number(c.statistic(name))),
                );
                row
            })
            .collect();
        out.push_str(&format_table(&headers, &rows));
    }

    section(&mut out, "Top Engaging Posts");
    let rows: Vec<Vec<String>> = report
        .top_posts
        .iter()
        .map(|p| vec![p.username.to_string(), p.platform.to_string(), p.total_engagement.to_string()])
        .collect();
    out.push_str(&format_table(
        &strings(&["Username", "Platform", "Total_Engagement"]),
        &rows,
    ));

    section(&mut out, "Top Verified Users");
    let rows: Vec<Vec<String>> = report
        .top_verified
        .iter()
        .map(|u| vec![u.username.to_string(), u.followers.to_string()])
        .collect();
    out.push_str(&format_table(&strings(&["Username", "User_Followers"]), &rows));

    section(&mut out, "Average Engagement by Platform");
    let rows: Vec<Vec<String>> = report
        .platform_engagement
        .iter()
        .map(|p| vec![p.platform.clone(), format_number(p.mean_engagement)])
        .collect();
    out.push_str(&format_table(&strings(&["Platform", "Total_Engagement"]), &rows));

    out
}

/// Write `report.json` plus an SVG and a Vega-Lite spec per chart into `dir`.
///
/// The directory is created if needed. Returns the written paths.
pub fn write_artifacts(report: &AnalysisReport, dir: impl AsRef<Path>) -> PipelineResult<Vec<PathBuf>> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;
    let mut written = Vec::with_capacity(1 + report.charts.len() * 2);

    let json_path = dir.join("report.json");
    let json = serde_json::to_string_pretty(report).map_err(io::Error::from)?;
    fs::write(&json_path, json)?;
    written.push(json_path);

    for chart in &report.charts {
        let svg_path = dir.join(format!("{}.svg", chart.id.slug()));
        fs::write(&svg_path, chart.to_svg()?)?;
        written.push(svg_path);

        let spec_path = dir.join(format!("{}.vl.json", chart.id.slug()));
        let spec = serde_json::to_string_pretty(&chart.to_vega_lite()).map_err(io::Error::from)?;
        fs::write(&spec_path, spec)?;
        written.push(spec_path);
    }

    Ok(written)
}

fn section(out: &mut String, title: &str) {
    if !out.is_empty() {
        out.push('\n');
    }
    out.push_str(title);
    out.push('\n');
    out.push_str(&"-".repeat(title.chars().count()));
    out.push('\n');
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

fn format_number(v: Option<f64>) -> String {
    match v {
        Some(v) => format!("{v:.2}"),
        None => "NaN".to_string(),
    }
}

/// Left-aligned table with a header row; columns are padded to their widest cell.
fn format_table(headers: &[String], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }

    let mut out = String::new();
    let mut push_row = |cells: &[String]| {
        let line: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(c, w)| format!("{c:<w$}", w = *w))
            .collect();
        out.push_str(line.join("  ").trim_end());
        out.push('\n');
    };
    push_row(headers);
    for row in rows {
        push_row(row.as_slice());
    }
    if rows.is_empty() {
        out.push_str("(empty)\n");
    }
    out
}
