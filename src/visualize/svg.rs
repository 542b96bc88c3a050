//! SVG rendering on `plotters`. Each call draws on its own in-memory drawing area.

use std::ops::Range;

use plotters::coord::Shift;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;

use super::{Bar, Chart, ChartData, HistogramBin, Point};
use crate::error::{PipelineError, PipelineResult};

const SIZE: (u32, u32) = (800, 600);
const POINT_RADIUS: i32 = 4;

type DrawResult<T> = Result<T, DrawingAreaErrorKind<std::io::Error>>;

pub(super) fn render(chart: &Chart) -> PipelineResult<String> {
    let mut out = String::new();
    draw(chart, &mut out).map_err(|e| PipelineError::Render {
        chart: chart.id.slug().to_string(),
        message: e.to_string(),
    })?;
    Ok(out)
}

fn draw(chart: &Chart, out: &mut String) -> DrawResult<()> {
    let root = SVGBackend::with_string(out, SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    match &chart.data {
        ChartData::Bar { bars } => draw_bars(&root, chart, bars)?,
        ChartData::Scatter { points, opacity } => draw_scatter(&root, chart, points, *opacity)?,
        ChartData::Histogram { bins } => draw_histogram(&root, chart, bins)?,
    }

    root.present()?;
    Ok(())
}

fn draw_bars(area: &DrawingArea<SVGBackend<'_>, Shift>, chart: &Chart, bars: &[Bar]) -> DrawResult<()> {
    let y_max = bars.iter().filter_map(|b| b.value).fold(0.0_f64, f64::max);
    // An empty segmented axis has no width to map onto.
    let slots = bars.len().max(1);

    let mut ctx = ChartBuilder::on(area)
        .caption(&chart.title, ("sans-serif", 24))
        .margin(15)
        .x_label_area_size(60)
        .y_label_area_size(70)
        .build_cartesian_2d((0..slots).into_segmented(), 0.0..nice_upper(y_max))?;

    let label_of = |v: &SegmentValue<usize>| match v {
        SegmentValue::CenterOf(i) | SegmentValue::Exact(i) => {
            bars.get(*i).map(|b| b.label.clone()).unwrap_or_default()
        }
        SegmentValue::Last => String::new(),
    };
    ctx.configure_mesh()
        .disable_x_mesh()
        .x_labels(slots)
        .x_label_formatter(&label_of)
        .y_label_formatter(&|v: &f64| format_tick(*v))
        .x_desc(chart.x_label.as_str())
        .y_desc(chart.y_label.as_str())
        .draw()?;

    let fill = named_color(&chart.color);
    ctx.draw_series(
        Histogram::vertical(&ctx)
            .style(fill.filled())
            .margin(10)
            .data(
                bars.iter()
                    .enumerate()
                    .filter_map(|(i, b)| b.value.filter(|v| v.is_finite()).map(|v| (i, v))),
            ),
    )?;
    Ok(())
}

fn draw_scatter(
    area: &DrawingArea<SVGBackend<'_>, Shift>,
    chart: &Chart,
    points: &[Point],
    opacity: f64,
) -> DrawResult<()> {
    let x_range = padded_extent(points.iter().map(|p| p.x));
    let y_range = padded_extent(points.iter().map(|p| p.y));

    let mut ctx = ChartBuilder::on(area)
        .caption(&chart.title, ("sans-serif", 24))
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(x_range, y_range)?;
    ctx.configure_mesh()
        .x_label_formatter(&|v: &f64| format_tick(*v))
        .y_label_formatter(&|v: &f64| format_tick(*v))
        .x_desc(chart.x_label.as_str())
        .y_desc(chart.y_label.as_str())
        .draw()?;

    let color = named_color(&chart.color);
    ctx.draw_series(
        points
            .iter()
            .filter(|p| p.x.is_finite() && p.y.is_finite())
            .map(|p| Circle::new((p.x, p.y), POINT_RADIUS, color.mix(opacity).filled())),
    )?;
    Ok(())
}

fn draw_histogram(
    area: &DrawingArea<SVGBackend<'_>, Shift>,
    chart: &Chart,
    bins: &[HistogramBin],
) -> DrawResult<()> {
    let x_range = match (bins.first(), bins.last()) {
        (Some(first), Some(last)) if first.start < last.end => first.start..last.end,
        _ => 0.0..1.0,
    };
    let y_max = bins.iter().map(|b| b.count).max().unwrap_or(0) as f64;

    let mut ctx = ChartBuilder::on(area)
        .caption(&chart.title, ("sans-serif", 24))
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range, 0.0..nice_upper(y_max))?;
    ctx.configure_mesh()
        .disable_x_mesh()
        .x_label_formatter(&|v: &f64| format_tick(*v))
        .y_label_formatter(&|v: &f64| format_tick(*v))
        .x_desc(chart.x_label.as_str())
        .y_desc(chart.y_label.as_str())
        .draw()?;

    let filled = || bins.iter().filter(|b| b.count > 0);
    let fill = named_color(&chart.color);
    ctx.draw_series(
        filled().map(|b| Rectangle::new([(b.start, 0.0), (b.end, b.count as f64)], fill.filled())),
    )?;
    if let Some(edge) = chart.edge_color.as_deref() {
        let edge = named_color(edge);
        ctx.draw_series(
            filled().map(|b| Rectangle::new([(b.start, 0.0), (b.end, b.count as f64)], edge.stroke_width(1))),
        )?;
    }
    Ok(())
}

/// RGB value for the color names charts are declared with; unknown names fall back to blue.
fn named_color(name: &str) -> RGBColor {
    match name {
        "skyblue" => RGBColor(135, 206, 235),
        "green" => RGBColor(0, 128, 0),
        "orange" => RGBColor(255, 165, 0),
        "purple" => RGBColor(128, 0, 128),
        "black" => BLACK,
        _ => RGBColor(31, 119, 180),
    }
}

/// Axis upper bound with a little headroom; never zero.
fn nice_upper(max: f64) -> f64 {
    if max.is_finite() && max > 0.0 { max * 1.05 } else { 1.0 }
}

fn padded_extent(values: impl Iterator<Item = f64>) -> Range<f64> {
    let extent = values
        .filter(|v| v.is_finite())
        .fold(None, |acc: Option<(f64, f64)>, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        });
    match extent {
        None => 0.0..1.0,
        Some((lo, hi)) if lo == hi => (lo - 0.5)..(hi + 0.5),
        Some((lo, hi)) => {
            let pad = (hi - lo) * 0.05;
            (lo - pad)..(hi + pad)
        }
    }
}

fn format_tick(v: f64) -> String {
    if v.abs() >= 1000.0 || v.fract() == 0.0 {
        format!("{v:.0}")
    } else {
        let s = format!("{v:.2}");
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

#[cfg(test)]
mod tests {
    use plotters::prelude::Color;

    use super::{format_tick, named_color, padded_extent, render};
    use crate::visualize::{Bar, Chart, ChartData, ChartId, HistogramBin, Point};

    fn bar_chart(bars: Vec<Bar>) -> Chart {
        Chart {
            id: ChartId::PlatformEngagement,
            title: "Average Engagement by Platform".to_string(),
            x_label: "Platform".to_string(),
            y_label: "Average Engagement".to_string(),
            color: "skyblue".to_string(),
            edge_color: None,
            data: ChartData::Bar { bars },
        }
    }

    fn histogram_chart(edge_color: Option<&str>) -> Chart {
        let bin = |start: f64, count: usize| HistogramBin {
            start,
            end: start + 1.0,
            count,
        };
        Chart {
            id: ChartId::LikesDistribution,
            title: "Distribution of Likes/Reactions".to_string(),
            x_label: "Likes/Reactions".to_string(),
            y_label: "Frequency".to_string(),
            color: "purple".to_string(),
            edge_color: edge_color.map(str::to_string),
            data: ChartData::Histogram {
                bins: vec![bin(0.0, 1), bin(1.0, 0), bin(2.0, 2)],
            },
        }
    }

    fn count(svg: &str, needle: &str) -> usize {
        svg.matches(needle).count()
    }

    #[test]
    fn output_is_one_svg_document() {
        let svg = render(&bar_chart(vec![])).unwrap();
        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert_eq!(count(&svg, "<svg"), 1);
        assert!(svg.contains("Average Engagement by Platform"));
    }

    #[test]
    fn only_valued_bars_are_drawn() {
        let one = render(&bar_chart(vec![
            Bar { label: "Facebook".to_string(), value: Some(9.0) },
            Bar { label: "Twitter".to_string(), value: None },
        ]))
        .unwrap();
        let two = render(&bar_chart(vec![
            Bar { label: "Facebook".to_string(), value: Some(9.0) },
            Bar { label: "Twitter".to_string(), value: Some(3.0) },
        ]))
        .unwrap();

        assert_eq!(count(&two, "<rect"), count(&one, "<rect") + 1);
        assert!(one.contains("Facebook") && one.contains("Twitter"));
    }

    #[test]
    fn scatter_draws_one_marker_per_finite_point() {
        let chart = Chart {
            id: ChartId::FollowersVsEngagement,
            title: "Followers vs Total Engagement".to_string(),
            x_label: "User Followers".to_string(),
            y_label: "Total Engagement".to_string(),
            color: "green".to_string(),
            edge_color: None,
            data: ChartData::Scatter {
                points: vec![
                    Point { x: 1.0, y: 2.0 },
                    Point { x: 3.0, y: 4.0 },
                    Point { x: f64::NAN, y: 1.0 },
                ],
                opacity: 0.5,
            },
        };
        let svg = render(&chart).unwrap();
        assert_eq!(count(&svg, "<circle"), 2);
    }

    #[test]
    fn histogram_edges_outline_non_empty_bins() {
        let plain = render(&histogram_chart(None)).unwrap();
        let edged = render(&histogram_chart(Some("black"))).unwrap();
        assert_eq!(count(&edged, "<rect"), count(&plain, "<rect") + 2);
    }

    #[test]
    fn chart_colors_resolve_by_name() {
        assert_eq!(named_color("skyblue").rgb(), (135, 206, 235));
        assert_eq!(named_color("orange").rgb(), (255, 165, 0));
        assert_eq!(named_color("unknown").rgb(), (31, 119, 180));
    }

    #[test]
    fn extents_are_padded_and_never_empty() {
        assert_eq!(padded_extent(std::iter::empty()), 0.0..1.0);
        assert_eq!(padded_extent([5.0, 5.0].into_iter()), 4.5..5.5);
        let r = padded_extent([0.0, 100.0].into_iter());
        assert!(r.start < 0.0 && r.end > 100.0);
    }

    #[test]
    fn tick_labels_are_compact() {
        assert_eq!(format_tick(10.0), "10");
        assert_eq!(format_tick(2.5), "2.5");
        assert_eq!(format_tick(0.126), "0.13");
        assert_eq!(format_tick(12345.6), "12346");
    }
}
