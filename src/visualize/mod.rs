//! Chart artifacts built from an analyzed table.
//!
//! Every chart is an independent value: [`visualize`] returns four [`Chart`]s and each one can
//! be rendered on its own with [`Chart::to_svg`] or exported with [`Chart::to_vega_lite`]. There
//! is no shared drawing surface between charts or between calls.

mod histogram;
mod svg;
mod vega;

use serde::Serialize;

use crate::error::{PipelineError, PipelineResult};
use crate::processing::{validate_shape, PlatformEngagement};
use crate::schema::{FOLLOWERS, LIKES, TOTAL_ENGAGEMENT};
use crate::types::PostTable;

pub use histogram::{histogram, HistogramBin};

/// Default number of equal-width histogram bins.
pub const DEFAULT_HISTOGRAM_BINS: usize = 20;

/// Which of the four standard charts a [`Chart`] is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartId {
    PlatformEngagement,
    FollowersVsEngagement,
    TotalEngagementDistribution,
    LikesDistribution,
}

impl ChartId {
    /// File-name friendly identifier.
    pub fn slug(self) -> &'static str {
        match self {
            ChartId::PlatformEngagement => "platform_engagement",
            ChartId::FollowersVsEngagement => "followers_vs_engagement",
            ChartId::TotalEngagementDistribution => "total_engagement_distribution",
            ChartId::LikesDistribution => "likes_distribution",
        }
    }
}

/// One bar of a bar chart. Bars without a value are drawn empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    pub label: String,
    pub value: Option<f64>,
}

/// One scatter point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// The data a chart plots.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChartData {
    Bar { bars: Vec<Bar> },
    Scatter { points: Vec<Point>, opacity: f64 },
    Histogram { bins: Vec<HistogramBin> },
}

/// A self-contained chart artifact.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chart {
    pub id: ChartId,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// Fill color (CSS color name or hex).
    pub color: String,
    /// Outline color for bars, if any.
    pub edge_color: Option<String>,
    pub data: ChartData,
}

impl Chart {
    /// Number of plotted data points (bars with a value, points, or counted observations).
    pub fn data_points(&self) -> usize {
        match &self.data {
            ChartData::Bar { bars } => bars.iter().filter(|b| b.value.is_some()).count(),
            ChartData::Scatter { points, .. } => points.len(),
            ChartData::Histogram { bins } => bins.iter().map(|b| b.count).sum(),
        }
    }

    /// Render as a standalone SVG document.
    pub fn to_svg(&self) -> PipelineResult<String> {
        svg::render(self)
    }

    /// Export as a Vega-Lite v5 specification.
    pub fn to_vega_lite(&self) -> serde_json::Value {
        vega::spec(self)
    }
}

/// Build the four standard charts.
///
/// `table` must already carry `Total_Engagement`. Zero rows produce charts with no data points.
pub fn visualize(
    table: &PostTable,
    platform_engagement: &[PlatformEngagement],
    histogram_bins: usize,
) -> PipelineResult<Vec<Chart>> {
    validate_shape(table)?;
    let followers = require(table, FOLLOWERS)?;
    let total = require(table, TOTAL_ENGAGEMENT)?;
    let likes = require(table, LIKES)?;

    let bars = platform_engagement
        .iter()
        .map(|p| Bar {
            label: p.platform.clone(),
            value: p.mean_engagement,
        })
        .collect();

    let points = table
        .rows
        .iter()
        .filter_map(|row| {
            Some(Point {
                x: row[followers].as_f64()?,
                y: row[total].as_f64()?,
            })
        })
        .collect();

    Ok(vec![
        Chart {
            id: ChartId::PlatformEngagement,
            title: "Average Engagement by Platform".to_string(),
            x_label: "Platform".to_string(),
            y_label: "Average Engagement".to_string(),
            color: "skyblue".to_string(),
            edge_color: None,
            data: ChartData::Bar { bars },
        },
        Chart {
            id: ChartId::FollowersVsEngagement,
            title: "Followers vs Total Engagement".to_string(),
            x_label: "User Followers".to_string(),
            y_label: "Total Engagement".to_string(),
            color: "green".to_string(),
            edge_color: None,
            data: ChartData::Scatter { points, opacity: 0.5 },
        },
        Chart {
            id: ChartId::TotalEngagementDistribution,
            title: "Distribution of Total Engagement".to_string(),
            x_label: "Total Engagement".to_string(),
            y_label: "Frequency".to_string(),
            color: "orange".to_string(),
            edge_color: Some("black".to_string()),
            data: ChartData::Histogram {
                bins: histogram(table.column(total), histogram_bins),
            },
        },
        Chart {
            id: ChartId::LikesDistribution,
            title: "Distribution of Likes/Reactions".to_string(),
            x_label: "Likes/Reactions".to_string(),
            y_label: "Frequency".to_string(),
            color: "purple".to_string(),
            edge_color: Some("black".to_string()),
            data: ChartData::Histogram {
                bins: histogram(table.column(likes), histogram_bins),
            },
        },
    ])
}

fn require(table: &PostTable, column: &str) -> PipelineResult<usize> {
    table
        .index_of(column)
        .ok_or_else(|| PipelineError::MissingColumn {
            column: column.to_owned(),
        })
}

#[cfg(test)]
mod tests {
    use super::{visualize, ChartData, ChartId, DEFAULT_HISTOGRAM_BINS};
    use crate::pipeline::AnalysisOptions;
    use crate::processing::analyze;
    use crate::types::{PostTable, Value};

    fn analyzed(rows: Vec<[&str; 7]>) -> crate::processing::Analysis {
        let columns = [
            "Username",
            "Platform",
            "Likes/Reactions",
            "Comments",
            "Shares/Retweets",
            "Account_Verification",
            "User_Followers",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        let rows = rows
            .iter()
            .map(|r| r.iter().map(|c| Value::Utf8(c.to_string())).collect())
            .collect();
        analyze(PostTable::new(columns, rows), &AnalysisOptions::default()).unwrap()
    }

    #[test]
    fn produces_four_independent_charts() {
        let a = analyzed(vec![
            ["alice", "X", "10", "2", "3", "Verified", "100"],
            ["bob", "Y", "1", "1", "1", "Not", "50"],
        ]);
        let charts = visualize(&a.table, &a.platform_engagement, DEFAULT_HISTOGRAM_BINS).unwrap();
        let ids: Vec<_> = charts.iter().map(|c| c.id).collect();
        assert_eq!(
            ids,
            vec![
                ChartId::PlatformEngagement,
                ChartId::FollowersVsEngagement,
                ChartId::TotalEngagementDistribution,
                ChartId::LikesDistribution,
            ]
        );
        assert_eq!(charts[0].data_points(), 2);
        assert_eq!(charts[1].data_points(), 2);
        assert_eq!(charts[2].data_points(), 2);
        match &charts[3].data {
            ChartData::Histogram { bins } => assert_eq!(bins.len(), DEFAULT_HISTOGRAM_BINS),
            other => panic!("unexpected chart data {other:?}"),
        }
        match &charts[1].data {
            ChartData::Scatter { points, opacity } => {
                assert_eq!(*opacity, 0.5);
                assert_eq!((points[0].x, points[0].y), (100.0, 15.0));
            }
            other => panic!("unexpected chart data {other:?}"),
        }
    }

    #[test]
    fn zero_rows_render_without_points() {
        let a = analyzed(vec![]);
        let charts = visualize(&a.table, &a.platform_engagement, DEFAULT_HISTOGRAM_BINS).unwrap();
        assert_eq!(charts.len(), 4);
        for chart in &charts {
            assert_eq!(chart.data_points(), 0);
            let svg = chart.to_svg().unwrap();
            assert!(svg.starts_with("<svg") && svg.trim_end().ends_with("</svg>"));
            assert!(!svg.contains("<circle"));
        }
    }

    #[test]
    fn rendering_does_not_change_the_chart() {
        let a = analyzed(vec![["alice", "X", "10", "2", "3", "Verified", "100"]]);
        let charts = visualize(&a.table, &a.platform_engagement, DEFAULT_HISTOGRAM_BINS).unwrap();
        let before = charts.clone();
        for chart in &charts {
            chart.to_svg().unwrap();
            let _ = chart.to_vega_lite();
        }
        assert_eq!(charts, before);
    }
}
