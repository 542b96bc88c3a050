//! Vega-Lite export.

use serde_json::{json, Value as JsonValue};

use super::{Chart, ChartData};

const VEGA_LITE_SCHEMA: &str = "https://vega.github.io/schema/vega-lite/v5.json";

pub(super) fn spec(chart: &Chart) -> JsonValue {
    let mut mark = json!({ "color": chart.color });
    if let Some(edge) = &chart.edge_color {
        mark["stroke"] = json!(edge);
    }

    let (values, encoding) = match &chart.data {
        ChartData::Bar { bars } => {
            mark["type"] = json!("bar");
            let values: Vec<JsonValue> = bars
                .iter()
                .map(|b| json!({ "category": b.label, "value": b.value }))
                .collect();
            let encoding = json!({
                "x": {
                    "field": "category",
                    "type": "nominal",
                    "title": chart.x_label,
                    "sort": null,
                    "axis": { "labelAngle": -45 }
                },
                "y": { "field": "value", "type": "quantitative", "title": chart.y_label }
            });
            (values, encoding)
        }
        ChartData::Scatter { points, opacity } => {
            mark["type"] = json!("point");
            mark["filled"] = json!(true);
            mark["opacity"] = json!(opacity);
            let values: Vec<JsonValue> = points.iter().map(|p| json!({ "x": p.x, "y": p.y })).collect();
            let encoding = json!({
                "x": { "field": "x", "type": "quantitative", "title": chart.x_label },
                "y": { "field": "y", "type": "quantitative", "title": chart.y_label }
            });
            (values, encoding)
        }
        ChartData::Histogram { bins } => {
            mark["type"] = json!("bar");
            let values: Vec<JsonValue> = bins
                .iter()
                .map(|b| json!({ "bin_start": b.start, "bin_end": b.end, "count": b.count }))
                .collect();
            let encoding = json!({
                "x": {
                    "field": "bin_start",
                    "type": "quantitative",
                    "bin": { "binned": true },
                    "title": chart.x_label
                },
                "x2": { "field": "bin_end" },
                "y": { "field": "count", "type": "quantitative", "title": chart.y_label }
            });
            (values, encoding)
        }
    };

    json!({
        "$schema": VEGA_LITE_SCHEMA,
        "title": chart.title,
        "data": { "values": values },
        "mark": mark,
        "encoding": encoding
    })
}
