//! Plotly chart rendering.
//!
//! One figure per currency: a relative (stacked, sign-aware) bar per trade
//! name in every bucket, overlaid with the currency's net line. Figures are
//! emitted as HTML fragments that load plotly.js from its CDN, so several
//! fragments can be appended into the same day's file.

use ktb_core::Date;
use ktb_risk::BucketedRisk;
use serde_json::{json, Value};

use crate::report_sink::{Report, ReportFormat, SinkError, WriteMode};

/// plotly.js bundle the fragments load.
pub const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

/// File stem of the per-day chart report: `KTB_<YYYY-MM-DD>`.
pub fn daily_report_id(as_of: Date) -> String {
    format!("KTB_{as_of}")
}

/// Visual settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartStyle {
    /// Bar opacity
    pub bar_opacity: f64,
    /// Net label colour for negative values
    pub negative_color: String,
    /// Net label colour for zero and positive values
    pub positive_color: String,
    /// Plotly template name
    pub template: String,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            bar_opacity: 0.6,
            negative_color: "darkred".to_string(),
            positive_color: "darkgreen".to_string(),
            template: "plotly_white".to_string(),
        }
    }
}

/// Renders bucketed exposures as Plotly figures.
#[derive(Debug, Clone, Default)]
pub struct ChartRenderer {
    style: ChartStyle,
}

impl ChartRenderer {
    /// Creates a renderer with the given style.
    pub fn new(style: ChartStyle) -> Self {
        Self { style }
    }

    /// Plotly figure (`{"data": [...], "layout": {...}}`) for one currency.
    pub fn figure(&self, risk: &BucketedRisk, currency: &str) -> Result<Value, SinkError> {
        let net: Vec<_> = risk.net_for(currency).collect();
        if net.is_empty() {
            return Err(SinkError::EmptyCurrency(currency.to_string()));
        }

        // Net entries are already in rank order and cover every bucket used.
        let categories: Vec<String> = net.iter().map(|n| n.bucket.label()).collect();

        let mut names: Vec<&str> = risk
            .exposures_for(currency)
            .map(|e| e.trade_name.as_str())
            .collect();
        names.sort_unstable();
        names.dedup();

        let mut data: Vec<Value> = names
            .iter()
            .map(|name| {
                let (x, y): (Vec<String>, Vec<f64>) = risk
                    .exposures_for(currency)
                    .filter(|e| e.trade_name == *name)
                    .map(|e| (e.bucket.label(), e.dv01))
                    .unzip();
                json!({
                    "type": "bar",
                    "name": name,
                    "x": x,
                    "y": y,
                    "opacity": self.style.bar_opacity,
                    "legendgroup": name,
                })
            })
            .collect();

        let net_values: Vec<f64> = net.iter().map(|n| n.dv01).collect();
        let label_colors: Vec<&str> = net_values
            .iter()
            .map(|v| {
                if *v < 0.0 {
                    self.style.negative_color.as_str()
                } else {
                    self.style.positive_color.as_str()
                }
            })
            .collect();
        data.push(json!({
            "type": "scatter",
            "mode": "lines+markers+text",
            "name": currency,
            "x": categories,
            "y": net_values,
            "text": net_values,
            "texttemplate": "<b>%{text:.2s}</b>",
            "textposition": "top center",
            "textfont": { "color": label_colors },
            "marker": { "size": 9, "symbol": "diamond", "color": "black" },
            "line": { "color": "black" },
        }));

        let layout = json!({
            "template": self.style.template,
            "barmode": "relative",
            "title": { "text": currency, "x": 0.5 },
            "xaxis": {
                "type": "category",
                "categoryorder": "array",
                "categoryarray": categories,
            },
            "yaxis": { "showgrid": false },
            "plot_bgcolor": "rgba(0,0,0,0)",
            "shapes": [{
                "type": "line",
                "xref": "paper",
                "x0": 0,
                "x1": 1,
                "yref": "y",
                "y0": 0,
                "y1": 0,
                "line": { "width": 1, "dash": "dash" },
            }],
        });

        Ok(json!({ "data": data, "layout": layout }))
    }

    /// HTML fragment embedding one currency's figure.
    pub fn html_fragment(
        &self,
        risk: &BucketedRisk,
        currency: &str,
        as_of: Date,
    ) -> Result<String, SinkError> {
        let figure = self.figure(risk, currency)?;
        let div_id = format!("ktb-{currency}-{as_of}");
        let data = serde_json::to_string(&figure["data"])?;
        let layout = serde_json::to_string(&figure["layout"])?;

        Ok(format!(
            concat!(
                "<div>\n",
                "<script src=\"{cdn}\" charset=\"utf-8\"></script>\n",
                "<div id=\"{id}\" class=\"plotly-graph-div\" style=\"height:100%; width:100%;\"></div>\n",
                "<script type=\"text/javascript\">Plotly.newPlot(\"{id}\", {data}, {layout}, {{\"responsive\": true}})</script>\n",
                "</div>\n",
            ),
            cdn = PLOTLY_CDN,
            id = div_id,
            data = data,
            layout = layout,
        ))
    }

    /// Append-mode HTML report holding one figure per currency, in code order.
    pub fn report(&self, risk: &BucketedRisk, as_of: Date) -> Result<Report, SinkError> {
        let mut content = String::new();
        for currency in risk.currencies() {
            content.push_str(&self.html_fragment(risk, currency, as_of)?);
        }

        Ok(Report {
            report_id: daily_report_id(as_of),
            title: format!("Key tenor buckets {as_of}"),
            report_type: ReportFormat::Html,
            mode: WriteMode::Append,
            content,
            generated_at: chrono::Utc::now().to_rfc3339(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ktb_risk::{BucketAggregator, TenorLeg};

    fn risk() -> BucketedRisk {
        let mut agg = BucketAggregator::new();
        agg.add_leg("KRW", "2s5s", TenorLeg { days: 730, dv01: -1_200.0 });
        agg.add_leg("KRW", "2s5s", TenorLeg { days: 1825, dv01: 800.0 });
        agg.add_leg("KRW", "KTB 3y", TenorLeg { days: 1000, dv01: 300.0 });
        agg.add_leg("KRW", "KTB 3y", TenorLeg { days: 0, dv01: 0.0 });
        agg.add_leg("USD", "6m5y", TenorLeg { days: 181, dv01: -500.0 });
        agg.finish()
    }

    fn as_of() -> Date {
        Date::from_ymd(2026, 10, 19).unwrap()
    }

    #[test]
    fn test_figure_categories_in_rank_order() {
        let figure = ChartRenderer::default().figure(&risk(), "KRW").unwrap();
        let categories = figure["layout"]["xaxis"]["categoryarray"].clone();
        assert_eq!(categories, json!(["1W", "2Y", "3Y", "5Y"]));
    }

    #[test]
    fn test_one_bar_trace_per_trade_name_plus_net() {
        let figure = ChartRenderer::default().figure(&risk(), "KRW").unwrap();
        let data = figure["data"].as_array().unwrap();
        assert_eq!(data.len(), 3);
        assert_eq!(data[0]["name"], "2s5s");
        assert_eq!(data[1]["name"], "KTB 3y");
        assert_eq!(data[2]["type"], "scatter");
        assert_eq!(data[2]["name"], "KRW");
        assert_eq!(data[2]["y"], json!([0.0, -1200.0, 300.0, 800.0]));
        assert_eq!(
            data[2]["textfont"]["color"],
            json!(["darkgreen", "darkred", "darkgreen", "darkgreen"])
        );
    }

    #[test]
    fn test_unknown_currency_is_error() {
        let err = ChartRenderer::default().figure(&risk(), "JPY").unwrap_err();
        assert!(matches!(err, SinkError::EmptyCurrency(_)));
    }

    #[test]
    fn test_report_has_fragment_per_currency() {
        let report = ChartRenderer::default().report(&risk(), as_of()).unwrap();
        assert_eq!(report.report_id, "KTB_2026-10-19");
        assert_eq!(report.mode, WriteMode::Append);
        assert_eq!(report.content.matches("Plotly.newPlot").count(), 2);
        let krw = report.content.find("ktb-KRW-2026-10-19").unwrap();
        let usd = report.content.find("ktb-USD-2026-10-19").unwrap();
        assert!(krw < usd);
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let renderer = ChartRenderer::default();
        let a = renderer.html_fragment(&risk(), "KRW", as_of()).unwrap();
        let b = renderer.html_fragment(&risk(), "KRW", as_of()).unwrap();
        assert_eq!(a, b);
    }
}
