//! Chart generation and rendering for the dashboard.
//!
//! Both charts cover all of the user's expenses, not just the filtered ones:
//! - **Spending by category**: bar chart of category totals
//! - **Spending by day**: line chart of day totals
//!
//! Each chart is generated as JSON configuration for the ECharts library and
//! rendered with a container and a script that initializes it.

use charming::{
    Chart,
    component::{Axis, Grid, Title},
    element::{AxisLabel, AxisPointer, AxisPointerType, AxisType, JsFunction, Tooltip, Trigger},
    series::{Line, bar},
};
use maud::{Markup, PreEscaped, html};
use time::Date;

use crate::html::HeadElement;

/// Where the ECharts library is loaded from.
pub(super) const ECHARTS_SCRIPT_URL: &str =
    "https://cdn.jsdelivr.net/npm/echarts@6.0.0/dist/echarts.min.js";

/// A dashboard chart with its HTML container ID and ECharts configuration.
pub(super) struct DashboardChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

/// Renders the HTML containers for dashboard charts.
pub(super) fn charts_view(charts: &[DashboardChart]) -> Markup {
    html!(
        section
            id="charts"
            class="w-full mx-auto mb-4"
        {
            div class="grid grid-cols-1 xl:grid-cols-2 gap-4"
            {
                @for chart in charts {
                    div
                        id=(chart.id)
                        class="min-h-[380px] rounded dark:bg-gray-100"
                    {}
                }
            }
        }
    )
}

/// Generates the script that initializes each chart once the page has loaded.
pub(super) fn charts_script(charts: &[DashboardChart]) -> HeadElement {
    let script_content = charts
        .iter()
        .map(|chart| {
            format!(
                r#"(function() {{
                    const chart = echarts.init(document.getElementById("{}"));
                    chart.setOption({});
                    window.addEventListener('resize', chart.resize);
                }})();"#,
                chart.id, chart.options
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    HeadElement::ScriptSource(PreEscaped(format!(
        "document.addEventListener('DOMContentLoaded', function() {{\n{script_content}\n}});"
    )))
}

pub(super) fn category_chart(category_totals: &[(String, f64)]) -> Chart {
    let (labels, values): (Vec<String>, Vec<f64>) = category_totals.iter().cloned().unzip();

    Chart::new()
        .title(Title::new().text("Spending by category").subtext("All expenses"))
        .tooltip(currency_tooltip())
        .grid(chart_grid())
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        )
        .series(bar::Bar::new().name("Spent").data(values))
}

pub(super) fn day_chart(day_totals: &[(Date, f64)]) -> Chart {
    let labels = day_totals
        .iter()
        .map(|(date, _)| date.to_string())
        .collect::<Vec<_>>();
    let values = day_totals
        .iter()
        .map(|(_, total)| *total)
        .collect::<Vec<_>>();

    Chart::new()
        .title(Title::new().text("Spending by day").subtext("All expenses"))
        .tooltip(currency_tooltip())
        .grid(chart_grid())
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        )
        .series(Line::new().name("Spent").data(values))
}

fn chart_grid() -> Grid {
    Grid::new()
        .left("3%")
        .right("4%")
        .bottom("3%")
        .contain_label(true)
}

#[inline]
fn currency_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const currencyFormatter = new Intl.NumberFormat('en-US', {
              style: 'currency',
              currency: 'USD'
            });
            return (number) ? currencyFormatter.format(number) : \"-\";",
    )
}

/// Creates a tooltip configuration for currency values
fn currency_tooltip() -> Tooltip {
    Tooltip::new()
        .trigger(Trigger::Axis)
        .value_formatter(currency_formatter())
        .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow))
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::{DashboardChart, category_chart, charts_script, day_chart};
    use crate::html::HeadElement;

    #[test]
    fn category_chart_uses_names_as_labels() {
        let options =
            category_chart(&[("Food".to_owned(), 5.75), ("Rent".to_owned(), 900.0)]).to_string();

        assert!(options.contains("\"Food\""));
        assert!(options.contains("\"Rent\""));
        assert!(options.contains("5.75"));
    }

    #[test]
    fn day_chart_uses_iso_dates_as_labels() {
        let options = day_chart(&[(date!(2024 - 01 - 03), 4.0)]).to_string();

        assert!(options.contains("\"2024-01-03\""));
    }

    #[test]
    fn script_initializes_every_chart() {
        let charts = [
            DashboardChart {
                id: "first-chart",
                options: "{}".to_owned(),
            },
            DashboardChart {
                id: "second-chart",
                options: "{}".to_owned(),
            },
        ];

        let HeadElement::ScriptSource(script) = charts_script(&charts) else {
            panic!("want inline script");
        };

        assert!(script.0.contains("getElementById(\"first-chart\")"));
        assert!(script.0.contains("getElementById(\"second-chart\")"));
    }
}
