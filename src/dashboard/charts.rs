//! Chart generation and rendering for the dashboard.
//!
//! This module creates interactive ECharts visualizations for expense data:
//! - **Category Chart**: Share of spending per category
//! - **Daily Expenses Chart**: Stacked bar chart of expenses per date, one series per category
//!
//! Each chart is generated as JSON configuration for the ECharts library and
//! rendered with corresponding HTML containers and JavaScript initialization code.

use charming::{
    Chart,
    component::{Axis, Grid, Legend, Title},
    datatype::DataPoint,
    element::{
        AxisLabel, AxisPointer, AxisPointerType, AxisType, Color, Emphasis, EmphasisFocus,
        JsFunction, Tooltip, Trigger,
    },
    series::{Pie, bar},
};
use maud::{Markup, PreEscaped, html};

use crate::{
    dashboard::aggregation::{CategoryTotal, DateCategorySeries},
    html::HeadElement,
};

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
        div class="grid grid-cols-1 xl:grid-cols-2 gap-4 w-full"
        {
            @for chart in charts {
                div
                    id=(chart.id)
                    class="min-h-[380px] rounded dark:bg-gray-100"
                {}
            }
        }
    )
}

/// Generates JavaScript initialization code for dashboard charts.
///
/// The code runs immediately when the document has already loaded, which is
/// the case when the charts arrive in an HTMX swap.
pub(super) fn charts_script(charts: &[DashboardChart]) -> PreEscaped<String> {
    let script_content = charts
        .iter()
        .map(|chart| {
            format!(
                r#"(function() {{
                    const chartDom = document.getElementById("{}");
                    if (!chartDom || typeof echarts === 'undefined') {{
                        console.warn('Could not create chart "{}"');
                        return;
                    }}
                    const chart = echarts.getInstanceByDom(chartDom) || echarts.init(chartDom);
                    const option = {};
                    chart.setOption(option, true);

                    window.addEventListener('resize', chart.resize);

                    const darkModeMediaQuery = window.matchMedia('(prefers-color-scheme: dark)');
                    const updateTheme = () => {{
                        const isDarkMode = darkModeMediaQuery.matches;
                        chart.setTheme(isDarkMode ? 'dark' : 'default');
                    }}
                    darkModeMediaQuery.addEventListener('change', updateTheme);
                    updateTheme();
                }})();"#,
                chart.id,
                chart.id,
                escape_script_text(&chart.options)
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    PreEscaped(format!(
        "(function() {{\nconst initCharts = function() {{\n{script_content}\n}};\n\
        if (document.readyState === 'loading') {{\n\
            document.addEventListener('DOMContentLoaded', initCharts);\n\
        }} else {{\n\
            initCharts();\n\
        }}\n}})();"
    ))
}

/// Stop text from data, e.g. a category named `</script>`, from ending the
/// inline script element early.
///
/// `<\/` and `<\!` read the same as `</` and `<!` inside JavaScript strings.
fn escape_script_text(text: &str) -> String {
    text.replace("</", r"<\/").replace("<!--", r"<\!--")
}

/// The script tag that loads ECharts.
pub(super) fn echarts_script() -> HeadElement {
    HeadElement::ScriptLink("/static/echarts.6.0.0.min.js".to_owned())
}

/// A pie chart of the total spent in each category.
pub(super) fn category_chart(categories: &[CategoryTotal]) -> Chart {
    let colors: Vec<Color> = categories
        .iter()
        .map(|category| Color::from(category.color.as_str()))
        .collect();
    let data: Vec<(f64, &str)> = categories
        .iter()
        .map(|category| (category.total, category.category.as_str()))
        .collect();

    Chart::new()
        .title(Title::new().text("Spending by Category").left(20).top("1%"))
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Item)
                .value_formatter(currency_formatter()),
        )
        .legend(Legend::new().bottom("1%"))
        .color(colors)
        .series(Pie::new().name("Spending").data(data))
}

/// A stacked bar chart of daily spending, one series per category.
pub(super) fn daily_expenses_chart(series_data: &DateCategorySeries) -> Chart {
    let colors: Vec<Color> = series_data
        .series
        .iter()
        .map(|series| Color::from(series.color.as_str()))
        .collect();

    let mut chart = Chart::new()
        .title(
            Title::new()
                .text("Daily Expenses")
                .subtext("Grouped by category")
                .left(20)
                .top("1%"),
        )
        .tooltip(currency_tooltip())
        .legend(Legend::new().left(250).top("1%"))
        .color(colors)
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .top(90)
                .contain_label(true),
        )
        .x_axis(
            Axis::new()
                .type_(AxisType::Category)
                .data(series_data.labels.clone()),
        )
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        );

    for series in &series_data.series {
        chart = chart.series(
            bar::Bar::new()
                .name(series.category.as_str())
                .stack("Expenses")
                .emphasis(Emphasis::new().focus(EmphasisFocus::Series))
                .data(bar_values(&series.values)),
        );
    }

    chart
}

/// ECharts draws nothing for "-", so dates without expenses leave a gap.
fn bar_values(values: &[Option<f64>]) -> Vec<DataPoint> {
    values
        .iter()
        .map(|value| match value {
            Some(total) => DataPoint::from(*total),
            None => DataPoint::from("-"),
        })
        .collect()
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
