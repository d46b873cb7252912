//! Static bilingual UI strings.
//!
//! The dashboard ships with Arabic and English label sets. Lookups are plain
//! statics behind [`Lang`]; the aggregation engine never sees these — they
//! are consumed by the report and TUI layers only.

use crate::domain::Lang;

/// The fixed set of UI strings for one language.
///
/// Chart titles carry a `{month}` slot filled by the formatting helpers.
#[derive(Debug, Clone, Copy)]
pub struct Labels {
    pub title: &'static str,
    pub select_year: &'static str,
    pub select_month: &'static str,
    pub line_chart_title: &'static str,
    pub bar_chart_title: &'static str,
    pub pie_chart_title: &'static str,
    pub scatter_chart_title: &'static str,
    pub revenue_label: &'static str,
    pub month_label: &'static str,
    pub year_label: &'static str,
    pub region_label: &'static str,
    pub profit_label: &'static str,
    pub units_sold_label: &'static str,
    pub data_table_title: &'static str,
    pub export_line: &'static str,
    pub export_bar: &'static str,
    pub export_pie: &'static str,
    pub export_scatter: &'static str,
    pub language_label: &'static str,
}

impl Labels {
    pub fn bar_chart_title(&self, month: &str) -> String {
        self.bar_chart_title.replace("{month}", month)
    }

    pub fn pie_chart_title(&self, month: &str) -> String {
        self.pie_chart_title.replace("{month}", month)
    }

    pub fn scatter_chart_title(&self, month: &str) -> String {
        self.scatter_chart_title.replace("{month}", month)
    }
}

static AR: Labels = Labels {
    title: "لوحة معلومات المبيعات",
    select_year: "اختر السنة:",
    select_month: "اختر الشهر:",
    line_chart_title: "اتجاه المبيعات الشهرية",
    bar_chart_title: "مبيعات شهر {month} حسب السنة والمنطقة",
    pie_chart_title: "توزيع المبيعات حسب المنطقة لشهر {month} في السنوات المختارة",
    scatter_chart_title: "الأرباح مقابل الوحدات المباعة لشهر {month} في السنوات المختارة",
    revenue_label: "إجمالي المبيعات",
    month_label: "الشهر",
    year_label: "السنة",
    region_label: "المنطقة",
    profit_label: "الربح",
    units_sold_label: "الوحدات المباعة",
    data_table_title: "بيانات المبيعات الخام",
    export_line: "تصدير الرسم الخطي",
    export_bar: "تصدير الرسم العمودي",
    export_pie: "تصدير الرسم الدائري",
    export_scatter: "تصدير الرسم المبعثر",
    language_label: "اللغة:",
};

static EN: Labels = Labels {
    title: "Sales Dashboard",
    select_year: "Select Year:",
    select_month: "Select Month:",
    line_chart_title: "Monthly Sales Trend",
    bar_chart_title: "Sales for {month} by Year and Region",
    pie_chart_title: "Sales Distribution by Region for {month} in Selected Years",
    scatter_chart_title: "Profit vs. Units Sold for {month} in Selected Years",
    revenue_label: "Total Sales",
    month_label: "Month",
    year_label: "Year",
    region_label: "Region",
    profit_label: "Profit",
    units_sold_label: "Units Sold",
    data_table_title: "Raw Sales Data",
    export_line: "Export Line Chart",
    export_bar: "Export Bar Chart",
    export_pie: "Export Pie Chart",
    export_scatter: "Export Scatter Chart",
    language_label: "Language:",
};

/// Look up the label set for a language.
pub fn labels(lang: Lang) -> &'static Labels {
    match lang {
        Lang::Ar => &AR,
        Lang::En => &EN,
    }
}
