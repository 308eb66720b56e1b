//! Display labels per language.
//!
//! Pure data. The pipeline never sees these; front-ends look up a `Labels` table
//! at render time from the session's `Language`.

use crate::domain::Language;

#[derive(Debug)]
pub struct Labels {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub data_controls: &'static str,
    pub yoy_threshold: &'static str,
    pub mom_threshold: &'static str,
    pub alert_rule: &'static str,
    pub kpi_food_latest: &'static str,
    pub kpi_food_yoy: &'static str,
    pub kpi_food_mom: &'static str,
    pub tab_trend: &'static str,
    pub tab_changes: &'static str,
    pub tab_alerts: &'static str,
    pub trend_title: &'static str,
    pub changes_title: &'static str,
    pub alerts_intro: &'static str,
    pub no_alerts: &'static str,
    pub col_date: &'static str,
    pub col_food_cpi: &'static str,
    pub col_general_cpi: &'static str,
    pub col_food_yoy: &'static str,
    pub col_food_mom: &'static str,
    pub col_heat: &'static str,
    pub source: &'static str,
    pub latest_as_of: &'static str,
    pub language: &'static str,
    pub footer_help: &'static str,
    pub footer_note: &'static str,
}

static EN: Labels = Labels {
    title: "OpenCompete – KSA Food & Retail Competition Dashboard",
    subtitle: "Saudi Food CPI & General CPI",
    data_controls: "Data Controls",
    yoy_threshold: "YoY threshold (%)",
    mom_threshold: "MoM threshold (%)",
    alert_rule: "Alerts trigger when both YoY and MoM exceed thresholds.",
    kpi_food_latest: "Food CPI (latest)",
    kpi_food_yoy: "Food CPI YoY %",
    kpi_food_mom: "Food CPI MoM %",
    tab_trend: "Trend",
    tab_changes: "Changes",
    tab_alerts: "Alerts",
    trend_title: "CPI Trend (Food vs General)",
    changes_title: "Food CPI – YoY and MoM Changes",
    alerts_intro: "Rows flagged where both YoY and MoM exceed thresholds:",
    no_alerts: "No months exceed both thresholds.",
    col_date: "Date",
    col_food_cpi: "Food CPI",
    col_general_cpi: "General CPI",
    col_food_yoy: "Food CPI YoY %",
    col_food_mom: "Food CPI MoM %",
    col_heat: "Heat",
    source: "Source",
    latest_as_of: "Latest",
    language: "Language",
    footer_help: "Tab/1-3 tabs  ↑/↓ select  ←/→ adjust  l language  r reload  q quit",
    footer_note: "Data: FAOSTAT/HDX (Saudi), GASTAT (context).",
};

static AR: Labels = Labels {
    title: "أوبن كومبيت – لوحة المنافسة في الغذاء والتجزئة بالمملكة",
    subtitle: "مؤشر أسعار الغذاء والمؤشر العام للمملكة العربية السعودية",
    data_controls: "إعدادات البيانات",
    yoy_threshold: "حد التغير السنوي (%)",
    mom_threshold: "حد التغير الشهري (%)",
    alert_rule: "يتم التنبيه عندما يتجاوز التغيران السنوي والشهري الحدين معاً.",
    kpi_food_latest: "مؤشر أسعار الغذاء (الأحدث)",
    kpi_food_yoy: "التغير السنوي للغذاء %",
    kpi_food_mom: "التغير الشهري للغذاء %",
    tab_trend: "الاتجاه",
    tab_changes: "التغيرات",
    tab_alerts: "التنبيهات",
    trend_title: "اتجاه المؤشر (الغذاء مقابل العام)",
    changes_title: "مؤشر الغذاء – التغير السنوي والشهري",
    alerts_intro: "الأشهر التي تجاوز فيها التغيران السنوي والشهري الحدين:",
    no_alerts: "لا توجد أشهر تتجاوز الحدين معاً.",
    col_date: "التاريخ",
    col_food_cpi: "مؤشر الغذاء",
    col_general_cpi: "المؤشر العام",
    col_food_yoy: "سنوي %",
    col_food_mom: "شهري %",
    col_heat: "الحرارة",
    source: "المصدر",
    latest_as_of: "الأحدث",
    language: "اللغة",
    footer_help: "Tab/1-3 التبويبات  ↑/↓ اختيار  ←/→ تعديل  l اللغة  r تحديث  q خروج",
    footer_note: "البيانات: فاوستات/HDX (السعودية)، الهيئة العامة للإحصاء (سياق).",
};

pub fn labels(language: Language) -> &'static Labels {
    match language {
        Language::En => &EN,
        Language::Ar => &AR,
    }
}
