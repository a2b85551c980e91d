use super::KpiStore;

const RULE: &str = "============================================================";

/// Human-readable KPI summary for terminals and logs.
pub fn summary_report(store: &KpiStore) -> String {
    let mut lines = vec![
        RULE.to_string(),
        "KPI REPORT - BUSINESS ANALYTICS".to_string(),
        RULE.to_string(),
    ];

    if let Some(nps) = store.nps() {
        lines.push(String::new());
        lines.push(format!("NPS (Net Promoter Score): {}", nps.value));
        lines.push(format!(
            "  Promoters: {} ({}%)",
            nps.promoters, nps.pct_promoters
        ));
        lines.push(format!(
            "  Detractors: {} ({}%)",
            nps.detractors, nps.pct_detractors
        ));
    }

    if let Some(csat) = store.csat() {
        lines.push(String::new());
        lines.push(format!("CSAT: {}%", csat.value));
        lines.push(format!(
            "  Satisfied: {}/{}",
            csat.satisfied, csat.total_responses
        ));
    }

    if let Some(rate) = store.conversion_rate() {
        lines.push(String::new());
        lines.push(format!("Conversion rate: {}%", rate.value));
        lines.push(format!("  Conversions: {}", rate.conversions));
        lines.push(format!("  Visitors: {}", rate.visitors));
    }

    if let Some(sales) = store.sales() {
        lines.push(String::new());
        lines.push("Sales:".to_string());
        lines.push(format!("  Total: ${:.2}", sales.total));
        lines.push(format!("  Average: ${:.2}", sales.average));
        if let Some(growth) = sales.growth {
            lines.push(format!("  Growth: {growth:.2}%"));
        }
    }

    lines.push(RULE.to_string());
    lines.join("\n")
}
