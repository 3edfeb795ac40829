//! Small building blocks shared by the dashboards.

use chrono::{DateTime, NaiveDate, Utc};
use dioxus::prelude::*;
use store::{Injury, InjuryStatus, Severity};
use ui::{Icon, Link, LinkVariant};

#[component]
pub fn StatCard(
    icon: Element,
    title: String,
    value: String,
    #[props(default)] subtitle: String,
    #[props(default = "teal".to_string())] tone: String,
) -> Element {
    rsx! {
        div {
            class: "card stat-card",
            div { class: "stat-icon tone-{tone}", {icon} }
            div { class: "stat-value", "{value}" }
            div { class: "stat-title", "{title}" }
            if !subtitle.is_empty() {
                div { class: "stat-subtitle", "{subtitle}" }
            }
        }
    }
}

/// Placeholder shown while a count is still loading or failed to load.
pub fn count_label(count: Option<u64>) -> String {
    count.map(|c| c.to_string()).unwrap_or_else(|| "-".to_string())
}

#[component]
pub fn SeverityBadge(severity: Severity) -> Element {
    let name = severity.as_str();
    rsx! {
        span { class: "badge badge-severity-{name}", "{name}" }
    }
}

#[component]
pub fn StatusBadge(status: InjuryStatus) -> Element {
    let class = status_class(status);
    let label = status.label();
    rsx! {
        span { class: "badge {class}", "{label}" }
    }
}

fn status_class(status: InjuryStatus) -> &'static str {
    match status {
        InjuryStatus::Reported => "badge-blue",
        InjuryStatus::Assigned => "badge-purple",
        InjuryStatus::InTreatment => "badge-orange",
        InjuryStatus::Recovering => "badge-teal",
        InjuryStatus::Resolved => "badge-green",
    }
}

/// One injury in a list, linking to its detail page.
#[component]
pub fn InjuryRow(injury: Injury, #[props(default = true)] linked: bool) -> Element {
    let reported = format_date(&injury.date_reported);
    let body = rsx! {
        div {
            class: "row-header",
            div {
                h3 { class: "row-title", "{injury.injury_type}" }
                p { class: "muted small", "{injury.body_part}" }
            }
            SeverityBadge { severity: injury.severity }
        }
        div {
            class: "row-meta",
            StatusBadge { status: injury.status }
            span { class: "muted tiny", "{reported}" }
        }
    };

    if linked {
        rsx! {
            Link {
                to: routing::paths::injury_detail(&injury.id),
                variant: LinkVariant::Text,
                class: "list-row",
                {body}
            }
        }
    } else {
        rsx! {
            div { class: "list-row", {body} }
        }
    }
}

#[component]
pub fn EmptyState(icon: Element, message: String) -> Element {
    rsx! {
        div {
            class: "empty-state",
            {icon}
            p { class: "muted", "{message}" }
        }
    }
}

#[component]
pub fn BackLink(#[props(into)] to: String, #[props(into)] label: String) -> Element {
    rsx! {
        Link {
            to,
            variant: LinkVariant::Text,
            class: "back-link",
            Icon { icon: ui::icons::FaArrowLeft, width: 16, height: 16 }
            "{label}"
        }
    }
}

pub fn format_date(at: &DateTime<Utc>) -> String {
    at.format("%d %b %Y").to_string()
}

pub fn format_day(day: &NaiveDate) -> String {
    day.format("%d %b %Y").to_string()
}

pub fn format_time(at: &DateTime<Utc>) -> String {
    at.format("%d %b %Y, %H:%M UTC").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_formats() {
        let at = Utc.with_ymd_and_hms(2025, 3, 7, 14, 5, 0).unwrap();
        assert_eq!(format_date(&at), "07 Mar 2025");
        assert_eq!(format_time(&at), "07 Mar 2025, 14:05 UTC");
        assert_eq!(count_label(None), "-");
        assert_eq!(count_label(Some(12)), "12");
    }
}
