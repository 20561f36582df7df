use leptos::prelude::*;

/// Colored label for an entity status ("running", "online", "error", ...)
#[component]
pub fn StatusBadge(#[prop(into)] status: String, #[prop(into)] label: String) -> impl IntoView {
    let variant = badge_variant(&status);
    view! {
        <span class=format!("badge badge--{}", variant)>{label}</span>
    }
}

pub fn badge_variant(status: &str) -> &'static str {
    match status {
        "finished" | "online" | "ready" | "success" => "success",
        "running" | "pending" | "assigned" | "cloning" | "pulling" => "primary",
        "cancelled" | "abnormal" | "offline" => "warning",
        "error" => "error",
        _ => "neutral",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_badge_variant() {
        assert_eq!(badge_variant("finished"), "success");
        assert_eq!(badge_variant("running"), "primary");
        assert_eq!(badge_variant("error"), "error");
        assert_eq!(badge_variant("whatever"), "neutral");
    }
}
