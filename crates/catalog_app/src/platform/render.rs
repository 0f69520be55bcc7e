use std::fmt::Write;

use catalog_core::{ListingPhase, ListingViewModel, ToolDetail, ToolRowView, ToolSummary};

const DESCRIPTION_WIDTH: usize = 72;

pub fn listing(view: &ListingViewModel) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", status_line(view));
    if view.phase == ListingPhase::Ready && view.rows.is_empty() {
        let _ = writeln!(out, "No tools found matching your criteria.");
    }
    for (index, row) in view.rows.iter().enumerate() {
        let _ = writeln!(out, "{:>4}. {}", index + 1, row_line(row));
    }
    out
}

pub fn status_line(view: &ListingViewModel) -> String {
    let mut line = match view.phase {
        ListingPhase::Idle => "idle".to_string(),
        ListingPhase::Loading => "loading tools...".to_string(),
        ListingPhase::Ready => {
            let total = view
                .total_count
                .map(|total| format!(" of {total}"))
                .unwrap_or_default();
            format!(
                "{} tools{} (page {})",
                view.rows.len(),
                total,
                view.current_page
            )
        }
        ListingPhase::Errored => "failed to load tools".to_string(),
    };
    if !view.filters.is_empty() {
        let _ = write!(line, " [{}]", describe_filters(view));
    }
    if view.is_loading_more {
        line.push_str(" - loading more...");
    } else if view.has_more {
        line.push_str(" - more available");
    }
    if let Some(error) = &view.error {
        let _ = write!(line, " - error: {error}");
    }
    line
}

fn describe_filters(view: &ListingViewModel) -> String {
    let filters = &view.filters;
    [
        ("search", filters.search()),
        ("category", filters.category()),
        ("price", filters.price_type()),
    ]
    .iter()
    .filter(|(_, value)| !value.is_empty())
    .map(|(name, value)| format!("{name}={value}"))
    .collect::<Vec<_>>()
    .join(", ")
}

fn row_line(row: &ToolRowView) -> String {
    let mut line = format!("{} [{}] {}", row.name, row.category, row.price_type);
    if !row.tags.is_empty() {
        let _ = write!(line, " #{}", row.tags.join(" #"));
    }
    let _ = write!(line, " - {}", truncate(&row.description, DESCRIPTION_WIDTH));
    line
}

pub fn tool_detail(detail: &ToolDetail) -> String {
    let summary = &detail.summary;
    let mut out = String::new();
    let featured = if detail.is_featured { " (featured)" } else { "" };
    let _ = writeln!(out, "{}{}", summary.name, featured);
    let _ = writeln!(out, "  category:   {}", summary.category);
    let _ = writeln!(out, "  pricing:    {}", summary.price_type);
    let _ = writeln!(out, "  website:    {}", detail.website_url);
    if !summary.tags.is_empty() {
        let _ = writeln!(out, "  tags:       {}", summary.tags.join(", "));
    }
    if let Some(created) = &detail.created_at {
        let _ = writeln!(out, "  added:      {created}");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", summary.description);
    out
}

pub fn featured(tools: &[ToolSummary]) -> String {
    let mut out = String::new();
    for tool in tools {
        let _ = writeln!(out, "Featured Tool: {} - {}", tool.name, tool.description);
    }
    out
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let cut: String = text.chars().take(width.saturating_sub(3)).collect();
    format!("{cut}...")
}
