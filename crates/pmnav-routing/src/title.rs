//! Human-readable labels and page titles

use pmnav_model::{NavParams, ViewId};

/// Menu label for a view
///
/// Unknown views fall back to their raw id with the first letter capitalized.
#[must_use]
pub fn view_label(view: &ViewId) -> String {
    match view {
        ViewId::Dashboard => "Dashboard".to_string(),
        ViewId::Projects => "Projects".to_string(),
        ViewId::ProjectDetail => "Project Details".to_string(),
        ViewId::Resources => "Resource Management".to_string(),
        ViewId::Risks => "Risk Register".to_string(),
        ViewId::Gantt => "Work Plan".to_string(),
        ViewId::Reports => "Reports".to_string(),
        ViewId::Settings => "Settings".to_string(),
        ViewId::Backlog => "Backlog".to_string(),
        ViewId::AiChat => "AI Assistant".to_string(),
        ViewId::Other(raw) => capitalize(raw),
    }
}

/// Title for a navigation, taking identifying parameters into account
#[must_use]
pub fn page_title(view: &ViewId, params: &NavParams) -> String {
    match view {
        ViewId::ProjectDetail => {
            if let Some(name) = params.get("name") {
                format!("Project: {name}")
            } else if let Some(id) = params.get("id") {
                format!("Project #{id}")
            } else {
                view_label(view)
            }
        }
        _ => view_label(view),
    }
}

fn capitalize(raw: &str) -> String {
    let mut chars = raw.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_views_have_labels() {
        assert_eq!(view_label(&ViewId::Gantt), "Work Plan");
        assert_eq!(view_label(&ViewId::AiChat), "AI Assistant");
    }

    #[test]
    fn unknown_view_is_capitalized() {
        assert_eq!(view_label(&ViewId::parse("timesheets")), "Timesheets");
        assert_eq!(view_label(&ViewId::parse("")), "");
    }

    #[test]
    fn project_detail_prefers_name_then_id() {
        let by_id = NavParams::new().with("id", 7_i64);
        assert_eq!(page_title(&ViewId::ProjectDetail, &by_id), "Project #7");

        let by_name = by_id.with("name", "Apollo");
        assert_eq!(page_title(&ViewId::ProjectDetail, &by_name), "Project: Apollo");

        assert_eq!(page_title(&ViewId::ProjectDetail, &NavParams::new()), "Project Details");
    }
}
