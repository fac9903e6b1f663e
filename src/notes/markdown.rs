use super::group::GroupedIssues;
use crate::models::issue::Issue;
use crate::models::site::JiraSite;

const UNASSIGNED: &str = "Unassigned";

/// Makes free text safe to interpolate into Markdown.
///
/// `'` becomes `&#39;`, and each of ``[ ] ( ) _ * ` ~`` gets a backslash.
/// Run it exactly once per field; URLs must not go through it.
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\'' => escaped.push_str("&#39;"),
            '[' | ']' | '(' | ')' | '_' | '*' | '`' | '~' => {
                escaped.push('\\');
                escaped.push(c);
            }
            _ => escaped.push(c),
        }
    }
    escaped
}

pub fn render_issue_line(issue: &Issue, site: &JiraSite) -> String {
    format!(
        "[{}]({}) {} - {}",
        escape(&issue.key),
        site.browse_url(&issue.key),
        escape(&issue.fields.summary),
        escape(issue.assignee_name().unwrap_or(UNASSIGNED))
    )
}

pub fn render_markdown(groups: &GroupedIssues, title: &str, site: &JiraSite) -> String {
    if groups.is_empty() {
        return format!("# {}\n\n", title);
    }

    let body = groups
        .iter()
        .map(|group| {
            let lines = group
                .issues
                .iter()
                .map(|issue| render_issue_line(issue, site))
                .collect::<Vec<_>>()
                .join("\n\n");
            format!("## {}\n{}", escape(&group.name), lines)
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    format!("# {}\n\n{}", title, body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::issue::issue;
    use crate::notes::group::group_by_project;
    use crate::query::{build_filter_query, build_query_title, FilterMode};

    fn site() -> JiraSite {
        JiraSite::new("pfinder")
    }

    #[test]
    fn test_escape_quote_and_parens() {
        assert_eq!(escape("It's (great)"), "It&#39;s \\(great\\)");
    }

    #[test]
    fn test_escape_all_special_chars() {
        assert_eq!(
            escape("[a](b) _c_ *d* `e` ~f~"),
            "\\[a\\]\\(b\\) \\_c\\_ \\*d\\* \\`e\\` \\~f\\~"
        );
    }

    #[test]
    fn test_escape_plain_text_is_unchanged() {
        let plain = "Update new rega fields alignments 100% #42 <ok>";
        assert_eq!(escape(plain), plain);
        assert_eq!(escape(&escape(plain)), plain);
        assert_eq!(escape(""), "");
    }

    #[test]
    fn test_escape_non_ascii() {
        assert_eq!(escape("Çağrı's_fix 🚀"), "Çağrı&#39;s\\_fix 🚀");
    }

    #[test]
    fn test_scenario_single_unassigned_issue() {
        let query = build_filter_query("NA, CX", "Android", None, FilterMode::Component);
        let title = build_query_title("pfinder", "NA, CX", &query, "Android").unwrap();
        let groups = group_by_project(vec![issue("NA-1", Some("Native Apps"), "Fix crash", None)]).unwrap();

        let doc = render_markdown(&groups, &title, &site());

        assert_eq!(doc.matches("## ").count(), 1);
        assert!(doc.contains("## Native Apps\n"));
        assert_eq!(
            doc.lines()
                .filter(|l| *l == "[NA-1](https://pfinder.atlassian.net/browse/NA-1) Fix crash - Unassigned")
                .count(),
            1
        );
        assert!(doc.starts_with(&format!("# {}\n\n", title)));
    }

    #[test]
    fn test_empty_result_renders_title_only() {
        let groups = group_by_project(Vec::new()).unwrap();
        let doc = render_markdown(&groups, "Release", &site());
        assert_eq!(doc, "# Release\n\n");
        assert!(!doc.contains("##"));
    }

    #[test]
    fn test_summary_with_parens_is_escaped() {
        let groups = group_by_project(vec![issue("NA-5", Some("Native Apps"), "50% off (sale)", Some("Ada"))]).unwrap();
        let doc = render_markdown(&groups, "T", &site());
        assert!(doc.contains(") 50% off \\(sale\\) - Ada"));
        assert!(!doc.contains(" (sale)"));
    }

    #[test]
    fn test_full_document_layout() {
        let groups = group_by_project(vec![
            issue("NA-1", Some("Native Apps"), "First", Some("Murat Varol")),
            issue("CX-1", Some("Customer_Experience"), "Second", None),
            issue("NA-2", Some("Native Apps"), "Third", None),
        ])
        .unwrap();

        let doc = render_markdown(&groups, "Title", &site());
        let expected = "# Title\n\n\
## Native Apps\n\
[NA-1](https://pfinder.atlassian.net/browse/NA-1) First - Murat Varol\n\n\
[NA-2](https://pfinder.atlassian.net/browse/NA-2) Third - Unassigned\n\n\
## Customer\\_Experience\n\
[CX-1](https://pfinder.atlassian.net/browse/CX-1) Second - Unassigned";
        assert_eq!(doc, expected);
    }

    #[test]
    fn test_key_escaped_in_text_but_not_in_url() {
        let line = render_issue_line(&issue("NA_X-1", Some("P"), "s", Some("O'Brien")), &site());
        assert_eq!(
            line,
            "[NA\\_X-1](https://pfinder.atlassian.net/browse/NA_X-1) s - O&#39;Brien"
        );
    }
}
