use analytics::DashboardContext;

const INDEX_TEMPLATE: &str = include_str!("../assets/index.html");
pub const DASHBOARD_JS: &str = include_str!("../assets/dashboard.js");

const DEFAULT_TITLE: &str = "Dashboard";

/// Renders the dashboard page, filling in the title and the client config.
pub fn render(context: &DashboardContext) -> Result<String, serde_json::Error> {
    let config_json = serde_json::to_string(&context.client_config())?;
    let title = context.config().title.as_deref().unwrap_or(DEFAULT_TITLE);

    Ok(INDEX_TEMPLATE
        .replace("{{TITLE}}", &escape_html(title))
        // `</` would close the surrounding script element.
        .replace("{{CONFIG_JSON}}", &config_json.replace("</", "<\\/")))
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup_in_titles() {
        assert_eq!(escape_html("Q1 <Sales> & \"Ops\""), "Q1 &lt;Sales&gt; &amp; &quot;Ops&quot;");
    }
}
