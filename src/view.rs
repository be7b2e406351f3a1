//! HTML pages. All user-supplied or stored text is escaped with `ammonia::clean_text`.

use ammonia::clean_text;

use crate::domain::EmailRecord;

const STYLE: &str = "body{font-family:sans-serif;max-width:48rem;margin:2rem auto;padding:0 1rem}\
textarea{width:100%;min-height:10rem}\
table{border-collapse:collapse;width:100%}\
td,th{border:1px solid #ccc;padding:.4rem;text-align:left;vertical-align:top}\
.result{font-size:1.2rem;margin-top:1rem}\
.error{color:#a00}";

/// Values echoed back on the home page.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct HomeView {
    pub result: Option<String>,
    pub confidence: Option<String>,
    pub email_text: String,
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n{body}\n</body>\n</html>\n"
    )
}

#[must_use]
pub fn render_home(view: &HomeView) -> String {
    let mut body = String::from(
        "<h1>Spam Checker</h1>\n\
         <form method=\"post\" action=\"/\">\n\
         <textarea name=\"email_text\" placeholder=\"Paste the email text here\">",
    );
    body.push_str(&clean_text(&view.email_text));
    body.push_str(
        "</textarea>\n<p><button type=\"submit\">Check</button> \
         <a href=\"/history\">History</a></p>\n</form>\n",
    );

    if let Some(result) = &view.result {
        body.push_str("<div class=\"result\">\n<p id=\"result\">");
        body.push_str(&clean_text(result));
        body.push_str("</p>\n");
        if let Some(confidence) = &view.confidence {
            body.push_str("<p id=\"confidence\">Confidence: ");
            body.push_str(&clean_text(confidence));
            body.push_str("</p>\n");
        }
        body.push_str("</div>\n");
    }

    layout("Spam Checker", &body)
}

#[must_use]
pub fn render_history(records: &[EmailRecord], error: Option<&str>) -> String {
    let mut body = String::from("<h1>Classification History</h1>\n<p><a href=\"/\">Back</a></p>\n");

    if let Some(error) = error {
        body.push_str("<p class=\"error\">");
        body.push_str(&clean_text(error));
        body.push_str("</p>\n");
    }

    body.push_str(
        "<table>\n<thead><tr><th>#</th><th>Email</th><th>Result</th>\
         <th>Confidence</th><th>Checked at</th></tr></thead>\n<tbody>\n",
    );
    if records.is_empty() {
        body.push_str("<tr><td colspan=\"5\">No classifications yet</td></tr>\n");
    }
    for record in records {
        body.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            record.id,
            clean_text(&record.email_text),
            clean_text(&record.result),
            record.confidence.as_deref().map(clean_text).unwrap_or_default(),
            record.created_at.format("%Y-%m-%d %H:%M:%S"),
        ));
    }
    body.push_str("</tbody>\n</table>\n");

    layout("Classification History", &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(id: i64, text: &str) -> EmailRecord {
        EmailRecord {
            id,
            email_text: text.to_string(),
            result: "✅ Not Spam (Embedding LR)".to_string(),
            confidence: Some("3.2%".to_string()),
            created_at: NaiveDate::from_ymd_opt(2026, 10, 14)
                .unwrap()
                .and_hms_opt(9, 30, 0)
                .unwrap(),
        }
    }

    #[test]
    fn empty_form_has_no_result_block() {
        let html = render_home(&HomeView::default());
        assert!(html.contains("name=\"email_text\""));
        assert!(!html.contains("id=\"result\""));
    }

    #[test]
    fn echoed_text_is_escaped() {
        let html = render_home(&HomeView {
            result: Some("label".into()),
            confidence: None,
            email_text: "<script>alert(1)</script>".into(),
        });
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("id=\"confidence\""));
    }

    #[test]
    fn result_and_confidence_are_shown() {
        let html = render_home(&HomeView {
            result: Some("spam".into()),
            confidence: Some("99.0%".into()),
            email_text: String::new(),
        });
        assert!(html.contains("<p id=\"result\">spam</p>"));
        assert!(html.contains("99.0%"));
    }

    #[test]
    fn history_lists_every_record() {
        let html = render_history(&[record(1, "hello"), record(2, "<b>bold</b>")], None);
        assert!(html.contains("<td>hello</td>"));
        assert!(html.contains("&lt;b&gt;bold&lt;&#47;b&gt;"));
        assert!(html.contains("2026-10-14 09:30:00"));
        assert!(!html.contains("No classifications yet"));
    }

    #[test]
    fn empty_history_renders_placeholder_row() {
        let html = render_history(&[], None);
        assert!(html.contains("No classifications yet"));
    }

    #[test]
    fn history_error_is_shown() {
        let html = render_history(&[], Some("store unavailable"));
        assert!(html.contains("class=\"error\""));
    }
}
