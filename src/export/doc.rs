//! Word-compatible HTML documents.
//!
//! Word opens an HTML body wrapped in its legacy Office namespaces as a
//! regular document, which is all the `.doc` export needs.

use crate::ai::Record;
use crate::wizard::{ArtifactRef, Field, Session, StepId};

/// Opening markup of a Word HTML document.
pub const WORD_HEADER: &str = "<html xmlns:o='urn:schemas-microsoft-com:office:office' \
xmlns:w='urn:schemas-microsoft-com:office:word' \
xmlns='http://www.w3.org/TR/REC-html40'><head><meta charset='utf-8'>\
<title>Export HTML to Word Document</title></head><body>";

/// Closing markup of a Word HTML document.
pub const WORD_FOOTER: &str = "</body></html>";

/// Wrap a markup fragment into a Word document.
pub fn wrap_word(fragment: &str) -> String {
    format!("{WORD_HEADER}{fragment}{WORD_FOOTER}")
}

/// Markup fragment for one artifact.
pub fn artifact_html(artifact: ArtifactRef<'_>) -> String {
    match artifact {
        ArtifactRef::Text(text) => text_html(text),
        ArtifactRef::Voc(items) => records_html(items),
        ArtifactRef::Faq(items) => records_html(items),
    }
}

/// Fragment describing the whole session: every step with its inputs and
/// its artifact, in step order.
pub fn session_report_html(session: &Session) -> String {
    let lang = session.language();
    let mut out = String::new();

    out.push_str("<h1>FRONT</h1>");
    for step in StepId::ALL {
        out.push_str(&format!("<h2>{}. {}</h2>", step.number(), html_escape(step.label(lang))));

        let fields: Vec<&Field> =
            step.fields().iter().filter(|f| !session.field(**f).trim().is_empty()).collect();
        if !fields.is_empty() {
            out.push_str("<dl>");
            for field in fields {
                out.push_str(&format!(
                    "<dt>{}</dt><dd>{}</dd>",
                    html_escape(field.label(lang)),
                    html_escape(session.field(*field)).replace('\n', "<br>")
                ));
            }
            out.push_str("</dl>");
        }

        if step == StepId::Dashboard && !session.dashboard.selected_kpis.is_empty() {
            out.push_str("<ul>");
            for kpi in &session.dashboard.selected_kpis {
                out.push_str(&format!("<li>{}</li>", html_escape(kpi.label(lang))));
            }
            out.push_str("</ul>");
        }

        if let Some(artifact) = session.artifact(step) {
            out.push_str(&artifact_html(artifact));
        }
    }

    out
}

fn text_html(text: &str) -> String {
    text.split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| format!("<p>{}</p>", html_escape(p).replace('\n', "<br>")))
        .collect()
}

fn records_html<R: Record>(records: &[R]) -> String {
    let mut out = String::from("<table border='1'><tr>");
    for name in R::FIELDS {
        out.push_str(&format!("<th>{}</th>", html_escape(name)));
    }
    out.push_str("</tr>");

    for record in records {
        out.push_str("<tr>");
        for value in record.values() {
            out.push_str(&format!("<td>{}</td>", html_escape(value)));
        }
        out.push_str("</tr>");
    }

    out.push_str("</table>");
    out
}

/// Escape HTML special characters.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;").replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{GenerationResult, VocItem};
    use crate::wizard::{Kpi, Language};

    #[test]
    fn test_wrap_word() {
        let doc = wrap_word("<p>x</p>");
        assert!(doc.starts_with("<html xmlns:o='urn:schemas-microsoft-com:office:office'"));
        assert!(doc.contains("<title>Export HTML to Word Document</title></head><body><p>x</p>"));
        assert!(doc.ends_with("</body></html>"));
    }

    #[test]
    fn test_text_paragraphs_are_escaped() {
        let html = artifact_html(ArtifactRef::Text("Fast & kind\n<always>\n\nSecond"));
        assert_eq!(html, "<p>Fast &amp; kind<br>&lt;always&gt;</p><p>Second</p>");
    }

    #[test]
    fn test_records_render_as_table() {
        let items = [VocItem {
            problem: "Late".to_string(),
            cause: "Courier".to_string(),
            response: "Sorry".to_string(),
            system_action: "Track".to_string(),
        }];
        let html = artifact_html(ArtifactRef::Voc(&items));
        assert!(html.contains("<th>systemAction</th>"));
        assert!(html.contains("<td>Courier</td>"));
    }

    #[test]
    fn test_session_report_lists_inputs_and_artifacts() {
        let mut session = Session::new(Language::En);
        session.set_field(Field::Feeling, "calm");
        session.dashboard.selected_kpis = vec![Kpi::Nps];
        session
            .store_artifact(StepId::Diagnosis, GenerationResult::Text("Our mission".into()))
            .unwrap();

        let html = session_report_html(&session);
        assert!(html.contains("<h2>1. Diagnosis</h2>"));
        assert!(html.contains("<dd>calm</dd>"));
        assert!(html.contains("<p>Our mission</p>"));
        assert!(html.contains("<h2>9. Strategy</h2>"));
        assert!(html.contains("<li>"));
    }
}
