//! Markup backend: one standalone document per timetable page.

use html_escape::encode_text;

use crate::timetable::TimetablePage;

const STYLE: &str = "\
body { font-family: sans-serif; margin: 2em; }
table { border-collapse: collapse; margin-top: 1em; }
th, td { border: 1px solid #999; padding: 0.3em 0.8em; text-align: left; }
thead th { background: #eee; }
tr.major th { font-weight: bold; background: #f5f5f5; }
p.meta { color: #444; margin: 0.2em 0; }
";

pub fn render(page: &TimetablePage) -> String {
    let title = page.title();
    let mut doc = String::new();
    doc.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    doc.push_str(&format!("<title>{}</title>\n", encode_text(&title)));
    doc.push_str(&format!("<style>\n{STYLE}</style>\n</head>\n<body>\n"));
    doc.push_str(&format!("<h1>{}</h1>\n", encode_text(&title)));

    if !page.agency_name.is_empty() {
        doc.push_str(&format!(
            "<p class=\"meta\">{}</p>\n",
            encode_text(&page.agency_name)
        ));
    }
    if let Some(description) = page.route.route_desc.as_deref().filter(|d| !d.is_empty()) {
        doc.push_str(&format!("<p class=\"meta\">{}</p>\n", encode_text(description)));
    }
    if !page.summary.days.is_empty() {
        doc.push_str(&format!(
            "<p class=\"meta\">Runs {}</p>\n",
            encode_text(&page.summary.days)
        ));
    }
    if !page.summary.date_range.is_empty() {
        doc.push_str(&format!(
            "<p class=\"meta\">Valid {}</p>\n",
            encode_text(&page.summary.date_range)
        ));
    }
    if let Some(cohort) = &page.cohort {
        doc.push_str(&format!(
            "<p class=\"meta\">Service {}</p>\n",
            encode_text(cohort)
        ));
    }

    doc.push_str("<table>\n<thead>\n<tr>");
    for header in &page.headers {
        doc.push_str(&format!("<th>{}</th>", encode_text(header)));
    }
    doc.push_str("</tr>\n</thead>\n<tbody>\n");
    for (row, stop_id) in page.rows.iter().zip(&page.row_stop_ids) {
        if page.major_stops.contains(stop_id) {
            doc.push_str("<tr class=\"major\">");
        } else {
            doc.push_str("<tr>");
        }
        let mut cells = row.iter();
        if let Some(stop_name) = cells.next() {
            doc.push_str(&format!("<th scope=\"row\">{}</th>", encode_text(stop_name)));
        }
        for cell in cells {
            doc.push_str(&format!("<td>{}</td>", encode_text(cell)));
        }
        doc.push_str("</tr>\n");
    }
    doc.push_str("</tbody>\n</table>\n");

    if page.page_count > 1 {
        doc.push_str(&format!(
            "<p class=\"meta\">Page {} of {}</p>\n",
            page.page_number, page.page_count
        ));
    }
    doc.push_str("</body>\n</html>\n");
    doc
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::calendar::ServiceSummary;
    use crate::gtfs::Route;
    use std::collections::HashSet;

    #[test]
    fn escapes_and_marks_major_rows() {
        let page = TimetablePage {
            route: Route {
                route_id: "r1".to_string(),
                route_short_name: Some("42".to_string()),
                route_long_name: Some("Loop <east>".to_string()),
                route_desc: None,
                agency_id: None,
            },
            agency_name: "City Transit".to_string(),
            headers: vec!["Stop".to_string(), "t1".to_string()],
            rows: vec![
                vec!["CENTRAL".to_string(), "08:00".to_string()],
                vec!["Side".to_string(), "08:05".to_string()],
            ],
            row_stop_ids: vec!["a".to_string(), "b".to_string()],
            major_stops: HashSet::from(["a".to_string()]),
            summary: ServiceSummary {
                date_range: "01/01/2024 - 31/12/2024".to_string(),
                days: "every day".to_string(),
            },
            cohort: None,
            page_number: 1,
            page_count: 1,
        };
        let doc = render(&page);

        assert!(doc.contains("Loop &lt;east&gt;"));
        assert!(doc.contains("<tr class=\"major\"><th scope=\"row\">CENTRAL</th>"));
        assert!(doc.contains("<td>08:05</td>"));
        assert!(doc.contains("Runs every day"));
        assert!(!doc.contains("Page 1 of 1"));
    }
}
