//! Paged-document backend: one A4-landscape PDF per timetable page, built
//! from the PDF base-14 Helvetica faces so no font files are shipped. Rows
//! that overrun the sheet continue on a fresh sheet with the header repeated.

use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfLayerReference};

use crate::error::Error;
use crate::timetable::TimetablePage;

// millimetres, A4 landscape
const PAGE_WIDTH: f64 = 297.0;
const PAGE_HEIGHT: f64 = 210.0;
const MARGIN: f64 = 14.0;
const ROW_STEP: f64 = 6.0;
const STOP_COLUMN_WIDTH: f64 = 80.0;
const STOP_NAME_CHARS: usize = 42;
const HEADER_CHARS: usize = 14;

pub fn render(page: &TimetablePage) -> Result<Vec<u8>, Error> {
    let title = page.title();
    let (doc, first_page, first_layer) = PdfDocument::new(
        &title,
        Mm(PAGE_WIDTH as _),
        Mm(PAGE_HEIGHT as _),
        "timetable",
    );
    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|error| Error::Render(format!("pdf: {error}")))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|error| Error::Render(format!("pdf: {error}")))?;

    let trip_columns = page.headers.len().saturating_sub(1).max(1);
    let column_width = (PAGE_WIDTH - 2.0 * MARGIN - STOP_COLUMN_WIDTH) / trip_columns as f64;

    let mut layer = doc.get_page(first_page).get_layer(first_layer);
    let mut y = PAGE_HEIGHT - MARGIN;

    layer.use_text(&title, 14.0, Mm(MARGIN as _), Mm(y as _), &bold);
    y -= 7.0;
    for line in meta_lines(page) {
        layer.use_text(&line, 10.0, Mm(MARGIN as _), Mm(y as _), &regular);
        y -= 5.0;
    }
    y -= 2.0;

    draw_header_row(&layer, &bold, page, column_width, y);
    y -= ROW_STEP;

    for (row, stop_id) in page.rows.iter().zip(&page.row_stop_ids) {
        if y < MARGIN {
            // sheet is full, continue on a fresh one
            let (sheet, sheet_layer) = doc.add_page(
                Mm(PAGE_WIDTH as _),
                Mm(PAGE_HEIGHT as _),
                "timetable",
            );
            layer = doc.get_page(sheet).get_layer(sheet_layer);
            y = PAGE_HEIGHT - MARGIN;
            draw_header_row(&layer, &bold, page, column_width, y);
            y -= ROW_STEP;
        }

        let mut cells = row.iter();
        if let Some(stop_name) = cells.next() {
            let font = if page.major_stops.contains(stop_id) {
                &bold
            } else {
                &regular
            };
            layer.use_text(
                truncate(stop_name, STOP_NAME_CHARS),
                9.0,
                Mm(MARGIN as _),
                Mm(y as _),
                font,
            );
        }
        for (column, cell) in cells.enumerate() {
            let x = MARGIN + STOP_COLUMN_WIDTH + column as f64 * column_width;
            layer.use_text(cell, 9.0, Mm(x as _), Mm(y as _), &regular);
        }
        y -= ROW_STEP;
    }

    doc.save_to_bytes()
        .map_err(|error| Error::Render(format!("pdf: {error}")))
}

fn draw_header_row(
    layer: &PdfLayerReference,
    bold: &IndirectFontRef,
    page: &TimetablePage,
    column_width: f64,
    y: f64,
) {
    let mut headers = page.headers.iter();
    if let Some(stop_label) = headers.next() {
        layer.use_text(stop_label, 9.0, Mm(MARGIN as _), Mm(y as _), bold);
    }
    for (column, header) in headers.enumerate() {
        let x = MARGIN + STOP_COLUMN_WIDTH + column as f64 * column_width;
        layer.use_text(truncate(header, HEADER_CHARS), 9.0, Mm(x as _), Mm(y as _), bold);
    }
}

fn meta_lines(page: &TimetablePage) -> Vec<String> {
    let mut lines = Vec::new();
    if !page.agency_name.is_empty() {
        lines.push(page.agency_name.clone());
    }
    if !page.summary.days.is_empty() {
        lines.push(format!("Runs {}", page.summary.days));
    }
    if !page.summary.date_range.is_empty() {
        lines.push(format!("Valid {}", page.summary.date_range));
    }
    if let Some(cohort) = &page.cohort {
        lines.push(format!("Service {cohort}"));
    }
    if page.page_count > 1 {
        lines.push(format!("Page {} of {}", page.page_number, page.page_count));
    }
    lines
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let kept: String = text.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::calendar::ServiceSummary;
    use crate::gtfs::Route;
    use std::collections::HashSet;

    #[test]
    fn renders_a_pdf_document() {
        let page = TimetablePage {
            route: Route {
                route_id: "r1".to_string(),
                route_short_name: Some("42".to_string()),
                route_long_name: None,
                route_desc: None,
                agency_id: None,
            },
            agency_name: "City Transit".to_string(),
            headers: vec!["Stop".to_string(), "t1".to_string()],
            rows: vec![vec!["Alpha".to_string(), "08:00".to_string()]],
            row_stop_ids: vec!["a".to_string()],
            major_stops: HashSet::new(),
            summary: ServiceSummary::default(),
            cohort: None,
            page_number: 1,
            page_count: 1,
        };
        let bytes = render(&page).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn truncates_long_labels() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a very long stop name", 10), "a very ...");
    }
}
