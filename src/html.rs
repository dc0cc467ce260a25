//! HTML helpers on top of `scraper`: element lookup in document order and a
//! reader that turns every `<table>` of a page into rows of cell text.

use scraper::{ElementRef, Html};

/// One cell of a table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlCell {
    /// Cell text, trimmed, with newlines and whitespace runs collapsed.
    pub text: String,
    /// Whether the cell was a `<th>`.
    pub header: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HtmlRow {
    pub cells: Vec<HtmlCell>,
}

impl HtmlRow {
    pub fn cell(&self, index: usize) -> Option<&str> {
        self.cells.get(index).map(|c| c.text.as_str())
    }

    /// The row's first cell, read as a row label.
    pub fn label(&self) -> Option<&str> {
        self.cell(0)
    }

    /// Every cell after the label.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().skip(1).map(|c| c.text.as_str())
    }

    pub fn is_header(&self) -> bool {
        !self.cells.is_empty() && self.cells.iter().all(|c| c.header)
    }
}

/// A table read into rows. Only the table's own rows are included; rows of
/// nested tables belong to those tables.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HtmlTable {
    pub rows: Vec<HtmlRow>,
}

impl HtmlTable {
    /// Rows after skipping `skip` leading rows and then any leading header rows.
    pub fn data_rows(&self, skip: usize) -> &[HtmlRow] {
        let rest = self.rows.get(skip..).unwrap_or(&[]);
        let headers = rest.iter().take_while(|r| r.is_header()).count();
        &rest[headers..]
    }

    /// The second cell of the first row labelled `label`.
    pub fn labelled_value(&self, label: &str) -> Option<&str> {
        self.rows
            .iter()
            .find(|r| r.label() == Some(label))
            .and_then(|r| r.cell(1))
    }

    fn has_text(&self) -> bool {
        self.rows
            .iter()
            .any(|r| r.cells.iter().any(|c| !c.text.is_empty()))
    }
}

/// Reads every table of `html`, in document order, skipping tables without
/// any text. `colspan` cells are repeated across the columns they span.
pub fn read_tables(html: &str) -> Vec<HtmlTable> {
    let document = Html::parse_document(html);
    elements_named(document.root_element(), "table")
        .map(read_table)
        .filter(HtmlTable::has_text)
        .collect()
}

fn read_table(table: ElementRef<'_>) -> HtmlTable {
    let rows = own_rows(table)
        .map(|tr| {
            let mut cells = Vec::new();
            for cell in child_elements(tr) {
                let header = match cell.value().name() {
                    "th" => true,
                    "td" => false,
                    _ => continue,
                };
                let span = cell
                    .value()
                    .attr("colspan")
                    .and_then(|v| v.trim().parse::<usize>().ok())
                    .unwrap_or(1)
                    .clamp(1, 1000);
                let text = cell_text(cell);
                for _ in 1..span {
                    cells.push(HtmlCell {
                        text: text.clone(),
                        header,
                    });
                }
                cells.push(HtmlCell { text, header });
            }
            HtmlRow { cells }
        })
        .collect();
    HtmlTable { rows }
}

fn own_rows<'a>(table: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    child_elements(table).flat_map(|child| -> Vec<ElementRef<'a>> {
        match child.value().name() {
            "tr" => vec![child],
            "thead" | "tbody" | "tfoot" => child_elements(child)
                .filter(|e| e.value().name() == "tr")
                .collect(),
            _ => Vec::new(),
        }
    })
}

fn child_elements<'a>(element: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    element.children().filter_map(ElementRef::wrap)
}

/// Every element named `name` under `root` (inclusive), in document order.
pub(crate) fn elements_named<'a>(
    root: ElementRef<'a>,
    name: &'static str,
) -> impl Iterator<Item = ElementRef<'a>> {
    root.descendants()
        .filter_map(ElementRef::wrap)
        .filter(move |e| e.value().name() == name)
}

/// Concatenated text of an element, untouched.
pub(crate) fn raw_text(element: ElementRef<'_>) -> String {
    element.text().collect()
}

/// Element text with newlines and whitespace runs collapsed to one space,
/// then trimmed. Single non-ASCII spaces inside the text are kept.
pub(crate) fn cell_text(element: ElementRef<'_>) -> String {
    normalize_text(&raw_text(element))
}

pub(crate) fn normalize_text(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut run = String::new();
    for c in raw.chars() {
        if c.is_whitespace() {
            run.push(c);
            continue;
        }
        flush_whitespace(&mut out, &mut run);
        out.push(c);
    }
    out.trim().to_string()
}

fn flush_whitespace(out: &mut String, run: &mut String) {
    if run.is_empty() {
        return;
    }
    if run.chars().count() > 1 || run.contains(['\r', '\n']) {
        out.push(' ');
    } else {
        out.push_str(run);
    }
    run.clear();
}
