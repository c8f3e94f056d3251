// src/tables.rs
//
// HTML tables → flattened "Header: value" rows.
//
// Every <table> in the body is read in document order. Its first row gives the
// column headers; each later row holding at least one <td> becomes one TableRow:
//
//   <tr><th>A</th><th>B</th></tr>
//   <tr><td>1</td><td>2</td></tr>      →  "A: 1\nB: 2"
//
// Missing cells render as empty values, cells past the last header are dropped.
// The scan is forgiving: unclosed cells/rows end at the next cell/row/table
// boundary and unclosed tables end with the document. Nested tables are read
// as tables of their own; their text still counts toward the enclosing cell.

use crate::core::html;

/// One data row flattened to `header: value` lines joined by `\n`.
pub type TableRow = String;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellKind {
    Header,
    Data,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cell {
    pub kind: CellKind,
    pub text: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Table {
    rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Rows in document order; rows without any cell are not kept.
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Text of the first row's cells, or `None` for an empty table.
    pub fn headers(&self) -> Option<Vec<&str>> {
        self.rows
            .first()
            .map(|r| r.iter().map(|c| c.text.as_str()).collect())
    }

    /// Data rows zipped against the headers.
    pub fn keyed_rows(&self) -> Vec<TableRow> {
        let Some((head, body)) = self.rows.split_first() else {
            return Vec::new();
        };

        body.iter()
            .filter(|row| row.iter().any(|c| c.kind == CellKind::Data))
            .map(|row| {
                head.iter()
                    .enumerate()
                    .map(|(i, h)| {
                        let value = row.get(i).map_or("", |c| c.text.as_str());
                        join!(&h.text, ": ", value)
                    })
                    .collect::<Vec<_>>()
                    .join("\n")
                    .trim()
                    .to_string()
            })
            .filter(|r| !r.is_empty())
            .collect()
    }
}

/* ---------------- Scanner ---------------- */

// A table whose closing tag has not been seen yet.
struct OpenTable {
    slot: usize,
    rows: Vec<Vec<Cell>>,
    row: Option<Vec<Cell>>,
    // kind + byte offset where the cell content starts
    cell: Option<(CellKind, usize)>,
}

impl OpenTable {
    fn new(slot: usize) -> Self {
        Self { slot, rows: Vec::new(), row: None, cell: None }
    }

    fn close_cell(&mut self, doc: &str, at: usize) {
        if let Some((kind, start)) = self.cell.take() {
            let text = html::strip_tags(doc.get(start..at).unwrap_or(""));
            self.row.get_or_insert_with(Vec::new).push(Cell { kind, text });
        }
    }

    fn close_row(&mut self, doc: &str, at: usize) {
        self.close_cell(doc, at);
        if let Some(row) = self.row.take() {
            if !row.is_empty() {
                self.rows.push(row);
            }
        }
    }

    fn finish(mut self, doc: &str, at: usize, tables: &mut [Table]) {
        self.close_row(doc, at);
        tables[self.slot].rows = self.rows;
    }
}

/// Find every table in `doc`, in order of their opening tags.
pub fn find_tables(doc: &str) -> Vec<Table> {
    let mut tables: Vec<Table> = Vec::new();
    let mut stack: Vec<OpenTable> = Vec::new();

    for tag in html::tags(doc) {
        if tag.is("table") {
            if !tag.closing {
                stack.push(OpenTable::new(tables.len()));
                tables.push(Table::default());
            } else if let Some(open) = stack.pop() {
                open.finish(doc, tag.start, &mut tables);
            } else {
                logd!("tables: stray </table> at byte {}", tag.start);
            }
            continue;
        }

        let Some(top) = stack.last_mut() else { continue };
        match tag.name.as_str() {
            "tr" => {
                top.close_row(doc, tag.start);
                if !tag.closing {
                    top.row = Some(Vec::new());
                }
            }
            "td" | "th" => {
                top.close_cell(doc, tag.start);
                if !tag.closing {
                    let kind = if tag.is("th") { CellKind::Header } else { CellKind::Data };
                    top.cell = Some((kind, tag.end));
                }
            }
            "thead" | "tbody" | "tfoot" => top.close_row(doc, tag.start),
            _ => {}
        }
    }

    if !stack.is_empty() {
        logd!("tables: {} table(s) left open at end of body", stack.len());
    }
    while let Some(open) = stack.pop() {
        open.finish(doc, doc.len(), &mut tables);
    }

    tables
}

/// All keyed rows of all tables, table order then row order.
/// `None` or blank input gives no rows.
pub fn extract_rows(html_body: Option<&str>) -> Vec<TableRow> {
    let Some(doc) = html_body.filter(|b| !b.trim().is_empty()) else {
        return Vec::new();
    };
    find_tables(doc).iter().flat_map(Table::keyed_rows).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_row_maps_onto_data_row() {
        let html = "<table><tr><th>A</th><th>B</th></tr><tr><td>1</td><td>2</td></tr></table>";
        assert_eq!(extract_rows(Some(html)), vec!["A: 1\nB: 2"]);
    }

    #[test]
    fn absent_or_empty_input_gives_nothing() {
        assert!(extract_rows(None).is_empty());
        assert!(extract_rows(Some("")).is_empty());
        assert!(extract_rows(Some("<p>no tables here</p>")).is_empty());
    }

    #[test]
    fn short_rows_pad_and_long_rows_truncate() {
        let html = r#"
            <table>
              <tr><th>Name</th><th>Role</th><th>Team</th></tr>
              <tr><td>Ana</td></tr>
              <tr><td>Bo</td><td>Dev</td><td>Core</td><td>extra</td></tr>
            </table>"#;
        // trailing "Team: " keeps its key; only the outer whitespace is trimmed
        assert_eq!(
            extract_rows(Some(html)),
            vec!["Name: Ana\nRole: \nTeam:", "Name: Bo\nRole: Dev\nTeam: Core"]
        );
    }

    #[test]
    fn rows_from_several_tables_keep_order() {
        let html = "<table><tr><th>K</th></tr><tr><td>a</td></tr><tr><td>b</td></tr></table>\
                    <p>between</p>\
                    <table><tr><th>X</th></tr><tr><td>c</td></tr></table>";
        assert_eq!(extract_rows(Some(html)), vec!["K: a", "K: b", "X: c"]);
    }

    #[test]
    fn tables_without_data_rows_contribute_nothing() {
        let only_header = "<table><tr><th>A</th><th>B</th></tr></table>";
        assert!(extract_rows(Some(only_header)).is_empty());

        let header_cells_only = "<table><tr><th>A</th></tr><tr><th>B</th></tr></table>";
        assert!(extract_rows(Some(header_cells_only)).is_empty());

        assert!(extract_rows(Some("<table></table>")).is_empty());
    }

    #[test]
    fn first_row_of_td_cells_is_the_header() {
        let html = "<table><tr><td>Key</td><td>Val</td></tr><tr><td>x</td><td>y</td></tr></table>";
        assert_eq!(extract_rows(Some(html)), vec!["Key: x\nVal: y"]);
    }

    #[test]
    fn wiki_storage_markup_is_read() {
        // Confluence storage format: thead/tbody, attributes, nested markup, entities
        let html = r#"
            <table data-layout="default"><colgroup><col /><col /></colgroup>
            <thead><TR><TH><p><strong>Ticket</strong></p></TH><TH><p>Owner</p></TH></TR></thead>
            <tbody>
              <tr><td><p><a href="https://x/ABC-1">ABC-1</a></p></td><td><p>Ana&nbsp;Lee</p></td></tr>
              <tr><td><p>ABC-2</p></td><td><ac:link><ri:user ri:account-id="42" /></ac:link></td></tr>
            </tbody></table>"#;
        assert_eq!(
            extract_rows(Some(html)),
            vec!["Ticket: ABC-1\nOwner: Ana Lee", "Ticket: ABC-2\nOwner:"]
        );
    }

    #[test]
    fn unclosed_cells_and_rows_are_tolerated() {
        let html = "<table><tr><th>A<th>B<tr><td>1<td>2<tr><td>3</table>";
        assert_eq!(extract_rows(Some(html)), vec!["A: 1\nB: 2", "A: 3\nB:"]);
    }

    #[test]
    fn unclosed_table_runs_to_end_of_body() {
        let html = "<table><tr><th>A</th></tr><tr><td>1</td></tr>";
        assert_eq!(extract_rows(Some(html)), vec!["A: 1"]);
    }

    #[test]
    fn stray_markup_outside_tables_is_ignored() {
        let html = "<tr><td>orphan</td></tr></table><table><tr><th>A</th></tr><tr><td>1</td></tr></table>";
        assert_eq!(extract_rows(Some(html)), vec!["A: 1"]);
    }

    #[test]
    fn nested_table_is_its_own_table() {
        let html = "<table>\
                      <tr><th>Outer</th></tr>\
                      <tr><td>o1<table><tr><th>In</th></tr><tr><td>i1</td></tr></table></td></tr>\
                    </table>";
        let tables = find_tables(html);
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].headers(), Some(vec!["Outer"]));
        assert_eq!(tables[1].keyed_rows(), vec!["In: i1"]);
        // outer row first (document order of the opening tags), then inner
        assert_eq!(extract_rows(Some(html)), vec!["Outer: o1 In i1", "In: i1"]);
    }

    #[test]
    fn cell_kinds_are_recorded() {
        let t = &find_tables("<table><tr><th>h</th><td>d</td></tr></table>")[0];
        let kinds: Vec<CellKind> = t.rows()[0].iter().map(|c| c.kind).collect();
        assert_eq!(kinds, vec![CellKind::Header, CellKind::Data]);
    }
}
