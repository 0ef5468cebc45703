//! Reading and in-place patching of `.xlsx` templates.
//!
//! Values are read through calamine. Writes go straight into the first
//! worksheet's XML so that styles, other sheets and untouched cells
//! survive byte-for-byte.

use std::collections::{BTreeMap, HashMap};
use std::io::{Cursor, Read, Write};

use anyhow::{Context, Result, anyhow};
use calamine::{Data, Reader as _, Xlsx, open_workbook_from_rs};
use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// Rows above the first data row.
pub const HEADER_ROWS: u32 = 5;

const CALC_CHAIN: &str = "xl/calcChain.xml";
const WORKBOOK: &str = "xl/workbook.xml";
const WORKBOOK_RELS: &str = "xl/_rels/workbook.xml.rels";
const CONTENT_TYPES: &str = "[Content_Types].xml";
const DEFAULT_SHEET: &str = "xl/worksheets/sheet1.xml";

/// `calcPr` must precede these children of `<workbook>`.
const AFTER_CALC_PR: &[&[u8]] = &[
    b"oleSize",
    b"customWorkbookViews",
    b"pivotCaches",
    b"smartTagPr",
    b"smartTagTypes",
    b"webPublishing",
    b"fileRecoveryPr",
    b"webPublishObjects",
    b"extLst",
];

#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Number(f64),
    Text(String),
    /// Formula text without the leading `=`.
    Formula(String),
}

/// Pending writes keyed by (1-based sheet row, 0-based column).
pub type CellWrites = BTreeMap<(u32, u32), CellValue>;

/// `"AG"` → 32.
pub fn column_index(letters: &str) -> Option<u32> {
    if letters.is_empty() {
        return None;
    }
    let mut col: u32 = 0;
    for ch in letters.chars() {
        if !ch.is_ascii_alphabetic() {
            return None;
        }
        col = col * 26 + (ch.to_ascii_uppercase() as u32 - 'A' as u32 + 1);
    }
    Some(col - 1)
}

/// 32 → `"AG"`.
pub fn column_letters(mut index: u32) -> String {
    let mut out = Vec::new();
    loop {
        out.push(b'A' + (index % 26) as u8);
        if index < 26 {
            break;
        }
        index = index / 26 - 1;
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}

/// `"AG12"` → (12, 32).
fn parse_cell_ref(r: &str) -> Option<(u32, u32)> {
    let split = r.find(|c: char| c.is_ascii_digit())?;
    let col = column_index(&r[..split])?;
    let row = r[split..].parse().ok()?;
    Some((row, col))
}

/// Column-A text of every data row in the first worksheet, in sheet
/// order. Entry `t` lives on sheet row `t + HEADER_ROWS + 1`.
pub fn employee_column(template: &[u8]) -> Result<Vec<String>> {
    let mut workbook: Xlsx<_> =
        open_workbook_from_rs(Cursor::new(template)).context("template is not a readable .xlsx")?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| anyhow!("template has no worksheet"))?
        .context("first worksheet is unreadable")?;

    let Some((last_row, _)) = range.end() else {
        return Ok(Vec::new());
    };

    Ok((HEADER_ROWS..=last_row)
        .map(|r| {
            range
                .get_value((r, 0))
                .map(cell_text)
                .unwrap_or_default()
        })
        .collect())
}

/// Text form of a cell; integral floats drop their fractional part.
pub fn cell_text(value: &Data) -> String {
    match value {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        other => other.to_string(),
    }
}

/// Apply `writes` to the first worksheet and return the new workbook.
///
/// The calculation chain is dropped and the workbook is flagged for a
/// full recalculation on load, since formulas are written without cached
/// values.
pub fn patch_first_sheet(template: &[u8], writes: &CellWrites) -> Result<Vec<u8>> {
    let mut archive =
        ZipArchive::new(Cursor::new(template)).context("template is not a zip archive")?;

    let workbook_xml = read_entry(&mut archive, WORKBOOK)?;
    let rels_xml = read_entry(&mut archive, WORKBOOK_RELS).unwrap_or_default();
    let sheet_path = first_sheet_path(&workbook_xml, &rels_xml);
    debug!(sheet = %sheet_path, cells = writes.len(), "Patching worksheet");

    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut out = ZipWriter::new(Cursor::new(Vec::new()));

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        let name = entry.name().to_string();
        if entry.is_dir() {
            out.add_directory(name, options)?;
            continue;
        }
        if name == CALC_CHAIN {
            continue;
        }

        let mut data = Vec::with_capacity(entry.size() as usize);
        entry.read_to_end(&mut data)?;

        let data = if name == sheet_path {
            patch_sheet_xml(&data, writes)?
        } else if name == WORKBOOK {
            force_full_calc(&data)?
        } else if name == WORKBOOK_RELS {
            drop_empty_elements(&data, b"Relationship", |attrs| {
                attrs
                    .get(b"Target".as_slice())
                    .is_some_and(|t| t.ends_with("calcChain.xml"))
            })?
        } else if name == CONTENT_TYPES {
            drop_empty_elements(&data, b"Override", |attrs| {
                attrs
                    .get(b"PartName".as_slice())
                    .is_some_and(|p| p == "/xl/calcChain.xml")
            })?
        } else {
            data
        };

        out.start_file(name, options)?;
        out.write_all(&data)?;
    }

    Ok(out.finish()?.into_inner())
}

fn read_entry<R: Read + std::io::Seek>(archive: &mut ZipArchive<R>, path: &str) -> Result<String> {
    let mut file = archive
        .by_name(path)
        .with_context(|| format!("{path} missing from template"))?;
    let mut content = String::new();
    file.read_to_string(&mut content)
        .with_context(|| format!("{path} is not UTF-8"))?;
    Ok(content)
}

fn attr_map(e: &BytesStart) -> HashMap<Vec<u8>, String> {
    e.attributes()
        .flatten()
        .map(|a| (a.key.as_ref().to_vec(), String::from_utf8_lossy(&a.value).into_owned()))
        .collect()
}

/// Zip path of the first `<sheet>` listed in the workbook.
fn first_sheet_path(workbook_xml: &str, rels_xml: &str) -> String {
    let mut first_rid = None;
    let mut reader = Reader::from_str(workbook_xml);
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e)) if e.name().as_ref() == b"sheet" => {
                first_rid = attr_map(e).remove(b"r:id".as_slice());
                break;
            }
            Ok(Event::Eof) | Err(_) => break,
            _ => {}
        }
        buf.clear();
    }

    let Some(rid) = first_rid else {
        return DEFAULT_SHEET.to_string();
    };

    let mut reader = Reader::from_str(rels_xml);
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                if e.name().as_ref() == b"Relationship" =>
            {
                let attrs = attr_map(e);
                if attrs.get(b"Id".as_slice()) == Some(&rid) {
                    if let Some(target) = attrs.get(b"Target".as_slice()) {
                        return resolve_target(target);
                    }
                }
            }
            Ok(Event::Eof) | Err(_) => break,
            _ => {}
        }
        buf.clear();
    }
    DEFAULT_SHEET.to_string()
}

/// Relationship targets are relative to `xl/` unless absolute.
fn resolve_target(target: &str) -> String {
    match target.strip_prefix('/') {
        Some(absolute) => absolute.to_string(),
        None => format!("xl/{target}"),
    }
}

fn new_writer() -> Writer<Vec<u8>> {
    Writer::new(Vec::new())
}

/// Copy `xml`, dropping empty `<tag/>` elements whose attributes match.
fn drop_empty_elements<F>(xml: &[u8], tag: &[u8], predicate: F) -> Result<Vec<u8>>
where
    F: Fn(&HashMap<Vec<u8>, String>) -> bool,
{
    let mut reader = Reader::from_reader(xml);
    let mut writer = new_writer();
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Eof => break,
            Event::Empty(e) if e.name().as_ref() == tag && predicate(&attr_map(&e)) => {}
            event => writer.write_event(event)?,
        }
        buf.clear();
    }
    Ok(writer.into_inner())
}

fn calc_pr(original: Option<&BytesStart>) -> BytesStart<'static> {
    let mut e = BytesStart::new("calcPr");
    if let Some(orig) = original {
        for attr in orig.attributes().flatten() {
            if attr.key.as_ref() != b"fullCalcOnLoad" {
                e.push_attribute(attr);
            }
        }
    }
    e.push_attribute(("fullCalcOnLoad", "1"));
    e
}

/// Set `fullCalcOnLoad="1"` on `<calcPr>`, adding the element if needed.
fn force_full_calc(xml: &[u8]) -> Result<Vec<u8>> {
    let mut reader = Reader::from_reader(xml);
    let mut writer = new_writer();
    let mut buf = Vec::new();
    let mut done = false;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Eof => break,
            Event::Empty(e) if e.name().as_ref() == b"calcPr" => {
                writer.write_event(Event::Empty(calc_pr(Some(&e))))?;
                done = true;
            }
            Event::Start(e) if e.name().as_ref() == b"calcPr" => {
                writer.write_event(Event::Start(calc_pr(Some(&e))))?;
                done = true;
            }
            Event::Start(e) if !done && AFTER_CALC_PR.contains(&e.name().as_ref()) => {
                writer.write_event(Event::Empty(calc_pr(None)))?;
                done = true;
                writer.write_event(Event::Start(e))?;
            }
            Event::Empty(e) if !done && AFTER_CALC_PR.contains(&e.name().as_ref()) => {
                writer.write_event(Event::Empty(calc_pr(None)))?;
                done = true;
                writer.write_event(Event::Empty(e))?;
            }
            Event::End(e) if !done && e.name().as_ref() == b"workbook" => {
                writer.write_event(Event::Empty(calc_pr(None)))?;
                done = true;
                writer.write_event(Event::End(e))?;
            }
            event => writer.write_event(event)?,
        }
        buf.clear();
    }
    Ok(writer.into_inner())
}

/// Merge `writes` into a worksheet's `<sheetData>`, keeping rows and cells
/// in ascending order and each replaced cell's style.
fn patch_sheet_xml(xml: &[u8], writes: &CellWrites) -> Result<Vec<u8>> {
    let mut reader = Reader::from_reader(xml);
    let mut writer = new_writer();
    let mut buf = Vec::new();

    let mut pending = writes.clone();
    let mut in_sheet_data = false;
    let mut current_row: Option<u32> = None;
    let mut last_row: u32 = 0;
    let mut last_col: Option<u32> = None;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Eof => break,

            Event::Start(e) if e.name().as_ref() == b"sheetData" => {
                in_sheet_data = true;
                writer.write_event(Event::Start(e))?;
            }
            Event::Empty(e) if e.name().as_ref() == b"sheetData" => {
                writer.write_event(Event::Start(e))?;
                flush_rows(&mut writer, &mut pending, u32::MAX)?;
                writer.write_event(Event::End(BytesEnd::new("sheetData")))?;
            }
            Event::End(e) if e.name().as_ref() == b"sheetData" => {
                flush_rows(&mut writer, &mut pending, u32::MAX)?;
                in_sheet_data = false;
                writer.write_event(Event::End(e))?;
            }

            Event::Start(e) if in_sheet_data && e.name().as_ref() == b"row" => {
                let row = row_number(&e).unwrap_or(last_row + 1);
                flush_rows(&mut writer, &mut pending, row)?;
                writer.write_event(Event::Start(without_spans(&e)))?;
                current_row = Some(row);
                last_row = row;
                last_col = None;
            }
            Event::Empty(e) if in_sheet_data && e.name().as_ref() == b"row" => {
                let row = row_number(&e).unwrap_or(last_row + 1);
                flush_rows(&mut writer, &mut pending, row)?;
                last_row = row;
                if has_row(&pending, row) {
                    writer.write_event(Event::Start(without_spans(&e)))?;
                    flush_cells(&mut writer, &mut pending, row, u32::MAX)?;
                    writer.write_event(Event::End(BytesEnd::new("row")))?;
                } else {
                    writer.write_event(Event::Empty(e))?;
                }
            }
            Event::End(e) if in_sheet_data && e.name().as_ref() == b"row" => {
                if let Some(row) = current_row.take() {
                    flush_cells(&mut writer, &mut pending, row, u32::MAX)?;
                }
                writer.write_event(Event::End(e))?;
            }

            Event::Start(e) if e.name().as_ref() == b"c" && current_row.is_some() => {
                let row = current_row.unwrap_or(last_row);
                if replace_cell(&mut writer, &mut pending, &e, row, &mut last_col)? {
                    skip_to_cell_end(&mut reader)?;
                } else {
                    writer.write_event(Event::Start(e))?;
                }
            }
            Event::Empty(e) if e.name().as_ref() == b"c" && current_row.is_some() => {
                let row = current_row.unwrap_or(last_row);
                if !replace_cell(&mut writer, &mut pending, &e, row, &mut last_col)? {
                    writer.write_event(Event::Empty(e))?;
                }
            }

            other => writer.write_event(other)?,
        }
        buf.clear();
    }

    if !pending.is_empty() {
        return Err(anyhow!("worksheet has no sheetData element"));
    }
    Ok(writer.into_inner())
}

/// Flush pending cells left of `cell`, then write its replacement if one is
/// pending. Returns whether the original cell was replaced.
fn replace_cell(
    writer: &mut Writer<Vec<u8>>,
    pending: &mut CellWrites,
    cell: &BytesStart,
    row: u32,
    last_col: &mut Option<u32>,
) -> Result<bool> {
    let attrs = attr_map(cell);
    let col = attrs
        .get(b"r".as_slice())
        .and_then(|r| parse_cell_ref(r))
        .map(|(_, c)| c)
        .unwrap_or_else(|| last_col.map_or(0, |c| c + 1));
    *last_col = Some(col);

    flush_cells(writer, pending, row, col)?;

    match pending.remove(&(row, col)) {
        Some(value) => {
            let style = attrs.get(b"s".as_slice()).map(String::as_str);
            write_cell(writer, row, col, style, &value)?;
            Ok(true)
        }
        None => Ok(false),
    }
}

fn skip_to_cell_end(reader: &mut Reader<&[u8]>) -> Result<()> {
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::End(e) if e.name().as_ref() == b"c" => return Ok(()),
            Event::Eof => return Err(anyhow!("unterminated <c> element")),
            _ => {}
        }
        buf.clear();
    }
}

fn row_number(e: &BytesStart) -> Option<u32> {
    attr_map(e).get(b"r".as_slice()).and_then(|r| r.parse().ok())
}

/// Row copy without its `spans` hint, which may no longer cover the cells.
fn without_spans(e: &BytesStart) -> BytesStart<'static> {
    let mut row = BytesStart::new("row");
    for attr in e.attributes().flatten() {
        if attr.key.as_ref() != b"spans" {
            row.push_attribute(attr);
        }
    }
    row.into_owned()
}

fn has_row(pending: &CellWrites, row: u32) -> bool {
    pending.range((row, 0)..=(row, u32::MAX)).next().is_some()
}

/// Emit whole new rows for pending writes above `before_row`.
fn flush_rows(writer: &mut Writer<Vec<u8>>, pending: &mut CellWrites, before_row: u32) -> Result<()> {
    while let Some((&(row, _), _)) = pending.first_key_value() {
        if row >= before_row {
            break;
        }
        let mut start = BytesStart::new("row");
        start.push_attribute(("r", row.to_string().as_str()));
        writer.write_event(Event::Start(start))?;
        flush_cells(writer, pending, row, u32::MAX)?;
        writer.write_event(Event::End(BytesEnd::new("row")))?;
    }
    Ok(())
}

/// Emit pending cells of `row` left of `before_col`.
fn flush_cells(
    writer: &mut Writer<Vec<u8>>,
    pending: &mut CellWrites,
    row: u32,
    before_col: u32,
) -> Result<()> {
    let due: Vec<u32> = pending
        .range((row, 0)..(row, before_col))
        .map(|(&(_, c), _)| c)
        .collect();
    for col in due {
        if let Some(value) = pending.remove(&(row, col)) {
            write_cell(writer, row, col, None, &value)?;
        }
    }
    Ok(())
}

fn write_cell(
    writer: &mut Writer<Vec<u8>>,
    row: u32,
    col: u32,
    style: Option<&str>,
    value: &CellValue,
) -> Result<()> {
    let reference = format!("{}{}", column_letters(col), row);
    let mut c = BytesStart::new("c");
    c.push_attribute(("r", reference.as_str()));
    if let Some(s) = style {
        c.push_attribute(("s", s));
    }

    match value {
        CellValue::Number(n) => {
            writer.write_event(Event::Start(c))?;
            write_text_element(writer, "v", &n.to_string())?;
        }
        CellValue::Text(text) => {
            c.push_attribute(("t", "inlineStr"));
            writer.write_event(Event::Start(c))?;
            writer.write_event(Event::Start(BytesStart::new("is")))?;
            write_text_element(writer, "t", text)?;
            writer.write_event(Event::End(BytesEnd::new("is")))?;
        }
        CellValue::Formula(formula) => {
            writer.write_event(Event::Start(c))?;
            write_text_element(writer, "f", formula.trim_start_matches('='))?;
        }
    }
    writer.write_event(Event::End(BytesEnd::new("c")))?;
    Ok(())
}

fn write_text_element(writer: &mut Writer<Vec<u8>>, tag: &str, text: &str) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new(tag)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patch(xml: &str, writes: &[((u32, u32), CellValue)]) -> String {
        let writes: CellWrites = writes.iter().cloned().collect();
        String::from_utf8(patch_sheet_xml(xml.as_bytes(), &writes).unwrap()).unwrap()
    }

    #[test]
    fn column_letters_round_trip() {
        assert_eq!(column_index("A"), Some(0));
        assert_eq!(column_index("ag"), Some(32));
        assert_eq!(column_index("AU"), Some(46));
        assert_eq!(column_letters(0), "A");
        assert_eq!(column_letters(25), "Z");
        assert_eq!(column_letters(26), "AA");
        assert_eq!(column_letters(43), "AR");
        assert_eq!(column_index(""), None);
        assert_eq!(parse_cell_ref("AG12"), Some((12, 32)));
    }

    #[test]
    fn integral_floats_render_as_integers() {
        assert_eq!(cell_text(&Data::Float(1001.0)), "1001");
        assert_eq!(cell_text(&Data::Float(10.5)), "10.5");
        assert_eq!(cell_text(&Data::Int(7)), "7");
        assert_eq!(cell_text(&Data::String(" 1001 ".into())), "1001");
        assert_eq!(cell_text(&Data::Empty), "");
    }

    #[test]
    fn replaced_cells_keep_their_style() {
        let xml = r#"<worksheet><sheetData><row r="9" spans="1:5"><c r="A9" s="2"><v>1001</v></c><c r="E9" s="7"><v>0</v></c></row></sheetData></worksheet>"#;
        let out = patch(xml, &[((9, 4), CellValue::Number(20.0))]);
        assert_eq!(
            out,
            r#"<worksheet><sheetData><row r="9"><c r="A9" s="2"><v>1001</v></c><c r="E9" s="7"><v>20</v></c></row></sheetData></worksheet>"#
        );
    }

    #[test]
    fn new_cells_are_inserted_in_column_order() {
        let xml = r#"<worksheet><sheetData><row r="6"><c r="A6"><v>1</v></c><c r="Z6"/></row></sheetData></worksheet>"#;
        let out = patch(
            xml,
            &[
                ((6, 5), CellValue::Text("142:02".into())),
                ((6, 32), CellValue::Formula("=500*10".into())),
            ],
        );
        assert_eq!(
            out,
            r#"<worksheet><sheetData><row r="6"><c r="A6"><v>1</v></c><c r="F6" t="inlineStr"><is><t>142:02</t></is></c><c r="Z6"/><c r="AG6"><f>500*10</f></c></row></sheetData></worksheet>"#
        );
    }

    #[test]
    fn missing_rows_are_created_in_order() {
        let xml = r#"<worksheet><sheetData><row r="2"><c r="A2"><v>1</v></c></row><row r="8"/></sheetData></worksheet>"#;
        let out = patch(
            xml,
            &[
                ((1, 0), CellValue::Number(1.5)),
                ((5, 1), CellValue::Number(3.0)),
                ((8, 2), CellValue::Number(4.0)),
                ((12, 0), CellValue::Number(5.0)),
            ],
        );
        assert_eq!(
            out,
            concat!(
                r#"<worksheet><sheetData>"#,
                r#"<row r="1"><c r="A1"><v>1.5</v></c></row>"#,
                r#"<row r="2"><c r="A2"><v>1</v></c></row>"#,
                r#"<row r="5"><c r="B5"><v>3</v></c></row>"#,
                r#"<row r="8"><c r="C8"><v>4</v></c></row>"#,
                r#"<row r="12"><c r="A12"><v>5</v></c></row>"#,
                r#"</sheetData></worksheet>"#
            )
        );
    }

    #[test]
    fn empty_sheet_data_is_expanded() {
        let xml = r#"<worksheet><sheetData/></worksheet>"#;
        let out = patch(xml, &[((6, 0), CellValue::Text("a & b".into()))]);
        assert_eq!(
            out,
            r#"<worksheet><sheetData><row r="6"><c r="A6" t="inlineStr"><is><t>a &amp; b</t></is></c></row></sheetData></worksheet>"#
        );
    }

    #[test]
    fn calc_pr_is_forced_to_full_recalc() {
        let xml = br#"<workbook><sheets/><calcPr calcId="191029" fullCalcOnLoad="0"/></workbook>"#;
        let out = String::from_utf8(force_full_calc(xml).unwrap()).unwrap();
        assert_eq!(
            out,
            r#"<workbook><sheets/><calcPr calcId="191029" fullCalcOnLoad="1"/></workbook>"#
        );

        let xml = br#"<workbook><sheets/><extLst/></workbook>"#;
        let out = String::from_utf8(force_full_calc(xml).unwrap()).unwrap();
        assert_eq!(out, r#"<workbook><sheets/><calcPr fullCalcOnLoad="1"/><extLst/></workbook>"#);

        let xml = br#"<workbook><sheets/></workbook>"#;
        let out = String::from_utf8(force_full_calc(xml).unwrap()).unwrap();
        assert_eq!(out, r#"<workbook><sheets/><calcPr fullCalcOnLoad="1"/></workbook>"#);
    }

    #[test]
    fn calc_chain_references_are_removed() {
        let xml = br#"<Types><Override PartName="/xl/workbook.xml" ContentType="a"/><Override PartName="/xl/calcChain.xml" ContentType="b"/></Types>"#;
        let out = drop_empty_elements(xml, b"Override", |attrs| {
            attrs
                .get(b"PartName".as_slice())
                .is_some_and(|p| p == "/xl/calcChain.xml")
        })
        .unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            r#"<Types><Override PartName="/xl/workbook.xml" ContentType="a"/></Types>"#
        );
    }

    #[test]
    fn sheet_targets_resolve_relative_and_absolute() {
        let workbook = r#"<workbook><sheets><sheet name="Pay" sheetId="1" r:id="rId3"/><sheet name="B" sheetId="2" r:id="rId1"/></sheets></workbook>"#;
        let rels = r#"<Relationships><Relationship Id="rId1" Target="worksheets/sheet2.xml"/><Relationship Id="rId3" Target="worksheets/sheet1.xml"/></Relationships>"#;
        assert_eq!(first_sheet_path(workbook, rels), "xl/worksheets/sheet1.xml");

        let rels = r#"<Relationships><Relationship Id="rId3" Target="/xl/worksheets/pay.xml"/></Relationships>"#;
        assert_eq!(first_sheet_path(workbook, rels), "xl/worksheets/pay.xml");
        assert_eq!(first_sheet_path("<workbook/>", ""), DEFAULT_SHEET);
    }
}
