use crate::core::similarity::format_percent;
use crate::domain::model::{ExportFormat, SearchHit};
use crate::utils::error::{Result, SearchError};
use rust_xlsxwriter::{Format, Workbook};
use std::io::Write;
use zip::write::{FileOptions, ZipWriter};

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];
const COLUMNS: [&str; 7] = ["file", "sheet", "row", "similarity", "pattern", "field", "content"];

/// `search_results_<timestamp>.<ext>`
pub fn export_filename(timestamp: &str, format: ExportFormat) -> String {
    format!("search_results_{}.{}", timestamp, format.extension())
}

/// Render `hits` in the given format.
pub fn render(hits: &[SearchHit], format: ExportFormat) -> Result<Vec<u8>> {
    match format {
        ExportFormat::Csv => {
            // 加 BOM 讓 Excel 正確辨識 UTF-8
            let mut data = UTF8_BOM.to_vec();
            data.extend(render_delimited(hits, b',')?);
            Ok(data)
        }
        ExportFormat::Tsv => render_delimited(hits, b'\t'),
        ExportFormat::Json => render_json(hits),
        ExportFormat::Xlsx => render_xlsx(hits),
        ExportFormat::Zip => render_zip(hits),
    }
}

fn render_delimited(hits: &[SearchHit], delimiter: u8) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(Vec::new());

    writer.write_record(COLUMNS)?;
    for hit in hits {
        let row = hit.row.to_string();
        let similarity = format_percent(hit.similarity);
        let content = hit.content_text();
        writer.write_record([
            hit.file.as_str(),
            hit.sheet.as_deref().unwrap_or(""),
            row.as_str(),
            similarity.as_str(),
            hit.pattern.as_str(),
            hit.field.as_deref().unwrap_or(""),
            content.as_str(),
        ])?;
    }

    writer.into_inner().map_err(|e| SearchError::ProcessingError {
        message: format!("Failed to flush delimited output: {}", e),
    })
}

fn render_json(hits: &[SearchHit]) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec_pretty(hits)?)
}

/// Single `results` sheet; the row number is stored as a number, the rest as
/// text. Missing sheet and field values stay blank.
fn render_xlsx(hits: &[SearchHit]) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("results")?;

    for (col, name) in (0u16..).zip(COLUMNS) {
        worksheet.write_string_with_format(0, col, name, &header)?;
    }

    for (idx, hit) in hits.iter().enumerate() {
        let row = u32::try_from(idx + 1).map_err(|_| SearchError::ProcessingError {
            message: format!("Too many results for one worksheet: {}", hits.len()),
        })?;
        worksheet.write_string(row, 0, hit.file.as_str())?;
        if let Some(sheet) = &hit.sheet {
            worksheet.write_string(row, 1, sheet.as_str())?;
        }
        worksheet.write_number(row, 2, hit.row as f64)?;
        worksheet.write_string(row, 3, format_percent(hit.similarity))?;
        worksheet.write_string(row, 4, hit.pattern.as_str())?;
        if let Some(field) = &hit.field {
            worksheet.write_string(row, 5, field.as_str())?;
        }
        worksheet.write_string(row, 6, hit.content_text())?;
    }

    Ok(workbook.save_to_buffer()?)
}

/// One archive with the CSV, TSV, JSON and Excel renderings.
fn render_zip(hits: &[SearchHit]) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));

    for format in [
        ExportFormat::Csv,
        ExportFormat::Tsv,
        ExportFormat::Json,
        ExportFormat::Xlsx,
    ] {
        let name = format!("results.{}", format.extension());
        zip.start_file::<_, ()>(name, FileOptions::default())?;
        zip.write_all(&render(hits, format)?)?;
    }

    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use std::path::PathBuf;

    fn sample_hits() -> Vec<SearchHit> {
        vec![
            SearchHit {
                file: "staff.csv".to_string(),
                path: PathBuf::from("data/staff.csv"),
                sheet: None,
                row: 1,
                content: vec![
                    ("姓名".to_string(), "张三".to_string()),
                    ("部门".to_string(), "销售部".to_string()),
                ],
                similarity: 0.763,
                pattern: "张三".to_string(),
                field: None,
            },
            SearchHit {
                file: "book.xlsx".to_string(),
                path: PathBuf::from("data/book.xlsx"),
                sheet: Some("Sheet2".to_string()),
                row: 4,
                content: vec![("姓名".to_string(), "zhangsan".to_string())],
                similarity: 1.2,
                pattern: "zhangsan".to_string(),
                field: Some("姓名".to_string()),
            },
        ]
    }

    #[test]
    fn test_export_filename() {
        assert_eq!(
            export_filename("20240101_120000", ExportFormat::Json),
            "search_results_20240101_120000.json"
        );
    }

    #[test]
    fn test_csv_has_bom_and_rows() {
        let data = render(&sample_hits(), ExportFormat::Csv).unwrap();
        assert!(data.starts_with(UTF8_BOM));

        let text = String::from_utf8(data[3..].to_vec()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "file,sheet,row,similarity,pattern,field,content");
        assert_eq!(lines[1], "staff.csv,,1,76%,张三,,\"姓名:张三, 部门:销售部\"");
        assert_eq!(lines[2], "book.xlsx,Sheet2,4,100%,zhangsan,姓名,姓名:zhangsan");
    }

    #[test]
    fn test_tsv_uses_tabs_without_bom() {
        let data = render(&sample_hits(), ExportFormat::Tsv).unwrap();
        let text = String::from_utf8(data).unwrap();
        assert!(text.starts_with("file\tsheet\trow"));
        assert!(text.contains("staff.csv\t\t1\t76%\t张三\t\t姓名:张三, 部门:销售部"));
    }

    #[test]
    fn test_json_keeps_unicode_and_column_order() {
        let data = render(&sample_hits(), ExportFormat::Json).unwrap();
        let text = String::from_utf8(data).unwrap();
        assert!(text.contains("\"张三\""));

        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        let keys: Vec<&String> = value[0]["content"].as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["姓名", "部门"]);
        assert_eq!(value[1]["sheet"], "Sheet2");
    }

    #[test]
    fn test_zip_bundles_all_formats() {
        let data = render(&sample_hits(), ExportFormat::Zip).unwrap();
        let mut archive = zip::ZipArchive::new(std::io::Cursor::new(data)).unwrap();
        assert_eq!(archive.len(), 4);

        let mut json = String::new();
        archive
            .by_name("results.json")
            .unwrap()
            .read_to_string(&mut json)
            .unwrap();
        assert!(json.contains("zhangsan"));
        assert!(archive.by_name("results.csv").is_ok());
        assert!(archive.by_name("results.tsv").is_ok());
        assert!(archive.by_name("results.xlsx").is_ok());
    }

    #[test]
    fn test_xlsx_reads_back_with_same_columns() {
        use calamine::{open_workbook_auto_from_rs, Data, Reader};

        let data = render(&sample_hits(), ExportFormat::Xlsx).unwrap();
        let mut workbook = open_workbook_auto_from_rs(std::io::Cursor::new(data)).unwrap();
        assert_eq!(workbook.sheet_names(), vec!["results".to_string()]);

        let range = workbook.worksheet_range("results").unwrap();
        assert_eq!(range.height(), 3);
        assert_eq!(range.width(), COLUMNS.len());

        let header: Vec<String> = range.rows().next().unwrap().iter().map(|c| c.to_string()).collect();
        assert_eq!(header, COLUMNS);

        assert_eq!(range.get((1, 0)), Some(&Data::String("staff.csv".to_string())));
        assert_eq!(range.get((1, 2)), Some(&Data::Float(1.0)));
        assert_eq!(range.get((1, 6)), Some(&Data::String("姓名:张三, 部门:销售部".to_string())));
        assert_eq!(range.get((2, 1)), Some(&Data::String("Sheet2".to_string())));
        assert_eq!(range.get((2, 3)), Some(&Data::String("100%".to_string())));
        assert_eq!(range.get((2, 5)), Some(&Data::String("姓名".to_string())));
        assert_eq!(range.get((1, 1)), Some(&Data::Empty));
    }
}
