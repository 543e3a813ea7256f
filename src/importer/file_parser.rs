// ==========================================
// 酒类库存销售分析 - 文件解析器实现
// ==========================================
// 职责: 原始字节 → RawTable
// 顺序: 先按 Excel (.xlsx/.xls) 解析，失败再按 CSV 解析
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use crate::importer::raw_table::{RawCell, RawTable};
use calamine::{open_workbook_auto_from_rs, Data, Reader};
use chrono::{Duration, NaiveDate};
use csv::ReaderBuilder;
use std::io::Cursor;
use std::path::Path;
use tracing::debug;

/// 支持的上传扩展名
pub const SUPPORTED_EXTENSIONS: [&str; 3] = ["xlsx", "xls", "csv"];

/// 校验上传文件名扩展名
pub fn validate_extension(file_name: &str) -> ImportResult<()> {
    let ext = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    if SUPPORTED_EXTENSIONS.contains(&ext.as_str()) {
        Ok(())
    } else {
        Err(ImportError::UnsupportedFileType(if ext.is_empty() {
            file_name.to_string()
        } else {
            ext
        }))
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelParser;

impl ExcelParser {
    /// 读取第一个工作表
    pub fn parse_bytes(&self, content: &[u8]) -> Result<RawTable, String> {
        let cursor = Cursor::new(content.to_vec());
        let mut workbook = open_workbook_auto_from_rs(cursor).map_err(|e| e.to_string())?;

        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| "Excel 文件无工作表".to_string())?
            .map_err(|e| e.to_string())?;

        let mut rows = Vec::new();
        for (row_idx, data_row) in range.rows().enumerate() {
            let is_header = row_idx == 0;
            let row: Vec<RawCell> = data_row
                .iter()
                .map(|cell| convert_excel_cell(cell, is_header))
                .collect();

            push_row(&mut rows, row);
        }

        Ok(RawTable::new(rows))
    }
}

/// 表头之前的空白行丢弃，其后的空白行保留以维持工作表行号
fn push_row(rows: &mut Vec<Vec<RawCell>>, row: Vec<RawCell>) {
    if rows.is_empty() && row.iter().all(RawCell::is_empty) {
        return;
    }
    rows.push(row);
}

/// Excel 日期序列号 → 日历日期（1900 日期系统）
fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    let base = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    base.checked_add_signed(Duration::days(serial.floor() as i64))
}

fn convert_excel_cell(cell: &Data, is_header: bool) -> RawCell {
    match cell {
        Data::Empty => RawCell::Empty,
        Data::Int(v) => RawCell::Number(*v as f64),
        Data::Float(v) => RawCell::Number(*v),
        Data::Bool(b) => RawCell::Number(if *b { 1.0 } else { 0.0 }),
        Data::String(s) => RawCell::Text(s.clone()),
        Data::DateTime(dt) => {
            let serial = dt.as_f64();
            if is_header {
                // 表头日期转为含英文月份缩写的文本，便于列识别
                match excel_serial_to_date(serial) {
                    Some(date) => RawCell::Text(date.format("%d-%b-%Y").to_string()),
                    None => RawCell::Number(serial),
                }
            } else {
                RawCell::Number(serial)
            }
        }
        Data::DateTimeIso(s) | Data::DurationIso(s) => RawCell::Text(s.clone()),
        Data::Error(_) => RawCell::Empty,
    }
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl CsvParser {
    pub fn parse_bytes(&self, content: &[u8]) -> Result<RawTable, String> {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true) // 允许行长度不一致
            .from_reader(content);

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result.map_err(|e| e.to_string())?;
            let row: Vec<RawCell> = record
                .iter()
                .map(|value| {
                    if value.trim().is_empty() {
                        RawCell::Empty
                    } else {
                        RawCell::Text(value.to_string())
                    }
                })
                .collect();

            push_row(&mut rows, row);
        }

        if rows.is_empty() {
            return Err("CSV 文件无数据行".to_string());
        }

        Ok(RawTable::new(rows))
    }
}

// ==========================================
// 通用文件解析器（Excel → CSV 依次尝试）
// ==========================================
pub struct UniversalFileParser;

impl UniversalFileParser {
    pub fn parse_bytes(&self, content: &[u8]) -> ImportResult<RawTable> {
        if content.is_empty() {
            return Err(ImportError::EmptyFile);
        }

        let excel_error = match ExcelParser.parse_bytes(content) {
            Ok(table) => {
                debug!(rows = table.rows.len(), "按 Excel 解析成功");
                return Ok(table);
            }
            Err(e) => e,
        };
        debug!(error = %excel_error, "Excel 解析失败，尝试 CSV");

        match CsvParser.parse_bytes(content) {
            Ok(table) => {
                debug!(rows = table.rows.len(), "按 CSV 解析成功");
                Ok(table)
            }
            Err(csv_error) => Err(ImportError::UnrecognizedFormat(format!(
                "Excel: {}; CSV: {}",
                excel_error, csv_error
            ))),
        }
    }
}
