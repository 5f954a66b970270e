// ==========================================
// 到港货柜看板 - CSV 导出
// ==========================================
// 输入: 已筛选 + 已排序的展示行,有序列清单
// 输出: 首行表头,其后每行一条记录
// 转义: 含逗号/双引号/换行的字段整体加双引号,内部双引号加倍
// 红线: 可见行为空时不导出（不生成文件）
// ==========================================

use crate::config::BoardConfig;
use crate::domain::types::Column;
use crate::domain::view::DisplayRow;
use crate::exporter::error::{ExportError, ExportResult};
use csv::{QuoteStyle, Terminator, WriterBuilder};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

// ==========================================
// CsvExporter - CSV 导出器
// ==========================================
pub struct CsvExporter {
    columns: Vec<Column>,
    file_name: String,
}

impl CsvExporter {
    pub fn new(columns: Vec<Column>, file_name: impl Into<String>) -> Self {
        Self {
            columns,
            file_name: file_name.into(),
        }
    }

    pub fn from_config(config: &BoardConfig) -> Self {
        Self::new(config.export_columns.clone(), config.export_file_name.clone())
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 写入任意输出流
    ///
    /// # 返回
    /// - Ok(false): 无可见行,未写入任何内容
    /// - Ok(true): 已写入
    pub fn write_to<W: Write>(&self, rows: &[DisplayRow], out: W) -> ExportResult<bool> {
        if rows.is_empty() {
            debug!("无可见行,跳过导出");
            return Ok(false);
        }

        let mut writer = WriterBuilder::new()
            .quote_style(QuoteStyle::Necessary)
            .terminator(Terminator::Any(b'\n'))
            .from_writer(out);

        writer.write_record(self.columns.iter().map(|c| c.header()))?;
        for row in rows {
            writer.write_record(self.columns.iter().map(|c| row.cell(*c, "")))?;
        }
        writer.flush()?;

        Ok(true)
    }

    /// 导出为文本
    ///
    /// 可见行为空时返回 None
    #[instrument(skip_all, fields(rows = rows.len()))]
    pub fn export(&self, rows: &[DisplayRow]) -> ExportResult<Option<String>> {
        match self.render(rows)? {
            Some(buffer) => {
                let text =
                    String::from_utf8(buffer).map_err(|e| ExportError::EncodingError(e.to_string()))?;
                Ok(Some(text))
            }
            None => Ok(None),
        }
    }

    /// 先在内存中生成完整内容
    fn render(&self, rows: &[DisplayRow]) -> ExportResult<Option<Vec<u8>>> {
        let mut buffer: Vec<u8> = Vec::new();
        if !self.write_to(rows, &mut buffer)? {
            return Ok(None);
        }
        Ok(Some(buffer))
    }

    /// 导出到目录下的固定文件名
    ///
    /// 可见行为空时返回 None,且不创建文件
    #[instrument(skip(self, rows), fields(rows = rows.len()))]
    pub fn export_to_dir(&self, rows: &[DisplayRow], dir: &Path) -> ExportResult<Option<PathBuf>> {
        self.export_to_path(rows, &dir.join(&self.file_name))
    }

    /// 导出到指定路径
    ///
    /// 内容全部生成成功后才一次性写盘,失败时不留下半截文件
    pub fn export_to_path(&self, rows: &[DisplayRow], path: &Path) -> ExportResult<Option<PathBuf>> {
        let Some(buffer) = self.render(rows)? else {
            return Ok(None);
        };

        std::fs::write(path, buffer)?;

        info!(path = %path.display(), rows = rows.len(), "CSV 导出完成");
        Ok(Some(path.to_path_buf()))
    }
}
