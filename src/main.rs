// ==========================================
// 到港货柜看板 - 命令行入口
// ==========================================
// 用法: shipment-board [--json-logs] <dataset.json|csv> [criteria.json] [export.csv]
// 流程: 加载配置 → 导入数据集 → 读取筛选条件 → 一次重算 → 输出/导出
// ==========================================

use anyhow::{bail, Context, Result};
use shipment_board::{load_dataset, logging, BoardConfig, BoardSession, BoardView, Column, FilterCriteria};
use std::io::{self, Write};
use std::path::Path;

const USAGE: &str = "用法: shipment-board [--json-logs] <dataset.json|csv> [criteria.json] [export.csv]";

/// 切换为 JSON 行日志
const JSON_LOGS_FLAG: &str = "--json-logs";

fn main() -> Result<()> {
    let (json_logs, args): (Vec<String>, Vec<String>) =
        std::env::args().skip(1).partition(|a| a == JSON_LOGS_FLAG);

    if json_logs.is_empty() {
        logging::init();
    } else {
        logging::init_json();
    }

    let Some(dataset_path) = args.first() else {
        bail!(USAGE);
    };

    tracing::info!("==================================================");
    tracing::info!("到港货柜看板 - 版本 {}", shipment_board::VERSION);
    tracing::info!("==================================================");

    let config = BoardConfig::load(None).context("加载看板配置失败")?;
    let rows = load_dataset(dataset_path).with_context(|| format!("导入数据集失败: {}", dataset_path))?;

    let criteria = match args.get(1) {
        Some(path) => load_criteria(Path::new(path))?,
        None => FilterCriteria::default(),
    };

    // 整次运行只取一次 now
    let now = config.reference_clock.resolve();
    tracing::info!(now = %now, fixed = config.reference_clock.is_fixed(), "参考时间");

    let placeholder = config.placeholder.clone();
    let columns = config.export_columns.clone();

    let mut session = BoardSession::new(rows, config);
    session.set_criteria(criteria);

    let view = session.view(now);
    log_summary(view);
    print_rows(view, &columns, &placeholder).context("输出看板失败")?;

    if let Some(out) = args.get(2) {
        match session.export_to_path(now, Path::new(out)).context("导出 CSV 失败")? {
            Some(path) => tracing::info!(path = %path.display(), "已导出"),
            None => tracing::warn!("无可见行,未导出"),
        }
    }

    Ok(())
}

fn load_criteria(path: &Path) -> Result<FilterCriteria> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("读取筛选条件失败: {}", path.display()))?;
    let criteria: FilterCriteria = serde_json::from_str(&raw)
        .with_context(|| format!("筛选条件格式错误: {}", path.display()))?;
    Ok(criteria)
}

fn log_summary(view: &BoardView) {
    let kpis = &view.kpis;
    tracing::info!(
        rows = view.counts.rows,
        containers = view.counts.containers,
        shipments = view.counts.shipments,
        "可见计数"
    );
    tracing::info!(
        total_kg = kpis.total_kg,
        allocated_kg = kpis.allocated_kg,
        unallocated_kg = kpis.unallocated_kg,
        unallocated_kg_7d = kpis.unallocated_kg_7d,
        allocated_pct = kpis.allocated_pct,
        unallocated_7d_pct = kpis.unallocated_7d_pct,
        "重量 KPI"
    );
    for group in &view.arrival_summary.groups {
        tracing::info!(
            port = %group.port,
            days = group.days,
            total_kg = group.total_kg,
            containers = group.containers.len(),
            shipments = group.shipments.len(),
            lines = group.lines,
            "到港汇总"
        );
    }
}

fn print_rows(view: &BoardView, columns: &[Column], placeholder: &str) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let header: Vec<&str> = columns.iter().map(|c| c.header()).collect();
    writeln!(out, "{}", header.join("\t"))?;

    for row in &view.rows {
        let cells: Vec<String> = columns.iter().map(|c| row.cell(*c, placeholder)).collect();
        writeln!(out, "{}", cells.join("\t"))?;
    }
    out.flush()
}
