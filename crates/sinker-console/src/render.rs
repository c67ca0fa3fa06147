use std::fmt::Write;

use sinker_model::{CmdLine, ConfigDoc, ConfigSource, LogPage, ProcInfo, TaskStatusSnapshot};
use sinker_view::{
    SortField, SortState, TaskPage, TaskRow,
    format::{self, LagLevel},
};
use time::UtcOffset;

/// Table columns, one per sortable field.
const COLUMNS: [SortField; 10] = SortField::ALL;

pub fn overview(info: &ProcInfo, offset: UtcOffset) -> String {
    let pairs = [
        ("Version", format::or_na(&info.version).to_string()),
        ("Commit", format::format_commit(&info.commit).to_string()),
        ("Build time", format::or_na(&info.build_time).to_string()),
        ("Go version", format::or_na(&info.go_version).to_string()),
        ("Start time", format::format_start_time(info.start_time, offset)),
        ("Uptime", format::format_uptime(info.uptime)),
        ("CPU", format::format_cpu(info.cpu)),
        ("Memory", format::format_memory(info.memory)),
        ("Goroutines", format::format_number(info.goroutines as i64)),
        ("Tasks", format::format_number(info.tasks as i64)),
        ("Record pool", format::format_number(info.record_pool_size)),
    ];
    key_values(&pairs)
}

pub fn tasks(page: &TaskPage<'_>, sort: &SortState, offset: UtcOffset) -> String {
    let mut out = String::new();
    if let Some(empty) = page.empty {
        let _ = writeln!(out, "{}", empty.message());
        return out;
    }

    let header: Vec<String> = COLUMNS
        .iter()
        .map(|&col| match sort.field {
            Some(field) if field == col => format!("{col}{}", sort.order.indicator()),
            _ => col.to_string(),
        })
        .collect();
    let rows: Vec<[String; 10]> = page
        .items
        .iter()
        .map(|t| row_cells(&TaskRow::from_task_at(t, offset)))
        .collect();

    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    write_line(&mut out, &header, &widths);
    for row in &rows {
        write_line(&mut out, row, &widths);
    }
    let _ = writeln!(
        out,
        "\npage {}/{}, {} of {} tasks, {} per page",
        page.current_page,
        page.total_pages.max(1),
        page.filtered,
        page.total,
        page.page_size.get(),
    );
    out
}

fn row_cells(row: &TaskRow) -> [String; 10] {
    let lag = match row.lag_level {
        LagLevel::Critical => format!("{} !!", row.lag),
        LagLevel::Warning => format!("{} !", row.lag),
        LagLevel::Normal => row.lag.clone(),
    };
    [
        row.name.clone(),
        row.cluster.clone(),
        row.table.clone(),
        row.topic.clone(),
        row.consumer_group.clone(),
        row.kind.as_ref().map(ToString::to_string).unwrap_or_default(),
        row.status_label.clone(),
        lag,
        row.write_speed.clone(),
        row.last_update.clone(),
    ]
}

fn write_line<S: AsRef<str>>(out: &mut String, cells: &[S], widths: &[usize]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, w)| format!("{:<w$}", cell.as_ref(), w = *w))
        .collect();
    let _ = writeln!(out, "{}", line.join("  ").trim_end());
}

pub fn status(name: &str, snap: Option<&TaskStatusSnapshot>, offset: UtcOffset) -> String {
    let Some(snap) = snap else {
        return format!("{name}: no status yet\n");
    };
    let short_lag = format::format_lag_short(snap.kafka_lag);
    let lag = match format::snapshot_lag_level(snap.kafka_lag) {
        Some(level) => format!("{short_lag} ({})", level.as_str()),
        None => short_lag,
    };
    let pairs = [
        ("Task", name.to_string()),
        ("Status", format::snapshot_status_label(snap.status.as_ref()).to_string()),
        ("Start time", format::format_time_value(snap.start_time.as_ref(), offset)),
        (
            "Last active",
            format::format_time_value(snap.last_active_time.as_ref(), offset),
        ),
        ("Messages", format::format_count(snap.messages_total)),
        ("Rate", format::format_rate(snap.messages_per_sec)),
        ("Kafka lag", lag),
        ("Errors", format::format_number(snap.error_count as i64)),
        (
            "Last error",
            snap.last_error.clone().unwrap_or_else(|| "-".to_string()),
        ),
    ];
    key_values(&pairs)
}

pub fn config(doc: &ConfigDoc, cmdline: Option<&CmdLine>) -> String {
    let mut out = String::new();
    if let Some(cmd) = cmdline {
        let source = match cmd.config_source() {
            ConfigSource::Local(path) => format!("local file {path}"),
            ConfigSource::Remote { addr, namespace } => format!(
                "nacos {} (namespace {})",
                addr.unwrap_or("N/A"),
                namespace.unwrap_or("N/A")
            ),
        };
        let _ = writeln!(out, "Config source: {source}\n");
    }
    for (key, value) in doc {
        let rendered = format::format_value(value);
        if rendered.contains('\n') {
            let _ = writeln!(out, "{}:\n{}", format::format_key(key), indent(&rendered));
        } else {
            let _ = writeln!(out, "{}: {}", format::format_key(key), rendered);
        }
    }
    out
}

pub fn log(page: &LogPage, from: usize) -> String {
    let mut out = String::new();
    for line in &page.lines {
        let _ = writeln!(out, "{line}");
    }
    let _ = writeln!(
        out,
        "-- lines {}..{} of {}",
        from,
        from + page.lines.len(),
        page.total
    );
    out
}

fn key_values(pairs: &[(&str, String)]) -> String {
    let width = pairs.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
    let mut out = String::new();
    for (key, value) in pairs {
        let _ = writeln!(out, "{:<width$}  {}", key, value, width = width);
    }
    out
}

fn indent(text: &str) -> String {
    text.lines()
        .map(|l| format!("  {l}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use sinker_model::{Task, TaskStatus, TimeValue};
    use sinker_view::{FilterPatch, TaskView};
    use time::macros::offset;

    use super::*;

    const UTC8: UtcOffset = offset!(+8);

    fn task(name: &str, lag: i64) -> Task {
        Task {
            name: name.to_string(),
            cluster: "ck".into(),
            consumer_group: format!("cg-{name}"),
            lag,
            status: Some(TaskStatus::Running),
            ..Default::default()
        }
    }

    #[test]
    fn task_table_marks_lag_and_sort() {
        let mut view = TaskView::new();
        view.replace_tasks(vec![task("a", 15_000), task("b", 500), task("c", 2_000)]);
        view.set_sort(SortField::Lag);
        view.set_sort(SortField::Lag);

        let text = tasks(&view.page(), &view.state().sort, UTC8);
        let lines: Vec<&str> = text.lines().collect();

        assert!(lines[0].contains("Lag↓"));
        assert!(lines[0].contains("Topic  ConsumerGroup  Type"));
        assert!(lines[1].contains("cg-a"));
        assert!(lines[1].starts_with("a ") && lines[1].contains("15,000 !!"));
        assert!(lines[2].starts_with("c ") && lines[2].contains("2,000 !"));
        assert!(lines[3].starts_with("b ") && lines[3].contains("运行中"));
        assert!(text.contains("page 1/1, 3 of 3 tasks, 20 per page"));
    }

    #[test]
    fn task_table_empty_states() {
        let mut view = TaskView::new();
        assert_eq!(
            tasks(&view.page(), &view.state().sort, UTC8).trim(),
            "暂无任务数据"
        );

        view.replace_tasks(vec![task("a", 0)]);
        view.set_filter(FilterPatch::new().name("zzz"));
        assert_eq!(
            tasks(&view.page(), &view.state().sort, UTC8).trim(),
            "没有符合筛选条件的任务"
        );
    }

    #[test]
    fn status_panel() {
        let snap = TaskStatusSnapshot {
            status: Some(TaskStatus::Error),
            start_time: Some(TimeValue::Millis(0)),
            messages_total: Some(1_234_567),
            messages_per_sec: Some(1_530.0),
            kafka_lag: Some(25_000),
            error_count: 3,
            last_error: Some("write timeout".into()),
            ..Default::default()
        };
        let text = status("orders", Some(&snap), UTC8);

        assert!(text.contains("错误"));
        assert!(text.contains("1,234,567"));
        assert!(text.contains("1.5k/s"));
        assert!(text.contains("25.0K (critical)"));
        assert!(text.contains("write timeout"));
        assert!(text.lines().any(|l| l.starts_with("Start time") && l.ends_with('-')));

        assert_eq!(status("orders", None, UTC8), "orders: no status yet\n");
    }

    #[test]
    fn overview_panel() {
        let info = ProcInfo {
            version: "3.1.0".into(),
            commit: "0123456789abcdef".into(),
            memory: 1_048_576,
            uptime: 3_661,
            ..Default::default()
        };
        let text = overview(&info, UTC8);

        assert!(text.contains("01234567\n"));
        assert!(text.contains("1 MB"));
        assert!(text.contains("1h 1m 1s"));
        assert!(text.lines().any(|l| l.starts_with("Build time") && l.ends_with("N/A")));
    }

    #[test]
    fn config_panel_shows_source_and_keys() {
        let doc = json!({ "logLevel": "info", "clickhouse": { "hosts": ["a"] } })
            .as_object()
            .unwrap()
            .clone();
        let cmd = CmdLine {
            nacos_addr: "10.0.0.1:8848".into(),
            ..Default::default()
        };
        let text = config(&doc, Some(&cmd));

        assert!(text.starts_with("Config source: nacos 10.0.0.1:8848 (namespace N/A)"));
        assert!(text.contains("Log Level: info"));
        assert!(text.contains("Clickhouse:\n  {"));
    }

    #[test]
    fn log_footer() {
        let page = LogPage {
            total: 10,
            lines: vec!["x".into(), "y".into()],
        };
        assert_eq!(log(&page, 4), "x\ny\n-- lines 4..6 of 10\n");
    }
}
