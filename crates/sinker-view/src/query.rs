use std::cmp::Ordering;

use sinker_model::{Task, TaskStatus, TaskType};

use crate::{
    row::TaskRow,
    state::{PageSize, SortField, SortOrder, SortState, TaskFilter, ViewState},
    store::TaskStore,
};

/// One rendered page of the task table.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskPage<'a> {
    /// Rows of the current page, filtered and sorted.
    pub items: Vec<&'a Task>,
    /// Size of the whole store.
    pub total: usize,
    /// Size of the filtered set, before pagination.
    pub filtered: usize,
    /// `ceil(filtered / page_size)`; zero when nothing matches.
    pub total_pages: usize,
    /// Page actually shown, always within `[1, max(total_pages, 1)]`.
    pub current_page: usize,
    pub page_size: PageSize,
    pub empty: Option<EmptyState>,
}

/// Why a page shows no rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyState {
    /// The backend returned no tasks.
    NoTasks,
    /// Tasks exist, but none pass the filter.
    NoMatches,
}

impl EmptyState {
    pub fn message(&self) -> &'static str {
        match self {
            EmptyState::NoTasks => "暂无任务数据",
            EmptyState::NoMatches => "没有符合筛选条件的任务",
        }
    }
}

impl TaskPage<'_> {
    /// Pager controls are only worth showing with more than one page.
    pub fn has_pager(&self) -> bool {
        self.filtered > 0 && self.total_pages > 1
    }

    pub fn rows(&self) -> Vec<TaskRow> {
        self.items.iter().map(|t| TaskRow::from_task(t)).collect()
    }
}

pub fn total_pages(filtered: usize, page_size: PageSize) -> usize {
    filtered.div_ceil(page_size.get())
}

/// Filter then stable-sort the store. Sorting never touches the store itself.
pub fn filter_and_sort<'a>(
    store: &'a TaskStore,
    filter: &TaskFilter,
    sort: &SortState,
) -> Vec<&'a Task> {
    let mut rows: Vec<&Task> = store.tasks().iter().filter(|t| filter.matches(t)).collect();

    if let Some(field) = sort.field {
        // `sort_by` is stable: ties keep their relative order in both directions.
        rows.sort_by(|a, b| {
            let ord = compare(a, b, field);
            match sort.order {
                SortOrder::Asc => ord,
                SortOrder::Desc => ord.reverse(),
            }
        });
    }
    rows
}

/// Derive the displayed page from the store and the view state.
pub fn project<'a>(store: &'a TaskStore, state: &ViewState) -> TaskPage<'a> {
    let rows = filter_and_sort(store, &state.filter, &state.sort);
    let filtered = rows.len();
    let page_size = state.page.page_size;
    let total_pages = total_pages(filtered, page_size);
    let current_page = state.page.current_page.clamp(1, total_pages.max(1));

    let start = (current_page - 1) * page_size.get();
    let items = rows.into_iter().skip(start).take(page_size.get()).collect();

    let empty = match (store.is_empty(), filtered) {
        (true, _) => Some(EmptyState::NoTasks),
        (false, 0) => Some(EmptyState::NoMatches),
        _ => None,
    };

    TaskPage {
        items,
        total: store.len(),
        filtered,
        total_pages,
        current_page,
        page_size,
        empty,
    }
}

fn compare(a: &Task, b: &Task, field: SortField) -> Ordering {
    match field {
        SortField::Name => cmp_text(&a.name, &b.name),
        SortField::Cluster => cmp_text(&a.cluster, &b.cluster),
        SortField::Table => cmp_text(&a.table, &b.table),
        SortField::Topic => cmp_text(&a.topic, &b.topic),
        SortField::ConsumerGroup => cmp_text(&a.consumer_group, &b.consumer_group),
        SortField::Type => cmp_opt_text(
            a.kind.as_ref().map(TaskType::as_str),
            b.kind.as_ref().map(TaskType::as_str),
        ),
        SortField::Status => cmp_opt_text(
            a.status.as_ref().map(TaskStatus::as_str),
            b.status.as_ref().map(TaskStatus::as_str),
        ),
        SortField::Lag => a.lag.cmp(&b.lag),
        SortField::WriteSpeed => cmp_opt_text(a.write_speed.as_deref(), b.write_speed.as_deref()),
        SortField::LastUpdate => a.last_update.cmp(&b.last_update),
    }
}

/// Absent values sort first.
fn cmp_opt_text(a: Option<&str>, b: Option<&str>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => cmp_text(x, y),
        (x, y) => x.is_some().cmp(&y.is_some()),
    }
}

fn cmp_text(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        format::{LagLevel, lag_level},
        state::FilterPatch,
    };

    fn task(name: &str, kind: &str, status: &str, lag: i64) -> Task {
        Task {
            name: name.into(),
            kind: Some(kind.into()),
            status: Some(status.into()),
            lag,
            ..Default::default()
        }
    }

    fn names(page: &TaskPage<'_>) -> Vec<String> {
        page.items.iter().map(|t| t.name.clone()).collect()
    }

    fn five() -> TaskStore {
        TaskStore::from(vec![
            task("orders", "metric", "running", 10),
            task("users", "log", "running", 20),
            task("clicks", "metric", "stopped", 30),
            task("audit", "log", "error", 40),
            task("Payments", "metric", "running", 50),
        ])
    }

    #[test]
    fn type_filter_keeps_only_matching_rows() {
        let store = five();
        let mut state = ViewState::default();
        state.filter.merge(FilterPatch::new().kind("metric"));

        let page = project(&store, &state);
        assert_eq!(page.filtered, 3);
        assert!(page.items.iter().all(|t| t.kind == Some(TaskType::Metric)));
        assert_eq!(page.total, 5);
    }

    #[test]
    fn filtered_set_is_subset_satisfying_all_predicates() {
        let store = five();
        let mut state = ViewState::default();
        state
            .filter
            .merge(FilterPatch::new().name("S").kind("metric").status("running"));

        let page = project(&store, &state);
        assert_eq!(names(&page), vec!["orders", "Payments"]);
        for t in &page.items {
            assert!(state.filter.matches(t));
            assert!(store.tasks().contains(t));
        }
    }

    #[test]
    fn name_filter_scenario_with_lag_levels() {
        let store = TaskStore::from(vec![
            task("a", "metric", "running", 15000),
            task("b", "log", "running", 500),
        ]);
        let mut state = ViewState::default();
        state.filter.merge(FilterPatch::new().name("a"));

        let page = project(&store, &state);
        assert_eq!(names(&page), vec!["a"]);
        assert_eq!(lag_level(store.tasks()[0].lag), LagLevel::Critical);
        assert_eq!(lag_level(store.tasks()[1].lag), LagLevel::Normal);
    }

    #[test]
    fn text_sort_is_case_insensitive() {
        let store = five();
        let mut state = ViewState::default();
        state.sort.select(SortField::Name);

        let page = project(&store, &state);
        assert_eq!(names(&page), vec!["audit", "clicks", "orders", "Payments", "users"]);

        state.sort.select(SortField::Name);
        let page = project(&store, &state);
        assert_eq!(names(&page), vec!["users", "Payments", "orders", "clicks", "audit"]);
    }

    #[test]
    fn numeric_sort_by_value() {
        let store = TaskStore::from(vec![
            task("x", "log", "running", 900),
            task("y", "log", "running", 10000),
            task("z", "log", "running", 85),
        ]);
        let mut state = ViewState::default();
        state.sort.select(SortField::Lag);
        assert_eq!(names(&project(&store, &state)), vec!["z", "x", "y"]);
    }

    #[test]
    fn ties_keep_store_order_across_toggles() {
        let store = TaskStore::from(vec![
            task("t1", "metric", "running", 1),
            task("t2", "log", "running", 2),
            task("t3", "metric", "running", 3),
            task("t4", "log", "running", 4),
        ]);
        let mut state = ViewState::default();

        for _ in 0..3 {
            state.sort.select(SortField::Status);
            let page = project(&store, &state);
            assert_eq!(names(&page), vec!["t1", "t2", "t3", "t4"]);
        }

        state.sort.select(SortField::Type);
        assert_eq!(names(&project(&store, &state)), vec!["t2", "t4", "t1", "t3"]);
        state.sort.select(SortField::Type);
        assert_eq!(names(&project(&store, &state)), vec!["t1", "t3", "t2", "t4"]);
    }

    #[test]
    fn missing_optional_values_sort_first() {
        let mut a = task("a", "log", "running", 0);
        a.write_speed = Some("2k/s".into());
        a.last_update = Some(2);
        let b = task("b", "log", "running", 0);
        let mut c = task("c", "log", "running", 0);
        c.write_speed = Some("1K/s".into());
        c.last_update = Some(1);
        let store = TaskStore::from(vec![a, b, c]);

        let mut state = ViewState::default();
        state.sort.select(SortField::WriteSpeed);
        assert_eq!(names(&project(&store, &state)), vec!["b", "c", "a"]);

        state.sort.select(SortField::LastUpdate);
        assert_eq!(names(&project(&store, &state)), vec!["b", "c", "a"]);
    }

    #[test]
    fn sorting_does_not_reorder_store() {
        let store = five();
        let mut state = ViewState::default();
        state.sort.select(SortField::Lag);
        state.sort.select(SortField::Lag);
        let _ = project(&store, &state);
        assert_eq!(store.tasks()[0].name, "orders");
    }

    #[test]
    fn total_pages_is_ceiling() {
        for (count, size, expected) in [
            (0, PageSize::Ten, 0),
            (1, PageSize::Ten, 1),
            (10, PageSize::Ten, 1),
            (11, PageSize::Ten, 2),
            (25, PageSize::Ten, 3),
            (100, PageSize::Hundred, 1),
            (101, PageSize::Fifty, 3),
        ] {
            assert_eq!(total_pages(count, size), expected, "count={count}");
        }
    }

    #[test]
    fn page_window() {
        let tasks = (0..25)
            .map(|i| task(&format!("t{i:02}"), "log", "running", i))
            .collect::<Vec<_>>();
        let store = TaskStore::from(tasks);
        let mut state = ViewState::default();
        state.page.page_size = PageSize::Ten;
        state.page.current_page = 3;

        let page = project(&store, &state);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.items.len(), 5);
        assert_eq!(page.items[0].name, "t20");
        assert!(page.has_pager());
    }

    #[test]
    fn empty_store_and_empty_filter_result_differ() {
        let empty = TaskStore::new();
        let page = project(&empty, &ViewState::default());
        assert_eq!(page.empty, Some(EmptyState::NoTasks));
        assert_eq!(page.total_pages, 0);
        assert_eq!(page.current_page, 1);
        assert!(page.items.is_empty());

        let store = five();
        let mut state = ViewState::default();
        state.filter.merge(FilterPatch::new().name("nothing-like-this"));
        let page = project(&store, &state);
        assert_eq!(page.empty, Some(EmptyState::NoMatches));
        assert!(page.items.is_empty());
        assert!(!page.has_pager());
        assert_ne!(EmptyState::NoTasks.message(), EmptyState::NoMatches.message());
    }

    #[test]
    fn projection_is_pure() {
        let store = five();
        let mut state = ViewState::default();
        state.sort.select(SortField::Lag);
        let first = project(&store, &state);
        let second = project(&store, &state);
        assert_eq!(first, second);
    }

    #[test]
    fn tasks_without_type_or_status_never_match_those_filters() {
        let tasks: Vec<Task> = serde_json::from_str(
            r#"[{"Name":"no_type_no_status","Lag":1},
                {"Name":"real_metric","Type":"metric","Status":"running","Lag":2}]"#,
        )
        .unwrap();
        let store = TaskStore::from(tasks);

        let mut state = ViewState::default();
        state.filter.merge(FilterPatch::new().kind("metric"));
        assert_eq!(names(&project(&store, &state)), vec!["real_metric"]);

        state.filter.merge(FilterPatch::new().kind("").status("running"));
        assert_eq!(names(&project(&store, &state)), vec!["real_metric"]);

        let bare = TaskRow::from_task(&store.tasks()[0]);
        assert_eq!(bare.status_label, "");
        assert_eq!(bare.status_class, "");
        assert_eq!(bare.kind, None);
    }

    #[test]
    fn missing_type_and_status_sort_first() {
        let store = TaskStore::from(vec![
            task("typed", "log", "stopped", 0),
            Task {
                name: "bare".into(),
                ..Default::default()
            },
        ]);
        let mut state = ViewState::default();

        state.sort.select(SortField::Type);
        assert_eq!(names(&project(&store, &state)), vec!["bare", "typed"]);

        state.sort.select(SortField::Status);
        assert_eq!(names(&project(&store, &state)), vec!["bare", "typed"]);
    }
}
