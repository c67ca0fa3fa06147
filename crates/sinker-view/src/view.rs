use sinker_model::Task;

use crate::{
    query::{TaskPage, filter_and_sort, project, total_pages},
    state::{FilterPatch, PageSize, SortField, ViewState},
    store::TaskStore,
};

/// Interactive task table: the store plus the user's view state.
#[derive(Debug, Clone, Default)]
pub struct TaskView {
    store: TaskStore,
    state: ViewState,
}

impl TaskView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: ViewState) -> Self {
        let mut view = Self {
            store: TaskStore::new(),
            state,
        };
        view.clamp_page();
        view
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Wholesale refresh from the backend. Filter and sort survive.
    pub fn replace_tasks(&mut self, tasks: Vec<Task>) {
        self.store.replace(tasks);
        self.clamp_page();
    }

    /// Merge a partial filter. Does not jump back to the first page.
    pub fn set_filter(&mut self, patch: FilterPatch) {
        self.state.filter.merge(patch);
        self.clamp_page();
    }

    pub fn clear_filters(&mut self) {
        self.state.filter = Default::default();
        self.state.page.current_page = 1;
    }

    pub fn set_sort(&mut self, field: SortField) {
        self.state.sort.select(field);
        self.state.page.current_page = 1;
    }

    pub fn set_page_size(&mut self, size: PageSize) {
        self.state.page.page_size = size;
        self.state.page.current_page = 1;
    }

    /// Jump to page `n`, clamped to the existing pages (page 1 when nothing matches).
    pub fn set_page(&mut self, n: usize) {
        let pages = self.total_pages();
        self.state.page.current_page = if pages == 0 { 1 } else { n.clamp(1, pages) };
    }

    pub fn first_page(&mut self) {
        self.set_page(1);
    }

    pub fn last_page(&mut self) {
        self.set_page(self.total_pages());
    }

    pub fn next_page(&mut self) {
        self.set_page(self.state.page.current_page.saturating_add(1));
    }

    pub fn prev_page(&mut self) {
        self.set_page(self.state.page.current_page.saturating_sub(1));
    }

    pub fn filtered_count(&self) -> usize {
        self.store
            .tasks()
            .iter()
            .filter(|t| self.state.filter.matches(t))
            .count()
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.filtered_count(), self.state.page.page_size)
    }

    /// Filtered and sorted rows across all pages.
    pub fn filtered(&self) -> Vec<&Task> {
        filter_and_sort(&self.store, &self.state.filter, &self.state.sort)
    }

    pub fn page(&self) -> TaskPage<'_> {
        project(&self.store, &self.state)
    }

    fn clamp_page(&mut self) {
        let pages = self.total_pages().max(1);
        self.state.page.current_page = self.state.page.current_page.clamp(1, pages);
    }
}
