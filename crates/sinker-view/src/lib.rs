//! Client-side projection of the sinker task list.
//!
//! The displayed table is a pure function of ([`TaskStore`], [`ViewState`]):
//! filter, then stable sort, then paginate. [`TaskView`] bundles both and
//! exposes the interactive operations; [`project`] is the function itself.

mod error;
pub use error::ViewError;

pub mod format;

mod query;
pub use query::{EmptyState, TaskPage, filter_and_sort, project, total_pages};

mod row;
pub use row::TaskRow;

mod state;
pub use state::{
    FilterPatch, PageSize, Pagination, SortField, SortOrder, SortState, TaskFilter, ViewState,
};

mod store;
pub use store::TaskStore;

mod view;
pub use view::TaskView;
