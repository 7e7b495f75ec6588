use std::cmp::Ordering;

use serde::Serialize;
use tracing::trace;

use crate::task::{Status, Task};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Description,
    Status,
}

impl SortField {
    pub fn parse(text: &str) -> Option<Self> {
        match text.to_ascii_lowercase().as_str() {
            "description" | "desc" => Some(Self::Description),
            "status" => Some(Self::Status),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Description => "description",
            Self::Status => "status",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    All,
    Only(Status),
}

impl StatusFilter {
    pub fn matches(&self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Only(status) => task.status == *status,
        }
    }

    pub fn parse(text: &str) -> Option<Self> {
        if text.eq_ignore_ascii_case("all") {
            return Some(Self::All);
        }
        Status::parse(text).map(Self::Only)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Only(status) => status.label(),
        }
    }
}

/// Read-only inputs to the derivation pipeline. The requested `page` is
/// kept exactly as the user asked for it; clamping happens in `derive`,
/// so widening the filter later can restore the requested page.
#[derive(Debug, Clone)]
pub struct ViewControls {
    pub sort_field: SortField,
    pub filter: StatusFilter,
    pub page: usize,
    pub page_size: usize,
}

impl ViewControls {
    pub fn new(sort_field: SortField, filter: StatusFilter, page_size: usize) -> Self {
        Self {
            sort_field,
            filter,
            page: 1,
            page_size,
        }
    }
}

/// One visible page of the filtered, sorted collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    pub tasks: Vec<Task>,
    pub page: usize,
    pub total_pages: usize,
}

/// Filter by status, stable-sort by the chosen field, slice one page.
///
/// Pure: no caching, recomputed from scratch on every intent. An empty
/// result still reports one (empty) page so page numbers stay 1-based.
pub fn derive(tasks: &[Task], controls: &ViewControls) -> Page {
    let mut rows: Vec<Task> = tasks
        .iter()
        .filter(|task| controls.filter.matches(task))
        .cloned()
        .collect();

    rows.sort_by(|a, b| compare(a, b, controls.sort_field));

    let page_size = controls.page_size.max(1);
    let total_pages = rows.len().div_ceil(page_size).max(1);
    let page = controls.page.clamp(1, total_pages);

    let start = (page - 1) * page_size;
    let end = (start + page_size).min(rows.len());
    let visible = if start < rows.len() {
        rows[start..end].to_vec()
    } else {
        Vec::new()
    };

    trace!(
        filtered = rows.len(),
        page,
        total_pages,
        visible = visible.len(),
        "derived view"
    );

    Page {
        tasks: visible,
        page,
        total_pages,
    }
}

// Status sorts alphabetically on its display label, not by workflow
// order: "Finished" < "In Progress" < "Not Started". That matches the
// observed behavior and is load-bearing for output compatibility.
fn compare(a: &Task, b: &Task, field: SortField) -> Ordering {
    match field {
        SortField::Description => a
            .description
            .to_ascii_lowercase()
            .cmp(&b.description.to_ascii_lowercase()),
        SortField::Status => a.status.label().cmp(b.status.label()),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::{Page, SortField, StatusFilter, ViewControls, derive};
    use crate::task::{Status, Task};

    fn task(id: u64, description: &str, status: Status) -> Task {
        let now = Utc.with_ymd_and_hms(2026, 8, 30, 12, 0, 0).unwrap();
        let mut task = Task::new(id, description.to_string(), now);
        task.status = status;
        task
    }

    fn controls(sort_field: SortField, filter: StatusFilter, page_size: usize) -> ViewControls {
        ViewControls::new(sort_field, filter, page_size)
    }

    fn visible_ids(page: &Page) -> Vec<u64> {
        page.tasks.iter().map(|t| t.id).collect()
    }

    #[test]
    fn derive_is_pure() {
        let tasks = vec![
            task(1, "B", Status::NotStarted),
            task(2, "A", Status::InProgress),
        ];
        let controls = controls(SortField::Description, StatusFilter::All, 2);

        let first = derive(&tasks, &controls);
        let second = derive(&tasks, &controls);
        assert_eq!(first, second);
    }

    #[test]
    fn sorts_by_description() {
        let tasks = vec![
            task(1, "B", Status::NotStarted),
            task(2, "A", Status::InProgress),
        ];
        let page = derive(&tasks, &controls(SortField::Description, StatusFilter::All, 10));
        assert_eq!(visible_ids(&page), vec![2, 1]);
    }

    #[test]
    fn status_sort_is_alphabetical_on_labels() {
        // "Finished" < "In Progress" < "Not Started"
        let tasks = vec![
            task(1, "B", Status::NotStarted),
            task(2, "A", Status::InProgress),
            task(3, "C", Status::Finished),
        ];
        let page = derive(&tasks, &controls(SortField::Status, StatusFilter::All, 10));
        assert_eq!(visible_ids(&page), vec![3, 2, 1]);
    }

    #[test]
    fn sort_is_stable_for_equal_keys() {
        let tasks = vec![
            task(1, "same", Status::NotStarted),
            task(2, "same", Status::NotStarted),
            task(3, "same", Status::NotStarted),
        ];
        let page = derive(&tasks, &controls(SortField::Description, StatusFilter::All, 10));
        assert_eq!(visible_ids(&page), vec![1, 2, 3]);
    }

    #[test]
    fn filter_keeps_only_matching_status() {
        let tasks = vec![
            task(1, "a", Status::NotStarted),
            task(2, "b", Status::InProgress),
            task(3, "c", Status::InProgress),
        ];
        let page = derive(
            &tasks,
            &controls(
                SortField::Description,
                StatusFilter::Only(Status::InProgress),
                10,
            ),
        );
        assert_eq!(visible_ids(&page), vec![2, 3]);
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn pages_partition_the_filtered_list() {
        let tasks = vec![
            task(1, "a", Status::NotStarted),
            task(2, "b", Status::NotStarted),
            task(3, "c", Status::NotStarted),
        ];
        let mut ctl = controls(SortField::Description, StatusFilter::All, 2);

        let first = derive(&tasks, &ctl);
        assert_eq!(first.total_pages, 2);
        assert_eq!(first.tasks.len(), 2);

        ctl.page = 2;
        let second = derive(&tasks, &ctl);
        assert_eq!(second.tasks.len(), 1);

        let total: usize = first.tasks.len() + second.tasks.len();
        assert_eq!(total, 3);
        assert!(first.tasks.len() <= ctl.page_size);
        assert!(second.tasks.len() <= ctl.page_size);
    }

    #[test]
    fn out_of_range_page_clamps_to_last() {
        let tasks = vec![
            task(1, "a", Status::NotStarted),
            task(2, "b", Status::NotStarted),
            task(3, "c", Status::NotStarted),
        ];
        let mut ctl = controls(SortField::Description, StatusFilter::All, 2);
        ctl.page = 9;

        let page = derive(&tasks, &ctl);
        assert_eq!(page.page, 2);
        assert_eq!(visible_ids(&page), vec![3]);
    }

    #[test]
    fn empty_result_still_has_one_page() {
        let tasks = vec![task(1, "a", Status::NotStarted)];
        let page = derive(
            &tasks,
            &controls(
                SortField::Description,
                StatusFilter::Only(Status::Finished),
                2,
            ),
        );
        assert!(page.tasks.is_empty());
        assert_eq!(page.page, 1);
        assert_eq!(page.total_pages, 1);
    }
}
