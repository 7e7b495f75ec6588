use taskpage_core::app::{App, Intent};
use taskpage_core::task::Status;
use taskpage_core::view::{SortField, StatusFilter, ViewControls};

fn session() -> App {
    let mut app = App::new(ViewControls::new(
        SortField::Description,
        StatusFilter::All,
        2,
    ));
    app.apply(Intent::Create("Task 1".to_string()))
        .expect("create");
    app.apply(Intent::Create("Task 2".to_string()))
        .expect("create");
    app.apply(Intent::OpenEdit(2)).expect("open");
    app.apply(Intent::EditStatus(Status::InProgress))
        .expect("stage");
    app.apply(Intent::SaveEdit).expect("save");
    app
}

#[test]
fn a_full_session_walkthrough() {
    let mut app = session();

    // Third task, finished, to make the status sort diverge from the
    // description sort.
    app.apply(Intent::Create("Another".to_string()))
        .expect("create");
    app.apply(Intent::OpenEdit(3)).expect("open");
    app.apply(Intent::EditDescription("Ship it".to_string()))
        .expect("stage");
    app.apply(Intent::EditStatus(Status::Finished)).expect("stage");
    app.apply(Intent::SaveEdit).expect("save");

    // Description sort across both pages: "Ship it", "Task 1" | "Task 2".
    let vm = app.view_model();
    assert_eq!(vm.visible.total_pages, 2);
    let first_page: Vec<&str> = vm
        .visible
        .tasks
        .iter()
        .map(|t| t.description.as_str())
        .collect();
    assert_eq!(first_page, vec!["Ship it", "Task 1"]);

    app.apply(Intent::SetPage(2)).expect("page");
    let vm = app.view_model();
    let second_page: Vec<&str> = vm
        .visible
        .tasks
        .iter()
        .map(|t| t.description.as_str())
        .collect();
    assert_eq!(second_page, vec!["Task 2"]);

    // Status sort is alphabetical on the label: Finished < In Progress
    // < Not Started, so the order becomes 3, 2, 1.
    app.apply(Intent::SetSort(SortField::Status)).expect("sort");
    app.apply(Intent::SetPage(1)).expect("page");
    let vm = app.view_model();
    let ids: Vec<u64> = vm.visible.tasks.iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![3, 2]);

    // Narrow to In Progress: one task, one page, the requested page 1.
    app.apply(Intent::SetFilter(StatusFilter::Only(Status::InProgress)))
        .expect("filter");
    let vm = app.view_model();
    assert_eq!(vm.visible.total_pages, 1);
    let ids: Vec<u64> = vm.visible.tasks.iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![2]);

    // Deleting never recycles ids.
    app.apply(Intent::SetFilter(StatusFilter::All)).expect("filter");
    app.apply(Intent::Delete(1)).expect("delete");
    let fresh = app
        .apply(Intent::Create("Replacement".to_string()))
        .expect("create")
        .expect("task returned");
    assert_eq!(fresh.id, 4);

    let mut ids: Vec<u64> = app.store().tasks().iter().map(|t| t.id).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), app.store().len());
}

#[test]
fn cancel_is_invisible_in_the_view_model() {
    let mut app = session();
    let before = app.view_model();

    app.apply(Intent::OpenEdit(2)).expect("open");
    app.apply(Intent::EditDescription("never saved".to_string()))
        .expect("stage");

    let during = app.view_model();
    let draft = during.edit.expect("session open");
    assert_eq!(draft.target_id, 2);
    assert_eq!(draft.description, "never saved");

    app.apply(Intent::CancelEdit).expect("cancel");
    assert_eq!(app.view_model(), before);
}

#[test]
fn shrinking_the_store_clamps_the_visible_page() {
    let mut app = session();
    app.apply(Intent::Create("Task 3".to_string())).expect("create");

    app.apply(Intent::SetPage(2)).expect("page");
    assert_eq!(app.view_model().visible.page, 2);

    app.apply(Intent::Delete(3)).expect("delete");
    let vm = app.view_model();
    assert_eq!(vm.visible.total_pages, 1);
    assert_eq!(vm.visible.page, 1);
    assert_eq!(vm.visible.tasks.len(), 2);
}

#[test]
fn view_model_exports_as_json() {
    let app = session();
    let json = serde_json::to_value(app.view_model()).expect("serialize");

    assert_eq!(json["visible"]["total_pages"], 1);
    assert_eq!(json["visible"]["tasks"][0]["description"], "Task 1");
    assert_eq!(json["visible"]["tasks"][1]["status"], "In Progress");
    assert!(json["edit"].is_null());
}
