use tasklist_core::{
    Intent, ListBody, MemoryKvRepository, TaskActions, TaskMode, TaskStore, TaskStoreConfig,
    TaskView,
};

fn store(repo: &MemoryKvRepository) -> TaskStore<&MemoryKvRepository, impl Fn() -> i64> {
    TaskStore::with_parts(repo, TaskStoreConfig::default(), || 100)
}

#[test]
fn empty_store_renders_placeholder() {
    let repo = MemoryKvRepository::new();
    let store = store(&repo);
    let mut view = TaskView::new();

    let rendered = view.render(&store);
    assert_eq!(rendered.body, ListBody::Empty("No tasks yet"));
    assert_eq!(rendered.title, "Task List");
    assert_eq!(rendered.placeholder, "Enter a task");
}

#[test]
fn typing_then_add_creates_task_and_clears_input() {
    let repo = MemoryKvRepository::new();
    let mut store = store(&repo);
    let mut view = TaskView::new();

    view.dispatch(&mut store, Intent::SetInput(" buy milk ".into()))
        .unwrap();
    assert_eq!(view.render(&store).input, " buy milk ");

    view.dispatch(&mut store, Intent::Add).unwrap();

    let rendered = view.render(&store);
    assert_eq!(rendered.input, "");
    assert_eq!(rendered.items().len(), 1);
    assert_eq!(rendered.items()[0].text, "buy milk");
    assert_eq!(rendered.items()[0].mode, TaskMode::Viewing);
}

#[test]
fn edit_flow_seeds_buffer_and_saves_it_verbatim() {
    let repo = MemoryKvRepository::new();
    let mut store = store(&repo);
    let mut view = TaskView::new();
    let id = store.add("draft").unwrap().unwrap();

    view.dispatch(&mut store, Intent::Edit(id)).unwrap();
    assert_eq!(view.edit_text(id), Some("draft"));
    {
        let rendered = view.render(&store);
        assert_eq!(rendered.items()[0].mode, TaskMode::Editing);
        assert_eq!(rendered.items()[0].edit_text.as_deref(), Some("draft"));
    }

    view.dispatch(&mut store, Intent::EditText(id, " final ".into()))
        .unwrap();
    assert_eq!(
        view.render(&store).items()[0].edit_text.as_deref(),
        Some(" final ")
    );

    view.dispatch(&mut store, Intent::Save(id)).unwrap();

    let rendered = view.render(&store);
    assert_eq!(rendered.items()[0].text, " final ");
    assert_eq!(rendered.items()[0].mode, TaskMode::Viewing);
    assert_eq!(rendered.items()[0].edit_text, None);
    assert_eq!(view.edit_text(id), None);
}

#[test]
fn switching_edit_target_discards_previous_buffer() {
    let repo = MemoryKvRepository::new();
    let mut store = store(&repo);
    let mut view = TaskView::new();
    let a = store.add("a").unwrap().unwrap();
    let b = store.add("b").unwrap().unwrap();

    view.dispatch(&mut store, Intent::Edit(a)).unwrap();
    view.dispatch(&mut store, Intent::EditText(a, "unsaved".into()))
        .unwrap();
    view.dispatch(&mut store, Intent::Edit(b)).unwrap();

    assert_eq!(view.edit_text(a), None);
    assert_eq!(view.edit_text(b), Some("b"));
    assert_eq!(store.get(a).unwrap().text, "a");

    let rendered = view.render(&store);
    let modes: Vec<_> = rendered.items().iter().map(|item| item.mode).collect();
    assert_eq!(modes, vec![TaskMode::Viewing, TaskMode::Editing]);
}

#[test]
fn edit_text_for_non_target_is_ignored() {
    let repo = MemoryKvRepository::new();
    let mut store = store(&repo);
    let mut view = TaskView::new();
    let a = store.add("a").unwrap().unwrap();

    view.dispatch(&mut store, Intent::EditText(a, "nope".into()))
        .unwrap();

    assert_eq!(view.edit_text(a), None);
    assert_eq!(store.get(a).unwrap().text, "a");
}

#[test]
fn save_after_delete_returns_to_viewing() {
    let repo = MemoryKvRepository::new();
    let mut store = store(&repo);
    let mut view = TaskView::new();
    let a = store.add("a").unwrap().unwrap();

    view.dispatch(&mut store, Intent::Edit(a)).unwrap();
    view.dispatch(&mut store, Intent::Delete(a)).unwrap();
    view.dispatch(&mut store, Intent::Save(a)).unwrap();

    assert_eq!(store.state().editing_id, None);
    assert!(store.is_empty());
    assert_eq!(repo.write_count(), 3);
}

#[test]
fn toggle_intent_marks_row_completed() {
    let repo = MemoryKvRepository::new();
    let mut store = store(&repo);
    let mut view = TaskView::new();
    let a = store.add("a").unwrap().unwrap();

    view.dispatch(&mut store, Intent::Toggle(a)).unwrap();

    assert!(view.render(&store).items()[0].completed);
    assert!(view.render(&store).to_string().contains("[x] 100 a"));
}

#[test]
fn render_is_reused_until_store_changes() {
    let repo = MemoryKvRepository::new();
    let mut store = store(&repo);
    let mut view = TaskView::new();
    let a = store.add("a").unwrap().unwrap();

    let first = view.render(&store).clone();
    assert_eq!(view.build_count(), 1);
    let second = view.render(&store).clone();
    assert_eq!(first, second);
    assert_eq!(view.build_count(), 1);

    store.add("b").unwrap();
    assert_eq!(view.render(&store).items().len(), 2);
    assert_eq!(view.build_count(), 2);

    view.dispatch(&mut store, Intent::Edit(a)).unwrap();
    view.render(&store);
    assert_eq!(view.build_count(), 3);
    view.dispatch(&mut store, Intent::EditText(a, "a2".to_string()))
        .unwrap();
    assert_eq!(view.render(&store).items()[0].edit_text.as_deref(), Some("a2"));
    assert_eq!(view.build_count(), 4);
    view.render(&store);
    assert_eq!(view.build_count(), 4);
}

#[test]
fn view_works_through_a_trait_object() {
    let repo = MemoryKvRepository::new();
    let mut concrete = store(&repo);
    let actions: &mut dyn TaskActions = &mut concrete;
    let mut view = TaskView::new();

    view.dispatch(actions, Intent::SetInput("via trait".into()))
        .unwrap();
    view.dispatch(actions, Intent::Add).unwrap();

    assert_eq!(view.render(&*actions).items()[0].text, "via trait");
}
