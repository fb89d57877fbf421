use super::*;
use crate::test_support::{loader, BackAwareController};

#[test]
fn unknown_view_is_not_found() {
    let loader = loader();
    let err = loader
        .load(&ViewId::from("nonexistent-view"))
        .err()
        .expect("missing view");
    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "view not found: nonexistent-view");
}

#[test]
fn every_load_builds_an_independent_controller() {
    let loader = loader();
    let first = loader.load(&ViewId::from("dashboard")).expect("first");
    let second = loader.load(&ViewId::from("dashboard")).expect("second");

    assert!(!first.controller.ptr_eq(&second.controller));
    assert!(first.root.controller().ptr_eq(&first.controller));

    first
        .controller
        .with(|controller: &mut BackAwareController| controller.attached = 7)
        .expect("downcast");
    let untouched = second
        .controller
        .with(|controller: &mut BackAwareController| controller.attached)
        .expect("downcast");
    assert_eq!(untouched, 0);
}

#[test]
fn registered_stylesheet_loads_from_memory() {
    let loader = loader();
    let style = loader
        .load_stylesheet(&StylesheetId::from("dashboard.css"))
        .expect("stylesheet");
    assert_eq!(style.id().as_str(), "dashboard.css");
    assert!(style.content().contains("accent"));
}

#[test]
fn missing_or_blank_stylesheet_is_not_found() {
    let loader = loader();
    for id in ["missing.css", "   "] {
        let err = loader
            .load_stylesheet(&StylesheetId::from(id))
            .expect_err("should be missing");
        assert!(err.is_not_found(), "{id:?} gave {err}");
    }
}

#[test]
fn stylesheet_dir_is_read_on_each_load() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("login.toml"), "dark_mode = false").expect("write");

    let loader = loader().with_stylesheet_dir(dir.path());
    let first = loader
        .load_stylesheet(&StylesheetId::from("/login.toml"))
        .expect("first load");
    assert_eq!(first.content(), "dark_mode = false");

    std::fs::write(dir.path().join("login.toml"), "dark_mode = true").expect("rewrite");
    let second = loader
        .load_stylesheet(&StylesheetId::from("/login.toml"))
        .expect("second load");
    assert_eq!(second.content(), "dark_mode = true");

    let err = loader
        .load_stylesheet(&StylesheetId::from("absent.toml"))
        .expect_err("absent file");
    assert!(err.is_not_found());
}
