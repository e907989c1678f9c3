use std::path::Path;

use googkit::config_file::ConfigError;
use googkit::plugin::{self, Builtins};
use googkit::{Arguments, CommandTree, ConfigSources, Dispatcher, Error, Outcome};

fn write_config(dir: &Path, content: &str) -> ConfigSources {
    let path = dir.join("googkit.yaml");
    std::fs::write(&path, content).unwrap();
    ConfigSources {
        project: Some(path),
        ..Default::default()
    }
}

fn builtin_dispatcher(sources: ConfigSources) -> Dispatcher {
    Dispatcher::new(plugin::default_tree(&[]).unwrap()).with_sources(sources)
}

fn dispatch(dispatcher: &Dispatcher, tokens: &[&str], cwd: &Path) -> Result<Outcome, Error> {
    dispatcher.dispatch(&Arguments::parse(tokens.iter().copied()), cwd)
}

fn read(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap_or_default()
}

#[test]
fn test_unknown_command_lists_top_level() {
    let dir = tempfile::tempdir().unwrap();
    let dispatcher = builtin_dispatcher(ConfigSources::default());

    let outcome = dispatch(&dispatcher, &["bogus"], dir.path()).unwrap();

    assert_eq!(
        outcome,
        Outcome::Help(
            [
                "Usage: googkit <command>",
                "",
                "Available commands:",
                "    build",
                "    config",
                "    deps",
                "    init",
                "    ready",
                "    setup",
            ]
            .join("\n")
        )
    );
}

#[test]
fn test_branch_lists_children() {
    let dir = tempfile::tempdir().unwrap();
    let dispatcher = builtin_dispatcher(ConfigSources::default());

    let outcome = dispatch(&dispatcher, &["deps"], dir.path()).unwrap();

    assert_eq!(
        outcome,
        Outcome::Help(
            "Usage: googkit deps <command>\n\nAvailable commands:\n    update".to_string()
        )
    );
}

#[test]
fn test_setup_runs_sequence_then_outer_leaf() {
    let dir = tempfile::tempdir().unwrap();
    let sources = write_config(
        dir.path(),
        r#"
download: echo download >> steps.log
update_deps: echo deps >> steps.log
apply_config: echo apply >> steps.log
"#,
    );
    let dispatcher = builtin_dispatcher(sources);

    let outcome = dispatch(&dispatcher, &["setup"], dir.path()).unwrap();

    assert_eq!(outcome, Outcome::Completed);
    assert_eq!(read(&dir.path().join("steps.log")), "download\ndeps\napply\ndeps\n");
}

#[test]
fn test_setup_stops_at_first_failed_hook() {
    let dir = tempfile::tempdir().unwrap();
    let sources = write_config(
        dir.path(),
        r#"
download: echo download >> steps.log
update_deps: echo no network >&2; exit 2
apply_config: echo apply >> steps.log
"#,
    );
    let dispatcher = builtin_dispatcher(sources);

    let result = dispatch(&dispatcher, &["setup"], dir.path());

    match result {
        Err(Error::ProcessFailed {
            message,
            exit_code,
            stderr,
        }) => {
            assert_eq!(message, "Dependency update failed");
            assert_eq!(exit_code, Some(2));
            assert_eq!(stderr, "no network\n");
        }
        other => panic!("Expected ProcessFailed, got: {other:?}"),
    }
    // Earlier work is kept, later members never ran.
    assert_eq!(read(&dir.path().join("steps.log")), "download\n");
}

#[test]
fn test_user_layer_overrides_default_for_hooks() {
    let dir = tempfile::tempdir().unwrap();
    let default = dir.path().join("default.yaml");
    let user = dir.path().join("user.yaml");
    std::fs::write(
        &default,
        "update_deps: echo default >> steps.log\napply_config: echo apply >> steps.log\n",
    )
    .unwrap();
    std::fs::write(&user, "update_deps: echo user >> steps.log\n").unwrap();
    let dispatcher = builtin_dispatcher(ConfigSources {
        user: Some(user),
        default: Some(default),
        ..Default::default()
    });

    dispatch(&dispatcher, &["ready"], dir.path()).unwrap();

    assert_eq!(read(&dir.path().join("steps.log")), "apply\nuser\n");
}

#[test]
fn test_missing_config_surfaces_missing_key() {
    let dir = tempfile::tempdir().unwrap();
    let dispatcher = builtin_dispatcher(ConfigSources {
        project: Some(dir.path().join("googkit.yaml")),
        ..Default::default()
    });

    let result = dispatch(&dispatcher, &["deps", "update"], dir.path());

    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::MissingKey(key))) if key == "update_deps"
    ));
}

#[test]
fn test_init_uses_registered_template() {
    let template = tempfile::tempdir().unwrap();
    std::fs::write(template.path().join("googkit.yaml"), "build: true\n").unwrap();
    let project = tempfile::tempdir().unwrap();
    let mut tree = CommandTree::new();
    let builtins = Builtins::with_template(template.path().to_path_buf());
    plugin::load(&mut tree, &[&builtins]).unwrap();
    let dispatcher = Dispatcher::new(tree);

    dispatch(&dispatcher, &["init"], project.path()).unwrap();
    assert_eq!(read(&project.path().join("googkit.yaml")), "build: true\n");

    let again = dispatch(&dispatcher, &["init"], project.path());
    assert!(matches!(again, Err(Error::Conflict(names)) if names == ["googkit.yaml"]));
}

#[test]
fn test_build_copies_sources_and_runs_builder() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    std::fs::create_dir_all(root.join("development/js")).unwrap();
    std::fs::write(root.join("development/index.html"), "<html>").unwrap();
    std::fs::write(root.join("development/js/main.js"), "main").unwrap();
    let mut sources = write_config(
        root,
        r#"
development_dir: development
debug_dir: debug
production_dir: production
build: echo "$GOOGKIT_BUILD_MODE" > "$GOOGKIT_OUTPUT_DIR/mode.txt"
"#,
    );
    sources.project_root = Some(root.to_path_buf());
    let dispatcher = builtin_dispatcher(sources);

    dispatch(&dispatcher, &["build", "--debug"], root).unwrap();
    assert_eq!(read(&root.join("debug/mode.txt")), "debug\n");
    assert!(root.join("debug/js/main.js").is_file());

    dispatch(&dispatcher, &["build"], root).unwrap();
    assert_eq!(read(&root.join("production/mode.txt")), "production\n");
    assert!(root.join("production/index.html").is_file());

    std::fs::write(root.join("production/stale.js"), "old").unwrap();
    dispatch(&dispatcher, &["build", "--clean"], root).unwrap();
    assert!(!root.join("production/stale.js").exists());
    assert!(root.join("production/mode.txt").is_file());
}
