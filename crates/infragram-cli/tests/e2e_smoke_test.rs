use std::{fs, path::PathBuf};

use tempfile::tempdir;

use infragram::{DiagramBuilder, document::DocumentFormat};
use infragram_cli::{Args, BuiltinArgs, Command, FormatArg, catalog, run};

fn args(command: Command) -> Args {
    Args {
        command,
        config: None,
        log_level: "off".to_string(),
    }
}

/// Every builtin subcommand, paired with its catalog name.
fn builtin_commands(output: &str) -> Vec<(&'static str, Command)> {
    let builtin = || BuiltinArgs {
        output: Some(output.to_string()),
        format: None,
    };
    vec![
        ("simple-web-stack", Command::SimpleWebStack(builtin())),
        ("request-flow", Command::RequestFlow(builtin())),
        ("distributed-web", Command::DistributedWeb(builtin())),
        ("load-balancing", Command::LoadBalancing(builtin())),
        ("database-replication", Command::DatabaseReplication(builtin())),
        ("secured-web", Command::SecuredWeb(builtin())),
        ("scale-up", Command::ScaleUp(builtin())),
        ("infrastructure-issues", Command::InfrastructureIssues(builtin())),
        ("security-layers", Command::SecurityLayers(builtin())),
        ("monitoring-flow", Command::MonitoringFlow(builtin())),
        ("ssl-encryption", Command::SslEncryption(builtin())),
        ("component-separation", Command::ComponentSeparation(builtin())),
        ("load-balancer-clustering", Command::LoadBalancerClustering(builtin())),
        ("resource-optimization", Command::ResourceOptimization(builtin())),
    ]
}

/// Collects the catalog's .toml documents
fn collect_diagram_files() -> Vec<PathBuf> {
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("diagrams");
    let mut files: Vec<PathBuf> = fs::read_dir(&dir)
        .expect("diagrams directory exists")
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.extension().and_then(|s| s.to_str()) == Some("toml"))
        .collect();
    files.sort();
    files
}

#[test]
fn e2e_smoke_test_builtin_commands() {
    let temp_dir = tempdir().expect("Failed to create temp directory");

    let mut failed = Vec::new();
    for name in catalog::BUILTINS.iter().map(|diagram| diagram.name) {
        let output = temp_dir.path().join(format!("{name}.svg"));
        let commands = builtin_commands(&output.to_string_lossy());
        let (_, command) = commands
            .into_iter()
            .find(|(command_name, _)| *command_name == name)
            .unwrap_or_else(|| panic!("no subcommand for built-in `{name}`"));

        match run(&args(command)) {
            Ok(()) => {
                let svg = fs::read_to_string(&output).unwrap();
                assert!(svg.starts_with("<svg"), "{name} did not produce SVG");
            }
            Err(err) => failed.push((name, err)),
        }
    }

    if !failed.is_empty() {
        for (name, err) in &failed {
            eprintln!("  - {name}: {err}");
        }
        panic!("{} built-in diagram(s) failed", failed.len());
    }
}

#[test]
fn e2e_builtin_diagrams_are_clean() {
    let builder = DiagramBuilder::default();
    for diagram in catalog::BUILTINS {
        let scene = builder
            .parse_document(diagram.source, DocumentFormat::Toml)
            .unwrap_or_else(|err| panic!("{}: {err}", diagram.name));
        let diagnostics = builder.check(&scene);
        assert!(
            diagnostics.is_empty(),
            "{} reported {diagnostics:?}",
            diagram.name
        );
    }
}

#[test]
fn e2e_catalog_matches_diagram_files() {
    let files = collect_diagram_files();
    assert_eq!(files.len(), catalog::BUILTINS.len());
    for path in &files {
        let stem = path.file_stem().unwrap().to_string_lossy();
        assert!(catalog::find(&stem).is_some(), "{stem} is not in the catalog");
    }
}

#[test]
fn e2e_render_and_check_documents() {
    let temp_dir = tempdir().expect("Failed to create temp directory");

    for path in collect_diagram_files() {
        let input = path.to_string_lossy().to_string();
        run(&args(Command::Check {
            input: input.clone(),
        }))
        .unwrap_or_else(|err| panic!("check {input}: {err}"));

        let output = temp_dir
            .path()
            .join(path.file_name().unwrap())
            .with_extension("svg");
        run(&args(Command::Render {
            input: input.clone(),
            output: Some(output.to_string_lossy().to_string()),
            format: Some(FormatArg::Svg),
        }))
        .unwrap_or_else(|err| panic!("render {input}: {err}"));
        assert!(output.exists());
    }
}

#[test]
fn e2e_render_defaults_output_next_to_input() {
    let temp_dir = tempdir().unwrap();
    let input = temp_dir.path().join("stack.toml");
    fs::write(&input, catalog::find("request-flow").unwrap().source).unwrap();

    run(&args(Command::Render {
        input: input.to_string_lossy().to_string(),
        output: None,
        format: None,
    }))
    .unwrap();

    assert!(temp_dir.path().join("stack.svg").exists());
}

#[test]
fn e2e_broken_document_fails() {
    let temp_dir = tempdir().unwrap();
    let input = temp_dir.path().join("broken.toml");
    fs::write(
        &input,
        r#"
[canvas]
width = 100
height = 100

[[nodes]]
id = "web"
x = 10
y = 10
width = 20
height = 20

[[connectors]]
from = "web"
to = "db"
"#,
    )
    .unwrap();
    let input = input.to_string_lossy().to_string();

    let err = run(&args(Command::Check {
        input: input.clone(),
    }))
    .unwrap_err();
    assert_eq!(err.diagnostics().unwrap()[0].code(), "unresolved-anchor");

    let output = temp_dir.path().join("broken.svg");
    assert!(
        run(&args(Command::Render {
            input,
            output: Some(output.to_string_lossy().to_string()),
            format: None,
        }))
        .is_err()
    );
    assert!(!output.exists());
}

#[test]
fn e2e_missing_config_fails() {
    let temp_dir = tempdir().unwrap();
    let mut args = args(Command::List);
    args.config = Some(
        temp_dir
            .path()
            .join("absent.toml")
            .to_string_lossy()
            .to_string(),
    );

    assert!(run(&args).is_err());
}

#[cfg(feature = "png")]
#[test]
fn e2e_builtin_png() {
    let temp_dir = tempdir().unwrap();
    let output = temp_dir.path().join("scale-up.png");

    run(&args(Command::ScaleUp(BuiltinArgs {
        output: Some(output.to_string_lossy().to_string()),
        format: Some(FormatArg::Png),
    })))
    .unwrap();

    let png = fs::read(&output).unwrap();
    assert_eq!(&png[1..4], b"PNG");
}
