#![forbid(unsafe_code)]
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

fn cli() -> Command {
    Command::cargo_bin("permanence-cli").unwrap()
}

#[test]
fn help_lists_subcommands() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("generate"))
        .stdout(predicate::str::contains("preview"));
}

#[test]
fn generate_then_preview_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let registry = dir.path().join("registry.json");
    let registry_arg = registry.to_str().unwrap();

    cli()
        .args(["--registry", registry_arg, "add-unit", "--name", "brigade"])
        .assert()
        .success();

    let people = dir.path().join("people.csv");
    fs::write(
        &people,
        "handle,display_name,unit,rank,score\nalice,Alice,brigade,cpl,5\nbob,Bob,brigade,sgt,2\n",
    )
    .unwrap();
    cli()
        .args([
            "--registry",
            registry_arg,
            "import-people",
            "--csv",
            people.to_str().unwrap(),
        ])
        .assert()
        .success();

    cli()
        .args([
            "--registry",
            registry_arg,
            "add-duty",
            "--unit",
            "brigade",
            "--name",
            "garde-jour",
        ])
        .assert()
        .success();

    cli()
        .args([
            "--registry",
            registry_arg,
            "generate",
            "--unit",
            "brigade",
            "--start",
            "2026-03-03",
            "--end",
            "2026-03-03",
            "--requested-by",
            "alice",
            "--deterministic",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 slot(s) created, 0 skipped"));

    // bob (score 2) prend la garde ; son score persiste dans le registre
    cli()
        .args(["--registry", registry_arg, "scores"])
        .assert()
        .success()
        .stdout(predicate::str::contains("bob | Bob | 3.00"));

    // l'aperçu ne modifie pas le fichier, octet pour octet
    let before = fs::read(&registry).unwrap();
    cli()
        .args([
            "--registry",
            registry_arg,
            "preview",
            "--unit",
            "brigade",
            "--start",
            "2026-03-04",
            "--end",
            "2026-03-06",
            "--requested-by",
            "alice",
            "--deterministic",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("3 slot(s) created"));
    let after = fs::read(&registry).unwrap();
    assert_eq!(before, after);

    cli()
        .args(["--registry", registry_arg, "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("garde-jour"));
}
