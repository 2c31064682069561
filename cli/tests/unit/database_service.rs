//! Database provisioner against a fake PostgreSQL.

use fazenda_installer::application::services::database::setup_database;
use fazenda_installer::domain::DatabaseCredentials;
use installer_common::DatabaseSetupResult;

use crate::mocks::{FakePostgres, MemFs, test_config};

fn creds(password: &str) -> DatabaseCredentials {
    DatabaseCredentials {
        name: "fazenda".into(),
        user: "farmer".into(),
        password: password.into(),
        host: "localhost".into(),
    }
}

fn panel_fs() -> MemFs {
    MemFs::new().with_path(test_config().platform.panel_marker)
}

#[tokio::test]
async fn without_panel_returns_manual_instructions_and_runs_nothing() {
    let config = test_config();
    let pg = FakePostgres::default();

    let result = setup_database(&pg, &MemFs::new(), &config.database, &config.platform, &creds("s3cret")).await;

    let DatabaseSetupResult::ManualSetupRequired { message } = result else {
        panic!("expected manual setup, got {result:?}");
    };
    assert!(message.contains("'fazenda'"));
    assert!(message.contains("'farmer'"));
    assert!(message.contains("'s3cret'"));
    assert!(pg.calls().is_empty());
}

#[tokio::test]
async fn first_run_creates_role_then_database() {
    let config = test_config();
    let pg = FakePostgres::default();

    let result = setup_database(&pg, &panel_fs(), &config.database, &config.platform, &creds("pw")).await;

    assert_eq!(
        result,
        DatabaseSetupResult::Provisioned {
            role_created: true,
            database_created: true,
            log: vec![
                "create role 'farmer': OK".to_string(),
                "create database 'fazenda': OK".to_string(),
            ],
        }
    );
    let creates = pg.creates.lock().expect("lock").clone();
    assert!(creates[0].starts_with("CREATE ROLE"));
    assert!(creates[1].starts_with("CREATE DATABASE"));
}

#[tokio::test]
async fn second_run_is_idempotent() {
    let config = test_config();
    let fs = panel_fs();
    let pg = FakePostgres::default();

    setup_database(&pg, &fs, &config.database, &config.platform, &creds("pw")).await;
    assert_eq!(pg.create_count(), 2);

    let second = setup_database(&pg, &fs, &config.database, &config.platform, &creds("pw")).await;

    assert_eq!(pg.create_count(), 2, "second run must not attempt creation");
    let DatabaseSetupResult::Provisioned {
        role_created,
        database_created,
        log,
    } = second
    else {
        panic!("expected provisioned result");
    };
    assert!(!role_created);
    assert!(!database_created);
    assert!(log.iter().all(|l| l.contains("already exists")));
}

#[tokio::test]
async fn existing_role_only_creates_database() {
    let config = test_config();
    let pg = FakePostgres::default().with_role("farmer");

    let result = setup_database(&pg, &panel_fs(), &config.database, &config.platform, &creds("pw")).await;

    assert!(matches!(
        result,
        DatabaseSetupResult::Provisioned {
            role_created: false,
            database_created: true,
            ..
        }
    ));
    assert_eq!(pg.create_count(), 1);
}

#[tokio::test]
async fn creation_failure_stays_in_log() {
    let config = test_config();
    let pg = FakePostgres {
        create_error: Some("ERROR:  permission denied to create role".into()),
        ..FakePostgres::default()
    };

    let result = setup_database(&pg, &panel_fs(), &config.database, &config.platform, &creds("pw")).await;

    let DatabaseSetupResult::Provisioned {
        role_created,
        database_created,
        log,
    } = result
    else {
        panic!("creation failure must not change the result kind");
    };
    assert!(!role_created, "failed CREATE ROLE reported as created");
    assert!(!database_created, "failed CREATE DATABASE reported as created");
    assert_eq!(log.len(), 2);
    assert!(log[0].contains("FAILED"));
    assert!(log[0].contains("permission denied"));
    assert!(log[1].contains("FAILED"));
}

#[tokio::test]
async fn password_travels_on_stdin_not_argv() {
    let config = test_config();
    let pg = FakePostgres::default();
    let password = "it's a \\secret";

    setup_database(&pg, &panel_fs(), &config.database, &config.platform, &creds(password)).await;

    for call in pg.calls() {
        assert_eq!(call.program, "sudo");
        assert_eq!(&call.args[..3], ["-u", "postgres", "psql"]);
        assert!(call.args.contains(&"ON_ERROR_STOP=1".to_string()));
        assert!(call.args.iter().all(|a| !a.contains("secret")));
        let stdin = call.stdin.expect("script on stdin");
        assert!(stdin.contains("\\set db_password 'it''s a \\\\secret'"));
    }
    // The fake decoded the bound values back to the originals.
    assert!(pg.roles.lock().expect("lock").contains("farmer"));
}

#[tokio::test]
async fn hostile_names_are_bound_not_spliced() {
    let config = test_config();
    let pg = FakePostgres::default();
    let creds = DatabaseCredentials {
        name: "farm\"; DROP DATABASE postgres; --".into(),
        ..creds("pw")
    };

    setup_database(&pg, &panel_fs(), &config.database, &config.platform, &creds).await;

    for statement in pg.creates.lock().expect("lock").iter() {
        assert!(!statement.contains("DROP"), "{statement}");
    }
    assert!(pg.databases.lock().expect("lock").contains(&creds.name));
}
