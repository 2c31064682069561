//! Application service: database role and database provisioning.
//!
//! Every statement goes through `psql` on stdin. Values are bound with
//! `\set` and referenced as `:'var'` (literal) or `:"var"` (identifier), so
//! psql does the quoting and no user input is ever spliced into SQL.

use std::path::Path;

use installer_common::DatabaseSetupResult;

use crate::application::ports::{CommandRunner, LocalFs};
use crate::domain::DatabaseCredentials;
use crate::domain::config::{DatabaseConfig, PlatformConfig};

const ROLE_EXISTS_SQL: &str = "SELECT 1 FROM pg_roles WHERE rolname = :'db_user';";
const CREATE_ROLE_SQL: &str = "CREATE ROLE :\"db_user\" WITH LOGIN PASSWORD :'db_password';";
const DATABASE_EXISTS_SQL: &str = "SELECT 1 FROM pg_database WHERE datname = :'db_name';";
const CREATE_DATABASE_SQL: &str = "CREATE DATABASE :\"db_name\" OWNER :\"db_user\";";

/// Ensure the application role and database exist.
///
/// Without the hosting-panel marker there is no privileged path, and the
/// operator gets manual instructions instead. Otherwise each object is
/// created only when the existence query does not return `1`, so repeated
/// calls issue no `CREATE`. A `*_created` flag is set only when the `CREATE`
/// succeeded; failures are kept in the log and never fail the call.
pub async fn setup_database(
    runner: &impl CommandRunner,
    fs: &impl LocalFs,
    database: &DatabaseConfig,
    platform: &PlatformConfig,
    creds: &DatabaseCredentials,
) -> DatabaseSetupResult {
    if !fs.exists(Path::new(&platform.panel_marker)) {
        return DatabaseSetupResult::ManualSetupRequired {
            message: manual_setup_message(creds),
        };
    }

    let mut log = Vec::new();

    let role_created = if exists(runner, database, creds, ROLE_EXISTS_SQL).await {
        log.push(format!("role '{}' already exists", creds.user));
        false
    } else {
        let result = run_sql(runner, database, creds, CREATE_ROLE_SQL).await;
        log.push(describe("create role", &creds.user, &result));
        result.succeeded
    };

    let database_created = if exists(runner, database, creds, DATABASE_EXISTS_SQL).await {
        log.push(format!("database '{}' already exists", creds.name));
        false
    } else {
        let result = run_sql(runner, database, creds, CREATE_DATABASE_SQL).await;
        log.push(describe("create database", &creds.name, &result));
        result.succeeded
    };

    DatabaseSetupResult::Provisioned {
        role_created,
        database_created,
        log,
    }
}

/// Instructions shown when provisioning has to happen by hand.
#[must_use]
pub fn manual_setup_message(creds: &DatabaseCredentials) -> String {
    format!(
        "Manual setup required: create a database '{}' owned by user '{}' with password '{}'.",
        creds.name, creds.user, creds.password
    )
}

async fn exists(
    runner: &impl CommandRunner,
    database: &DatabaseConfig,
    creds: &DatabaseCredentials,
    query: &str,
) -> bool {
    run_sql(runner, database, creds, query).await.output.trim() == "1"
}

async fn run_sql(
    runner: &impl CommandRunner,
    database: &DatabaseConfig,
    creds: &DatabaseCredentials,
    statement: &str,
) -> installer_common::CommandResult {
    let script = sql_script(creds, statement);
    runner
        .run_with_stdin(
            &database.privilege_program,
            &[
                "-u",
                &database.superuser,
                &database.client,
                "-X",
                "-q",
                "-t",
                "-A",
                "-v",
                "ON_ERROR_STOP=1",
            ],
            script.as_bytes(),
        )
        .await
}

/// psql script binding the credentials and running `statement`.
#[must_use]
pub fn sql_script(creds: &DatabaseCredentials, statement: &str) -> String {
    format!(
        "\\set db_name {}\n\\set db_user {}\n\\set db_password {}\n{statement}\n",
        meta_quote(&creds.name),
        meta_quote(&creds.user),
        meta_quote(&creds.password),
    )
}

/// Quote a value as a psql meta-command argument.
fn meta_quote(value: &str) -> String {
    format!("'{}'", value.replace('\\', "\\\\").replace('\'', "''"))
}

fn describe(action: &str, object: &str, result: &installer_common::CommandResult) -> String {
    if result.succeeded {
        format!("{action} '{object}': OK")
    } else if result.timed_out {
        format!("{action} '{object}': timed out")
    } else {
        format!("{action} '{object}': FAILED\n{}", result.output)
    }
}
