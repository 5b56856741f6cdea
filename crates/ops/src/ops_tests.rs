//! End-to-end tests for backup, deploy and list.
//!
//! Each test builds a throwaway n8n-style SQLite file with a
//! `workflow_entity` table, so no real n8n install is required.

use std::path::{Path, PathBuf};

use registry::{Registry, RegistryEntry, Requirements};
use serde_json::{json, Value};
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection};
use sqlx::Connection;
use tempfile::TempDir;

use crate::*;

// ---------------------------------------------------------------------------
// Fixture
// ---------------------------------------------------------------------------

const SCHEMA: &str = r#"
    CREATE TABLE workflow_entity (
        id varchar(36) PRIMARY KEY NOT NULL,
        name varchar(128) NOT NULL,
        active boolean NOT NULL,
        nodes text,
        connections text,
        settings text,
        createdAt datetime(3) NOT NULL DEFAULT (STRFTIME('%Y-%m-%d %H:%M:%f', 'NOW')),
        updatedAt datetime(3) NOT NULL DEFAULT (STRFTIME('%Y-%m-%d %H:%M:%f', 'NOW'))
    )
"#;

const LEADS_NODES: &str = r#"[{"parameters":{"pollTimes":{"item":[{"mode":"everyMinute"}]}},"name":"Gmail Trigger","type":"n8n-nodes-base.gmailTrigger","typeVersion":1,"position":[250,300],"id":"a1"},{"parameters":{},"name":"Score Lead","type":"n8n-nodes-base.code","typeVersion":2,"position":[450,300],"id":"b2"}]"#;
const LEADS_CONNECTIONS: &str =
    r#"{"Gmail Trigger":{"main":[[{"node":"Score Lead","type":"main","index":0}]]}}"#;

struct Row<'a> {
    id: &'a str,
    name: &'a str,
    active: bool,
    nodes: &'a str,
    connections: &'a str,
    settings: Option<&'a str>,
}

impl<'a> Row<'a> {
    fn new(id: &'a str, name: &'a str) -> Self {
        Self {
            id,
            name,
            active: false,
            nodes: LEADS_NODES,
            connections: LEADS_CONNECTIONS,
            settings: Some(r#"{"executionOrder":"v1"}"#),
        }
    }
}

struct Fixture {
    dir: TempDir,
    config: SyncConfig,
}

impl Fixture {
    async fn new(rows: &[Row<'_>]) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("database.sqlite");

        let opts = SqliteConnectOptions::new().filename(&db_path).create_if_missing(true);
        let mut conn = SqliteConnection::connect_with(&opts).await.unwrap();
        sqlx::query(SCHEMA).execute(&mut conn).await.unwrap();
        for row in rows {
            sqlx::query(
                "INSERT INTO workflow_entity (id, name, active, nodes, connections, settings)
                 VALUES (?, ?, ?, ?, ?, ?)",
            )
            .bind(row.id)
            .bind(row.name)
            .bind(row.active)
            .bind(row.nodes)
            .bind(row.connections)
            .bind(row.settings)
            .execute(&mut conn)
            .await
            .unwrap();
        }
        conn.close().await.unwrap();

        let config = SyncConfig {
            database_path: db_path,
            workflows_dir: dir.path().join("workflows"),
            backups_dir: dir.path().join("backups"),
            name_prefix: DEFAULT_NAME_PREFIX.to_string(),
        };
        Self { dir, config }
    }

    /// Raw `(name, active, nodes, connections, settings)` of a row.
    async fn snapshot(&self, id: &str) -> Option<(String, bool, String, String, Option<String>)> {
        let opts = SqliteConnectOptions::new().filename(&self.config.database_path);
        let mut conn = SqliteConnection::connect_with(&opts).await.unwrap();
        let row = sqlx::query_as(
            "SELECT name, active, nodes, connections, settings FROM workflow_entity WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&mut conn)
        .await
        .unwrap();
        conn.close().await.unwrap();
        row
    }

    async fn all_rows(&self) -> Vec<(String, String, bool, String, String)> {
        let opts = SqliteConnectOptions::new().filename(&self.config.database_path);
        let mut conn = SqliteConnection::connect_with(&opts).await.unwrap();
        let rows = sqlx::query_as(
            "SELECT id, name, active, nodes, CAST(updatedAt AS TEXT) FROM workflow_entity ORDER BY id",
        )
        .fetch_all(&mut conn)
        .await
        .unwrap();
        conn.close().await.unwrap();
        rows
    }

    fn write_workflow_file(&self, file: &str, contents: &str) -> PathBuf {
        std::fs::create_dir_all(&self.config.workflows_dir).unwrap();
        let path = self.config.workflows_dir.join(file);
        std::fs::write(&path, contents).unwrap();
        path
    }
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

fn entry(key: &'static str, id: &'static str, file: &'static str) -> RegistryEntry {
    RegistryEntry {
        key,
        id,
        name: key,
        description: "",
        file,
        version: "0.0.0",
        nodes: 0,
        features: &[],
        requirements: Requirements::NONE,
        triggers: &[],
        documentation: &[],
    }
}

fn leak_registry(entries: Vec<RegistryEntry>) -> Registry {
    Registry::new(Box::leak(entries.into_boxed_slice()))
}

// ============================================================
// Backup
// ============================================================

#[tokio::test]
async fn backup_writes_latest_and_archive_copies() {
    let fx = Fixture::new(&[Row {
        active: true,
        settings: Some(""),
        ..Row::new("wf-v2", "Catalyst-Automation Leads v2!")
    }])
    .await;

    let summary = backup_workflow(&fx.config, "wf-v2").await.expect("backup");

    assert_eq!(summary.id, "wf-v2");
    assert_eq!(summary.name, "Catalyst-Automation Leads v2!");
    assert!(summary.active);
    assert_eq!(summary.node_count, 2);
    assert_eq!(
        summary.workflow_path,
        fx.config.workflows_dir.join("catalyst-automation-leads-v2.json")
    );

    let archive_name = summary.backup_path.file_name().unwrap().to_str().unwrap();
    assert!(archive_name.starts_with("catalyst-automation-leads-v2_"));
    assert!(archive_name.ends_with(".json"));
    assert_eq!(summary.backup_path.parent(), Some(fx.config.backups_dir.as_path()));
    // `<slug>_YYYY-MM-DDTHH-MM-SS.json`
    assert_eq!(archive_name.len(), "catalyst-automation-leads-v2_".len() + 19 + ".json".len());

    let latest = std::fs::read_to_string(&summary.workflow_path).unwrap();
    let archive = std::fs::read_to_string(&summary.backup_path).unwrap();
    assert_eq!(latest, archive);

    let doc = read_json(&summary.workflow_path);
    assert_eq!(doc["name"], "Catalyst-Automation Leads v2!");
    assert_eq!(doc["nodes"], serde_json::from_str::<Value>(LEADS_NODES).unwrap());
    assert_eq!(doc["connections"], serde_json::from_str::<Value>(LEADS_CONNECTIONS).unwrap());
    assert_eq!(doc["settings"], json!({ "executionOrder": "v1" }));
    assert_eq!(doc.as_object().map(|o| o.len()), Some(4));
}

#[tokio::test]
async fn backup_of_unknown_id_is_not_found() {
    let fx = Fixture::new(&[]).await;
    let err = backup_workflow(&fx.config, "nope").await.unwrap_err();
    assert!(matches!(err, SyncError::NotFound(ref id) if id == "nope"));
    assert!(!fx.config.workflows_dir.exists());
}

#[tokio::test]
async fn malformed_column_fails_without_writing() {
    let fx = Fixture::new(&[Row {
        nodes: "[{\"name\":",
        ..Row::new("bad", "Catalyst-Automation Broken")
    }])
    .await;

    let err = backup_workflow(&fx.config, "bad").await.unwrap_err();
    assert!(matches!(err, SyncError::MalformedStoredData { column: "nodes", .. }));
    assert!(!fx.config.workflows_dir.join("catalyst-automation-broken.json").exists());
}

#[tokio::test]
async fn backup_matching_with_no_matches_is_an_empty_report() {
    let fx = Fixture::new(&[Row::new("x", "Someone Else's Workflow")]).await;

    let report = backup_matching(&fx.config).await.expect("not an error");
    assert!(report.is_empty());
    assert!(!report.all_failed());
}

#[tokio::test]
async fn backup_matching_skips_failures_and_continues() {
    let fx = Fixture::new(&[
        Row { connections: "not json", ..Row::new("a", "Catalyst-Automation A Broken") },
        Row::new("b", "catalyst-automation b fine"),
        Row::new("c", "Unrelated"),
    ])
    .await;

    let report = backup_matching(&fx.config).await.unwrap();
    assert_eq!(report.entries.len(), 2);
    assert_eq!(report.succeeded(), 1);
    assert_eq!(report.failed(), 1);

    assert_eq!(report.entries[0].target, "Catalyst-Automation A Broken");
    assert!(matches!(
        report.entries[0].result,
        Err(SyncError::MalformedStoredData { column: "connections", .. })
    ));
    assert!(fx.config.workflows_dir.join("catalyst-automation-b-fine.json").exists());
    assert!(!fx.config.workflows_dir.join("unrelated.json").exists());
}

#[tokio::test]
async fn unreachable_database_aborts_the_batch() {
    let dir = tempfile::tempdir().unwrap();
    let config = SyncConfig::with_database(dir.path().join("missing.sqlite"));

    let err = backup_matching(&config).await.unwrap_err();
    assert!(err.is_fatal());
}

// ============================================================
// Deploy
// ============================================================

#[tokio::test]
async fn backup_then_deploy_round_trips_the_definition() {
    let fx = Fixture::new(&[Row {
        active: true,
        settings: Some(r#"{"executionOrder":"v1","timezone":"America/Chicago"}"#),
        ..Row::new("leads", "Catalyst-Automation Leads")
    }])
    .await;
    let (name, active, nodes, connections, settings) = fx.snapshot("leads").await.unwrap();

    let backup = backup_workflow(&fx.config, "leads").await.unwrap();
    let file = backup.workflow_path.file_name().unwrap().to_str().unwrap().to_string();
    let deployed = deploy_document(&fx.config, "leads", &file).await.unwrap();

    assert_eq!(deployed.name, "Catalyst-Automation Leads");
    assert_eq!(deployed.node_count, 2);
    assert!(deployed.active);

    let after = fx.snapshot("leads").await.unwrap();
    let parse = |s: &str| serde_json::from_str::<Value>(s).unwrap();
    assert_eq!(after.0, name);
    assert_eq!(after.1, active);
    assert_eq!(parse(&after.2), parse(&nodes));
    assert_eq!(parse(&after.3), parse(&connections));
    assert_eq!(parse(after.4.as_deref().unwrap()), parse(settings.as_deref().unwrap()));
}

#[tokio::test]
async fn deploy_overwrites_definition_but_not_active_flag() {
    let fx = Fixture::new(&[Row::new("leads", "Old Name")]).await;
    fx.write_workflow_file(
        "leads.json",
        r#"{"name":"Catalyst-Automation Leads","nodes":[{"name":"Only"}],"connections":{}}"#,
    );

    let summary = deploy_document(&fx.config, "leads", "leads.json").await.unwrap();
    assert_eq!(summary.name, "Catalyst-Automation Leads");
    assert_eq!(summary.node_count, 1);
    assert!(!summary.active);

    let (name, active, nodes, connections, settings) = fx.snapshot("leads").await.unwrap();
    assert_eq!(name, "Catalyst-Automation Leads");
    assert!(!active);
    assert_eq!(nodes, r#"[{"name":"Only"}]"#);
    assert_eq!(connections, "{}");
    assert_eq!(settings.as_deref(), Some(r#"{"executionOrder":"v1"}"#));
}

#[tokio::test]
async fn deploy_to_missing_record_changes_nothing() {
    let fx = Fixture::new(&[Row::new("other", "Catalyst-Automation Other")]).await;
    fx.write_workflow_file("ghost.json", r#"{"name":"Ghost","nodes":[],"connections":{},"settings":{}}"#);
    let registry = leak_registry(vec![entry("ghost", "ghost-id", "ghost.json")]);

    let before = fx.all_rows().await;
    let err = deploy(&fx.config, &registry, "ghost").await.unwrap_err();
    let after = fx.all_rows().await;

    assert!(matches!(err, SyncError::RecordNotFound(ref id) if id == "ghost-id"));
    assert_eq!(before, after);
}

#[tokio::test]
async fn deploy_unknown_key_lists_known_keys() {
    let fx = Fixture::new(&[]).await;

    let err = deploy(&fx.config, &Registry::builtin(), "foo").await.unwrap_err();
    let SyncError::UnknownWorkflow { key, known } = &err else {
        panic!("expected UnknownWorkflow, got {err:?}");
    };
    assert_eq!(key, "foo");
    assert_eq!(known, &["catalyst-automation-leads", "catalyst-automation-marketing"]);

    let message = err.to_string();
    assert!(message.contains("catalyst-automation-leads"));
    assert!(message.contains("catalyst-automation-marketing"));
}

#[tokio::test]
async fn deploy_missing_or_broken_file() {
    let fx = Fixture::new(&[Row::new("leads", "Catalyst-Automation Leads")]).await;

    let err = deploy_document(&fx.config, "leads", "absent.json").await.unwrap_err();
    assert!(matches!(err, SyncError::FileNotFound(ref p) if p.ends_with("absent.json")));

    fx.write_workflow_file("broken.json", r#"{"name":"x","nodes":{}}"#);
    let err = deploy_document(&fx.config, "leads", "broken.json").await.unwrap_err();
    assert!(matches!(err, SyncError::MalformedDocument { .. }));

    // Neither attempt touched the row.
    assert_eq!(fx.snapshot("leads").await.unwrap().0, "Catalyst-Automation Leads");
}

#[tokio::test]
async fn deploy_all_reports_each_entry_in_order() {
    let fx = Fixture::new(&[Row::new("id-a", "A"), Row::new("id-c", "C")]).await;
    fx.write_workflow_file("a.json", r#"{"name":"A2","nodes":[],"connections":{}}"#);
    fx.write_workflow_file("c.json", r#"{"name":"C2","nodes":[{},{},{}],"connections":{}}"#);
    let registry = leak_registry(vec![
        entry("a", "id-a", "a.json"),
        entry("b", "id-b", "b.json"),
        entry("c", "id-c", "c.json"),
    ]);

    let report = deploy_all(&fx.config, &registry).await.unwrap();

    let targets: Vec<_> = report.entries.iter().map(|e| e.target.as_str()).collect();
    assert_eq!(targets, vec!["a", "b", "c"]);
    assert_eq!(report.succeeded(), 2);
    assert!(matches!(report.entries[1].result, Err(SyncError::FileNotFound(_))));
    assert_eq!(report.entries[2].result.as_ref().unwrap().node_count, 3);
    assert_eq!(fx.snapshot("id-c").await.unwrap().0, "C2");
}

// ============================================================
// List
// ============================================================

#[tokio::test]
async fn list_filters_by_prefix_and_counts() {
    let fx = Fixture::new(&[
        Row { active: true, ..Row::new("a", "Catalyst-Automation Leads") },
        Row { nodes: "[]", ..Row::new("b", "Catalyst-Automation Marketing") },
        Row::new("c", "Personal Scratch"),
    ])
    .await;

    let listing = list_workflows(&fx.config, ListScope::Matching).await.unwrap();
    assert_eq!(listing.total(), 2);
    assert_eq!(listing.active(), 1);
    assert_eq!(listing.inactive(), 1);
    let marketing = listing.rows.iter().find(|r| r.id == "b").unwrap();
    assert_eq!(marketing.node_count, Some(0));

    let everything = list_workflows(&fx.config, ListScope::All).await.unwrap();
    assert_eq!(everything.total(), 3);
    assert!(everything.to_string().contains("Total: 3 workflow(s)"));

    // Listing is read-only.
    assert!(!fx.dir.path().join("workflows").exists());
}
