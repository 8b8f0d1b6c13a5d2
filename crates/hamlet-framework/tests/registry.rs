mod common;

use std::path::Path;
use std::time::Duration;

use hamlet_core::CommandData;
use hamlet_framework::{
    CommandManifest, CommandUnit, DuplicatePolicy, ManifestDir, NotFound, PluginRegistry,
    StaticSource, command_service,
};

use common::{MockInteraction, Sent};
use tokio_test::{assert_err, assert_ok};

async fn write(dir: &Path, name: &str, body: &str) {
    tokio::fs::write(dir.join(name), body).await.unwrap();
}

fn reply_manifest(name: &str, reply: &str) -> String {
    format!(
        r#"
        [data]
        name = "{name}"
        description = "test"

        [execute]
        reply = "{reply}"
        "#
    )
}

fn static_command(name: &str) -> CommandUnit {
    CommandUnit {
        data: Some(CommandData::new(name, "compiled in")),
        execute: Some(command_service(|ctx| async move {
            ctx.reply("static").await?;
            Ok(())
        })),
        ..CommandUnit::default()
    }
}

#[tokio::test]
async fn test_load_all_skips_invalid_candidates() {
    let tmp = tempfile::tempdir().unwrap();
    write(tmp.path(), "ping.toml", &reply_manifest("ping", "Pong!")).await;
    write(tmp.path(), "no_execute.toml", "[data]\nname = \"silent\"\n").await;
    write(tmp.path(), "no_data.toml", "[execute]\nreply = \"x\"\n").await;
    write(tmp.path(), "empty_name.toml", &reply_manifest("", "x")).await;
    write(tmp.path(), "broken.toml", "[data\n").await;
    write(tmp.path(), "readme.txt", &reply_manifest("hidden", "x")).await;

    let source = ManifestDir::<CommandManifest>::new(tmp.path());
    let mut registry = PluginRegistry::new();
    let report = registry.load(&source).await;
    let table = registry.finish();

    assert_eq!(report.discovered, 5);
    assert_eq!(report.loaded, 1);
    assert_eq!(report.skipped, 4);
    assert_eq!(table.names(), ["ping"]);
}

#[tokio::test]
async fn test_unreadable_directory_yields_empty_table() {
    let tmp = tempfile::tempdir().unwrap();
    let source = ManifestDir::<CommandManifest>::new(tmp.path().join("missing"));
    let table = PluginRegistry::load_all(&source).await;
    assert!(table.is_empty());
}

#[tokio::test]
async fn test_duplicate_names_last_write_wins() {
    let tmp = tempfile::tempdir().unwrap();
    write(tmp.path(), "a.toml", &reply_manifest("ping", "first")).await;
    write(tmp.path(), "b.toml", &reply_manifest("ping", "second")).await;

    let table = PluginRegistry::load_all(&ManifestDir::<CommandManifest>::new(tmp.path())).await;
    assert_eq!(table.len(), 1);

    let command = table.lookup("ping").unwrap();
    assert!(command.origin().ends_with("b.toml"));

    let interaction = MockInteraction::new("ping");
    let app = common::app(Default::default());
    command
        .execute(hamlet_framework::CommandContext::new(app, interaction.clone()))
        .await
        .unwrap();
    assert_eq!(
        interaction.sent(),
        [Sent::Reply(hamlet_core::Reply::public("second"))]
    );
}

#[tokio::test]
async fn test_directory_overrides_static_source() {
    let tmp = tempfile::tempdir().unwrap();
    write(tmp.path(), "ping.toml", &reply_manifest("ping", "from disk")).await;

    let compiled = StaticSource::new("test")
        .with("demo::ping", || static_command("ping"))
        .with("demo::pong", || static_command("pong"));

    let mut registry = PluginRegistry::new();
    registry.load(&compiled).await;
    registry
        .load(&ManifestDir::<CommandManifest>::new(tmp.path()))
        .await;
    let table = registry.finish();

    assert_eq!(table.names(), ["ping", "pong"]);
    assert!(table.lookup("ping").unwrap().origin().ends_with("ping.toml"));
    assert_eq!(table.lookup("pong").unwrap().origin(), "demo::pong");
}

#[tokio::test]
async fn test_reject_policy_keeps_first() {
    let compiled = StaticSource::new("test")
        .with("first::ping", || static_command("ping"))
        .with("second::ping", || static_command("ping"));

    let mut registry = PluginRegistry::new().duplicate_policy(DuplicatePolicy::Reject);
    let report = registry.load(&compiled).await;
    let table = registry.finish();

    assert_eq!(report.loaded, 1);
    assert_eq!(report.skipped, 1);
    assert_eq!(table.lookup("ping").unwrap().origin(), "first::ping");
}

#[tokio::test]
async fn test_failing_factory_is_skipped() {
    let compiled = StaticSource::new("test")
        .try_with("broken::cmd", || Err("no database".to_owned()))
        .with("ok::cmd", || static_command("ok"));

    let mut registry = PluginRegistry::new();
    let report = registry.load(&compiled).await;
    assert_eq!(report.skipped, 1);
    assert_eq!(registry.finish().names(), ["ok"]);
}

#[tokio::test]
async fn test_lookup_is_exact() {
    let compiled = StaticSource::new("test").with("demo::ping", || static_command("ping"));
    let table = PluginRegistry::load_all(&compiled).await;

    assert_ok!(table.lookup("ping"));
    assert_eq!(
        table.lookup("Ping").unwrap_err(),
        NotFound {
            name: "Ping".into()
        }
    );
    assert_err!(table.lookup("ping "));
    assert_err!(table.lookup(""));
}

#[tokio::test]
async fn test_specs_sorted_by_name() {
    let compiled = StaticSource::new("test")
        .with("z", || static_command("zeta"))
        .with("a", || static_command("alpha"));
    let table = PluginRegistry::load_all(&compiled).await;
    let names: Vec<String> = table.specs().into_iter().map(|d| d.name).collect();
    assert_eq!(names, ["alpha", "zeta"]);
}

#[tokio::test]
async fn test_handler_timeout() {
    let slow = StaticSource::new("test").with("demo::slow", || CommandUnit {
        data: Some(CommandData::new("slow", "")),
        execute: Some(command_service(|_ctx| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(())
        })),
        ..CommandUnit::default()
    });

    let mut registry = PluginRegistry::new().handler_timeout(Some(Duration::from_millis(20)));
    registry.load(&slow).await;
    let table = registry.finish();

    let app = common::app(Default::default());
    let ctx = hamlet_framework::CommandContext::new(app, MockInteraction::new("slow"));
    assert_err!(table.lookup("slow").unwrap().execute(ctx).await);
}
