mod common;

use std::sync::Arc;

use hamlet_core::{CommandData, GatewayEvent, Reply, triggers};
use hamlet_framework::{
    CommandOutcome, CommandUnit, EventArgs, EventBus, EventDispatcher, PluginRegistry,
    StaticSource, builtin_events, command_service, handle_interaction,
};

use common::{LogCapture, MockInteraction, Sent};

const ERROR_TEXT: &str = "There was an error while executing this command!";

fn unit(name: &str, execute: hamlet_framework::CommandService) -> CommandUnit {
    CommandUnit {
        data: Some(CommandData::new(name, "")),
        execute: Some(execute),
        ..CommandUnit::default()
    }
}

async fn table() -> hamlet_framework::CommandTable {
    let source = StaticSource::new("test")
        .with("t::ok", || {
            unit(
                "ok",
                command_service(|ctx| async move {
                    ctx.reply("fine").await?;
                    Ok(())
                }),
            )
        })
        .with("t::fail_early", || {
            unit("fail_early", command_service(|_| async { Err("nope".into()) }))
        })
        .with("t::fail_after_reply", || {
            unit(
                "fail_after_reply",
                command_service(|ctx| async move {
                    ctx.reply("working on it").await?;
                    Err("then broke".into())
                }),
            )
        })
        .with("t::fail_after_defer", || {
            unit(
                "fail_after_defer",
                command_service(|ctx| async move {
                    ctx.interaction.defer(false).await?;
                    Err("then broke".into())
                }),
            )
        });
    PluginRegistry::load_all(&source).await
}

#[tokio::test]
async fn test_successful_command() {
    let app = common::app(table().await);
    let interaction = MockInteraction::new("ok");
    let outcome = handle_interaction(&app, interaction.clone()).await;
    assert_eq!(outcome, CommandOutcome::Completed);
    assert_eq!(interaction.sent(), [Sent::Reply(Reply::public("fine"))]);
}

#[tokio::test]
async fn test_unknown_command_is_logged_and_sends_nothing() {
    let app = common::app(table().await);
    let logs = LogCapture::default();
    let _guard = logs.install();

    let interaction = MockInteraction::new("missing");
    let outcome = handle_interaction(&app, interaction.clone()).await;
    assert_eq!(outcome, CommandOutcome::NotFound);
    assert!(interaction.sent().is_empty());

    let logs = logs.contents();
    assert!(logs.contains("ERROR"), "{logs}");
    assert!(logs.contains("No command matching missing was found."), "{logs}");
}

#[tokio::test]
async fn test_failure_before_reply_gets_private_reply() {
    let app = common::app(table().await);
    let interaction = MockInteraction::new("fail_early");
    let outcome = handle_interaction(&app, interaction.clone()).await;
    assert_eq!(outcome, CommandOutcome::Failed);
    assert_eq!(interaction.sent(), [Sent::Reply(Reply::private(ERROR_TEXT))]);
}

#[tokio::test]
async fn test_failure_after_reply_gets_follow_up() {
    let app = common::app(table().await);
    let interaction = MockInteraction::new("fail_after_reply");
    handle_interaction(&app, interaction.clone()).await;
    assert_eq!(
        interaction.sent(),
        [
            Sent::Reply(Reply::public("working on it")),
            Sent::FollowUp(Reply::private(ERROR_TEXT)),
        ]
    );
}

#[tokio::test]
async fn test_failure_after_defer_gets_follow_up() {
    let app = common::app(table().await);
    let interaction = MockInteraction::new("fail_after_defer");
    handle_interaction(&app, interaction.clone()).await;
    assert_eq!(
        interaction.sent(),
        [Sent::Defer(false), Sent::FollowUp(Reply::private(ERROR_TEXT))]
    );
}

#[tokio::test]
async fn test_builtin_bindings_route_interactions() {
    let app = common::app(table().await);
    let dispatcher = EventDispatcher::new(Arc::new(EventBus::new()));
    dispatcher.register_all(&builtin_events()).await;

    let interaction = MockInteraction::new("ok");
    let event = GatewayEvent::InteractionCreate(interaction.clone());
    let report = dispatcher
        .dispatch(triggers::INTERACTION_CREATE, EventArgs::new(app, event))
        .await;
    assert_eq!(report.completed, 1);
    assert_eq!(interaction.sent(), [Sent::Reply(Reply::public("fine"))]);
}

#[tokio::test]
async fn test_builtin_ready_records_identity() {
    let app = Arc::new(hamlet_framework::AppContext::new(
        hamlet_framework::CommandTable::default(),
        common::MockCompletion::answering(),
        Default::default(),
    ));
    let dispatcher = EventDispatcher::new(Arc::new(EventBus::new()));
    dispatcher.register_all(&builtin_events()).await;
    assert!(app.identity().is_none());

    let identity = hamlet_core::BotIdentity {
        id: 99,
        tag: "hamlet#0001".into(),
    };
    dispatcher
        .dispatch(
            triggers::READY,
            EventArgs::new(Arc::clone(&app), GatewayEvent::Ready(identity.clone())),
        )
        .await;
    assert_eq!(app.identity(), Some(&identity));
    assert_eq!(dispatcher.bus().binding_count(triggers::READY), 1);
}
