//! End-to-end scenarios
//!
//! Each test drives the services over the JSON stores in a temporary directory.
//!
//! Run with: cargo test -p integration-tests --test bot_tests

use std::time::Duration;

use integration_tests::*;
use potd_core::{Snowflake, TaskEmoji};
use potd_service::services::testing::{
    default_settings, LEADERBOARD_CHANNEL, POTD_CHANNEL, TEST_CHANNEL,
};
use potd_service::{IgnoreReason, LeaderboardReport, LiveOutcome, PotdReport};
use serde_json::json;

fn task(n: usize) -> TaskEmoji {
    TaskEmoji::for_task(n).unwrap()
}

// ============================================================================
// Announcements
// ============================================================================

#[tokio::test]
async fn test_week_of_announcements() {
    let bot = TestBot::start(week_questions()).unwrap();

    let first = bot.run_day(day(1)).await.unwrap();
    assert!(matches!(first, PotdReport::Posted { sequence: 1, registered: true, .. }));
    let second = bot.run_day(day(2)).await.unwrap();
    assert!(matches!(second, PotdReport::Posted { sequence: 2, .. }));
    let holiday = bot.run_day(day(3)).await.unwrap();
    assert!(matches!(holiday, PotdReport::Holiday { message_id: Some(_) }));
    let third = bot.run_day(day(4)).await.unwrap();
    assert!(matches!(third, PotdReport::Posted { sequence: 3, .. }));

    // sheet exhausted
    assert_eq!(bot.run_day(day(5)).await.unwrap(), PotdReport::Nothing);

    assert_eq!(
        bot.read_json(CURSOR_FILE).unwrap(),
        json!({"nextIndex": 8, "nextSequence": 4})
    );

    let registered: Vec<i64> = [&first, &second, &third]
        .iter()
        .filter_map(|r| posted_id(r))
        .map(Snowflake::into_inner)
        .collect();
    assert_eq!(bot.registry_on_disk().unwrap(), registered);

    let texts = bot.sent_to(POTD_CHANNEL);
    assert_eq!(texts.len(), 4);
    assert!(texts[0].starts_with("🎯 **Problem of the Day (POTD #1)**\n📆 **Date: 01/03/2024**"));
    assert!(texts[0].contains("🔸 **Task 1:** [Two Sum](<https://leetcode.com/problems/two-sum/>)"));
    assert!(texts[0].contains("🔸 **Task 2:** [Valid Anagram]"));
    assert!(texts[2].starts_with("We are not posting any POTD today!"));
    assert!(texts[3].contains("POTD #3") && texts[3].contains("[House Robber]"));

    // two keycaps under each of the three question posts
    assert_eq!(bot.chat.bot_reactions().len(), 6);
}

#[tokio::test]
async fn test_restart_resumes_from_files() {
    let bot = TestBot::start(week_questions()).unwrap();
    bot.run_day(day(1)).await.unwrap();

    let bot = bot.restart();
    let report = bot.run_day(day(2)).await.unwrap();

    assert!(matches!(report, PotdReport::Posted { sequence: 2, .. }));
    assert!(bot.sent_to(POTD_CHANNEL)[1].contains("[Climbing Stairs]"));
    assert_eq!(bot.registry_on_disk().unwrap().len(), 2);
}

#[tokio::test]
async fn test_legacy_cursor_file() {
    let bot = TestBot::start(week_questions()).unwrap();
    bot.write_raw(CURSOR_FILE, r#"{"index": 5, "potdNumber": 3}"#).unwrap();

    let report = bot.run_day(day(3)).await.unwrap();

    assert!(matches!(report, PotdReport::Holiday { .. }));
    assert_eq!(
        bot.read_json(CURSOR_FILE).unwrap(),
        json!({"nextIndex": 6, "nextSequence": 3})
    );
    // holidays are never registered
    assert!(!bot.path(REGISTRY_FILE).exists());
}

#[tokio::test]
async fn test_unreadable_state_starts_over() {
    let bot = TestBot::start(week_questions()).unwrap();
    bot.write_raw(CURSOR_FILE, "{ not json").unwrap();
    bot.write_raw(REGISTRY_FILE, "[1, 2,").unwrap();

    assert!(bot.potd().export_message_registry_snapshot().await.is_empty());

    let report = bot.run_day(day(1)).await.unwrap();
    assert!(matches!(report, PotdReport::Posted { sequence: 1, .. }));
    assert_eq!(
        bot.read_json(CURSOR_FILE).unwrap(),
        json!({"nextIndex": 3, "nextSequence": 2})
    );
    assert_eq!(bot.registry_on_disk().unwrap().len(), 1);
}

#[tokio::test]
async fn test_debug_routing_skips_registry() {
    let bot = TestBot::start(week_questions()).unwrap();
    let mut settings = default_settings();
    settings.debug = true;
    bot.settings.set(settings);

    let report = bot.run_day(day(1)).await.unwrap();

    assert!(matches!(report, PotdReport::Posted { registered: false, .. }));
    assert_eq!(bot.sent_to(TEST_CHANNEL).len(), 1);
    assert!(bot.sent_to(POTD_CHANNEL).is_empty());
    assert!(!bot.path(REGISTRY_FILE).exists());
    // the rows are still consumed
    assert_eq!(
        bot.read_json(CURSOR_FILE).unwrap(),
        json!({"nextIndex": 3, "nextSequence": 2})
    );
}

#[tokio::test]
async fn test_outage_then_recovery() {
    let bot = TestBot::start(week_questions()).unwrap();

    bot.questions.set_unavailable(true);
    assert_eq!(bot.run_day(day(1)).await.unwrap(), PotdReport::Nothing);
    assert!(!bot.path(CURSOR_FILE).exists());

    bot.questions.set_unavailable(false);
    let report = bot.run_day(day(2)).await.unwrap();
    assert!(matches!(report, PotdReport::Posted { sequence: 1, .. }));
}

#[tokio::test]
async fn test_concurrent_triggers_post_distinct_batches() {
    let bot = TestBot::start(week_questions()).unwrap();

    let (a, b) = tokio::join!(bot.run_day(day(1)), bot.run_day(day(1)));
    let mut sequences: Vec<u32> = [a.unwrap(), b.unwrap()]
        .iter()
        .filter_map(|r| match r {
            PotdReport::Posted { sequence, .. } => Some(*sequence),
            _ => None,
        })
        .collect();
    sequences.sort_unstable();

    assert_eq!(sequences, vec![1, 2]);
    assert_eq!(
        bot.read_json(CURSOR_FILE).unwrap(),
        json!({"nextIndex": 5, "nextSequence": 3})
    );
}

// ============================================================================
// Leaderboard
// ============================================================================

#[tokio::test]
async fn test_leaderboard_from_backfill_and_live() {
    let bot = TestBot::start(week_questions()).unwrap();
    let first = posted_id(&bot.run_day(day(1)).await.unwrap()).unwrap();
    let second = posted_id(&bot.run_day(day(2)).await.unwrap()).unwrap();

    bot.chat.add_reactors(POTD_CHANNEL, first, task(1), &[ALICE, BOB], &[9999]);
    bot.chat.add_reactors(POTD_CHANNEL, first, task(2), &[ALICE, 1], &[]);
    bot.chat.add_reactors(POTD_CHANNEL, second, task(1), &[ALICE, CAROL], &[]);
    bot.chat.add_reactors(POTD_CHANNEL, second, task(2), &[BOB, CAROL], &[]);

    // a fresh process backfills from the registry on boot
    let bot = bot.restart();
    bot.boot().await.unwrap();
    assert_eq!(bot.count(ALICE), 3);
    assert_eq!(bot.count(BOB), 2);
    assert_eq!(bot.count(CAROL), 2);
    assert_eq!(bot.count(1), 0);
    assert_eq!(bot.count(9999), 0);

    assert_eq!(bot.react(second, DAVE, 1), LiveOutcome::Applied { count: 1 });
    assert_eq!(bot.react(second, CAROL, 2), LiveOutcome::Applied { count: 3 });
    assert_eq!(bot.unreact(first, BOB, 1), LiveOutcome::Applied { count: 1 });
    assert_eq!(bot.react(second, BOB, 1), LiveOutcome::Applied { count: 2 });

    let report = bot.potd().run_leaderboard().await.unwrap();
    assert_eq!(
        report,
        LeaderboardReport::Published {
            messages_sent: 1,
            entries: 4,
            total_submissions: 9,
        }
    );

    let board = &bot.sent_to(LEADERBOARD_CHANNEL)[0];
    assert!(board.starts_with("# Leaderboard\nTotal submissions: 9"));
    assert!(board.contains(&format!("1. <@{ALICE}> : 3")));
    assert!(board.contains(&format!("1. <@{CAROL}> : 3")));
    assert!(board.contains(&format!("3. <@{BOB}> : 2")));
    assert!(board.contains(&format!("4. <@{DAVE}> : 1")));
}

#[tokio::test]
async fn test_live_filters() {
    let bot = TestBot::start(week_questions()).unwrap();
    bot.boot().await.unwrap();
    let message = Snowflake::new(4242);

    assert_eq!(bot.react(message, 1, 1), LiveOutcome::Ignored(IgnoreReason::Bot));
    assert_eq!(bot.react(message, ALICE, 10), LiveOutcome::Ignored(IgnoreReason::NotTaskEmoji));

    let mut settings = default_settings();
    settings.potd_channel_id = TEST_CHANNEL;
    bot.settings.set(settings);
    bot.potd().load_settings().await.unwrap();
    assert_eq!(bot.react(message, ALICE, 1), LiveOutcome::Ignored(IgnoreReason::OtherChannel));

    assert_eq!(bot.count(ALICE), 0);
}

#[tokio::test]
async fn test_restart_drops_live_only_counts() {
    let bot = TestBot::start(week_questions()).unwrap();
    let message = posted_id(&bot.run_day(day(1)).await.unwrap()).unwrap();
    bot.chat.add_reactors(POTD_CHANNEL, message, task(1), &[ALICE], &[]);
    bot.boot().await.unwrap();

    // seen live but never recorded by the platform fake
    bot.react(message, BOB, 1);
    assert_eq!(bot.count(BOB), 1);

    let bot = bot.restart();
    bot.boot().await.unwrap();
    assert_eq!(bot.count(ALICE), 1);
    assert_eq!(bot.count(BOB), 0);
}

#[tokio::test]
async fn test_leaderboard_chunks_and_disable() {
    let bot = TestBot::start(week_questions()).unwrap();
    let message = posted_id(&bot.run_day(day(1)).await.unwrap()).unwrap();
    let users: Vec<i64> = (0..45).map(|i| 8000 + i).collect();
    bot.chat.add_reactors(POTD_CHANNEL, message, task(1), &users, &[]);
    bot.boot().await.unwrap();

    let report = bot.potd().run_leaderboard().await.unwrap();
    assert!(matches!(report, LeaderboardReport::Published { messages_sent: 3, entries: 45, .. }));
    let chunks = bot.sent_to(LEADERBOARD_CHANNEL);
    assert!(chunks[0].starts_with("# Leaderboard"));
    assert!(!chunks[1].contains("# Leaderboard"));
    // everyone ties for first
    assert!(chunks[2].lines().all(|line| line.starts_with("1. ")));

    let mut settings = default_settings();
    settings.leaderboard_enabled = false;
    bot.settings.set(settings);
    assert_eq!(bot.potd().run_leaderboard().await.unwrap(), LeaderboardReport::Disabled);
    assert_eq!(bot.sent_to(LEADERBOARD_CHANNEL).len(), 3);
}

// ============================================================================
// Registry maintenance
// ============================================================================

#[tokio::test]
async fn test_make_msgfile_seeds_registry() {
    let bot = TestBot::start(week_questions()).unwrap();
    for id in [500, 600, 700] {
        bot.chat.add_message(POTD_CHANNEL, Snowflake::new(id));
    }
    bot.chat.add_reactors(POTD_CHANNEL, Snowflake::new(600), task(1), &[ALICE], &[]);
    bot.chat.add_message(TEST_CHANNEL, Snowflake::new(650));

    let ids = bot.potd().make_message_file().await.unwrap();

    assert_eq!(ids, vec![Snowflake::new(700), Snowflake::new(600), Snowflake::new(500)]);
    assert_eq!(bot.registry_on_disk().unwrap(), vec![700, 600, 500]);

    bot.boot().await.unwrap();
    assert_eq!(bot.count(ALICE), 1);
}

#[tokio::test]
async fn test_command_listener_over_files() {
    let bot = TestBot::start(week_questions()).unwrap();
    bot.boot().await.unwrap();

    let input: &[u8] = b"run-potd\nexport-registry\nleaderboard\n";
    let parked =
        tokio::time::timeout(Duration::from_millis(500), potd_bot::commands::listen(&bot.ctx, input))
            .await;
    assert!(parked.is_err());

    assert_eq!(bot.potd().export_message_registry_snapshot().await.len(), 1);
    assert_eq!(bot.sent_to(LEADERBOARD_CHANNEL).len(), 1);
    assert_eq!(
        bot.read_json(CURSOR_FILE).unwrap(),
        json!({"nextIndex": 3, "nextSequence": 2})
    );
}
