//! Complete duels driven through chat input.
mod common;

use std::sync::Arc;

use common::*;
use duel_core::{CardMatching, DuelConfig, DuelOutcome, Seat};
use runtime::{
    DuelEvent, EndReason, Event, FileRatingRepository, InMemoryRatingRepo, RatingEvent,
    RatingRepository, Topic,
};

#[tokio::test(start_paused = true)]
async fn full_duel_ends_with_a_winner_and_updates_ratings() {
    let dir = tempfile::tempdir().unwrap();
    let repository = Arc::new(FileRatingRepository::new(dir.path().join("ratings.json")).unwrap());
    let rig = Harness::build(DuelConfig::default(), repository.clone()).await;
    let mut events = rig.events();

    rig.command(ALICE, "!duel <@2>").await;
    let duel = rig.duel_channel();

    for (author, content) in [
        (ALICE, "Titan"),
        (ALICE, "Ogre"),
        (ALICE, "Wolf"),
        (BOB, "Pebble"),
        (BOB, "Twig"),
        (BOB, "Leaf"),
        // round 1
        (ALICE, "Titan"),
        (BOB, "Pebble"),
        (BOB, "I attack with Twig"),
        (ALICE, "ogre defends"),
        // round 2
        (ALICE, "Titan"),
        (BOB, "Leaf"),
    ] {
        rig.chat(duel, author, content);
    }

    channel_closed(&mut events, duel).await;

    let lobby = rig.platform.texts(LOBBY);
    assert_eq!(
        lobby.last().map(String::as_str),
        Some(
            "Duel Invitation\nA duel room has been opened for <@1> and <@2>. Click on this to start: <#1000>"
        )
    );

    let log = rig.platform.texts(duel);
    assert_eq!(log[0], "Challenging <@2> to a duel!");
    assert_eq!(log[1], "<@1> and <@2>, get ready for a duel!");
    assert!(log[2].starts_with("List of Cards\nTitan: Attack: 10, Health: 30, Ability: Crush"));
    for expected in [
        "Summoning Phase for Duelist 1\nSummon your cards one by one. (Please select 3 cards)",
        "You summoned Titan.",
        "You summoned Leaf.",
        "<@1>, choose a card to attack with:",
        "<@1> attacks with Titan!",
        "<@2>, choose a card to defend:",
        "<@2> defends with Pebble!",
        "Pebble took 10 damage!",
        "Titan took 1 damage!",
        "<@2> attacks with Twig!",
        "<@1> defends with Ogre!",
        "Twig took 8 damage!",
        "<@2> defends with Leaf!",
        "<@1> has won the match. This channel will be deleted shortly.",
    ] {
        assert!(log.iter().any(|line| line == expected), "missing {expected:?} in {log:#?}");
    }

    // Titan's first clash left it at 29 health.
    let round_two_cards = log
        .iter()
        .filter(|line| line.starts_with("Duelist 1's Available Cards"))
        .nth(2)
        .unwrap();
    assert!(round_two_cards.contains("Titan: Attack: 10, Health: 29"));

    assert_eq!(rig.platform.deleted(), vec![duel]);
    assert!(rig.handle.active_duel(GUILD).is_none());

    assert!(approx(rig.rating(ALICE).await.unwrap(), 116.0));
    assert!(approx(rig.rating(BOB).await.unwrap(), 84.0));
    let stored = repository.load().unwrap();
    assert!(approx(stored.get(ALICE).unwrap(), 116.0));
    assert!(approx(stored.get(BOB).unwrap(), 84.0));
}

#[tokio::test(start_paused = true)]
async fn nobody_summoning_ends_in_a_draw_without_rating_changes() {
    let rig = Harness::start().await;
    let mut events = rig.events();

    rig.command(ALICE, "!duel <@2>").await;
    let duel = rig.duel_channel();

    let ended = next_duel_event(&mut events, |e| matches!(e, DuelEvent::Ended { .. })).await;
    assert!(matches!(
        ended,
        DuelEvent::Ended {
            reason: EndReason::Concluded(DuelOutcome::Draw),
            ..
        }
    ));
    channel_closed(&mut events, duel).await;

    let log = rig.platform.texts(duel);
    assert_eq!(
        log.iter()
            .filter(|line| *line == "Time's up for this phase!")
            .count(),
        2
    );
    assert!(rig.platform.has_text(duel, "<@1> has no cards left to choose this round."));
    assert_eq!(
        log.last().map(String::as_str),
        Some("It's a draw! Both players have no cards left. This channel will be deleted shortly.")
    );

    assert_eq!(rig.rating(ALICE).await, Some(100.0));
    assert_eq!(rig.rating(BOB).await, Some(100.0));
}

#[tokio::test(start_paused = true)]
async fn summoning_rejects_invalid_picks_without_changing_the_roster() {
    let rig = Harness::start().await;
    let mut events = rig.events();

    rig.command(ALICE, "!duel 2").await;
    let duel = rig.duel_channel();

    for (author, content) in [
        (ALICE, "Dragon"),
        (ALICE, "Dragon"),
        (BOB, "Titan"),
        (ALICE, "done"),
        (CAROL, "Titan"),
        (ALICE, "titan"),
        (ALICE, "TITAN"),
        (ALICE, "Ogre"),
        (ALICE, "Wolf"),
    ] {
        rig.chat(duel, author, content);
    }

    // Bob never summons, so Alice wins once her first attack times out.
    let locked = next_duel_event(&mut events, |e| {
        matches!(e, DuelEvent::RosterLocked { player, .. } if *player == ALICE)
    })
    .await;
    assert!(matches!(locked, DuelEvent::RosterLocked { cards: 3, .. }));
    channel_closed(&mut events, duel).await;

    let log = rig.platform.texts(duel);
    let summoning: Vec<_> = log
        .iter()
        .skip_while(|line| !line.starts_with("Summoning Phase for Duelist 1"))
        .skip(1)
        .take(7)
        .cloned()
        .collect();
    assert_eq!(
        summoning,
        [
            "<@1> You don't have Dragon in your collection.",
            "<@1> You don't have Dragon in your collection.",
            "Only the mentioned players can summon cards.",
            "You summoned Titan.",
            "You can't choose the same card more than once.",
            "You summoned Ogre.",
            "You summoned Wolf.",
        ]
    );

    assert!(rig.platform.has_text(duel, "<@1>, time's up to choose a card!"));
    assert!(rig.platform.has_text(duel, "<@1> has won the match. This channel will be deleted shortly."));
    assert!(approx(rig.rating(ALICE).await.unwrap(), 116.0));
}

#[tokio::test(start_paused = true)]
async fn a_card_fights_once_per_round() {
    let rig = Harness::build(
        DuelConfig {
            roster_size: 1,
            ..DuelConfig::default()
        },
        Arc::new(InMemoryRatingRepo::new()),
    )
    .await;
    let mut events = rig.events();

    rig.command(ALICE, "!duel <@2>").await;
    let duel = rig.duel_channel();

    for (author, content) in [
        (ALICE, "Wolf"),
        (BOB, "Ogre"),
        (ALICE, "Wolf"),
        (BOB, "Ogre"),
        (ALICE, "Wolf"),
        (BOB, "Ogre"),
    ] {
        rig.chat(duel, author, content);
    }

    next_duel_event(&mut events, |e| matches!(e, DuelEvent::ClashResolved { .. })).await;
    next_duel_event(&mut events, |e| matches!(e, DuelEvent::ClashResolved { .. })).await;

    // Bob's only card defended in the first sub-round, so he has nothing to
    // attack with until the next round starts.
    let log = rig.platform.texts(duel);
    let skipped = log
        .iter()
        .position(|line| line == "<@2> has no cards left to choose this round.")
        .unwrap();
    let second_attack = log
        .iter()
        .enumerate()
        .filter(|(_, line)| *line == "<@1> attacks with Wolf!")
        .nth(1)
        .map(|(index, _)| index)
        .unwrap();
    assert!(skipped < second_attack);
    assert!(!log.iter().any(|line| line == "<@2> attacks with Ogre!"));
    assert!(!log.iter().any(|line| line.contains("time's up")));
}

#[tokio::test(start_paused = true)]
async fn exact_matching_ignores_card_names_inside_sentences() {
    let rig = Harness::build(
        DuelConfig {
            roster_size: 1,
            card_matching: CardMatching::Exact,
            ..DuelConfig::default()
        },
        Arc::new(InMemoryRatingRepo::new()),
    )
    .await;

    rig.command(ALICE, "!duel <@2>").await;
    let duel = rig.duel_channel();

    for (author, content) in [
        (ALICE, "Titan"),
        (BOB, "Pebble"),
        (ALICE, "attack with Titan please"),
    ] {
        rig.chat(duel, author, content);
    }

    until(|| rig.platform.has_text(duel, "<@1>, time's up to choose a card!")).await;
    assert!(!rig.platform.has_text(duel, "<@1> attacks with Titan!"));

    // A bare card name is accepted on the next prompt.
    until(|| rig.platform.has_text(duel, "<@2>, choose a card to attack with:")).await;
    rig.chat(duel, BOB, " PEBBLE ");
    until(|| rig.platform.has_text(duel, "<@2> attacks with Pebble!")).await;
}

#[tokio::test(start_paused = true)]
async fn duel_events_trace_the_match() {
    let rig = Harness::build(
        DuelConfig {
            roster_size: 1,
            ..DuelConfig::default()
        },
        Arc::new(InMemoryRatingRepo::new()),
    )
    .await;
    let mut events = rig.events();

    rig.command(CAROL, "!duel <@4>").await;
    let duel = rig.duel_channel();
    for (author, content) in [
        (CAROL, "Titan"),
        (DAVE, "Leaf"),
        (CAROL, "Titan"),
        (DAVE, "Leaf"),
    ] {
        rig.chat(duel, author, content);
    }

    let started = next_duel_event(&mut events, |e| matches!(e, DuelEvent::Started { .. })).await;
    assert!(matches!(
        started,
        DuelEvent::Started { challenger, opponent, .. } if challenger == CAROL && opponent == DAVE
    ));

    let pruned = next_duel_event(&mut events, |e| matches!(e, DuelEvent::CardsPruned { .. })).await;
    let DuelEvent::CardsPruned { player, cards, .. } = pruned else {
        unreachable!();
    };
    assert_eq!(player, DAVE);
    assert_eq!(cards.len(), 1);
    assert_eq!(cards[0].name(), "Leaf");

    let ended = next_duel_event(&mut events, |e| matches!(e, DuelEvent::Ended { .. })).await;
    assert!(matches!(
        ended,
        DuelEvent::Ended {
            reason: EndReason::Concluded(DuelOutcome::Victory {
                winner: Seat::Challenger
            }),
            ..
        }
    ));
}

#[tokio::test(start_paused = true)]
async fn opponent_emptying_the_challenger_is_credited_with_the_win() {
    let rig = Harness::build(
        DuelConfig {
            roster_size: 1,
            ..DuelConfig::default()
        },
        Arc::new(InMemoryRatingRepo::new()),
    )
    .await;
    let mut topics = rig.handle.subscribe_multiple(&[Topic::Duel, Topic::Rating]);
    let (Some(mut events), Some(mut ratings)) =
        (topics.remove(&Topic::Duel), topics.remove(&Topic::Rating))
    else {
        unreachable!();
    };

    rig.command(ALICE, "!duel <@2>").await;
    let duel = rig.duel_channel();
    for (author, content) in [(ALICE, "Leaf"), (BOB, "Titan"), (ALICE, "Leaf"), (BOB, "Titan")] {
        rig.chat(duel, author, content);
    }

    let ended = next_duel_event(&mut events, |e| matches!(e, DuelEvent::Ended { .. })).await;
    assert!(matches!(
        ended,
        DuelEvent::Ended {
            reason: EndReason::Concluded(DuelOutcome::Victory {
                winner: Seat::Opponent
            }),
            ..
        }
    ));
    channel_closed(&mut events, duel).await;

    assert!(rig.platform.has_text(duel, "<@2> has won the match. This channel will be deleted shortly."));
    let update = loop {
        if let Event::Rating(RatingEvent::Updated(change)) = ratings.recv().await.unwrap() {
            break change;
        }
    };
    assert_eq!((update.winner, update.loser), (BOB, ALICE));
    assert!(approx(rig.rating(BOB).await.unwrap(), 116.0));
    assert!(approx(rig.rating(ALICE).await.unwrap(), 84.0));
}

#[tokio::test(start_paused = true)]
async fn oversized_timeouts_leave_the_duel_playable() {
    let rig = Harness::build(
        DuelConfig {
            summon_timeout_secs: u64::MAX,
            choice_timeout_secs: u64::MAX,
            forfeit_timeout_secs: u64::MAX,
            ..DuelConfig::default()
        },
        Arc::new(InMemoryRatingRepo::new()),
    )
    .await;

    rig.command(ALICE, "!duel <@2>").await;
    let duel = rig.duel_channel();
    rig.chat(duel, ALICE, "Titan");

    until(|| rig.platform.has_text(duel, "You summoned Titan.")).await;
    assert!(rig.handle.active_duel(GUILD).is_some());

    rig.command(ADMIN, "!forcestopgame").await;
    rig.command(CAROL, "!duel <@4>").await;
    assert!(!rig.platform.has_text(LOBBY, "A duel is already in progress in this server."));
    assert_eq!(rig.handle.active_duel(GUILD).unwrap().challenger, CAROL);
}

#[tokio::test(start_paused = true)]
async fn a_crashed_duel_frees_its_guild() {
    let rig = Harness::start().await;
    let mut events = rig.events();
    rig.platform.panic_on_send(Some("Summoning Phase"));

    rig.command(ALICE, "!duel <@2>").await;
    let started = next_duel_event(&mut events, |e| matches!(e, DuelEvent::Started { .. })).await;
    let DuelEvent::Started { channel: duel, .. } = started else {
        unreachable!();
    };

    let ended = next_duel_event(&mut events, |e| matches!(e, DuelEvent::Ended { .. })).await;
    assert!(matches!(
        ended,
        DuelEvent::Ended {
            reason: EndReason::Failed,
            ..
        }
    ));
    channel_closed(&mut events, duel).await;
    assert!(rig.handle.active_duel(GUILD).is_none());
    assert_eq!(rig.platform.deleted(), vec![duel]);

    rig.platform.panic_on_send(None);
    rig.command(CAROL, "!duel <@4>").await;
    assert!(!rig.platform.has_text(LOBBY, "A duel is already in progress in this server."));
    assert_eq!(rig.handle.active_duel(GUILD).unwrap().challenger, CAROL);
}
