//! Integration tests for the table actor using a toy rules oracle.

use gambit_protocol::{
    ChatMessage, InvalidMove, MoveRequest, MoveSubmission, ParticipantId,
    Rejection, Role, RoleLabel, ServerEnvelope, ServerEvent,
};
use gambit_table::{
    IllegalMove, Outcome, ParticipantReceiver, RulesOracle, TableConfig,
    TableError, TableHandle, spawn_table,
};
use tokio::sync::mpsc;

// =========================================================================
// Toy oracle: a move list where anything on the a-h files is legal.
// =========================================================================

/// Position is the list of moves played. White moves on even lengths.
/// A move is legal when `from` starts with a file letter and differs
/// from `to`. `from == "boom"` panics. The game ends in mate after
/// `FINAL_PLY` moves.
struct Toy;

const FINAL_PLY: usize = 3;

impl RulesOracle for Toy {
    type Position = Vec<String>;

    fn mover(position: &Vec<String>) -> Role {
        if position.len() % 2 == 0 {
            Role::White
        } else {
            Role::Black
        }
    }

    fn apply(
        position: &Vec<String>,
        mv: &MoveRequest,
    ) -> Result<Vec<String>, IllegalMove> {
        if mv.from == "boom" {
            panic!("toy oracle blew up");
        }
        let on_board = mv.from.starts_with(|c: char| ('a'..='h').contains(&c));
        if !on_board || mv.from == mv.to {
            return Err(IllegalMove);
        }
        let mut next = position.clone();
        next.push(mv.to_string());
        Ok(next)
    }

    fn notation(position: &Vec<String>) -> String {
        if position.is_empty() {
            "start".into()
        } else {
            position.join(" ")
        }
    }

    fn outcome(position: &Vec<String>) -> Option<Outcome> {
        (position.len() == FINAL_PLY).then(|| Outcome::Checkmate {
            winner: Self::mover(position).opponent(),
        })
    }
}

// =========================================================================
// Helpers
// =========================================================================

fn pid(id: u64) -> ParticipantId {
    ParticipantId(id)
}

fn table() -> TableHandle {
    spawn_table::<Toy>(Vec::new(), TableConfig::default())
}

async fn join(
    table: &TableHandle,
    id: u64,
) -> (Option<Role>, ParticipantReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    let role = table.join(pid(id), tx).await.unwrap();
    (role, rx)
}

/// Joins White, Black and a spectator and clears their arrival events.
async fn full_table(
    table: &TableHandle,
) -> (ParticipantReceiver, ParticipantReceiver, ParticipantReceiver) {
    let (_, mut white) = join(table, 1).await;
    let (_, mut black) = join(table, 2).await;
    let (_, mut spectator) = join(table, 3).await;
    drain(&mut white);
    drain(&mut black);
    drain(&mut spectator);
    (white, black, spectator)
}

/// Waits until every command queued so far has been processed.
async fn settle(table: &TableHandle) {
    table.snapshot().await.unwrap();
}

fn drain_envelopes(rx: &mut ParticipantReceiver) -> Vec<ServerEnvelope> {
    let mut out = Vec::new();
    while let Ok(env) = rx.try_recv() {
        out.push(env);
    }
    out
}

fn drain(rx: &mut ParticipantReceiver) -> Vec<ServerEvent> {
    drain_envelopes(rx).into_iter().map(|env| env.payload).collect()
}

fn submission(from: &str, to: &str) -> MoveSubmission {
    MoveRequest::new(from, to).into()
}

fn system(text: &str) -> ServerEvent {
    ServerEvent::ChatMessage(ChatMessage {
        role: RoleLabel::System,
        message: text.into(),
        id: None,
    })
}

fn rejected(submitted: MoveSubmission, reason: Rejection) -> ServerEvent {
    ServerEvent::InvalidMove(InvalidMove { submitted, reason })
}

// =========================================================================
// Joining
// =========================================================================

#[tokio::test]
async fn test_join_assigns_white_black_then_spectator() {
    let table = table();

    let (white, mut white_rx) = join(&table, 1).await;
    let (black, mut black_rx) = join(&table, 2).await;
    let (spectator, mut spectator_rx) = join(&table, 3).await;

    assert_eq!(white, Some(Role::White));
    assert_eq!(black, Some(Role::Black));
    assert_eq!(spectator, None);

    let start = ServerEvent::BoardState("start".into());
    assert_eq!(
        drain(&mut white_rx),
        vec![ServerEvent::PlayerRole(Role::White), start.clone()]
    );
    assert_eq!(
        drain(&mut black_rx),
        vec![ServerEvent::PlayerRole(Role::Black), start.clone()]
    );
    assert_eq!(
        drain(&mut spectator_rx),
        vec![ServerEvent::SpectatorRole, start]
    );
}

#[tokio::test]
async fn test_join_mid_game_receives_current_position() {
    let table = table();
    let (_white, _black, _spectator) = full_table(&table).await;
    table.submit_move(pid(1), submission("e2", "e4")).await.unwrap();

    let (role, mut late) = join(&table, 4).await;

    assert_eq!(role, None);
    assert_eq!(
        drain(&mut late),
        vec![
            ServerEvent::SpectatorRole,
            ServerEvent::BoardState("e2e4".into())
        ]
    );
}

#[tokio::test]
async fn test_join_twice_is_rejected() {
    let table = table();
    let _first = join(&table, 1).await;

    let (tx, _rx) = mpsc::unbounded_channel();
    let result = table.join(pid(1), tx).await;

    assert!(matches!(result, Err(TableError::AlreadyJoined(p)) if p == pid(1)));
}

#[tokio::test]
async fn test_concurrent_joins_seat_exactly_two() {
    let table = table();

    let mut tasks = Vec::new();
    for id in 1..=16 {
        let table = table.clone();
        tasks.push(tokio::spawn(async move {
            let (tx, rx) = mpsc::unbounded_channel();
            let role = table.join(pid(id), tx).await.unwrap();
            (role, rx)
        }));
    }

    let mut roles = Vec::new();
    let mut receivers = Vec::new();
    for task in tasks {
        let (role, rx) = task.await.unwrap();
        roles.push(role);
        receivers.push(rx);
    }

    let whites = roles.iter().filter(|r| **r == Some(Role::White)).count();
    let blacks = roles.iter().filter(|r| **r == Some(Role::Black)).count();
    let spectators = roles.iter().filter(|r| r.is_none()).count();
    assert_eq!((whites, blacks, spectators), (1, 1, 14));

    let snap = table.snapshot().await.unwrap();
    assert_eq!(snap.participants, 16);
    assert!(snap.white.is_some() && snap.black.is_some());
    assert_ne!(snap.white, snap.black);
}

// =========================================================================
// Moves
// =========================================================================

#[tokio::test]
async fn test_accepted_move_reaches_everyone_move_then_position() {
    let table = table();
    let (mut white, mut black, mut spectator) = full_table(&table).await;

    table.submit_move(pid(1), submission("e2", "e4")).await.unwrap();
    settle(&table).await;

    let expected = vec![
        ServerEvent::Move(MoveRequest::new("e2", "e4")),
        ServerEvent::BoardState("e2e4".into()),
    ];
    assert_eq!(drain(&mut white), expected);
    assert_eq!(drain(&mut black), expected);
    assert_eq!(drain(&mut spectator), expected);

    let snap = table.snapshot().await.unwrap();
    assert_eq!(snap.mover, Role::Black);
    assert_eq!(snap.position, "e2e4");
}

#[tokio::test]
async fn test_move_out_of_turn_is_not_your_turn() {
    let table = table();
    let (mut white, mut black, mut spectator) = full_table(&table).await;

    table.submit_move(pid(2), submission("e7", "e5")).await.unwrap();
    settle(&table).await;

    assert_eq!(
        drain(&mut black),
        vec![rejected(submission("e7", "e5"), Rejection::NotYourTurn)]
    );
    assert!(drain(&mut white).is_empty());
    assert!(drain(&mut spectator).is_empty());
    assert_eq!(table.snapshot().await.unwrap().position, "start");
}

#[tokio::test]
async fn test_spectator_move_is_not_a_player() {
    let table = table();
    let (mut white, mut black, mut spectator) = full_table(&table).await;

    table.submit_move(pid(3), submission("e2", "e4")).await.unwrap();
    settle(&table).await;

    assert_eq!(
        drain(&mut spectator),
        vec![rejected(submission("e2", "e4"), Rejection::NotAPlayer)]
    );
    assert!(drain(&mut white).is_empty());
    assert!(drain(&mut black).is_empty());
    assert_eq!(table.snapshot().await.unwrap().position, "start");
}

#[tokio::test]
async fn test_illegal_move_notifies_only_submitter() {
    let table = table();
    let (mut white, mut black, _spectator) = full_table(&table).await;

    table.submit_move(pid(1), submission("z2", "z4")).await.unwrap();
    settle(&table).await;

    assert_eq!(
        drain(&mut white),
        vec![rejected(submission("z2", "z4"), Rejection::IllegalMove)]
    );
    assert!(drain(&mut black).is_empty());

    let snap = table.snapshot().await.unwrap();
    assert_eq!(snap.mover, Role::White);
    assert_eq!(snap.position, "start");
}

#[tokio::test]
async fn test_malformed_move_is_rejected_and_echoed() {
    let table = table();
    let (mut white, mut black, _spectator) = full_table(&table).await;
    let missing_to = MoveSubmission {
        from: Some("e2".into()),
        to: None,
        promotion: None,
    };

    table.submit_move(pid(1), missing_to.clone()).await.unwrap();
    settle(&table).await;

    assert_eq!(
        drain(&mut white),
        vec![rejected(missing_to, Rejection::MalformedSubmission)]
    );
    assert!(drain(&mut black).is_empty());
}

#[tokio::test]
async fn test_malformed_move_from_wrong_seat_reports_turn_first() {
    let table = table();
    let (_white, mut black, _spectator) = full_table(&table).await;

    table
        .submit_move(pid(2), MoveSubmission::default())
        .await
        .unwrap();
    settle(&table).await;

    assert_eq!(
        drain(&mut black),
        vec![rejected(MoveSubmission::default(), Rejection::NotYourTurn)]
    );
}

#[tokio::test]
async fn test_oracle_panic_is_treated_as_illegal_move() {
    let table = table();
    let (mut white, _black, _spectator) = full_table(&table).await;

    table
        .submit_move(pid(1), submission("boom", "e4"))
        .await
        .unwrap();
    settle(&table).await;

    assert_eq!(
        drain(&mut white),
        vec![rejected(submission("boom", "e4"), Rejection::IllegalMove)]
    );

    // The table is still serving.
    table.submit_move(pid(1), submission("e2", "e4")).await.unwrap();
    settle(&table).await;
    assert_eq!(drain(&mut white).len(), 2);
}

#[tokio::test]
async fn test_final_move_announces_outcome() {
    let table = table();
    let (_white, _black, mut spectator) = full_table(&table).await;

    table.submit_move(pid(1), submission("e2", "e4")).await.unwrap();
    table.submit_move(pid(2), submission("e7", "e5")).await.unwrap();
    table.submit_move(pid(1), submission("d1", "h5")).await.unwrap();
    settle(&table).await;

    let events = drain(&mut spectator);
    assert_eq!(events.len(), 7);
    assert_eq!(events[6], system("Checkmate. White wins."));
}

#[tokio::test]
async fn test_outcome_announcement_can_be_disabled() {
    let config = TableConfig {
        announce_outcome: false,
        ..TableConfig::default()
    };
    let table = spawn_table::<Toy>(Vec::new(), config);
    let (_white, _black, mut spectator) = full_table(&table).await;

    table.submit_move(pid(1), submission("e2", "e4")).await.unwrap();
    table.submit_move(pid(2), submission("e7", "e5")).await.unwrap();
    table.submit_move(pid(1), submission("d1", "h5")).await.unwrap();
    settle(&table).await;

    assert_eq!(drain(&mut spectator).len(), 6);
}

#[tokio::test]
async fn test_broadcasts_share_one_order_across_participants() {
    let table = table();
    let (mut white, mut black, mut spectator) = full_table(&table).await;

    for (id, from, to) in [
        (1, "e2", "e4"),
        (2, "e7", "e5"),
        (2, "a7", "a6"), // out of turn, unicast to Black
    ] {
        table.submit_move(pid(id), submission(from, to)).await.unwrap();
    }
    table.chat(pid(3), "nice".into()).await.unwrap();
    settle(&table).await;

    let seqs = |rx: &mut ParticipantReceiver| -> Vec<u64> {
        drain_envelopes(rx)
            .into_iter()
            .filter(|env| !matches!(env.payload, ServerEvent::InvalidMove(_)))
            .map(|env| env.seq)
            .collect()
    };
    let white_seqs = seqs(&mut white);
    assert_eq!(white_seqs.len(), 5);
    assert!(white_seqs.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(seqs(&mut black), white_seqs);
    assert_eq!(seqs(&mut spectator), white_seqs);
}

// =========================================================================
// Leaving
// =========================================================================

#[tokio::test]
async fn test_seated_leave_announces_and_frees_seat() {
    let table = table();
    let (_white, mut black, mut spectator) = full_table(&table).await;

    table.leave(pid(1)).await.unwrap();

    let notice = vec![system("White player disconnected.")];
    assert_eq!(drain(&mut black), notice);
    assert_eq!(drain(&mut spectator), notice);

    let (role, _rx) = join(&table, 4).await;
    assert_eq!(role, Some(Role::White));
}

#[tokio::test]
async fn test_spectator_leave_is_silent() {
    let table = table();
    let (mut white, mut black, _spectator) = full_table(&table).await;

    table.leave(pid(3)).await.unwrap();
    settle(&table).await;

    assert!(drain(&mut white).is_empty());
    assert!(drain(&mut black).is_empty());
    let snap = table.snapshot().await.unwrap();
    assert_eq!((snap.white, snap.black), (Some(pid(1)), Some(pid(2))));
}

#[tokio::test]
async fn test_spectator_is_not_promoted_when_seat_frees() {
    let table = table();
    let (_white, _black, mut spectator) = full_table(&table).await;

    table.leave(pid(2)).await.unwrap();
    table.submit_move(pid(3), submission("e2", "e4")).await.unwrap();
    settle(&table).await;

    let events = drain(&mut spectator);
    assert_eq!(
        events.last(),
        Some(&rejected(submission("e2", "e4"), Rejection::NotAPlayer))
    );
    assert_eq!(table.snapshot().await.unwrap().black, None);
}

#[tokio::test]
async fn test_leave_keeps_position() {
    let table = table();
    let (_white, _black, _spectator) = full_table(&table).await;
    table.submit_move(pid(1), submission("e2", "e4")).await.unwrap();

    table.leave(pid(1)).await.unwrap();
    table.leave(pid(2)).await.unwrap();

    let snap = table.snapshot().await.unwrap();
    assert_eq!(snap.position, "e2e4");
    assert_eq!(snap.mover, Role::Black);
}

#[tokio::test]
async fn test_leave_unknown_participant_fails() {
    let table = table();
    let result = table.leave(pid(42)).await;
    assert!(matches!(
        result,
        Err(TableError::UnknownParticipant(p)) if p == pid(42)
    ));
}

// =========================================================================
// Chat
// =========================================================================

fn chat_line(event: &ServerEvent) -> (&RoleLabel, &str) {
    match event {
        ServerEvent::ChatMessage(ChatMessage { role, message, .. }) => {
            (role, message.as_str())
        }
        other => panic!("expected chat, got {other:?}"),
    }
}

#[tokio::test]
async fn test_chat_is_labelled_with_current_role() {
    let table = table();
    let (mut white, _black, _spectator) = full_table(&table).await;

    table.chat(pid(1), "hello".into()).await.unwrap();
    table.chat(pid(3), "hi all".into()).await.unwrap();
    settle(&table).await;

    let events = drain(&mut white);
    assert_eq!(chat_line(&events[0]), (&RoleLabel::White, "hello"));
    assert_eq!(chat_line(&events[1]), (&RoleLabel::Spectator, "hi all"));
}

#[tokio::test]
async fn test_chat_blank_is_dropped() {
    let table = table();
    let (mut white, _black, _spectator) = full_table(&table).await;

    table.chat(pid(2), "   ".into()).await.unwrap();
    settle(&table).await;

    assert!(drain(&mut white).is_empty());
}

#[tokio::test]
async fn test_chat_is_truncated_to_limit() {
    let config = TableConfig {
        max_chat_len: 5,
        ..TableConfig::default()
    };
    let table = spawn_table::<Toy>(Vec::new(), config);
    let (_, mut white) = join(&table, 1).await;
    drain(&mut white);

    table.chat(pid(1), "échecs et mat".into()).await.unwrap();
    settle(&table).await;

    let events = drain(&mut white);
    assert_eq!(chat_line(&events[0]), (&RoleLabel::White, "échec"));
}

#[tokio::test]
async fn test_chat_from_departed_participant_is_ignored() {
    let table = table();
    let (mut white, _black, _spectator) = full_table(&table).await;

    table.leave(pid(2)).await.unwrap();
    drain(&mut white);
    table.chat(pid(2), "still here?".into()).await.unwrap();
    settle(&table).await;

    assert!(drain(&mut white).is_empty());
}

// =========================================================================
// Shutdown
// =========================================================================

#[tokio::test]
async fn test_shutdown_makes_table_unavailable() {
    let table = table();
    table.shutdown().await.unwrap();

    let result = table.snapshot().await;
    assert!(matches!(result, Err(TableError::Unavailable)));
}
