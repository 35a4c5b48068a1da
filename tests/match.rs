use kalah::{
    channel::AgentLink,
    engine::{self, MatchError, STARTING_SIDE},
    model::{self, Board, Side},
    player::Player,
    protocol::{self, MsgType}
};
use std::time::Duration;
use tokio::{
    sync::mpsc::{Receiver, Sender},
    task::JoinHandle,
    time
};

//What a fake agent does with its very first own decision; afterwards
//it always plays its lowest legal hole.
enum Opening {
    Lowest,
    Swap,
    Line(String)
}

fn seat(number: u32, side: Side) -> (Player, Sender<String>, Receiver<String>) {
    let (link, to_engine, from_engine) = AgentLink::pair();
    let player = Player::new(
        number,
        format!("fake{}", number),
        side,
        link,
        Duration::from_secs(10)
    );
    (player, to_engine, from_engine)
}

//An in-memory agent speaking the full protocol; returns every line it
//received from the engine, trimmed.
fn fake_agent(
    mut from_engine: Receiver<String>,
    to_engine: Sender<String>,
    opening: Opening
) -> JoinHandle<Vec<String>> {
    tokio::spawn(async move {
        let mut received = Vec::new();
        let mut board = Board::new(7, 7);
        let mut side: Option<Side> = None;
        let mut opening = Some(opening);
        while let Some(line) = from_engine.recv().await {
            let msg = line.trim_end().to_string();
            received.push(msg.clone());
            let mut my_turn = false;
            match protocol::message_type(&msg).unwrap() {
                MsgType::End => break,
                MsgType::Start => {
                    if protocol::interpret_start_msg(&msg).unwrap() {
                        side = Some(Side::South);
                        my_turn = true;
                    } else {
                        side = Some(Side::North);
                    }
                },
                MsgType::State => {
                    let turn = protocol::interpret_state_msg(&msg, &mut board).unwrap();
                    if turn.played.is_none() {
                        //The opponent swapped
                        side = Some(side.unwrap().opposite());
                    }
                    my_turn = turn.again && !turn.end;
                },
                _ => panic!("engine sent an agent-bound message")
            }
            if my_turn {
                let my_side = side.unwrap();
                let reply = match opening.take().unwrap_or(Opening::Lowest) {
                    Opening::Lowest => {
                        let hole = model::legal_moves(&board, my_side)[0];
                        protocol::move_msg(hole)
                    },
                    Opening::Swap => {
                        side = Some(my_side.opposite());
                        protocol::swap_msg()
                    },
                    Opening::Line(line) => line
                };
                if to_engine.send(reply).await.is_err() {
                    break
                }
            }
        }
        received
    })
}

#[tokio::test]
async fn test_deterministic_match_runs_to_completion() {
    let (player1, to1, from1) = seat(1, STARTING_SIDE);
    let (player2, to2, from2) = seat(2, STARTING_SIDE.opposite());
    let agent1 = fake_agent(from1, to1, Opening::Lowest);
    let agent2 = fake_agent(from2, to2, Opening::Lowest);
    let mut board = Board::new(engine::HOLES, engine::SEEDS);
    let mut players = [player1, player2];
    let aborted = time::timeout(
        Duration::from_secs(30),
        engine::run_match(&mut board, &mut players)
    ).await.expect("match did not terminate");
    assert!(aborted.is_none());
    //The board reached the end of the game and was swept
    assert!(model::game_over(&board));
    assert_eq!(board.row_seeds(Side::North), 0);
    assert_eq!(board.row_seeds(Side::South), 0);
    assert_eq!(board.total_seeds(), 98);
    //The verdict matches the stores
    let outcome = engine::evaluate(&board, &players, None);
    let north = board.store(Side::North);
    let south = board.store(Side::South);
    let north_player = if players[0].side == Side::North { 1 } else { 2 };
    match outcome.winner {
        Some(number) => {
            assert_ne!(north, south);
            let expected = if north > south { north_player } else { 3 - north_player };
            assert_eq!(number, expected);
        },
        None => assert_eq!(north, south)
    }
    //Both agents were told the game ended
    let received1 = agent1.await.unwrap();
    let received2 = agent2.await.unwrap();
    assert_eq!(received1.last().unwrap(), "END");
    assert_eq!(received2.last().unwrap(), "END");
    //The opening move never earns an extra turn: the starter's first
    //state message hands the move to the opponent
    assert_eq!(received1[0], "START;South");
    assert!(received1[1].ends_with(";OPP"), "got {}", received1[1]);
}

#[tokio::test]
async fn test_swap_as_second_decision_exchanges_sides() {
    let (player1, to1, from1) = seat(1, STARTING_SIDE);
    let (player2, to2, from2) = seat(2, STARTING_SIDE.opposite());
    let agent1 = fake_agent(from1, to1, Opening::Lowest);
    let agent2 = fake_agent(from2, to2, Opening::Swap);
    let mut board = Board::new(engine::HOLES, engine::SEEDS);
    let mut players = [player1, player2];
    let aborted = time::timeout(
        Duration::from_secs(30),
        engine::run_match(&mut board, &mut players)
    ).await.expect("match did not terminate");
    assert!(aborted.is_none());
    //The pie rule swapped the seats and the match still finished
    assert_eq!(players[0].side, Side::North);
    assert_eq!(players[1].side, Side::South);
    assert!(model::game_over(&board));
    //The non-swapping agent was told about the swap and got the move
    let received1 = agent1.await.unwrap();
    let swap_info = received1.iter().find(|msg| msg.starts_with("CHANGE;SWAP;"));
    assert!(swap_info.unwrap().ends_with(";YOU"));
    let received2 = agent2.await.unwrap();
    assert_eq!(received2.last().unwrap(), "END");
}

#[tokio::test]
async fn test_unparseable_reply_aborts_with_sender_as_cause() {
    let (player1, to1, from1) = seat(1, STARTING_SIDE);
    let (player2, to2, from2) = seat(2, STARTING_SIDE.opposite());
    let agent1 = fake_agent(from1, to1, Opening::Lowest);
    let _agent2 = fake_agent(from2, to2, Opening::Line("XYZZY".to_string()));
    let mut board = Board::new(engine::HOLES, engine::SEEDS);
    let mut players = [player1, player2];
    let aborted = engine::run_match(&mut board, &mut players).await;
    let (culprit, error) = aborted.expect("match should have aborted");
    assert_eq!(culprit, 1);
    assert!(matches!(error, MatchError::InvalidMessage(_)));
    //The sane agent still receives END and wins by default
    let received1 = agent1.await.unwrap();
    assert_eq!(received1.last().unwrap(), "END");
    let outcome = engine::evaluate(&board, &players, Some(culprit));
    assert_eq!(outcome.winner, Some(1));
    assert_eq!(outcome.aborted, Some(2));
}

#[tokio::test]
async fn test_illegal_hole_aborts() {
    let (player1, to1, from1) = seat(1, STARTING_SIDE);
    let (player2, to2, from2) = seat(2, STARTING_SIDE.opposite());
    let _agent1 = fake_agent(from1, to1, Opening::Lowest);
    let _agent2 = fake_agent(from2, to2, Opening::Line("MOVE;9".to_string()));
    let mut board = Board::new(engine::HOLES, engine::SEEDS);
    let mut players = [player1, player2];
    let aborted = engine::run_match(&mut board, &mut players).await;
    let (culprit, error) = aborted.expect("match should have aborted");
    assert_eq!(culprit, 1);
    assert!(matches!(error, MatchError::IllegalMove));
}

#[tokio::test]
async fn test_late_swap_is_rejected() {
    let (player1, to1, from1) = seat(1, STARTING_SIDE);
    let (player2, to2, from2) = seat(2, STARTING_SIDE.opposite());
    //The starter tries to swap with its opening reply
    let _agent1 = fake_agent(from1, to1, Opening::Swap);
    let _agent2 = fake_agent(from2, to2, Opening::Lowest);
    let mut board = Board::new(engine::HOLES, engine::SEEDS);
    let mut players = [player1, player2];
    let aborted = engine::run_match(&mut board, &mut players).await;
    let (culprit, error) = aborted.expect("match should have aborted");
    assert_eq!(culprit, 0);
    assert!(matches!(error, MatchError::InvalidMessage(_)));
}

#[tokio::test]
async fn test_silent_agent_times_out() {
    let (player1, _to1, _from1) = {
        let (link, to_engine, from_engine) = AgentLink::pair();
        (
            Player::new(1, "silent".to_string(), STARTING_SIDE, link, Duration::from_millis(50)),
            to_engine,
            from_engine
        )
    };
    let (player2, to2, from2) = seat(2, STARTING_SIDE.opposite());
    let _agent2 = fake_agent(from2, to2, Opening::Lowest);
    let mut board = Board::new(engine::HOLES, engine::SEEDS);
    let mut players = [player1, player2];
    let aborted = engine::run_match(&mut board, &mut players).await;
    let (culprit, error) = aborted.expect("match should have aborted");
    assert_eq!(culprit, 0);
    assert!(matches!(error, MatchError::Timeout));
    assert!(players[0].timer_expired());
    let outcome = engine::evaluate(&board, &players, Some(culprit));
    assert_eq!(outcome.winner, Some(2));
}
