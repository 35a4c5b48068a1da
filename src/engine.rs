use crate::{
    channel::{AgentLink, LinkError},
    model::{self, Board, Move, Side},
    player::Player,
    protocol::{self, MsgType, ProtocolError}
};
use std::{
    error,
    fmt,
    io,
    process::Stdio,
    time::Duration
};
use tokio::process::Command;

pub const HOLES: usize = 7;
pub const SEEDS: u32 = 7;
pub const STARTING_SIDE: Side = Side::South;
//Cumulative wall-clock allowance per agent for the whole match
pub const MATCH_ALLOWANCE: Duration = Duration::from_secs(3600);

pub enum MatchError {
    InvalidMessage(String),
    IllegalMove,
    Timeout,
    AgentIo
}

impl fmt::Display for MatchError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::InvalidMessage(reason) => write!(f, "Invalid message: {}", reason),
            Self::IllegalMove => write!(f, "Illegal move"),
            Self::Timeout => write!(f, "Timed out"),
            Self::AgentIo => write!(f, "Agent connection broke down")
        }
    }
}

impl fmt::Debug for MatchError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl error::Error for MatchError {}

impl From<ProtocolError> for MatchError {
    fn from(error: ProtocolError) -> MatchError {
        match error {
            ProtocolError::InvalidMessage(reason) => MatchError::InvalidMessage(reason)
        }
    }
}

impl From<LinkError> for MatchError {
    fn from(error: LinkError) -> MatchError {
        match error {
            LinkError::Timeout => MatchError::Timeout,
            LinkError::Closed => MatchError::AgentIo
        }
    }
}

pub struct Standing {
    pub number: u32,
    pub name: String,
    pub won: bool,
    pub moves: u32,
    pub avg_response_millis: u128
}

pub struct MatchOutcome {
    //In launch order
    pub standings: [Standing; 2],
    //Player number whose violation ended the match
    pub aborted: Option<u32>,
    //Player number; None is a draw
    pub winner: Option<u32>,
    //Absolute store difference; 0 for an aborted match
    pub score: u32
}

//The turn loop. players[0] and players[1] are in launch order with
//their sides already assigned; the board is authoritative and shared
//with nobody. Returns the offending player's index and the violation
//if the match aborted.
pub async fn run_match(
    board: &mut Board,
    players: &mut [Player; 2]
) -> Option<(usize, MatchError)> {
    let result = play(board, players).await;
    let end = protocol::end_msg();
    match result {
        Ok(()) => {
            //Both agents learn the exchange is over; failures here are
            //nobody's loss
            let _ = players[0].send(&end).await;
            let _ = players[1].send(&end).await;
            None
        },
        Err((culprit, error)) => {
            match error {
                //The culprit's pipe is gone; only the sane agent is told
                MatchError::AgentIo => {
                    let _ = players[1 - culprit].send(&end).await;
                },
                _ => {
                    let _ = players[0].send(&end).await;
                    let _ = players[1].send(&end).await;
                }
            }
            Some((culprit, error))
        }
    }
}

async fn play(
    board: &mut Board,
    players: &mut [Player; 2]
) -> Result<(), (usize, MatchError)> {
    for index in 0..2 {
        let msg = protocol::start_msg(players[index].side);
        players[index].send(&msg).await
            .map_err(|_| (index, MatchError::AgentIo))?;
    }
    let mut active = if players[0].side == STARTING_SIDE { 0 } else { 1 };
    let mut move_count: u32 = 1;
    loop {
        let reply = players[active].recv().await
            .map_err(|error| (active, MatchError::from(error)))?;
        let reply = reply.trim_end();
        let msg_type = protocol::message_type(reply)
            .map_err(|error| (active, error.into()))?;
        let waiting = 1 - active;
        if msg_type == MsgType::Swap && move_count == 2 {
            //Pie rule: the second mover takes over the opener's side.
            //Seats keep their agents; both sides flip, and the original
            //opener is back on move.
            players[0].change_side();
            players[1].change_side();
            active = waiting;
            players[active].send(&protocol::swap_info_msg(board)).await
                .map_err(|_| (active, MatchError::AgentIo))?;
        } else if msg_type == MsgType::Move {
            let hole = protocol::interpret_move_msg(reply)
                .map_err(|error| (active, error.into()))?;
            if hole < 1 {
                return Err((active, MatchError::InvalidMessage(
                    format!("expected a positive hole number but got {}", hole)
                )));
            }
            let mov = Move { side: players[active].side, hole: hole as usize };
            if !model::is_legal_move(board, mov) {
                return Err((active, MatchError::IllegalMove));
            }
            let mut next = model::make_move(board, mov);
            //The opening move never earns an extra turn, so the swap
            //decision point always arrives
            if move_count == 1 {
                next = players[waiting].side;
            }
            let over = model::game_over(board);
            if over {
                model::collect_remaining(board);
            }
            if next != players[active].side {
                active = waiting;
            }
            let idle = 1 - active;
            players[idle].send(&protocol::state_msg(mov.hole, board, over, false)).await
                .map_err(|_| (idle, MatchError::AgentIo))?;
            players[active].send(&protocol::state_msg(mov.hole, board, over, true)).await
                .map_err(|_| (active, MatchError::AgentIo))?;
            if over {
                return Ok(());
            }
        } else {
            return Err((active, MatchError::InvalidMessage(
                "expected a move message".to_string()
            )));
        }
        move_count += 1;
    }
}

pub fn evaluate(
    board: &Board,
    players: &[Player; 2],
    aborted: Option<usize>
) -> MatchOutcome {
    let mut won = [false, false];
    let mut score = 0;
    match aborted {
        Some(culprit) => won[1 - culprit] = true,
        None => {
            let north = if players[0].side == Side::North { 0 } else { 1 };
            let diff = board.store(Side::North) as i64 - board.store(Side::South) as i64;
            if diff > 0 {
                won[north] = true;
            } else if diff < 0 {
                won[1 - north] = true;
            }
            score = diff.unsigned_abs() as u32;
        }
    }
    let standings = [0, 1].map(|index| Standing {
        number: players[index].number,
        name: players[index].name.clone(),
        won: won[index],
        moves: players[index].move_count,
        avg_response_millis: players[index].average_response_millis()
    });
    MatchOutcome {
        standings,
        aborted: aborted.map(|index| players[index].number),
        winner: won.iter().position(|&w| w).map(|index| players[index].number),
        score
    }
}

//Launches both agent executables and plays one full match. The first
//agent takes the starting side.
pub async fn run(command1: &str, command2: &str) -> io::Result<MatchOutcome> {
    let spawn = |command: &str| {
        Command::new(command)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .spawn()
    };
    let mut child1 = spawn(command1)?;
    let mut child2 = spawn(command2)?;
    let mut players = [
        Player::new(
            1,
            command1.to_string(),
            STARTING_SIDE,
            AgentLink::from_child(&mut child1),
            MATCH_ALLOWANCE
        ),
        Player::new(
            2,
            command2.to_string(),
            STARTING_SIDE.opposite(),
            AgentLink::from_child(&mut child2),
            MATCH_ALLOWANCE
        )
    ];
    let mut board = Board::new(HOLES, SEEDS);
    let aborted = run_match(&mut board, &mut players).await;
    if let Some((culprit, error)) = &aborted {
        eprintln!("Error: Agent {} ({}): {}",
            players[*culprit].number, players[*culprit].name, error);
    }
    let outcome = evaluate(&board, &players, aborted.map(|(index, _)| index));
    for player in players.iter_mut() {
        player.shutdown();
    }
    let _ = child1.kill().await;
    let _ = child2.kill().await;
    Ok(outcome)
}
