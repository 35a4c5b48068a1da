use crate::model::{Board, Side};
use std::{error, fmt};

//Codec for the line protocol spoken between the match engine and its
//agents. Every message occupies one line on the wire; the functions
//here work on complete lines with the terminator already stripped
//(framing belongs to the channel).

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum MsgType {
    Start,
    State,
    Swap,
    Move,
    End
}

//Decoded CHANGE message: the move just applied (None for a swap),
//whether the recipient moves next, and whether the game has ended.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct MoveTurn {
    pub played: Option<usize>,
    pub again: bool,
    pub end: bool
}

pub enum ProtocolError {
    InvalidMessage(String)
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::InvalidMessage(reason) => write!(f, "Invalid message: {}", reason)
        }
    }
}

impl fmt::Debug for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::InvalidMessage(reason) => write!(f, "Invalid message: {}", reason)
        }
    }
}

impl error::Error for ProtocolError {}

pub fn message_type(msg: &str) -> Result<MsgType, ProtocolError> {
    if msg.starts_with("START;") {
        Ok(MsgType::Start)
    } else if msg.starts_with("CHANGE;") {
        Ok(MsgType::State)
    } else if msg.starts_with("MOVE;") {
        Ok(MsgType::Move)
    } else if msg == "SWAP" {
        Ok(MsgType::Swap)
    } else if msg == "END" {
        Ok(MsgType::End)
    } else {
        Err(ProtocolError::InvalidMessage(
            "could not determine message type".to_string()
        ))
    }
}

pub fn start_msg(side: Side) -> String {
    match side {
        Side::North => "START;North".to_string(),
        Side::South => "START;South".to_string()
    }
}

pub fn end_msg() -> String {
    "END".to_string()
}

pub fn move_msg(hole: usize) -> String {
    format!("MOVE;{}", hole)
}

pub fn swap_msg() -> String {
    "SWAP".to_string()
}

fn board_snapshot(board: &Board) -> String {
    let mut parts = Vec::with_capacity(2 * (board.holes() + 1));
    for hole in 1..=board.holes() {
        parts.push(board.seeds(Side::North, hole).to_string());
    }
    parts.push(board.store(Side::North).to_string());
    for hole in 1..=board.holes() {
        parts.push(board.seeds(Side::South, hole).to_string());
    }
    parts.push(board.store(Side::South).to_string());
    parts.join(",")
}

fn turn_word(end: bool, you: bool) -> &'static str {
    if end {
        "END"
    } else if you {
        "YOU"
    } else {
        "OPP"
    }
}

pub fn state_msg(hole: usize, board: &Board, end: bool, you: bool) -> String {
    format!("CHANGE;{};{};{}", hole, board_snapshot(board), turn_word(end, you))
}

//The CHANGE sent to the newly-active agent after an accepted swap;
//the move field carries the swap marker instead of a hole.
pub fn swap_info_msg(board: &Board) -> String {
    format!("CHANGE;SWAP;{};YOU", board_snapshot(board))
}

//Returns true if the receiving agent moves first (it was given South).
pub fn interpret_start_msg(msg: &str) -> Result<bool, ProtocolError> {
    match msg.strip_prefix("START;") {
        Some("South") => Ok(true),
        Some("North") => Ok(false),
        _ => Err(ProtocolError::InvalidMessage(
            format!("illegal position parameter: {}", msg)
        ))
    }
}

pub fn interpret_move_msg(msg: &str) -> Result<i64, ProtocolError> {
    let hole = msg.strip_prefix("MOVE;").unwrap_or("");
    hole.parse().map_err(|_| ProtocolError::InvalidMessage(
        format!("illegal value for move parameter: {}", hole)
    ))
}

//Decodes a CHANGE message and loads its board snapshot into the
//receiver's mirror board.
pub fn interpret_state_msg(msg: &str, board: &mut Board) -> Result<MoveTurn, ProtocolError> {
    let parts: Vec<&str> = msg.split(';').collect();
    if parts.len() != 4 {
        return Err(ProtocolError::InvalidMessage("missing arguments".to_string()));
    }
    //First argument: the move, or the swap marker
    let played = if parts[1] == "SWAP" {
        None
    } else {
        match parts[1].parse::<usize>() {
            Ok(hole) => Some(hole),
            Err(_) => return Err(ProtocolError::InvalidMessage(
                format!("illegal value for move parameter: {}", parts[1])
            ))
        }
    };
    //Second argument: the board, north row and store first
    let counts: Vec<&str> = parts[2].split(',').collect();
    if counts.len() != 2 * (board.holes() + 1) {
        return Err(ProtocolError::InvalidMessage(format!(
            "board dimensions in message ({} entries) are not as expected ({} entries)",
            counts.len(),
            2 * (board.holes() + 1)
        )));
    }
    let mut seeds = Vec::with_capacity(counts.len());
    for count in counts {
        match count.parse::<u32>() {
            Ok(n) => seeds.push(n),
            Err(_) => return Err(ProtocolError::InvalidMessage(
                format!("illegal value for seed count: {}", count)
            ))
        }
    }
    //Third argument: whose turn
    let (again, end) = match parts[3] {
        "YOU" => (true, false),
        "OPP" => (false, false),
        "END" => (false, true),
        word => return Err(ProtocolError::InvalidMessage(
            format!("illegal value for turn parameter: {}", word)
        ))
    };
    //Every field checked out; only now touch the mirror board
    let holes = board.holes();
    for hole in 1..=holes {
        board.set_seeds(Side::North, hole, seeds[hole - 1]);
    }
    board.set_store(Side::North, seeds[holes]);
    for hole in 1..=holes {
        board.set_seeds(Side::South, hole, seeds[holes + hole]);
    }
    board.set_store(Side::South, seeds[2 * holes + 1]);
    Ok(MoveTurn { played, again, end })
}
