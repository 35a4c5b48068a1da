use kalah::{
    model::{self, Board, Side},
    protocol::{self, MsgType}
};
use rand::seq::SliceRandom;
use std::{
    fmt,
    io::{self, BufRead, Write},
    process
};

//A protocol-complete agent that plays a uniformly random legal hole
//and never swaps. Handy as a smoke-test opponent.

fn fail(error: impl fmt::Display) -> ! {
    eprintln!("Agent error: {}", error);
    process::exit(1);
}

fn send(msg: &str) {
    let mut stdout = io::stdout();
    if writeln!(stdout, "{}", msg).is_err() || stdout.flush().is_err() {
        fail("engine connection broke down");
    }
}

fn random_move(board: &Board, side: Side) -> String {
    let moves = model::legal_moves(board, side);
    match moves.choose(&mut rand::thread_rng()) {
        Some(&hole) => protocol::move_msg(hole),
        None => fail("no legal move available")
    }
}

fn main() {
    let mut board = Board::new(7, 7);
    let mut side: Option<Side> = None;
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(error) => fail(error)
        };
        let msg = line.trim_end();
        match protocol::message_type(msg) {
            Ok(MsgType::End) => break,
            Ok(MsgType::Start) => match protocol::interpret_start_msg(msg) {
                Ok(true) => {
                    side = Some(Side::South);
                    send(&random_move(&board, Side::South));
                },
                Ok(false) => side = Some(Side::North),
                Err(error) => fail(error)
            },
            Ok(MsgType::State) => {
                let mut my_side = match side {
                    Some(side) => side,
                    None => fail("state message before start message")
                };
                let turn = match protocol::interpret_state_msg(msg, &mut board) {
                    Ok(turn) => turn,
                    Err(error) => fail(error)
                };
                if turn.played.is_none() {
                    //The opponent swapped seats
                    my_side = my_side.opposite();
                    side = Some(my_side);
                }
                if turn.again && !turn.end {
                    send(&random_move(&board, my_side));
                }
            },
            Ok(MsgType::Move) | Ok(MsgType::Swap) => {
                fail("unexpected agent-bound message")
            },
            Err(error) => fail(error)
        }
    }
}
