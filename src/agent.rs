use kalah::{
    model::{Board, Side},
    protocol::{self, MsgType},
    search::{self, Choice, SearchConfig}
};
use std::{
    env,
    fmt,
    fs,
    io::{self, BufRead, Write},
    process
};

//The minimax reference agent. Single-threaded: it reads one protocol
//line from stdin, mirrors the engine's board, and answers on stdout.
//Any protocol failure on its own input is a defect, fatal to the
//process.

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

//Runs the search and encodes the reply; reports whether the reply was
//a swap so the caller can flip its seat.
fn choose(board: &Board, side: Side, swap_used: bool, config: &SearchConfig) -> (String, bool) {
    match search::decide(board, side, config.depth, swap_used, &config.weights) {
        Choice::Hole(hole) => (protocol::move_msg(hole), false),
        Choice::Swap => (protocol::swap_msg(), true),
        Choice::None => fail("no move available")
    }
}

fn load_config() -> SearchConfig {
    match env::args().nth(1) {
        None => SearchConfig::default(),
        Some(path) => {
            let contents = match fs::read_to_string(&path) {
                Ok(contents) => contents,
                Err(error) => fail(format!("cannot read {}: {}", path, error))
            };
            match serde_json::from_str(&contents) {
                Ok(config) => config,
                Err(error) => fail(format!("cannot parse {}: {}", path, error))
            }
        }
    }
}

fn main() {
    let config = load_config();
    let mut board = Board::new(7, 7);
    let mut side: Option<Side> = None;
    let mut swap_used = false;
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(error) => fail(error)
        };
        let msg = line.trim_end();
        let msg_type = match protocol::message_type(msg) {
            Ok(msg_type) => msg_type,
            Err(error) => fail(error)
        };
        match msg_type {
            MsgType::End => break,
            MsgType::Start => {
                match protocol::interpret_start_msg(msg) {
                    //South opens the match
                    Ok(true) => {
                        side = Some(Side::South);
                        let (reply, swapped) = choose(&board, Side::South, swap_used, &config);
                        if swapped {
                            side = Some(Side::North);
                            swap_used = true;
                        }
                        send(&reply);
                    },
                    Ok(false) => side = Some(Side::North),
                    Err(error) => fail(error)
                }
            },
            MsgType::State => {
                let mut my_side = match side {
                    Some(side) => side,
                    None => fail("state message before start message")
                };
                let turn = match protocol::interpret_state_msg(msg, &mut board) {
                    Ok(turn) => turn,
                    Err(error) => fail(error)
                };
                if turn.played.is_none() {
                    //The opponent invoked the pie rule
                    my_side = my_side.opposite();
                    side = Some(my_side);
                    swap_used = true;
                }
                if turn.again && !turn.end {
                    let (reply, swapped) = choose(&board, my_side, swap_used, &config);
                    if swapped {
                        side = Some(my_side.opposite());
                        swap_used = true;
                    }
                    send(&reply);
                }
            },
            //MOVE and SWAP travel the other way
            MsgType::Move | MsgType::Swap => fail("unexpected agent-bound message")
        }
    }
}
