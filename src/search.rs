use crate::model::{self, Board, Move, Side};
use serde::{Serialize, Deserialize};

pub const DEFAULT_DEPTH: u32 = 12;
//Added to a candidate's one-ply score when it would grant the mover
//another turn; ordering only, never part of a returned value
const EXTRA_TURN_ORDERING_BONUS: f64 = 10.0;

//Hand-tuned evaluation weights. The defaults are the tournament
//values; a config file can override any subset of them.
#[derive(Copy, Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Weights {
    pub own_store: f64,
    pub opp_store: f64,
    pub own_row: f64,
    pub opp_row: f64,
    pub own_occupied: f64,
    pub own_leftmost: f64,
    pub tempo: f64
}

impl Default for Weights {
    fn default() -> Weights {
        Weights {
            own_store: 1.0,
            opp_store: 0.57,
            own_row: 0.19,
            opp_row: 0.0,
            own_occupied: 0.37,
            own_leftmost: 0.20,
            tempo: 5.0
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub depth: u32,
    pub weights: Weights
}

impl Default for SearchConfig {
    fn default() -> SearchConfig {
        SearchConfig {
            depth: DEFAULT_DEPTH,
            weights: Weights::default()
        }
    }
}

//What the search settled on: a hole to sow, the swap, or nothing at
//all (terminal node).
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Choice {
    None,
    Hole(usize),
    Swap
}

//Static position value from my_side's perspective; the tempo bonus
//applies when my_side also holds the move.
pub fn evaluate(board: &Board, my_side: Side, play_side: Side, weights: &Weights) -> f64 {
    let opp_side = my_side.opposite();
    let occupied = (1..=board.holes())
        .filter(|&hole| board.seeds(my_side, hole) != 0)
        .count();
    let mut value = board.store(my_side) as f64 * weights.own_store
        - board.store(opp_side) as f64 * weights.opp_store
        + board.row_seeds(my_side) as f64 * weights.own_row
        - board.row_seeds(opp_side) as f64 * weights.opp_row
        + occupied as f64 * weights.own_occupied
        + board.seeds(my_side, 1) as f64 * weights.own_leftmost;
    if play_side == my_side {
        value += weights.tempo;
    }
    value
}

//Depth-limited minimax with alpha-beta pruning. play_side is on the
//move; the value is always from my_side's perspective. Candidates are
//ordered by a one-ply lookahead so the likely-best (for the maximizer)
//or likely-worst lines are searched first. When the position is the
//swap decision point and the swap is still unused in this line, the
//swap is tried after the ordinary moves under the same window, with
//the two roles exchanged in the subtree.
pub fn minimax(
    board: &Board,
    my_side: Side,
    play_side: Side,
    depth: u32,
    mut alpha: f64,
    mut beta: f64,
    swap_used: bool,
    weights: &Weights
) -> (f64, Choice) {
    if depth == 0 || model::game_over(board) {
        return (evaluate(board, my_side, play_side, weights), Choice::None);
    }
    //Pre-score every candidate one ply ahead
    let mut ordered: Vec<(f64, usize)> = (1..=board.holes()).map(|hole| {
        let mov = Move { side: play_side, hole };
        let mut value = 0.0;
        if model::is_legal_move(board, mov) {
            let mut next_board = board.clone();
            let next = model::make_move(&mut next_board, mov);
            value = evaluate(&next_board, my_side, next, weights);
            if next == play_side {
                value += EXTRA_TURN_ORDERING_BONUS;
            }
        }
        (value, hole)
    }).collect();
    ordered.sort_by(|a, b| b.0.total_cmp(&a.0));
    //Both stores empty means the match's first move is being chosen;
    //its extra turn is suppressed so the swap decision follows it
    let first_move = board.store(Side::North) + board.store(Side::South) == 0;
    let swap_available = board.store(Side::South) == 1
        && board.store(Side::North) == 0
        && !swap_used;
    if play_side == my_side {
        let mut best = f64::NEG_INFINITY;
        let mut choice = Choice::None;
        for &(_, hole) in &ordered {
            let mov = Move { side: play_side, hole };
            if !model::is_legal_move(board, mov) {
                continue;
            }
            let mut next_board = board.clone();
            let mut next = model::make_move(&mut next_board, mov);
            if first_move {
                next = play_side.opposite();
            }
            let (value, _) = minimax(
                &next_board, my_side, next, depth - 1, alpha, beta, swap_used, weights
            );
            if value > best {
                best = value;
                choice = Choice::Hole(hole);
            }
            if value > alpha {
                alpha = value;
            }
            if beta <= alpha {
                break;
            }
        }
        if swap_available && alpha < beta {
            let (value, _) = minimax(
                board, my_side.opposite(), play_side, depth - 1, alpha, beta, true, weights
            );
            if value > best {
                best = value;
                choice = Choice::Swap;
            }
        }
        (best, choice)
    } else {
        let mut best = f64::INFINITY;
        let mut choice = Choice::None;
        //Worst one-ply candidates first for the minimizer
        for &(_, hole) in ordered.iter().rev() {
            let mov = Move { side: play_side, hole };
            if !model::is_legal_move(board, mov) {
                continue;
            }
            let mut next_board = board.clone();
            let mut next = model::make_move(&mut next_board, mov);
            if first_move {
                next = play_side.opposite();
            }
            let (value, _) = minimax(
                &next_board, my_side, next, depth - 1, alpha, beta, swap_used, weights
            );
            if value < best {
                best = value;
                choice = Choice::Hole(hole);
            }
            if value < beta {
                beta = value;
            }
            if beta <= alpha {
                break;
            }
        }
        if swap_available && alpha < beta {
            let (value, _) = minimax(
                board, my_side.opposite(), play_side, depth - 1, alpha, beta, true, weights
            );
            if value < best {
                best = value;
                choice = Choice::Swap;
            }
        }
        (best, choice)
    }
}

//Root call: pick play_side's reply from my_side's point of view.
pub fn decide(board: &Board, my_side: Side, depth: u32, swap_used: bool, weights: &Weights) -> Choice {
    minimax(
        board, my_side, my_side, depth,
        f64::NEG_INFINITY, f64::INFINITY,
        swap_used, weights
    ).1
}
