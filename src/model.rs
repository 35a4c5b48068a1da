use std::fmt;

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Side {
    North,
    South
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::North => Side::South,
            Side::South => Side::North
        }
    }
    fn row(self) -> usize {
        match self {
            Side::North => 0,
            Side::South => 1
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Side::North => write!(f, "North"),
            Side::South => write!(f, "South")
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Move {
    pub side: Side,
    pub hole: usize
}

//Each row holds the store at slot 0 followed by the holes 1..=holes
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Board {
    holes: usize,
    rows: [Vec<u32>; 2]
}

impl Board {
    pub fn new(holes: usize, seeds: u32) -> Board {
        assert!(holes >= 1);
        let mut row = vec![seeds; holes + 1];
        row[0] = 0;
        Board {
            holes,
            rows: [row.clone(), row]
        }
    }
    pub fn holes(&self) -> usize {
        self.holes
    }
    pub fn seeds(&self, side: Side, hole: usize) -> u32 {
        debug_assert!(hole >= 1 && hole <= self.holes);
        self.rows[side.row()][hole]
    }
    pub fn set_seeds(&mut self, side: Side, hole: usize, seeds: u32) {
        debug_assert!(hole >= 1 && hole <= self.holes);
        self.rows[side.row()][hole] = seeds;
    }
    pub fn add_seeds(&mut self, side: Side, hole: usize, seeds: u32) {
        debug_assert!(hole >= 1 && hole <= self.holes);
        self.rows[side.row()][hole] += seeds;
    }
    //The hole directly across the board from (side, hole)
    pub fn seeds_op(&self, side: Side, hole: usize) -> u32 {
        self.seeds(side.opposite(), self.holes + 1 - hole)
    }
    pub fn set_seeds_op(&mut self, side: Side, hole: usize, seeds: u32) {
        self.set_seeds(side.opposite(), self.holes + 1 - hole, seeds);
    }
    pub fn store(&self, side: Side) -> u32 {
        self.rows[side.row()][0]
    }
    pub fn set_store(&mut self, side: Side, seeds: u32) {
        self.rows[side.row()][0] = seeds;
    }
    pub fn add_to_store(&mut self, side: Side, seeds: u32) {
        self.rows[side.row()][0] += seeds;
    }
    pub fn row_seeds(&self, side: Side) -> u32 {
        self.rows[side.row()][1..].iter().sum()
    }
    pub fn total_seeds(&self) -> u32 {
        self.rows[0].iter().sum::<u32>() + self.rows[1].iter().sum::<u32>()
    }
}

pub fn is_legal_move(board: &Board, mov: Move) -> bool {
    mov.hole >= 1
        && mov.hole <= board.holes()
        && board.seeds(mov.side, mov.hole) != 0
}

//Sows the seeds of the chosen hole counter-clockwise, skipping the
//opponent's store, then applies the capture rule. Returns the side
//that moves next: the mover again if the last seed landed in its own
//store, the opponent otherwise. Remaining seeds are NOT swept into
//the stores when this move ends the game; see collect_remaining.
pub fn make_move(board: &mut Board, mov: Move) -> Side {
    let holes = board.holes();
    let seeds = board.seeds(mov.side, mov.hole);
    board.set_seeds(mov.side, mov.hole, 0);
    //Full laps deposit one seed in every receiving pit
    let receiving = 2 * holes as u32 + 1;
    let laps = seeds / receiving;
    let mut extra = seeds % receiving;
    if laps != 0 {
        for hole in 1..=holes {
            board.add_seeds(Side::North, hole, laps);
            board.add_seeds(Side::South, hole, laps);
        }
        board.add_to_store(mov.side, laps);
    }
    //Last partial lap; hole 0 stands for the mover's store
    let mut sow_side = mov.side;
    let mut sow_hole = mov.hole;
    while extra > 0 {
        sow_hole += 1;
        if sow_hole == 1 {
            //Previous pit was the store
            sow_side = sow_side.opposite();
        }
        if sow_hole > holes {
            if sow_side == mov.side {
                sow_hole = 0;
                board.add_to_store(sow_side, 1);
                extra -= 1;
                continue;
            } else {
                sow_side = sow_side.opposite();
                sow_hole = 1;
            }
        }
        board.add_seeds(sow_side, sow_hole, 1);
        extra -= 1;
    }
    //Capture: last seed into a previously-empty own hole while the
    //opposite hole is occupied
    if sow_side == mov.side
        && sow_hole > 0
        && board.seeds(sow_side, sow_hole) == 1
        && board.seeds_op(sow_side, sow_hole) > 0 {
        let captured = 1 + board.seeds_op(mov.side, sow_hole);
        board.add_to_store(mov.side, captured);
        board.set_seeds(mov.side, sow_hole, 0);
        board.set_seeds_op(mov.side, sow_hole, 0);
    }
    if sow_hole == 0 {
        mov.side
    } else {
        mov.side.opposite()
    }
}

pub fn holes_empty(board: &Board, side: Side) -> bool {
    board.row_seeds(side) == 0
}

pub fn game_over(board: &Board) -> bool {
    holes_empty(board, Side::North) || holes_empty(board, Side::South)
}

//Final sweep once the game is over: every seed still sitting in a row
//moves into that row's own store.
pub fn collect_remaining(board: &mut Board) {
    for side in [Side::North, Side::South] {
        let seeds = board.row_seeds(side);
        for hole in 1..=board.holes() {
            board.set_seeds(side, hole, 0);
        }
        board.add_to_store(side, seeds);
    }
}

pub fn legal_moves(board: &Board, side: Side) -> Vec<usize> {
    (1..=board.holes())
        .filter(|&hole| is_legal_move(board, Move { side, hole }))
        .collect()
}
