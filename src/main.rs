use kalah::engine;
use std::{env, process};

const USAGE: &str = "\
There have to be exactly two arguments, each being the path to an
executable agent application. The two agents are started and play a
Kalah match against each other, the first agent being the starting
player.

The output to standard output will consist of exactly two lines, one
per agent, where the first line is for the first agent and the second
for the second. Each line has the format
   ( \"0\" | \"1\" )   \" \"   <RESPONSETIME>
where the first number is 1 if the agent won the game (0 for both in
case of a draw) and <RESPONSETIME> gives the agent's average response
time in milliseconds.";

#[tokio::main]
async fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() != 3 {
        eprintln!("{}", USAGE);
        process::exit(1);
    }
    let outcome = match engine::run(&args[1], &args[2]).await {
        Ok(outcome) => outcome,
        Err(error) => {
            eprintln!("Couldn't run the agents: {}", error);
            process::exit(1);
        }
    };
    //Human-readable summary on stderr
    eprintln!();
    match outcome.winner {
        Some(number) => {
            let standing = &outcome.standings[number as usize - 1];
            eprintln!("WINNER: Player {} ({})", standing.number, standing.name);
        },
        None => eprintln!("DRAW")
    }
    if outcome.aborted.is_some() {
        eprintln!("MATCH WAS ABORTED");
    } else {
        eprintln!("SCORE: {}", outcome.score);
    }
    for standing in &outcome.standings {
        eprintln!(
            "Player {} ({}): {} moves, {} milliseconds per move",
            standing.number, standing.name,
            standing.moves, standing.avg_response_millis
        );
    }
    eprintln!();
    //Machine-readable result lines on stdout, in launch order
    for standing in &outcome.standings {
        println!(
            "{} {}",
            if standing.won { 1 } else { 0 },
            standing.avg_response_millis
        );
    }
}
