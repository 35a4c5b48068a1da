use crate::{
    channel::{AgentLink, LinkError},
    model::Side,
    timer::Timer
};
use std::time::Duration;

//One seat in a match: the agent behind it, which side it currently
//plays (swappable), and its timing record. The player number reflects
//launch order and never changes, unlike the side.
pub struct Player {
    pub name: String,
    pub number: u32,
    pub side: Side,
    pub move_count: u32,
    link: AgentLink,
    timer: Timer
}

impl Player {
    pub fn new(number: u32, name: String, side: Side, link: AgentLink, allowance: Duration) -> Player {
        Player {
            name,
            number,
            side,
            move_count: 0,
            link,
            timer: Timer::new(allowance)
        }
    }

    pub fn change_side(&mut self) {
        self.side = self.side.opposite();
    }

    pub async fn send(&self, msg: &str) -> Result<(), LinkError> {
        self.link.send(msg).await
    }

    //Reads the player's next reply against its remaining allowance.
    //The clock runs only for the duration of the wait; each successful
    //reply counts as one move.
    pub async fn recv(&mut self) -> Result<String, LinkError> {
        let budget = self.timer.time();
        self.timer.resume();
        let result = self.link.recv(budget).await;
        self.timer.pause();
        if result.is_ok() {
            self.move_count += 1;
        }
        result
    }

    pub fn response_time(&self) -> Duration {
        self.timer.spent()
    }

    pub fn timer_expired(&self) -> bool {
        self.timer.expired()
    }

    pub fn average_response_millis(&self) -> u128 {
        if self.move_count == 0 {
            0
        } else {
            self.timer.spent().as_millis() / self.move_count as u128
        }
    }

    pub fn shutdown(&mut self) {
        self.link.shutdown();
    }
}
