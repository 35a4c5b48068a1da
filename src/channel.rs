use std::{error, fmt, time::Duration};
use tokio::{
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader},
    process::Child,
    sync::mpsc,
    task::JoinHandle,
    time
};

const QUEUE_DEPTH: usize = 32;

pub enum LinkError {
    //The receive allowance ran out before a line arrived
    Timeout,
    //The agent's stream is closed or broken
    Closed
}

impl fmt::Display for LinkError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "Agent timed out"),
            Self::Closed => write!(f, "Agent stream closed")
        }
    }
}

impl fmt::Debug for LinkError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "Agent timed out"),
            Self::Closed => write!(f, "Agent stream closed")
        }
    }
}

impl error::Error for LinkError {}

//One agent's side of the line protocol. A reader task pulls completed
//lines from the agent into a bounded queue so the engine's timeout
//accounting never blocks on a slow or dead process; a writer task
//drains outbound messages into the agent's stdin, appending the line
//terminator. Dropping the link (or calling shutdown) stops both tasks.
pub struct AgentLink {
    outbound: mpsc::Sender<String>,
    inbound: mpsc::Receiver<String>,
    tasks: Vec<JoinHandle<()>>
}

impl AgentLink {
    //Bridges a spawned agent process. The child must have been created
    //with piped stdin and stdout.
    pub fn from_child(child: &mut Child) -> AgentLink {
        let stdout = child.stdout.take().expect("Agent stdout not piped");
        let mut stdin = child.stdin.take().expect("Agent stdin not piped");
        let (line_sender, inbound) = mpsc::channel(QUEUE_DEPTH);
        let reader = tokio::spawn(async move {
            let mut lines = BufReader::new(stdout).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                if line_sender.send(line).await.is_err() {
                    break
                }
            }
        });
        let (outbound, mut receiver) = mpsc::channel::<String>(QUEUE_DEPTH);
        let writer = tokio::spawn(async move {
            while let Some(msg) = receiver.recv().await {
                if stdin.write_all(msg.as_bytes()).await.is_err() {
                    break
                }
                if stdin.flush().await.is_err() {
                    break
                }
            }
        });
        AgentLink {
            outbound,
            inbound,
            tasks: vec![reader, writer]
        }
    }

    //An in-memory link with no process behind it. Returns the link and
    //the far ends: what the engine sends arrives on the returned
    //receiver, and lines pushed into the returned sender arrive at the
    //engine. Lets tests stand in for an agent without spawning one.
    pub fn pair() -> (AgentLink, mpsc::Sender<String>, mpsc::Receiver<String>) {
        let (line_sender, inbound) = mpsc::channel(QUEUE_DEPTH);
        let (outbound, receiver) = mpsc::channel(QUEUE_DEPTH);
        let link = AgentLink {
            outbound,
            inbound,
            tasks: Vec::new()
        };
        (link, line_sender, receiver)
    }

    pub async fn send(&self, msg: &str) -> Result<(), LinkError> {
        self.outbound.send(format!("{}\n", msg)).await
            .map_err(|_| LinkError::Closed)
    }

    //Waits up to `budget` for the next line from the agent. Timeout and
    //end-of-stream are distinct failures; the caller decides which is
    //match-fatal for whom.
    pub async fn recv(&mut self, budget: Duration) -> Result<String, LinkError> {
        match time::timeout(budget, self.inbound.recv()).await {
            Err(_) => Err(LinkError::Timeout),
            Ok(None) => Err(LinkError::Closed),
            Ok(Some(line)) => Ok(line)
        }
    }

    //Stops the bridge tasks. They exit on their own when the queues
    //close; aborting just keeps teardown from waiting on a reader stuck
    //in a blocking read against a wedged process.
    pub fn shutdown(&mut self) {
        for task in self.tasks.drain(..) {
            task.abort();
        }
    }
}

impl Drop for AgentLink {
    fn drop(&mut self) {
        self.shutdown();
    }
}
