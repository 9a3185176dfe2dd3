use log::{error, info, warn};
use quizview::{Command, Config, ViewSync};
use tokio::{
    io::{self, AsyncBufReadExt, BufReader},
    runtime::Runtime,
    sync::mpsc,
};

/// Forwards each line typed on standard input as a command.
async fn read_commands(tx: mpsc::Sender<Command>) {
    let mut lines = BufReader::new(io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(err) => {
                error!("cannot read commands: {err}");
                break;
            }
        };

        if line.trim().is_empty() {
            continue;
        }

        match line.parse() {
            Ok(command) => {
                if tx.send(command).await.is_err() {
                    break;
                }
            }
            Err(err) => warn!("{err} Ignoring `{line}`."),
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    // Parse environment variables
    let config = Config::from_env()?;
    let client = api::Client::new(&config.server, config.session.as_deref())?;
    info!("syncing quiz {} from {} into {}", config.quiz, config.server, config.output.display());

    // Run the sync loop until interrupted
    let runtime = Runtime::new()?;
    runtime.block_on(async move {
        let sync = ViewSync::new(client, config.quiz, config.interval);
        let (tx, rx) = mpsc::channel(16);
        tokio::spawn(read_commands(tx));

        let output = config.output;
        let publish = move |document: &view::Node| {
            if let Err(err) = std::fs::write(&output, document.to_string()) {
                error!("cannot write {}: {err}", output.display());
            }
        };

        tokio::select! {
            _ = quizview::run(sync, rx, publish) => info!("sync loop finished"),
            result = tokio::signal::ctrl_c() => {
                result?;
                info!("interrupted");
            }
        }
        anyhow::Ok(())
    })
}
