use clap::Parser;
use client::input::{self, InputLine, UserCommand};
use client::network::Client;
use client::rendering::render_event;
use client::transport::{TcpTransport, Transport};
use log::{error, info};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Server address to connect to
    #[arg(short = 's', long, default_value = "127.0.0.1:12345")]
    server: String,
}

/// Reads terminal lines into commands until stdin closes or the player quits.
fn spawn_stdin_reader(commands: mpsc::UnboundedSender<UserCommand>) {
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        while let Ok(Some(line)) = lines.next_line().await {
            match input::parse_line(&line) {
                Ok(InputLine::Command(command)) => {
                    let quit = command == UserCommand::Quit;
                    if commands.send(command).is_err() || quit {
                        break;
                    }
                }
                Ok(InputLine::Help) => println!("{}", input::HELP),
                Ok(InputLine::Blank) => {}
                Err(e) => println!("{}", e),
            }
        }
    });
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    if std::env::var("RUST_LOG").is_err() {
        eprintln!("Set RUST_LOG=info for detailed logging");
    }

    let args = Args::parse();

    info!("Connecting to: {}", args.server);
    let transport = match TcpTransport::connect(&args.server).await {
        Ok(transport) => transport,
        Err(e) => {
            error!("Failed to connect to {}: {}", args.server, e);
            return Err(e.into());
        }
    };
    println!("Conectado a {}. Aguardando oponente...", args.server);
    println!("{}", input::HELP);

    let (events_tx, mut events_rx) = mpsc::unbounded_channel();
    let (commands_tx, commands_rx) = mpsc::unbounded_channel();

    let printer = tokio::spawn(async move {
        while let Some(event) = events_rx.recv().await {
            println!("{}", render_event(&event));
        }
    });
    spawn_stdin_reader(commands_tx);

    let mut client = Client::new(transport, events_tx);
    client.run(commands_rx).await;
    drop(client);

    let _ = printer.await;

    // A blocked stdin read would otherwise keep the runtime from shutting down.
    std::process::exit(0);
}
