//! Live console: stream a server's output until Ctrl-C or the daemon hangs up.

use owo_colors::OwoColorize;
use tokio::sync::broadcast::error::RecvError;

use ptero_api::{ChannelEvent, ChannelListeners, PteroClient};

use crate::cli::{ConsoleArgs, GlobalOpts};
use crate::error::CliError;
use crate::output;

fn listeners(show_stats: bool, color: bool) -> ChannelListeners {
    ChannelListeners::default()
        .on_console_output(|line| println!("{line}"))
        .on_install_output(move |line| {
            if color {
                println!("{}", line.dimmed());
            } else {
                println!("{line}");
            }
        })
        .on_daemon_message(move |message| {
            if color {
                eprintln!("{} {message}", "[daemon]".cyan());
            } else {
                eprintln!("[daemon] {message}");
            }
        })
        .on_status(move |state| eprintln!("[status] {}", output::power_state(*state, color)))
        .on_stats(move |stats| {
            if show_stats {
                eprintln!(
                    "[stats] cpu {:.1}% | mem {} / {} | disk {}",
                    stats.cpu_absolute,
                    output::bytes(stats.memory_bytes),
                    output::bytes(stats.memory_limit_bytes),
                    output::bytes(stats.disk_bytes),
                );
            }
        })
        .on_token_expiring(|| tracing::debug!("console token expiring, renewing"))
        .on_error(|err| eprintln!("[error] {err}"))
}

pub async fn handle(
    client: &PteroClient,
    args: ConsoleArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let color = output::should_color(global.color);
    let channel = client
        .websocket()
        .connect(&args.server, listeners(args.stats, color))
        .await?;
    let mut events = channel.subscribe();

    channel.wait_until_authenticated().await?;
    output::notice(
        &format!("Attached to {} (Ctrl-C to detach)", args.server),
        global.quiet,
    );
    channel.request_logs().await?;
    if args.stats {
        channel.request_stats().await?;
    }
    if let Some(ref command) = args.command {
        channel.send_command(command).await?;
    }

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = &mut ctrl_c => {
                channel.close().await;
                return Ok(());
            }
            event = events.recv() => match event {
                Ok(event) => {
                    if let ChannelEvent::Closed(reason) = event.as_ref() {
                        if reason.by_client || reason.code == Some(1000) {
                            return Ok(());
                        }
                        return Err(CliError::ConsoleClosed {
                            reason: reason.to_string(),
                        });
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "console output lagged; frames dropped");
                }
                Err(RecvError::Closed) => return Ok(()),
            }
        }
    }
}
