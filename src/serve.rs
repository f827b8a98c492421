//! Event loop: newline-delimited JSON envelopes on stdin, one task per event.

use nudge_core::message::InboundEnvelope;
use nudge_poke::PokeResponder;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

/// Decode one input line. Blank and malformed lines yield `None`.
pub fn parse_line(line: &str) -> Option<InboundEnvelope> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    match serde_json::from_str::<InboundEnvelope>(line) {
        Ok(envelope) => Some(envelope),
        Err(e) => {
            warn!("serve: skipping undecodable event line: {e}");
            None
        }
    }
}

/// Run until stdin closes or Ctrl-C, then wait for in-flight events.
pub async fn run(responder: Arc<PokeResponder>) -> anyhow::Result<()> {
    info!("Nudge listening for events on stdin");
    let handled = serve_events(responder, BufReader::new(tokio::io::stdin())).await;
    info!("serve: handled {handled} event(s)");
    Ok(())
}

/// Dispatch one task per decodable line of `reader`. Returns the number of
/// events dispatched once the input ends and every task has finished.
pub async fn serve_events<R>(responder: Arc<PokeResponder>, mut reader: R) -> usize
where
    R: AsyncBufRead + Unpin,
{
    let mut tasks = JoinSet::new();
    let mut buf = Vec::new();
    let mut dispatched = 0;

    loop {
        tokio::select! {
            read = reader.read_until(b'\n', &mut buf) => {
                match read {
                    Ok(0) => {
                        info!("serve: input closed");
                        break;
                    }
                    Ok(_) => {}
                    Err(e) => {
                        error!("serve: input read failed: {e}");
                        break;
                    }
                }
                let line = match std::str::from_utf8(&buf) {
                    Ok(line) => parse_line(line),
                    Err(e) => {
                        warn!("serve: skipping non UTF-8 event line: {e}");
                        None
                    }
                };
                buf.clear();
                let Some(envelope) = line else {
                    continue;
                };
                dispatched += 1;
                let responder = responder.clone();
                tasks.spawn(async move {
                    let outcome = responder.handle(&envelope).await;
                    if outcome.is_success() {
                        debug!("serve: [{}] {}", envelope.stream_id, outcome.message());
                    } else {
                        warn!("serve: [{}] {}", envelope.stream_id, outcome.message());
                    }
                });
            }
            Some(done) = tasks.join_next(), if !tasks.is_empty() => {
                if let Err(e) = done {
                    warn!("serve: event task panicked: {e}");
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Received shutdown signal");
                break;
            }
        }
    }

    // In-flight events finish; no cancellation mid-pipeline.
    while let Some(done) = tasks.join_next().await {
        if let Err(e) = done {
            warn!("serve: event task panicked: {e}");
        }
    }
    dispatched
}
