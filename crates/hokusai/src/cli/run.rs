//! Headless scenario runner.

use super::{RunArgs, load_config};
use hokusai::{
    ConsoleHost, FileAssetLoader, HokusaiResult, PersistenceError, ReadHistory, ResourceLedger,
    ScenarioPlayer, TickStatus, build_corpus, load_scripts,
};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{info, instrument, trace, warn};

/// Play a scenario to its end on a fixed frame interval.
///
/// Ctrl-C stops the run. With `--history`, the read history is loaded first
/// and written back afterwards, interrupted or not.
#[instrument(skip_all, fields(label = %args.label, page = args.page))]
pub async fn run_scenario(args: &RunArgs) -> HokusaiResult<()> {
    let config = load_config(args.config.as_deref())?;
    let source = load_scripts(&args.scripts, config.script())?;
    let corpus = build_corpus(&config)?;

    let history = match &args.history {
        Some(path) => Some(Arc::new(Mutex::new(ReadHistory::load(path)?))),
        None => None,
    };

    let mut player = ScenarioPlayer::new(
        ConsoleHost::stdout(args.choices.clone()),
        ResourceLedger::new(FileAssetLoader::new(&args.asset_root)),
        source,
    )
    .with_config(config.player())
    .with_corpus(corpus)
    .with_params(config.params().clone())
    .with_gallery_labels(config.gallery_labels().iter().cloned());
    if let Some(history) = &history {
        player = player.with_read_history(Box::new(Arc::clone(history)));
    }

    player.start(&args.label, args.page, args.gallery.as_deref());

    let frame = Duration::from_millis(*config.player().frame_interval_ms());
    let mut interval = tokio::time::interval(frame);
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let mut frames: u64 = 0;
    loop {
        tokio::select! {
            _ = interval.tick() => {
                frames += 1;
                match player.tick() {
                    TickStatus::Suspended(reason) => trace!(frames, %reason, "Frame"),
                    TickStatus::Halted => break,
                }
            }
            _ = &mut ctrl_c => {
                warn!("Interrupted, stopping");
                player.stop();
                break;
            }
        }
    }

    info!(
        frames,
        state = ?player.state(),
        label = %player.current_label(),
        page = player.current_page(),
        "Run finished"
    );

    if let (Some(path), Some(history)) = (&args.history, &history) {
        let history = history.lock().map_err(|e| {
            PersistenceError::new(
                format!("History lock poisoned: {}", e),
                path.display().to_string(),
            )
        })?;
        history.save(path)?;
        info!(path = %path.display(), "History saved");
    }

    Ok(())
}
