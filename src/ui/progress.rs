use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

const PUBLISH_TEMPLATE: &str =
    "{msg:16} [{bar:30.cyan/blue}] {pos}/{len} buffers ({elapsed})";

/// One progress bar per publishing channel, shareable across the worker
/// threads.
#[derive(Clone)]
pub struct ProgressManager {
    mp: MultiProgress,
    bars: Arc<Mutex<HashMap<u16, ProgressBar>>>,
}

impl ProgressManager {
    pub fn new() -> Self {
        Self {
            mp: MultiProgress::new(),
            bars: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Add a bar for `channel` with `total` expected buffers.
    pub fn create_bar(&self, channel: u16, total: u64, message: &str) -> Result<(), String> {
        let mut bars = self
            .bars
            .lock()
            .map_err(|e| format!("Lock error: {}", e))?;

        if bars.contains_key(&channel) {
            return Err(format!("Progress bar for channel {} already exists", channel));
        }

        let pb = self.mp.add(ProgressBar::new(total));
        pb.set_style(
            ProgressStyle::default_bar()
                .template(PUBLISH_TEMPLATE)
                .unwrap()
                .progress_chars("█▉▊▋▌▍▎▏ "),
        );
        pb.set_message(message.to_string());

        bars.insert(channel, pb);
        Ok(())
    }

    pub fn set_position(&self, channel: u16, pos: u64) -> Result<(), String> {
        let bars = self
            .bars
            .lock()
            .map_err(|e| format!("Lock error: {}", e))?;
        if let Some(pb) = bars.get(&channel) {
            pb.set_position(pos);
            Ok(())
        } else {
            Err(format!("No progress bar for channel {}", channel))
        }
    }

    pub fn finish_all(&self) {
        if let Ok(mut bars) = self.bars.lock() {
            for (_, pb) in bars.drain() {
                pb.finish();
            }
        }
    }
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new()
    }
}
