//! Two-phase export progress.
//!
//! An export reports a single percentage in `[0, 100]`:
//!
//! ```text
//! Rasterize   tile k of n done       →  k / n * 50           (Processing)
//! Package     compressor at p%       →  50 + p / 2           (Zipping)
//! Finished    archive finalized      →  100                  (Done)
//! ```
//!
//! Events go out over an `mpsc` channel. The aggregator is a pass-through
//! remap: it does not smooth or reorder what the phases report. A dropped
//! receiver is not an error; the export keeps running and the events are
//! discarded.

use serde::Serialize;
use std::sync::mpsc::Sender;

/// Share of the bar given to rasterization; packaging gets the rest.
const RASTER_SHARE: f64 = 50.0;

/// Which part of the export a progress event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExportStatus {
    /// Tiles are being drawn and encoded.
    Processing,
    /// Encoded tiles are being compressed into the archive.
    Zipping,
    /// The archive is complete. Sent once, with `percent == 100`.
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProgressEvent {
    pub percent: f64,
    pub status: ExportStatus,
}

/// Maps phase-local progress onto the overall percentage and publishes it.
#[derive(Debug)]
pub struct ProgressAggregator {
    total_tiles: usize,
    sender: Option<Sender<ProgressEvent>>,
}

impl ProgressAggregator {
    pub fn new(total_tiles: usize, sender: Option<Sender<ProgressEvent>>) -> Self {
        Self {
            total_tiles,
            sender,
        }
    }

    /// Phase 1 checkpoint: `processed` tiles are drawn and encoded.
    pub fn tile_done(&self, processed: usize) {
        self.publish(
            raster_percent(processed, self.total_tiles),
            ExportStatus::Processing,
        );
    }

    /// Phase 2 checkpoint: the packager's own progress, 0–100.
    pub fn compressor(&self, compressor_percent: f64) {
        self.publish(package_percent(compressor_percent), ExportStatus::Zipping);
    }

    /// Terminal checkpoint, only called once the archive exists.
    pub fn finished(&self) {
        self.publish(100.0, ExportStatus::Done);
    }

    fn publish(&self, percent: f64, status: ExportStatus) {
        if let Some(tx) = &self.sender {
            // Receiver gone means the host stopped listening; keep going.
            let _ = tx.send(ProgressEvent { percent, status });
        }
    }
}

/// Overall percentage after `processed` of `total` tiles.
pub fn raster_percent(processed: usize, total: usize) -> f64 {
    if total == 0 {
        return RASTER_SHARE;
    }
    (processed as f64 / total as f64) * RASTER_SHARE
}

/// Overall percentage for a packaging-phase percentage.
pub fn package_percent(compressor_percent: f64) -> f64 {
    RASTER_SHARE + compressor_percent.clamp(0.0, 100.0) / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn raster_phase_fills_first_half() {
        assert_eq!(raster_percent(0, 24), 0.0);
        assert_eq!(raster_percent(12, 24), 25.0);
        assert_eq!(raster_percent(24, 24), 50.0);
    }

    #[test]
    fn package_phase_fills_second_half() {
        assert_eq!(package_percent(0.0), 50.0);
        assert_eq!(package_percent(50.0), 75.0);
        assert_eq!(package_percent(100.0), 100.0);
    }

    #[test]
    fn package_percent_stays_in_range() {
        assert_eq!(package_percent(-5.0), 50.0);
        assert_eq!(package_percent(140.0), 100.0);
    }

    #[test]
    fn aggregator_publishes_in_order() {
        let (tx, rx) = mpsc::channel();
        let progress = ProgressAggregator::new(2, Some(tx));
        progress.tile_done(1);
        progress.tile_done(2);
        progress.compressor(40.0);
        progress.finished();

        let events: Vec<ProgressEvent> = rx.try_iter().collect();
        assert_eq!(
            events,
            vec![
                ProgressEvent {
                    percent: 25.0,
                    status: ExportStatus::Processing
                },
                ProgressEvent {
                    percent: 50.0,
                    status: ExportStatus::Processing
                },
                ProgressEvent {
                    percent: 70.0,
                    status: ExportStatus::Zipping
                },
                ProgressEvent {
                    percent: 100.0,
                    status: ExportStatus::Done
                },
            ]
        );
    }

    #[test]
    fn aggregator_survives_dropped_receiver() {
        let (tx, rx) = mpsc::channel();
        drop(rx);
        let progress = ProgressAggregator::new(4, Some(tx));
        progress.tile_done(1);
        progress.finished();
    }

    #[test]
    fn aggregator_without_sender_is_silent() {
        let progress = ProgressAggregator::new(4, None);
        progress.tile_done(4);
        progress.compressor(100.0);
    }
}
