//! Wave scheduling.
//!
//! The sequencer walks the level's wave list strictly in order:
//! a countdown before each wave, a spawning phase that drains the
//! flattened group queue, an active phase that waits for the field to
//! clear, then either the next countdown or completion. It never
//! creates enemies itself; [`update`](WaveSequencer::update) yields the
//! kind names due this tick and the simulation does the spawning.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::content::WaveData;

/// Countdown before each wave, including the first.
pub const WAVE_DELAY: f32 = 5.0;

/// Sequencer phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WavePhase {
    /// Counting down to the next wave.
    Waiting,
    /// Draining the current wave's spawn queue.
    Spawning,
    /// All spawned; waiting for the field to clear.
    Active,
    /// Every wave has been spawned and cleared.
    Complete,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SpawnEntry {
    kind: String,
    delay: f32,
}

/// Drives the level's wave schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaveSequencer {
    waves: Vec<WaveData>,
    phase: WavePhase,
    /// 1-based index of the wave in progress; 0 before the first starts.
    current_wave: u32,
    /// Countdown in `Waiting`, time to the next spawn in `Spawning`.
    timer: f32,
    queue: VecDeque<SpawnEntry>,
}

impl WaveSequencer {
    /// Create a sequencer for a wave schedule. Starts in the initial
    /// countdown; an empty schedule completes immediately.
    #[must_use]
    pub fn new(waves: Vec<WaveData>) -> Self {
        let phase = if waves.is_empty() {
            WavePhase::Complete
        } else {
            WavePhase::Waiting
        };
        Self {
            waves,
            phase,
            current_wave: 0,
            timer: WAVE_DELAY,
            queue: VecDeque::new(),
        }
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> WavePhase {
        self.phase
    }

    /// 1-based wave number in progress, 0 before the first wave.
    #[must_use]
    pub const fn current_wave(&self) -> u32 {
        self.current_wave
    }

    /// Total waves in the schedule.
    #[must_use]
    pub fn total_waves(&self) -> u32 {
        self.waves.len() as u32
    }

    /// Seconds left on the countdown, 0 outside `Waiting`.
    #[must_use]
    pub fn countdown(&self) -> f32 {
        if self.phase == WavePhase::Waiting {
            self.timer.max(0.0)
        } else {
            0.0
        }
    }

    /// Whether every wave has been spawned and cleared.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.phase == WavePhase::Complete
    }

    /// Cut the countdown short. A no-op outside `Waiting`.
    pub fn skip_countdown(&mut self) {
        if self.phase == WavePhase::Waiting {
            self.timer = 0.0;
        }
    }

    /// Advance the schedule by `dt` seconds. `field_clear` tells the
    /// sequencer whether any enemies remain alive. Returns the kind
    /// names due to spawn this tick, in order.
    pub fn update(&mut self, dt: f32, field_clear: bool) -> Vec<String> {
        let mut spawns = Vec::new();

        match self.phase {
            WavePhase::Waiting => {
                self.timer -= dt;
                if self.timer <= 0.0 {
                    self.start_next_wave();
                    // The first entry of the wave still honors its delay.
                }
            }
            WavePhase::Spawning => {
                self.timer -= dt;
                while self.timer <= 0.0 {
                    let Some(entry) = self.queue.pop_front() else {
                        break;
                    };
                    spawns.push(entry.kind);
                    match self.queue.front() {
                        Some(next) => self.timer += next.delay,
                        None => break,
                    }
                }
                if self.queue.is_empty() {
                    self.phase = WavePhase::Active;
                }
            }
            WavePhase::Active => {
                if field_clear {
                    if self.current_wave as usize >= self.waves.len() {
                        self.phase = WavePhase::Complete;
                        tracing::info!("wave schedule complete");
                    } else {
                        self.phase = WavePhase::Waiting;
                        self.timer = WAVE_DELAY;
                    }
                }
            }
            WavePhase::Complete => {}
        }

        spawns
    }

    fn start_next_wave(&mut self) {
        let index = self.current_wave as usize;
        let Some(wave) = self.waves.get(index) else {
            self.phase = WavePhase::Complete;
            return;
        };

        self.current_wave += 1;
        self.queue = wave
            .groups
            .iter()
            .flat_map(|group| {
                std::iter::repeat_with(|| SpawnEntry {
                    kind: group.kind.clone(),
                    delay: group.delay,
                })
                .take(group.count as usize)
            })
            .collect();

        self.timer = self.queue.front().map_or(0.0, |entry| entry.delay);
        self.phase = if self.queue.is_empty() {
            // An empty wave spawns nothing and goes straight to Active.
            WavePhase::Active
        } else {
            WavePhase::Spawning
        };

        tracing::info!(
            wave = self.current_wave,
            spawns = self.queue.len(),
            "wave started"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::GroupData;

    fn schedule(groups_per_wave: &[&[(&str, u32, f32)]]) -> Vec<WaveData> {
        groups_per_wave
            .iter()
            .map(|groups| WaveData {
                groups: groups
                    .iter()
                    .map(|&(kind, count, delay)| GroupData {
                        kind: kind.to_string(),
                        count,
                        delay,
                    })
                    .collect(),
            })
            .collect()
    }

    /// Drive the sequencer until it spawns `n` enemies or `max_seconds`
    /// pass, pretending every spawned enemy dies instantly.
    fn collect_spawns(seq: &mut WaveSequencer, max_seconds: f32) -> Vec<String> {
        let mut spawned = Vec::new();
        let dt = 0.05;
        let mut elapsed = 0.0;
        while elapsed < max_seconds && !seq.is_complete() {
            spawned.extend(seq.update(dt, true));
            elapsed += dt;
        }
        spawned
    }

    #[test]
    fn test_empty_schedule_completes_immediately() {
        let seq = WaveSequencer::new(vec![]);
        assert!(seq.is_complete());
    }

    #[test]
    fn test_initial_countdown() {
        let mut seq = WaveSequencer::new(schedule(&[&[("basic", 1, 0.5)]]));
        assert_eq!(seq.phase(), WavePhase::Waiting);
        assert_eq!(seq.current_wave(), 0);

        let spawns = seq.update(4.0, true);
        assert!(spawns.is_empty());
        assert_eq!(seq.phase(), WavePhase::Waiting);
        assert!((seq.countdown() - 1.0).abs() < 1e-5);

        seq.update(1.5, true);
        assert_eq!(seq.current_wave(), 1);
    }

    #[test]
    fn test_spawns_flattened_in_order() {
        let mut seq = WaveSequencer::new(schedule(&[&[("basic", 2, 0.1), ("fast", 1, 0.1)]]));
        let spawned = collect_spawns(&mut seq, 30.0);
        assert_eq!(spawned, vec!["basic", "basic", "fast"]);
        assert!(seq.is_complete());
    }

    #[test]
    fn test_skip_countdown_only_while_waiting() {
        let mut seq = WaveSequencer::new(schedule(&[&[("basic", 1, 0.2)]]));
        seq.skip_countdown();
        seq.update(0.01, true);
        assert_eq!(seq.current_wave(), 1);
        assert_eq!(seq.phase(), WavePhase::Spawning);

        // Skipping while spawning does nothing
        seq.skip_countdown();
        assert_eq!(seq.phase(), WavePhase::Spawning);
    }

    #[test]
    fn test_active_waits_for_field_to_clear() {
        let mut seq = WaveSequencer::new(schedule(&[&[("basic", 1, 0.1)], &[("tank", 1, 0.1)]]));
        seq.skip_countdown();
        seq.update(0.01, false);
        let spawns = seq.update(0.2, false);
        assert_eq!(spawns, vec!["basic"]);
        assert_eq!(seq.phase(), WavePhase::Active);

        // Enemies still alive: stays active
        seq.update(1.0, false);
        assert_eq!(seq.phase(), WavePhase::Active);

        // Field clears: next countdown begins
        seq.update(0.05, true);
        assert_eq!(seq.phase(), WavePhase::Waiting);
        assert!((seq.countdown() - WAVE_DELAY).abs() < 1e-3);
    }

    #[test]
    fn test_completes_after_last_wave_clears() {
        let mut seq = WaveSequencer::new(schedule(&[&[("basic", 3, 0.1)]]));
        let spawned = collect_spawns(&mut seq, 30.0);
        assert_eq!(spawned.len(), 3);
        assert!(seq.is_complete());
        assert_eq!(seq.current_wave(), 1);
    }

    #[test]
    fn test_large_dt_spawns_multiple() {
        let mut seq = WaveSequencer::new(schedule(&[&[("fast", 5, 0.01)]]));
        seq.skip_countdown();
        seq.update(0.001, true);
        // One clamped-size tick covers all five spawn delays
        let spawns = seq.update(0.1, true);
        assert_eq!(spawns.len(), 5);
        assert_eq!(seq.phase(), WavePhase::Active);
    }
}
