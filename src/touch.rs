//! Capacitive contact sampling.
//!
//! One sensing cycle takes 10 sub-samples; each sub-sample probes the
//! line 1000 times and counts how often it reads closed, then drives the
//! line low to discharge the electrode. Skipping the discharge biases
//! every following sub-sample, so it is part of the procedure, not an
//! optimization.
//!
//! Purely deterministic given the hardware signal; no failure states.

use crate::hal::TouchProbe;

/// Sub-samples taken per sensing cycle.
pub const SUB_SAMPLES: usize = 10;

/// Probe reads per sub-sample.
pub const PROBE_READS: u32 = 1000;

/// One sensing cycle's worth of raw counts.
///
/// Each count is how many of the [`PROBE_READS`] reads found the line
/// closed. Recomputed every cycle, never persisted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ContactSample {
    pub counts: [u32; SUB_SAMPLES],
}

impl ContactSample {
    /// Integer average of the sub-sample counts.
    pub fn average(&self) -> u32 {
        let sum: u32 = self.counts.iter().sum();
        sum / SUB_SAMPLES as u32
    }
}

/// Runs the sampling procedure against a [`TouchProbe`].
///
/// `sample()` toggles the line direction twice per sub-sample (20
/// direction changes per call), so call it at most once per cycle.
pub struct ContactSampler<P: TouchProbe> {
    probe: P,
}

impl<P: TouchProbe> ContactSampler<P> {
    pub fn new(probe: P) -> Self {
        Self { probe }
    }

    /// Run one full sensing cycle.
    pub fn sample(&mut self) -> ContactSample {
        let mut counts = [0u32; SUB_SAMPLES];
        for count in counts.iter_mut() {
            self.probe.set_input();
            for _ in 0..PROBE_READS {
                if self.probe.read_closed() {
                    *count += 1;
                }
            }
            // Discharge before the next sub-sample.
            self.probe.set_output_low();
        }
        ContactSample { counts }
    }

    /// Access the underlying probe (for teardown).
    pub fn into_probe(self) -> P {
        self.probe
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Probe that reads closed for a fixed count out of each 1000 reads.
    struct ScriptedProbe {
        closed_per_block: u32,
        reads_in_block: u32,
        inputs: u32,
        discharges: u32,
    }

    impl TouchProbe for ScriptedProbe {
        fn set_input(&mut self) {
            self.inputs += 1;
            self.reads_in_block = 0;
        }

        fn set_output_low(&mut self) {
            self.discharges += 1;
        }

        fn read_closed(&mut self) -> bool {
            let closed = self.reads_in_block < self.closed_per_block;
            self.reads_in_block += 1;
            closed
        }
    }

    #[test]
    fn test_sample_counts_closed_reads() {
        let probe = ScriptedProbe {
            closed_per_block: 73,
            reads_in_block: 0,
            inputs: 0,
            discharges: 0,
        };
        let mut sampler = ContactSampler::new(probe);
        let sample = sampler.sample();

        assert_eq!(sample.counts, [73; SUB_SAMPLES]);
        assert_eq!(sample.average(), 73);
    }

    #[test]
    fn test_sample_discharges_every_subsample() {
        let probe = ScriptedProbe {
            closed_per_block: 0,
            reads_in_block: 0,
            inputs: 0,
            discharges: 0,
        };
        let mut sampler = ContactSampler::new(probe);
        sampler.sample();

        let probe = sampler.into_probe();
        assert_eq!(probe.inputs, SUB_SAMPLES as u32);
        assert_eq!(probe.discharges, SUB_SAMPLES as u32);
    }

    #[test]
    fn test_average_is_integer_division() {
        let mut counts = [0u32; SUB_SAMPLES];
        counts[0] = 9; // sum 9, average 9/10 = 0
        assert_eq!(ContactSample { counts }.average(), 0);

        let counts = [5u32; SUB_SAMPLES];
        assert_eq!(ContactSample { counts }.average(), 5);
    }
}
