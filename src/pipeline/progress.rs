use crate::media::MediaKind;

use crossbeam_channel::Sender;

/// Incremental events a running job emits before its terminal outcome.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Progress {
    Started { kind: MediaKind },
    Extracted { frames: usize },
    Upscaled { frame: usize, total: usize },
    Merging,
}

/// Forwards progress to whoever listens. Nobody listening is fine.
#[derive(Clone, Debug, Default)]
pub struct Reporter {
    sender: Option<Sender<Progress>>,
}

impl Reporter {
    pub fn new(sender: Sender<Progress>) -> Self {
        Self {
            sender: Some(sender),
        }
    }

    pub fn silent() -> Self {
        Self::default()
    }

    pub fn report(&self, progress: Progress) {
        if let Some(sender) = &self.sender {
            let _ = sender.send(progress);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crossbeam_channel::unbounded;

    #[test]
    fn reports_reach_receiver_in_order() {
        let (sender, receiver) = unbounded();
        let reporter = Reporter::new(sender);
        reporter.report(Progress::Extracted { frames: 2 });
        reporter.report(Progress::Upscaled { frame: 1, total: 2 });
        drop(reporter);

        let events: Vec<Progress> = receiver.iter().collect();
        assert_eq!(
            events,
            [Progress::Extracted { frames: 2 }, Progress::Upscaled { frame: 1, total: 2 }]
        );
    }

    #[test]
    fn dropped_receiver_does_not_fail_the_job() {
        let (sender, receiver) = unbounded();
        drop(receiver);
        Reporter::new(sender).report(Progress::Merging);
        Reporter::silent().report(Progress::Merging);
    }
}
