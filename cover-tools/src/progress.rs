use cover_nmi::{ProgressObserver, Stage};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::Mutex;

/// Shows one progress bar per evaluation stage on stderr
pub struct BarProgress {
    show: bool,
    bar: Mutex<Option<ProgressBar>>,
}

impl BarProgress {
    pub fn new(show: bool) -> Self {
        Self {
            show,
            bar: Mutex::new(None),
        }
    }

    fn with_bar<F: FnOnce(&ProgressBar)>(&self, f: F) {
        if let Ok(bar) = self.bar.lock() {
            if let Some(pb) = bar.as_ref() {
                f(pb);
            }
        }
    }
}

impl ProgressObserver for BarProgress {
    fn start(&self, stage: Stage, total: u64) {
        let pb = ProgressBar::new(total);

        if !self.show {
            pb.set_draw_target(ProgressDrawTarget::hidden());
        }

        let style = ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos:>7}/{len:7} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        pb.set_style(style);
        pb.set_message(stage.name());

        if let Ok(mut bar) = self.bar.lock() {
            *bar = Some(pb);
        }
    }

    fn advance(&self, _stage: Stage, delta: u64) {
        self.with_bar(|pb| pb.inc(delta));
    }

    fn finish(&self, _stage: Stage) {
        self.with_bar(|pb| pb.finish_and_clear());
    }
}
