/// Group numeric digits to facilitate reading long numbers
pub fn group_digits<F: std::fmt::Display>(n: F) -> String {
    use numsep::{separate, Locale};
    separate(n, Locale::English)
}


pub mod timing {

    use super::group_digits;
    use std::time::{Duration, Instant};
    use log::debug;

    pub struct Progress {
        previous: Instant,
    }

    impl Progress {

        #[allow(clippy::new_without_default)]
        pub fn new() -> Self { Self { previous: Instant::now() } }

        /// Log message with appended ellipsis, start timer.
        pub fn start(&mut self, message: &str) {
            debug!("{message} ...");
            self.start_timer();
        }

        // Log message followed by time elapsed since last start or done
        pub fn done_with_message(&mut self, message: &str) {
            debug!("{message}: {} ms", group_digits(self.lap().as_millis()));
        }

        /// Time elapsed since last start, done or lap. Restarts the timer.
        pub fn lap(&mut self) -> Duration {
            let elapsed = self.previous.elapsed();
            self.start_timer();
            elapsed
        }

        fn start_timer(&mut self) { self.previous = Instant::now() }
    }
}


#[cfg(test)]
mod test_progress {
    use super::timing::Progress;
    use std::time::Duration;

    #[test]
    fn start_restarts_the_timer() {
        let mut progress = Progress::new();
        std::thread::sleep(Duration::from_millis(50));
        progress.start("working");
        assert!(progress.lap() < Duration::from_millis(50));
    }

    #[test]
    fn lap_measures_time_since_last_lap() {
        let mut progress = Progress::new();
        std::thread::sleep(Duration::from_millis(10));
        assert!(progress.lap() >= Duration::from_millis(10));
    }
}
