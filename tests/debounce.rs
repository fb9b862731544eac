mod tests {
    use embassy_time::{Duration, Instant};
    use led_sequencer::{ButtonLevel, DEFAULT_DEBOUNCE, DebounceClock};

    fn clock() -> DebounceClock {
        DebounceClock::new(DEFAULT_DEBOUNCE)
    }

    #[test]
    fn test_first_edge_is_accepted() {
        let mut clock = clock();
        assert_eq!(clock.threshold(), Duration::from_millis(20));
        assert_eq!(clock.last_accepted(), None);
        assert!(clock.accept(
            ButtonLevel::Released,
            ButtonLevel::Pressed,
            Instant::from_millis(0)
        ));
        assert_eq!(clock.last_accepted(), Some(Instant::from_millis(0)));
    }

    #[test]
    fn test_edge_within_threshold_is_rejected_without_mutation() {
        let mut clock = clock();
        assert!(clock.accept(
            ButtonLevel::Released,
            ButtonLevel::Pressed,
            Instant::from_millis(100)
        ));
        assert!(!clock.accept(
            ButtonLevel::Pressed,
            ButtonLevel::Released,
            Instant::from_millis(119)
        ));
        assert_eq!(clock.last_accepted(), Some(Instant::from_millis(100)));
    }

    #[test]
    fn test_edge_at_threshold_is_accepted() {
        let mut clock = clock();
        assert!(clock.accept(
            ButtonLevel::Released,
            ButtonLevel::Pressed,
            Instant::from_millis(100)
        ));
        assert!(clock.accept(
            ButtonLevel::Pressed,
            ButtonLevel::Released,
            Instant::from_millis(120)
        ));
        assert_eq!(clock.last_accepted(), Some(Instant::from_millis(120)));
    }

    #[test]
    fn test_same_level_is_rejected() {
        let mut clock = clock();
        assert!(!clock.accept(
            ButtonLevel::Released,
            ButtonLevel::Released,
            Instant::from_millis(500)
        ));
        assert_eq!(clock.last_accepted(), None);
    }

    #[test]
    fn test_burst_is_coalesced_to_first_edge() {
        let mut clock = clock();
        let mut level = ButtonLevel::Released;
        let mut accepted = 0;
        for (i, sensed) in [
            ButtonLevel::Pressed,
            ButtonLevel::Released,
            ButtonLevel::Pressed,
            ButtonLevel::Released,
            ButtonLevel::Pressed,
        ]
        .into_iter()
        .enumerate()
        {
            let now = Instant::from_millis(1000 + 4 * i as u64);
            if clock.accept(level, sensed, now) {
                level = sensed;
                accepted += 1;
            }
        }
        assert_eq!(accepted, 1);
        assert_eq!(level, ButtonLevel::Pressed);
        assert_eq!(clock.last_accepted(), Some(Instant::from_millis(1000)));
    }

    #[test]
    fn test_tick_wraparound() {
        let threshold = Duration::from_millis(20);
        let last = Instant::from_ticks(u64::MAX - 5);

        let mut clock = DebounceClock::new(threshold);
        assert!(clock.accept(ButtonLevel::Released, ButtonLevel::Pressed, last));

        // 16 ticks after `last` once the counter rolls over
        assert!(!clock.accept(
            ButtonLevel::Pressed,
            ButtonLevel::Released,
            Instant::from_ticks(10)
        ));

        let later = Instant::from_ticks(last.as_ticks().wrapping_add(threshold.as_ticks()));
        assert!(clock.accept(ButtonLevel::Pressed, ButtonLevel::Released, later));
    }
}
