use jiff::Timestamp;

pub trait Clock: Send + Sync {
    /// Returns the current time of the clock
    fn now(&self) -> Timestamp;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

#[cfg(test)]
pub(crate) mod test_clock {
    use crate::clock::Clock;
    use jiff::{SignedDuration, Timestamp};
    use std::sync::{Arc, Mutex};

    /// A clock that only moves when told to.
    #[derive(Clone)]
    pub(crate) struct TestClock {
        inner: Arc<Mutex<Timestamp>>,
    }

    impl TestClock {
        pub(crate) fn new(now: Timestamp) -> Self {
            Self {
                inner: Arc::new(Mutex::new(now)),
            }
        }

        pub(crate) fn at_millis(millis: i64) -> Self {
            Self::new(Timestamp::from_millisecond(millis).unwrap())
        }

        pub(crate) fn set(&self, now: Timestamp) {
            *self
                .inner
                .lock()
                .expect("test clock lock should not be poisoned") = now;
        }

        pub(crate) fn advance_millis(&self, millis: i64) {
            let mut now = self
                .inner
                .lock()
                .expect("test clock lock should not be poisoned");
            *now = now
                .checked_add(SignedDuration::from_millis(millis))
                .expect("test clock stays in range");
        }
    }

    impl Clock for TestClock {
        fn now(&self) -> Timestamp {
            *self
                .inner
                .lock()
                .expect("test clock lock should not be poisoned")
        }
    }

    #[test]
    fn test_clock_works() {
        // the clock starts at the given time
        let base = Timestamp::from_second(0).unwrap();
        let clock = TestClock::new(base);
        assert_eq!(clock.now(), base);

        clock.advance_millis(1500);
        assert_eq!(clock.now().as_millisecond(), 1500);

        // moving backwards is allowed, the generator has to cope with it
        let earlier = Timestamp::from_millisecond(200).unwrap();
        clock.set(earlier);
        assert_eq!(clock.now(), earlier);
    }
}
