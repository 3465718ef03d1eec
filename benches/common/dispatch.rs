use bulwark::*;

struct Counter(usize);

impl EventListener for Counter {
    fn on_event(&mut self, _: &Event) -> anyhow::Result<()> {
        self.0 += 1;
        Ok(())
    }
}

pub struct Benchmark {
    dispatcher: EventDispatcher,
    event: Event,
}

impl Benchmark {
    pub fn new() -> Self {
        let dispatcher = EventDispatcher::new();
        for i in 0..8 {
            dispatcher.register_listener(format!("counter_{i}"), Counter(0));
        }

        let event = Event::new(EventKind::DamageDealt)
            .with_arg("target", Entity::new().id())
            .with_arg("amount", 12.0);

        Self { dispatcher, event }
    }

    pub fn run(&mut self) {
        for _ in 0..1000 {
            self.dispatcher.dispatch(&self.event);
        }
    }

    pub fn run_build(&mut self) {
        for i in 0..1000 {
            self.dispatcher.dispatch(
                &Event::new(EventKind::DamageDealt)
                    .with_arg("amount", i)
                    .with_arg("critical", i % 10 == 0),
            );
        }
    }
}
