use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use anyhow::Context;
use linger_core::*;

/// Plays a scripted list through the transition on a simulated host, printing
/// every frame. Pass a settings JSON path to override the defaults.
struct Demo {
    clock: TestClock,
    start: web_time::Instant,
    timers: Rc<TimerQueue>,
    list: AnimatedTransition,
    host: SimHost,
    frame: usize,
}

impl Demo {
    fn new(config: TransitionConfig) -> Self {
        let clock = TestClock::new();
        let timers = Rc::new(TimerQueue::new(clock.clone()));
        let list = AnimatedTransition::new(config, timers.clone());
        Self {
            start: clock.now(),
            clock,
            timers,
            list,
            host: SimHost::new(),
            frame: 0,
        }
    }

    fn render(&mut self, keys: &[&str]) {
        let children = keys
            .iter()
            .map(|k| Node::new(*k).attr("data-label", k.to_uppercase()))
            .collect();
        let out = self.list.render(children);
        self.host.commit(&out);
        self.frame += 1;

        let row: Vec<String> = self
            .host
            .keys()
            .iter()
            .map(|k| match self.host.class_of(k) {
                Some(class) => format!("{k}[{class}]"),
                None => k.clone(),
            })
            .collect();
        println!(
            "frame {:>2} t={:>4}ms  {}",
            self.frame,
            self.elapsed_ms(),
            row.join(" ")
        );
    }

    fn wait(&self, ms: u64) {
        self.clock.advance(Duration::from_millis(ms));
        let fired = self.timers.run_due();
        if fired > 0 {
            log::debug!("{fired} timer(s) fired");
        }
    }

    fn animate(&self, key: &str, event: TransitionEvent) {
        match self.host.element(key) {
            Some(el) => el.dispatch(&event),
            None => log::warn!("{key} is not mounted"),
        }
    }

    fn elapsed_ms(&self) -> u128 {
        self.clock.now().duration_since(self.start).as_millis()
    }
}

fn load_config() -> anyhow::Result<TransitionConfig> {
    let Some(path) = std::env::args().nth(1) else {
        return Ok(TransitionConfig::new().exit_class("exiting"));
    };
    let settings = TransitionSettings::from_path(&path)
        .with_context(|| format!("loading transition settings from {path}"))?;
    log::info!("settings: {}", settings.to_json());
    Ok(settings.into_config())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    log::info!("Starting Exit Demo");

    let mut demo = Demo::new(load_config()?);
    let renders = Rc::new(Cell::new(0u32));
    {
        let renders = renders.clone();
        demo.list.trigger().subscribe(move |v| {
            log::debug!("re-render requested (v{v})");
            renders.set(renders.get() + 1);
        });
    }

    println!("-- removal finished by the timeout");
    demo.render(&["a", "b", "c", "d"]);
    demo.render(&["a", "c", "d"]);
    demo.wait(150);
    demo.render(&["a", "c", "d"]);
    demo.wait(150);
    demo.render(&["a", "c", "d"]);

    println!("-- removal finished by transition events");
    demo.render(&["a", "d"]);
    demo.animate("c", TransitionEvent::run("opacity"));
    demo.animate("c", TransitionEvent::run("transform"));
    demo.wait(400);
    demo.animate("c", TransitionEvent::end("opacity"));
    demo.render(&["a", "d"]);
    demo.animate("c", TransitionEvent::end("transform"));
    demo.render(&["a", "d"]);

    println!("-- neighbours leave while exiting");
    demo.render(&["a", "b", "c", "d"]);
    demo.render(&["a", "d"]);
    demo.render(&["d"]);
    demo.render(&["x", "d"]);
    demo.wait(300);
    demo.render(&["x", "d"]);

    println!("-- re-added before the exit finished");
    demo.render(&["x", "d", "e"]);
    demo.render(&["x", "d"]);
    demo.wait(100);
    demo.render(&["x", "d", "e"]);
    demo.wait(1000);
    demo.render(&["x", "d", "e"]);

    log::info!(
        "{} frames, {} re-renders requested, {} mounts, {} unmounts",
        demo.frame,
        renders.get(),
        demo.host.mounts(),
        demo.host.unmounts()
    );
    Ok(())
}
