//! Effects loop example for framepool
//!
//! Demonstrates pooled lights and sounds driven by a frame loop

use std::thread;

use framepool::{
    Activation, Color, PoolConfig, PoolProvider, Poolable, PoolableContext, Preset, ScopeId,
};

/// A flash of light that switches off as soon as it is returned.
#[derive(Clone)]
struct ImpactLight {
    intensity: f32,
    color: Color,
}

impl Poolable for ImpactLight {
    fn on_borrowed(&mut self, activation: &mut Activation<'_>) {
        self.intensity = 4.0;
        self.color = activation.context().tag.unwrap_or(Color::WHITE);
        activation.enable();
    }

    fn on_returned(&mut self, activation: &mut Activation<'_>) {
        self.intensity = 0.0;
        activation.disable();
    }

    fn on_update(&mut self, _activation: &mut Activation<'_>, delta: f32) {
        self.intensity = (self.intensity - delta * 8.0).max(0.0);
    }
}

/// A looping sound that fades out before going back to the pool.
#[derive(Clone)]
struct AmbientSound {
    volume: f32,
    fade_time: f32,
    fading: bool,
}

impl Poolable for AmbientSound {
    fn on_borrowed(&mut self, activation: &mut Activation<'_>) {
        self.volume = 1.0;
        self.fading = false;
        activation.enable();
    }

    fn on_returned(&mut self, _activation: &mut Activation<'_>) {
        self.fading = true;
    }

    fn on_update(&mut self, activation: &mut Activation<'_>, delta: f32) {
        if self.fading {
            self.volume -= delta / self.fade_time;
            if self.volume <= 0.0 {
                self.volume = 0.0;
                activation.disable();
            }
        }
    }

    fn deactivate(&mut self) {
        self.volume = 0.0;
    }
}

fn main() {
    let world = ScopeId::new(1);
    let config = PoolConfig::new(world)
        .with_preset(Preset::new(
            ImpactLight {
                intensity: 0.0,
                color: Color::WHITE,
            },
            8,
        ))
        .with_preset(Preset::new(
            AmbientSound {
                volume: 0.0,
                fade_time: 0.5,
                fading: false,
            },
            2,
        ));

    let mut pool = PoolProvider::new(config).expect("valid pool config");
    println!("Hello, framepool! {} instances prewarmed", pool.stats().prewarmed);

    let rotation = [0.0, 0.0, 0.0, 1.0];
    let wind = pool
        .get::<AmbientSound>(PoolableContext::infinite([0.0, 10.0, 0.0], rotation))
        .expect("sound preset registered");

    let dt = 1.0 / 30.0;
    for frame in 0..30 {
        // A burst of impacts every ten frames, each lit for a fifth of a second.
        if frame % 10 == 0 {
            for i in 0..3 {
                let position = [i as f32, 0.0, frame as f32 * 0.1];
                let ctx = PoolableContext::finite(0.2, position, rotation)
                    .with_color(Color::rgb(1.0, 0.6, 0.2));
                pool.get::<ImpactLight>(ctx).expect("light preset registered");
            }
        }

        if frame == 15 {
            pool.return_instance(wind, false).expect("handle from this pool");
        }

        pool.tick_all(dt);

        let volume = pool.resource(wind).map_or(0.0, |s| s.volume);
        println!(
            "frame {:2}: {} active, wind volume {:.2}",
            frame,
            pool.active_count(),
            volume
        );
    }

    // An audio thread reports the end of a one-shot through a notifier.
    let footstep = pool
        .get::<AmbientSound>(PoolableContext::infinite([2.0, 0.0, 0.0], rotation))
        .expect("sound preset registered");
    let notifier = pool.notifier();
    thread::spawn(move || notifier.notify(footstep))
        .join()
        .expect("audio thread");
    println!("{} signal(s) applied", pool.pump_notifications());

    pool.return_all(true);
    for reserve in pool.reserve_stats() {
        println!("{}: {}/{} idle", reserve.type_name, reserve.idle, reserve.total);
    }
    println!("\n{}", pool.stats());
}
